use serde::{Deserialize, Serialize};

/// Square feet per square meter
pub const SQ_FEET_PER_SQ_METER: f64 = 10.7639104167;

/// Square meters per acre
pub const SQ_METERS_PER_ACRE: f64 = 4046.8564224;

/// Guntha per acre (1 guntha = 1/40 acre)
pub const GUNTHA_PER_ACRE: f64 = 40.0;

/// Square meters per hectare
pub const SQ_METERS_PER_HECTARE: f64 = 10_000.0;

/// Area of a closed walk in every unit shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaResult {
    pub square_meters: f64,
    pub square_feet: f64,
    pub acres: f64,
    pub guntha: f64,
    pub hectares: f64,
}

impl AreaResult {
    pub fn from_square_meters(square_meters: f64) -> Self {
        let acres = square_meters / SQ_METERS_PER_ACRE;
        Self {
            square_meters,
            square_feet: square_meters * SQ_FEET_PER_SQ_METER,
            acres,
            guntha: acres * GUNTHA_PER_ACRE,
            hectares: square_meters / SQ_METERS_PER_HECTARE,
        }
    }
}
