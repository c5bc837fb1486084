//! Display snapshots handed back to the host UI.
//!
//! Every snapshot is an immutable set of ready-to-show strings; the host only
//! copies them into its widgets.

use crate::geometry::Point;
use crate::units::AreaResult;
use serde::{Deserialize, Serialize};

pub const PATH_TOO_SMALL_MESSAGE: &str = "Walked path too small for area (need a closed loop).";

pub const APPROXIMATION_NOTE: &str = "(Approximate – sensor drift may cause error)";

/// Live progress while collecting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressDisplay {
    pub step_count: String,
    pub distance: String,
    pub path_preview: String,
}

impl ProgressDisplay {
    /// `preview` is the already-trimmed tail of the path
    pub fn new(steps: u64, stride_m: f64, preview: &[Point]) -> Self {
        let distance_m = steps as f64 * stride_m;
        Self {
            step_count: format!("Steps: {}", steps),
            distance: format!("Distance: {:.2} m", distance_m),
            path_preview: format_path_preview(preview),
        }
    }
}

/// Final result shown after a session stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaDisplay {
    pub text: String,
    /// `None` when the path was too small to enclose anything
    pub result: Option<AreaResult>,
}

impl AreaDisplay {
    pub fn too_small() -> Self {
        Self {
            text: PATH_TOO_SMALL_MESSAGE.to_string(),
            result: None,
        }
    }

    pub fn from_result(result: AreaResult) -> Self {
        Self {
            text: format_area(&result),
            result: Some(result),
        }
    }

    pub fn is_too_small(&self) -> bool {
        self.result.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayUpdate {
    Progress(ProgressDisplay),
    Area(AreaDisplay),
}

impl DisplayUpdate {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// One `(x, y)` line per point, one decimal place
pub fn format_path_preview(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("({:.1}, {:.1})\n", p.x, p.y))
        .collect()
}

pub fn format_area(result: &AreaResult) -> String {
    format!(
        "Sq. Meters: {:.2}\nSq. Feet: {:.2}\nGuntha: {:.4}\nAcres: {:.5}\nHectares: {:.5}\n{}",
        result.square_meters,
        result.square_feet,
        result.guntha,
        result.acres,
        result.hectares,
        APPROXIMATION_NOTE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_strings() {
        let preview = [Point::ORIGIN, Point::new(0.74, 0.0), Point::new(1.46, 0.04)];
        let display = ProgressDisplay::new(2, 0.75, &preview);
        assert_eq!(display.step_count, "Steps: 2");
        assert_eq!(display.distance, "Distance: 1.50 m");
        assert_eq!(display.path_preview, "(0.0, 0.0)\n(0.7, 0.0)\n(1.5, 0.0)\n");
    }

    #[test]
    fn test_empty_session_progress() {
        let display = ProgressDisplay::new(0, 0.75, &[Point::ORIGIN]);
        assert_eq!(display.step_count, "Steps: 0");
        assert_eq!(display.distance, "Distance: 0.00 m");
        assert_eq!(display.path_preview, "(0.0, 0.0)\n");
    }

    #[test]
    fn test_area_block() {
        let display = AreaDisplay::from_result(AreaResult::from_square_meters(1.0));
        assert!(!display.is_too_small());
        let lines: Vec<&str> = display.text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Sq. Meters: 1.00",
                "Sq. Feet: 10.76",
                "Guntha: 0.0099",
                "Acres: 0.00025",
                "Hectares: 0.00010",
                APPROXIMATION_NOTE,
            ]
        );
    }

    #[test]
    fn test_too_small_message() {
        let display = AreaDisplay::too_small();
        assert!(display.is_too_small());
        assert_eq!(display.text, PATH_TOO_SMALL_MESSAGE);
    }

    #[test]
    fn test_update_json_is_tagged() {
        let update = DisplayUpdate::Area(AreaDisplay::too_small());
        let json = update.to_json().unwrap();
        assert!(json.contains(r#""kind":"area""#));
        assert!(json.contains(r#""result":null"#));
    }
}
