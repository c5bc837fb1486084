use nalgebra::{Quaternion, UnitQuaternion};

/// Tracks the most recent device heading (yaw) in radians.
///
/// Defaults to 0 until the first orientation sample arrives. Samples are
/// stored as given; the sensor layer is trusted to deliver a valid angle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeadingTracker {
    heading_radians: f64,
}

impl HeadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heading_radians(&self) -> f64 {
        self.heading_radians
    }

    /// Record a pre-extracted yaw sample
    pub fn on_orientation_sample(&mut self, yaw_radians: f64) {
        self.heading_radians = yaw_radians;
    }

    /// Record a raw rotation-vector payload `[x, y, z, (w)]`.
    ///
    /// Returns false (heading unchanged) when the payload cannot be turned
    /// into a rotation.
    pub fn on_rotation_vector(&mut self, values: &[f64]) -> bool {
        match azimuth_from_rotation_vector(values) {
            Some(azimuth) => {
                self.heading_radians = azimuth;
                true
            }
            None => {
                log::warn!(
                    "Ignoring rotation vector with {} component(s): not a valid rotation",
                    values.len()
                );
                false
            }
        }
    }
}

/// Azimuth of a rotation-vector sample, as the platform's orientation API reports it.
///
/// The scalar part is taken from the fourth component when present, otherwise
/// reconstructed from the vector part (clamped at 0). Azimuth is
/// `atan2(R[0][1], R[1][1])` of the resulting rotation matrix.
pub fn azimuth_from_rotation_vector(values: &[f64]) -> Option<f64> {
    if values.len() < 3 {
        return None;
    }
    let (x, y, z) = (values[0], values[1], values[2]);
    let w = match values.get(3) {
        Some(w) => *w,
        None => {
            let w_sq = 1.0 - x * x - y * y - z * z;
            if w_sq > 0.0 {
                w_sq.sqrt()
            } else {
                0.0
            }
        }
    };

    let rotation = UnitQuaternion::try_new(Quaternion::new(w, x, y, z), f64::EPSILON)?;
    let matrix = rotation.to_rotation_matrix();
    let m = matrix.matrix();
    let azimuth = m[(0, 1)].atan2(m[(1, 1)]);
    azimuth.is_finite().then_some(azimuth)
}
