use serde::{Deserialize, Serialize};

/// Input delivered to the engine by the platform layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MotionEvent {
    /// Yaw already extracted by the host
    Orientation { yaw_radians: f64 },
    /// Raw rotation-vector payload `[x, y, z, (w)]`
    RotationVector { values: Vec<f64> },
    /// Discrete step detector; only `value == 1.0` counts as a step
    StepDetected { value: f64 },
    /// Cumulative step counter update
    StepCounterChanged { cumulative_count: u64 },
    StartSession { stride_length_text: String },
    StopSession,
}

/// Step-detector payload for one physical step; other values are auxiliary
pub const STEP_DETECTED_VALUE: f64 = 1.0;

/// Whether a step-detector payload represents one physical step
pub fn is_step_payload(value: f64) -> bool {
    value == STEP_DETECTED_VALUE
}

/// Sensor the host should register for step ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepSource {
    Detector,
    Counter,
}

impl StepSource {
    /// Code passed across JNI (0 = none)
    pub fn code(self) -> i32 {
        match self {
            StepSource::Detector => 1,
            StepSource::Counter => 2,
        }
    }
}

/// Detector when available, the cumulative counter otherwise
pub fn preferred_step_source(has_detector: bool, has_counter: bool) -> Option<StepSource> {
    if has_detector {
        Some(StepSource::Detector)
    } else if has_counter {
        Some(StepSource::Counter)
    } else {
        None
    }
}
