//! Engine configuration.
//!
//! Loaded once by the host (usually as a JSON string handed across JNI) and
//! kept for the lifetime of the engine. Every field has a default, so an empty
//! object `{}` is a valid configuration.

use crate::error::{AreaEngineError, EngineResult};
use serde::{Deserialize, Serialize};

/// Stride used when the entered text is missing or not a number (meters)
pub const DEFAULT_STRIDE_M: f64 = 0.75;

/// Number of trailing path points shown in the preview
pub const DEFAULT_PREVIEW_POINTS: usize = 10;

/// Largest step-counter jump accepted from one callback
pub const DEFAULT_MAX_COUNTER_DELTA: u64 = 500;

/// How `StepCounterChanged` callbacks are turned into steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepCounterPolicy {
    /// Every callback is one step, whatever the cumulative value says
    #[default]
    EveryCallback,
    /// Steps are the difference between consecutive cumulative readings
    CumulativeDelta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fallback stride length in meters
    pub default_stride_m: f64,

    /// Points kept in the rolling path preview
    pub preview_points: usize,

    pub step_counter_policy: StepCounterPolicy,

    /// Larger cumulative jumps are treated as a counter glitch and re-baselined
    pub max_counter_delta: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_stride_m: DEFAULT_STRIDE_M,
            preview_points: DEFAULT_PREVIEW_POINTS,
            step_counter_policy: StepCounterPolicy::default(),
            max_counter_delta: DEFAULT_MAX_COUNTER_DELTA,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration string.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|e| AreaEngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !self.default_stride_m.is_finite() || self.default_stride_m <= 0.0 {
            return Err(AreaEngineError::InvalidConfig(format!(
                "default_stride_m must be a positive number, got {}",
                self.default_stride_m
            )));
        }
        if self.preview_points == 0 {
            return Err(AreaEngineError::InvalidConfig(
                "preview_points must be > 0".to_string(),
            ));
        }
        if self.max_counter_delta == 0 {
            return Err(AreaEngineError::InvalidConfig(
                "max_counter_delta must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.default_stride_m, 0.75);
        assert_eq!(config.preview_points, 10);
        assert_eq!(config.step_counter_policy, StepCounterPolicy::EveryCallback);
        assert_eq!(config.max_counter_delta, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let config =
            EngineConfig::from_json(r#"{"step_counter_policy": "cumulative_delta"}"#).unwrap();
        assert_eq!(config.step_counter_policy, StepCounterPolicy::CumulativeDelta);
        assert_eq!(config.default_stride_m, DEFAULT_STRIDE_M);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            EngineConfig::from_json(r#"{"default_stride_m": 0.0}"#),
            Err(AreaEngineError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{"preview_points": 0}"#),
            Err(AreaEngineError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{"max_counter_delta": 0}"#),
            Err(AreaEngineError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::from_json("not json"),
            Err(AreaEngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_json_roundtrip_keeps_policy() {
        let config = EngineConfig {
            step_counter_policy: StepCounterPolicy::CumulativeDelta,
            ..EngineConfig::default()
        };
        let json = config.to_json().unwrap();
        assert!(json.contains("cumulative_delta"));
        assert_eq!(EngineConfig::from_json(&json).unwrap(), config);
    }
}
