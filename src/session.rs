use crate::config::StepCounterPolicy;
use crate::display::{AreaDisplay, ProgressDisplay};
use crate::geometry::{Path, Point};
use crate::units::AreaResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Paths with fewer points than this (after closing) enclose no area
pub const MIN_POLYGON_POINTS: usize = 4;

/// Session state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Not collecting; steps are ignored
    Idle,
    /// Recording steps into the path
    Collecting,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "IDLE",
            SessionState::Collecting => "COLLECTING",
        }
    }
}

/// Session snapshot for the host (in-memory only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub state: SessionState,
    pub started_at: Option<DateTime<Utc>>,
    pub steps: u64,
    pub stride_m: f64,
    pub distance_m: f64,
    pub points: Vec<Point>,
}

impl SessionSummary {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Parse the stride entered by the user.
///
/// Accepts the Java float-literal suffixes `f`/`F`/`d`/`D` ("1.5f").
/// Unparseable or non-finite text falls back to `default_m`. Zero and negative
/// values are kept as entered.
pub fn parse_stride(text: &str, default_m: f64) -> f64 {
    let trimmed = text.trim();
    let number = trimmed
        .strip_suffix(|c: char| matches!(c, 'f' | 'F' | 'd' | 'D'))
        .unwrap_or(trimmed);
    match number.parse::<f64>() {
        Ok(stride) if stride.is_finite() => {
            if stride <= 0.0 {
                log::warn!("Non-positive stride length {} accepted as entered", stride);
            }
            stride
        }
        _ => {
            log::debug!("Stride {:?} not a number, using default {} m", text, default_m);
            default_m
        }
    }
}

/// One walking session: step count, dead-reckoned position and path
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    stride_m: f64,
    steps: u64,
    position: Point,
    path: Path,
    /// Last cumulative step-counter value seen this session
    counter_baseline: Option<u64>,
    started_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create new session in Idle state
    pub fn new(stride_m: f64) -> Self {
        Session {
            state: SessionState::Idle,
            stride_m,
            steps: 0,
            position: Point::ORIGIN,
            path: Path::new(),
            counter_baseline: None,
            started_at: None,
        }
    }

    /// Reset everything and begin collecting (Idle/Collecting → Collecting)
    pub fn start(&mut self, stride_m: f64) {
        if self.state == SessionState::Collecting {
            log::info!("Restarting session with {} steps discarded", self.steps);
        }
        self.stride_m = stride_m;
        self.steps = 0;
        self.position = Point::ORIGIN;
        self.path.reset();
        self.counter_baseline = None;
        self.started_at = Some(Utc::now());
        self.state = SessionState::Collecting;
    }

    /// Advance one stride along `heading_radians`. No-op while Idle.
    pub fn record_step(&mut self, heading_radians: f64) -> bool {
        if !self.is_collecting() {
            return false;
        }
        self.steps += 1;
        self.position = self.position.advance(self.stride_m, heading_radians);
        self.path.push(self.position);
        true
    }

    /// Turn a cumulative step-counter reading into steps; returns steps recorded.
    ///
    /// Under `CumulativeDelta`, a jump above `max_delta` is not walked: the
    /// reading becomes the new baseline and no steps are recorded.
    pub fn record_counter(
        &mut self,
        cumulative_count: u64,
        policy: StepCounterPolicy,
        max_delta: u64,
        heading_radians: f64,
    ) -> u64 {
        if !self.is_collecting() {
            return 0;
        }
        let new_steps = match policy {
            StepCounterPolicy::EveryCallback => 1,
            StepCounterPolicy::CumulativeDelta => {
                let delta = match self.counter_baseline {
                    Some(baseline) if cumulative_count >= baseline => {
                        let delta = cumulative_count - baseline;
                        if delta > max_delta {
                            log::warn!(
                                "Step counter jumped by {} (limit {}), re-baselining",
                                delta,
                                max_delta
                            );
                            0
                        } else {
                            delta
                        }
                    }
                    Some(baseline) => {
                        log::warn!(
                            "Step counter went backwards ({} -> {}), re-baselining",
                            baseline,
                            cumulative_count
                        );
                        0
                    }
                    None => 0,
                };
                self.counter_baseline = Some(cumulative_count);
                delta
            }
        };
        for _ in 0..new_steps {
            self.record_step(heading_radians);
        }
        new_steps
    }

    /// Stop collecting, close the loop and compute the area.
    ///
    /// Returns `None` (and changes nothing) when the session is not collecting.
    pub fn finish(&mut self) -> Option<AreaDisplay> {
        if !self.is_collecting() {
            return None;
        }
        self.state = SessionState::Idle;

        if self.path.close_loop(self.stride_m / 2.0) {
            log::debug!("Closed loop back to origin ({} points)", self.path.len());
        }

        if self.path.len() < MIN_POLYGON_POINTS {
            log::info!("Session stopped with {} points, too few for an area", self.path.len());
            return Some(AreaDisplay::too_small());
        }

        let result = AreaResult::from_square_meters(self.path.area());
        log::info!(
            "Session stopped: {} steps, {:.2} m²",
            self.steps,
            result.square_meters
        );
        Some(AreaDisplay::from_result(result))
    }

    pub fn progress(&self, preview_points: usize) -> ProgressDisplay {
        ProgressDisplay::new(self.steps, self.stride_m, self.path.tail(preview_points))
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_collecting(&self) -> bool {
        self.state == SessionState::Collecting
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn stride_m(&self) -> f64 {
        self.stride_m
    }

    /// Accumulated walking distance (steps × stride, not displacement)
    pub fn distance_m(&self) -> f64 {
        self.steps as f64 * self.stride_m
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            state: self.state,
            started_at: self.started_at,
            steps: self.steps,
            stride_m: self.stride_m,
            distance_m: self.distance_m(),
            points: self.path.points().to_vec(),
        }
    }
}
