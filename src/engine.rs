//! The area engine: heading tracker and walking session updated as one unit.
//!
//! Every method takes `&mut self`, so whoever owns the engine (the event
//! worker thread, or the JNI bridge behind its mutex) applies one event at a
//! time and heading, path and session state never disagree.

use crate::config::EngineConfig;
use crate::display::DisplayUpdate;
use crate::events::{is_step_payload, MotionEvent};
use crate::heading::HeadingTracker;
use crate::session::{parse_stride, Session, SessionState, SessionSummary};

#[derive(Debug, Clone)]
pub struct AreaEngine {
    config: EngineConfig,
    heading: HeadingTracker,
    session: Session,
}

impl AreaEngine {
    pub fn new(config: EngineConfig) -> Self {
        let session = Session::new(config.default_stride_m);
        Self {
            config,
            heading: HeadingTracker::new(),
            session,
        }
    }

    /// Apply one event, returning the display to show (if any)
    pub fn handle(&mut self, event: MotionEvent) -> Option<DisplayUpdate> {
        match event {
            MotionEvent::Orientation { yaw_radians } => {
                self.on_orientation_sample(yaw_radians);
                None
            }
            MotionEvent::RotationVector { values } => {
                self.heading.on_rotation_vector(&values);
                None
            }
            MotionEvent::StepDetected { value } => {
                if is_step_payload(value) {
                    self.on_step_tick()
                } else {
                    None
                }
            }
            MotionEvent::StepCounterChanged { cumulative_count } => {
                self.on_step_counter(cumulative_count)
            }
            MotionEvent::StartSession { stride_length_text } => {
                Some(self.start(&stride_length_text))
            }
            MotionEvent::StopSession => self.stop(),
        }
    }

    /// Begin (or restart) a session with the stride entered by the user
    pub fn start(&mut self, stride_length_text: &str) -> DisplayUpdate {
        let stride_m = parse_stride(stride_length_text, self.config.default_stride_m);
        self.session.start(stride_m);
        log::info!("Session started, stride {} m", stride_m);
        DisplayUpdate::Progress(self.session.progress(self.config.preview_points))
    }

    pub fn on_orientation_sample(&mut self, yaw_radians: f64) {
        self.heading.on_orientation_sample(yaw_radians);
    }

    /// One step at the current heading. `None` while idle.
    pub fn on_step_tick(&mut self) -> Option<DisplayUpdate> {
        if !self.session.record_step(self.heading.heading_radians()) {
            return None;
        }
        Some(DisplayUpdate::Progress(
            self.session.progress(self.config.preview_points),
        ))
    }

    fn on_step_counter(&mut self, cumulative_count: u64) -> Option<DisplayUpdate> {
        let recorded = self.session.record_counter(
            cumulative_count,
            self.config.step_counter_policy,
            self.config.max_counter_delta,
            self.heading.heading_radians(),
        );
        if recorded == 0 {
            return None;
        }
        Some(DisplayUpdate::Progress(
            self.session.progress(self.config.preview_points),
        ))
    }

    /// End the session and produce the area display. `None` while idle.
    pub fn stop(&mut self) -> Option<DisplayUpdate> {
        self.session.finish().map(DisplayUpdate::Area)
    }

    pub fn heading_radians(&self) -> f64 {
        self.heading.heading_radians()
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn summary(&self) -> SessionSummary {
        self.session.summary()
    }
}

impl Default for AreaEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StepCounterPolicy;
    use crate::display::PATH_TOO_SMALL_MESSAGE;
    use crate::geometry::Point;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn progress(update: Option<DisplayUpdate>) -> crate::display::ProgressDisplay {
        match update {
            Some(DisplayUpdate::Progress(p)) => p,
            other => panic!("expected progress, got {:?}", other),
        }
    }

    fn area(update: Option<DisplayUpdate>) -> crate::display::AreaDisplay {
        match update {
            Some(DisplayUpdate::Area(a)) => a,
            other => panic!("expected area, got {:?}", other),
        }
    }

    #[test]
    fn test_start_emits_empty_progress() {
        let mut engine = AreaEngine::default();
        let display = progress(Some(engine.start("0.8")));
        assert_eq!(display.step_count, "Steps: 0");
        assert_eq!(display.distance, "Distance: 0.00 m");
        assert_eq!(display.path_preview, "(0.0, 0.0)\n");
        assert_eq!(engine.state(), SessionState::Collecting);
    }

    #[test]
    fn test_unparseable_stride_uses_default() {
        let mut engine = AreaEngine::default();
        engine.start("abc");
        assert_eq!(engine.session().stride_m(), 0.75);
    }

    #[test]
    fn test_idle_events_are_noops() {
        let mut engine = AreaEngine::default();
        assert!(engine.on_step_tick().is_none());
        assert!(engine.stop().is_none());
        assert!(engine
            .handle(MotionEvent::StepCounterChanged { cumulative_count: 3 })
            .is_none());
        assert_eq!(engine.session().steps(), 0);
        assert_eq!(engine.state(), SessionState::Idle);
    }

    #[test]
    fn test_step_detector_value_filter() {
        let mut engine = AreaEngine::default();
        engine.start("1.0");
        assert!(engine
            .handle(MotionEvent::StepDetected { value: 0.0 })
            .is_none());
        let display = progress(engine.handle(MotionEvent::StepDetected { value: 1.0 }));
        assert_eq!(display.step_count, "Steps: 1");
    }

    #[test]
    fn test_heading_used_at_tick_time() {
        let mut engine = AreaEngine::default();
        engine.start("2");
        engine.handle(MotionEvent::Orientation { yaw_radians: FRAC_PI_2 });
        engine.on_step_tick();
        engine.handle(MotionEvent::Orientation { yaw_radians: 0.0 });
        engine.on_step_tick();

        let last = *engine.session().path().last().unwrap();
        assert_relative_eq!(last.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(last.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_four_steps_east_display() {
        let mut engine = AreaEngine::default();
        engine.start("1.0");
        let mut last = None;
        for _ in 0..4 {
            last = engine.handle(MotionEvent::StepDetected { value: 1.0 });
        }
        let display = progress(last);
        assert_eq!(display.distance, "Distance: 4.00 m");
        let expected: Vec<Point> = (0..=4).map(|i| Point::new(i as f64, 0.0)).collect();
        assert_eq!(engine.session().path().points(), expected.as_slice());
    }

    #[test]
    fn test_preview_keeps_last_ten_points() {
        let mut engine = AreaEngine::default();
        engine.start("1");
        let mut last = None;
        for _ in 0..12 {
            last = engine.on_step_tick();
        }
        let display = progress(last);
        let lines: Vec<&str> = display.path_preview.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "(3.0, 0.0)");
        assert_eq!(lines[9], "(12.0, 0.0)");
    }

    #[test]
    fn test_full_walk_via_events() {
        let mut engine = AreaEngine::default();
        let events = vec![
            MotionEvent::StartSession {
                stride_length_text: "5".to_string(),
            },
            MotionEvent::Orientation { yaw_radians: 0.0 },
            MotionEvent::StepDetected { value: 1.0 },
            MotionEvent::StepDetected { value: 1.0 },
            MotionEvent::Orientation { yaw_radians: FRAC_PI_2 },
            MotionEvent::StepDetected { value: 1.0 },
            MotionEvent::StepDetected { value: 1.0 },
            MotionEvent::Orientation {
                yaw_radians: std::f64::consts::PI,
            },
            MotionEvent::StepDetected { value: 1.0 },
            MotionEvent::StepDetected { value: 1.0 },
        ];
        for event in events {
            engine.handle(event);
        }

        let result = area(engine.handle(MotionEvent::StopSession));
        assert_relative_eq!(result.result.unwrap().square_meters, 100.0, epsilon = 1e-9);
        assert!(result.text.starts_with("Sq. Meters: 100.00\n"));
        assert_eq!(engine.state(), SessionState::Idle);

        // Second stop does nothing
        assert!(engine.handle(MotionEvent::StopSession).is_none());
    }

    #[test]
    fn test_too_small_walk() {
        let mut engine = AreaEngine::default();
        engine.start("1");
        engine.on_step_tick();
        let result = area(engine.stop());
        assert_eq!(result.text, PATH_TOO_SMALL_MESSAGE);
    }

    #[test]
    fn test_counter_policy_from_config() {
        let mut engine = AreaEngine::new(EngineConfig {
            step_counter_policy: StepCounterPolicy::CumulativeDelta,
            ..EngineConfig::default()
        });
        engine.start("1");
        assert!(engine
            .handle(MotionEvent::StepCounterChanged { cumulative_count: 40 })
            .is_none());
        let display = progress(engine.handle(MotionEvent::StepCounterChanged {
            cumulative_count: 42,
        }));
        assert_eq!(display.step_count, "Steps: 2");

        let mut every = AreaEngine::default();
        every.start("1");
        every.handle(MotionEvent::StepCounterChanged { cumulative_count: 40 });
        every.handle(MotionEvent::StepCounterChanged { cumulative_count: 40 });
        assert_eq!(every.session().steps(), 2);
    }

    #[test]
    fn test_rotation_vector_event_updates_heading() {
        let mut engine = AreaEngine::default();
        let half = (FRAC_PI_2 / 2.0).sin();
        engine.handle(MotionEvent::RotationVector {
            values: vec![0.0, 0.0, half, (FRAC_PI_2 / 2.0).cos()],
        });
        assert_relative_eq!(engine.heading_radians(), -FRAC_PI_2, epsilon = 1e-9);
    }

    #[test]
    fn test_heading_survives_restart() {
        let mut engine = AreaEngine::default();
        engine.on_orientation_sample(1.25);
        engine.start("1");
        assert_eq!(engine.heading_radians(), 1.25);
    }
}
