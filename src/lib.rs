// Offline Land Area engine
// Dead-reckons a walked loop from step and heading events and reports its area.
// Exposed to the Android app via JNI; usable directly from Rust.

pub mod android_jni;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod events;
pub mod geometry;
pub mod heading;
pub mod session;
pub mod units;
pub mod worker;

pub use config::{EngineConfig, StepCounterPolicy};
pub use display::{AreaDisplay, DisplayUpdate, ProgressDisplay};
pub use engine::AreaEngine;
pub use error::{AreaEngineError, EngineResult};
pub use events::{is_step_payload, preferred_step_source, MotionEvent, StepSource};
pub use geometry::{shoelace_area, signed_shoelace_area, Path, Point};
pub use heading::HeadingTracker;
pub use session::{Session, SessionState, SessionSummary};
pub use units::AreaResult;
pub use worker::EngineWorker;
