//! Single-consumer event queue in front of the engine.
//!
//! Sensor callbacks arrive on independent platform threads. They only
//! enqueue; one worker thread owns the [`AreaEngine`] and applies events in
//! arrival order, publishing display updates on a second channel.
//!
//! The update channel holds at most [`UPDATE_BACKLOG`] snapshots. When the
//! host falls behind, the oldest snapshot is discarded so the newest one
//! (including the final area) is always delivered.

use crate::config::EngineConfig;
use crate::display::DisplayUpdate;
use crate::engine::AreaEngine;
use crate::error::{AreaEngineError, EngineResult};
use crate::events::MotionEvent;
use crossbeam::channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use std::thread::{self, JoinHandle};

/// Display updates kept while the host is not draining `updates()`
pub const UPDATE_BACKLOG: usize = 64;

pub struct EngineWorker {
    events: Option<Sender<MotionEvent>>,
    updates: Receiver<DisplayUpdate>,
    handle: Option<JoinHandle<AreaEngine>>,
}

impl EngineWorker {
    /// Spawn the worker thread with a fresh engine
    pub fn spawn(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let (event_tx, event_rx) = unbounded::<MotionEvent>();
        let (update_tx, update_rx) = bounded::<DisplayUpdate>(UPDATE_BACKLOG);
        let backlog = update_rx.clone();

        let handle = thread::Builder::new()
            .name("area-engine".to_string())
            .spawn(move || run(AreaEngine::new(config), event_rx, update_tx, backlog))
            .map_err(|e| AreaEngineError::Internal(format!("Failed to spawn worker: {}", e)))?;

        Ok(Self {
            events: Some(event_tx),
            updates: update_rx,
            handle: Some(handle),
        })
    }

    /// Queue an event for the engine
    pub fn submit(&self, event: MotionEvent) -> EngineResult<()> {
        let sender = self.events.as_ref().ok_or(AreaEngineError::WorkerStopped)?;
        sender
            .send(event)
            .map_err(|_| AreaEngineError::WorkerStopped)
    }

    /// A cloneable handle for another sensor thread
    pub fn sender(&self) -> EngineResult<Sender<MotionEvent>> {
        self.events.clone().ok_or(AreaEngineError::WorkerStopped)
    }

    pub fn updates(&self) -> &Receiver<DisplayUpdate> {
        &self.updates
    }

    /// Close the queue, wait for pending events and hand back the engine.
    ///
    /// Every cloned sender must be dropped first, or this blocks. Dropping
    /// the worker instead detaches the thread; it exits once the last sender
    /// is gone.
    pub fn shutdown(mut self) -> EngineResult<AreaEngine> {
        self.events.take();
        let handle = self
            .handle
            .take()
            .ok_or_else(|| AreaEngineError::Internal("Worker already joined".to_string()))?;
        handle
            .join()
            .map_err(|_| AreaEngineError::Internal("Worker thread panicked".to_string()))
    }
}

fn run(
    mut engine: AreaEngine,
    events: Receiver<MotionEvent>,
    updates: Sender<DisplayUpdate>,
    backlog: Receiver<DisplayUpdate>,
) -> AreaEngine {
    let mut processed = 0u64;
    for event in events.iter() {
        processed += 1;
        if let Some(update) = engine.handle(event) {
            publish(&updates, &backlog, update);
        }
    }
    log::debug!("Engine worker exiting after {} events", processed);
    engine
}

/// Send without blocking, evicting the oldest queued update when full
fn publish(
    updates: &Sender<DisplayUpdate>,
    backlog: &Receiver<DisplayUpdate>,
    update: DisplayUpdate,
) {
    let mut pending = update;
    loop {
        match updates.try_send(pending) {
            Ok(()) | Err(TrySendError::Disconnected(_)) => return,
            Err(TrySendError::Full(rejected)) => {
                let _ = backlog.try_recv();
                pending = rejected;
            }
        }
    }
}
