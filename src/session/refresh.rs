//! Cancellable periodic refresh of a memory data container

use crate::core::types::ProbeError;
use crate::record::MemoryDataContainer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// One game frame at 60 Hz
pub const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// Why a refresh loop came to rest
#[derive(Debug, Clone)]
pub enum DetachReason {
    /// External cancellation (the detach gesture)
    Requested,
    /// The target went away; expected, not an error
    ProcessExited,
    /// A tick faulted with something other than process exit
    Fault(Arc<ProbeError>),
}

/// Observable life cycle of the refresh loop
#[derive(Debug, Clone)]
pub enum LoopState {
    Idle,
    Running,
    Cancelled,
    Faulted(Arc<ProbeError>),
    Stopped(DetachReason),
}

impl LoopState {
    pub fn is_running(&self) -> bool {
        matches!(self, LoopState::Running)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, LoopState::Stopped(_))
    }
}

/// Background task that re-serializes the bound record at a fixed cadence.
///
/// Ticks never overlap: a slow `update()` simply delays the next tick.
/// Cancellation is observed before the next tick begins, so the loop reaches
/// `Stopped` within one tick interval plus any in-flight update. Every
/// failure inside the loop is caught here and converted into a terminal
/// state; nothing propagates to other tasks.
pub struct RefreshLoop {
    cancel: watch::Sender<bool>,
    states: watch::Receiver<LoopState>,
    handle: JoinHandle<()>,
}

impl RefreshLoop {
    /// Starts ticking immediately. Must be called within a tokio runtime.
    pub fn spawn(container: Arc<MemoryDataContainer>, interval: Duration) -> Self {
        let (cancel, mut cancelled) = watch::channel(false);
        let (state_tx, states) = watch::channel(LoopState::Idle);

        let handle = tokio::spawn(async move {
            let _ = state_tx.send(LoopState::Running);
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let reason = loop {
                tokio::select! {
                    biased;
                    // Also taken when the loop handle is dropped without an
                    // explicit shutdown (the sender side goes away)
                    _ = cancelled.changed() => {
                        let _ = state_tx.send(LoopState::Cancelled);
                        break DetachReason::Requested;
                    }
                    _ = ticker.tick() => {
                        match container.update() {
                            Ok(()) => {}
                            Err(e) if e.is_process_exited() => {
                                debug!("target process exited, stopping refresh loop");
                                break DetachReason::ProcessExited;
                            }
                            Err(e) => {
                                warn!(error = %e, "refresh tick faulted");
                                let e = Arc::new(e);
                                let _ = state_tx.send(LoopState::Faulted(e.clone()));
                                break DetachReason::Fault(e);
                            }
                        }
                    }
                }
            };
            let _ = state_tx.send(LoopState::Stopped(reason));
        });

        RefreshLoop {
            cancel,
            states,
            handle,
        }
    }

    /// Current loop state
    pub fn state(&self) -> LoopState {
        self.states.borrow().clone()
    }

    /// Subscription to state transitions
    pub fn states(&self) -> watch::Receiver<LoopState> {
        self.states.clone()
    }

    /// Requests cancellation; observed before the next tick begins
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    /// Cancels and waits for the loop to reach its terminal state
    pub async fn shutdown(self) {
        let _ = self.cancel.send(true);
        let _ = self.handle.await;
    }
}
