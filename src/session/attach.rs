//! Attach/detach session orchestration

use crate::core::types::AttachError;
use crate::memory::{resolve_region, MemoryContext, MemorySource};
use crate::profile::{GameProfile, TargetProfile};
use crate::record::{MemoryDataContainer, StatRecord, TypedRecord};
use crate::session::refresh::{LoopState, RefreshLoop, FRAME_INTERVAL};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// One live attach session: resolved context, guarded record, refresh loop.
///
/// Created by [`attach`]; torn down by [`Session::detach`] or, implicitly,
/// by dropping the session (the loop observes its cancel channel closing).
/// The process handle and every region stream are owned by the session's
/// context and released on every exit path before the same target can be
/// attached again.
pub struct Session {
    context: Option<Arc<MemoryContext>>,
    container: Option<Arc<MemoryDataContainer>>,
    refresh: Option<RefreshLoop>,
    states: watch::Receiver<LoopState>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("attached", &self.context.is_some())
            .field("has_container", &self.container.is_some())
            .field("has_refresh", &self.refresh.is_some())
            .field("state", &*self.states.borrow())
            .finish()
    }
}

/// Attaches the engine to an already-opened target process.
///
/// Resolves every region of the target profile (optional regions that fail
/// to resolve are skipped with a log line), builds the context, binds the
/// game's offset dictionary into a record, and starts the refresh loop at
/// one tick per frame. Must be called within a tokio runtime.
pub fn attach(
    source: impl MemorySource + 'static,
    target: &TargetProfile,
    game: &GameProfile,
) -> Result<Session, AttachError> {
    if source.pointer_width() != target.pointer_width {
        return Err(AttachError::Architecture {
            expected: target.pointer_width.to_string(),
            actual: source.pointer_width().to_string(),
        });
    }

    let source: Arc<dyn MemorySource> = Arc::new(source);

    let mut resolved = Vec::new();
    for region in &target.regions {
        match resolve_region(&source, region) {
            Ok(r) => resolved.push(r),
            Err(e) if region.optional => {
                warn!(region = %region.name, error = %e, "skipping optional region");
            }
            Err(e) => {
                return Err(AttachError::Region {
                    region: region.name.clone(),
                    source: e,
                });
            }
        }
    }
    if resolved.is_empty() {
        return Err(AttachError::NoRegions(target.name.clone()));
    }

    let context = Arc::new(
        MemoryContext::new(source, resolved)
            .map_err(|e| AttachError::InvalidProfile(e.to_string()))?,
    );

    let table = game.offsets(target.kind).ok_or_else(|| {
        AttachError::UnsupportedTarget {
            profile: game.name.clone(),
            kind: target.kind.to_string(),
        }
    })?;

    let mut record = StatRecord::bind(context.clone(), table.clone())
        .map_err(|e| AttachError::InvalidProfile(e.to_string()))?;

    // First pass up front so attach surfaces unreadable profiles
    // synchronously instead of as an immediate tick fault
    record.refresh().map_err(AttachError::InitialRead)?;

    let container = Arc::new(MemoryDataContainer::new(Box::new(record)));
    let refresh = RefreshLoop::spawn(container.clone(), FRAME_INTERVAL);
    let states = refresh.states();

    info!(
        target = %target.name,
        game = %game.name,
        regions = context.regions().len(),
        "attached"
    );

    Ok(Session {
        context: Some(context),
        container: Some(container),
        refresh: Some(refresh),
        states,
    })
}

impl Session {
    /// Shared access point for presentation collaborators; `None` once
    /// detached
    pub fn container(&self) -> Option<Arc<MemoryDataContainer>> {
        self.container.clone()
    }

    /// True until [`Session::detach`] has run
    pub fn is_attached(&self) -> bool {
        self.context.is_some()
    }

    /// Subscription to the refresh loop's state transitions; the terminal
    /// `Stopped` state carries the detach reason
    pub fn states(&self) -> watch::Receiver<LoopState> {
        self.states.clone()
    }

    /// Current loop state
    pub fn state(&self) -> LoopState {
        self.states.borrow().clone()
    }

    /// Tears the session down: cancels the refresh loop, waits for it to
    /// stop, and releases the context with all its stream handles.
    ///
    /// Safe to call multiple times, from the foreground or after a faulted
    /// loop, and effective even when the target has already exited (stream
    /// operations on a dead handle fail fast rather than blocking).
    pub async fn detach(&mut self) {
        if let Some(refresh) = self.refresh.take() {
            refresh.shutdown().await;
        }
        self.container = None;
        if self.context.take().is_some() {
            info!("detached");
        }
    }
}
