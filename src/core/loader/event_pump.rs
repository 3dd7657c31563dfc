//=========================================================================
// Loader Event Pump
//=========================================================================
//
// Main-thread side of an in-flight load batch.
//
// Architecture:
//   worker thread ──LoadEvent──> Receiver ──collect()──> AssetStore
//                                               ├─> progress handlers
//                                               └─> complete handlers (once)
//
// Bounded draining per call keeps a large batch from stalling a frame.
// A disconnected worker settles whatever was still outstanding so the
// completion handlers always run.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;
use std::sync::Arc;

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, error, warn};

//=== Internal Dependencies ===============================================

use super::{AssetKind, AssetStore, CompleteHandler, LoadedAsset, ProgressEvent, ProgressHandler};

//=== LoadEvent ===========================================================

/// Messages sent from a loader worker to the main thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LoadEvent {
    Loaded {
        id: String,
        kind: AssetKind,
        bytes: Vec<u8>,
    },
    Failed {
        id: String,
        src: PathBuf,
        reason: String,
    },
}

//=== PumpControl =========================================================

/// State of a batch after one collection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PumpControl {
    Pending,
    Complete,
}

//=== InFlightBatch =======================================================

/// Collects worker events for one started load queue.
pub(crate) struct InFlightBatch {
    receiver: Receiver<LoadEvent>,
    total: usize,
    settled: usize,
    store: AssetStore,
    progress_handlers: Vec<ProgressHandler>,
    complete_handlers: Vec<CompleteHandler>,
}

impl InFlightBatch {
    const MAX_EVENTS_PER_PUMP: usize = 100;

    pub(crate) fn new(
        receiver: Receiver<LoadEvent>,
        total: usize,
        store: AssetStore,
        progress_handlers: Vec<ProgressHandler>,
        complete_handlers: Vec<CompleteHandler>,
    ) -> Self {
        Self {
            receiver,
            total,
            settled: 0,
            store,
            progress_handlers,
            complete_handlers,
        }
    }

    /// Drains pending worker events (bounded) and fires handlers.
    ///
    /// Returns `Complete` once every request has settled. Completion
    /// handlers only run on the first such call.
    pub(crate) fn collect(&mut self) -> PumpControl {
        let mut drained = 0;

        while drained < Self::MAX_EVENTS_PER_PUMP && self.settled < self.total {
            match self.receiver.try_recv() {
                Ok(event) => {
                    self.handle_event(event);
                    drained += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!(
                        target: "loader",
                        "Loader worker disconnected with {} of {} files unsettled",
                        self.total - self.settled,
                        self.total
                    );
                    self.settled = self.total;
                    self.fire_progress();
                    break;
                }
            }
        }

        if drained >= Self::MAX_EVENTS_PER_PUMP {
            debug!(target: "loader", "Load event backlog: drained {} events this pump", drained);
        }

        if self.settled >= self.total {
            self.finish();
            PumpControl::Complete
        } else {
            PumpControl::Pending
        }
    }

    pub(crate) fn progress(&self) -> ProgressEvent {
        ProgressEvent::new(self.settled, self.total)
    }

    //--- Internal Helpers -------------------------------------------------

    fn handle_event(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Loaded { id, kind, bytes } => {
                debug!(target: "loader", "Loaded '{}' ({:?}, {} bytes)", id, kind, bytes.len());
                self.store.insert(
                    id,
                    LoadedAsset {
                        kind,
                        bytes: Arc::from(bytes),
                    },
                );
            }
            LoadEvent::Failed { id, src, reason } => {
                error!(target: "loader", "Failed to load '{}' from {}: {}", id, src.display(), reason);
            }
        }

        self.settled += 1;
        self.fire_progress();
    }

    fn fire_progress(&mut self) {
        let event = self.progress();
        for handler in &mut self.progress_handlers {
            handler(&event);
        }
    }

    fn finish(&mut self) {
        // Unregister everything before running completion.
        self.progress_handlers.clear();
        for handler in self.complete_handlers.drain(..) {
            handler();
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
