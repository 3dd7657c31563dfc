//=========================================================================
// Asset Loading
//=========================================================================
//
// Boundary between scenes and the asset loader.
//
// Architecture:
//   LoaderFactory ──create_queue()──> LoadQueue (one per preload cycle)
//                                       ├─ install_plugin(Sound)
//                                       ├─ load_file(AssetRequest) × N  (scenes)
//                                       ├─ on_progress / on_complete   (coordinator)
//                                       └─ load(self)  → owned by the loader
//   LoaderFactory::pump()  → progress/complete handlers on the main thread
//
// A queue is consumed by `load()`, so it can never be reused across cycles.
//
//=========================================================================

//=== Module Declarations =================================================

mod asset_store;
mod event_pump;
mod file_loader;
mod request;

//=== Public API ==========================================================

pub use asset_store::{AssetStore, LoadedAsset};
pub use file_loader::{FileLoadQueue, FileLoader};
pub use request::{AssetKind, AssetRequest, LoaderPlugin};

//=== ProgressEvent =======================================================

/// Raw progress of a load queue.
///
/// `loaded` counts settled requests (loaded or failed) out of `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub loaded: usize,
    pub total: usize,
}

impl ProgressEvent {
    pub fn new(loaded: usize, total: usize) -> Self {
        Self { loaded, total }
    }

    /// Fraction settled, in `[0, 1]`. An empty queue counts as done.
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            (self.loaded.min(self.total) as f32) / (self.total as f32)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.loaded >= self.total
    }
}

//=== Handlers ============================================================

/// Called for every progress event of one queue.
pub type ProgressHandler = Box<dyn FnMut(&ProgressEvent)>;

/// Called once when every request of one queue has settled.
pub type CompleteHandler = Box<dyn FnOnce()>;

//=== LoadQueue Trait =====================================================

/// A single batch of asset requests.
///
/// Scenes add requests through [`Scene::preload`](crate::core::scene::Scene::preload);
/// the preload coordinator registers handlers and starts the batch.
pub trait LoadQueue {
    /// Registers a content-type plugin. Must happen before requests are added.
    fn install_plugin(&mut self, plugin: LoaderPlugin);

    fn has_plugin(&self, plugin: LoaderPlugin) -> bool;

    /// Adds a request to the batch.
    fn load_file(&mut self, request: AssetRequest);

    /// Number of requests added so far.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Where results of this queue become readable once loaded.
    ///
    /// Scenes keep a clone to read their assets after completion.
    fn assets(&self) -> AssetStore;

    fn on_progress(&mut self, handler: ProgressHandler);

    fn on_complete(&mut self, handler: CompleteHandler);

    /// Starts loading. Ownership passes to the loader; handlers are dropped
    /// after the completion handlers have run.
    fn load(self: Box<Self>);
}

//=== LoaderFactory Trait =================================================

/// Source of fresh load queues.
pub trait LoaderFactory {
    /// Creates an empty queue for one preload cycle.
    fn create_queue(&self) -> Box<dyn LoadQueue>;

    /// Delivers pending loader events on the calling thread.
    ///
    /// Returns the number of batches that completed during this call.
    /// Loaders that deliver events by other means keep the default.
    fn pump(&self) -> usize {
        0
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_fraction() {
        assert_eq!(ProgressEvent::new(1, 4).progress(), 0.25);
        assert_eq!(ProgressEvent::new(4, 4).progress(), 1.0);
        assert!(ProgressEvent::new(4, 4).is_complete());
        assert!(!ProgressEvent::new(3, 4).is_complete());
    }

    #[test]
    fn empty_queue_progress_is_done() {
        let event = ProgressEvent::new(0, 0);
        assert_eq!(event.progress(), 1.0);
        assert!(event.is_complete());
    }
}
