//=========================================================================
// Scene System
//=========================================================================
//
// Scene capability contract and the shared handle type.
//
// Architecture:
//   SceneRegistry
//     └─ scenes: HashMap<String, SceneHandle>
//   PreloadBatch
//     └─ entries: Vec<(name, SceneHandle)>   primary first
//
// Flow:
//   register() → resolve_batch() → PreloadCoordinator → Stage::frame() → Scene::tick()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use crate::core::loader::{LoadQueue, ProgressEvent};

//=== Module Declarations =================================================

mod batch;
mod registry;

//=== Public API ==========================================================

pub use batch::{BatchEntry, PreloadBatch};
pub use registry::SceneRegistry;

/// Shared, single-threaded handle to a registered scene.
///
/// The registry, the stage's active pointer and in-flight preload batches
/// all hold clones of the same handle.
pub type SceneHandle = Rc<RefCell<dyn Scene>>;

/// Wraps a concrete scene into a [`SceneHandle`].
pub fn into_handle<T: Scene + 'static>(scene: T) -> SceneHandle {
    Rc::new(RefCell::new(scene))
}

//=== Scene Trait =========================================================

/// A pluggable unit of content with ticking, initialization and
/// preloading hooks.
///
/// # Minimal Implementation
///
/// Only `tick()` is required. A scene that keeps the defaults is not yet
/// preloaded, so activating it runs an empty load batch whose completion
/// calls `init()`:
///
/// ```rust
/// # use stagehand::prelude::*;
/// struct Title;
///
/// impl Scene for Title {
///     fn tick(&mut self) {
///         // advance one frame
///     }
/// }
/// ```
///
/// Return `true` from `is_preloaded` to skip the loader and have `init()`
/// run synchronously on activation.
///
/// # Scenes with assets
///
/// Override `preload`, and `on_preload_complete` to pick up the results.
/// Report `is_preloaded` once the assets are in, or every activation loads
/// them again. The completion hook runs on the primary scene of the batch
/// while that scene is mutably borrowed; use [`PreloadBatch::companions`]
/// to reach the other scenes loaded alongside it.
pub trait Scene {
    /// Called once per frame while this scene is active.
    fn tick(&mut self);

    /// Called when activation needed no preloading at all.
    ///
    /// Default implementation does nothing.
    fn init(&mut self) {}

    /// Adds this scene's asset requests to the shared load queue.
    ///
    /// Default implementation requests nothing.
    fn preload(&mut self, _queue: &mut dyn LoadQueue) {}

    /// Whether this scene's assets are already available.
    ///
    /// Preloaded scenes are never asked to preload again. Defaults to
    /// `false`, so `preload` always runs for scenes that don't track it.
    fn is_preloaded(&self) -> bool {
        false
    }

    /// Receives loader progress, forwarded unmodified, for the batch this
    /// scene is primary of.
    fn on_preload_progress(&mut self, _event: &ProgressEvent) {}

    /// Called once when every request of the batch has settled.
    ///
    /// Default implementation calls `init()`.
    fn on_preload_complete(&mut self, _batch: &PreloadBatch) {
        self.init();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::AssetStore;

    struct Counter {
        ticks: u32,
        inits: u32,
    }

    impl Scene for Counter {
        fn tick(&mut self) {
            self.ticks += 1;
        }

        fn init(&mut self) {
            self.inits += 1;
        }
    }

    #[test]
    fn defaults_report_not_preloaded() {
        let scene = Counter { ticks: 0, inits: 0 };
        assert!(!scene.is_preloaded());
    }

    #[test]
    fn default_completion_calls_init() {
        let handle = into_handle(Counter { ticks: 0, inits: 0 });
        let batch = PreloadBatch::new("counter", Rc::clone(&handle));

        let mut counter = Counter { ticks: 0, inits: 0 };
        counter.on_preload_complete(&batch);
        assert_eq!(counter.inits, 1);
    }

    #[test]
    fn default_preload_requests_nothing() {
        use crate::testing::RecordingQueue;

        let mut queue = RecordingQueue::detached(AssetStore::new());
        let mut counter = Counter { ticks: 0, inits: 0 };
        counter.preload(&mut queue);
        assert!(queue.is_empty());
        counter.tick();
        assert_eq!(counter.ticks, 1);
    }
}
