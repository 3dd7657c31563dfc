//=========================================================================
// Preload Coordinator
//=========================================================================
//
// Loads every not-yet-preloaded scene of a batch under one load queue.
//
// Flow:
//   batch → [needs preload?] ─no──> primary.init()
//                │
//               yes
//                ↓
//   create_queue() + Sound plugin → scene.preload(queue) × N
//                ↓
//   on_progress → primary.on_preload_progress(event)
//   on_complete → primary.on_preload_complete(batch)
//                ↓
//   queue.load()  (ownership moves to the loader)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use crate::core::loader::{LoadQueue, LoaderFactory, LoaderPlugin, ProgressEvent};
use crate::core::scene::PreloadBatch;

//=== PreloadOutcome ======================================================

/// What a preload cycle did with its batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloadOutcome {
    /// Nothing needed loading; the primary scene's `init()` already ran.
    Initialized,

    /// A load queue was started for this many scenes. The primary scene is
    /// notified through its completion hook later.
    Loading { pending_scenes: usize },
}

//=== PreloadCoordinator ==================================================

/// Drives one preload cycle per call to [`run`](Self::run).
pub struct PreloadCoordinator<'a> {
    loader: &'a dyn LoaderFactory,
}

impl<'a> PreloadCoordinator<'a> {
    pub fn new(loader: &'a dyn LoaderFactory) -> Self {
        Self { loader }
    }

    /// Preloads the batch, or initializes the primary if nothing is pending.
    ///
    /// The queue is only created once a scene actually needs it, so a fully
    /// preloaded batch never touches the loader.
    pub fn run(&self, batch: PreloadBatch) -> PreloadOutcome {
        trace!(target: "preload", "PreloadCoordinator::run({:?})", batch);

        let mut queue: Option<Box<dyn LoadQueue>> = None;
        let mut pending_scenes = 0;

        for entry in batch.iter() {
            let mut scene = entry.scene().borrow_mut();
            if scene.is_preloaded() {
                debug!(target: "preload", "'{}' already preloaded, skipping", entry.name());
                continue;
            }

            let shared = queue.get_or_insert_with(|| self.fresh_queue());
            scene.preload(shared.as_mut());
            pending_scenes += 1;
        }

        let Some(mut queue) = queue else {
            debug!(target: "preload", "Nothing to preload, initializing '{}'", batch.primary().name());
            batch.primary().scene().borrow_mut().init();
            return PreloadOutcome::Initialized;
        };

        let primary = Rc::clone(batch.primary().scene());
        let progress_target = Rc::clone(&primary);

        queue.on_progress(Box::new(move |event: &ProgressEvent| {
            progress_target.borrow_mut().on_preload_progress(event);
        }));
        queue.on_complete(Box::new(move || {
            primary.borrow_mut().on_preload_complete(&batch);
        }));

        debug!(
            target: "preload",
            "Loading {} file(s) for {} scene(s)",
            queue.len(),
            pending_scenes
        );
        queue.load();

        PreloadOutcome::Loading { pending_scenes }
    }

    fn fresh_queue(&self) -> Box<dyn LoadQueue> {
        let mut queue = self.loader.create_queue();
        queue.install_plugin(LoaderPlugin::Sound);
        queue
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
