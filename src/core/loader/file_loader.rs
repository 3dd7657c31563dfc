//=========================================================================
// File Loader
//=========================================================================
//
// Filesystem-backed loader with one worker thread per started queue.
//
// Architecture:
// ```text
//  Main Thread:                          Worker Thread:
//  ┌─────────────────────────────┐      ┌──────────────────────┐
//  │ FileLoader::create_queue()  │      │                      │
//  │   ↓                         │      │                      │
//  │ FileLoadQueue (requests,    │      │                      │
//  │   plugins, handlers)        │      │                      │
//  │   ↓ load()                  │      │  fs::read() × N      │
//  │ InFlightBatch ◄─────────────┼──────┤  LoadEvent per file  │
//  │   ↓ FileLoader::pump()      │      └──────────────────────┘
//  │ AssetStore + handlers       │        bounded channel
//  └─────────────────────────────┘
// ```
//
// Scene state never leaves the main thread: the worker only sees paths
// and sends bytes back.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::thread;

use crossbeam_channel::{bounded, Sender};
use log::{debug, error, info, trace};

//=== Internal Dependencies ===============================================

use super::event_pump::{InFlightBatch, LoadEvent, PumpControl};
use super::{
    AssetRequest, AssetStore, CompleteHandler, LoadQueue, LoaderFactory, LoaderPlugin,
    ProgressHandler,
};

type InFlight = Rc<RefCell<Vec<InFlightBatch>>>;

//=== FileLoader ==========================================================

/// Loads asset files from disk relative to a base path.
///
/// Events are only delivered when [`LoaderFactory::pump`] is called, which
/// the [`Stage`](crate::Stage) does once per frame in its run loops.
///
/// # Default Values
///
/// - **Channel capacity**: 64 events per batch
pub struct FileLoader {
    base_path: PathBuf,
    channel_capacity: usize,
    in_flight: InFlight,
}

impl FileLoader {
    /// Creates a loader resolving relative request paths against `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            channel_capacity: 64,
            in_flight: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Sets the worker → main thread channel capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Number of started batches whose completion has not fired yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.borrow().len()
    }
}

impl LoaderFactory for FileLoader {
    fn create_queue(&self) -> Box<dyn LoadQueue> {
        Box::new(FileLoadQueue {
            base_path: self.base_path.clone(),
            channel_capacity: self.channel_capacity,
            plugins: Vec::new(),
            requests: Vec::new(),
            store: AssetStore::new(),
            progress_handlers: Vec::new(),
            complete_handlers: Vec::new(),
            in_flight: Rc::clone(&self.in_flight),
        })
    }

    fn pump(&self) -> usize {
        // Handlers may start new batches; never hold the borrow while they run.
        let batches = std::mem::take(&mut *self.in_flight.borrow_mut());

        let mut completed = 0;
        let mut pending = Vec::with_capacity(batches.len());
        for mut batch in batches {
            match batch.collect() {
                PumpControl::Complete => completed += 1,
                PumpControl::Pending => pending.push(batch),
            }
        }

        self.in_flight.borrow_mut().extend(pending);

        if completed > 0 {
            debug!(target: "loader", "{} load batch(es) completed", completed);
        }
        completed
    }
}

//=== FileLoadQueue =======================================================

/// A not-yet-started batch of file requests.
pub struct FileLoadQueue {
    base_path: PathBuf,
    channel_capacity: usize,
    plugins: Vec<LoaderPlugin>,
    requests: Vec<AssetRequest>,
    store: AssetStore,
    progress_handlers: Vec<ProgressHandler>,
    complete_handlers: Vec<CompleteHandler>,
    in_flight: InFlight,
}

impl FileLoadQueue {
    /// Requests queued so far, with resolved paths and kinds.
    pub fn requests(&self) -> &[AssetRequest] {
        &self.requests
    }
}

impl LoadQueue for FileLoadQueue {
    fn install_plugin(&mut self, plugin: LoaderPlugin) {
        if !self.plugins.contains(&plugin) {
            trace!(target: "loader", "Installed plugin {:?}", plugin);
            self.plugins.push(plugin);
        }
    }

    fn has_plugin(&self, plugin: LoaderPlugin) -> bool {
        self.plugins.contains(&plugin)
    }

    fn load_file(&mut self, request: AssetRequest) {
        let sound_enabled = self.has_plugin(LoaderPlugin::Sound);
        let request = request.resolve(&self.base_path, sound_enabled);
        trace!(
            target: "loader",
            "Queued '{}' ({:?}) from {}",
            request.id(),
            request.kind(),
            request.src().display()
        );
        self.requests.push(request);
    }

    fn len(&self) -> usize {
        self.requests.len()
    }

    fn assets(&self) -> AssetStore {
        self.store.clone()
    }

    fn on_progress(&mut self, handler: ProgressHandler) {
        self.progress_handlers.push(handler);
    }

    fn on_complete(&mut self, handler: CompleteHandler) {
        self.complete_handlers.push(handler);
    }

    fn load(self: Box<Self>) {
        let FileLoadQueue {
            channel_capacity,
            requests,
            store,
            progress_handlers,
            complete_handlers,
            in_flight,
            ..
        } = *self;

        let total = requests.len();
        let (sender, receiver) = bounded(channel_capacity);

        if total > 0 {
            let spawned = thread::Builder::new()
                .name("stagehand-loader".to_string())
                .spawn(move || read_requests(requests, sender));

            // A failed spawn drops the sender; the pump then settles the batch.
            if let Err(e) = spawned {
                error!(target: "loader", "Loader worker could not be spawned: {}", e);
            }
        }

        info!(target: "loader", "Load batch started ({} files)", total);

        in_flight.borrow_mut().push(InFlightBatch::new(
            receiver,
            total,
            store,
            progress_handlers,
            complete_handlers,
        ));
    }
}

//=== Worker ==============================================================

/// Reads every request in order and reports each outcome.
///
/// Stops early if the main thread dropped the batch.
fn read_requests(requests: Vec<AssetRequest>, sender: Sender<LoadEvent>) {
    for request in requests {
        let (id, src, kind) = request.into_parts();

        let event = match fs::read(&src) {
            Ok(bytes) => LoadEvent::Loaded { id, kind, bytes },
            Err(e) => LoadEvent::Failed {
                id,
                src,
                reason: e.to_string(),
            },
        };

        if sender.send(event).is_err() {
            break;
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
