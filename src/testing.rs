//=========================================================================
// Test Support
//=========================================================================
//
// Recording doubles for scenes, loaders and display hosts.
//
// Each double shares an `Rc<RefCell<...Log>>` with the test so calls can
// be asserted after the double was moved into a registry or stage.
//
//=========================================================================

use std::cell::{Ref, RefCell};
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::core::display::{DisplayHost, DisplaySurface};
use crate::core::loader::{
    AssetRequest, AssetStore, CompleteHandler, LoadQueue, LoaderFactory, LoaderPlugin,
    ProgressEvent, ProgressHandler,
};
use crate::core::scene::{into_handle, PreloadBatch, Scene, SceneHandle};
use crate::core::StageError;

//--- Logging -------------------------------------------------------------

/// A log record seen on the current thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CapturedLog {
    pub level: Level,
    pub target: String,
    pub message: String,
}

thread_local! {
    static CAPTURED: RefCell<Vec<CapturedLog>> = const { RefCell::new(Vec::new()) };
}

/// Records every log call per thread, then forwards to `env_logger`.
struct CapturingLogger {
    inner: env_logger::Logger,
}

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        CAPTURED.with(|captured| {
            captured.borrow_mut().push(CapturedLog {
                level: record.level(),
                target: record.target().to_string(),
                message: record.args().to_string(),
            })
        });
        if self.inner.matches(record) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Installs the capturing logger once per test binary.
pub(crate) fn init_logger() {
    let logger = CapturingLogger {
        inner: env_logger::builder().is_test(true).build(),
    };
    if log::set_logger(Box::leak(Box::new(logger))).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }
}

/// Drains the records logged on this thread at `level`.
pub(crate) fn take_logs(level: Level) -> Vec<CapturedLog> {
    CAPTURED.with(|captured| {
        let mut captured = captured.borrow_mut();
        let (matching, rest): (Vec<_>, Vec<_>) =
            captured.drain(..).partition(|log| log.level == level);
        *captured = rest;
        matching
    })
}

/// Per-test scratch directory under the system temp dir.
pub(crate) fn fixture_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("stagehand-tests")
        .join(format!("{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).expect("create fixture dir");
    dir
}

//=== RecordingScene ======================================================

#[derive(Debug, Default)]
pub(crate) struct SceneLog {
    pub ticks: u32,
    pub inits: u32,
    pub preloads: u32,
    pub progress: Vec<ProgressEvent>,
    pub completions: Vec<Vec<String>>,
}

pub(crate) type SharedSceneLog = Rc<RefCell<SceneLog>>;

/// Scene that records every lifecycle call.
///
/// Scenes with assets start unloaded and become preloaded on completion.
pub(crate) struct RecordingScene {
    preloaded: bool,
    assets: Vec<String>,
    log: SharedSceneLog,
}

impl RecordingScene {
    /// An already preloaded scene.
    pub(crate) fn new() -> (Self, SharedSceneLog) {
        let log = SharedSceneLog::default();
        let scene = Self {
            preloaded: true,
            assets: Vec::new(),
            log: Rc::clone(&log),
        };
        (scene, log)
    }

    /// A scene that requests `assets` when asked to preload.
    pub(crate) fn with_assets(assets: &[&str]) -> (Self, SharedSceneLog) {
        let (mut scene, log) = Self::new();
        scene.preloaded = false;
        scene.assets = assets.iter().map(|asset| asset.to_string()).collect();
        (scene, log)
    }

    pub(crate) fn handle() -> (SceneHandle, SharedSceneLog) {
        let (scene, log) = Self::new();
        (into_handle(scene), log)
    }

    pub(crate) fn with_assets_handle(assets: &[&str]) -> (SceneHandle, SharedSceneLog) {
        let (scene, log) = Self::with_assets(assets);
        (into_handle(scene), log)
    }
}

impl Scene for RecordingScene {
    fn tick(&mut self) {
        self.log.borrow_mut().ticks += 1;
    }

    fn init(&mut self) {
        self.log.borrow_mut().inits += 1;
    }

    fn preload(&mut self, queue: &mut dyn LoadQueue) {
        self.log.borrow_mut().preloads += 1;
        for asset in &self.assets {
            queue.load_file(AssetRequest::new(asset.clone(), asset.clone()));
        }
    }

    fn is_preloaded(&self) -> bool {
        self.preloaded
    }

    fn on_preload_progress(&mut self, event: &ProgressEvent) {
        self.log.borrow_mut().progress.push(*event);
    }

    fn on_preload_complete(&mut self, batch: &PreloadBatch) {
        let names = batch.names().into_iter().map(str::to_string).collect();
        self.log.borrow_mut().completions.push(names);
        self.preloaded = true;
    }
}

//=== RecordingLoader =====================================================

#[derive(Default)]
pub(crate) struct LoaderLog {
    pub queues_created: usize,
    pub loads_started: usize,
    pub pumps: usize,
    pub requests: Vec<String>,
    pub plugins: Vec<LoaderPlugin>,
    pub sound_enabled_at_request: Vec<bool>,
    progress_handlers: Vec<ProgressHandler>,
    complete_handlers: Vec<CompleteHandler>,
}

pub(crate) type SharedLoaderLog = Rc<RefCell<LoaderLog>>;

/// Loader whose queues record requests and park their handlers until the
/// test fires them.
#[derive(Clone)]
pub(crate) struct RecordingLoader {
    log: SharedLoaderLog,
}

impl RecordingLoader {
    pub(crate) fn new() -> (Self, SharedLoaderLog) {
        let log = SharedLoaderLog::default();
        (Self { log: Rc::clone(&log) }, log)
    }

    pub(crate) fn log(&self) -> Ref<'_, LoaderLog> {
        self.log.borrow()
    }

    pub(crate) fn fire_complete(&self) {
        Self::complete(&self.log);
    }

    /// Drops progress handlers, then runs every parked completion handler.
    pub(crate) fn complete(log: &SharedLoaderLog) {
        let complete = {
            let mut log = log.borrow_mut();
            log.progress_handlers.clear();
            std::mem::take(&mut log.complete_handlers)
        };
        for handler in complete {
            handler();
        }
    }

    /// Sends `event` to every parked progress handler.
    pub(crate) fn progress(log: &SharedLoaderLog, event: ProgressEvent) {
        let mut handlers = std::mem::take(&mut log.borrow_mut().progress_handlers);
        for handler in &mut handlers {
            handler(&event);
        }
        let mut log = log.borrow_mut();
        handlers.append(&mut log.progress_handlers);
        log.progress_handlers = handlers;
    }
}

impl LoaderFactory for RecordingLoader {
    fn create_queue(&self) -> Box<dyn LoadQueue> {
        self.log.borrow_mut().queues_created += 1;
        Box::new(RecordingQueue {
            log: Some(Rc::clone(&self.log)),
            ..RecordingQueue::detached(AssetStore::new())
        })
    }

    fn pump(&self) -> usize {
        self.log.borrow_mut().pumps += 1;
        0
    }
}

/// Queue that records into a [`LoaderLog`] when attached to one.
pub(crate) struct RecordingQueue {
    log: Option<SharedLoaderLog>,
    plugins: Vec<LoaderPlugin>,
    requests: Vec<AssetRequest>,
    store: AssetStore,
    progress_handlers: Vec<ProgressHandler>,
    complete_handlers: Vec<CompleteHandler>,
}

impl RecordingQueue {
    /// A queue not attached to any loader log.
    pub(crate) fn detached(store: AssetStore) -> Self {
        Self {
            log: None,
            plugins: Vec::new(),
            requests: Vec::new(),
            store,
            progress_handlers: Vec::new(),
            complete_handlers: Vec::new(),
        }
    }
}

impl LoadQueue for RecordingQueue {
    fn install_plugin(&mut self, plugin: LoaderPlugin) {
        self.plugins.push(plugin);
        if let Some(log) = &self.log {
            log.borrow_mut().plugins.push(plugin);
        }
    }

    fn has_plugin(&self, plugin: LoaderPlugin) -> bool {
        self.plugins.contains(&plugin)
    }

    fn load_file(&mut self, request: AssetRequest) {
        if let Some(log) = &self.log {
            let mut log = log.borrow_mut();
            log.requests.push(request.src().display().to_string());
            log.sound_enabled_at_request
                .push(self.plugins.contains(&LoaderPlugin::Sound));
        }
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
        let queue = *self;
        if let Some(log) = queue.log {
            let mut log = log.borrow_mut();
            log.loads_started += 1;
            log.progress_handlers.extend(queue.progress_handlers);
            log.complete_handlers.extend(queue.complete_handlers);
        }
    }
}

//=== RecordingHost =======================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DisplayOp {
    Add(String),
    Remove(String),
}

#[derive(Debug, Default)]
pub(crate) struct DisplayLog {
    pub resolved: Vec<String>,
    pub ops: Vec<DisplayOp>,
    pub updates: usize,
}

pub(crate) type SharedDisplayLog = Rc<RefCell<DisplayLog>>;

/// Host that resolves any id into a surface recording attach/detach calls.
#[derive(Clone)]
pub(crate) struct RecordingHost {
    log: SharedDisplayLog,
}

impl RecordingHost {
    pub(crate) fn new() -> (Self, SharedDisplayLog) {
        let log = SharedDisplayLog::default();
        (Self { log: Rc::clone(&log) }, log)
    }

    pub(crate) fn log(&self) -> Ref<'_, DisplayLog> {
        self.log.borrow()
    }
}

impl DisplayHost for RecordingHost {
    fn resolve_surface(&mut self, canvas_id: &str) -> Result<Box<dyn DisplaySurface>, StageError> {
        self.log.borrow_mut().resolved.push(canvas_id.to_string());
        Ok(Box::new(RecordingSurface {
            id: canvas_id.to_string(),
            children: Vec::new(),
            log: Rc::clone(&self.log),
        }))
    }
}

struct RecordingSurface {
    id: String,
    children: Vec<String>,
    log: SharedDisplayLog,
}

impl DisplaySurface for RecordingSurface {
    fn surface_id(&self) -> &str {
        &self.id
    }

    fn add_child(&mut self, name: &str, _scene: &SceneHandle) {
        self.children.retain(|child| child != name);
        self.children.push(name.to_string());
        self.log.borrow_mut().ops.push(DisplayOp::Add(name.to_string()));
    }

    fn remove_child(&mut self, name: &str) -> bool {
        let before = self.children.len();
        self.children.retain(|child| child != name);
        let removed = self.children.len() != before;
        if removed {
            self.log.borrow_mut().ops.push(DisplayOp::Remove(name.to_string()));
        }
        removed
    }

    fn children(&self) -> Vec<String> {
        self.children.clone()
    }

    fn update(&mut self) {
        self.log.borrow_mut().updates += 1;
    }
}
