//=========================================================================
// Stage
//
// Scene lifecycle driver: one active scene, ticked once per frame.
//
// Architecture:
// ```text
//     StageBuilder  ──build()──>  Stage  ──start()──>  activate()
//         │                         │                     │
//         ├─ with_display_host()    ├─ registry           ├─ detach old
//         └─ with_loader()          ├─ display surface    ├─ preload batch
//                                   ├─ frame clock        └─ attach new
//                                   └─ active scene
//
//     frame():  active.tick() → display.update()
//     run():    loader.pump() → frame() → wait_for_next_frame()
// ```
//
//=========================================================================

//=== Module Declarations =================================================

mod options;

//=== External Dependencies ===============================================

use std::rc::Rc;

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, info, trace};

//=== Internal Dependencies ===============================================

use crate::core::display::{DisplayHost, DisplaySurface, HeadlessHost};
use crate::core::loader::{FileLoader, LoaderFactory};
use crate::core::preload::{PreloadCoordinator, PreloadOutcome};
use crate::core::scene::{Scene, SceneHandle, SceneRegistry};
use crate::core::{FrameClock, StageError};

//=== Public API ==========================================================

pub use options::{ActivateOptions, StartOptions, DEFAULT_CANVAS_ID, DEFAULT_FPS};

//=== FrameOutcome ========================================================

/// What a single frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The active scene ticked and the surface was redrawn.
    Ticked,

    /// No scene is active; nothing happened.
    Idle,
}

//=== StageBuilder ========================================================

/// Builder for a [`Stage`].
///
/// # Default Values
///
/// - **Display host**: [`HeadlessHost::new()`] (resolves any canvas id)
/// - **Loader**: [`FileLoader`] rooted at the working directory
///
/// # Examples
///
/// ```no_run
/// use stagehand::prelude::*;
///
/// let stage = StageBuilder::new()
///     .with_display_host(HeadlessHost::with_surfaces(["main"]))
///     .with_loader(FileLoader::new("assets"))
///     .build();
/// # drop(stage);
/// ```
pub struct StageBuilder {
    display_host: Box<dyn DisplayHost>,
    loader: Box<dyn LoaderFactory>,
}

impl StageBuilder {
    pub fn new() -> Self {
        Self {
            display_host: Box::new(HeadlessHost::new()),
            loader: Box::new(FileLoader::new(".")),
        }
    }

    /// Sets how canvas ids are resolved into display surfaces.
    pub fn with_display_host<H: DisplayHost + 'static>(mut self, host: H) -> Self {
        self.display_host = Box::new(host);
        self
    }

    /// Sets where preload queues come from.
    pub fn with_loader<L: LoaderFactory + 'static>(mut self, loader: L) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn build(self) -> Stage {
        info!(target: "stage", "Building stage");

        Stage {
            registry: SceneRegistry::new(),
            display_host: self.display_host,
            loader: self.loader,
            display: None,
            clock: None,
            active: None,
            idle_reported: false,
        }
    }
}

impl Default for StageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Stage ===============================================================

struct ActiveScene {
    name: String,
    handle: SceneHandle,
}

/// Owns the scene registry, the display surface and the single active scene.
///
/// All state lives in this value; nothing is process-global. Every method
/// must be called from the thread that owns the stage (scenes are `Rc`).
///
/// # Lifecycle
///
/// 1. **Registration**: `register()` every scene
/// 2. **Start**: `start()` binds the surface and clock, activates a scene
/// 3. **Frames**: `frame()` per tick (or `run()` for a built-in loop)
/// 4. **Switching**: `activate()` swaps the active scene at any time
///
/// # Examples
///
/// ```rust
/// use stagehand::prelude::*;
///
/// struct Title;
/// impl Scene for Title {
///     fn tick(&mut self) {}
/// }
///
/// let mut stage = StageBuilder::new().build();
/// stage.register("title", Title);
///
/// let outcome = stage.start("title", &StartOptions::new().with_fps(30.0))?;
/// assert_eq!(outcome, PreloadOutcome::Loading { pending_scenes: 1 });
/// assert_eq!(stage.active_scene_name(), Some("title"));
///
/// // The empty batch settles on the first pump; `init()` runs then.
/// assert_eq!(stage.pump_loader(), 1);
/// assert_eq!(stage.frame()?, FrameOutcome::Ticked);
/// # Ok::<(), StageError>(())
/// ```
pub struct Stage {
    registry: SceneRegistry,
    display_host: Box<dyn DisplayHost>,
    loader: Box<dyn LoaderFactory>,
    display: Option<Box<dyn DisplaySurface>>,
    clock: Option<FrameClock>,
    active: Option<ActiveScene>,
    idle_reported: bool,
}

impl Stage {
    //--- Registration -----------------------------------------------------

    /// Registers a scene under `name`; see [`SceneRegistry::register`].
    pub fn register<T>(&mut self, name: impl Into<String>, scene: T) -> SceneHandle
    where
        T: Scene + 'static,
    {
        self.registry.register(name, scene)
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SceneRegistry {
        &mut self.registry
    }

    //--- Start ------------------------------------------------------------

    /// Binds the display surface and frame clock, then activates `scene`.
    ///
    /// Calling `start` again rebinds to a new surface; the current active
    /// scene moves to it before the new activation.
    ///
    /// # Errors
    ///
    /// - [`StageError::SurfaceNotFound`] if the host has no such canvas
    /// - [`StageError::SceneNotFound`] if `scene` or a preload scene is unknown
    pub fn start(&mut self, scene: &str, options: &StartOptions) -> Result<PreloadOutcome, StageError> {
        trace!(target: "stage", "Stage::start({})", scene);

        let mut display = self.display_host.resolve_surface(options.canvas_id())?;

        if let Some(previous) = self.display.take() {
            debug!(
                target: "stage",
                "Rebinding from surface '{}' to '{}'",
                previous.surface_id(),
                display.surface_id()
            );
            if let Some(active) = &self.active {
                display.add_child(&active.name, &active.handle);
            }
        }

        info!(
            target: "stage",
            "Stage bound to '{}' (fps: {}, mode: {:?})",
            display.surface_id(),
            options.fps(),
            options.timing_mode()
        );

        self.display = Some(display);
        self.clock = Some(FrameClock::new(options.fps(), options.timing_mode()));

        self.activate(scene, &options.activate_options())
    }

    //--- Activation -------------------------------------------------------

    /// Makes `name` the active scene.
    ///
    /// The scene and its companions are resolved before anything changes,
    /// so an unknown name leaves the current scene active and attached.
    /// The new scene is attached immediately even while its assets are
    /// still loading; it is responsible for not rendering incomplete state
    /// until its completion hook ran.
    ///
    /// # Errors
    ///
    /// - [`StageError::NotStarted`] before [`start`](Self::start)
    /// - [`StageError::SceneNotFound`] for an unknown scene or companion
    pub fn activate(&mut self, name: &str, options: &ActivateOptions) -> Result<PreloadOutcome, StageError> {
        trace!(target: "stage", "Stage::activate({})", name);

        let display = self.display.as_mut().ok_or(StageError::NotStarted)?;
        let batch = self.registry.resolve_batch(name, options.preload_scenes())?;

        if let Some(previous) = self.active.take() {
            if display.remove_child(&previous.name) {
                debug!(target: "stage", "'{}' detached", previous.name);
            }
        }

        let handle = Rc::clone(batch.primary().scene());
        self.active = Some(ActiveScene {
            name: name.to_string(),
            handle: Rc::clone(&handle),
        });
        self.idle_reported = false;

        let outcome = PreloadCoordinator::new(&*self.loader).run(batch);

        display.add_child(name, &handle);
        info!(target: "stage", "Scene '{}' active ({:?})", name, outcome);

        Ok(outcome)
    }

    //--- Frames -----------------------------------------------------------

    /// Per-frame callback: ticks the active scene, then redraws.
    ///
    /// With no active scene the frame is a no-op.
    ///
    /// # Errors
    ///
    /// [`StageError::NotStarted`] before [`start`](Self::start).
    pub fn frame(&mut self) -> Result<FrameOutcome, StageError> {
        let display = self.display.as_mut().ok_or(StageError::NotStarted)?;

        if let Some(clock) = self.clock.as_mut() {
            clock.begin_frame();
        }

        match &self.active {
            Some(active) => {
                active.handle.borrow_mut().tick();
                display.update();
                Ok(FrameOutcome::Ticked)
            }
            None => {
                if !self.idle_reported {
                    debug!(target: "stage", "Frame with no active scene, skipping");
                    self.idle_reported = true;
                }
                Ok(FrameOutcome::Idle)
            }
        }
    }

    /// Delivers pending loader events (progress, completion).
    ///
    /// Returns the number of batches that completed.
    pub fn pump_loader(&self) -> usize {
        self.loader.pump()
    }

    /// Runs frames at the configured rate until `shutdown` receives a
    /// message or its sender is dropped.
    ///
    /// Each iteration pumps the loader, runs one frame and sleeps the rest
    /// of the frame duration.
    ///
    /// # Errors
    ///
    /// [`StageError::NotStarted`] before [`start`](Self::start).
    pub fn run(&mut self, shutdown: &Receiver<()>) -> Result<(), StageError> {
        if !self.is_started() {
            return Err(StageError::NotStarted);
        }

        info!(target: "stage", "Entering frame loop (fps: {:?})", self.fps());

        loop {
            match shutdown.try_recv() {
                Ok(()) | Err(TryRecvError::Disconnected) => break,
                Err(TryRecvError::Empty) => {}
            }

            self.pump_loader();
            self.frame()?;

            if let Some(clock) = &self.clock {
                clock.wait_for_next_frame();
            }
        }

        info!(target: "stage", "Frame loop exited");
        Ok(())
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_started(&self) -> bool {
        self.display.is_some()
    }

    pub fn active_scene_name(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.name.as_str())
    }

    pub fn active_scene(&self) -> Option<SceneHandle> {
        self.active.as_ref().map(|active| Rc::clone(&active.handle))
    }

    /// Target frame rate, once started.
    pub fn fps(&self) -> Option<f64> {
        self.clock.as_ref().map(FrameClock::fps)
    }

    pub fn clock(&self) -> Option<&FrameClock> {
        self.clock.as_ref()
    }

    pub fn display(&self) -> Option<&dyn DisplaySurface> {
        self.display.as_deref()
    }

    pub fn loader(&self) -> &dyn LoaderFactory {
        &*self.loader
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
