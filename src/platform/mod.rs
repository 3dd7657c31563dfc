//=========================================================================
// Platform Subsystem
//
// Drives a `Stage` from a winit event loop.
//
// Architecture:
// ```text
//  Main Thread:
//  ┌────────────────────────────────────────────┐
//  │  Winit Event Loop                          │
//  │   ↓                                        │
//  │  resumed()                                 │
//  │   ├─ create window (title = canvas id)     │
//  │   ├─ fill WindowSlot                       │
//  │   └─ stage.start(initial scene)            │
//  │   ↓                                        │
//  │  RedrawRequested  (frame boundary)         │
//  │   ├─ stage.pump_loader()                   │
//  │   └─ stage.frame()  → tick → present       │
//  │   ↓                                        │
//  │  about_to_wait()                           │
//  │   └─ WaitUntil(next frame deadline)        │
//  └────────────────────────────────────────────┘
// ```
//
// Pacing follows the stage's timing mode: paced modes wake the loop at
// the frame clock's deadline, `Raf` requests a redraw after every frame
// and lets vsync throttle it.
//
// Winit mandates the main thread on macOS/iOS, so `run()` must be called
// from the thread that owns the stage.
//
//=========================================================================

//=== Submodules ==========================================================

mod window_surface;

//=== External Crates =====================================================

use std::rc::Rc;
use std::time::Instant;

use log::*;
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{StartCause, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::loader::LoaderFactory;
use crate::core::{FrameClock, TimingMode};
use crate::stage::{Stage, StageBuilder, StartOptions};
use window_surface::{WindowDisplayHost, WindowSlot};

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are fatal: without an event loop the stage cannot be driven.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Failed to create event loop (rare, indicates OS-level issue).
    #[error("Event loop creation failed: {0}")]
    EventLoopCreation(#[source] winit::error::EventLoopError),

    /// Event loop execution error.
    #[error("Event loop error: {0}")]
    EventLoopExecution(#[source] winit::error::EventLoopError),
}

//=== WindowHost ==========================================================

/// Runs a [`Stage`] inside an OS window.
///
/// The window is the stage's only display surface. It is created lazily in
/// `resumed()`, titled with the canvas id of the start options, and the
/// initial scene is started as soon as it exists.
///
/// # Examples
///
/// ```no_run
/// use stagehand::prelude::*;
///
/// struct Title;
/// impl Scene for Title {
///     fn tick(&mut self) {}
/// }
///
/// let mut host = WindowHost::new(FileLoader::new("assets"), "title", StartOptions::new());
/// host.stage_mut().register("title", Title);
/// host.run()?;
/// # Ok::<(), stagehand::PlatformError>(())
/// ```
pub struct WindowHost {
    stage: Stage,
    window: Option<Rc<Window>>,
    slot: WindowSlot,
    initial_scene: String,
    options: StartOptions,
}

impl WindowHost {
    //--- Construction -----------------------------------------------------

    /// Creates the host; no window exists until the event loop resumes.
    pub fn new<L>(loader: L, initial_scene: impl Into<String>, options: StartOptions) -> Self
    where
        L: LoaderFactory + 'static,
    {
        let slot = WindowSlot::default();
        let stage = StageBuilder::new()
            .with_display_host(WindowDisplayHost::new(Rc::clone(&slot)))
            .with_loader(loader)
            .build();

        info!(target: "platform", "Platform subsystem initialized");
        Self {
            stage,
            window: None,
            slot,
            initial_scene: initial_scene.into(),
            options,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Use this to register scenes before calling [`run`](Self::run).
    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window is closed.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// exits with an error.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS Winit requirement).
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    fn timing_mode(&self) -> Option<TimingMode> {
        self.stage.clock().map(|clock| clock.mode())
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Frame boundary: deliver loader events, then tick and present.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.stage.pump_loader();

        if let Err(e) = self.stage.frame() {
            error!(target: "platform", "Frame failed: {}", e);
            event_loop.exit();
            return;
        }

        if self.timing_mode() == Some(TimingMode::Raf) {
            self.request_redraw();
        }
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for WindowHost {
    /// Creates the window and starts the initial scene.
    ///
    /// On mobile this may be called again after a suspend; the existing
    /// window and stage are kept.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.options.canvas_id())
            .with_inner_size(LogicalSize::new(800, 600));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Rc::new(window),
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                event_loop.exit();
                return;
            }
        };

        info!(
            target: "platform",
            "Window created: {}x{} @ {}x DPI",
            window.inner_size().width,
            window.inner_size().height,
            window.scale_factor()
        );

        *self.slot.borrow_mut() = Some(Rc::clone(&window));
        self.window = Some(window);

        if let Err(e) = self.stage.start(&self.initial_scene, &self.options) {
            error!(target: "platform", "Failed to start '{}': {}", self.initial_scene, e);
            event_loop.exit();
            return;
        }

        self.request_redraw();
    }

    /// Wakes a paced loop when the frame deadline passes.
    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        if let StartCause::ResumeTimeReached { .. } = cause {
            self.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                event_loop.exit();
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    /// Schedules the next wake-up from the frame clock.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(control_flow(self.stage.clock(), Instant::now()));
    }
}

/// Wake-up policy for the event loop.
///
/// A deadline that already passed (redraws withheld while minimized or
/// occluded) is pushed one frame past `now` rather than waking at once.
fn control_flow(clock: Option<&FrameClock>, now: Instant) -> ControlFlow {
    match clock.and_then(|clock| clock.next_wake(now)) {
        Some(wake) => ControlFlow::WaitUntil(wake),
        None => ControlFlow::Wait,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingLoader;

    #[test]
    fn window_host_creation() {
        let (loader, _) = RecordingLoader::new();
        let host = WindowHost::new(loader, "title", StartOptions::new().with_canvas_id("main"));

        assert!(host.window.is_none(), "Window should be created lazily");
        assert!(host.slot.borrow().is_none());
        assert!(!host.stage().is_started());
        assert_eq!(host.timing_mode(), None);
    }

    #[test]
    fn stage_without_window_cannot_start() {
        let (loader, _) = RecordingLoader::new();
        let mut host = WindowHost::new(loader, "title", StartOptions::new());

        let result = host.stage_mut().start("title", &StartOptions::new());

        assert_eq!(
            result,
            Err(crate::core::StageError::SurfaceNotFound("js-canvas".to_string()))
        );
    }

    #[test]
    fn unstarted_stage_waits_for_events() {
        assert_eq!(control_flow(None, Instant::now()), ControlFlow::Wait);
    }

    #[test]
    fn raf_mode_waits_for_events() {
        let clock = FrameClock::new(60.0, TimingMode::Raf);
        assert_eq!(control_flow(Some(&clock), Instant::now()), ControlFlow::Wait);
    }

    #[test]
    fn paced_mode_waits_until_deadline() {
        let mut clock = FrameClock::new(20.0, TimingMode::RafSynched);
        clock.begin_frame();
        let deadline = clock.next_deadline().unwrap();

        let now = deadline - std::time::Duration::from_millis(10);
        assert_eq!(control_flow(Some(&clock), now), ControlFlow::WaitUntil(deadline));
    }

    #[test]
    fn withheld_redraw_does_not_busy_wake() {
        let mut clock = FrameClock::new(20.0, TimingMode::Timeout);
        clock.begin_frame();

        // Several frames pass without a redraw; the wake stays in the future.
        let now = clock.next_deadline().unwrap() + std::time::Duration::from_millis(500);
        match control_flow(Some(&clock), now) {
            ControlFlow::WaitUntil(wake) => assert_eq!(wake, now + clock.frame_duration()),
            other => panic!("Expected WaitUntil, got {:?}", other),
        }
    }

    #[test]
    fn platform_error_is_error_trait() {
        fn assert_error<T: std::error::Error + 'static>() {}
        assert_error::<PlatformError>();
    }
}
