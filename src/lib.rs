//=========================================================================
// Stagehand: Library Root
//
// Scene lifecycle management for frame-driven applications.
//
// Responsibilities:
// - Expose the `Stage` facade (registration, activation, frames)
// - Expose the collaborator traits (display host, loader) so hosts can
//   plug in their own rendering and asset pipelines
// - Keep the winit integration behind `WindowHost`
//
// Typical usage:
// ```no_run
// use stagehand::prelude::*;
//
// struct Title;
// impl Scene for Title {
//     fn tick(&mut self) {}
// }
//
// fn main() -> Result<(), PlatformError> {
//     let mut host = WindowHost::new(FileLoader::new("assets"), "title", StartOptions::new());
//     host.stage_mut().register("title", Title);
//     host.run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the scene, preload, loader and display systems. Most
// applications only need the `Stage` facade and the prelude.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` wraps the winit event loop; only `WindowHost` and
// `PlatformError` are public.
//
// `stage` defines the `Stage` facade and its options.
//
mod platform;
mod stage;

#[cfg(test)]
mod testing;

//--- Public Exports ------------------------------------------------------

pub use platform::{PlatformError, WindowHost};
pub use stage::{
    ActivateOptions, FrameOutcome, Stage, StageBuilder, StartOptions, DEFAULT_CANVAS_ID,
    DEFAULT_FPS,
};
