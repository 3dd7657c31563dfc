//=========================================================================
// Core Systems
//
// Building blocks the stage is assembled from.
//
// Components:
// - `scene`: Scene trait, shared handles, registry and preload batches
// - `preload`: one load queue per activation, completion routed to the
//   primary scene
// - `loader`: load queues, progress events and the file-backed loader
// - `display`: surface/host boundary and the headless implementation
// - `frame_clock`: fixed-rate frame pacing
// - `error`: `StageError`
//
//=========================================================================

//=== Module Declarations =================================================

pub mod display;
pub mod loader;
pub mod preload;
pub mod scene;

mod error;
mod frame_clock;

//=== Public API ==========================================================

pub use error::StageError;
pub use frame_clock::{FrameClock, TimingMode};

pub(crate) use frame_clock::checked_frame_duration;
