//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use stagehand::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Stage facade
pub use crate::{ActivateOptions, FrameOutcome, Stage, StageBuilder, StartOptions};

// Errors
pub use crate::core::StageError;
pub use crate::PlatformError;

// Scene system
pub use crate::core::preload::PreloadOutcome;
pub use crate::core::scene::{PreloadBatch, Scene, SceneHandle, SceneRegistry};

// Loading
pub use crate::core::loader::{
    AssetKind, AssetRequest, AssetStore, FileLoader, LoadQueue, LoaderFactory, ProgressEvent,
};

// Display and timing
pub use crate::core::display::{DisplayHost, DisplaySurface, HeadlessHost};
pub use crate::core::TimingMode;

// Windowing
pub use crate::WindowHost;
