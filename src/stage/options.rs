//=========================================================================
// Stage Options
//=========================================================================
//
// Configuration accepted by `Stage::start` and `Stage::activate`.
//
//=========================================================================

use crate::core::{checked_frame_duration, TimingMode};

/// Display element used when no canvas id is given.
pub const DEFAULT_CANVAS_ID: &str = "js-canvas";

/// Frame rate used when no fps is given.
pub const DEFAULT_FPS: f64 = 60.0;

//=== StartOptions ========================================================

/// Options for [`Stage::start`](crate::Stage::start).
///
/// # Default Values
///
/// - **Canvas id**: `"js-canvas"`
/// - **FPS**: 60.0
/// - **Timing mode**: [`TimingMode::RafSynched`]
/// - **Preload scenes**: none
///
/// # Examples
///
/// ```rust
/// use stagehand::StartOptions;
///
/// let options = StartOptions::new()
///     .with_canvas_id("c1")
///     .with_fps(30.0)
///     .with_preload_scenes(["level-1"]);
///
/// assert_eq!(options.canvas_id(), "c1");
/// assert_eq!(options.preload_scenes(), ["level-1"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StartOptions {
    canvas_id: String,
    fps: f64,
    timing_mode: TimingMode,
    preload_scenes: Vec<String>,
}

impl StartOptions {
    pub fn new() -> Self {
        Self {
            canvas_id: DEFAULT_CANVAS_ID.to_string(),
            fps: DEFAULT_FPS,
            timing_mode: TimingMode::default(),
            preload_scenes: Vec::new(),
        }
    }

    /// Sets the id of the display element to bind.
    pub fn with_canvas_id(mut self, canvas_id: impl Into<String>) -> Self {
        self.canvas_id = canvas_id.into();
        self
    }

    /// Sets the target frame rate.
    ///
    /// # Panics
    ///
    /// Panics if `fps <= 0.0`, or if `fps` is so small that one frame is
    /// not a representable duration.
    pub fn with_fps(mut self, fps: f64) -> Self {
        checked_frame_duration(fps);
        self.fps = fps;
        self
    }

    pub fn with_timing_mode(mut self, mode: TimingMode) -> Self {
        self.timing_mode = mode;
        self
    }

    /// Additional scenes to load in the same batch as the started scene.
    ///
    /// The started scene's progress hook reports on the whole batch.
    pub fn with_preload_scenes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preload_scenes = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn canvas_id(&self) -> &str {
        &self.canvas_id
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn timing_mode(&self) -> TimingMode {
        self.timing_mode
    }

    pub fn preload_scenes(&self) -> &[String] {
        &self.preload_scenes
    }

    /// The subset of these options that applies to scene activation.
    pub fn activate_options(&self) -> ActivateOptions {
        ActivateOptions {
            preload_scenes: self.preload_scenes.clone(),
        }
    }
}

impl Default for StartOptions {
    fn default() -> Self {
        Self::new()
    }
}

//=== ActivateOptions =====================================================

/// Options for [`Stage::activate`](crate::Stage::activate).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivateOptions {
    preload_scenes: Vec<String>,
}

impl ActivateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Additional scenes to load in the same batch as the activated scene.
    pub fn with_preload_scenes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preload_scenes = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn preload_scenes(&self) -> &[String] {
        &self.preload_scenes
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
