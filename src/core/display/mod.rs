//=========================================================================
// Display Boundary
//=========================================================================
//
// The rendering root scenes are attached to.
//
// Rendering itself is out of scope: a surface only needs to keep its
// list of visible children and redraw on request. Hosts resolve a
// surface from an element id, the way a page resolves a canvas element.
//
// Components:
// - `DisplaySurface`: children list + redraw
// - `DisplayHost`: id → surface resolution
// - `headless`: in-memory implementation for servers and tests
//
//=========================================================================

//=== Module Declarations =================================================

mod headless;

//=== Public API ==========================================================

pub use headless::{DisplayList, HeadlessHost};

use crate::core::scene::SceneHandle;
use crate::core::StageError;

//=== DisplaySurface Trait ================================================

/// A rendering root owning a list of visible scenes.
pub trait DisplaySurface {
    /// Element id this surface was resolved from.
    fn surface_id(&self) -> &str;

    /// Makes the scene visible.
    fn add_child(&mut self, name: &str, scene: &SceneHandle);

    /// Removes the scene; returns `false` if it was not attached.
    fn remove_child(&mut self, name: &str) -> bool;

    /// Names of attached scenes, in attachment order.
    fn children(&self) -> Vec<String>;

    /// Redraws the surface. Called once per frame after the active scene ticked.
    fn update(&mut self);
}

//=== DisplayHost Trait ===================================================

/// Resolves display surfaces by element id.
pub trait DisplayHost {
    fn resolve_surface(&mut self, canvas_id: &str) -> Result<Box<dyn DisplaySurface>, StageError>;
}
