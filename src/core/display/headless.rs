//=========================================================================
// Headless Display
//=========================================================================
//
// Display surfaces that only track children and count redraws.
//
//=========================================================================

use std::collections::HashSet;
use std::rc::Rc;

use log::{debug, trace};

use super::{DisplayHost, DisplaySurface};
use crate::core::scene::SceneHandle;
use crate::core::StageError;

//=== DisplayList =========================================================

/// In-memory surface: an ordered list of attached scenes.
pub struct DisplayList {
    id: String,
    children: Vec<(String, SceneHandle)>,
    redraws: u64,
}

impl DisplayList {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            children: Vec::new(),
            redraws: 0,
        }
    }

    /// Number of `update()` calls so far.
    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    /// Handle of an attached child.
    pub fn child(&self, name: &str) -> Option<&SceneHandle> {
        self.children
            .iter()
            .find(|(child, _)| child == name)
            .map(|(_, scene)| scene)
    }
}

impl DisplaySurface for DisplayList {
    fn surface_id(&self) -> &str {
        &self.id
    }

    fn add_child(&mut self, name: &str, scene: &SceneHandle) {
        // Re-adding moves the child to the top, like a display list does.
        self.remove_child(name);
        self.children.push((name.to_string(), Rc::clone(scene)));
        trace!(target: "display", "'{}' attached to '{}'", name, self.id);
    }

    fn remove_child(&mut self, name: &str) -> bool {
        let Some(pos) = self.children.iter().position(|(child, _)| child == name) else {
            return false;
        };
        self.children.remove(pos);
        trace!(target: "display", "'{}' detached from '{}'", name, self.id);
        true
    }

    fn children(&self) -> Vec<String> {
        self.children.iter().map(|(name, _)| name.clone()).collect()
    }

    fn update(&mut self) {
        self.redraws += 1;
    }
}

//=== HeadlessHost ========================================================

/// Resolves [`DisplayList`] surfaces.
///
/// `HeadlessHost::new()` accepts any id. `with_surfaces` restricts
/// resolution to the listed ids, like a page with a fixed set of canvases.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    known: Option<HashSet<String>>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self { known: None }
    }

    pub fn with_surfaces<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: Some(ids.into_iter().map(Into::into).collect()),
        }
    }
}

impl DisplayHost for HeadlessHost {
    fn resolve_surface(&mut self, canvas_id: &str) -> Result<Box<dyn DisplaySurface>, StageError> {
        if let Some(known) = &self.known {
            if !known.contains(canvas_id) {
                return Err(StageError::SurfaceNotFound(canvas_id.to_string()));
            }
        }
        debug!(target: "display", "Resolved headless surface '{}'", canvas_id);
        Ok(Box::new(DisplayList::new(canvas_id)))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingScene;

    #[test]
    fn add_and_remove_children() {
        let (a, _) = RecordingScene::handle();
        let (b, _) = RecordingScene::handle();
        let mut list = DisplayList::new("main");

        list.add_child("a", &a);
        list.add_child("b", &b);
        assert_eq!(list.children(), vec!["a", "b"]);
        assert!(Rc::ptr_eq(list.child("b").unwrap(), &b));

        assert!(list.remove_child("a"));
        assert!(!list.remove_child("a"));
        assert_eq!(list.children(), vec!["b"]);
    }

    #[test]
    fn re_adding_moves_child_to_top() {
        let (a, _) = RecordingScene::handle();
        let (b, _) = RecordingScene::handle();
        let mut list = DisplayList::new("main");

        list.add_child("a", &a);
        list.add_child("b", &b);
        list.add_child("a", &a);
        assert_eq!(list.children(), vec!["b", "a"]);
    }

    #[test]
    fn update_counts_redraws() {
        let mut list = DisplayList::new("main");
        list.update();
        list.update();
        assert_eq!(list.redraws(), 2);
    }

    #[test]
    fn permissive_host_resolves_any_id() {
        let mut host = HeadlessHost::new();
        let surface = host.resolve_surface("anything").unwrap();
        assert_eq!(surface.surface_id(), "anything");
    }

    #[test]
    fn restricted_host_rejects_unknown_id() {
        let mut host = HeadlessHost::with_surfaces(["c1"]);
        assert!(host.resolve_surface("c1").is_ok());
        assert_eq!(
            host.resolve_surface("c2").err(),
            Some(StageError::SurfaceNotFound("c2".to_string()))
        );
    }
}
