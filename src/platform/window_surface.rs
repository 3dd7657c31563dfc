//=========================================================================
// Window Surface
//=========================================================================
//
// Display surfaces backed by the OS window.
//
// The window only exists after winit's `resumed()`, so the host resolves
// surfaces from a slot the platform fills once the window is created.
//
//=========================================================================

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use winit::window::Window;

use crate::core::display::{DisplayHost, DisplayList, DisplaySurface};
use crate::core::scene::SceneHandle;
use crate::core::StageError;

/// Window shared between the platform and the surfaces it resolved.
pub(crate) type WindowSlot = Rc<RefCell<Option<Rc<Window>>>>;

//=== WindowDisplayHost ===================================================

/// Resolves the platform window as a display surface.
pub(crate) struct WindowDisplayHost {
    slot: WindowSlot,
}

impl WindowDisplayHost {
    pub(crate) fn new(slot: WindowSlot) -> Self {
        Self { slot }
    }
}

impl DisplayHost for WindowDisplayHost {
    fn resolve_surface(&mut self, canvas_id: &str) -> Result<Box<dyn DisplaySurface>, StageError> {
        let Some(window) = self.slot.borrow().as_ref().map(Rc::clone) else {
            warn!(target: "platform", "No window yet for surface '{}'", canvas_id);
            return Err(StageError::SurfaceNotFound(canvas_id.to_string()));
        };

        debug!(target: "platform", "Resolved window surface '{}'", canvas_id);
        Ok(Box::new(WindowSurface {
            list: DisplayList::new(canvas_id),
            window,
        }))
    }
}

//=== WindowSurface =======================================================

/// Keeps the attached scenes and presents on every update.
pub(crate) struct WindowSurface {
    list: DisplayList,
    window: Rc<Window>,
}

impl DisplaySurface for WindowSurface {
    fn surface_id(&self) -> &str {
        self.list.surface_id()
    }

    fn add_child(&mut self, name: &str, scene: &SceneHandle) {
        self.list.add_child(name, scene);
    }

    fn remove_child(&mut self, name: &str) -> bool {
        self.list.remove_child(name)
    }

    fn children(&self) -> Vec<String> {
        self.list.children()
    }

    fn update(&mut self) {
        self.list.update();
        self.window.pre_present_notify();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
