//=========================================================================
// Preload Batch
//=========================================================================
//
// Ordered set of scenes processed together in one preload cycle.
//
// The first entry is always the primary scene (the one being activated).
// A batch is built by the registry, handed to the preload coordinator and
// finally captured by the loader's completion handler, then dropped.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use super::SceneHandle;

//=== BatchEntry ==========================================================

/// A named scene inside a [`PreloadBatch`].
#[derive(Clone)]
pub struct BatchEntry {
    name: String,
    scene: SceneHandle,
}

impl BatchEntry {
    /// Name the scene was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the scene.
    pub fn scene(&self) -> &SceneHandle {
        &self.scene
    }
}

impl fmt::Debug for BatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchEntry").field("name", &self.name).finish()
    }
}

//=== PreloadBatch ========================================================

/// Ordered scenes loaded under one load queue, primary first.
///
/// A batch is never empty: it can only be created from its primary scene.
#[derive(Clone)]
pub struct PreloadBatch {
    entries: Vec<BatchEntry>,
}

impl PreloadBatch {
    /// Starts a batch with its primary scene.
    pub fn new(primary_name: impl Into<String>, primary: SceneHandle) -> Self {
        Self {
            entries: vec![BatchEntry {
                name: primary_name.into(),
                scene: primary,
            }],
        }
    }

    /// Appends a companion scene after the existing entries.
    pub fn push(&mut self, name: impl Into<String>, scene: SceneHandle) {
        self.entries.push(BatchEntry {
            name: name.into(),
            scene,
        });
    }

    /// The scene being activated.
    pub fn primary(&self) -> &BatchEntry {
        &self.entries[0]
    }

    /// Every scene after the primary, in request order.
    pub fn companions(&self) -> &[BatchEntry] {
        &self.entries[1..]
    }

    pub fn iter(&self) -> impl Iterator<Item = &BatchEntry> {
        self.entries.iter()
    }

    /// Scene names in batch order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for PreloadBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::testing::RecordingScene;

    #[test]
    fn primary_is_first_entry() {
        let (title, _) = RecordingScene::handle();
        let batch = PreloadBatch::new("title", Rc::clone(&title));

        assert_eq!(batch.primary().name(), "title");
        assert!(Rc::ptr_eq(batch.primary().scene(), &title));
        assert!(batch.companions().is_empty());
        assert_eq!(batch.len(), 1);
        assert!(!batch.is_empty());
    }

    #[test]
    fn companions_keep_request_order() {
        let (a, _) = RecordingScene::handle();
        let (b, _) = RecordingScene::handle();
        let (c, _) = RecordingScene::handle();

        let mut batch = PreloadBatch::new("a", a);
        batch.push("b", b);
        batch.push("c", c);

        assert_eq!(batch.names(), vec!["a", "b", "c"]);
        let companions: Vec<&str> = batch.companions().iter().map(BatchEntry::name).collect();
        assert_eq!(companions, vec!["b", "c"]);
    }

    #[test]
    fn debug_lists_names() {
        let (a, _) = RecordingScene::handle();
        let mut batch = PreloadBatch::new("menu", Rc::clone(&a));
        batch.push("game", a);

        assert_eq!(format!("{:?}", batch), r#"["menu", "game"]"#);
    }
}
