//=========================================================================
// Scene Registry
//=========================================================================
//
// Name-to-scene mapping.
//
// Scenes are registered once by the host application and referenced by
// name afterwards. Re-registering a name overwrites it with a warning.
// Lookups of unknown names are logged and returned as `SceneNotFound`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::rc::Rc;

use log::{error, warn};

//=== Internal Dependencies ===============================================

use super::{into_handle, PreloadBatch, Scene, SceneHandle};
use crate::core::StageError;

//=== Scene Registry ======================================================

/// Maps scene names to shared scene handles.
///
/// The registry only holds references; which scene is active is decided by
/// the [`Stage`](crate::Stage).
#[derive(Default)]
pub struct SceneRegistry {
    scenes: HashMap<String, SceneHandle>,
}

impl SceneRegistry {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            scenes: HashMap::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a scene under `name` and returns its shared handle.
    ///
    /// The scene is automatically wrapped for shared storage. If the name is
    /// already taken the old scene is replaced and a warning is logged.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use stagehand::prelude::*;
    /// # struct Title;
    /// # impl Scene for Title { fn tick(&mut self) {} }
    /// let mut registry = SceneRegistry::new();
    /// let title = registry.register("title", Title);
    /// assert!(registry.contains("title"));
    /// # drop(title);
    /// ```
    pub fn register<T>(&mut self, name: impl Into<String>, scene: T) -> SceneHandle
    where
        T: Scene + 'static,
    {
        let handle = into_handle(scene);
        self.register_handle(name, Rc::clone(&handle));
        handle
    }

    /// Registers an existing handle under `name`.
    ///
    /// The same handle may be registered under several names.
    pub fn register_handle(&mut self, name: impl Into<String>, scene: SceneHandle) {
        let name = name.into();
        if self.scenes.contains_key(&name) {
            warn!(
                target: "stage",
                "You registered a scene called '{}', but there was already a scene registered with that name. It was overwritten.",
                name
            );
        }
        self.scenes.insert(name, scene);
    }

    //--- Lookup -----------------------------------------------------------

    /// Returns the scene registered under `name`.
    pub fn lookup(&self, name: &str) -> Result<SceneHandle, StageError> {
        match self.scenes.get(name) {
            Some(scene) => Ok(Rc::clone(scene)),
            None => {
                error!(target: "stage", "The scene '{}' does not exist", name);
                Err(StageError::SceneNotFound(name.to_string()))
            }
        }
    }

    /// Looks up every name in order.
    ///
    /// Unknown names leave an `Err` placeholder in their position; callers
    /// must check each slot before using it.
    pub fn lookup_many<I, N>(&self, names: I) -> Vec<Result<SceneHandle, StageError>>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| self.lookup(name.as_ref()))
            .collect()
    }

    /// Builds the preload batch `[primary, ...companions]`.
    ///
    /// Fails on the first unknown name, so a batch never carries a missing
    /// scene into preloading or display attachment.
    pub fn resolve_batch<N>(&self, primary: &str, companions: &[N]) -> Result<PreloadBatch, StageError>
    where
        N: AsRef<str>,
    {
        let mut batch = PreloadBatch::new(primary, self.lookup(primary)?);

        for (name, scene) in companions.iter().zip(self.lookup_many(companions)) {
            batch.push(name.as_ref(), scene?);
        }

        Ok(batch)
    }

    //--- Queries ----------------------------------------------------------

    pub fn contains(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.scenes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

//=== Tests ===============================================================
