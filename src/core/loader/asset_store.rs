//=========================================================================
// Asset Store
//=========================================================================
//
// Results of one load queue, keyed by request id.
//
// Cloning shares the same storage. Written only on the main thread by
// the loader's event pump; read by scenes after completion.
//
//=========================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use super::AssetKind;

//=== LoadedAsset =========================================================

/// Raw bytes of a loaded file with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedAsset {
    pub kind: AssetKind,
    pub bytes: Arc<[u8]>,
}

//=== AssetStore ==========================================================

#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    assets: Rc<RefCell<HashMap<String, LoadedAsset>>>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the asset loaded under `id`, if it has arrived.
    pub fn get(&self, id: &str) -> Option<LoadedAsset> {
        self.assets.borrow().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.assets.borrow().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.assets.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.borrow().is_empty()
    }

    /// Loaded ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.assets.borrow().keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    /// Stores an asset, replacing any previous one with the same id.
    pub(crate) fn insert(&self, id: impl Into<String>, asset: LoadedAsset) {
        self.assets.borrow_mut().insert(id.into(), asset);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
