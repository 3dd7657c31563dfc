//=========================================================================
// Asset Requests
//=========================================================================
//
// What a scene asks the loader for, and how the content type is chosen.
//
// Content type comes from an explicit kind or the file extension.
// Audio extensions only resolve to `Sound` when the sound plugin is
// installed on the queue; otherwise they load as opaque bytes.
//
//=========================================================================

use std::path::{Path, PathBuf};

//=== LoaderPlugin ========================================================

/// Content-type plugins a load queue can be extended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoaderPlugin {
    /// Recognizes audio files as [`AssetKind::Sound`].
    Sound,
}

//=== AssetKind ===========================================================

/// Content type of a requested asset. No decoding happens in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Image,
    Sound,
    Json,
    Text,
    Binary,
}

impl AssetKind {
    /// Infers the kind from the file extension (case-insensitive).
    pub fn from_path(path: &Path, sound_enabled: bool) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp") => Self::Image,
            Some("ogg" | "mp3" | "wav" | "m4a") if sound_enabled => Self::Sound,
            Some("json") => Self::Json,
            Some("txt" | "csv" | "xml" | "css" | "svg") => Self::Text,
            _ => Self::Binary,
        }
    }
}

//=== AssetRequest ========================================================

/// One file requested by a scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    id: String,
    src: PathBuf,
    kind: Option<AssetKind>,
}

impl AssetRequest {
    /// Request `src` under `id`; the kind is inferred when queued.
    pub fn new(id: impl Into<String>, src: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            src: src.into(),
            kind: None,
        }
    }

    /// Overrides extension-based inference.
    pub fn with_kind(mut self, kind: AssetKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn src(&self) -> &Path {
        &self.src
    }

    pub fn kind(&self) -> Option<AssetKind> {
        self.kind
    }

    /// Fixes the kind and rebases a relative `src` on `base`.
    pub(crate) fn resolve(mut self, base: &Path, sound_enabled: bool) -> Self {
        if self.src.is_relative() {
            self.src = base.join(&self.src);
        }
        let kind = match self.kind {
            Some(AssetKind::Sound) if !sound_enabled => AssetKind::Binary,
            Some(kind) => kind,
            None => AssetKind::from_path(&self.src, sound_enabled),
        };
        self.kind = Some(kind);
        self
    }

    pub(crate) fn into_parts(self) -> (String, PathBuf, AssetKind) {
        (self.id, self.src, self.kind.unwrap_or(AssetKind::Binary))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
