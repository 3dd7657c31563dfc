//=========================================================================
// Stage Errors
//=========================================================================
//
// Failures surfaced to callers of the stage API.
//
// Duplicate registration is not an error (warning only).
// Asset loading failures belong to the loader and never reach here.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== StageError ==========================================================

/// Errors returned by registry lookups, scene activation and frame ticks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    /// No scene is registered under the requested name.
    #[error("scene '{0}' does not exist")]
    SceneNotFound(String),

    /// The display host could not resolve a surface with this id.
    #[error("display surface '{0}' does not exist")]
    SurfaceNotFound(String),

    /// An operation that needs a display surface ran before `Stage::start`.
    #[error("stage has not been started")]
    NotStarted,
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_not_found_names_the_scene() {
        let err = StageError::SceneNotFound("title".to_string());
        assert_eq!(err.to_string(), "scene 'title' does not exist");
    }

    #[test]
    fn surface_not_found_names_the_surface() {
        let err = StageError::SurfaceNotFound("js-canvas".to_string());
        assert!(err.to_string().contains("js-canvas"));
    }

    #[test]
    fn stage_error_is_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<StageError>();
    }
}
