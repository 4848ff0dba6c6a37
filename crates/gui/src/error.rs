//! Error types for host-facing measurement operations.

use shared::ObjectId;
use thiserror::Error;

/// Result type alias for measurement operations.
pub type MeasureResult<T> = Result<T, MeasureError>;

/// Errors reported back to the host.
///
/// Geometric failures inside the engine (projection misses, stale vertex
/// indices, empty meshes) are never turned into errors; they degrade to
/// "no result" or a frozen endpoint instead.
#[derive(Debug, Error)]
pub enum MeasureError {
    /// A segment index does not exist in the line model.
    #[error("line index {index} out of range (have {len} lines)")]
    OutOfRange { index: usize, len: usize },

    /// The scene has no object with this id.
    #[error("unknown object: {0}")]
    UnknownObject(ObjectId),

    /// Mesh data failed validation.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    /// Settings could not be located or stored.
    #[error("settings: {0}")]
    Settings(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MeasureError {
    #[must_use]
    pub const fn out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange { index, len }
    }

    #[must_use]
    pub fn unknown_object(id: impl Into<ObjectId>) -> Self {
        Self::UnknownObject(id.into())
    }

    #[must_use]
    pub fn invalid_mesh(details: impl Into<String>) -> Self {
        Self::InvalidMesh(details.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeasureError::out_of_range(3, 2);
        assert_eq!(format!("{err}"), "line index 3 out of range (have 2 lines)");

        let err = MeasureError::unknown_object("cube");
        assert!(format!("{err}").contains("cube"));

        let err = MeasureError::invalid_mesh("edge 4 references vertex 9");
        assert!(format!("{err}").contains("vertex 9"));
    }

    #[test]
    fn test_json_error_converts() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{oops");
        let err: MeasureError = parse.unwrap_err().into();
        assert!(matches!(err, MeasureError::Json(_)));
    }
}
