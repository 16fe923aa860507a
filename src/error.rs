//! Error types for the annotation engine.

use thiserror::Error;

use crate::format::error::FormatError;

/// Errors raised by store operations and interaction controllers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnnotationError {
    /// Referenced marker id does not exist. Callers treat this as a no-op.
    ///
    /// Plot ranges are never deleted, so a missing range is reported as
    /// [`AnnotationError::PreconditionViolated`] instead.
    #[error("marker not found: {id}")]
    NotFound {
        /// The missing id
        id: String,
    },

    /// An operation ran without its required state (e.g. appending a vertex
    /// with no range to append to). Indicates a gating defect.
    #[error("Precondition violated: {0}")]
    PreconditionViolated(String),

    /// The container has no area, so pointer positions cannot be normalized.
    #[error("Container has no area ({width}x{height})")]
    DegenerateContainer {
        /// Width in device pixels
        width: f32,
        /// Height in device pixels
        height: f32,
    },
}

impl AnnotationError {
    pub fn marker_not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::PreconditionViolated(message.into())
    }

    /// Whether this error is an expected, locally recoverable no-op.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Top-level errors for the replay binary.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error(transparent)]
    Format(#[from] FormatError),

    /// Bad command-line usage
    #[error("{0}")]
    Usage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_missing_markers_are_recoverable() {
        assert!(AnnotationError::marker_not_found("mk-3").is_recoverable());
        assert!(!AnnotationError::precondition("no range").is_recoverable());
        let degenerate = AnnotationError::DegenerateContainer {
            width: 0.0,
            height: 300.0,
        };
        assert!(!degenerate.is_recoverable());
        assert_eq!(
            AnnotationError::marker_not_found("mk-3").to_string(),
            "marker not found: mk-3"
        );
    }
}
