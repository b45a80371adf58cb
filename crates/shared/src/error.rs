//! Application-wide error types.

use thiserror::Error;

/// Application error types.
///
/// Engine-level errors are converted into these at the boundary with the
/// request handlers that host the engine.
#[derive(Debug, Error)]
pub enum AppError {
    /// Referenced environment or goal does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller supplied parameters outside the accepted range.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A stored record violates a data-integrity rule.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Persistence collaborator failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::InvalidState(_) => 422,
            Self::Storage(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns true if retrying the same request can succeed without changes.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::InvalidState(String::new()).status_code(), 422);
        assert_eq!(AppError::Storage(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            AppError::InvalidState(String::new()).error_code(),
            "INVALID_STATE"
        );
        assert_eq!(
            AppError::Storage(String::new()).error_code(),
            "STORAGE_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::NotFound("msg".into()).to_string(),
            "Not found: msg"
        );
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::InvalidState("msg".into()).to_string(),
            "Invalid state: msg"
        );
        assert_eq!(
            AppError::Storage("msg".into()).to_string(),
            "Storage error: msg"
        );
    }

    #[test]
    fn test_only_storage_errors_are_transient() {
        assert!(AppError::Storage(String::new()).is_transient());
        assert!(!AppError::NotFound(String::new()).is_transient());
        assert!(!AppError::InvalidState(String::new()).is_transient());
    }
}
