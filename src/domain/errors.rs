//! Structured errors raised by the store, the code allocator and the redirect
//! dispatcher.
//!
//! These never reach an HTTP client as-is. [`crate::error::AppError`] maps them to
//! user-facing responses and drops internal detail on the way.

use std::error::Error as StdError;

/// Failure reported by a [`crate::domain::repositories::LinkRepository`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write (in practice, a duplicate `code`).
    #[error("unique constraint violation{}", .constraint.as_deref().map(|c| format!(" on {c}")).unwrap_or_default())]
    ConstraintViolation { constraint: Option<String> },

    /// Anything else the backend failed with.
    #[error("store backend error: {0}")]
    Backend(#[source] Box<dyn StdError + Send + Sync>),
}

impl StoreError {
    /// Wraps an arbitrary backend error.
    pub fn backend<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }
}

/// Failure to produce a code for a new link.
#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    /// The requested code does not match `^[A-Za-z0-9]{6,8}$`.
    #[error("code {code:?} must be 6-8 characters of letters and digits")]
    InvalidFormat { code: String },

    /// The requested code is already taken.
    #[error("code {code:?} already exists")]
    CodeConflict { code: String },

    /// Every generated candidate collided.
    #[error("no free code found after {attempts} attempts")]
    AllocationExhausted { attempts: usize },

    /// The uniqueness lookup itself failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure to resolve a code and record the visit.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("no link for code {code:?}")]
    NotFound { code: String },

    /// The stored target cannot be sent as a `Location` header. Nothing is recorded.
    #[error("target URL for code {code:?} cannot be redirected to")]
    UnusableTarget { code: String },

    #[error("failed to record visit for code {code:?}: {reason}")]
    RecordingFailed {
        code: String,
        #[source]
        reason: RecordingFailure,
    },
}

/// Why a visit could not be recorded.
#[derive(Debug, thiserror::Error)]
pub enum RecordingFailure {
    /// The link was deleted between the lookup and the increment.
    #[error("link disappeared before the visit was recorded")]
    Vanished,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_violation_display_names_constraint() {
        let err = StoreError::ConstraintViolation {
            constraint: Some("links_code_key".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "unique constraint violation on links_code_key"
        );
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_constraint_violation_display_without_name() {
        let err = StoreError::ConstraintViolation { constraint: None };
        assert_eq!(err.to_string(), "unique constraint violation");
    }

    #[test]
    fn test_backend_error_keeps_source() {
        let io = std::io::Error::other("connection reset");
        let err = StoreError::backend(io);
        assert!(!err.is_constraint_violation());
        assert!(err.source().is_some());
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_recording_failed_display() {
        let err = DispatchError::RecordingFailed {
            code: "abc123".to_string(),
            reason: RecordingFailure::Vanished,
        };
        assert!(err.to_string().contains("abc123"));
        assert!(err.to_string().contains("disappeared"));
    }
}
