//! # Store Error Types
//!
//! Error types for calls to the remote invoice API.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  reqwest::Error / HTTP status                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Categorized for the UI                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (emissor app) ← code + message                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Toast; draft and invoice list stay as they were                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Remote invoice API errors.
///
/// None of these are fatal: the caller keeps its state and may retry.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network failure, timeout, or a 5xx / unexpected status.
    #[error("Invoice service unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// The API refused the invoice (400 / 422, or a duplicate number).
    #[error("Invoice rejected by server: {0}")]
    ValidationRejected(String),

    /// Delete of an invoice that is no longer there.
    #[error("Invoice not found: {id}")]
    NotFound { id: String },

    /// A 2xx response whose body could not be understood.
    #[error("Unexpected response from invoice service: {0}")]
    InvalidResponse(String),

    /// Bad API settings (URL, timeout).
    #[error("Invalid API configuration: {0}")]
    InvalidConfig(String),
}

impl StoreError {
    /// True for failures where trying again later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::CollaboratorUnavailable(_))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::InvalidResponse(err.to_string())
        } else {
            StoreError::CollaboratorUnavailable(err.to_string())
        }
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::NotFound {
            id: "abc123".to_string(),
        };
        assert_eq!(err.to_string(), "Invoice not found: abc123");

        let err = StoreError::ValidationRejected("clientName obrigatório".to_string());
        assert_eq!(
            err.to_string(),
            "Invoice rejected by server: clientName obrigatório"
        );
    }

    #[test]
    fn test_only_unavailable_is_retryable() {
        assert!(StoreError::CollaboratorUnavailable("timeout".into()).is_retryable());
        assert!(!StoreError::ValidationRejected("bad".into()).is_retryable());
        assert!(!StoreError::NotFound { id: "1".into() }.is_retryable());
    }
}
