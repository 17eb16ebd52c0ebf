//! # API Error Type
//!
//! Unified error type for emissor commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Emissor                            │
//! │                                                                         │
//! │  Command Function                                                       │
//! │  Result<T, ApiError>                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Draft invalid? ───── CoreError::InvalidDraft ──────┐                  │
//! │         │                                            │                  │
//! │         ▼                                            ▼                  │
//! │  API down? ────────── StoreError::Collaborator... ─ ApiError ───► CLI  │
//! │         │                                            ▲                  │
//! │         ▼                                            │                  │
//! │  Second submit? ───── SessionError::SubmitInProgress ┘                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Success ─────────────────────────────────────────────────────────►    │
//! │                                                                         │
//! │  No error is fatal: the draft and the invoice list stay as they were.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tudboom_core::{CoreError, ValidationReport};
use tudboom_store::StoreError;

use crate::render::ExportError;
use crate::state::{ConfigError, SessionError};

/// Error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "email is required; items[0].unitPrice must be positive",
///   "fields": ["email", "items[0].unitPrice"]
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Offending fields, for validation errors
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Invoice not found
    NotFound,

    /// Form input or draft validation failed, locally or on the server
    ValidationError,

    /// The invoice API could not be reached or failed
    CollaboratorUnavailable,

    /// Another submission of this session has not finished yet
    SubmitInProgress,

    /// Writing a .txt / .html / .pdf failed
    ExportError,

    /// Configuration or unexpected failure
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> u8 {
        match self.code {
            ErrorCode::ValidationError => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::CollaboratorUnavailable => 4,
            ErrorCode::SubmitInProgress => 5,
            ErrorCode::ExportError => 6,
            ErrorCode::Internal => 1,
        }
    }
}

/// Every violation of the draft, with the field names kept apart.
impl From<ValidationReport> for ApiError {
    fn from(report: ValidationReport) -> Self {
        ApiError {
            code: ErrorCode::ValidationError,
            message: report.to_string(),
            fields: report.fields().map(str::to_string).collect(),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidDraft(report) => ApiError::from(report),
            CoreError::Validation(e) => ApiError {
                code: ErrorCode::ValidationError,
                message: e.to_string(),
                fields: vec![e.field().to_string()],
            },
            CoreError::UnknownField(name) => {
                ApiError::validation(format!("Unknown item field: {}", name))
            }
            CoreError::InvalidInvoiceNumber(raw) => {
                ApiError::validation(format!("Invalid invoice number: {}", raw))
            }
            CoreError::InvalidIssueDate(raw) => {
                ApiError::validation(format!("Invalid issue date: {}", raw))
            }
        }
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => ApiError::not_found("Invoice", &id),
            StoreError::ValidationRejected(message) => ApiError::validation(message),
            StoreError::CollaboratorUnavailable(message) => {
                tracing::error!("Invoice API unavailable: {}", message);
                ApiError::new(
                    ErrorCode::CollaboratorUnavailable,
                    "Invoice service is unavailable, try again",
                )
            }
            StoreError::InvalidResponse(message) => {
                tracing::error!("Unexpected invoice API response: {}", message);
                ApiError::new(
                    ErrorCode::CollaboratorUnavailable,
                    "Invoice service returned an unexpected response",
                )
            }
            StoreError::InvalidConfig(message) => ApiError::internal(message),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::SubmitInProgress => ApiError::new(
                ErrorCode::SubmitInProgress,
                "An invoice is already being submitted",
            ),
            SessionError::Core(e) => ApiError::from(e),
            SessionError::Store(e) => ApiError::from(e),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        ApiError::new(ErrorCode::ExportError, err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::internal(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
