//! # Error Types
//!
//! Domain-specific error types for tudboom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tudboom-core errors (this file)                                       │
//! │  ├── CoreError         - General domain errors                         │
//! │  ├── ValidationError   - One failed field check                        │
//! │  └── ValidationReport  - Every failed check of a draft submission      │
//! │                                                                         │
//! │  tudboom-store errors (separate crate)                                 │
//! │  └── StoreError        - Remote invoice API failures                   │
//! │                                                                         │
//! │  emissor errors (in app)                                               │
//! │  └── ApiError          - What the UI sees (code + message)             │
//! │                                                                         │
//! │  Flow: ValidationReport → CoreError → ApiError → UI toast              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The draft cannot be finalized.
    ///
    /// ## User Workflow
    /// ```text
    /// Click "Emitir Nota"
    ///      │
    ///      ▼
    /// validate(client) → [email is required, items[0].unitPrice must be positive]
    ///      │
    ///      ▼
    /// UI shows both problems, draft untouched
    /// ```
    #[error("Draft is not ready to submit: {0}")]
    InvalidDraft(ValidationReport),

    /// Text that is not an `NF-000000` number.
    #[error("Invalid invoice number: {0}")]
    InvalidInvoiceNumber(String),

    /// Issue date in neither `dd/mm/yyyy` nor `yyyy-mm-dd`.
    #[error("Invalid issue date: {0}")]
    InvalidIssueDate(String),

    /// Line item field name the form does not know.
    #[error("Unknown item field: {0}")]
    UnknownField(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// `field` names the offending input: a client field (`email`, `taxId`) or
/// an item field with its row (`items[1].quantity`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be below zero.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Raw input that cannot be read as the expected type.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value beyond what a row or the invoice totals can hold.
    #[error("{field} must not exceed {max}")]
    TooLarge { field: String, max: String },
}

impl ValidationError {
    /// The field this error is about.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::MustBePositive { field }
            | ValidationError::Negative { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::TooLarge { field, .. } => field,
        }
    }
}

// =============================================================================
// Validation Report
// =============================================================================

/// Every constraint a draft submission violates, in form order
/// (client fields first, then items top to bottom).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = ValidationError>) {
        self.errors.extend(errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Names of every failing field.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(ValidationError::field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields().any(|f| f == field)
    }

    /// `Ok(())` when nothing failed.
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

impl From<ValidationReport> for CoreError {
    fn from(report: ValidationReport) -> Self {
        CoreError::InvalidDraft(report)
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
