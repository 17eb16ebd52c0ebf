//! # tudboom-core: Pure Invoice Logic for the Tudboom Emissor
//!
//! This crate is the **heart** of the nota fiscal emitter. It contains the
//! draft/totals engine and the document builders as pure code with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Tudboom Emissor Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Storefront admin UI / emissor CLI                  │   │
//! │  │   Item form ──► Totals box ──► Submit ──► Preview / Export      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tudboom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   draft   │  │ document  │  │   │
//! │  │   │  Invoice  │  │   Money   │  │  Invoice  │  │ text/struct│ │   │
//! │  │   │  LineItem │  │  TaxRate  │  │   Draft   │  │  builders │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tudboom-store (remote invoice API)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, Client, Invoice, InvoiceNumber)
//! - [`money`] - Money type with integer centavo arithmetic
//! - [`draft`] - The mutable invoice draft and its totals
//! - [`document`] - Plain-text and structured renderings of an invoice
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation and raw input parsing
//!
//! ## Example Usage
//!
//! ```rust
//! use tudboom_core::draft::InvoiceDraft;
//! use tudboom_core::money::Money;
//! use tudboom_core::types::ItemField;
//!
//! let mut draft = InvoiceDraft::new();
//! draft.update_item(0, ItemField::Description("Caneca".into())).unwrap();
//! draft.update_item(0, ItemField::Quantity(2)).unwrap();
//! draft.update_item(0, ItemField::UnitPrice(Money::from_cents(1000))).unwrap();
//!
//! draft.toggle_tax(true);
//! let totals = draft.compute_totals().unwrap();
//! assert_eq!(totals.subtotal.cents(), 2000);
//! assert_eq!(totals.tax.cents(), 200);
//! assert_eq!(totals.total.cents(), 2200);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod document;
pub mod draft;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use document::{render_text, InvoiceDocument, Issuer};
pub use draft::{DraftSnapshot, InvoiceDraft};
pub use error::{CoreError, ValidationError, ValidationReport};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tax applied when the "incluir impostos" flag is on: 10% in basis points.
pub const DEFAULT_TAX_RATE_BPS: u32 = 1000;

/// Largest quantity a row accepts, in either direction.
pub const MAX_QUANTITY: i64 = 1_000_000;

/// Largest unit price a row accepts, in centavos (R$ 10000000.00).
///
/// With [`MAX_QUANTITY`] a row total stays below 10^15 centavos, so row
/// totals are always exact. Draft totals are still summed with checked
/// arithmetic.
pub const MAX_UNIT_PRICE_CENTS: i64 = 1_000_000_000;

/// Prefix of every invoice number (`NF-000042`).
pub const INVOICE_NUMBER_PREFIX: &str = "NF-";

/// Minimum digit count of the sequence part of an invoice number.
pub const INVOICE_NUMBER_WIDTH: usize = 6;

/// Date format used on documents and by the remote API (pt-BR).
pub const ISSUE_DATE_FORMAT: &str = "%d/%m/%Y";
