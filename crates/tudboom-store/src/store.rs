//! # Invoice Store Trait
//!
//! The operations the emissor needs from whoever persists notas.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation             Failure modes                                    │
//! │  ─────────             ─────────────                                    │
//! │  list_invoices         CollaboratorUnavailable                          │
//! │  next_invoice_number   CollaboratorUnavailable                          │
//! │  create_invoice        ValidationRejected, CollaboratorUnavailable      │
//! │  delete_invoice        NotFound, CollaboratorUnavailable                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use tudboom_core::{Invoice, InvoiceNumber};

use crate::error::StoreResult;

/// Persistence and numbering for finalized notas.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Every stored invoice, in the order the store returns them.
    async fn list_invoices(&self) -> StoreResult<Vec<Invoice>>;

    /// The number the next created invoice should carry.
    async fn next_invoice_number(&self) -> StoreResult<InvoiceNumber>;

    /// Persists `invoice` and returns it as stored (with its id).
    async fn create_invoice(&self, invoice: &Invoice) -> StoreResult<Invoice>;

    /// Removes the invoice with store id `id`.
    async fn delete_invoice(&self, id: &str) -> StoreResult<()>;
}
