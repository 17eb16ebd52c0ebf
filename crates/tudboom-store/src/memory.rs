//! # In-Memory Invoice Store
//!
//! [`InvoiceStore`] kept entirely in process. Used by tests and by the CLI's
//! `--offline` mode.
//!
//! Behaves like the remote API where it matters to the emissor:
//! - numbers come from a monotonic counter that advances on create
//! - a number already in use is rejected with `ValidationRejected`
//! - deleting an unknown id is `NotFound`
//!
//! [`MemoryInvoiceStore::set_available`] switches the store into a
//! failing mode so callers can exercise their error paths.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;
use tudboom_core::{Invoice, InvoiceNumber};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::InvoiceStore;

#[derive(Debug)]
struct Inner {
    invoices: Vec<Invoice>,
    next_number: u64,
}

/// Invoice store backed by a `Vec` behind a tokio mutex.
#[derive(Debug)]
pub struct MemoryInvoiceStore {
    inner: Mutex<Inner>,
    available: AtomicBool,
}

impl Default for MemoryInvoiceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryInvoiceStore {
    /// Empty store whose first number is `NF-000001`.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(next_number: u64) -> Self {
        MemoryInvoiceStore {
            inner: Mutex::new(Inner {
                invoices: Vec::new(),
                next_number,
            }),
            available: AtomicBool::new(true),
        }
    }

    /// Store pre-filled with `invoices`; the counter continues after the
    /// highest number present.
    pub fn with_invoices(invoices: Vec<Invoice>) -> Self {
        let next_number = invoices
            .iter()
            .map(|invoice| invoice.number.sequence())
            .max()
            .map_or(1, |max| max + 1);

        let invoices = invoices
            .into_iter()
            .map(|invoice| match invoice.id {
                Some(_) => invoice,
                None => invoice.with_id(Uuid::new_v4().to_string()),
            })
            .collect();

        MemoryInvoiceStore {
            inner: Mutex::new(Inner {
                invoices,
                next_number,
            }),
            available: AtomicBool::new(true),
        }
    }

    /// While `false`, every operation fails with `CollaboratorUnavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.invoices.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn ensure_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::CollaboratorUnavailable(
                "in-memory store is offline".into(),
            ))
        }
    }
}

#[async_trait]
impl InvoiceStore for MemoryInvoiceStore {
    async fn list_invoices(&self) -> StoreResult<Vec<Invoice>> {
        self.ensure_available()?;
        Ok(self.inner.lock().await.invoices.clone())
    }

    async fn next_invoice_number(&self) -> StoreResult<InvoiceNumber> {
        self.ensure_available()?;
        Ok(InvoiceNumber::new(self.inner.lock().await.next_number))
    }

    async fn create_invoice(&self, invoice: &Invoice) -> StoreResult<Invoice> {
        self.ensure_available()?;
        let mut inner = self.inner.lock().await;

        if inner
            .invoices
            .iter()
            .any(|stored| stored.number == invoice.number)
        {
            return Err(StoreError::ValidationRejected(format!(
                "Invoice number {} already exists",
                invoice.number
            )));
        }

        let stored = invoice.clone().with_id(Uuid::new_v4().to_string());
        inner.next_number = inner.next_number.max(invoice.number.sequence() + 1);
        inner.invoices.push(stored.clone());

        debug!(number = %stored.number, id = ?stored.id, "Invoice stored in memory");
        Ok(stored)
    }

    async fn delete_invoice(&self, id: &str) -> StoreResult<()> {
        self.ensure_available()?;
        let mut inner = self.inner.lock().await;

        let position = inner
            .invoices
            .iter()
            .position(|invoice| invoice.id.as_deref() == Some(id))
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        inner.invoices.remove(position);
        Ok(())
    }
}
