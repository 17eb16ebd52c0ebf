//! # Emissor Session
//!
//! One authoring session: the draft, the invoice store, and what the
//! session last learned from the store (invoice list, next number).
//!
//! ## Submit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  submit(client)                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  submit_gate.try_lock() ── busy ──► SubmitInProgress                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  draft.validate(client) ── fails ─► InvalidDraft (every violation)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.next_invoice_number()                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  draft.finalize(client, number, today)   (item snapshot)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.create_invoice(invoice) ── fails ─► error, draft kept           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  draft.reset(); refresh invoice list and next number                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use tudboom_core::validation::InputPolicy;
use tudboom_core::{Client, CoreError, Invoice, InvoiceNumber};
use tudboom_store::{InvoiceStore, StoreError};

use super::config::DraftSettings;
use super::draft::DraftState;

/// Session-level failures.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A submit of this session has not completed yet.
    #[error("An invoice is already being submitted")]
    SubmitInProgress,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// The state of one invoice authoring session.
pub struct EmissorSession {
    draft: DraftState,
    store: Arc<dyn InvoiceStore>,
    invoices: RwLock<Vec<Invoice>>,
    next_number: RwLock<Option<InvoiceNumber>>,
    submit_gate: Mutex<()>,
    input_policy: InputPolicy,
}

impl EmissorSession {
    pub fn new(store: Arc<dyn InvoiceStore>, settings: &DraftSettings) -> Self {
        EmissorSession {
            draft: DraftState::new(settings.tax_rate()),
            store,
            invoices: RwLock::new(Vec::new()),
            next_number: RwLock::new(None),
            submit_gate: Mutex::new(()),
            input_policy: settings.input_policy,
        }
    }

    pub fn draft(&self) -> &DraftState {
        &self.draft
    }

    pub fn input_policy(&self) -> InputPolicy {
        self.input_policy
    }

    // =========================================================================
    // Invoice List
    // =========================================================================

    /// Fetches the invoice list from the store and caches it.
    ///
    /// On failure the previously cached list is kept.
    pub async fn load_invoices(&self) -> SessionResult<Vec<Invoice>> {
        let invoices = self.store.list_invoices().await?;
        debug!(count = invoices.len(), "Invoice list refreshed");

        *self.invoices.write().await = invoices.clone();
        Ok(invoices)
    }

    /// The invoice list as last loaded.
    pub async fn invoices(&self) -> Vec<Invoice> {
        self.invoices.read().await.clone()
    }

    pub async fn invoice_count(&self) -> usize {
        self.invoices.read().await.len()
    }

    /// Looks an invoice up in the cached list by store id.
    pub async fn find_invoice(&self, id: &str) -> Option<Invoice> {
        self.invoices
            .read()
            .await
            .iter()
            .find(|invoice| invoice.id.as_deref() == Some(id))
            .cloned()
    }

    // =========================================================================
    // Numbering
    // =========================================================================

    /// Asks the store for the next number and caches it.
    pub async fn refresh_next_number(&self) -> SessionResult<InvoiceNumber> {
        let number = self.store.next_invoice_number().await?;
        *self.next_number.write().await = Some(number);
        Ok(number)
    }

    /// The next number as last fetched, if any.
    pub async fn next_number(&self) -> Option<InvoiceNumber> {
        *self.next_number.read().await
    }

    // =========================================================================
    // Submit / Delete
    // =========================================================================

    /// Finalizes the draft for `client` with today's date and persists it.
    pub async fn submit(&self, client: &Client) -> SessionResult<Invoice> {
        self.submit_on(client, Local::now().date_naive()).await
    }

    /// Finalizes the draft for `client`, issued on `issue_date`, and persists it.
    ///
    /// Only one submit runs at a time; a concurrent call fails with
    /// [`SessionError::SubmitInProgress`] instead of waiting, so two notas
    /// can never be built from the same fetched number.
    pub async fn submit_on(&self, client: &Client, issue_date: NaiveDate) -> SessionResult<Invoice> {
        let _gate = self
            .submit_gate
            .try_lock()
            .map_err(|_| SessionError::SubmitInProgress)?;

        self.draft
            .with_draft(|draft| draft.validate(client))
            .map_err(CoreError::InvalidDraft)?;

        let number = self.refresh_next_number().await?;
        let invoice = self
            .draft
            .with_draft(|draft| draft.finalize(client, number, issue_date))?;

        debug!(number = %invoice.number, total = %invoice.total, "Submitting invoice");

        let stored = match self.store.create_invoice(&invoice).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(number = %invoice.number, error = %e, "Invoice not saved, draft kept");
                return Err(e.into());
            }
        };

        info!(number = %stored.number, id = ?stored.id, "Invoice emitted");
        self.draft.with_draft_mut(|draft| draft.reset());
        self.refresh_after_change().await;

        Ok(stored)
    }

    /// Deletes the invoice with store id `id`.
    ///
    /// When the store no longer has it, the cached list is refreshed before
    /// the `NotFound` is reported.
    pub async fn delete_invoice(&self, id: &str) -> SessionResult<()> {
        match self.store.delete_invoice(id).await {
            Ok(()) => {
                info!(id, "Invoice deleted");
                self.refresh_after_change().await;
                Ok(())
            }
            Err(StoreError::NotFound { id }) => {
                warn!(id = %id, "Invoice already gone, refreshing list");
                if let Err(e) = self.load_invoices().await {
                    warn!(error = %e, "Could not refresh invoice list");
                }
                Err(StoreError::NotFound { id }.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Reloads the list and next number; failures are logged only, the
    /// change itself already succeeded.
    async fn refresh_after_change(&self) {
        if let Err(e) = self.load_invoices().await {
            warn!(error = %e, "Could not refresh invoice list");
        }
        if let Err(e) = self.refresh_next_number().await {
            warn!(error = %e, "Could not refresh next invoice number");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
