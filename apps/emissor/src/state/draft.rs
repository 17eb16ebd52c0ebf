//! # Draft State
//!
//! Holds the nota being authored and tells observers when it changes.
//!
//! ## Thread Safety
//! The draft is wrapped in `Arc<Mutex<T>>` because:
//! 1. Commands may run while a submit is awaiting the invoice API
//! 2. No two mutations may interleave
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft State Operations                               │
//! │                                                                         │
//! │  UI Action               Command                 Draft Change           │
//! │  ─────────               ───────                 ────────────           │
//! │                                                                         │
//! │  "Adicionar Item" ──────► add_item() ──────────► items.push(blank)      │
//! │                                                                         │
//! │  Type in a cell ────────► update_item() ───────► items[i].field = v     │
//! │                                                                         │
//! │  "Remover" ─────────────► remove_item() ───────► items.remove(i)        │
//! │                                                                         │
//! │  "Incluir impostos" ────► toggle_tax() ────────► include_tax = b        │
//! │                                                                         │
//! │  After every with_draft_mut:                                            │
//! │      watch::Sender<DraftSnapshot> ──► subscribers re-render             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tudboom_core::{DraftSnapshot, InvoiceDraft, TaxRate};

/// Shared draft plus its change feed.
#[derive(Debug, Clone)]
pub struct DraftState {
    draft: Arc<Mutex<InvoiceDraft>>,
    updates: Arc<watch::Sender<DraftSnapshot>>,
}

impl DraftState {
    /// Creates a blank draft charging `tax_rate` when tax is on.
    pub fn new(tax_rate: TaxRate) -> Self {
        let draft = InvoiceDraft::with_tax_rate(tax_rate);
        let (updates, _) = watch::channel(draft.snapshot());

        DraftState {
            draft: Arc::new(Mutex::new(draft)),
            updates: Arc::new(updates),
        }
    }

    /// Executes a function with read access to the draft.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = draft_state.with_draft(|draft| draft.compute_totals()).unwrap();
    /// ```
    pub fn with_draft<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&InvoiceDraft) -> R,
    {
        let draft = self.draft.lock().unwrap_or_else(PoisonError::into_inner);
        f(&draft)
    }

    /// Executes a function with write access to the draft, then publishes
    /// the resulting snapshot.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// draft_state.with_draft_mut(|draft| draft.toggle_tax(true));
    /// ```
    pub fn with_draft_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut InvoiceDraft) -> R,
    {
        let mut draft = self.draft.lock().unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut draft);
        self.updates.send_replace(draft.snapshot());
        result
    }

    /// Current rows, tax flag and totals.
    pub fn snapshot(&self) -> DraftSnapshot {
        self.with_draft(InvoiceDraft::snapshot)
    }

    /// Receiver that sees a new snapshot after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<DraftSnapshot> {
        self.updates.subscribe()
    }
}

impl Default for DraftState {
    fn default() -> Self {
        Self::new(TaxRate::default())
    }
}
