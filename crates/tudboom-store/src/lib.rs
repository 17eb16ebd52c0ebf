//! # tudboom-store: Remote Invoice API for the Tudboom Emissor
//!
//! The external collaborator that persists notas and hands out their
//! sequence numbers.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Emissor Data Flow                                │
//! │                                                                         │
//! │  EmissorSession::submit                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  tudboom-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ InvoiceStore  │    │ HttpInvoice   │    │ MemoryInvoice│  │   │
//! │  │   │   (trait)     │◄───│    Store      │    │    Store     │  │   │
//! │  │   │               │    │  (reqwest)    │    │ (tests/off)  │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │ wire.rs (reais ⇄ centavos)    │   │
//! │  └────────────────────────────────┼────────────────────────────────┘   │
//! │                                   ▼                                     │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          https://api-tudboom.vercel.app (storefront API)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `InvoiceStore` trait
//! - [`http`] - HTTP implementation against the storefront API
//! - [`memory`] - In-process implementation
//! - [`wire`] - JSON shapes of the remote API
//! - [`config`] - API settings
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tudboom_store::{ApiSettings, HttpInvoiceStore, InvoiceStore};
//!
//! let store = HttpInvoiceStore::new(&ApiSettings::default())?;
//! let next = store.next_invoice_number().await?;
//! let invoices = store.list_invoices().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod store;
pub mod wire;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::ApiSettings;
pub use error::{StoreError, StoreResult};
pub use http::HttpInvoiceStore;
pub use memory::MemoryInvoiceStore;
pub use store::InvoiceStore;
