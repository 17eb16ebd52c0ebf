//! # Commands Module
//!
//! Every operation the emissor exposes to its front end (the CLI today).
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── draft.rs    ◄─── Draft editing (items, tax toggle, validation)
//! ├── invoice.rs  ◄─── Listing, numbering, submit, delete, preview
//! └── export.rs   ◄─── .txt / .html / .pdf files
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Front end                                                              │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  commands::draft::update_item(&session, 0, "unitPrice", "10,50")       │
//! │      │   raw text in, parsed with the session's InputPolicy            │
//! │      ▼                                                                  │
//! │  Result<DraftSnapshot, ApiError>                                        │
//! │      │   (JSON-serializable)                                            │
//! │      ▼                                                                  │
//! │  Front end re-renders rows and totals                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod draft;
pub mod export;
pub mod invoice;
