//! # Tudboom Emissor Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tudboom Emissor                                  │
//! │                                                                         │
//! │  main.rs ────► tokio runtime, hands off to lib.rs                      │
//! │                                                                         │
//! │  lib.rs ─────► logging, config, store, session, CLI dispatch           │
//! │                                                                         │
//! │  commands/ ──► add_item, update_item, submit_invoice, export_invoice   │
//! │                                                                         │
//! │  state/ ─────► DraftState, EmissorSession, EmissorConfig               │
//! │                                                                         │
//! │  render/ ────► .txt / print HTML / .pdf                                │
//! │                              │                                          │
//! │                              ▼                                          │
//! │              https://api-tudboom.vercel.app                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    tudboom_emissor_lib::run().await
}
