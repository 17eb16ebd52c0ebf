//! # State Module
//!
//! Application state of the emissor.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      EmissorSession                             │   │
//! │  │                                                                 │   │
//! │  │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐  │   │
//! │  │  │  DraftState  │  │ Arc<dyn Invoice  │  │  cached list +   │  │   │
//! │  │  │  Arc<Mutex<  │  │     Store>       │  │  next number     │  │   │
//! │  │  │  InvoiceDraft│  │                  │  │  (RwLock)        │  │   │
//! │  │  │  >> + watch  │  │                  │  │                  │  │   │
//! │  │  └──────────────┘  └──────────────────┘  └──────────────────┘  │   │
//! │  │                     submit_gate: Mutex<()>                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  EmissorConfig: read-only after startup                                │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DraftState: Arc<Mutex<T>>, never held across an await               │
//! │  • Invoice cache: tokio RwLock                                         │
//! │  • Submit: gate taken with try_lock, a second submit is refused        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod draft;
mod session;

pub use config::{ConfigError, DraftSettings, EmissorConfig, ExportSettings, CONFIG_FILE_NAME};
pub use draft::DraftState;
pub use session::{EmissorSession, SessionError, SessionResult};
