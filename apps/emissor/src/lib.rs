//! # Tudboom Emissor Library
//!
//! Session, commands and exports of the nota fiscal emitter, plus the CLI
//! that drives them.
//!
//! ## Module Organization
//! ```text
//! tudboom_emissor_lib/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── cli.rs          ◄─── clap definitions
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── draft.rs    ◄─── Draft behind a mutex + watch feed
//! │   ├── session.rs  ◄─── Store, cached list, submit gate
//! │   └── config.rs   ◄─── TOML + env configuration
//! ├── commands/
//! │   ├── draft.rs    ◄─── Item editing, tax toggle
//! │   ├── invoice.rs  ◄─── Submit, list, delete, preview
//! │   └── export.rs   ◄─── File exports
//! ├── render/         ◄─── txt / html (tera) / pdf (genpdf)
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod render;
pub mod state;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;
use tudboom_core::render_text;
use tudboom_store::{HttpInvoiceStore, InvoiceStore, MemoryInvoiceStore};

use cli::{parse_item_spec, Cli, Command, EmitArgs, ShowFormat};
use error::ApiError;
use state::{EmissorConfig, EmissorSession};

/// Runs the CLI.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize Logging (stderr, RUST_LOG or info,tudboom=debug)        │
/// │  2. Parse arguments                                                    │
/// │  3. Load config: defaults → emissor.toml → TUDBOOM_* → --api-url       │
/// │  4. Build the store (HTTP, or in-memory with --offline)                │
/// │  5. Create the session and run the command                             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Erro: {}", e.message);
            for field in &e.fields {
                eprintln!("  - {}", field);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tudboom_store=trace` - Trace the API client only
/// - Default: INFO, DEBUG for the tudboom crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tudboom=debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Runs one parsed command line.
pub async fn execute(cli: Cli) -> Result<(), ApiError> {
    let mut config = EmissorConfig::load(cli.config)?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
        config.validate()?;
    }

    let store: Arc<dyn InvoiceStore> = if cli.offline {
        info!("Offline mode: invoices are kept in memory only");
        Arc::new(MemoryInvoiceStore::new())
    } else {
        Arc::new(HttpInvoiceStore::new(&config.api)?)
    };
    let session = EmissorSession::new(store, &config.draft);

    match cli.command {
        Command::List => {
            let invoices = commands::invoice::list_invoices(&session).await?;
            if invoices.is_empty() {
                println!("Nenhuma nota fiscal emitida.");
            }
            for invoice in invoices {
                println!(
                    "{}  {}  {:<30}  {:>12}  {}  {}",
                    invoice.number,
                    invoice.issue_date,
                    invoice.client_name,
                    invoice.total.to_string(),
                    invoice.status,
                    invoice.id.unwrap_or_default()
                );
            }
        }
        Command::NextNumber => {
            let number = commands::invoice::get_next_invoice_number(&session).await?;
            println!("{}", number);
        }
        Command::Emit(args) => emit(&session, &config, &args).await?,
        Command::Show { id, format } => match format {
            ShowFormat::Text => {
                let text = commands::invoice::preview_text(&session, &id, &config.issuer).await?;
                print!("{}", text);
            }
            ShowFormat::Json => {
                let invoice = commands::invoice::get_invoice(&session, &id).await?;
                println!("{}", to_json(&invoice)?);
            }
            ShowFormat::Document => {
                let document =
                    commands::invoice::preview_document(&session, &id, &config.issuer).await?;
                println!("{}", to_json(&document)?);
            }
        },
        Command::Export { id, format, out } => {
            let path = commands::export::export_invoice(
                &session,
                &config,
                &id,
                format,
                out.as_deref(),
            )
            .await?;
            println!("{}", path.display());
        }
        Command::Delete { id } => {
            commands::invoice::delete_invoice(&session, &id).await?;
            println!("Nota fiscal excluída com sucesso!");
        }
    }

    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::internal(e.to_string()))
}

/// Fills the draft from `--item` values and submits it.
async fn emit(session: &EmissorSession, config: &EmissorConfig, args: &EmitArgs) -> Result<(), ApiError> {
    for (index, raw) in args.items.iter().enumerate() {
        let item = parse_item_spec(raw)?;
        if index > 0 {
            commands::draft::add_item(session);
        }
        commands::draft::update_item(session, index, "description", &item.description)?;
        commands::draft::update_item(session, index, "quantity", &item.quantity)?;
        commands::draft::update_item(session, index, "unitPrice", &item.unit_price)?;
    }
    commands::draft::toggle_tax(session, args.tax);

    let invoice = commands::invoice::submit_invoice(session, &args.client()).await?;
    println!("Nota fiscal {} emitida com sucesso!", invoice.number);
    println!();
    print!("{}", render_text(&invoice, &config.issuer));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn offline(args: &[&str]) -> Cli {
        let mut argv = vec!["tudboom-emissor", "--offline"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn test_emit_offline() {
        let cli = offline(&[
            "emit",
            "--name",
            "Maria",
            "--email",
            "maria@x.com",
            "--address",
            "Rua A, 1",
            "--tax-id",
            "123",
            "--item",
            "Caneca;2;10,00",
            "--tax",
        ]);

        execute(cli).await.unwrap();
    }

    #[tokio::test]
    async fn test_emit_without_email_is_validation_error() {
        let cli = offline(&[
            "emit",
            "--name",
            "Maria",
            "--email",
            "",
            "--address",
            "Rua A, 1",
            "--tax-id",
            "123",
            "--item",
            "Caneca;2;10",
        ]);

        let err = execute(cli).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.fields.contains(&"email".to_string()));
    }

    #[tokio::test]
    async fn test_show_unknown_offline_is_not_found() {
        let err = execute(offline(&["show", "nope"])).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.exit_code(), 3);

        let err = execute(offline(&["show", "nope", "--format", "document"]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_emit_with_huge_quantity_is_validation_error() {
        let cli = offline(&[
            "emit",
            "--name",
            "Maria",
            "--email",
            "maria@x.com",
            "--address",
            "Rua A, 1",
            "--tax-id",
            "123",
            "--item",
            "Caneca;9223372036854775807;1.00",
            "--item",
            "Caneca;9223372036854775807;1.00",
        ]);

        let err = execute(cli).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.fields, vec!["items[0].quantity".to_string()]);
    }

    #[tokio::test]
    async fn test_bad_api_url_rejected() {
        let cli = Cli::try_parse_from(["tudboom-emissor", "--api-url", "localhost", "list"]).unwrap();
        let err = execute(cli).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Internal);
    }
}
