//! # Command Line Interface
//!
//! ```text
//! tudboom-emissor [--config FILE] [--api-url URL] [--offline] <COMMAND>
//!
//!   list                                   invoice list
//!   next-number                            number the next nota gets
//!   emit --name .. --email .. --address .. --tax-id ..
//!        --item "Caneca;2;10,00" [--item ..] [--tax]
//!   show <ID> [--format text|json|document]
//!   export <ID> --format txt|html|pdf [--out DIR]
//!   delete <ID>
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tudboom_core::Client;

use crate::error::ApiError;
use crate::render::ExportFormat;

#[derive(Debug, Parser)]
#[command(name = "tudboom-emissor", version, about = "Emissor de notas fiscais Tudboom")]
pub struct Cli {
    /// Config file (default: emissor.toml in the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the invoice API, overriding config and environment
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Use an in-memory store instead of the remote API (nothing is kept)
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List emitted notas
    List,

    /// Show the number the next nota will get
    NextNumber,

    /// Emit a nota
    Emit(EmitArgs),

    /// Show an emitted nota
    Show {
        id: String,
        #[arg(long, value_enum, default_value_t = ShowFormat::Text)]
        format: ShowFormat,
    },

    /// Write an emitted nota to a file
    Export {
        id: String,
        #[arg(long, value_enum)]
        format: ExportFormat,
        /// Output directory (default: export.out_dir from config)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Delete an emitted nota
    Delete { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShowFormat {
    Text,
    Json,
    /// Print layout (blocks, item rows, totals) as JSON
    Document,
}

#[derive(Debug, Args)]
pub struct EmitArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub address: String,

    /// CPF or CNPJ
    #[arg(long = "tax-id")]
    pub tax_id: String,

    /// Line item as "description;quantity;unit price", repeatable
    #[arg(long = "item")]
    pub items: Vec<String>,

    /// Add the 10% tax
    #[arg(long)]
    pub tax: bool,
}

impl EmitArgs {
    pub fn client(&self) -> Client {
        Client {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            tax_id: self.tax_id.clone(),
        }
    }
}

/// Raw cells of one `--item` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
}

/// Splits `"description;quantity;price"`. The description may itself
/// contain `;`; the last two fields are taken from the right.
pub fn parse_item_spec(raw: &str) -> Result<ItemSpec, ApiError> {
    let mut parts = raw.rsplitn(3, ';');
    let unit_price = parts.next();
    let quantity = parts.next();
    let description = parts.next();

    match (description, quantity, unit_price) {
        (Some(description), Some(quantity), Some(unit_price)) => Ok(ItemSpec {
            description: description.trim().to_string(),
            quantity: quantity.trim().to_string(),
            unit_price: unit_price.trim().to_string(),
        }),
        _ => Err(ApiError::validation(format!(
            "Invalid item '{}', expected \"description;quantity;unit price\"",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_spec() {
        let item = parse_item_spec("Caneca;2;10,00").unwrap();
        assert_eq!(item.description, "Caneca");
        assert_eq!(item.quantity, "2");
        assert_eq!(item.unit_price, "10,00");

        let item = parse_item_spec("Kit; caneca + copo ; 1 ; 45.90").unwrap();
        assert_eq!(item.description, "Kit; caneca + copo");
        assert_eq!(item.unit_price, "45.90");

        assert!(parse_item_spec("Caneca;2").is_err());
    }

    #[test]
    fn test_parse_emit() {
        let cli = Cli::try_parse_from([
            "tudboom-emissor",
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
            "Caneca;2;10",
            "--item",
            "Camiseta;1;45,90",
            "--tax",
        ])
        .unwrap();

        match cli.command {
            Command::Emit(args) => {
                assert_eq!(args.items.len(), 2);
                assert!(args.tax);
                assert_eq!(args.client().phone, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_export_and_globals() {
        let cli = Cli::try_parse_from([
            "tudboom-emissor",
            "export",
            "abc",
            "--format",
            "pdf",
            "--out",
            "/tmp",
            "--offline",
        ])
        .unwrap();

        assert!(cli.offline);
        match cli.command {
            Command::Export { id, format, out } => {
                assert_eq!(id, "abc");
                assert_eq!(format, ExportFormat::Pdf);
                assert_eq!(out, Some(PathBuf::from("/tmp")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_show_formats() {
        let cli = Cli::try_parse_from(["tudboom-emissor", "show", "abc", "--format", "document"])
            .unwrap();
        match cli.command {
            Command::Show { id, format } => {
                assert_eq!(id, "abc");
                assert_eq!(format, ShowFormat::Document);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["tudboom-emissor", "show", "abc"]).unwrap();
        assert!(matches!(cli.command, Command::Show { format: ShowFormat::Text, .. }));
        assert!(Cli::try_parse_from(["tudboom-emissor", "show", "abc", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_export_requires_format() {
        assert!(Cli::try_parse_from(["tudboom-emissor", "export", "abc"]).is_err());
    }
}
