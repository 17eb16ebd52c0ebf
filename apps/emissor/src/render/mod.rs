//! # Export Renderers
//!
//! Turn a finalized nota into a file.
//!
//! ```text
//! Invoice ──► render_text ─────────────► NF-000042.txt
//!    │
//!    └──────► InvoiceDocument::build ──┬► html::render_html ─► NF-000042.html (print)
//!                                      └► pdf::render_pdf ──► NF-000042.pdf
//! ```

pub mod html;
pub mod pdf;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use tudboom_core::{render_text, Invoice, InvoiceDocument, Issuer};

use crate::state::ExportSettings;

/// Export failures.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(String),

    /// The PDF font family could not be loaded.
    #[error("Fonts for '{family}' not found in {dir}")]
    FontsMissing { dir: PathBuf, family: String },

    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

/// File format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Plain text nota
    Txt,
    /// Standalone page for the browser's print dialog
    Html,
    /// PDF document
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Html => "html",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// Path the export of `invoice` gets in `out_dir` (`NF-000042.pdf`).
pub fn export_path(invoice: &Invoice, format: ExportFormat, out_dir: &Path) -> PathBuf {
    out_dir.join(format!("{}.{}", invoice.file_stem(), format.extension()))
}

/// Writes `invoice` as `format` into `out_dir` and returns the file path.
pub fn export_invoice(
    invoice: &Invoice,
    issuer: &Issuer,
    settings: &ExportSettings,
    format: ExportFormat,
    out_dir: &Path,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(out_dir)?;
    let path = export_path(invoice, format, out_dir);

    match format {
        ExportFormat::Txt => std::fs::write(&path, render_text(invoice, issuer))?,
        ExportFormat::Html => {
            let document = InvoiceDocument::build(invoice, issuer);
            std::fs::write(&path, html::render_html(&document)?)?;
        }
        ExportFormat::Pdf => {
            let document = InvoiceDocument::build(invoice, issuer);
            let bytes = pdf::render_pdf(&document, settings)?;
            std::fs::write(&path, bytes)?;
        }
    }

    info!(number = %invoice.number, path = %path.display(), "Invoice exported");
    Ok(path)
}
