//! # Export Commands
//!
//! Writing an emitted nota to disk as `<number>.txt`, `.html` or `.pdf`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::commands::invoice::get_invoice;
use crate::error::ApiError;
use crate::render::{export_invoice as render_export, ExportFormat};
use crate::state::{EmissorConfig, EmissorSession};

/// Exports the nota with store id `id`.
///
/// ## Arguments
/// * `out_dir` - target directory; the configured `export.out_dir` when `None`
///
/// ## Returns
/// Path of the written file
pub async fn export_invoice(
    session: &EmissorSession,
    config: &EmissorConfig,
    id: &str,
    format: ExportFormat,
    out_dir: Option<&Path>,
) -> Result<PathBuf, ApiError> {
    debug!(id, format = format.extension(), "export_invoice command");

    let invoice = get_invoice(session, id).await?;
    let out_dir = out_dir.unwrap_or(config.export.out_dir.as_path());

    Ok(render_export(
        &invoice,
        &config.issuer,
        &config.export,
        format,
        out_dir,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::draft::update_item;
    use crate::commands::invoice::submit_invoice;
    use crate::error::ErrorCode;
    use crate::state::DraftSettings;
    use std::sync::Arc;
    use tudboom_core::Client;
    use tudboom_store::MemoryInvoiceStore;

    async fn emitted(session: &EmissorSession) -> String {
        update_item(session, 0, "description", "Caneca").unwrap();
        update_item(session, 0, "quantity", "2").unwrap();
        update_item(session, 0, "unitPrice", "10").unwrap();
        let client = Client {
            name: "Maria".into(),
            email: "maria@x.com".into(),
            phone: None,
            address: "Rua A, 1".into(),
            tax_id: "123".into(),
        };
        submit_invoice(session, &client).await.unwrap().id.unwrap()
    }

    #[tokio::test]
    async fn test_export_txt_to_given_dir() {
        let session = EmissorSession::new(Arc::new(MemoryInvoiceStore::new()), &DraftSettings::default());
        let id = emitted(&session).await;
        let dir = tempfile::tempdir().unwrap();

        let path = export_invoice(
            &session,
            &EmissorConfig::default(),
            &id,
            ExportFormat::Txt,
            Some(dir.path()),
        )
        .await
        .unwrap();

        assert_eq!(path, dir.path().join("NF-000001.txt"));
        assert!(std::fs::read_to_string(path).unwrap().contains("Caneca"));
    }

    #[tokio::test]
    async fn test_pdf_without_fonts_is_export_error() {
        let session = EmissorSession::new(Arc::new(MemoryInvoiceStore::new()), &DraftSettings::default());
        let id = emitted(&session).await;
        let dir = tempfile::tempdir().unwrap();

        let mut config = EmissorConfig::default();
        config.export.fonts_dir = dir.path().join("no-fonts");

        let err = export_invoice(&session, &config, &id, ExportFormat::Pdf, Some(dir.path()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ExportError);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let session = EmissorSession::new(Arc::new(MemoryInvoiceStore::new()), &DraftSettings::default());
        let err = export_invoice(
            &session,
            &EmissorConfig::default(),
            "nope",
            ExportFormat::Txt,
            None,
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
