//! # Invoice Commands
//!
//! Emitting, listing and deleting notas, and previewing an emitted one.
//!
//! ## Submit Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  User fills client data and clicks "Emitir Nota"                       │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  submit_invoice(&session, client)                                      │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  ┌────────────────────────────────────────────────────────────────┐    │
//! │  │  1. Validate draft + client (all problems at once)             │    │
//! │  │  2. Fetch next number from the API                             │    │
//! │  │  3. Snapshot items into an Invoice (status "emitida")          │    │
//! │  │  4. POST it; on failure the draft is kept for retry            │    │
//! │  │  5. Reset draft, refresh list and next number                  │    │
//! │  └────────────────────────────────────────────────────────────────┘    │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  "Nota fiscal NF-000042 emitida com sucesso!"                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use tudboom_core::{render_text, Client, Invoice, InvoiceDocument, InvoiceNumber, InvoiceStatus, Issuer, Money};

use crate::error::ApiError;
use crate::state::EmissorSession;

/// One row of the invoice list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub id: Option<String>,
    pub number: InvoiceNumber,
    pub client_name: String,
    pub issue_date: String,
    pub total: Money,
    pub status: InvoiceStatus,
}

impl From<&Invoice> for InvoiceSummary {
    fn from(invoice: &Invoice) -> Self {
        InvoiceSummary {
            id: invoice.id.clone(),
            number: invoice.number,
            client_name: invoice.client.name.clone(),
            issue_date: invoice.issue_date_display(),
            total: invoice.total,
            status: invoice.status,
        }
    }
}

/// Reloads and returns the invoice list.
pub async fn list_invoices(session: &EmissorSession) -> Result<Vec<InvoiceSummary>, ApiError> {
    debug!("list_invoices command");
    let invoices = session.load_invoices().await?;
    Ok(invoices.iter().map(InvoiceSummary::from).collect())
}

/// Fetches the number the next nota will get.
pub async fn get_next_invoice_number(session: &EmissorSession) -> Result<InvoiceNumber, ApiError> {
    debug!("get_next_invoice_number command");
    Ok(session.refresh_next_number().await?)
}

/// Emits the current draft for `client`.
///
/// ## Errors
/// - `VALIDATION_ERROR`: draft or client incomplete, or the API refused it
/// - `COLLABORATOR_UNAVAILABLE`: the API could not be reached
/// - `SUBMIT_IN_PROGRESS`: another submit of this session is running
pub async fn submit_invoice(session: &EmissorSession, client: &Client) -> Result<Invoice, ApiError> {
    debug!(client = %client.name, "submit_invoice command");
    Ok(session.submit(client).await?)
}

/// Deletes an emitted nota by store id.
pub async fn delete_invoice(session: &EmissorSession, id: &str) -> Result<(), ApiError> {
    debug!(id, "delete_invoice command");
    Ok(session.delete_invoice(id).await?)
}

/// Gets one emitted nota, loading the list first if it is not cached.
pub async fn get_invoice(session: &EmissorSession, id: &str) -> Result<Invoice, ApiError> {
    debug!(id, "get_invoice command");

    if let Some(invoice) = session.find_invoice(id).await {
        return Ok(invoice);
    }

    session.load_invoices().await?;
    session
        .find_invoice(id)
        .await
        .ok_or_else(|| ApiError::not_found("Invoice", id))
}

/// Plain-text rendering of an emitted nota.
pub async fn preview_text(session: &EmissorSession, id: &str, issuer: &Issuer) -> Result<String, ApiError> {
    let invoice = get_invoice(session, id).await?;
    Ok(render_text(&invoice, issuer))
}

/// Structured document of an emitted nota, as the print layout uses it.
pub async fn preview_document(
    session: &EmissorSession,
    id: &str,
    issuer: &Issuer,
) -> Result<InvoiceDocument, ApiError> {
    let invoice = get_invoice(session, id).await?;
    Ok(InvoiceDocument::build(&invoice, issuer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::draft::{add_item, toggle_tax, update_item};
    use crate::error::ErrorCode;
    use crate::state::DraftSettings;
    use std::sync::Arc;
    use tudboom_store::MemoryInvoiceStore;

    fn client() -> Client {
        Client {
            name: "Maria".into(),
            email: "maria@x.com".into(),
            phone: None,
            address: "Rua A, 1".into(),
            tax_id: "123".into(),
        }
    }

    fn session(store: Arc<MemoryInvoiceStore>) -> EmissorSession {
        EmissorSession::new(store, &DraftSettings::default())
    }

    #[tokio::test]
    async fn test_emit_then_list_and_preview() {
        let store = Arc::new(MemoryInvoiceStore::new());
        let session = session(store);
        update_item(&session, 0, "description", "Caneca").unwrap();
        update_item(&session, 0, "quantity", "2").unwrap();
        update_item(&session, 0, "unitPrice", "10").unwrap();

        let next = get_next_invoice_number(&session).await.unwrap();
        let invoice = submit_invoice(&session, &client()).await.unwrap();
        assert_eq!(invoice.number, next);

        let list = list_invoices(&session).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].client_name, "Maria");
        assert_eq!(list[0].total, Money::from_cents(2000));

        let id = invoice.id.unwrap();
        let text = preview_text(&session, &id, &Issuer::default()).await.unwrap();
        assert!(text.contains("Caneca"));
        assert!(text.contains("Subtotal: R$ 20.00"));
        assert!(text.contains("Impostos: R$ 0.00"));
        assert!(text.contains("Total: R$ 20.00"));
    }

    #[tokio::test]
    async fn test_preview_document_lays_out_invoice() {
        let session = session(Arc::new(MemoryInvoiceStore::new()));
        update_item(&session, 0, "description", "Caneca").unwrap();
        update_item(&session, 0, "quantity", "2").unwrap();
        update_item(&session, 0, "unitPrice", "10,00").unwrap();
        add_item(&session);
        update_item(&session, 1, "description", "Camiseta").unwrap();
        update_item(&session, 1, "unitPrice", "45,90").unwrap();
        toggle_tax(&session, true);
        let invoice = submit_invoice(&session, &client()).await.unwrap();

        let id = invoice.id.clone().unwrap();
        let doc = preview_document(&session, &id, &Issuer::default()).await.unwrap();

        assert_eq!(doc.file_stem, invoice.number.to_string());
        assert_eq!(doc.invoice.lines[0].label.as_deref(), Some("Número"));
        assert_eq!(doc.invoice.lines[0].value, invoice.number.to_string());

        let client_lines: Vec<_> = doc
            .client
            .lines
            .iter()
            .map(|l| (l.label.as_deref().unwrap_or_default(), l.value.as_str()))
            .collect();
        assert_eq!(
            client_lines,
            vec![
                ("Nome", "Maria"),
                ("Email", "maria@x.com"),
                ("CPF/CNPJ", "123"),
                ("Endereço", "Rua A, 1"),
            ]
        );

        let items: Vec<_> = doc
            .items
            .iter()
            .map(|row| (row.description.as_str(), row.quantity.as_str(), row.total.as_str()))
            .collect();
        assert_eq!(
            items,
            vec![("Caneca", "2", "R$ 20.00"), ("Camiseta", "1", "R$ 45.90")]
        );

        let taxes = doc.totals.iter().find(|t| t.label == "Impostos:").unwrap();
        assert_eq!(taxes.value, "R$ 6.59");
        assert!(!taxes.emphasized);
        assert_eq!(doc.totals.last().unwrap().value, "R$ 72.49");

        let err = preview_document(&session, "missing", &Issuer::default()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_get_invoice_loads_when_not_cached() {
        let store = Arc::new(MemoryInvoiceStore::new());
        let seeded = {
            let other = session(store.clone());
            update_item(&other, 0, "description", "Caneca").unwrap();
            update_item(&other, 0, "unitPrice", "10").unwrap();
            submit_invoice(&other, &client()).await.unwrap()
        };

        let fresh = session(store);
        let id = seeded.id.unwrap();
        assert_eq!(get_invoice(&fresh, &id).await.unwrap().number, seeded.number);

        let err = get_invoice(&fresh, "missing").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_submit_blank_draft_is_validation_error() {
        let session = session(Arc::new(MemoryInvoiceStore::new()));
        let err = submit_invoice(&session, &client()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.fields.contains(&"items[0].unitPrice".to_string()));
    }
}
