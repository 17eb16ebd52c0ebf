//! # HTTP Invoice Store
//!
//! [`InvoiceStore`] backed by the storefront's REST API.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation             Request                                          │
//! │  ─────────             ───────                                          │
//! │  list_invoices         GET    {base}/getNotasFiscais                    │
//! │  next_invoice_number   GET    {base}/getNextInvoiceNumber               │
//! │  create_invoice        POST   {base}/saveNotaFiscal                     │
//! │  delete_invoice        DELETE {base}/deleteNotaFiscal/{id}              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Mapping
//!
//! | Status          | Error                                  |
//! |-----------------|----------------------------------------|
//! | 2xx             | ok                                     |
//! | 404             | `NotFound` (delete only)               |
//! | 400 / 409 / 422 | `ValidationRejected` with API message  |
//! | anything else   | `CollaboratorUnavailable`              |
//! | transport error | `CollaboratorUnavailable`              |

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};
use tudboom_core::{Invoice, InvoiceNumber};

use crate::config::ApiSettings;
use crate::error::{StoreError, StoreResult};
use crate::store::InvoiceStore;
use crate::wire::{ErrorBody, InvoiceRecord, NextNumberResponse};

/// Invoice store talking to the remote API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpInvoiceStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInvoiceStore {
    /// Builds a store from validated settings.
    pub fn new(settings: &ApiSettings) -> StoreResult<Self> {
        settings.validate()?;

        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| StoreError::InvalidConfig(format!("Failed to build HTTP client: {}", e)))?;

        Ok(HttpInvoiceStore {
            client,
            base_url: settings.normalized_base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

// =============================================================================
// Response Handling
// =============================================================================

/// Extracts the API's error message, falling back to the raw body.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(ErrorBody::into_message)
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| format!("HTTP {}", status))
}

/// Passes 2xx responses through and maps everything else to a store error.
async fn check_status(response: Response, operation: &str) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = error_message(response).await;
    warn!(operation, %status, message = %message, "Invoice API returned an error");

    Err(match status {
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            StoreError::ValidationRejected(message)
        }
        _ => StoreError::CollaboratorUnavailable(format!("{} failed ({}): {}", operation, status, message)),
    })
}

/// Looks for the id the API assigned in a `saveNotaFiscal` response.
///
/// The API has answered with the stored document, with `{ "id": ... }`
/// and with `{ "insertedId": ... }`; all three are accepted.
fn assigned_id(body: &Value) -> Option<String> {
    let candidates = [
        body.get("id"),
        body.get("_id"),
        body.get("insertedId"),
        body.get("notaFiscal").and_then(|nota| nota.get("_id")),
    ];

    candidates.into_iter().flatten().find_map(|value| match value {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

// =============================================================================
// InvoiceStore Implementation
// =============================================================================

#[async_trait]
impl InvoiceStore for HttpInvoiceStore {
    async fn list_invoices(&self) -> StoreResult<Vec<Invoice>> {
        debug!(base_url = %self.base_url, "Fetching invoices");

        let response = self.client.get(self.url("getNotasFiscais")).send().await?;
        let response = check_status(response, "getNotasFiscais").await?;
        let records: Vec<InvoiceRecord> = response.json().await?;

        let invoices = records
            .into_iter()
            .map(Invoice::try_from)
            .collect::<StoreResult<Vec<_>>>()?;

        debug!(count = invoices.len(), "Invoices fetched");
        Ok(invoices)
    }

    async fn next_invoice_number(&self) -> StoreResult<InvoiceNumber> {
        let response = self.client.get(self.url("getNextInvoiceNumber")).send().await?;
        let response = check_status(response, "getNextInvoiceNumber").await?;
        let body: NextNumberResponse = response.json().await?;

        debug!(next_number = body.next_number, "Next invoice number fetched");
        Ok(InvoiceNumber::new(body.next_number))
    }

    async fn create_invoice(&self, invoice: &Invoice) -> StoreResult<Invoice> {
        let record = InvoiceRecord::from(invoice);
        debug!(number = %invoice.number, items = record.items.len(), "Saving invoice");

        let response = self
            .client
            .post(self.url("saveNotaFiscal"))
            .json(&record)
            .send()
            .await?;
        let response = check_status(response, "saveNotaFiscal").await?;

        // An empty or non-JSON success body still means the nota was stored.
        let body = response.text().await?;
        let stored = match serde_json::from_str::<Value>(&body).ok() {
            Some(value) => match assigned_id(&value) {
                Some(id) => invoice.clone().with_id(id),
                None => invoice.clone(),
            },
            None => invoice.clone(),
        };

        info!(number = %stored.number, id = ?stored.id, "Invoice saved");
        Ok(stored)
    }

    async fn delete_invoice(&self, id: &str) -> StoreResult<()> {
        debug!(id, "Deleting invoice");

        let response = self
            .client
            .delete(self.url(&format!("deleteNotaFiscal/{}", id)))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        check_status(response, "deleteNotaFiscal").await?;

        info!(id, "Invoice deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use tudboom_core::{Client, InvoiceStatus, LineItem, Money};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> HttpInvoiceStore {
        HttpInvoiceStore::new(&ApiSettings::with_base_url(server.uri())).unwrap()
    }

    fn sample_invoice() -> Invoice {
        Invoice {
            id: None,
            number: InvoiceNumber::new(7),
            client: Client {
                name: "Maria".to_string(),
                email: "maria@x.com".to_string(),
                phone: Some("11 99999-0000".to_string()),
                address: "Rua A, 1".to_string(),
                tax_id: "123.456.789-00".to_string(),
            },
            items: vec![LineItem::new("Caneca", 2, Money::from_cents(1000)).unwrap()],
            subtotal: Money::from_cents(2000),
            tax: Money::zero(),
            total: Money::from_cents(2000),
            issue_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            status: InvoiceStatus::Emitida,
        }
    }

    #[test]
    fn test_rejects_invalid_settings() {
        let err = HttpInvoiceStore::new(&ApiSettings::with_base_url("localhost")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_assigned_id_shapes() {
        assert_eq!(assigned_id(&json!({"_id": "a1"})).as_deref(), Some("a1"));
        assert_eq!(assigned_id(&json!({"insertedId": "b2"})).as_deref(), Some("b2"));
        assert_eq!(assigned_id(&json!({"id": 9})).as_deref(), Some("9"));
        assert_eq!(assigned_id(&json!({"message": "ok"})), None);
    }

    #[tokio::test]
    async fn test_next_invoice_number() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getNextInvoiceNumber"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"nextNumber": 43})))
            .mount(&server)
            .await;

        let number = store_for(&server).next_invoice_number().await.unwrap();
        assert_eq!(number.to_string(), "NF-000043");
    }

    #[tokio::test]
    async fn test_list_invoices() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getNotasFiscais"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "_id": "665f1c",
                "invoiceNumber": "NF-000001",
                "clientName": "Maria",
                "clientEmail": "maria@x.com",
                "clientAddress": "Rua A, 1",
                "clientCpfCnpj": "123",
                "items": [{"description": "Caneca", "quantity": 2, "unitPrice": 10, "total": 20}],
                "subtotal": 20, "tax": 0, "total": 20,
                "issueDate": "18/10/2026",
                "status": "emitida"
            }])))
            .mount(&server)
            .await;

        let invoices = store_for(&server).list_invoices().await.unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].id.as_deref(), Some("665f1c"));
        assert_eq!(invoices[0].items[0].total(), Money::from_cents(2000));
    }

    #[tokio::test]
    async fn test_create_invoice_posts_wire_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/saveNotaFiscal"))
            .and(body_partial_json(json!({
                "invoiceNumber": "NF-000007",
                "clientPhone": "11 99999-0000",
                "subtotal": 20.0,
                "issueDate": "18/10/2026"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"insertedId": "abc"})))
            .expect(1)
            .mount(&server)
            .await;

        let stored = store_for(&server).create_invoice(&sample_invoice()).await.unwrap();
        assert_eq!(stored.id.as_deref(), Some("abc"));
        assert_eq!(stored.number, InvoiceNumber::new(7));
    }

    #[tokio::test]
    async fn test_create_invoice_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/saveNotaFiscal"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"message": "Número já utilizado"})),
            )
            .mount(&server)
            .await;

        let err = store_for(&server).create_invoice(&sample_invoice()).await.unwrap_err();
        match err {
            StoreError::ValidationRejected(message) => assert_eq!(message, "Número já utilizado"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getNotasFiscais"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = store_for(&server).list_invoices().await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_delete_invoice() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/deleteNotaFiscal/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/deleteNotaFiscal/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let store = store_for(&server);
        store.delete_invoice("abc").await.unwrap();

        let err = store.delete_invoice("gone").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id } if id == "gone"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_unavailable() {
        let store = HttpInvoiceStore::new(&ApiSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        })
        .unwrap();

        let err = store.next_invoice_number().await.unwrap_err();
        assert!(matches!(err, StoreError::CollaboratorUnavailable(_)));
    }
}
