//! # Wire Format of the Storefront API
//!
//! JSON shapes exchanged with the remote invoice API.
//!
//! The API speaks reais as JSON numbers (`10.5`) and keeps the client block
//! flattened into `clientName`, `clientEmail`, ... fields. Inside the
//! emissor everything is integer centavos, so this is the only place where
//! floats appear; the conversion rounds to the nearest centavo.
//!
//! ```json
//! {
//!   "_id": "665f1c...",
//!   "invoiceNumber": "NF-000042",
//!   "clientName": "Maria",
//!   "clientEmail": "maria@x.com",
//!   "clientPhone": "",
//!   "clientAddress": "Rua A, 1",
//!   "clientCpfCnpj": "123.456.789-00",
//!   "items": [{ "description": "Caneca", "quantity": 2, "unitPrice": 10, "total": 20 }],
//!   "subtotal": 20, "tax": 2, "total": 22,
//!   "issueDate": "18/10/2026",
//!   "status": "emitida"
//! }
//! ```

use serde::{Deserialize, Serialize};
use tudboom_core::{
    format_issue_date, parse_issue_date, Client, Invoice, InvoiceNumber, InvoiceStatus, LineItem,
    Money,
};

use crate::error::StoreError;

// =============================================================================
// Money Conversion
// =============================================================================

/// Reais as sent by the API → centavos, rounded half away from zero.
pub fn money_from_reais(reais: f64) -> Money {
    Money::from_cents((reais * 100.0).round() as i64)
}

/// Centavos → reais as the API expects them.
pub fn reais_from_money(money: Money) -> f64 {
    money.cents() as f64 / 100.0
}

// =============================================================================
// Records
// =============================================================================

/// One line item on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub description: String,
    pub quantity: i64,
    pub unit_price: f64,
    /// Informational; the total is recomputed from quantity × unit price.
    #[serde(default)]
    pub total: f64,
}

/// A stored nota as the API returns it, or the body of `saveNotaFiscal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub invoice_number: String,
    pub client_name: String,
    pub client_email: String,
    #[serde(default)]
    pub client_phone: Option<String>,
    pub client_address: String,
    pub client_cpf_cnpj: String,
    pub items: Vec<ItemRecord>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub issue_date: String,
    #[serde(default)]
    pub status: InvoiceStatus,
}

impl From<&Invoice> for InvoiceRecord {
    fn from(invoice: &Invoice) -> Self {
        InvoiceRecord {
            id: invoice.id.clone(),
            invoice_number: invoice.number.to_string(),
            client_name: invoice.client.name.clone(),
            client_email: invoice.client.email.clone(),
            // The API stores an empty string for "no phone".
            client_phone: Some(invoice.client.phone().unwrap_or_default().to_string()),
            client_address: invoice.client.address.clone(),
            client_cpf_cnpj: invoice.client.tax_id.clone(),
            items: invoice
                .items
                .iter()
                .map(|item| ItemRecord {
                    description: item.description().to_string(),
                    quantity: item.quantity(),
                    unit_price: reais_from_money(item.unit_price()),
                    total: reais_from_money(item.total()),
                })
                .collect(),
            subtotal: reais_from_money(invoice.subtotal),
            tax: reais_from_money(invoice.tax),
            total: reais_from_money(invoice.total),
            issue_date: format_issue_date(invoice.issue_date),
            status: invoice.status,
        }
    }
}

impl TryFrom<InvoiceRecord> for Invoice {
    type Error = StoreError;

    fn try_from(record: InvoiceRecord) -> Result<Self, Self::Error> {
        let number: InvoiceNumber = record
            .invoice_number
            .parse()
            .map_err(|e| StoreError::InvalidResponse(format!("{}", e)))?;
        let issue_date = parse_issue_date(&record.issue_date)
            .map_err(|e| StoreError::InvalidResponse(format!("{}", e)))?;

        let phone = record
            .client_phone
            .map(|phone| phone.trim().to_string())
            .filter(|phone| !phone.is_empty());

        Ok(Invoice {
            id: record.id,
            number,
            client: Client {
                name: record.client_name,
                email: record.client_email,
                phone,
                address: record.client_address,
                tax_id: record.client_cpf_cnpj,
            },
            items: record
                .items
                .into_iter()
                .map(|item| {
                    LineItem::new(
                        item.description,
                        item.quantity,
                        money_from_reais(item.unit_price),
                    )
                })
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| StoreError::InvalidResponse(e.to_string()))?,
            subtotal: money_from_reais(record.subtotal),
            tax: money_from_reais(record.tax),
            total: money_from_reais(record.total),
            issue_date,
            status: record.status,
        })
    }
}

// =============================================================================
// Other Bodies
// =============================================================================

/// Body of `GET /getNextInvoiceNumber`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextNumberResponse {
    pub next_number: u64,
}

/// Error body of the API (`{"message": "..."}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error)
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

    fn sample_invoice() -> Invoice {
        Invoice {
            id: None,
            number: InvoiceNumber::new(42),
            client: Client {
                name: "Maria".to_string(),
                email: "maria@x.com".to_string(),
                phone: None,
                address: "Rua A, 1".to_string(),
                tax_id: "123.456.789-00".to_string(),
            },
            items: vec![LineItem::new("Caneca", 2, Money::from_cents(1050)).unwrap()],
            subtotal: Money::from_cents(2100),
            tax: Money::from_cents(210),
            total: Money::from_cents(2310),
            issue_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            status: InvoiceStatus::Emitida,
        }
    }

    #[test]
    fn test_money_conversion_rounds_to_centavo() {
        assert_eq!(money_from_reais(10.5).cents(), 1050);
        assert_eq!(money_from_reais(0.1 + 0.2).cents(), 30);
        assert_eq!(money_from_reais(45.9).cents(), 4590);
        assert_eq!(reais_from_money(Money::from_cents(2310)), 23.1);
    }

    #[test]
    fn test_save_body_shape() {
        let record = InvoiceRecord::from(&sample_invoice());
        let body = serde_json::to_value(&record).unwrap();

        assert_eq!(body["invoiceNumber"], "NF-000042");
        assert_eq!(body["clientCpfCnpj"], "123.456.789-00");
        assert_eq!(body["clientPhone"], "");
        assert_eq!(body["items"][0]["unitPrice"], 10.5);
        assert_eq!(body["items"][0]["total"], 21.0);
        assert_eq!(body["total"], 23.1);
        assert_eq!(body["issueDate"], "18/10/2026");
        assert_eq!(body["status"], "emitida");
        assert!(body.get("id").is_none());
    }

    #[test]
    fn test_stored_record_becomes_invoice() {
        let raw = json!({
            "_id": "665f1c",
            "invoiceNumber": "NF-000042",
            "clientName": "Maria",
            "clientEmail": "maria@x.com",
            "clientPhone": "",
            "clientAddress": "Rua A, 1",
            "clientCpfCnpj": "123.456.789-00",
            "items": [{ "description": "Caneca", "quantity": 2, "unitPrice": 10.5, "total": 21 }],
            "subtotal": 21, "tax": 2.1, "total": 23.1,
            "issueDate": "18/10/2026",
            "status": "emitida"
        });

        let record: InvoiceRecord = serde_json::from_value(raw).unwrap();
        let invoice = Invoice::try_from(record).unwrap();

        assert_eq!(invoice.id.as_deref(), Some("665f1c"));
        assert_eq!(invoice.client.phone, None);
        assert_eq!(invoice, sample_invoice().with_id("665f1c"));
    }

    #[test]
    fn test_unknown_status_is_kept() {
        let mut record = InvoiceRecord::from(&sample_invoice());
        record.status = InvoiceStatus::Unknown;
        let mut body = serde_json::to_value(&record).unwrap();
        body["status"] = json!("cancelada");

        let record: InvoiceRecord = serde_json::from_value(body).unwrap();
        assert_eq!(record.status, InvoiceStatus::Unknown);
    }

    #[test]
    fn test_bad_number_is_invalid_response() {
        let mut record = InvoiceRecord::from(&sample_invoice());
        record.invoice_number = "42".to_string();

        let err = Invoice::try_from(record).unwrap_err();
        assert!(matches!(err, StoreError::InvalidResponse(_)));
    }

    #[test]
    fn test_oversized_item_is_invalid_response() {
        let mut record = InvoiceRecord::from(&sample_invoice());
        record.items[0].quantity = i64::MAX;

        let err = Invoice::try_from(record).unwrap_err();
        match err {
            StoreError::InvalidResponse(message) => assert!(message.contains("quantity")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_next_number_body() {
        let body: NextNumberResponse = serde_json::from_str(r#"{"nextNumber": 7}"#).unwrap();
        assert_eq!(body.next_number, 7);
    }
}
