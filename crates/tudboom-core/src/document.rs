//! # Invoice Documents
//!
//! Pure renderings of a finalized [`Invoice`]: a plain-text export and a
//! structured document that print (HTML) and PDF renderers lay out.
//!
//! ## Document Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TUDBOOM                                               NOTA             │
//! │  Produtos Personalizados                    (Sem validade fiscal)       │
//! │                                                                         │
//! │  DADOS DA EMPRESA                  DADOS DA NOTA                        │
//! │  TUDBOOM LTDA                      Número: NF-000042                    │
//! │  Rua Luiza de Carvalho, 250        Data de Emissão: 18/10/2026          │
//! │  ...                               Status: emitida                      │
//! │                                                                         │
//! │  DADOS DO CLIENTE                                                       │
//! │  Nome / Email / Telefone? / CPF/CNPJ / Endereço                         │
//! │                                                                         │
//! │  ITENS                                                                  │
//! │  Descrição          Qtd     Valor Unit.     Total                       │
//! │  Caneca               2      R$ 10.00       R$ 20.00                    │
//! │                                                                         │
//! │                                   Subtotal:  R$ 20.00                   │
//! │                                   Impostos:  R$ 2.00                    │
//! │                                   Total:     R$ 22.00                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both builders only read the invoice: same invoice in, same output out.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::types::Invoice;

// =============================================================================
// Issuer
// =============================================================================

/// The company printed on every nota.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct Issuer {
    /// Brand name (header and footer).
    pub name: String,
    pub legal_name: String,
    pub tagline: String,
    pub address_lines: Vec<String>,
    pub phone: String,
    pub email: String,
    /// Logo path or URL for the print layout, if any.
    pub logo: Option<String>,
}

impl Default for Issuer {
    fn default() -> Self {
        Issuer {
            name: "Tudboom".to_string(),
            legal_name: "TUDBOOM LTDA".to_string(),
            tagline: "Produtos Personalizados".to_string(),
            address_lines: vec![
                "Rua Luiza de Carvalho, 250".to_string(),
                "Sorocaba".to_string(),
                "CEP: 18046-161".to_string(),
            ],
            phone: "(15)991865-965".to_string(),
            email: "comercial.tudboom@gmail.com".to_string(),
            logo: Some("/assets/imagens/logo.png".to_string()),
        }
    }
}

// =============================================================================
// Structured Document
// =============================================================================

/// One line of an info block; `label` is printed in bold before the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InfoLine {
    pub label: Option<String>,
    pub value: String,
    pub strong: bool,
}

impl InfoLine {
    fn labeled(label: &str, value: impl Into<String>) -> Self {
        InfoLine {
            label: Some(label.to_string()),
            value: value.into(),
            strong: false,
        }
    }

    fn plain(value: impl Into<String>) -> Self {
        InfoLine {
            label: None,
            value: value.into(),
            strong: false,
        }
    }

    fn strong(value: impl Into<String>) -> Self {
        InfoLine {
            strong: true,
            ..InfoLine::plain(value)
        }
    }
}

/// A titled group of lines ("DADOS DO CLIENTE").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InfoBlock {
    pub heading: String,
    pub lines: Vec<InfoLine>,
}

/// One printed item row, already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemRow {
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub total: String,
}

/// A totals line; the grand total is `emphasized`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TotalLine {
    pub label: String,
    pub value: String,
    pub emphasized: bool,
}

/// Everything a print or PDF renderer needs, in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceDocument {
    /// Export file name without extension (`NF-000042`).
    pub file_stem: String,
    pub company_name: String,
    pub company_tagline: String,
    pub logo: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub issuer: InfoBlock,
    pub invoice: InfoBlock,
    pub client: InfoBlock,
    pub items_heading: String,
    pub item_columns: Vec<String>,
    pub items: Vec<ItemRow>,
    pub totals: Vec<TotalLine>,
    pub footer: Vec<String>,
}

impl InvoiceDocument {
    /// Lays out `invoice` as issued by `issuer`.
    pub fn build(invoice: &Invoice, issuer: &Issuer) -> Self {
        let mut issuer_lines = vec![InfoLine::strong(&issuer.legal_name)];
        issuer_lines.extend(issuer.address_lines.iter().map(InfoLine::plain));
        issuer_lines.push(InfoLine::plain(format!("Telefone: {}", issuer.phone)));
        issuer_lines.push(InfoLine::plain(format!("Email: {}", issuer.email)));

        InvoiceDocument {
            file_stem: invoice.file_stem(),
            company_name: issuer.name.to_uppercase(),
            company_tagline: issuer.tagline.clone(),
            logo: issuer.logo.clone(),
            title: "NOTA".to_string(),
            subtitle: "(Sem validade fiscal)".to_string(),
            issuer: InfoBlock {
                heading: "DADOS DA EMPRESA".to_string(),
                lines: issuer_lines,
            },
            invoice: InfoBlock {
                heading: "DADOS DA NOTA".to_string(),
                lines: vec![
                    InfoLine::labeled("Número", invoice.number.to_string()),
                    InfoLine::labeled("Data de Emissão", invoice.issue_date_display()),
                    InfoLine::labeled("Status", invoice.status.to_string()),
                ],
            },
            client: InfoBlock {
                heading: "DADOS DO CLIENTE".to_string(),
                lines: client_lines(invoice)
                    .into_iter()
                    .map(|(label, value)| InfoLine::labeled(label, value))
                    .collect(),
            },
            items_heading: "ITENS".to_string(),
            item_columns: ["Descrição", "Qtd", "Valor Unit.", "Total"]
                .into_iter()
                .map(String::from)
                .collect(),
            items: invoice
                .items
                .iter()
                .map(|item| ItemRow {
                    description: item.description().to_string(),
                    quantity: item.quantity().to_string(),
                    unit_price: item.unit_price().to_string(),
                    total: item.total().to_string(),
                })
                .collect(),
            totals: totals_lines(invoice)
                .into_iter()
                .map(|(label, value)| TotalLine {
                    emphasized: label == "Total",
                    label: format!("{}:", label),
                    value,
                })
                .collect(),
            footer: footer_lines(issuer),
        }
    }
}

// =============================================================================
// Plain Text
// =============================================================================

/// Renders the plain-text export (`NF-000042.txt`).
///
/// ## Layout
/// Header, client block, numbered items, totals (subtotal, taxes and total,
/// each printed once, taxes even when zero), footer.
///
/// ```rust
/// use chrono::NaiveDate;
/// use tudboom_core::{render_text, Client, InvoiceDraft, InvoiceNumber, Issuer, ItemField, Money};
///
/// let mut draft = InvoiceDraft::new();
/// draft.update_item(0, ItemField::Description("Caneca".into())).unwrap();
/// draft.update_item(0, ItemField::Quantity(2)).unwrap();
/// draft.update_item(0, ItemField::UnitPrice(Money::from_cents(1000))).unwrap();
/// let client = Client {
///     name: "Maria".into(),
///     email: "maria@example.com".into(),
///     phone: None,
///     address: "Rua A, 1".into(),
///     tax_id: "123".into(),
/// };
/// let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
/// let invoice = draft.finalize(&client, InvoiceNumber::new(1), date).unwrap();
///
/// let text = render_text(&invoice, &Issuer::default());
/// assert!(text.contains("1. Caneca - Qtd: 2 - Valor: R$ 10.00 - Total: R$ 20.00"));
/// ```
pub fn render_text(invoice: &Invoice, issuer: &Issuer) -> String {
    let mut out = String::new();
    // fmt::Write for String never returns an error
    write_text(&mut out, invoice, issuer).map(|()| out).unwrap_or_default()
}

fn write_text(out: &mut impl fmt::Write, invoice: &Invoice, issuer: &Issuer) -> fmt::Result {
    let title = format!("{} - NOTA FISCAL", issuer.name.to_uppercase());

    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "=".repeat(title.chars().count()))?;
    writeln!(out)?;
    writeln!(out, "Número: {}", invoice.number)?;
    writeln!(out, "Data: {}", invoice.issue_date_display())?;
    writeln!(out, "Status: {}", invoice.status)?;
    writeln!(out)?;

    writeln!(out, "DADOS DO CLIENTE:")?;
    for (label, value) in client_lines(invoice) {
        writeln!(out, "{}: {}", label, value)?;
    }
    writeln!(out)?;

    writeln!(out, "ITENS:")?;
    for (index, item) in invoice.items.iter().enumerate() {
        writeln!(
            out,
            "{}. {} - Qtd: {} - Valor: {} - Total: {}",
            index + 1,
            item.description(),
            item.quantity(),
            item.unit_price(),
            item.total()
        )?;
    }
    writeln!(out)?;

    writeln!(out, "TOTAIS:")?;
    for (label, value) in totals_lines(invoice) {
        writeln!(out, "{}: {}", label, value)?;
    }
    writeln!(out)?;

    writeln!(out, "---")?;
    for line in footer_lines(issuer) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

// =============================================================================
// Shared Sections
// =============================================================================

fn client_lines(invoice: &Invoice) -> Vec<(&'static str, String)> {
    let client = &invoice.client;
    let mut lines = vec![("Nome", client.name.clone()), ("Email", client.email.clone())];
    if let Some(phone) = client.phone() {
        lines.push(("Telefone", phone.to_string()));
    }
    lines.push(("CPF/CNPJ", client.tax_id.clone()));
    lines.push(("Endereço", client.address.clone()));
    lines
}

fn totals_lines(invoice: &Invoice) -> Vec<(&'static str, String)> {
    vec![
        ("Subtotal", invoice.subtotal.to_string()),
        ("Impostos", invoice.tax.to_string()),
        ("Total", invoice.total.to_string()),
    ]
}

fn footer_lines(issuer: &Issuer) -> Vec<String> {
    vec![
        "Esta é uma nota fiscal sem validade fiscal.".to_string(),
        format!("{} - {}", issuer.name, issuer.tagline),
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================
