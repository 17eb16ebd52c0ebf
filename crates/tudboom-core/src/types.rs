//! # Domain Types
//!
//! Core domain types of the nota fiscal emitter.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │     Client      │   │     Invoice     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  description    │   │  name           │   │  id (server)    │       │
//! │  │  quantity       │   │  email          │   │  number NF-...  │       │
//! │  │  unit_price     │   │  phone (opt)    │   │  items snapshot │       │
//! │  │  total (derived)│   │  address/tax_id │   │  totals, date   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │ InvoiceNumber   │   │ InvoiceStatus   │       │
//! │  │  bps (u32)      │   │  NF-000042      │   │  Emitida        │       │
//! │  │  1000 = 10%     │   │                 │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, ValidationError};
use crate::money::Money;
use crate::validation::{validate_quantity_range, validate_unit_price_range, ValidationResult};
use crate::{INVOICE_NUMBER_PREFIX, INVOICE_NUMBER_WIDTH, ISSUE_DATE_FORMAT};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1000 bps = 10%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One row of an invoice.
///
/// ## Invariant
/// `total` is always `unit_price × quantity`, exactly. The fields are
/// private and the only way to change one is [`LineItem::apply`], which
/// recomputes the total before returning. Deserialization recomputes it
/// too, so a stale total can never enter the system from outside.
///
/// Quantity is bounded by [`crate::MAX_QUANTITY`] and unit price by
/// [`crate::MAX_UNIT_PRICE_CENTS`]; values beyond them are refused, never
/// clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", try_from = "LineItemFields")]
#[ts(export)]
pub struct LineItem {
    description: String,
    quantity: i64,
    unit_price: Money,
    total: Money,
}

/// Deserialization shape of a line item (no total).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineItemFields {
    #[serde(default)]
    description: String,
    #[serde(default = "default_quantity")]
    quantity: i64,
    #[serde(default)]
    unit_price: Money,
}

fn default_quantity() -> i64 {
    1
}

impl TryFrom<LineItemFields> for LineItem {
    type Error = ValidationError;

    fn try_from(fields: LineItemFields) -> Result<Self, Self::Error> {
        LineItem::new(fields.description, fields.quantity, fields.unit_price)
    }
}

/// `unit_price × quantity` for values inside the row limits.
fn row_total(quantity: i64, unit_price: Money) -> ValidationResult<Money> {
    validate_quantity_range(ItemFieldName::Quantity.as_str(), quantity)?;
    validate_unit_price_range(ItemFieldName::UnitPrice.as_str(), unit_price)?;
    unit_price
        .checked_mul_quantity(quantity)
        .ok_or_else(|| ValidationError::TooLarge {
            field: "total".to_string(),
            max: Money::from_cents(i64::MAX).to_string(),
        })
}

impl LineItem {
    /// Creates a line item and computes its total.
    ///
    /// ## Errors
    /// [`ValidationError::TooLarge`] when quantity or unit price is beyond
    /// the row limits.
    pub fn new(
        description: impl Into<String>,
        quantity: i64,
        unit_price: Money,
    ) -> ValidationResult<Self> {
        Ok(LineItem {
            description: description.into(),
            quantity,
            unit_price,
            total: row_total(quantity, unit_price)?,
        })
    }

    /// The row a fresh draft starts with: empty description, qty 1, R$ 0.00.
    pub fn blank() -> Self {
        LineItem {
            description: String::new(),
            quantity: default_quantity(),
            unit_price: Money::zero(),
            total: Money::zero(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn total(&self) -> Money {
        self.total
    }

    /// Sets one field and recomputes the total.
    ///
    /// ## Errors
    /// [`ValidationError::TooLarge`] when the new value is beyond the row
    /// limits; the item is left unchanged.
    pub fn apply(&mut self, field: ItemField) -> ValidationResult<()> {
        match field {
            ItemField::Description(description) => self.description = description,
            ItemField::Quantity(quantity) => {
                self.total = row_total(quantity, self.unit_price)?;
                self.quantity = quantity;
            }
            ItemField::UnitPrice(unit_price) => {
                self.total = row_total(self.quantity, unit_price)?;
                self.unit_price = unit_price;
            }
        }
        Ok(())
    }
}

impl Default for LineItem {
    fn default() -> Self {
        LineItem::blank()
    }
}

/// Names of the editable line item fields, as the UI form sends them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum ItemFieldName {
    Description,
    Quantity,
    UnitPrice,
}

impl ItemFieldName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemFieldName::Description => "description",
            ItemFieldName::Quantity => "quantity",
            ItemFieldName::UnitPrice => "unitPrice",
        }
    }
}

impl fmt::Display for ItemFieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemFieldName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "description" => Ok(ItemFieldName::Description),
            "quantity" => Ok(ItemFieldName::Quantity),
            "unitPrice" | "unit_price" => Ok(ItemFieldName::UnitPrice),
            other => Err(CoreError::UnknownField(other.to_string())),
        }
    }
}

/// A typed value for one line item field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
#[ts(export)]
pub enum ItemField {
    Description(String),
    Quantity(i64),
    UnitPrice(Money),
}

// =============================================================================
// Client
// =============================================================================

/// The customer block of a nota.
///
/// Everything except `phone` is required at submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Client {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: String,
    /// CPF or CNPJ.
    pub tax_id: String,
}

impl Client {
    /// Returns the phone only when it holds something other than whitespace.
    pub fn phone(&self) -> Option<&str> {
        self.phone
            .as_deref()
            .map(str::trim)
            .filter(|phone| !phone.is_empty())
    }
}

// =============================================================================
// Invoice Number
// =============================================================================

/// Sequence number of a nota, displayed as `NF-` + 6 zero-padded digits.
///
/// Numbers above 999999 keep all their digits (`NF-1000000`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceNumber(u64);

impl InvoiceNumber {
    #[inline]
    pub const fn new(sequence: u64) -> Self {
        InvoiceNumber(sequence)
    }

    #[inline]
    pub const fn sequence(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:0width$}",
            INVOICE_NUMBER_PREFIX,
            self.0,
            width = INVOICE_NUMBER_WIDTH
        )
    }
}

impl FromStr for InvoiceNumber {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .strip_prefix(INVOICE_NUMBER_PREFIX)
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<u64>().ok())
            .map(InvoiceNumber)
            .ok_or_else(|| CoreError::InvalidInvoiceNumber(s.to_string()))
    }
}

// =============================================================================
// Invoice Status
// =============================================================================

/// Status of a finalized nota.
///
/// The emitter only ever creates `Emitida`; anything else the remote API
/// reports is kept as `Unknown` rather than failing the whole listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum InvoiceStatus {
    #[default]
    Emitida,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceStatus::Emitida => write!(f, "emitida"),
            InvoiceStatus::Unknown => write!(f, "desconhecida"),
        }
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Aggregate totals of a draft or invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

// =============================================================================
// Invoice
// =============================================================================

/// A finalized nota fiscal.
///
/// Built once by [`crate::draft::InvoiceDraft::finalize`] and never edited
/// afterwards: the items are a snapshot, not a view into the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Invoice {
    /// Identifier assigned by the remote API (absent before persistence).
    pub id: Option<String>,
    pub number: InvoiceNumber,
    pub client: Client,
    pub items: Vec<LineItem>,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    #[serde(with = "issue_date")]
    #[ts(as = "String")]
    pub issue_date: NaiveDate,
    pub status: InvoiceStatus,
}

impl Invoice {
    /// Returns a copy carrying the identifier confirmed by the store.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals {
            subtotal: self.subtotal,
            tax: self.tax,
            total: self.total,
        }
    }

    /// Issue date as printed on documents (`18/10/2026`).
    pub fn issue_date_display(&self) -> String {
        format_issue_date(self.issue_date)
    }

    /// Base file name for exports (`NF-000042`).
    pub fn file_stem(&self) -> String {
        self.number.to_string()
    }
}

/// Formats a date in the pt-BR layout used by documents and the remote API.
pub fn format_issue_date(date: NaiveDate) -> String {
    date.format(ISSUE_DATE_FORMAT).to_string()
}

/// Parses a pt-BR `dd/mm/yyyy` date, also accepting ISO `yyyy-mm-dd`.
pub fn parse_issue_date(raw: &str) -> Result<NaiveDate, CoreError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, ISSUE_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map_err(|_| CoreError::InvalidIssueDate(raw.to_string()))
}

/// Serde adapter keeping issue dates in the pt-BR text layout.
pub mod issue_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_issue_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_issue_date(&raw).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
