//! # Validation Module
//!
//! Field validation and raw form input parsing.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Input (parse_item_field)                                     │
//! │  ├── Raw text from the item form → typed ItemField                     │
//! │  ├── InputPolicy decides: reject bad numbers, or read them as 0        │
//! │  └── Quantity / unit price beyond the row limits: always rejected      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Submission (validate_client / validate_line_item)            │
//! │  ├── Required client fields                                            │
//! │  └── Every item: description, quantity > 0, unit price > 0             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Remote API                                                   │
//! │  └── May still reject (StoreError::ValidationRejected)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tudboom_core::types::{ItemField, ItemFieldName};
//! use tudboom_core::validation::{parse_item_field, InputPolicy};
//!
//! let field = parse_item_field(0, ItemFieldName::UnitPrice, "10,50", InputPolicy::Reject).unwrap();
//! assert_eq!(field, ItemField::UnitPrice(tudboom_core::Money::from_cents(1050)));
//!
//! assert!(parse_item_field(0, ItemFieldName::Quantity, "abc", InputPolicy::Reject).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, ValidationError};
use crate::money::Money;
use crate::types::{Client, ItemField, ItemFieldName, LineItem};
use crate::{MAX_QUANTITY, MAX_UNIT_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Input Policy
// =============================================================================

/// What to do with numeric form input that is not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum InputPolicy {
    /// Refuse the edit; the item keeps its previous value.
    #[default]
    Reject,
    /// Store 0, as the storefront form always did.
    Coerce,
}

impl fmt::Display for InputPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputPolicy::Reject => write!(f, "reject"),
            InputPolicy::Coerce => write!(f, "coerce"),
        }
    }
}

impl FromStr for InputPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" | "strict" => Ok(InputPolicy::Reject),
            "coerce" | "lenient" => Ok(InputPolicy::Coerce),
            other => Err(CoreError::Validation(ValidationError::InvalidFormat {
                field: "input_policy".to_string(),
                reason: format!("unknown policy '{}', expected reject or coerce", other),
            })),
        }
    }
}

// =============================================================================
// Field Names
// =============================================================================

/// Field name of an item column, e.g. `items[2].unitPrice`.
pub fn item_field_path(index: usize, name: ItemFieldName) -> String {
    format!("items[{}].{}", index, name)
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a text field is not blank.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates the client block. Phone is optional.
///
/// ## Returns
/// Every missing field, in form order: `name`, `email`, `address`, `taxId`.
pub fn validate_client(client: &Client) -> Vec<ValidationError> {
    [
        ("name", client.name.as_str()),
        ("email", client.email.as_str()),
        ("address", client.address.as_str()),
        ("taxId", client.tax_id.as_str()),
    ]
    .into_iter()
    .filter_map(|(field, value)| validate_required(field, value).err())
    .collect()
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity at submission (must be ≥ 1).
pub fn validate_quantity(field: &str, qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a unit price at submission (must be > R$ 0.00).
pub fn validate_unit_price(field: &str, price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Checks a quantity against [`MAX_QUANTITY`], in either direction.
pub fn validate_quantity_range(field: &str, qty: i64) -> ValidationResult<()> {
    if !(-MAX_QUANTITY..=MAX_QUANTITY).contains(&qty) {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max: MAX_QUANTITY.to_string(),
        });
    }
    Ok(())
}

/// Checks a unit price against [`MAX_UNIT_PRICE_CENTS`], in either direction.
pub fn validate_unit_price_range(field: &str, price: Money) -> ValidationResult<()> {
    if !(-MAX_UNIT_PRICE_CENTS..=MAX_UNIT_PRICE_CENTS).contains(&price.cents()) {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max: Money::from_cents(MAX_UNIT_PRICE_CENTS).to_string(),
        });
    }
    Ok(())
}

/// Checks a typed value for row `index` against the row limits.
pub fn check_item_field(index: usize, field: &ItemField) -> ValidationResult<()> {
    match field {
        ItemField::Description(_) => Ok(()),
        ItemField::Quantity(qty) => {
            validate_quantity_range(&item_field_path(index, ItemFieldName::Quantity), *qty)
        }
        ItemField::UnitPrice(price) => {
            validate_unit_price_range(&item_field_path(index, ItemFieldName::UnitPrice), *price)
        }
    }
}

/// Validates one line item for submission.
///
/// ## Returns
/// Every problem of the row (description, quantity, unit price).
pub fn validate_line_item(index: usize, item: &LineItem) -> Vec<ValidationError> {
    [
        validate_required(
            &item_field_path(index, ItemFieldName::Description),
            item.description(),
        ),
        validate_quantity(&item_field_path(index, ItemFieldName::Quantity), item.quantity()),
        validate_unit_price(
            &item_field_path(index, ItemFieldName::UnitPrice),
            item.unit_price(),
        ),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect()
}

// =============================================================================
// Raw Input Parsing
// =============================================================================

/// Parses a quantity typed into the item form.
///
/// A number beyond [`MAX_QUANTITY`] is refused under either policy.
pub fn parse_quantity(field: &str, raw: &str, policy: InputPolicy) -> ValidationResult<i64> {
    match raw.trim().parse::<i64>() {
        Ok(qty) => validate_quantity_range(field, qty).map(|()| qty),
        Err(_) if policy == InputPolicy::Coerce => Ok(0),
        Err(_) => Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("'{}' is not a whole number", raw.trim()),
        }),
    }
}

/// Parses a price typed into the item form.
///
/// Accepts `10`, `10.5`, `10.50`, `10,50` and an optional `R$` prefix.
/// At most two fraction digits; negative amounts are refused. An amount
/// beyond [`MAX_UNIT_PRICE_CENTS`] is refused under either policy.
pub fn parse_money(field: &str, raw: &str, policy: InputPolicy) -> ValidationResult<Money> {
    match parse_cents(raw) {
        Some(cents) if cents > MAX_UNIT_PRICE_CENTS => Err(ValidationError::TooLarge {
            field: field.to_string(),
            max: Money::from_cents(MAX_UNIT_PRICE_CENTS).to_string(),
        }),
        Some(cents) if cents >= 0 => Ok(Money::from_cents(cents)),
        _ if policy == InputPolicy::Coerce => Ok(Money::zero()),
        Some(_) => Err(ValidationError::Negative {
            field: field.to_string(),
        }),
        None => Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("'{}' is not an amount like 10.50", raw.trim()),
        }),
    }
}

/// Turns raw form text into a typed field value for the row at `index`.
///
/// Descriptions are taken as typed; quantity and unit price go through
/// [`parse_quantity`] / [`parse_money`] under `policy`.
pub fn parse_item_field(
    index: usize,
    name: ItemFieldName,
    raw: &str,
    policy: InputPolicy,
) -> ValidationResult<ItemField> {
    let field = item_field_path(index, name);
    match name {
        ItemFieldName::Description => Ok(ItemField::Description(raw.to_string())),
        ItemFieldName::Quantity => parse_quantity(&field, raw, policy).map(ItemField::Quantity),
        ItemFieldName::UnitPrice => parse_money(&field, raw, policy).map(ItemField::UnitPrice),
    }
}

fn parse_cents(raw: &str) -> Option<i64> {
    let text = raw.trim();
    let text = text.strip_prefix("R$").map(str::trim).unwrap_or(text);
    // pt-BR keyboards type the decimal separator as a comma
    let text = text.replace(',', ".");

    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.as_str()),
    };
    let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));

    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if frac.len() > 2
        || !whole.bytes().all(|b| b.is_ascii_digit())
        || !frac.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let reais: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let centavos: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().ok()? * 10,
        _ => frac.parse().ok()?,
    };

    let cents = reais.checked_mul(100)?.checked_add(centavos)?;
    Some(if negative { -cents } else { cents })
}

// =============================================================================
// Unit Tests
// =============================================================================
