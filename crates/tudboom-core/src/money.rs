//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A nota with 3 × R$ 0.10 summed as floats can display R$ 0.30          │
//! │  while storing 0.30000000000000004 and drift on every re-total.        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    3 × 10 centavos = 30 centavos, exactly, every time                  │
//! │    Only display formats to "R$ 0.30"                                   │
//! │                                                                         │
//! │  Every operation is checked: a sum that does not fit is None,          │
//! │  never a wrapped or clamped amount.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tudboom_core::money::Money;
//!
//! let price = Money::from_cents(1099); // R$ 10.99
//!
//! let doubled = price.checked_mul_quantity(2).unwrap();            // R$ 21.98
//! let total = price.checked_add(Money::from_cents(500)).unwrap();  // R$ 15.99
//! assert_eq!(doubled.to_string(), "R$ 21.98");
//! assert_eq!(total.to_string(), "R$ 15.99");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (1/100 of a real).
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItem.unit_price ──► LineItem.total (× quantity)                    │
/// │                                │                                        │
/// │                                ▼                                        │
/// │  InvoiceTotals.subtotal ──► tax (10% when enabled) ──► total           │
/// │                                                                         │
/// │  Displayed as "R$ 10.99" everywhere (documents, text export, UI)        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ```rust
    /// use tudboom_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // R$ 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole reais portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavos portion (always 0-99).
    #[inline]
    pub const fn centavos_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is greater than zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Adds two amounts, `None` when the sum does not fit.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Line total: unit price × quantity, `None` when it does not fit.
    ///
    /// ```rust
    /// use tudboom_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1000);
    /// assert_eq!(unit_price.checked_mul_quantity(2).unwrap().cents(), 2000);
    /// assert!(Money::from_cents(i64::MAX).checked_mul_quantity(2).is_none());
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Calculates tax at the given rate, rounding half up to the centavo.
    ///
    /// ## Implementation
    /// Integer math only: `(amount * bps + 5000) / 10000`, in i128.
    /// The +5000 provides rounding (5000/10000 = 0.5).
    ///
    /// ## Returns
    /// `None` when the tax itself does not fit in an i64 of centavos.
    ///
    /// ```rust
    /// use tudboom_core::money::Money;
    /// use tudboom_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(2000); // R$ 20.00
    /// let tax = subtotal.checked_tax(TaxRate::from_bps(1000)).unwrap(); // 10%
    /// assert_eq!(tax.cents(), 200);
    ///
    /// // R$ 0.15 at 10% = R$ 0.015 → R$ 0.02
    /// let tax = Money::from_cents(15).checked_tax(TaxRate::from_bps(1000)).unwrap();
    /// assert_eq!(tax.cents(), 2);
    /// ```
    pub fn checked_tax(self, rate: TaxRate) -> Option<Money> {
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        i64::try_from(tax_cents).ok().map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money the way the storefront prints it: `R$ 10.99`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}R$ {}.{:02}",
            sign,
            self.reais().abs(),
            self.centavos_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
