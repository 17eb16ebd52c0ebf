//! # Invoice Draft
//!
//! The mutable nota being authored, and the totals derived from it.
//!
//! ## Draft Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft Lifecycle                                      │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Blank   │────►│ Editing  │────►│ Validate │────►│ Invoice  │       │
//! │  │ (1 item) │     │          │     │          │     │ snapshot │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └────┬─────┘       │
//! │       ▲                │                                  │             │
//! │       │           add_item                         persisted by the     │
//! │       │           update_item                      store, then:         │
//! │       │           remove_item                             │             │
//! │       │           toggle_tax                              │             │
//! │       └──────────────── reset ◄───────────────────────────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - `items` is never empty: removing the last row is ignored.
//! - Every row's total equals `unit_price × quantity` after each call.
//! - Subtotal, tax and total fit in an i64 of centavos, with tax on or off.
//!   An edit that would break this is refused and the draft is unchanged.
//! - [`InvoiceDraft::compute_totals`] reads state only, and is exactly what
//!   [`InvoiceDraft::finalize`] stores on the invoice.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError, ValidationReport};
use crate::money::Money;
use crate::types::{
    Client, Invoice, InvoiceNumber, InvoiceStatus, InvoiceTotals, ItemField, LineItem, TaxRate,
};
use crate::validation::{check_item_field, validate_client, validate_line_item, ValidationResult};

// =============================================================================
// Invoice Draft
// =============================================================================

/// The in-progress nota: ordered rows plus the tax flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    items: Vec<LineItem>,
    include_tax: bool,
    tax_rate: TaxRate,
}

impl InvoiceDraft {
    /// Creates a draft with one blank row, tax off, at the default 10% rate.
    pub fn new() -> Self {
        Self::with_tax_rate(TaxRate::default())
    }

    /// Creates a blank draft that charges `tax_rate` when tax is enabled.
    pub fn with_tax_rate(tax_rate: TaxRate) -> Self {
        InvoiceDraft {
            items: vec![LineItem::blank()],
            include_tax: false,
            tax_rate,
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&LineItem> {
        self.items.get(index)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn include_tax(&self) -> bool {
        self.include_tax
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Appends a blank row. There is no upper bound on rows.
    ///
    /// ## Returns
    /// Index of the new row.
    pub fn add_item(&mut self) -> usize {
        self.items.push(LineItem::blank());
        self.items.len() - 1
    }

    /// Removes the row at `index`.
    ///
    /// ## Behavior
    /// - Only row left: ignored (a draft always has one row)
    /// - Index out of range: ignored
    ///
    /// ## Returns
    /// `true` if a row was removed.
    ///
    /// ## Errors
    /// [`ValidationError::TooLarge`] if the remaining rows would no longer
    /// have representable totals (removing a negative row raises the
    /// subtotal).
    pub fn remove_item(&mut self, index: usize) -> ValidationResult<bool> {
        if self.items.len() <= 1 || index >= self.items.len() {
            return Ok(false);
        }
        let mut items = self.items.clone();
        items.remove(index);
        self.commit(items)?;
        Ok(true)
    }

    /// Sets one field of the row at `index` and recomputes that row's total.
    ///
    /// ## User Workflow
    /// ```text
    /// User types "3" in the Quantidade box of row 0
    ///      │
    ///      ▼
    /// update_item(0, Quantity(3)) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// row 0: total = unit_price × 3, subtotal/tax/total follow on next read
    /// ```
    ///
    /// ## Returns
    /// `false` (and no change) if `index` is out of range.
    ///
    /// ## Errors
    /// [`ValidationError::TooLarge`] naming `items[index].field` when the
    /// value is beyond the row limits, or naming `subtotal`/`tax`/`total`
    /// when the draft totals would no longer fit. The draft is unchanged.
    pub fn update_item(&mut self, index: usize, field: ItemField) -> ValidationResult<bool> {
        check_item_field(index, &field)?;

        let mut items = self.items.clone();
        match items.get_mut(index) {
            Some(item) => item.apply(field)?,
            None => return Ok(false),
        }
        self.commit(items)?;
        Ok(true)
    }

    /// Turns the 10% tax on or off. Row totals are unaffected.
    ///
    /// Never fails: every committed edit was checked with the tax on.
    pub fn toggle_tax(&mut self, enabled: bool) {
        self.include_tax = enabled;
    }

    /// Derives subtotal, tax and total from the current rows.
    ///
    /// ```rust
    /// use tudboom_core::{InvoiceDraft, ItemField, Money};
    ///
    /// let mut draft = InvoiceDraft::new();
    /// draft.update_item(0, ItemField::Quantity(2)).unwrap();
    /// draft.update_item(0, ItemField::UnitPrice(Money::from_cents(1000))).unwrap();
    ///
    /// let totals = draft.compute_totals().unwrap();
    /// assert_eq!(totals.subtotal.cents(), 2000);
    /// assert!(totals.tax.is_zero());
    /// assert_eq!(totals.total.cents(), 2000);
    /// ```
    ///
    /// ## Errors
    /// [`ValidationError::TooLarge`] when a sum does not fit. Edits going
    /// through [`InvoiceDraft::update_item`] and [`InvoiceDraft::remove_item`]
    /// are refused before that can happen.
    pub fn compute_totals(&self) -> ValidationResult<InvoiceTotals> {
        totals_of(&self.items, self.include_tax, self.tax_rate)
    }

    /// Replaces the rows when their totals fit with the tax on.
    fn commit(&mut self, items: Vec<LineItem>) -> ValidationResult<()> {
        totals_of(&items, true, self.tax_rate)?;
        self.items = items;
        Ok(())
    }

    /// Checks the draft and client against the submission rules.
    ///
    /// ## Returns
    /// Every violation: missing client fields first, then each bad row.
    pub fn validate(&self, client: &Client) -> Result<(), ValidationReport> {
        let mut report = ValidationReport::new();
        report.extend(validate_client(client));
        for (index, item) in self.items.iter().enumerate() {
            report.extend(validate_line_item(index, item));
        }
        report.into_result()
    }

    /// Builds the finalized invoice for `number`, issued on `issue_date`.
    ///
    /// The draft is left as is; the caller resets it once the invoice has
    /// been persisted, so a failed save can be retried without re-typing.
    ///
    /// ## Errors
    /// [`crate::CoreError::InvalidDraft`] listing every violation.
    pub fn finalize(
        &self,
        client: &Client,
        number: InvoiceNumber,
        issue_date: NaiveDate,
    ) -> CoreResult<Invoice> {
        self.validate(client)?;

        let totals = self.compute_totals()?;
        Ok(Invoice {
            id: None,
            number,
            client: client.clone(),
            items: self.items.clone(),
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            issue_date,
            status: InvoiceStatus::Emitida,
        })
    }

    /// Back to one blank row with tax off. The tax rate is kept.
    pub fn reset(&mut self) {
        self.items = vec![LineItem::blank()];
        self.include_tax = false;
    }

    /// Read-only copy of the draft for the UI.
    pub fn snapshot(&self) -> DraftSnapshot {
        DraftSnapshot {
            items: self.items.clone(),
            include_tax: self.include_tax,
            tax_rate_bps: self.tax_rate.bps(),
            // every committed edit has representable totals
            totals: self.compute_totals().unwrap_or_default(),
        }
    }
}

/// Checked subtotal, tax and total of `items`.
fn totals_of(items: &[LineItem], include_tax: bool, tax_rate: TaxRate) -> ValidationResult<InvoiceTotals> {
    let subtotal = items
        .iter()
        .try_fold(Money::zero(), |sum, item| sum.checked_add(item.total()))
        .ok_or_else(|| too_large("subtotal"))?;
    let tax = if include_tax {
        subtotal.checked_tax(tax_rate).ok_or_else(|| too_large("tax"))?
    } else {
        Money::zero()
    };
    let total = subtotal.checked_add(tax).ok_or_else(|| too_large("total"))?;

    Ok(InvoiceTotals {
        subtotal,
        tax,
        total,
    })
}

fn too_large(field: &str) -> ValidationError {
    ValidationError::TooLarge {
        field: field.to_string(),
        max: Money::from_cents(i64::MAX).to_string(),
    }
}

impl Default for InvoiceDraft {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Draft Snapshot
// =============================================================================

/// What the UI renders after each change: rows, tax flag and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DraftSnapshot {
    pub items: Vec<LineItem>,
    pub include_tax: bool,
    pub tax_rate_bps: u32,
    pub totals: InvoiceTotals,
}

impl Default for DraftSnapshot {
    fn default() -> Self {
        InvoiceDraft::new().snapshot()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::validation::{parse_item_field, InputPolicy};
    use crate::{ItemFieldName, MAX_QUANTITY, MAX_UNIT_PRICE_CENTS};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn caneca_draft() -> InvoiceDraft {
        let mut draft = InvoiceDraft::new();
        draft.update_item(0, ItemField::Description("Caneca".into())).unwrap();
        draft.update_item(0, ItemField::Quantity(2)).unwrap();
        draft.update_item(0, ItemField::UnitPrice(Money::from_cents(1000))).unwrap();
        draft
    }

    fn client() -> Client {
        Client {
            name: "Maria Silva".into(),
            email: "maria@example.com".into(),
            phone: Some("(15) 99999-0000".into()),
            address: "Rua das Flores, 10".into(),
            tax_id: "123.456.789-00".into(),
        }
    }

    fn issue_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn assert_invariants(draft: &InvoiceDraft) {
        assert!(draft.item_count() >= 1);
        let mut subtotal: i128 = 0;
        for item in draft.items() {
            assert_eq!(
                item.total().cents() as i128,
                item.unit_price().cents() as i128 * item.quantity() as i128
            );
            subtotal += item.total().cents() as i128;
        }
        let totals = draft.compute_totals().unwrap();
        assert_eq!(totals.subtotal.cents() as i128, subtotal);
        assert_eq!(draft.snapshot().totals, totals);
    }

    #[test]
    fn test_new_draft_has_one_blank_item() {
        let draft = InvoiceDraft::new();
        assert_eq!(draft.item_count(), 1);
        assert_eq!(draft.items()[0], LineItem::blank());
        assert!(!draft.include_tax());
        assert_eq!(draft.compute_totals().unwrap(), InvoiceTotals::default());
    }

    #[test]
    fn test_totals_without_tax() {
        let totals = caneca_draft().compute_totals().unwrap();
        assert_eq!(totals.subtotal.to_string(), "R$ 20.00");
        assert_eq!(totals.tax.to_string(), "R$ 0.00");
        assert_eq!(totals.total.to_string(), "R$ 20.00");
    }

    #[test]
    fn test_totals_with_tax() {
        let mut draft = caneca_draft();
        draft.toggle_tax(true);
        let totals = draft.compute_totals().unwrap();
        assert_eq!(totals.subtotal.to_string(), "R$ 20.00");
        assert_eq!(totals.tax.to_string(), "R$ 2.00");
        assert_eq!(totals.total.to_string(), "R$ 22.00");
    }

    #[test]
    fn test_toggle_tax_off_restores_total() {
        let mut draft = caneca_draft();
        draft.toggle_tax(true);
        draft.toggle_tax(false);
        let totals = draft.compute_totals().unwrap();
        assert!(totals.tax.is_zero());
        assert_eq!(totals.total, totals.subtotal);
        assert_eq!(draft.items()[0].total().cents(), 2000);
    }

    #[test]
    fn test_compute_totals_is_idempotent() {
        let mut draft = caneca_draft();
        draft.toggle_tax(true);
        let before = draft.clone();
        assert_eq!(draft.compute_totals(), draft.compute_totals());
        assert_eq!(draft, before);
    }

    #[test]
    fn test_remove_only_item_is_ignored() {
        let mut draft = caneca_draft();
        let item = draft.items()[0].clone();
        assert!(!draft.remove_item(0).unwrap());
        assert_eq!(draft.item_count(), 1);
        assert_eq!(draft.items()[0], item);
    }

    #[test]
    fn test_remove_item_keeps_order() {
        let mut draft = caneca_draft();
        let second = draft.add_item();
        draft.update_item(second, ItemField::Description("Camiseta".into())).unwrap();
        let third = draft.add_item();
        draft.update_item(third, ItemField::Description("Boné".into())).unwrap();

        assert!(draft.remove_item(1).unwrap());
        let names: Vec<_> = draft.items().iter().map(LineItem::description).collect();
        assert_eq!(names, vec!["Caneca", "Boné"]);

        assert!(!draft.remove_item(7).unwrap());
        assert_eq!(draft.item_count(), 2);
    }

    #[test]
    fn test_update_out_of_range_is_ignored() {
        let mut draft = caneca_draft();
        let before = draft.clone();
        assert!(!draft.update_item(5, ItemField::Quantity(9)).unwrap());
        assert_eq!(draft, before);
    }

    #[test]
    fn test_huge_form_input_is_refused_without_panicking() {
        let mut draft = InvoiceDraft::new();
        for row in 0..2 {
            if row > 0 {
                draft.add_item();
            }
            let err = parse_item_field(
                row,
                ItemFieldName::Quantity,
                "9223372036854775807",
                InputPolicy::Reject,
            )
            .unwrap_err();
            assert!(matches!(err, ValidationError::TooLarge { .. }));

            // Typed values bypassing the form parser are checked as well
            let err = draft.update_item(row, ItemField::Quantity(i64::MAX)).unwrap_err();
            assert_eq!(err.field(), format!("items[{}].quantity", row));

            let price = parse_item_field(row, ItemFieldName::UnitPrice, "1.00", InputPolicy::Reject)
                .unwrap();
            draft.update_item(row, price).unwrap();
        }

        let totals = draft.compute_totals().unwrap();
        assert_eq!(totals.subtotal.cents(), 200);
        assert_invariants(&draft);
    }

    #[test]
    fn test_largest_rows_sum_exactly() {
        let mut draft = InvoiceDraft::new();
        draft.add_item();
        for row in 0..2 {
            draft.update_item(row, ItemField::Quantity(MAX_QUANTITY)).unwrap();
            draft
                .update_item(row, ItemField::UnitPrice(Money::from_cents(MAX_UNIT_PRICE_CENTS)))
                .unwrap();
        }
        draft.toggle_tax(true);

        let totals = draft.compute_totals().unwrap();
        assert_eq!(totals.subtotal.cents(), 2 * MAX_QUANTITY * MAX_UNIT_PRICE_CENTS);
        assert_eq!(totals.tax.cents(), totals.subtotal.cents() / 10);
        assert_invariants(&draft);
    }

    #[test]
    fn test_edit_overflowing_totals_is_refused() {
        // A 100000% rate makes the tax overflow after a handful of large rows
        let mut draft = InvoiceDraft::with_tax_rate(TaxRate::from_bps(10_000_000));
        let big = ItemField::UnitPrice(Money::from_cents(MAX_UNIT_PRICE_CENTS));

        let mut refused = None;
        for row in 0..100 {
            if row > 0 {
                draft.add_item();
            }
            draft.update_item(row, ItemField::Quantity(MAX_QUANTITY)).unwrap();
            let before = draft.clone();
            if let Err(err) = draft.update_item(row, big.clone()) {
                assert_eq!(draft, before);
                refused = Some(err);
                break;
            }
        }

        let err = refused.expect("an edit should have been refused");
        assert!(matches!(err, ValidationError::TooLarge { .. }));
        assert!(["subtotal", "tax", "total"].contains(&err.field()));

        // Whatever was committed still totals, with the tax on or off
        draft.toggle_tax(true);
        assert!(draft.compute_totals().is_ok());
        draft.toggle_tax(false);
        assert_invariants(&draft);
    }

    #[test]
    fn test_random_edit_sequences_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(0x7ddb_0042);

        for _ in 0..20 {
            let mut draft = InvoiceDraft::new();
            for _ in 0..300 {
                let len = draft.item_count();
                // indices up to len + 1 so out-of-range calls are exercised
                let index = rng.gen_range(0..len + 2);
                let before = draft.clone();

                match rng.gen_range(0..6) {
                    0 => {
                        draft.add_item();
                        assert_eq!(draft.item_count(), len + 1);
                    }
                    1 => {
                        let removed = draft.remove_item(index).unwrap();
                        assert_eq!(removed, len > 1 && index < len);
                        if !removed {
                            assert_eq!(draft, before);
                        }
                    }
                    2 => {
                        let qty = rng.gen_range(-MAX_QUANTITY..=MAX_QUANTITY);
                        let updated = draft.update_item(index, ItemField::Quantity(qty)).unwrap();
                        assert_eq!(updated, index < len);
                        if updated {
                            assert_eq!(draft.items()[index].quantity(), qty);
                        } else {
                            assert_eq!(draft, before);
                        }
                    }
                    3 => {
                        let cents = rng.gen_range(0..=MAX_UNIT_PRICE_CENTS);
                        let field = ItemField::UnitPrice(Money::from_cents(cents));
                        let updated = draft.update_item(index, field).unwrap();
                        assert_eq!(updated, index < len);
                    }
                    4 => {
                        let qty = if rng.gen_bool(0.5) { i64::MAX } else { -MAX_QUANTITY - 1 };
                        assert!(draft.update_item(index, ItemField::Quantity(qty)).is_err());
                        assert_eq!(draft, before);
                    }
                    _ => draft.toggle_tax(rng.gen_bool(0.5)),
                }

                assert_invariants(&draft);
            }
        }
    }

    #[test]
    fn test_validate_missing_email() {
        let draft = caneca_draft();
        let client = Client {
            email: String::new(),
            ..client()
        };
        let report = draft.validate(&client).unwrap_err();
        assert!(report.has_field("email"));
        assert_eq!(report.len(), 1);

        let err = draft.finalize(&client, InvoiceNumber::new(1), issue_date()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDraft(_)));
    }

    #[test]
    fn test_validate_reports_items_and_client() {
        let mut draft = caneca_draft();
        draft.add_item();
        let report = draft.validate(&Client::default()).unwrap_err();
        let fields: Vec<_> = report.fields().collect();
        assert_eq!(
            fields,
            vec![
                "name",
                "email",
                "address",
                "taxId",
                "items[1].description",
                "items[1].unitPrice"
            ]
        );
    }

    #[test]
    fn test_finalize_snapshots_items() {
        let mut draft = caneca_draft();
        draft.toggle_tax(true);

        let invoice = draft.finalize(&client(), InvoiceNumber::new(42), issue_date()).unwrap();
        assert_eq!(invoice.number.to_string(), "NF-000042");
        assert_eq!(invoice.status, InvoiceStatus::Emitida);
        assert_eq!(invoice.totals(), draft.compute_totals().unwrap());
        assert_eq!(invoice.issue_date_display(), "18/10/2026");
        assert!(invoice.id.is_none());

        // Editing the draft afterwards leaves the invoice alone
        draft.update_item(0, ItemField::Quantity(10)).unwrap();
        draft.add_item();
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.items[0].quantity(), 2);
        assert_eq!(invoice.total.cents(), 2200);
    }

    #[test]
    fn test_reset_returns_to_blank() {
        let mut draft = InvoiceDraft::with_tax_rate(TaxRate::from_bps(500));
        draft.update_item(0, ItemField::Description("Caneca".into())).unwrap();
        draft.add_item();
        draft.toggle_tax(true);

        draft.reset();
        assert_eq!(draft.items(), &[LineItem::blank()]);
        assert!(!draft.include_tax());
        assert_eq!(draft.tax_rate().bps(), 500);
    }

    #[test]
    fn test_snapshot_carries_totals() {
        let mut draft = caneca_draft();
        draft.toggle_tax(true);
        let snapshot = draft.snapshot();
        assert_eq!(snapshot.items.len(), 1);
        assert!(snapshot.include_tax);
        assert_eq!(snapshot.totals.total.cents(), 2200);
    }
}
