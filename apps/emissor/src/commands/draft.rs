//! # Draft Commands
//!
//! Editing the nota before it is emitted. Every command returns the new
//! [`DraftSnapshot`] so the caller can re-render rows and totals.
//!
//! ## Draft Lifecycle
//! ```text
//! ┌──────────┐  add_item / update_item   ┌──────────┐  submit_invoice  ┌──────────┐
//! │  Blank   │──────────────────────────►│ Editing  │─────────────────►│ Emitted  │
//! │ (1 row)  │  remove_item / toggle_tax │          │  (invoice.rs)    │          │
//! └──────────┘                           └──────────┘                  └────┬─────┘
//!      ▲                                                                    │
//!      └─────────────────────────── reset ──────────────────────────────────┘
//! ```

use tracing::debug;
use tudboom_core::validation::parse_item_field;
use tudboom_core::{Client, CoreError, DraftSnapshot, ItemFieldName};

use crate::error::ApiError;
use crate::state::EmissorSession;

/// Gets the current draft.
pub fn get_draft(session: &EmissorSession) -> DraftSnapshot {
    debug!("get_draft command");
    session.draft().snapshot()
}

/// Appends a blank row.
pub fn add_item(session: &EmissorSession) -> DraftSnapshot {
    debug!("add_item command");
    session.draft().with_draft_mut(|draft| {
        draft.add_item();
        draft.snapshot()
    })
}

/// Removes row `index`. The last remaining row is never removed.
///
/// ## Errors
/// `VALIDATION_ERROR` if the remaining rows would total beyond what an
/// invoice can hold. The draft is unchanged.
pub fn remove_item(session: &EmissorSession, index: usize) -> Result<DraftSnapshot, ApiError> {
    debug!(index, "remove_item command");
    session.draft().with_draft_mut(|draft| -> Result<DraftSnapshot, ApiError> {
        draft.remove_item(index).map_err(CoreError::from)?;
        Ok(draft.snapshot())
    })
}

/// Sets one cell of row `index` from raw form text.
///
/// ## Arguments
/// * `field` - `description`, `quantity` or `unitPrice`
/// * `raw` - text as typed; numbers accept `10`, `10.5` or `10,50`
///
/// ## Errors
/// `VALIDATION_ERROR` for an unknown field, or for text that is not a
/// number when the input policy is `reject`. Also for a number beyond the
/// row limits, or one that would push the totals past what an invoice can
/// hold. The draft is unchanged. An out-of-range `index` is not an error;
/// nothing changes.
pub fn update_item(
    session: &EmissorSession,
    index: usize,
    field: &str,
    raw: &str,
) -> Result<DraftSnapshot, ApiError> {
    debug!(index, field, "update_item command");

    let name: ItemFieldName = field.parse()?;
    let value = parse_item_field(index, name, raw, session.input_policy())
        .map_err(CoreError::from)?;

    session.draft().with_draft_mut(|draft| -> Result<DraftSnapshot, ApiError> {
        draft.update_item(index, value).map_err(CoreError::from)?;
        Ok(draft.snapshot())
    })
}

/// Turns the 10% tax on or off.
pub fn toggle_tax(session: &EmissorSession, enabled: bool) -> DraftSnapshot {
    debug!(enabled, "toggle_tax command");
    session.draft().with_draft_mut(|draft| {
        draft.toggle_tax(enabled);
        draft.snapshot()
    })
}

/// Checks the draft against `client` without submitting.
///
/// ## Errors
/// `VALIDATION_ERROR` listing every violated field.
pub fn validate_draft(session: &EmissorSession, client: &Client) -> Result<(), ApiError> {
    debug!("validate_draft command");
    session
        .draft()
        .with_draft(|draft| draft.validate(client))
        .map_err(ApiError::from)
}
