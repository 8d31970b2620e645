//! Automated postings for business events.
//!
//! These functions consume a single value computed upstream (the costing
//! engine's output for a work-order context) — they never read the movement
//! ledger and never write back to it.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockbook_core::TenantId;

use crate::journal::{Account, AccountKind, JournalEntry, JournalError, JournalLine};

/// A completed work order whose output value should be capitalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCompletion {
    pub work_order: String,
    pub sku: String,
    pub quantity_completed: Decimal,
}

/// Journal number in the `GL-YYYYMM-NNNN` series.
pub fn journal_number(posting_date: DateTime<Utc>, seq: u32) -> String {
    let year_month = posting_date.year() as u32 * 100 + posting_date.month();
    format!("GL-{year_month:06}-{seq:04}")
}

/// Build the posting for a production completion: debit Inventory (1300),
/// credit Cash (1000) for the production value.
///
/// `production_value` is the costing engine's computed value for the
/// completed quantity. A zero or negative value produces no entry — there is
/// nothing to capitalize.
pub fn production_completion_entry(
    tenant_id: TenantId,
    completion: &ProductionCompletion,
    production_value: Decimal,
    posting_date: DateTime<Utc>,
    seq: u32,
) -> Result<Option<JournalEntry>, JournalError> {
    if production_value <= Decimal::ZERO {
        return Ok(None);
    }

    let inventory = Account::new("1300", "Inventory", AccountKind::Asset);
    let cash = Account::new("1000", "Cash", AccountKind::Asset);

    let entry = JournalEntry::new(
        journal_number(posting_date, seq),
        tenant_id,
        posting_date,
        format!("Production Completion - {}", completion.work_order),
        Some(format!(
            "Completed {} units of {}",
            completion.quantity_completed, completion.sku
        )),
        vec![
            JournalLine::debit(
                inventory,
                production_value,
                format!("Finished goods received: {}", completion.sku),
            ),
            JournalLine::credit(
                cash,
                production_value,
                format!("Cash spent for production: {}", completion.sku),
            ),
        ],
    )?;

    Ok(Some(entry))
}
