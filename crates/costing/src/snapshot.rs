use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockbook_core::{ProductId, ValueObject};

use crate::balance::RunningBalance;

/// Derived costing state of one product as of a cutoff date.
///
/// Never persisted — always recomputed from the movement ledger.
/// `total_value` comes from the running replay, never from
/// `on_hand_qty * standard_cost`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostingSnapshot {
    pub product_id: ProductId,
    pub as_of: DateTime<Utc>,
    /// Never negative: outflows that would overdraw are rejected, clamped or
    /// skipped before they can push this below zero.
    pub on_hand_qty: Decimal,
    /// Quantity-weighted average; zero when nothing is on hand.
    pub average_unit_cost: Decimal,
    pub total_value: Decimal,
}

impl CostingSnapshot {
    /// Snapshot of a product with no movement history.
    pub fn empty(product_id: ProductId, as_of: DateTime<Utc>) -> Self {
        Self {
            product_id,
            as_of,
            on_hand_qty: Decimal::ZERO,
            average_unit_cost: Decimal::ZERO,
            total_value: Decimal::ZERO,
        }
    }

    pub(crate) fn from_balance(
        product_id: ProductId,
        as_of: DateTime<Utc>,
        balance: &RunningBalance,
    ) -> Self {
        Self {
            product_id,
            as_of,
            on_hand_qty: balance.qty(),
            average_unit_cost: balance.average_unit_cost(),
            total_value: balance.value(),
        }
    }
}

impl ValueObject for CostingSnapshot {}
