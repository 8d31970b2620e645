use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockbook_core::TenantId;
use stockbook_costing::{CostingEngine, CostingError};
use stockbook_ledger::MovementLedger;
use stockbook_products::ProductCatalog;

/// How urgently a product needs replenishment.
///
/// Variant order gives the sort order: HIGH (stocked out) sorts before
/// MEDIUM (at or below reorder point).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Urgency {
    High,
    Medium,
}

/// A purchase suggestion for one product.
///
/// Advisory only: emitting a suggestion changes nothing — no ledger rows, no
/// purchase orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderSuggestion {
    pub sku: String,
    pub product_name: String,
    pub current_stock: Decimal,
    pub reorder_point: i64,
    pub shortage: Decimal,
    pub suggested_order_qty: Decimal,
    pub estimated_cost: Decimal,
    pub urgency: Urgency,
}

/// Emits purchase suggestions from current stock levels and configured
/// reorder points.
#[derive(Debug, Clone)]
pub struct ReorderAdvisor<L, C> {
    engine: CostingEngine<L>,
    catalog: C,
}

impl<L, C> ReorderAdvisor<L, C>
where
    L: MovementLedger,
    C: ProductCatalog,
{
    pub fn new(engine: CostingEngine<L>, catalog: C) -> Self {
        Self { engine, catalog }
    }

    /// Suggestions for every active product at or below its reorder point,
    /// as of `as_of` (pass the current time for "now"; tenancy and time are
    /// always explicit parameters).
    ///
    /// Sorted HIGH urgency first, then by shortage descending.
    pub fn suggestions(
        &self,
        tenant_id: TenantId,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<ReorderSuggestion>, CostingError> {
        let mut suggestions = Vec::new();

        for product in self.catalog.list_active(tenant_id) {
            let snapshot = self.engine.snapshot(tenant_id, product.id_typed(), as_of)?;
            let current_stock = snapshot.on_hand_qty;
            let reorder_point = Decimal::from(product.reorder_point());

            if current_stock > reorder_point {
                continue;
            }

            let shortage = reorder_point - current_stock;
            // Order at least up to twice the reorder point, never less than
            // the shortage itself.
            let suggested_order_qty = shortage.max(reorder_point * Decimal::TWO);
            let estimated_cost = suggested_order_qty * product.standard_cost();
            let urgency = if current_stock <= Decimal::ZERO {
                Urgency::High
            } else {
                Urgency::Medium
            };

            suggestions.push(ReorderSuggestion {
                sku: product.sku().to_string(),
                product_name: product.name().to_string(),
                current_stock,
                reorder_point: product.reorder_point(),
                shortage,
                suggested_order_qty,
                estimated_cost,
                urgency,
            });
        }

        suggestions.sort_by(|a, b| {
            a.urgency
                .cmp(&b.urgency)
                .then_with(|| b.shortage.cmp(&a.shortage))
        });

        Ok(suggestions)
    }
}
