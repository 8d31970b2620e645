use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockbook_core::TenantId;
use stockbook_costing::CostingEngine;
use stockbook_ledger::MovementLedger;
use stockbook_products::ProductCatalog;

/// Category bucket for products without one.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One product's line in a valuation report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRow {
    pub sku: String,
    pub product_name: String,
    pub category: String,
    pub quantity: Decimal,
    pub average_cost: Decimal,
    pub total_value: Decimal,
    pub reorder_point: i64,
}

/// Per-category subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub items: usize,
    pub total_value: Decimal,
}

/// A product whose snapshot could not be computed.
///
/// Kept separate from the rows: a computation failure is never rendered as a
/// zero-value row, and a zero-value row (no movements) is not a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationFailure {
    pub sku: String,
    pub reason: String,
}

/// Tenant-wide inventory valuation as of a cutoff date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationReport {
    pub as_of: DateTime<Utc>,
    /// SKU → row, every active product included (zero rows and all).
    pub rows: BTreeMap<String, ValuationRow>,
    /// Exactly the sum of row `total_value`s.
    pub total_inventory_value: Decimal,
    pub by_category: BTreeMap<String, CategoryTotal>,
    pub failures: Vec<ValuationFailure>,
}

impl ValuationReport {
    /// Rows belonging to one category (the category detail endpoint).
    pub fn rows_for_category(&self, category: &str) -> Vec<&ValuationRow> {
        self.rows
            .values()
            .filter(|row| row.category == category)
            .collect()
    }
}

/// Builds valuation reports by invoking the costing engine once per active
/// product.
#[derive(Debug, Clone)]
pub struct ValuationReporter<L, C> {
    engine: CostingEngine<L>,
    catalog: C,
}

impl<L, C> ValuationReporter<L, C>
where
    L: MovementLedger,
    C: ProductCatalog,
{
    pub fn new(engine: CostingEngine<L>, catalog: C) -> Self {
        Self { engine, catalog }
    }

    pub fn engine(&self) -> &CostingEngine<L> {
        &self.engine
    }

    /// Value every active product as of `as_of`.
    ///
    /// A product with zero movements contributes a zero row, not an
    /// omission. A product whose replay fails contributes a failure entry —
    /// its value is unknown, and `total_inventory_value` covers successfully
    /// valued rows only.
    pub fn report(&self, tenant_id: TenantId, as_of: DateTime<Utc>) -> ValuationReport {
        let mut rows = BTreeMap::new();
        let mut failures = Vec::new();

        for product in self.catalog.list_active(tenant_id) {
            match self.engine.snapshot(tenant_id, product.id_typed(), as_of) {
                Ok(snapshot) => {
                    let category = product
                        .category()
                        .unwrap_or(UNCATEGORIZED)
                        .to_string();
                    rows.insert(
                        product.sku().to_string(),
                        ValuationRow {
                            sku: product.sku().to_string(),
                            product_name: product.name().to_string(),
                            category,
                            quantity: snapshot.on_hand_qty,
                            average_cost: snapshot.average_unit_cost,
                            total_value: snapshot.total_value,
                            reorder_point: product.reorder_point(),
                        },
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        sku = product.sku(),
                        error = %err,
                        "valuation skipped product with failed costing snapshot"
                    );
                    failures.push(ValuationFailure {
                        sku: product.sku().to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let total_inventory_value = rows.values().map(|r| r.total_value).sum();

        let mut by_category: BTreeMap<String, CategoryTotal> = BTreeMap::new();
        for row in rows.values() {
            let entry = by_category
                .entry(row.category.clone())
                .or_insert(CategoryTotal {
                    items: 0,
                    total_value: Decimal::ZERO,
                });
            entry.items += 1;
            entry.total_value += row.total_value;
        }

        ValuationReport {
            as_of,
            rows,
            total_inventory_value,
            by_category,
            failures,
        }
    }
}
