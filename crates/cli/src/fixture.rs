//! JSON fixture format for the report runner: one tenant, its product
//! catalog and its movement history.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use stockbook_core::{ProductId, TenantId, WarehouseId};
use stockbook_ledger::{InMemoryMovementLedger, MovementDraft, MovementLedger, MovementType};
use stockbook_products::{InMemoryProductCatalog, Product, ProductCatalog, UnitOfMeasure};

#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub tenant_id: Uuid,
    pub products: Vec<FixtureProduct>,
    pub movements: Vec<FixtureMovement>,
    #[serde(default)]
    pub completions: Vec<FixtureCompletion>,
}

#[derive(Debug, Deserialize)]
pub struct FixtureProduct {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub uom: UnitOfMeasure,
    pub standard_cost: Decimal,
    pub reorder_point: i64,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct FixtureMovement {
    pub sku: String,
    /// Stable string form, e.g. `"receipt"`; unknown strings are rejected at
    /// load time the same way a ledger producer would reject them.
    pub movement_type: String,
    pub quantity: Decimal,
    #[serde(default)]
    pub unit_cost: Decimal,
    #[serde(default)]
    pub warehouse: Option<String>,
    #[serde(default)]
    pub reference_doc: Option<String>,
    pub movement_date: DateTime<Utc>,
}

/// Completed work order to auto-post to the GL.
#[derive(Debug, Deserialize)]
pub struct FixtureCompletion {
    pub work_order: String,
    pub sku: String,
    pub quantity_completed: Decimal,
}

fn default_active() -> bool {
    true
}

/// Stores hydrated from a fixture.
pub struct LoadedFixture {
    pub tenant_id: TenantId,
    pub ledger: Arc<InMemoryMovementLedger>,
    pub catalog: Arc<InMemoryProductCatalog>,
    pub sku_index: HashMap<String, ProductId>,
    pub completions: Vec<FixtureCompletion>,
}

impl Fixture {
    pub fn load(self) -> Result<LoadedFixture> {
        let tenant_id = TenantId::from_uuid(self.tenant_id);
        let ledger = Arc::new(InMemoryMovementLedger::new());
        let catalog = Arc::new(InMemoryProductCatalog::new());
        let mut sku_index = HashMap::new();
        let mut warehouses: HashMap<String, WarehouseId> = HashMap::new();

        for fp in self.products {
            let mut product = Product::new(
                ProductId::new(),
                tenant_id,
                &fp.sku,
                &fp.name,
                fp.uom,
                fp.standard_cost,
                fp.reorder_point,
            )
            .with_context(|| format!("invalid product {}", fp.sku))?;

            if let Some(category) = &fp.category {
                product = product.with_category(category.clone());
            }
            if fp.active {
                product
                    .activate()
                    .with_context(|| format!("cannot activate product {}", fp.sku))?;
            }

            sku_index.insert(fp.sku.clone(), product.id_typed());
            catalog
                .register(product)
                .with_context(|| format!("cannot register product {}", fp.sku))?;
        }

        for fm in self.movements {
            let product_id = *sku_index
                .get(&fm.sku)
                .with_context(|| format!("movement references unknown SKU {}", fm.sku))?;
            let movement_type: MovementType = fm
                .movement_type
                .parse()
                .with_context(|| format!("movement for SKU {}", fm.sku))?;
            let warehouse_id = *warehouses
                .entry(fm.warehouse.unwrap_or_else(|| "MAIN".to_string()))
                .or_insert_with(WarehouseId::new);

            ledger
                .append(MovementDraft {
                    tenant_id,
                    product_id,
                    warehouse_id,
                    movement_type,
                    quantity: fm.quantity,
                    unit_cost: fm.unit_cost,
                    reference_doc: fm.reference_doc,
                    movement_date: fm.movement_date,
                })
                .with_context(|| format!("cannot append movement for SKU {}", fm.sku))?;
        }

        Ok(LoadedFixture {
            tenant_id,
            ledger,
            catalog,
            sku_index,
            completions: self.completions,
        })
    }
}
