use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockbook_core::{DomainError, Entity, ProductId, TenantId};

/// Product lifecycle status.
///
/// Valuation, ABC classification and reorder advice cover `Active` products
/// only; `Archived` products keep their ledger history but drop out of every
/// report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Draft,
    Active,
    Archived,
}

/// Unit of measure for stocked quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitOfMeasure {
    Pcs,
    Kg,
    Ltr,
    Mtr,
    Set,
}

/// Master catalog entry.
///
/// `standard_cost` is a planning figure (used for reorder cost estimates);
/// the actual inventory value always comes from replaying the movement
/// ledger, never from `quantity * standard_cost`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    tenant_id: TenantId,
    sku: String,
    name: String,
    category: Option<String>,
    uom: UnitOfMeasure,
    standard_cost: Decimal,
    reorder_point: i64,
    status: ProductStatus,
}

impl Product {
    /// Create a new catalog entry in `Draft` status.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ProductId,
        tenant_id: TenantId,
        sku: impl Into<String>,
        name: impl Into<String>,
        uom: UnitOfMeasure,
        standard_cost: Decimal,
        reorder_point: i64,
    ) -> Result<Self, DomainError> {
        let sku = sku.into();
        let name = name.into();

        if sku.trim().is_empty() {
            return Err(DomainError::validation("SKU cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if standard_cost < Decimal::ZERO {
            return Err(DomainError::validation("standard_cost cannot be negative"));
        }
        if reorder_point < 0 {
            return Err(DomainError::validation("reorder_point cannot be negative"));
        }

        Ok(Self {
            id,
            tenant_id,
            sku,
            name,
            category: None,
            uom,
            standard_cost,
            reorder_point,
            status: ProductStatus::Draft,
        })
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = if category.trim().is_empty() {
            None
        } else {
            Some(category)
        };
        self
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category, if set. Reports bucket `None` as `"Uncategorized"`.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn uom(&self) -> UnitOfMeasure {
        self.uom
    }

    pub fn standard_cost(&self) -> Decimal {
        self.standard_cost
    }

    pub fn reorder_point(&self) -> i64 {
        self.reorder_point
    }

    pub fn status(&self) -> ProductStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }

    pub fn activate(&mut self) -> Result<(), DomainError> {
        match self.status {
            ProductStatus::Draft => {
                self.status = ProductStatus::Active;
                Ok(())
            }
            ProductStatus::Active => Err(DomainError::conflict("product is already active")),
            ProductStatus::Archived => Err(DomainError::invariant(
                "archived products cannot be activated",
            )),
        }
    }

    pub fn archive(&mut self) -> Result<(), DomainError> {
        if self.status == ProductStatus::Archived {
            return Err(DomainError::conflict("product is already archived"));
        }
        self.status = ProductStatus::Archived;
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_product(sku: &str, name: &str) -> Result<Product, DomainError> {
        Product::new(
            ProductId::new(),
            TenantId::new(),
            sku,
            name,
            UnitOfMeasure::Pcs,
            dec!(10.00),
            100,
        )
    }

    #[test]
    fn new_product_starts_in_draft() {
        let product = test_product("SKU-001", "Steel Bolt").unwrap();
        assert_eq!(product.status(), ProductStatus::Draft);
        assert!(!product.is_active());
    }

    #[test]
    fn rejects_empty_sku_and_name() {
        assert!(matches!(
            test_product("  ", "Steel Bolt").unwrap_err(),
            DomainError::Validation(_)
        ));
        assert!(matches!(
            test_product("SKU-001", "").unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[test]
    fn rejects_negative_cost_and_reorder_point() {
        let err = Product::new(
            ProductId::new(),
            TenantId::new(),
            "SKU-001",
            "Steel Bolt",
            UnitOfMeasure::Pcs,
            dec!(-1),
            100,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = Product::new(
            ProductId::new(),
            TenantId::new(),
            "SKU-001",
            "Steel Bolt",
            UnitOfMeasure::Pcs,
            dec!(1),
            -5,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn activate_then_archive() {
        let mut product = test_product("SKU-001", "Steel Bolt").unwrap();
        product.activate().unwrap();
        assert!(product.is_active());

        product.archive().unwrap();
        assert_eq!(product.status(), ProductStatus::Archived);
        assert!(!product.is_active());
    }

    #[test]
    fn archived_products_cannot_be_reactivated() {
        let mut product = test_product("SKU-001", "Steel Bolt").unwrap();
        product.activate().unwrap();
        product.archive().unwrap();

        let err = product.activate().unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn blank_category_is_dropped() {
        let product = test_product("SKU-001", "Steel Bolt")
            .unwrap()
            .with_category("   ");
        assert_eq!(product.category(), None);

        let product = test_product("SKU-002", "Steel Nut")
            .unwrap()
            .with_category("Fasteners");
        assert_eq!(product.category(), Some("Fasteners"));
    }
}
