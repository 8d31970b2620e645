use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use stockbook_core::{ProductId, TenantId};

use crate::product::Product;

/// Catalog operation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// SKU already registered for this tenant.
    #[error("duplicate SKU for tenant: {0}")]
    DuplicateSku(String),

    /// Product id already registered.
    #[error("duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    /// Store is unusable (poisoned lock or backend failure).
    #[error("catalog storage failure: {0}")]
    Storage(String),
}

/// Tenant-isolated product catalog.
///
/// SKU uniqueness per tenant is enforced here, at the store boundary — a
/// `Product` value alone cannot know what else the tenant has registered.
pub trait ProductCatalog: Send + Sync {
    fn register(&self, product: Product) -> Result<(), CatalogError>;

    fn get(&self, tenant_id: TenantId, product_id: ProductId) -> Option<Product>;

    fn get_by_sku(&self, tenant_id: TenantId, sku: &str) -> Option<Product>;

    /// All products for a tenant, in registration order.
    fn list(&self, tenant_id: TenantId) -> Vec<Product>;

    /// Active products only — the population every report walks.
    fn list_active(&self, tenant_id: TenantId) -> Vec<Product> {
        self.list(tenant_id)
            .into_iter()
            .filter(|p| p.is_active())
            .collect()
    }
}

impl<C> ProductCatalog for Arc<C>
where
    C: ProductCatalog + ?Sized,
{
    fn register(&self, product: Product) -> Result<(), CatalogError> {
        (**self).register(product)
    }

    fn get(&self, tenant_id: TenantId, product_id: ProductId) -> Option<Product> {
        (**self).get(tenant_id, product_id)
    }

    fn get_by_sku(&self, tenant_id: TenantId, sku: &str) -> Option<Product> {
        (**self).get_by_sku(tenant_id, sku)
    }

    fn list(&self, tenant_id: TenantId) -> Vec<Product> {
        (**self).list(tenant_id)
    }
}

/// In-memory catalog for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProductCatalog {
    // Registration order is preserved so reports walk products deterministically.
    inner: RwLock<HashMap<TenantId, Vec<Product>>>,
}

impl InMemoryProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductCatalog for InMemoryProductCatalog {
    fn register(&self, product: Product) -> Result<(), CatalogError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| CatalogError::Storage("lock poisoned".to_string()))?;

        let products = map.entry(product.tenant_id()).or_default();

        if products.iter().any(|p| p.sku() == product.sku()) {
            return Err(CatalogError::DuplicateSku(product.sku().to_string()));
        }
        if products.iter().any(|p| p.id_typed() == product.id_typed()) {
            return Err(CatalogError::DuplicateProduct(product.id_typed()));
        }

        products.push(product);
        Ok(())
    }

    fn get(&self, tenant_id: TenantId, product_id: ProductId) -> Option<Product> {
        let map = self.inner.read().ok()?;
        map.get(&tenant_id)?
            .iter()
            .find(|p| p.id_typed() == product_id)
            .cloned()
    }

    fn get_by_sku(&self, tenant_id: TenantId, sku: &str) -> Option<Product> {
        let map = self.inner.read().ok()?;
        map.get(&tenant_id)?.iter().find(|p| p.sku() == sku).cloned()
    }

    fn list(&self, tenant_id: TenantId) -> Vec<Product> {
        match self.inner.read() {
            Ok(map) => map.get(&tenant_id).cloned().unwrap_or_default(),
            Err(_) => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::UnitOfMeasure;
    use rust_decimal_macros::dec;
    use stockbook_core::DomainResult;

    fn active_product(tenant_id: TenantId, sku: &str) -> DomainResult<Product> {
        let mut p = Product::new(
            ProductId::new(),
            tenant_id,
            sku,
            format!("Product {sku}"),
            UnitOfMeasure::Pcs,
            dec!(5.00),
            10,
        )?;
        p.activate()?;
        Ok(p)
    }

    #[test]
    fn register_and_look_up_by_sku() {
        let catalog = InMemoryProductCatalog::new();
        let tenant_id = TenantId::new();
        let product = active_product(tenant_id, "SKU-001").unwrap();
        let product_id = product.id_typed();

        catalog.register(product).unwrap();

        assert_eq!(
            catalog.get_by_sku(tenant_id, "SKU-001").unwrap().id_typed(),
            product_id
        );
        assert!(catalog.get(tenant_id, product_id).is_some());
    }

    #[test]
    fn duplicate_sku_is_rejected_per_tenant() {
        let catalog = InMemoryProductCatalog::new();
        let tenant_id = TenantId::new();

        catalog
            .register(active_product(tenant_id, "SKU-001").unwrap())
            .unwrap();
        let err = catalog
            .register(active_product(tenant_id, "SKU-001").unwrap())
            .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateSku("SKU-001".to_string()));

        // Same SKU under another tenant is fine.
        catalog
            .register(active_product(TenantId::new(), "SKU-001").unwrap())
            .unwrap();
    }

    #[test]
    fn list_active_filters_drafts_and_archived() {
        let catalog = InMemoryProductCatalog::new();
        let tenant_id = TenantId::new();

        let draft = Product::new(
            ProductId::new(),
            tenant_id,
            "SKU-DRAFT",
            "Unreleased",
            UnitOfMeasure::Pcs,
            dec!(1),
            0,
        )
        .unwrap();
        catalog.register(draft).unwrap();

        let mut archived = active_product(tenant_id, "SKU-OLD").unwrap();
        archived.archive().unwrap();
        catalog.register(archived).unwrap();

        catalog
            .register(active_product(tenant_id, "SKU-001").unwrap())
            .unwrap();

        let active = catalog.list_active(tenant_id);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].sku(), "SKU-001");
        assert_eq!(catalog.list(tenant_id).len(), 3);
    }

    #[test]
    fn tenants_are_isolated() {
        let catalog = InMemoryProductCatalog::new();
        let tenant_a = TenantId::new();
        let tenant_b = TenantId::new();

        catalog
            .register(active_product(tenant_a, "SKU-001").unwrap())
            .unwrap();

        assert!(catalog.get_by_sku(tenant_b, "SKU-001").is_none());
        assert!(catalog.list(tenant_b).is_empty());
    }
}
