//! Memoized snapshots, validated against full replay.
//!
//! Replay cost grows linearly with a product's movement count, and every
//! report recomputes every product. The cache stores finished snapshots
//! keyed by `(tenant, product, cutoff)` together with the ledger stream
//! version they were computed at; an entry is served only while the stream
//! is unchanged, so cached output is always identical to a fresh replay.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use stockbook_core::{ProductId, TenantId};
use stockbook_ledger::MovementLedger;

use crate::engine::{CostingEngine, CostingError};
use crate::snapshot::CostingSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    tenant_id: TenantId,
    product_id: ProductId,
    as_of: DateTime<Utc>,
}

/// A snapshot plus the stream version it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSnapshot {
    pub snapshot: CostingSnapshot,
    pub stream_version: u64,
}

/// Storage seam for memoized snapshots.
pub trait SnapshotCache: Send + Sync {
    fn get(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        as_of: DateTime<Utc>,
    ) -> Option<CachedSnapshot>;

    fn put(&self, tenant_id: TenantId, cached: CachedSnapshot);

    /// Drop every entry for a tenant (e.g. after a bulk import).
    fn clear_tenant(&self, tenant_id: TenantId);
}

impl<C> SnapshotCache for Arc<C>
where
    C: SnapshotCache + ?Sized,
{
    fn get(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        as_of: DateTime<Utc>,
    ) -> Option<CachedSnapshot> {
        (**self).get(tenant_id, product_id, as_of)
    }

    fn put(&self, tenant_id: TenantId, cached: CachedSnapshot) {
        (**self).put(tenant_id, cached)
    }

    fn clear_tenant(&self, tenant_id: TenantId) {
        (**self).clear_tenant(tenant_id)
    }
}

/// In-memory snapshot cache for tests/dev.
#[derive(Debug, Default)]
pub struct InMemorySnapshotCache {
    inner: RwLock<HashMap<CacheKey, CachedSnapshot>>,
}

impl InMemorySnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotCache for InMemorySnapshotCache {
    fn get(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        as_of: DateTime<Utc>,
    ) -> Option<CachedSnapshot> {
        let map = self.inner.read().ok()?;
        map.get(&CacheKey {
            tenant_id,
            product_id,
            as_of,
        })
        .cloned()
    }

    fn put(&self, tenant_id: TenantId, cached: CachedSnapshot) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(
                CacheKey {
                    tenant_id,
                    product_id: cached.snapshot.product_id,
                    as_of: cached.snapshot.as_of,
                },
                cached,
            );
        }
    }

    fn clear_tenant(&self, tenant_id: TenantId) {
        if let Ok(mut map) = self.inner.write() {
            map.retain(|k, _| k.tenant_id != tenant_id);
        }
    }
}

impl<L> CostingEngine<L>
where
    L: MovementLedger,
{
    /// [`CostingEngine::snapshot`] with memoization.
    ///
    /// A cached entry is returned only when the stream version still matches
    /// the ledger; any append in between forces a fresh replay. The external
    /// contract is unchanged: output is always identical to full replay.
    pub fn snapshot_cached<C>(
        &self,
        cache: &C,
        tenant_id: TenantId,
        product_id: ProductId,
        as_of: DateTime<Utc>,
    ) -> Result<CostingSnapshot, CostingError>
    where
        C: SnapshotCache,
    {
        let current_version = self.ledger().stream_version(tenant_id, product_id)?;

        if let Some(cached) = cache.get(tenant_id, product_id, as_of) {
            if cached.stream_version == current_version {
                return Ok(cached.snapshot);
            }
        }

        let snapshot = self.snapshot(tenant_id, product_id, as_of)?;
        cache.put(
            tenant_id,
            CachedSnapshot {
                snapshot: snapshot.clone(),
                stream_version: current_version,
            },
        );
        Ok(snapshot)
    }
}
