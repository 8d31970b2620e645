use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use thiserror::Error;

use stockbook_core::{MovementId, ProductId, TenantId};

use crate::movement::{MovementDraft, StockMovement};
use crate::numbering::MovementNumbering;

/// Ledger operation error.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Movement rejected at write time (unknown type, bad quantity/cost).
    #[error("malformed movement: {0}")]
    MalformedMovement(String),

    /// Cross-tenant access attempted.
    #[error("tenant isolation violation: {0}")]
    TenantIsolation(String),

    /// Append could not be performed (storage failure, poisoned lock).
    #[error("invalid append: {0}")]
    InvalidAppend(String),
}

/// Append-only, tenant-scoped stock movement ledger.
///
/// Movements are organized into streams keyed by `(tenant_id, product_id)`.
/// Within a stream, sequence numbers increase monotonically in insertion
/// order; `movement_date` may be backdated, so chronological reads re-sort by
/// `(movement_date, sequence)`.
///
/// Writers own their atomicity; the ledger itself never participates in a
/// transaction and readers never block writers.
pub trait MovementLedger: Send + Sync {
    /// Validate and commit a draft, assigning its id, document number and
    /// per-stream sequence number.
    fn append(&self, draft: MovementDraft) -> Result<StockMovement, LedgerError>;

    /// Full stream for a tenant + product, in insertion (sequence) order.
    fn history(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Vec<StockMovement>, LedgerError>;

    /// Entries with `movement_date <= cutoff`, sorted chronologically with
    /// sequence as the tie-break — the replay order the costing engine uses.
    fn history_until(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<StockMovement>, LedgerError> {
        let mut movements = self.history(tenant_id, product_id)?;
        movements.retain(|m| m.movement_date <= cutoff);
        movements.sort_by(|a, b| {
            a.movement_date
                .cmp(&b.movement_date)
                .then(a.sequence.cmp(&b.sequence))
        });
        Ok(movements)
    }

    /// Last assigned sequence number for a stream (0 if empty). Grows on
    /// every append, so it doubles as a cache-invalidation key.
    fn stream_version(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<u64, LedgerError>;
}

impl<L> MovementLedger for &L
where
    L: MovementLedger + ?Sized,
{
    fn append(&self, draft: MovementDraft) -> Result<StockMovement, LedgerError> {
        (**self).append(draft)
    }

    fn history(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Vec<StockMovement>, LedgerError> {
        (**self).history(tenant_id, product_id)
    }

    fn stream_version(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<u64, LedgerError> {
        (**self).stream_version(tenant_id, product_id)
    }
}

impl<L> MovementLedger for Arc<L>
where
    L: MovementLedger + ?Sized,
{
    fn append(&self, draft: MovementDraft) -> Result<StockMovement, LedgerError> {
        (**self).append(draft)
    }

    fn history(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Vec<StockMovement>, LedgerError> {
        (**self).history(tenant_id, product_id)
    }

    fn stream_version(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<u64, LedgerError> {
        (**self).stream_version(tenant_id, product_id)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
struct StreamKey {
    tenant_id: TenantId,
    product_id: ProductId,
}

/// In-memory append-only movement ledger.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryMovementLedger {
    streams: RwLock<HashMap<StreamKey, Vec<StockMovement>>>,
    numbering: MovementNumbering,
}

impl InMemoryMovementLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MovementLedger for InMemoryMovementLedger {
    fn append(&self, draft: MovementDraft) -> Result<StockMovement, LedgerError> {
        draft.validate()?;

        let key = StreamKey {
            tenant_id: draft.tenant_id,
            product_id: draft.product_id,
        };

        let mut streams = self
            .streams
            .write()
            .map_err(|_| LedgerError::InvalidAppend("lock poisoned".to_string()))?;

        let stream = streams.entry(key).or_default();
        let sequence = stream.last().map(|m| m.sequence).unwrap_or(0) + 1;
        let movement_number =
            self.numbering
                .next(draft.tenant_id, draft.movement_type, draft.movement_date);

        let movement = StockMovement {
            movement_id: MovementId::new(),
            movement_number,
            tenant_id: draft.tenant_id,
            product_id: draft.product_id,
            warehouse_id: draft.warehouse_id,
            movement_type: draft.movement_type,
            quantity: draft.quantity,
            unit_cost: draft.unit_cost,
            reference_doc: draft.reference_doc,
            movement_date: draft.movement_date,
            sequence,
        };

        tracing::debug!(
            movement_number = %movement.movement_number,
            movement_type = %movement.movement_type,
            quantity = %movement.quantity,
            sequence,
            "movement appended"
        );

        stream.push(movement.clone());
        Ok(movement)
    }

    fn history(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Vec<StockMovement>, LedgerError> {
        let streams = self
            .streams
            .read()
            .map_err(|_| LedgerError::InvalidAppend("lock poisoned".to_string()))?;

        Ok(streams
            .get(&StreamKey {
                tenant_id,
                product_id,
            })
            .cloned()
            .unwrap_or_default())
    }

    fn stream_version(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<u64, LedgerError> {
        let streams = self
            .streams
            .read()
            .map_err(|_| LedgerError::InvalidAppend("lock poisoned".to_string()))?;

        Ok(streams
            .get(&StreamKey {
                tenant_id,
                product_id,
            })
            .and_then(|s| s.last())
            .map(|m| m.sequence)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::MovementType;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use stockbook_core::WarehouseId;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, d, 12, 0, 0).unwrap()
    }

    fn receipt(
        tenant_id: TenantId,
        product_id: ProductId,
        quantity: Decimal,
        unit_cost: Decimal,
        date: DateTime<Utc>,
    ) -> MovementDraft {
        MovementDraft {
            tenant_id,
            product_id,
            warehouse_id: WarehouseId::new(),
            movement_type: MovementType::Receipt,
            quantity,
            unit_cost,
            reference_doc: None,
            movement_date: date,
        }
    }

    #[test]
    fn append_assigns_sequence_and_number() {
        let ledger = InMemoryMovementLedger::new();
        let tenant_id = TenantId::new();
        let product_id = ProductId::new();

        let first = ledger
            .append(receipt(tenant_id, product_id, dec!(10), dec!(2.50), day(1)))
            .unwrap();
        let second = ledger
            .append(receipt(tenant_id, product_id, dec!(5), dec!(3.00), day(2)))
            .unwrap();

        assert_eq!(first.sequence, 1);
        assert_eq!(second.sequence, 2);
        assert_eq!(first.movement_number, "REC-202608-0001");
        assert_eq!(second.movement_number, "REC-202608-0002");
        assert_eq!(ledger.stream_version(tenant_id, product_id).unwrap(), 2);
    }

    #[test]
    fn malformed_draft_never_enters_the_stream() {
        let ledger = InMemoryMovementLedger::new();
        let tenant_id = TenantId::new();
        let product_id = ProductId::new();

        let err = ledger
            .append(receipt(tenant_id, product_id, dec!(0), dec!(1), day(1)))
            .unwrap_err();
        assert!(matches!(err, LedgerError::MalformedMovement(_)));
        assert!(ledger.history(tenant_id, product_id).unwrap().is_empty());
    }

    #[test]
    fn history_until_sorts_backdated_entries_chronologically() {
        let ledger = InMemoryMovementLedger::new();
        let tenant_id = TenantId::new();
        let product_id = ProductId::new();

        // Inserted out of business-time order.
        ledger
            .append(receipt(tenant_id, product_id, dec!(1), dec!(1), day(3)))
            .unwrap();
        ledger
            .append(receipt(tenant_id, product_id, dec!(2), dec!(1), day(1)))
            .unwrap();
        ledger
            .append(receipt(tenant_id, product_id, dec!(3), dec!(1), day(2)))
            .unwrap();

        let replay = ledger
            .history_until(tenant_id, product_id, day(5))
            .unwrap();
        let quantities: Vec<Decimal> = replay.iter().map(|m| m.quantity).collect();
        assert_eq!(quantities, vec![dec!(2), dec!(3), dec!(1)]);
    }

    #[test]
    fn history_until_respects_the_cutoff() {
        let ledger = InMemoryMovementLedger::new();
        let tenant_id = TenantId::new();
        let product_id = ProductId::new();

        ledger
            .append(receipt(tenant_id, product_id, dec!(1), dec!(1), day(1)))
            .unwrap();
        ledger
            .append(receipt(tenant_id, product_id, dec!(2), dec!(1), day(10)))
            .unwrap();

        let replay = ledger
            .history_until(tenant_id, product_id, day(5))
            .unwrap();
        assert_eq!(replay.len(), 1);
        assert_eq!(replay[0].quantity, dec!(1));
    }

    #[test]
    fn same_date_entries_replay_in_insertion_order() {
        let ledger = InMemoryMovementLedger::new();
        let tenant_id = TenantId::new();
        let product_id = ProductId::new();

        ledger
            .append(receipt(tenant_id, product_id, dec!(1), dec!(1), day(1)))
            .unwrap();
        ledger
            .append(receipt(tenant_id, product_id, dec!(2), dec!(1), day(1)))
            .unwrap();

        let replay = ledger
            .history_until(tenant_id, product_id, day(1))
            .unwrap();
        assert_eq!(replay[0].sequence, 1);
        assert_eq!(replay[1].sequence, 2);
    }

    #[test]
    fn streams_are_isolated_by_tenant_and_product() {
        let ledger = InMemoryMovementLedger::new();
        let tenant_a = TenantId::new();
        let tenant_b = TenantId::new();
        let product_id = ProductId::new();

        ledger
            .append(receipt(tenant_a, product_id, dec!(1), dec!(1), day(1)))
            .unwrap();

        assert!(ledger.history(tenant_b, product_id).unwrap().is_empty());
        assert_eq!(ledger.stream_version(tenant_b, product_id).unwrap(), 0);
        assert_eq!(
            ledger
                .history(tenant_b, ProductId::new())
                .unwrap()
                .len(),
            0
        );
    }

    proptest! {
        /// Sequence numbers are dense and strictly increasing per stream,
        /// whatever the business dates look like.
        #[test]
        fn sequences_are_dense_and_monotonic(days in prop::collection::vec(1u32..28, 1..40)) {
            let ledger = InMemoryMovementLedger::new();
            let tenant_id = TenantId::new();
            let product_id = ProductId::new();

            for d in &days {
                ledger
                    .append(receipt(tenant_id, product_id, dec!(1), dec!(1), day(*d)))
                    .unwrap();
            }

            let history = ledger.history(tenant_id, product_id).unwrap();
            for (i, m) in history.iter().enumerate() {
                prop_assert_eq!(m.sequence, i as u64 + 1);
            }
            prop_assert_eq!(
                ledger.stream_version(tenant_id, product_id).unwrap(),
                days.len() as u64
            );
        }
    }
}
