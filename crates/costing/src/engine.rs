use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use stockbook_core::{ProductId, TenantId};
use stockbook_ledger::{LedgerError, MovementDirection, MovementLedger, StockMovement};

use crate::balance::{OutflowPolicy, RunningBalance};
use crate::snapshot::CostingSnapshot;

/// Costing computation error.
///
/// Surfaced synchronously to the caller; a snapshot is either fully computed
/// or one of these is raised — there are no partial results and nothing here
/// is retryable.
#[derive(Debug, Error)]
pub enum CostingError {
    /// An outflow asked for more than the running quantity held at that
    /// point in replay (under [`OutflowPolicy::Reject`]).
    #[error(
        "insufficient stock for {movement_number}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        movement_number: String,
        requested: Decimal,
        available: Decimal,
        at: DateTime<Utc>,
    },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Fold one movement into the running balance.
///
/// Adjustments carry their direction in the quantity's sign: positive books
/// an inflow at the row's unit cost, negative consumes the magnitude at the
/// running average. Directed movements always use their magnitude.
fn apply_movement(
    balance: &mut RunningBalance,
    movement: &StockMovement,
    policy: OutflowPolicy,
) -> Result<(), CostingError> {
    let (inflow, quantity) = match movement.movement_type.direction() {
        MovementDirection::Inflow => (true, movement.quantity),
        MovementDirection::Outflow => (false, movement.quantity),
        MovementDirection::Signed => {
            if movement.quantity > Decimal::ZERO {
                (true, movement.quantity)
            } else {
                (false, -movement.quantity)
            }
        }
    };

    if inflow {
        balance.receive(quantity, movement.unit_cost);
        return Ok(());
    }

    match balance.consume(quantity) {
        Ok(()) => Ok(()),
        Err(shortfall) => match policy {
            OutflowPolicy::Reject => Err(CostingError::InsufficientStock {
                movement_number: movement.movement_number.clone(),
                requested: shortfall.requested,
                available: shortfall.available,
                at: movement.movement_date,
            }),
            OutflowPolicy::ClampToZero => {
                balance.drain();
                Ok(())
            }
            OutflowPolicy::SkipMovement => {
                tracing::warn!(
                    movement_number = %movement.movement_number,
                    requested = %shortfall.requested,
                    available = %shortfall.available,
                    "skipping outflow with insufficient recorded stock"
                );
                Ok(())
            }
        },
    }
}

/// Replay a chronologically ordered movement slice into a running balance.
///
/// This is the source of truth for costing: deterministic, side-effect-free,
/// and what every cache layer is validated against.
pub fn replay(
    movements: &[StockMovement],
    policy: OutflowPolicy,
) -> Result<RunningBalance, CostingError> {
    let mut balance = RunningBalance::new();
    for movement in movements {
        apply_movement(&mut balance, movement, policy)?;
    }
    Ok(balance)
}

/// The costing engine: snapshots a product's costing state as of a date.
///
/// Stateless and read-only with respect to the ledger; tenancy is an
/// explicit parameter on every call, never ambient state.
#[derive(Debug, Clone)]
pub struct CostingEngine<L> {
    ledger: L,
    policy: OutflowPolicy,
}

impl<L> CostingEngine<L>
where
    L: MovementLedger,
{
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            policy: OutflowPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: OutflowPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> OutflowPolicy {
        self.policy
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Compute the costing snapshot for `(tenant, product)` as of `as_of` by
    /// full replay of the movement stream.
    ///
    /// Zero movements yield the zero snapshot, which is a valid result — a
    /// failed computation is an `Err`, never a zero substitute.
    pub fn snapshot(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        as_of: DateTime<Utc>,
    ) -> Result<CostingSnapshot, CostingError> {
        let movements = self.ledger.history_until(tenant_id, product_id, as_of)?;
        let balance = replay(&movements, self.policy)?;
        Ok(CostingSnapshot::from_balance(product_id, as_of, &balance))
    }
}
