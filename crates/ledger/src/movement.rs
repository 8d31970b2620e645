use chrono::{DateTime, Utc};
use core::str::FromStr;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockbook_core::{MovementId, ProductId, TenantId, WarehouseId};

use crate::store::LedgerError;

/// Kind of stock movement.
///
/// The string forms are stable wire/storage identifiers. Anything else is a
/// malformed movement and is rejected before it can enter a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Receipt,
    Issue,
    TransferIn,
    TransferOut,
    Adjustment,
    ProductionReceipt,
    ProductionIssue,
}

/// How a movement affects the running balance during replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementDirection {
    /// Adds quantity at the row's unit cost.
    Inflow,
    /// Consumes quantity at the running average cost.
    Outflow,
    /// Direction carried by the quantity's sign (adjustments: positive is a
    /// write-up, negative a write-down).
    Signed,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Receipt => "receipt",
            MovementType::Issue => "issue",
            MovementType::TransferIn => "transfer_in",
            MovementType::TransferOut => "transfer_out",
            MovementType::Adjustment => "adjustment",
            MovementType::ProductionReceipt => "production_receipt",
            MovementType::ProductionIssue => "production_issue",
        }
    }

    pub fn direction(&self) -> MovementDirection {
        match self {
            MovementType::Receipt | MovementType::TransferIn | MovementType::ProductionReceipt => {
                MovementDirection::Inflow
            }
            MovementType::Issue | MovementType::TransferOut | MovementType::ProductionIssue => {
                MovementDirection::Outflow
            }
            MovementType::Adjustment => MovementDirection::Signed,
        }
    }

    pub fn is_inflow(&self) -> bool {
        self.direction() == MovementDirection::Inflow
    }

    pub fn is_outflow(&self) -> bool {
        self.direction() == MovementDirection::Outflow
    }

    /// Document-number prefix for this movement type.
    pub fn number_prefix(&self) -> &'static str {
        match self {
            MovementType::Receipt => "REC",
            MovementType::Issue => "ISS",
            MovementType::TransferIn | MovementType::TransferOut => "TRF",
            MovementType::Adjustment => "ADJ",
            MovementType::ProductionReceipt | MovementType::ProductionIssue => "PROD",
        }
    }
}

impl core::fmt::Display for MovementType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "receipt" => Ok(MovementType::Receipt),
            "issue" => Ok(MovementType::Issue),
            "transfer_in" => Ok(MovementType::TransferIn),
            "transfer_out" => Ok(MovementType::TransferOut),
            "adjustment" => Ok(MovementType::Adjustment),
            "production_receipt" => Ok(MovementType::ProductionReceipt),
            "production_issue" => Ok(MovementType::ProductionIssue),
            other => Err(LedgerError::MalformedMovement(format!(
                "unknown movement type: {other}"
            ))),
        }
    }
}

/// A movement ready to be appended (no id, number or sequence yet).
///
/// Producers (purchase receipt, production completion, transfers, manual
/// adjustments) build drafts; the ledger validates and commits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementDraft {
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub movement_type: MovementType,
    /// Magnitude for directed types; signed for adjustments.
    pub quantity: Decimal,
    /// Cost per unit for inflow rows; ignored on outflow rows.
    pub unit_cost: Decimal,
    /// Owning business document (WO number, PO number, ...).
    pub reference_doc: Option<String>,
    /// Business time; defines the chronological replay order.
    pub movement_date: DateTime<Utc>,
}

impl MovementDraft {
    /// Write-time validation. Rejected drafts never enter a stream, so
    /// replay only ever sees well-formed rows.
    pub fn validate(&self) -> Result<(), LedgerError> {
        match self.movement_type.direction() {
            MovementDirection::Signed => {
                if self.quantity == Decimal::ZERO {
                    return Err(LedgerError::MalformedMovement(
                        "adjustment quantity cannot be zero".to_string(),
                    ));
                }
            }
            MovementDirection::Inflow | MovementDirection::Outflow => {
                if self.quantity <= Decimal::ZERO {
                    return Err(LedgerError::MalformedMovement(format!(
                        "{} quantity must be positive, got {}",
                        self.movement_type, self.quantity
                    )));
                }
            }
        }

        // Outflow rows carry no meaningful cost; inflow rows (and write-up
        // adjustments) must not book negative cost.
        let books_value = match self.movement_type.direction() {
            MovementDirection::Inflow => true,
            MovementDirection::Signed => self.quantity > Decimal::ZERO,
            MovementDirection::Outflow => false,
        };
        if books_value && self.unit_cost < Decimal::ZERO {
            return Err(LedgerError::MalformedMovement(format!(
                "{} unit_cost cannot be negative, got {}",
                self.movement_type, self.unit_cost
            )));
        }

        Ok(())
    }
}

/// One committed ledger entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub movement_id: MovementId,
    /// Human-facing document number, e.g. `REC-202608-0001`.
    pub movement_number: String,
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub movement_type: MovementType,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub reference_doc: Option<String>,
    pub movement_date: DateTime<Utc>,
    /// Monotonically increasing position in the (tenant, product) stream;
    /// breaks `movement_date` ties during replay.
    pub sequence: u64,
}
