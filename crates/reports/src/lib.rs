//! `stockbook-reports` — derived read models over the costing engine.
//!
//! Everything here is a pure read: valuation reports, ABC classification and
//! reorder advice are recomputed from the movement ledger on demand and can
//! be thrown away at any time. Nothing in this crate writes to the ledger,
//! the catalog or purchase-order state.

pub mod abc;
pub mod alerts;
pub mod reorder;
pub mod valuation;

pub use abc::{AbcAnalysis, AbcClass, AbcEntry, AbcOutcome, ClassSummary, classify};
pub use alerts::{StockAlert, stock_alerts};
pub use reorder::{ReorderAdvisor, ReorderSuggestion, Urgency};
pub use valuation::{
    CategoryTotal, UNCATEGORIZED, ValuationFailure, ValuationReport, ValuationReporter,
    ValuationRow,
};
