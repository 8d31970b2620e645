//! Dashboard stock alerts: the most critical reorder suggestions rendered
//! as actionable messages.

use serde::{Deserialize, Serialize};

use crate::reorder::{ReorderSuggestion, Urgency};

/// A low-stock alert for the operations dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAlert {
    pub severity: Urgency,
    pub message: String,
    pub action_required: String,
    pub reference: String,
}

/// Render the top `limit` reorder suggestions as alerts.
///
/// Expects suggestions in advisor order (most urgent first), so truncating
/// keeps the critical ones.
pub fn stock_alerts(suggestions: &[ReorderSuggestion], limit: usize) -> Vec<StockAlert> {
    suggestions
        .iter()
        .take(limit)
        .map(|s| StockAlert {
            severity: s.urgency,
            message: format!("Low stock: {} ({} units)", s.sku, s.current_stock),
            action_required: "Create purchase order".to_string(),
            reference: s.sku.clone(),
        })
        .collect()
}
