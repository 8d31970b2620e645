//! Movement document numbers: `PREFIX-YYYYMM-NNNN`, per tenant, counter
//! resetting each month.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Datelike, Utc};

use stockbook_core::TenantId;

use crate::movement::MovementType;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SeriesKey {
    tenant_id: TenantId,
    prefix: &'static str,
    year_month: u32, // YYYYMM
}

/// Allocates sequential movement numbers per (tenant, prefix, month) series.
#[derive(Debug, Default)]
pub struct MovementNumbering {
    counters: RwLock<HashMap<SeriesKey, u32>>,
}

impl MovementNumbering {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next number in the series, e.g. `REC-202608-0001`.
    pub fn next(
        &self,
        tenant_id: TenantId,
        movement_type: MovementType,
        at: DateTime<Utc>,
    ) -> String {
        let prefix = movement_type.number_prefix();
        let year_month = at.year() as u32 * 100 + at.month();
        let key = SeriesKey {
            tenant_id,
            prefix,
            year_month,
        };

        let seq = match self.counters.write() {
            Ok(mut counters) => {
                let counter = counters.entry(key).or_insert(0);
                *counter += 1;
                *counter
            }
            // A poisoned counter lock only degrades number uniqueness for
            // display; appends still get unique sequence numbers.
            Err(_) => 1,
        };

        format!("{prefix}-{year_month:06}-{seq:04}")
    }
}
