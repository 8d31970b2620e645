//! ABC classification: segment inventory by cumulative value share.
//!
//! Class A holds the highest-value items up to 80% of cumulative share, B
//! the next band up to 95%, C the tail.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::valuation::ValuationReport;

const CLASS_A_CUTOFF_PCT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);
const CLASS_B_CUTOFF_PCT: Decimal = Decimal::from_parts(95, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbcClass {
    A,
    B,
    C,
}

/// One classified product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcEntry {
    pub sku: String,
    pub product_name: String,
    pub inventory_value: Decimal,
    pub quantity: Decimal,
    pub cumulative_value_pct: Decimal,
    pub classification: AbcClass,
}

/// Item count and value held by one class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub items: usize,
    pub value: Decimal,
}

/// Full classification result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcAnalysis {
    pub total_items: usize,
    pub total_value: Decimal,
    /// Descending by value; ties broken by ascending SKU.
    pub entries: Vec<AbcEntry>,
    pub class_a: ClassSummary,
    pub class_b: ClassSummary,
    pub class_c: ClassSummary,
}

/// Classification outcome.
///
/// A zero total value makes cumulative shares meaningless, so that case is
/// an explicit `NotPerformed` — never a division by zero and never arbitrary
/// classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AbcOutcome {
    Classified(AbcAnalysis),
    NotPerformed { total_items: usize },
}

/// Classify a valuation report's rows into ABC bands.
pub fn classify(report: &ValuationReport) -> AbcOutcome {
    let total_value: Decimal = report.rows.values().map(|r| r.total_value).sum();

    if total_value == Decimal::ZERO {
        return AbcOutcome::NotPerformed {
            total_items: report.rows.len(),
        };
    }

    let mut rows: Vec<_> = report.rows.values().collect();
    rows.sort_by(|a, b| {
        b.total_value
            .cmp(&a.total_value)
            .then_with(|| a.sku.cmp(&b.sku))
    });

    let hundred = Decimal::ONE_HUNDRED;
    let mut entries = Vec::with_capacity(rows.len());
    let mut class_a = ClassSummary::default();
    let mut class_b = ClassSummary::default();
    let mut class_c = ClassSummary::default();
    let mut cumulative = Decimal::ZERO;

    for row in rows {
        cumulative += row.total_value;
        let cumulative_value_pct = cumulative / total_value * hundred;

        let classification = if cumulative_value_pct <= CLASS_A_CUTOFF_PCT {
            AbcClass::A
        } else if cumulative_value_pct <= CLASS_B_CUTOFF_PCT {
            AbcClass::B
        } else {
            AbcClass::C
        };

        let summary = match classification {
            AbcClass::A => &mut class_a,
            AbcClass::B => &mut class_b,
            AbcClass::C => &mut class_c,
        };
        summary.items += 1;
        summary.value += row.total_value;

        entries.push(AbcEntry {
            sku: row.sku.clone(),
            product_name: row.product_name.clone(),
            inventory_value: row.total_value,
            quantity: row.quantity,
            cumulative_value_pct,
            classification,
        });
    }

    AbcOutcome::Classified(AbcAnalysis {
        total_items: entries.len(),
        total_value,
        entries,
        class_a,
        class_b,
        class_c,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::{UNCATEGORIZED, ValuationRow};
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn report_from_values(values: &[(&str, Decimal)]) -> ValuationReport {
        let mut rows = BTreeMap::new();
        for (sku, value) in values {
            rows.insert(
                sku.to_string(),
                ValuationRow {
                    sku: sku.to_string(),
                    product_name: format!("Product {sku}"),
                    category: UNCATEGORIZED.to_string(),
                    quantity: dec!(1),
                    average_cost: *value,
                    total_value: *value,
                    reorder_point: 0,
                },
            );
        }
        let total_inventory_value = rows.values().map(|r: &ValuationRow| r.total_value).sum();
        ValuationReport {
            as_of: Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap(),
            rows,
            total_inventory_value,
            by_category: BTreeMap::new(),
            failures: vec![],
        }
    }

    #[test]
    fn three_products_split_a_b_c() {
        // Values 600/300/100 of a 1000 total: cumulative 60%, 90%, 100%.
        let report = report_from_values(&[
            ("SKU-HI", dec!(600)),
            ("SKU-MID", dec!(300)),
            ("SKU-LO", dec!(100)),
        ]);

        let analysis = match classify(&report) {
            AbcOutcome::Classified(a) => a,
            other => panic!("expected classification, got {other:?}"),
        };

        assert_eq!(analysis.total_value, dec!(1000));
        let by_sku: BTreeMap<_, _> = analysis
            .entries
            .iter()
            .map(|e| (e.sku.as_str(), e))
            .collect();

        assert_eq!(by_sku["SKU-HI"].classification, AbcClass::A);
        assert_eq!(by_sku["SKU-HI"].cumulative_value_pct, dec!(60));
        assert_eq!(by_sku["SKU-MID"].classification, AbcClass::B);
        assert_eq!(by_sku["SKU-MID"].cumulative_value_pct, dec!(90));
        assert_eq!(by_sku["SKU-LO"].classification, AbcClass::C);
        assert_eq!(by_sku["SKU-LO"].cumulative_value_pct, dec!(100));

        assert_eq!(analysis.class_a.items, 1);
        assert_eq!(analysis.class_a.value, dec!(600));
        assert_eq!(analysis.class_b.items, 1);
        assert_eq!(analysis.class_c.items, 1);
    }

    #[test]
    fn entries_are_sorted_by_value_then_sku() {
        let report = report_from_values(&[
            ("SKU-B", dec!(100)),
            ("SKU-A", dec!(100)),
            ("SKU-C", dec!(500)),
        ]);

        let analysis = match classify(&report) {
            AbcOutcome::Classified(a) => a,
            other => panic!("expected classification, got {other:?}"),
        };

        let order: Vec<&str> = analysis.entries.iter().map(|e| e.sku.as_str()).collect();
        assert_eq!(order, vec!["SKU-C", "SKU-A", "SKU-B"]);
    }

    #[test]
    fn zero_total_value_is_not_performed() {
        let report = report_from_values(&[("SKU-A", dec!(0)), ("SKU-B", dec!(0))]);
        assert_eq!(
            classify(&report),
            AbcOutcome::NotPerformed { total_items: 2 }
        );
    }

    #[test]
    fn empty_report_is_not_performed() {
        let report = report_from_values(&[]);
        assert_eq!(classify(&report), AbcOutcome::NotPerformed { total_items: 0 });
    }

    proptest! {
        /// Every product in a non-zero report gets exactly one class, and the
        /// per-class item counts sum to the total item count.
        #[test]
        fn classification_covers_every_item(
            values in prop::collection::vec(0u64..1_000_000, 1..50)
        ) {
            prop_assume!(values.iter().sum::<u64>() > 0);

            let named: Vec<(String, Decimal)> = values
                .iter()
                .enumerate()
                .map(|(i, v)| (format!("SKU-{i:03}"), Decimal::from(*v)))
                .collect();
            let refs: Vec<(&str, Decimal)> =
                named.iter().map(|(s, v)| (s.as_str(), *v)).collect();
            let report = report_from_values(&refs);

            let analysis = match classify(&report) {
                AbcOutcome::Classified(a) => a,
                other => panic!("expected classification, got {other:?}"),
            };

            prop_assert_eq!(analysis.entries.len(), values.len());
            prop_assert_eq!(
                analysis.class_a.items + analysis.class_b.items + analysis.class_c.items,
                values.len()
            );
            prop_assert_eq!(
                analysis.class_a.value + analysis.class_b.value + analysis.class_c.value,
                analysis.total_value
            );

            // Cumulative percentage is non-decreasing and ends at 100.
            let mut last = Decimal::ZERO;
            for entry in &analysis.entries {
                prop_assert!(entry.cumulative_value_pct >= last);
                last = entry.cumulative_value_pct;
            }
        }
    }
}
