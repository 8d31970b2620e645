//! Report runner: load a tenant fixture, replay its ledger, print the
//! valuation / ABC / reorder reports (and any GL auto-postings) as JSON.
//!
//! ```text
//! stockbook-report <fixture.json> [as-of-rfc3339]
//! ```
//!
//! `STOCKBOOK_OUTFLOW_POLICY` selects the insufficient-stock policy
//! (`reject` | `clamp_to_zero` | `skip_movement`; default `reject`).
//! `RUST_LOG` controls log verbosity.

mod fixture;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};

use stockbook_costing::{CostingEngine, OutflowPolicy};
use stockbook_gl::{JournalEntry, ProductionCompletion, production_completion_entry};
use stockbook_reports::{ReorderAdvisor, ValuationReporter, classify, stock_alerts};

use crate::fixture::{Fixture, LoadedFixture};

const DASHBOARD_ALERT_LIMIT: usize = 5;

fn outflow_policy_from_env() -> Result<OutflowPolicy> {
    match std::env::var("STOCKBOOK_OUTFLOW_POLICY") {
        Ok(value) => match value.as_str() {
            "reject" => Ok(OutflowPolicy::Reject),
            "clamp_to_zero" => Ok(OutflowPolicy::ClampToZero),
            "skip_movement" => Ok(OutflowPolicy::SkipMovement),
            other => bail!("unsupported STOCKBOOK_OUTFLOW_POLICY: {other}"),
        },
        Err(_) => Ok(OutflowPolicy::Reject),
    }
}

fn main() -> Result<()> {
    stockbook_observability::init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .context("usage: stockbook-report <fixture.json> [as-of-rfc3339]")?;
    let as_of = match args.next() {
        Some(raw) => DateTime::parse_from_rfc3339(&raw)
            .with_context(|| format!("invalid as-of date: {raw}"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };
    let policy = outflow_policy_from_env()?;

    let raw = std::fs::read_to_string(&path).with_context(|| format!("cannot read {path}"))?;
    let fixture: Fixture =
        serde_json::from_str(&raw).with_context(|| format!("cannot parse {path}"))?;
    let LoadedFixture {
        tenant_id,
        ledger,
        catalog,
        sku_index,
        completions,
    } = fixture.load()?;

    tracing::info!(%tenant_id, %as_of, ?policy, "running inventory reports");

    let engine = CostingEngine::new(ledger).with_policy(policy);
    let reporter = ValuationReporter::new(engine.clone(), catalog.clone());
    let report = reporter.report(tenant_id, as_of);
    let abc = classify(&report);

    let advisor = ReorderAdvisor::new(engine.clone(), catalog);
    let suggestions = advisor
        .suggestions(tenant_id, as_of)
        .context("reorder advisor failed")?;
    let alerts = stock_alerts(&suggestions, DASHBOARD_ALERT_LIMIT);

    // GL automation consumes one computed value per completion: the
    // completed quantity at the product's current average cost.
    let mut gl_entries: Vec<JournalEntry> = Vec::new();
    for (seq, completion) in completions.iter().enumerate() {
        let product_id = *sku_index
            .get(&completion.sku)
            .with_context(|| format!("completion references unknown SKU {}", completion.sku))?;
        let snapshot = engine
            .snapshot(tenant_id, product_id, as_of)
            .with_context(|| format!("costing failed for completion {}", completion.work_order))?;
        let production_value = completion.quantity_completed * snapshot.average_unit_cost;

        let posting = production_completion_entry(
            tenant_id,
            &ProductionCompletion {
                work_order: completion.work_order.clone(),
                sku: completion.sku.clone(),
                quantity_completed: completion.quantity_completed,
            },
            production_value,
            as_of,
            seq as u32 + 1,
        )?;
        gl_entries.extend(posting);
    }

    let output = serde_json::json!({
        "tenant_id": tenant_id,
        "as_of": as_of,
        "valuation": report,
        "abc": abc,
        "reorder_suggestions": suggestions,
        "alerts": alerts,
        "gl_entries": gl_entries,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
