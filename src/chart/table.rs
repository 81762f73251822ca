//! The party comparison table.

use serde::Serialize;

use crate::domain::{ManifestoImpact, MetricKey, MetricUnit, Party};
use crate::report::format::{format_bn_plain, format_pct_plain};

/// One table row: a metric and its formatted value for each party.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactRow {
    pub label: &'static str,
    pub metric: MetricKey,
    /// Indexed by `Party::index()`.
    pub values: [String; Party::COUNT],
}

fn row_label(metric: MetricKey) -> &'static str {
    match metric {
        MetricKey::Cost => "Cost (bn)",
        MetricKey::Benefits => "Benefits (bn)",
        MetricKey::Taxes => "Taxes (bn)",
        MetricKey::PovertyImpact => "Poverty impact (%)",
        MetricKey::ChildPovertyImpact => "Child poverty impact (%)",
        MetricKey::AdultPovertyImpact => "Adult poverty impact (%)",
        MetricKey::SeniorPovertyImpact => "Senior poverty impact (%)",
        MetricKey::GiniIndexImpact => "Gini index impact (%)",
    }
}

/// Every metric for every party, as stored (cost is not inverted here).
pub fn impact_table(rows: &[ManifestoImpact]) -> Vec<ImpactRow> {
    MetricKey::ALL
        .into_iter()
        .map(|metric| {
            let values = Party::ALL.map(|party| {
                let raw = rows
                    .iter()
                    .find(|r| r.manifesto == party)
                    .map_or(0.0, |r| metric.value(r));
                match metric.unit() {
                    MetricUnit::Billions => format_bn_plain(raw),
                    MetricUnit::Percent => format_pct_plain(raw),
                }
            });
            ImpactRow {
                label: row_label(metric),
                metric,
                values,
            }
        })
        .collect()
}
