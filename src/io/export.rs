//! Export the transformed dashboard view to JSON.
//!
//! A snapshot is everything the societal view shows for one selection: the
//! comparison table, the decile series with its axis bound, and one bar
//! chart per metric. It is meant for downstream scripts and for diffing two
//! scenarios without re-running the transformation.

use std::fs::File;
use std::path::Path;

use chrono::Local;
use serde::Serialize;

use crate::chart::{
    DecileRow, ImpactRow, PartyBar, headline, impact_table, party_chart, pivot_deciles, y_bound,
};
use crate::domain::{DecileImpact, ManifestoImpact, MetricKey, MetricUnit, Party, ViewConfig};
use crate::error::{AppError, EXIT_CONFIG};
use crate::filter::{filter_decile_data, filter_manifesto_data};

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub tool: String,
    pub generated_at: String,
    pub source: String,
    pub selection: ViewConfig,
    pub impact_table: Vec<ImpactRow>,
    pub deciles: DecileSeries,
    pub metrics: Vec<MetricChart>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecileSeries {
    pub y_bound: f64,
    pub rows: Vec<DecileRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricChart {
    pub metric: MetricKey,
    pub label: &'static str,
    pub unit: MetricUnit,
    pub bars: [PartyBar; Party::COUNT],
    pub best: Party,
    pub headline: String,
}

/// Filter and transform both datasets for `config`.
///
/// `config.metric` is recorded in the selection; charts are built for every
/// metric regardless.
pub fn build_snapshot(
    config: &ViewConfig,
    manifesto: &[ManifestoImpact],
    decile: &[DecileImpact],
    source: &str,
) -> DashboardSnapshot {
    let rows = filter_manifesto_data(manifesto, config.year, config.include_indirect);
    let deciles = filter_decile_data(decile, config.year, config.include_indirect);

    let metrics = MetricKey::ALL
        .into_iter()
        .map(|metric| {
            let chart = party_chart(&rows, metric);
            MetricChart {
                metric,
                label: metric.label(),
                unit: metric.unit(),
                bars: chart.bars,
                best: chart.best,
                headline: headline(&chart, metric),
            }
        })
        .collect();

    DashboardSnapshot {
        tool: "manifestos".to_string(),
        generated_at: Local::now().to_rfc3339(),
        source: source.to_string(),
        selection: *config,
        impact_table: impact_table(&rows),
        deciles: DecileSeries {
            y_bound: y_bound(&deciles),
            rows: pivot_deciles(&deciles),
        },
        metrics,
    }
}

/// Write a snapshot as pretty-printed JSON.
pub fn write_snapshot_json(path: &Path, snapshot: &DashboardSnapshot) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            EXIT_CONFIG,
            format!("Failed to create export JSON '{}': {e}", path.display()),
        )
    })?;

    serde_json::to_writer_pretty(file, snapshot)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to write export JSON: {e}")))?;

    log::info!("wrote dashboard snapshot to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::fixtures::{sample_decile, sample_manifesto};

    #[test]
    fn snapshot_covers_every_metric() {
        let config = ViewConfig {
            year: 2025,
            include_indirect: true,
            metric: MetricKey::Taxes,
        };
        let snap = build_snapshot(&config, &sample_manifesto(), &sample_decile(), "data");

        assert_eq!(snap.metrics.len(), MetricKey::ALL.len());
        assert_eq!(snap.impact_table.len(), MetricKey::ALL.len());
        assert_eq!(snap.deciles.rows.len(), 10);
        assert_eq!(snap.deciles.y_bound, 3.0);

        let benefits = &snap.metrics[1];
        assert_eq!(benefits.metric, MetricKey::Benefits);
        assert_eq!(benefits.best, Party::Labour);
    }

    #[test]
    fn snapshot_json_uses_dataset_vocabulary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.json");
        let snap = build_snapshot(&ViewConfig::default(), &sample_manifesto(), &sample_decile(), "data");
        write_snapshot_json(&path, &snap).unwrap();

        let json: serde_json::Value =
            serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(json["selection"]["year"], 2028);
        assert_eq!(json["selection"]["includeIndirect"], true);
        assert_eq!(json["selection"]["metric"], "cost");
        assert_eq!(json["metrics"][0]["unit"], "bn");
        assert_eq!(json["deciles"]["rows"][0]["decile"], 1);
        assert_eq!(json["deciles"]["rows"][0]["Labour Party"], 0.0);
        assert!(json["generated_at"].as_str().is_some());
    }

    #[test]
    fn unwritable_path_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("view.json");
        let snap = build_snapshot(&ViewConfig::default(), &[], &[], "data");
        let err = write_snapshot_json(&path, &snap).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_CONFIG);
    }
}
