//! Plain-text renderings of the dashboard views.
//!
//! These back the non-interactive subcommands. Layout follows one rule:
//! fixed-width columns, trailing whitespace trimmed from every line.

use crate::chart::decile::DecileRow;
use crate::chart::party::PartyChart;
use crate::chart::table::ImpactRow;
use crate::domain::{MetricKey, MetricUnit, Party, ViewConfig};
use crate::report::format::{format_gbp, format_metric, format_pct_detail, format_pct_tick};

const LABEL_WIDTH: usize = 26;
const VALUE_WIDTH: usize = 18;
const BAR_WIDTH: usize = 30;

/// One-line summary of the current selection.
pub fn format_view_header(config: &ViewConfig) -> String {
    let impacts = if config.include_indirect {
        "direct + indirect"
    } else {
        "direct only"
    };
    format!(
        "=== manifestos - {} | impacts: {impacts} | metric: {} ===",
        config.year,
        config.metric.label()
    )
}

/// The party comparison table.
pub fn format_impact_table(rows: &[ImpactRow]) -> String {
    let mut out = String::new();

    let mut header = format!("{:<LABEL_WIDTH$}", "Metric");
    for party in Party::ALL {
        header.push_str(&format!(" {:>VALUE_WIDTH$}", party.label()));
    }
    push_line(&mut out, &header);
    push_line(&mut out, &rule());

    for row in rows {
        let mut line = format!("{:<LABEL_WIDTH$}", row.label);
        for value in &row.values {
            line.push_str(&format!(" {value:>VALUE_WIDTH$}"));
        }
        push_line(&mut out, &line);
    }

    out
}

/// Relative income change per decile, one column per party.
pub fn format_deciles(pivot: &[DecileRow], bound: f64) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        &format!(
            "Relative change in household income by decile (axis {} to {})",
            format_pct_tick(-bound),
            format_pct_tick(bound)
        ),
    );

    let mut header = format!("{:<LABEL_WIDTH$}", "Income decile");
    for party in Party::ALL {
        header.push_str(&format!(" {:>VALUE_WIDTH$}", party.label()));
    }
    push_line(&mut out, &header);
    push_line(&mut out, &rule());

    if pivot.is_empty() {
        push_line(&mut out, "(no decile data for this selection)");
        return out;
    }

    for row in pivot {
        let mut line = format!("{:<LABEL_WIDTH$}", row.decile);
        for party in Party::ALL {
            line.push_str(&format!(" {:>VALUE_WIDTH$}", format_pct_detail(row.value(party))));
        }
        push_line(&mut out, &line);
    }

    out
}

/// Bar chart for one metric: headline, then one bar per party.
///
/// The best party is marked with `*`.
pub fn format_party_chart(chart: &PartyChart, headline: &str, unit: MetricUnit) -> String {
    let labels: Vec<String> = chart.bars.iter().map(|b| format_metric(b.value, unit)).collect();
    format_bars(chart, headline, &labels)
}

/// Household results for one metric, values in pounds.
pub fn format_household_chart(chart: &PartyChart, headline: &str, metrics: &[String], selected: &str) -> String {
    let labels: Vec<String> = chart.bars.iter().map(|b| format_gbp(b.value)).collect();
    let mut out = format_bars(chart, headline, &labels);
    if metrics.len() > 1 {
        out.push('\n');
        push_line(&mut out, "Available metrics:");
        for m in metrics {
            let marker = if m == selected { "*" } else { " " };
            push_line(&mut out, &format!("{marker} {m}"));
        }
    }
    out
}

/// Caption for a metric chart in the CLI, e.g. `Cost (bn, positive = deficit reduction)`.
pub fn metric_caption(metric: MetricKey) -> String {
    match (metric, metric.unit()) {
        (MetricKey::Cost, _) => "Cost (bn, positive = deficit reduction)".to_string(),
        (_, MetricUnit::Billions) => format!("{} (bn)", metric.label()),
        (_, MetricUnit::Percent) => format!("{} (%)", metric.label()),
    }
}

fn format_bars(chart: &PartyChart, headline: &str, labels: &[String]) -> String {
    let mut out = String::new();
    push_line(&mut out, headline);
    out.push('\n');

    let max_abs = chart
        .bars
        .iter()
        .map(|b| b.value.abs())
        .fold(0.0_f64, f64::max);

    for (bar, label) in chart.bars.iter().zip(labels) {
        let marker = if bar.party == chart.best { "*" } else { " " };
        push_line(
            &mut out,
            &format!(
                "{marker} {:<20} {label:>10} {}",
                bar.party.label(),
                ascii_bar(bar.value, max_abs, BAR_WIDTH)
            ),
        );
    }

    out
}

/// Horizontal bar centred on zero: negatives grow left, positives right.
fn ascii_bar(value: f64, max_abs: f64, width: usize) -> String {
    let half = width / 2;
    let filled = if max_abs > 0.0 {
        ((value.abs() / max_abs) * half as f64).round() as usize
    } else {
        0
    }
    .min(half);

    let (left, right) = if value < 0.0 {
        (format!("{}{}", " ".repeat(half - filled), "#".repeat(filled)), String::new())
    } else {
        (" ".repeat(half), "#".repeat(filled))
    };
    format!("{left}|{right}")
}

fn rule() -> String {
    let mut line = format!("{:-<LABEL_WIDTH$}", "");
    for _ in Party::ALL {
        line.push_str(&format!(" {:-<VALUE_WIDTH$}", ""));
    }
    line
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{headline, impact_table, party_chart, pivot_deciles, y_bound};
    use crate::domain::{HouseholdResult, MetricKey};
    use crate::filter::fixtures::{sample_decile, sample_manifesto};
    use crate::filter::{filter_decile_data, filter_manifesto_data};

    #[test]
    fn impact_table_lists_every_metric() {
        let rows = filter_manifesto_data(&sample_manifesto(), 2025, true);
        let text = format_impact_table(&impact_table(&rows));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2 + MetricKey::ALL.len());
        assert!(lines[0].starts_with("Metric"));
        assert!(lines[0].contains("Labour Party"));
        assert!(lines[2].starts_with("Cost (bn)"));
        assert!(lines[2].ends_with("0.0"));
        assert!(lines.iter().all(|l| l == &l.trim_end()));
    }

    #[test]
    fn deciles_show_two_decimals() {
        let rows = filter_decile_data(&sample_decile(), 2025, true);
        let text = format_deciles(&pivot_deciles(&rows), y_bound(&rows));
        assert!(text.contains("(axis -3% to +3%)"));
        assert!(text.contains("+2.20%"));
        assert!(text.contains("0.00%"));
    }

    #[test]
    fn empty_deciles_say_so() {
        let text = format_deciles(&[], 0.0);
        assert!(text.contains("no decile data"));
    }

    #[test]
    fn party_chart_marks_best() {
        let rows = filter_manifesto_data(&sample_manifesto(), 2025, true);
        let chart = party_chart(&rows, MetricKey::Cost);
        let text = format_party_chart(&chart, &headline(&chart, MetricKey::Cost), MetricUnit::Billions);

        assert!(text.starts_with("The Labour Party would reduce the deficit the most"));
        let best = text.lines().find(|l| l.starts_with('*')).unwrap();
        assert!(best.contains("Labour Party"));
        assert!(best.contains("-3.3bn"));
        assert!(text.contains("+1.9bn"));
    }

    #[test]
    fn household_chart_uses_pounds() {
        let results = vec![
            HouseholdResult { metric: "Net change".into(), value: 1234.0, party: Party::Labour },
            HouseholdResult { metric: "Income tax".into(), value: -50.0, party: Party::Labour },
        ];
        let chart = crate::chart::household_chart(&results, "Net change");
        let metrics = crate::chart::household_metrics(&results);
        let text = format_household_chart(&chart, "headline", &metrics, "Net change");
        assert!(text.contains("+£1,234"));
        assert!(text.contains("* Net change"));
        assert!(text.contains("  Income tax"));
    }

    #[test]
    fn ascii_bar_is_centred() {
        assert_eq!(ascii_bar(10.0, 10.0, 4), "  |##");
        assert_eq!(ascii_bar(-5.0, 10.0, 4), " #|");
        assert_eq!(ascii_bar(0.0, 0.0, 4), "  |");
    }

    #[test]
    fn captions() {
        assert_eq!(metric_caption(MetricKey::Taxes), "Taxes (bn)");
        assert_eq!(metric_caption(MetricKey::GiniIndexImpact), "Gini index (%)");
    }
}
