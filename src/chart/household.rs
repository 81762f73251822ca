//! Household calculator chart data.

use crate::chart::party::PartyChart;
use crate::domain::{HouseholdResult, Party};

/// Distinct metric names, in the order the service first reports them.
pub fn household_metrics(results: &[HouseholdResult]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for r in results {
        if !out.contains(&r.metric) {
            out.push(r.metric.clone());
        }
    }
    out
}

/// One bar per party for the selected metric (0 when the service omitted it).
///
/// Higher is always better here: every household metric is a change in net
/// income.
pub fn household_chart(results: &[HouseholdResult], metric: &str) -> PartyChart {
    let values = Party::ALL.map(|party| {
        results
            .iter()
            .find(|r| r.party == party && r.metric == metric)
            .map_or(0.0, |r| r.value)
    });
    PartyChart::from_values(values, false)
}

pub fn household_headline(chart: &PartyChart) -> String {
    format!(
        "The {} would increase your net income the most",
        chart.best.short_label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(metric: &str, value: f64, party: Party) -> HouseholdResult {
        HouseholdResult {
            metric: metric.to_string(),
            value,
            party,
        }
    }

    fn sample() -> Vec<HouseholdResult> {
        vec![
            result("National Insurance", 420.0, Party::Conservatives),
            result("Net change", 310.5, Party::Conservatives),
            result("National Insurance", 0.0, Party::Labour),
            result("Net change", -12.0, Party::Labour),
            result("Universal Credit", 55.0, Party::LiberalDemocrats),
            result("Net change", 480.25, Party::LiberalDemocrats),
        ]
    }

    #[test]
    fn metrics_are_distinct_in_first_seen_order() {
        assert_eq!(
            household_metrics(&sample()),
            vec!["National Insurance", "Net change", "Universal Credit"]
        );
        assert!(household_metrics(&[]).is_empty());
    }

    #[test]
    fn chart_picks_highest_and_uses_short_label() {
        let chart = household_chart(&sample(), "Net change");
        assert_eq!(chart.value(Party::Labour), -12.0);
        assert_eq!(chart.best, Party::LiberalDemocrats);

        let chart = household_chart(&sample(), "National Insurance");
        assert_eq!(chart.value(Party::LiberalDemocrats), 0.0);
        assert_eq!(chart.best, Party::Conservatives);

        let chart = household_chart(&[result("Net change", 9.0, Party::Labour)], "Net change");
        assert_eq!(
            household_headline(&chart),
            "The Labour would increase your net income the most"
        );
    }

    #[test]
    fn unknown_metric_is_all_zero() {
        let chart = household_chart(&sample(), "Stamp Duty");
        assert!(chart.bars.iter().all(|b| b.value == 0.0));
        assert_eq!(chart.best, Party::Conservatives);
    }
}
