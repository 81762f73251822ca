//! Per-party bar chart data and the best-party pick.

use serde::Serialize;

use crate::chart::round1;
use crate::domain::{ManifestoImpact, MetricKey, MetricUnit, Party};

/// One bar: a party and its value in display units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PartyBar {
    pub party: Party,
    pub value: f64,
}

/// Bars for every party (in `Party::ALL` order) plus the winner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PartyChart {
    pub bars: [PartyBar; Party::COUNT],
    pub best: Party,
}

impl PartyChart {
    /// Build a chart from per-party values and pick the best bar.
    pub fn from_values(values: [f64; Party::COUNT], lower_is_better: bool) -> Self {
        let bars = Party::ALL.map(|party| PartyBar {
            party,
            value: values[party.index()],
        });
        let best = best_of(&bars, lower_is_better);
        Self { bars, best }
    }

    pub fn value(&self, party: Party) -> f64 {
        self.bars[party.index()].value
    }

    pub fn best_value(&self) -> f64 {
        self.value(self.best)
    }
}

/// Display value of `metric` for one (optional) row.
///
/// Cost is negated so that a positive bar means the deficit shrinks; currency
/// metrics are converted to billions; the result is rounded to one decimal.
/// A missing row charts as 0.
pub fn chart_value(row: Option<&ManifestoImpact>, metric: MetricKey) -> f64 {
    let Some(row) = row else {
        return 0.0;
    };
    let mut value = metric.value(row);
    if metric == MetricKey::Cost {
        value = -value;
    }
    if metric.unit() == MetricUnit::Billions {
        value /= 1e9;
    }
    round1(value)
}

/// Bar chart of `metric` across parties for one filtered scenario.
pub fn party_chart(rows: &[ManifestoImpact], metric: MetricKey) -> PartyChart {
    let values = Party::ALL.map(|party| chart_value(rows.iter().find(|r| r.manifesto == party), metric));
    PartyChart::from_values(values, metric.lower_is_better())
}

/// The extreme bar; ties go to the earliest party in `Party::ALL`.
///
/// Equivalent to a stable sort by value followed by taking the head.
pub(crate) fn best_of(bars: &[PartyBar; Party::COUNT], lower_is_better: bool) -> Party {
    let mut best = bars[0];
    for bar in &bars[1..] {
        let better = if lower_is_better {
            bar.value < best.value
        } else {
            bar.value > best.value
        };
        if better {
            best = *bar;
        }
    }
    best.party
}

/// Title shown above the bar chart.
pub fn headline(chart: &PartyChart, metric: MetricKey) -> String {
    let party = chart.best.label();
    match metric {
        MetricKey::Cost => format!("The {party} would reduce the deficit the most"),
        MetricKey::Taxes => format!("The {party} would reduce taxes the most"),
        MetricKey::Benefits => format!("The {party} would increase benefits the most"),
        _ => {
            let label = metric.label().to_lowercase();
            if chart.best_value() < 0.0 {
                format!("The {party} would decrease {label} the most")
            } else {
                format!("The {party} would increase {label} the least")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter_manifesto_data;
    use crate::filter::fixtures::{manifesto, sample_manifesto};

    fn cost_row(party: Party, cost: f64) -> ManifestoImpact {
        manifesto(party, cost, 0.0, 0.0, [0.0; 4], 0.0, 2028, true)
    }

    #[test]
    fn cost_is_inverted_converted_and_rounded() {
        let rows = filter_manifesto_data(&sample_manifesto(), 2025, true);
        let chart = party_chart(&rows, MetricKey::Cost);
        assert_eq!(chart.value(Party::Conservatives), 1.9);
        assert_eq!(chart.value(Party::Labour), -3.3);
        assert_eq!(chart.value(Party::LiberalDemocrats), 0.0);
        assert_eq!(chart.best, Party::Labour);
    }

    #[test]
    fn lowest_cost_after_inversion_wins() {
        // Charted values: Conservatives -5, Labour 10, Liberal Democrats -2.
        let rows = vec![
            cost_row(Party::Conservatives, 5e9),
            cost_row(Party::Labour, -10e9),
            cost_row(Party::LiberalDemocrats, 2e9),
        ];
        let chart = party_chart(&rows, MetricKey::Cost);
        assert_eq!(chart.value(Party::Conservatives), -5.0);
        assert_eq!(chart.value(Party::Labour), 10.0);
        assert_eq!(chart.best, Party::Conservatives);
        assert_eq!(
            headline(&chart, MetricKey::Cost),
            "The Conservatives would reduce the deficit the most"
        );
    }

    #[test]
    fn negated_cost_ties_round_up() {
        let rows = vec![cost_row(Party::Conservatives, 0.25e9), cost_row(Party::Labour, 0.05e9)];
        let chart = party_chart(&rows, MetricKey::Cost);
        assert_eq!(chart.value(Party::Conservatives), -0.2);
        assert_eq!(chart.value(Party::Labour), 0.0);
        assert_eq!(chart.best, Party::Conservatives);
    }

    #[test]
    fn benefits_highest_wins() {
        let rows = filter_manifesto_data(&sample_manifesto(), 2025, true);
        let chart = party_chart(&rows, MetricKey::Benefits);
        assert_eq!(chart.best, Party::Labour);
        assert_eq!(chart.value(Party::Labour), 4.2);
        assert_eq!(
            headline(&chart, MetricKey::Benefits),
            "The Labour Party would increase benefits the most"
        );
    }

    #[test]
    fn percent_metrics_are_not_scaled() {
        let rows = filter_manifesto_data(&sample_manifesto(), 2025, true);
        let chart = party_chart(&rows, MetricKey::SeniorPovertyImpact);
        assert_eq!(chart.value(Party::Labour), -8.6);
        assert_eq!(chart.best, Party::Labour);
        assert_eq!(
            headline(&chart, MetricKey::SeniorPovertyImpact),
            "The Labour Party would decrease senior poverty the most"
        );
    }

    #[test]
    fn missing_party_charts_as_zero_and_can_win() {
        // Only Conservatives present with a positive poverty impact:
        // the absent parties chart as 0 and Labour wins the tie by order.
        let rows = vec![manifesto(Party::Conservatives, 0.0, 0.0, 0.0, [1.0; 4], 0.2, 2028, true)];
        let chart = party_chart(&rows, MetricKey::PovertyImpact);
        assert_eq!(chart.best, Party::Labour);
        assert_eq!(
            headline(&chart, MetricKey::PovertyImpact),
            "The Labour Party would increase poverty the least"
        );
    }

    #[test]
    fn ties_resolve_to_party_order() {
        let chart = PartyChart::from_values([1.0, 1.0, 1.0], false);
        assert_eq!(chart.best, Party::Conservatives);
        let chart = PartyChart::from_values([2.0, 1.0, 1.0], true);
        assert_eq!(chart.best, Party::Labour);
    }

    #[test]
    fn empty_input_yields_zero_bars() {
        let chart = party_chart(&[], MetricKey::Taxes);
        assert!(chart.bars.iter().all(|b| b.value == 0.0));
        assert_eq!(chart.best, Party::Conservatives);
    }
}
