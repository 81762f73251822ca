//! Decile line-chart data.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::domain::{DecileImpact, Party};

/// Number of income deciles.
pub const DECILE_COUNT: u8 = 10;

/// Headroom added above the largest absolute value on the y axis.
const Y_HEADROOM: f64 = 1.1;

/// One x position of the decile chart: every party's value at one decile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecileRow {
    pub decile: u8,
    /// Indexed by `Party::index()`.
    pub values: [f64; Party::COUNT],
}

impl DecileRow {
    pub fn value(&self, party: Party) -> f64 {
        self.values[party.index()]
    }
}

// `{"decile": 1, "Conservatives": -2.12, "Labour Party": 2.2, ...}`
impl Serialize for DecileRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + Party::COUNT))?;
        map.serialize_entry("decile", &self.decile)?;
        for party in Party::ALL {
            map.serialize_entry(party.label(), &self.value(party))?;
        }
        map.end()
    }
}

/// Pivot decile rows into exactly ten records (deciles 1..=10), one value per
/// party. Combinations absent from `rows` are 0; the first matching row wins.
pub fn pivot_deciles(rows: &[DecileImpact]) -> Vec<DecileRow> {
    (1..=DECILE_COUNT)
        .map(|decile| {
            let mut values = [0.0; Party::COUNT];
            for party in Party::ALL {
                if let Some(r) = rows.iter().find(|r| r.decile == decile && r.reform == party) {
                    values[party.index()] = r.relative_income_change;
                }
            }
            DecileRow { decile, values }
        })
        .collect()
}

/// Symmetric y-axis bound: the larger magnitude side of the data (zero
/// included), plus 10% headroom, rounded up to a whole percent.
pub fn y_bound(rows: &[DecileImpact]) -> f64 {
    let (lo, hi) = rows
        .iter()
        .map(|r| r.relative_income_change)
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let abs_max = lo.abs().max(hi.abs());
    (abs_max * Y_HEADROOM).ceil()
}

/// `(decile, value)` points for one party's line.
pub fn line_series(pivot: &[DecileRow], party: Party) -> Vec<(f64, f64)> {
    pivot
        .iter()
        .map(|row| (f64::from(row.decile), row.value(party)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::fixtures::{decile, sample_decile};
    use crate::filter::filter_decile_data;

    #[test]
    fn pivot_always_has_ten_rows() {
        let pivot = pivot_deciles(&[]);
        assert_eq!(pivot.len(), 10);
        assert_eq!(pivot[0].decile, 1);
        assert_eq!(pivot[9].decile, 10);
        assert!(pivot.iter().all(|r| r.values == [0.0; Party::COUNT]));
    }

    #[test]
    fn pivot_fills_missing_combinations_with_zero() {
        let rows = filter_decile_data(&sample_decile(), 2025, true);
        let pivot = pivot_deciles(&rows);
        assert_eq!(pivot.len(), 10);
        assert_eq!(pivot[0].value(Party::Conservatives), -2.12);
        assert_eq!(pivot[0].value(Party::Labour), 2.2);
        assert_eq!(pivot[0].value(Party::LiberalDemocrats), 0.0);
        assert_eq!(pivot[4].value(Party::Labour), 0.0);
    }

    #[test]
    fn pivot_ignores_out_of_range_deciles() {
        let rows = vec![decile(Party::Labour, 11, 9.0, 2025, true), decile(Party::Labour, 0, 9.0, 2025, true)];
        let pivot = pivot_deciles(&rows);
        assert!(pivot.iter().all(|r| r.value(Party::Labour) == 0.0));
    }

    #[test]
    fn y_bound_uses_larger_side_with_headroom() {
        let rows = filter_decile_data(&sample_decile(), 2025, true);
        // max(|-2.12|, |2.2|) = 2.2 -> 2.42 -> 3
        assert_eq!(y_bound(&rows), 3.0);

        let negative_only = vec![decile(Party::Conservatives, 3, -4.5, 2025, true)];
        assert_eq!(y_bound(&negative_only), 5.0);
    }

    #[test]
    fn y_bound_is_zero_for_empty_or_flat_input() {
        assert_eq!(y_bound(&[]), 0.0);
        let flat = vec![decile(Party::Labour, 1, 0.0, 2026, true)];
        assert_eq!(y_bound(&flat), 0.0);
    }

    #[test]
    fn serialized_row_is_keyed_by_party_label() {
        let row = DecileRow {
            decile: 2,
            values: [1.0, -0.5, 0.0],
        };
        let json = serde_json::to_value(row).unwrap();
        assert_eq!(json["decile"], 2);
        assert_eq!(json["Labour Party"], -0.5);
        assert_eq!(line_series(&[row], Party::Conservatives), vec![(2.0, 1.0)]);
    }
}
