//! Scenario filtering.
//!
//! Both datasets hold every `(year, includesIndirectImpacts)` scenario side by
//! side. Views only ever look at one scenario, selected here.

use crate::domain::{DecileImpact, ManifestoImpact, Scoped};

/// Rows of `rows` that belong to the given scenario, in input order.
pub fn filter_scoped<T: Scoped + Clone>(rows: &[T], year: i32, include_indirect: bool) -> Vec<T> {
    rows.iter()
        .filter(|r| r.year() == year && r.includes_indirect_impacts() == include_indirect)
        .cloned()
        .collect()
}

pub fn filter_manifesto_data(
    rows: &[ManifestoImpact],
    year: i32,
    include_indirect: bool,
) -> Vec<ManifestoImpact> {
    filter_scoped(rows, year, include_indirect)
}

pub fn filter_decile_data(rows: &[DecileImpact], year: i32, include_indirect: bool) -> Vec<DecileImpact> {
    filter_scoped(rows, year, include_indirect)
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::domain::Party;
    use crate::report::format::format_bn;

    #[test]
    fn filters_by_year_and_indirect_flag() {
        let data = sample_manifesto();
        let result = filter_manifesto_data(&data, 2025, true);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].manifesto, Party::Conservatives);
        assert_eq!(result[1].manifesto, Party::Labour);
        assert_eq!(format_bn(result[0].cost), "-1.9bn");
        assert_eq!(format_bn(result[1].cost), "+3.3bn");
    }

    #[test]
    fn filters_direct_impacts_only() {
        let result = filter_manifesto_data(&sample_manifesto(), 2025, false);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].manifesto, Party::Conservatives);
        assert_eq!(result[0].cost, -7053853830.1);
    }

    #[test]
    fn non_matching_year_is_empty() {
        assert!(filter_manifesto_data(&sample_manifesto(), 2028, true).is_empty());
        assert!(filter_decile_data(&[], 2025, true).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let once = filter_decile_data(&sample_decile(), 2025, true);
        let twice = filter_decile_data(&once, 2025, true);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn decile_direct_impacts() {
        let result = filter_decile_data(&sample_decile(), 2025, false);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].reform, Party::Conservatives);
    }
}
