//! Chart data transformation.
//!
//! Turns filtered, row-oriented dataset slices into the shapes the views
//! draw: per-decile series, per-party bars, the best-party pick and the
//! comparison table. Everything here is total: missing rows become zeros,
//! never errors.

pub mod decile;
pub mod household;
pub mod party;
pub mod table;

pub use decile::{DecileRow, pivot_deciles, y_bound};
pub use household::{household_chart, household_headline, household_metrics};
pub use party::{PartyBar, PartyChart, headline, party_chart};
pub use table::{ImpactRow, impact_table};

/// Round to one decimal place, ties toward positive infinity (`-0.25` gives
/// `-0.2`), never yielding `-0.0`.
pub fn round1(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0 + 0.0
}
