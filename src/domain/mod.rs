//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - the canonical party table (`Party`) and supported years
//! - dataset rows (`ManifestoImpact`, `DecileImpact`)
//! - the typed metric table (`MetricKey`, `MetricOption`, `METRICS`)
//! - household calculator inputs/outputs (`HouseholdSituation`, `HouseholdResult`)

pub mod household;
pub mod types;

pub use household::*;
pub use types::*;
