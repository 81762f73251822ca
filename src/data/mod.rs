//! Data access: the static impact datasets and the household calculator.
//!
//! - `loader`: dataset source resolution + load-once session cache
//! - `household`: POST client for the external household service

pub mod household;
pub mod loader;

pub use household::{HouseholdClient, HouseholdError, HouseholdRequest};
pub use loader::{DataSource, DatasetCache, LoadError, LoadState};
