//! Reporting utilities: metric formatting and plain-text terminal output.

pub mod format;
pub mod tables;

pub use format::*;
pub use tables::*;
