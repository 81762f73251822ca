//! `manifesto-compare` library crate.
//!
//! The binary (`manifestos`) is a thin wrapper around this library so that:
//!
//! - the filter and chart transformations are testable without a terminal
//! - the same view logic backs the CLI reports, the TUI and the JSON export

pub mod app;
pub mod chart;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod filter;
pub mod io;
pub mod report;
pub mod tui;
