//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - deserialized straight from the static impact datasets
//! - filtered and pivoted in-memory for the views
//! - exported to JSON alongside the transformed view

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Years covered by the impact datasets.
pub const YEARS: [i32; 4] = [2025, 2026, 2027, 2028];

/// Year selected when nothing else is requested.
pub const DEFAULT_YEAR: i32 = 2028;

/// A party whose manifesto is compared.
///
/// This is the only party table in the crate. The datasets use the long
/// label ("Labour Party") while the household service answers with the short
/// one ("Labour"); both deserialize to the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Party {
    Conservatives,
    #[serde(rename = "Labour Party", alias = "Labour")]
    Labour,
    #[serde(rename = "Liberal Democrats")]
    LiberalDemocrats,
}

impl Party {
    /// All parties, in display order.
    pub const ALL: [Party; 3] = [Party::Conservatives, Party::Labour, Party::LiberalDemocrats];

    /// Number of parties (length of per-party arrays).
    pub const COUNT: usize = Self::ALL.len();

    /// Position in `Party::ALL`.
    pub fn index(self) -> usize {
        match self {
            Party::Conservatives => 0,
            Party::Labour => 1,
            Party::LiberalDemocrats => 2,
        }
    }

    /// Label used by the impact datasets and the societal views.
    pub fn label(self) -> &'static str {
        match self {
            Party::Conservatives => "Conservatives",
            Party::Labour => "Labour Party",
            Party::LiberalDemocrats => "Liberal Democrats",
        }
    }

    /// Label used by the household calculator.
    pub fn short_label(self) -> &'static str {
        match self {
            Party::Conservatives => "Conservatives",
            Party::Labour => "Labour",
            Party::LiberalDemocrats => "Liberal Democrats",
        }
    }

    /// Resolve either label form.
    pub fn from_label(label: &str) -> Option<Party> {
        let label = label.trim();
        Party::ALL
            .into_iter()
            .find(|p| p.label() == label || p.short_label() == label)
    }

    /// Party colour as RGB.
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            Party::Conservatives => (0x00, 0x87, 0xDC),
            Party::Labour => (0xE4, 0x00, 0x3B),
            Party::LiberalDemocrats => (0xFA, 0xA6, 0x1A),
        }
    }
}

impl std::fmt::Display for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Rows that belong to one `(year, includesIndirectImpacts)` scenario.
pub trait Scoped {
    fn year(&self) -> i32;
    fn includes_indirect_impacts(&self) -> bool;
}

/// Aggregate impact of one manifesto for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestoImpact {
    pub manifesto: Party,
    /// Budgetary cost (currency units; negative reduces the deficit).
    pub cost: f64,
    pub benefits: f64,
    pub taxes: f64,
    /// Percentage-point deltas.
    pub poverty_impact: f64,
    pub child_poverty_impact: f64,
    pub adult_poverty_impact: f64,
    pub senior_poverty_impact: f64,
    pub gini_index_impact: f64,
    pub year: i32,
    pub includes_indirect_impacts: bool,
}

impl Scoped for ManifestoImpact {
    fn year(&self) -> i32 {
        self.year
    }

    fn includes_indirect_impacts(&self) -> bool {
        self.includes_indirect_impacts
    }
}

/// Relative income change of one income decile under one manifesto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecileImpact {
    pub reform: Party,
    /// Income decile, 1 (poorest) to 10.
    pub decile: u8,
    /// Percent of prior household disposable income.
    pub relative_income_change: f64,
    pub year: i32,
    pub includes_indirect_impacts: bool,
}

impl Scoped for DecileImpact {
    fn year(&self) -> i32 {
        self.year
    }

    fn includes_indirect_impacts(&self) -> bool {
        self.includes_indirect_impacts
    }
}

/// Display unit of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricUnit {
    /// Currency, shown in billions.
    #[serde(rename = "bn")]
    Billions,
    /// Percentage points.
    #[serde(rename = "pct")]
    Percent,
}

/// Which numeric field of `ManifestoImpact` a view reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    Cost,
    Benefits,
    Taxes,
    PovertyImpact,
    ChildPovertyImpact,
    AdultPovertyImpact,
    SeniorPovertyImpact,
    GiniIndexImpact,
}

impl MetricKey {
    pub const ALL: [MetricKey; 8] = [
        MetricKey::Cost,
        MetricKey::Benefits,
        MetricKey::Taxes,
        MetricKey::PovertyImpact,
        MetricKey::ChildPovertyImpact,
        MetricKey::AdultPovertyImpact,
        MetricKey::SeniorPovertyImpact,
        MetricKey::GiniIndexImpact,
    ];

    /// Read this metric from a row.
    pub fn value(self, row: &ManifestoImpact) -> f64 {
        match self {
            MetricKey::Cost => row.cost,
            MetricKey::Benefits => row.benefits,
            MetricKey::Taxes => row.taxes,
            MetricKey::PovertyImpact => row.poverty_impact,
            MetricKey::ChildPovertyImpact => row.child_poverty_impact,
            MetricKey::AdultPovertyImpact => row.adult_poverty_impact,
            MetricKey::SeniorPovertyImpact => row.senior_poverty_impact,
            MetricKey::GiniIndexImpact => row.gini_index_impact,
        }
    }

    /// Dataset field name.
    pub fn key(self) -> &'static str {
        match self {
            MetricKey::Cost => "cost",
            MetricKey::Benefits => "benefits",
            MetricKey::Taxes => "taxes",
            MetricKey::PovertyImpact => "povertyImpact",
            MetricKey::ChildPovertyImpact => "childPovertyImpact",
            MetricKey::AdultPovertyImpact => "adultPovertyImpact",
            MetricKey::SeniorPovertyImpact => "seniorPovertyImpact",
            MetricKey::GiniIndexImpact => "giniIndexImpact",
        }
    }

    pub fn from_key(key: &str) -> Option<MetricKey> {
        MetricKey::ALL.into_iter().find(|m| m.key() == key)
    }

    pub fn is_poverty(self) -> bool {
        matches!(
            self,
            MetricKey::PovertyImpact
                | MetricKey::ChildPovertyImpact
                | MetricKey::AdultPovertyImpact
                | MetricKey::SeniorPovertyImpact
        )
    }

    /// Whether the smallest charted value marks the best party.
    ///
    /// Poverty, inequality, taxes and (sign-inverted) cost are "lower wins";
    /// everything else is "higher wins".
    pub fn lower_is_better(self) -> bool {
        self.is_poverty()
            || matches!(self, MetricKey::GiniIndexImpact | MetricKey::Taxes | MetricKey::Cost)
    }

    /// Static descriptor of this metric.
    pub fn option(self) -> &'static MetricOption {
        // `METRICS` is ordered like `MetricKey::ALL`.
        &METRICS[self.position()]
    }

    pub fn label(self) -> &'static str {
        self.option().label
    }

    pub fn unit(self) -> MetricUnit {
        self.option().unit
    }

    /// Next metric in `METRICS` order (wrapping).
    pub fn next(self) -> MetricKey {
        MetricKey::ALL[(self.position() + 1) % MetricKey::ALL.len()]
    }

    /// Previous metric in `METRICS` order (wrapping).
    pub fn prev(self) -> MetricKey {
        let n = MetricKey::ALL.len();
        MetricKey::ALL[(self.position() + n - 1) % n]
    }

    fn position(self) -> usize {
        match self {
            MetricKey::Cost => 0,
            MetricKey::Benefits => 1,
            MetricKey::Taxes => 2,
            MetricKey::PovertyImpact => 3,
            MetricKey::ChildPovertyImpact => 4,
            MetricKey::AdultPovertyImpact => 5,
            MetricKey::SeniorPovertyImpact => 6,
            MetricKey::GiniIndexImpact => 7,
        }
    }
}

/// Display descriptor for a metric (static configuration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricOption {
    pub key: MetricKey,
    pub label: &'static str,
    pub unit: MetricUnit,
}

pub static METRICS: [MetricOption; 8] = [
    MetricOption { key: MetricKey::Cost, label: "Cost", unit: MetricUnit::Billions },
    MetricOption { key: MetricKey::Benefits, label: "Benefits", unit: MetricUnit::Billions },
    MetricOption { key: MetricKey::Taxes, label: "Taxes", unit: MetricUnit::Billions },
    MetricOption { key: MetricKey::PovertyImpact, label: "Poverty", unit: MetricUnit::Percent },
    MetricOption {
        key: MetricKey::ChildPovertyImpact,
        label: "Child poverty",
        unit: MetricUnit::Percent,
    },
    MetricOption {
        key: MetricKey::AdultPovertyImpact,
        label: "Adult poverty",
        unit: MetricUnit::Percent,
    },
    MetricOption {
        key: MetricKey::SeniorPovertyImpact,
        label: "Senior poverty",
        unit: MetricUnit::Percent,
    },
    MetricOption { key: MetricKey::GiniIndexImpact, label: "Gini index", unit: MetricUnit::Percent },
];

/// The selection shared by every view: which scenario and which metric.
///
/// This is derived from CLI flags (plus defaults) and mutated by the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    pub year: i32,
    pub include_indirect: bool,
    pub metric: MetricKey,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            year: DEFAULT_YEAR,
            include_indirect: true,
            metric: MetricKey::Cost,
        }
    }
}

impl ViewConfig {
    /// Step to the next supported year (wrapping).
    pub fn next_year(&mut self) {
        let pos = YEARS.iter().position(|&y| y == self.year).unwrap_or(YEARS.len() - 1);
        self.year = YEARS[(pos + 1) % YEARS.len()];
    }

    /// Step to the previous supported year (wrapping).
    pub fn prev_year(&mut self) {
        let pos = YEARS.iter().position(|&y| y == self.year).unwrap_or(0);
        self.year = YEARS[(pos + YEARS.len() - 1) % YEARS.len()];
    }
}
