//! Command-line parsing for the manifesto comparison dashboard.
//!
//! Parsing and validation live here; `app` does the dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::DataSource;
use crate::domain::{
    DEFAULT_HOUSEHOLD_METRIC, DEFAULT_YEAR, HouseholdSituation, IncomeSource, MetricKey, ViewConfig, YEARS,
    clamp_amount,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "manifestos",
    version,
    about = "Compare the modelled impacts of UK party manifestos"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the party comparison table for one scenario.
    Table(ViewArgs),
    /// Print the relative income change by decile.
    Deciles(ViewArgs),
    /// Print the bar chart and best party for one metric.
    Metric(ViewArgs),
    /// Calculate the impact on a single household (needs HOUSEHOLD_API_URL).
    Household(HouseholdArgs),
    /// Write the full transformed view to a JSON file.
    Export(ExportArgs),
    /// Launch the interactive TUI.
    Tui(ViewArgs),
}

/// Scenario selection shared by every view.
#[derive(Debug, Args, Clone)]
pub struct ViewArgs {
    /// Year of the scenario (2025-2028).
    #[arg(short = 'y', long, default_value_t = DEFAULT_YEAR, value_parser = parse_year)]
    pub year: i32,

    /// Exclude indirect (behavioural) impacts.
    #[arg(long)]
    pub direct_only: bool,

    /// Metric for the bar chart.
    #[arg(short = 'm', long, value_enum, default_value_t = MetricKey::Cost)]
    pub metric: MetricKey,

    /// Dataset directory or web origin (overrides MANIFESTO_DATA).
    #[arg(long, value_name = "DIR|URL")]
    pub data: Option<String>,
}

impl ViewArgs {
    pub fn view_config(&self) -> ViewConfig {
        ViewConfig {
            year: self.year,
            include_indirect: !self.direct_only,
            metric: self.metric,
        }
    }

    pub fn data_source(&self) -> DataSource {
        match &self.data {
            Some(raw) => DataSource::parse(raw),
            None => DataSource::from_env(),
        }
    }
}

/// Household form, as flags.
#[derive(Debug, Args, Clone)]
pub struct HouseholdArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Your age.
    #[arg(long, default_value_t = 30)]
    pub age: u32,

    /// Your main source of income.
    #[arg(long, value_enum, default_value_t = IncomeSource::Employment)]
    pub income_source: IncomeSource,

    /// Your annual income (GBP).
    #[arg(long, default_value_t = 20_000.0)]
    pub income: f64,

    /// Annual capital gains (GBP); omit for none.
    #[arg(long)]
    pub capital_gains: Option<f64>,

    /// Partner's age; omit for no partner.
    #[arg(long)]
    pub partner_age: Option<u32>,

    /// Partner's main source of income.
    #[arg(long, value_enum, default_value_t = IncomeSource::None)]
    pub partner_income_source: IncomeSource,

    /// Partner's annual income (GBP).
    #[arg(long, default_value_t = 20_000.0)]
    pub partner_income: f64,

    /// Age of each child (repeat the flag per child).
    #[arg(long = "child-age", value_name = "AGE")]
    pub child_ages: Vec<u32>,

    /// Number of children at private school (counted from the first child).
    #[arg(long, default_value_t = 0)]
    pub private_school: usize,

    /// Value of a first home you are buying (GBP).
    #[arg(long)]
    pub first_home: Option<f64>,

    /// Annual rent (GBP); omit if you do not rent.
    #[arg(long)]
    pub rent: Option<f64>,

    /// Rent from a private landlord (with --rent).
    #[arg(long)]
    pub private_renter: bool,

    /// Household metric to chart.
    #[arg(long, default_value = DEFAULT_HOUSEHOLD_METRIC)]
    pub show: String,
}

impl HouseholdArgs {
    /// Build the form state the flags describe, applying the form limits.
    pub fn situation(&self) -> HouseholdSituation {
        let mut s = HouseholdSituation::default();
        s.set_age(self.age);
        s.you.income_source = self.income_source;
        s.you.income = clamp_amount(self.income);

        if let Some(gains) = self.capital_gains {
            s.has_capital_gains = true;
            s.capital_gains = clamp_amount(gains);
        }

        if let Some(age) = self.partner_age {
            s.has_partner = true;
            s.set_partner_age(age);
            s.partner.income_source = self.partner_income_source;
            s.partner.income = clamp_amount(self.partner_income);
        }

        if !self.child_ages.is_empty() {
            s.has_children = true;
            s.set_child_count(self.child_ages.len());
            for (i, &age) in self.child_ages.iter().enumerate() {
                s.set_child_age(i, age);
            }
            for child in s.children.iter_mut().take(self.private_school) {
                child.attends_private_school = true;
            }
        }

        if let Some(value) = self.first_home {
            s.buying_first_home = true;
            s.property_value = clamp_amount(value);
        }

        if let Some(rent) = self.rent {
            s.is_renter = true;
            s.is_private_renter = self.private_renter;
            s.rent = clamp_amount(rent);
        }

        s
    }
}

/// Options for `export`.
#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Output JSON path.
    #[arg(short = 'o', long, value_name = "JSON")]
    pub out: PathBuf,
}

fn parse_year(raw: &str) -> Result<i32, String> {
    let year: i32 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a year"))?;
    if YEARS.contains(&year) {
        Ok(year)
    } else {
        let supported: Vec<String> = YEARS.iter().map(i32::to_string).collect();
        Err(format!("unsupported year {year} (expected one of {})", supported.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_must_be_supported() {
        assert_eq!(parse_year("2026"), Ok(2026));
        assert!(parse_year("2024").unwrap_err().contains("2025, 2026, 2027, 2028"));
        assert!(parse_year("soon").is_err());
    }

    #[test]
    fn view_flags_map_to_config() {
        let cli = Cli::parse_from([
            "manifestos",
            "metric",
            "--year",
            "2025",
            "--direct-only",
            "-m",
            "child-poverty-impact",
        ]);
        let Command::Metric(args) = cli.command else {
            panic!("expected metric subcommand");
        };
        assert_eq!(
            args.view_config(),
            ViewConfig {
                year: 2025,
                include_indirect: false,
                metric: MetricKey::ChildPovertyImpact,
            }
        );
    }

    #[test]
    fn data_flag_overrides_environment() {
        let cli = Cli::parse_from(["manifestos", "table", "--data", "https://example.org"]);
        let Command::Table(args) = cli.command else {
            panic!("expected table subcommand");
        };
        assert_eq!(
            args.data_source(),
            DataSource::Http {
                origin: "https://example.org".to_string()
            }
        );
    }

    #[test]
    fn household_flags_build_situation() {
        let cli = Cli::parse_from([
            "manifestos",
            "household",
            "--age",
            "120",
            "--partner-age",
            "41",
            "--child-age",
            "4",
            "--child-age",
            "25",
            "--private-school",
            "1",
            "--rent=-50",
            "--private-renter",
        ]);
        let Command::Household(args) = cli.command else {
            panic!("expected household subcommand");
        };
        let s = args.situation();
        assert_eq!(s.you.age, 100);
        assert!(s.has_partner);
        assert_eq!(s.partner.age, 41);
        assert_eq!(s.children.len(), 2);
        assert_eq!(s.children[1].age, 18);
        assert!(s.children[0].attends_private_school);
        assert!(!s.children[1].attends_private_school);
        assert!(s.is_renter && s.is_private_renter);
        assert_eq!(s.rent, 0.0);
        assert!(!s.buying_first_home);
        assert_eq!(args.show, "Net change");
    }
}
