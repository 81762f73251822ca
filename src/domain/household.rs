//! Household calculator inputs and outputs.
//!
//! `HouseholdSituation` mirrors the calculator form: toggles such as
//! `has_partner` keep the hidden sub-form values around so switching them
//! back on restores what was typed. The wire request is built from it in
//! `data::household`.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::Party;

/// Maximum number of children the form accepts.
pub const MAX_CHILDREN: usize = 10;
/// Oldest age accepted for a child.
pub const MAX_CHILD_AGE: u32 = 18;
/// Oldest age accepted for an adult.
pub const MAX_ADULT_AGE: u32 = 100;

/// Metric selected when household results first arrive.
pub const DEFAULT_HOUSEHOLD_METRIC: &str = "Net change";

/// Main source of income of an adult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum IncomeSource {
    None,
    Employment,
    #[serde(rename = "Self-employment")]
    SelfEmployment,
    Pension,
}

impl IncomeSource {
    pub const ALL: [IncomeSource; 4] = [
        IncomeSource::None,
        IncomeSource::Employment,
        IncomeSource::SelfEmployment,
        IncomeSource::Pension,
    ];

    pub fn label(self) -> &'static str {
        match self {
            IncomeSource::None => "None",
            IncomeSource::Employment => "Employment",
            IncomeSource::SelfEmployment => "Self-employment",
            IncomeSource::Pension => "Pension",
        }
    }

    pub fn has_income(self) -> bool {
        self != IncomeSource::None
    }

    pub fn next(self) -> IncomeSource {
        let pos = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> IncomeSource {
        let pos = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(pos + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// An adult in the household.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub age: u32,
    pub income_source: IncomeSource,
    /// Annual income (GBP).
    pub income: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub age: u32,
    pub attends_private_school: bool,
}

impl Default for Child {
    fn default() -> Self {
        Self {
            age: 10,
            attends_private_school: false,
        }
    }
}

/// Everything the household form collects.
#[derive(Debug, Clone, PartialEq)]
pub struct HouseholdSituation {
    pub you: Person,
    pub has_capital_gains: bool,
    pub capital_gains: f64,
    pub has_partner: bool,
    pub partner: Person,
    pub has_children: bool,
    pub children: Vec<Child>,
    pub buying_first_home: bool,
    pub property_value: f64,
    pub is_renter: bool,
    pub is_private_renter: bool,
    /// Annual rent (GBP).
    pub rent: f64,
}

impl Default for HouseholdSituation {
    fn default() -> Self {
        Self {
            you: Person {
                age: 30,
                income_source: IncomeSource::Employment,
                income: 20_000.0,
            },
            has_capital_gains: false,
            capital_gains: 0.0,
            has_partner: false,
            partner: Person {
                age: 30,
                income_source: IncomeSource::None,
                income: 20_000.0,
            },
            has_children: false,
            children: vec![Child::default()],
            buying_first_home: false,
            property_value: 200_000.0,
            is_renter: false,
            is_private_renter: false,
            rent: 20_000.0,
        }
    }
}

impl HouseholdSituation {
    /// Resize the children list, keeping existing entries and filling new
    /// slots with the default child. Clamped to `0..=MAX_CHILDREN`.
    pub fn set_child_count(&mut self, count: usize) {
        let count = count.min(MAX_CHILDREN);
        self.children.resize(count, Child::default());
    }

    pub fn set_age(&mut self, age: u32) {
        self.you.age = age.min(MAX_ADULT_AGE);
    }

    pub fn set_partner_age(&mut self, age: u32) {
        self.partner.age = age.min(MAX_ADULT_AGE);
    }

    /// Set one child's age; out-of-range indices are ignored.
    pub fn set_child_age(&mut self, index: usize, age: u32) {
        if let Some(child) = self.children.get_mut(index) {
            child.age = age.min(MAX_CHILD_AGE);
        }
    }
}

/// Money inputs never go below zero.
pub fn clamp_amount(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// One `(metric, value, party)` triple returned by the household service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdResult {
    pub metric: String,
    /// Annual change in GBP (positive = better off).
    pub value: f64,
    pub party: Party,
}
