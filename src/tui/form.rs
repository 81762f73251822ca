//! Household form editing for the TUI.
//!
//! The form is a flat list of fields; which fields are visible depends on the
//! toggles (no partner → no partner fields, and so on). Every edit goes
//! through the `HouseholdSituation` helpers so the form limits always hold.

use crate::domain::{HouseholdSituation, MAX_CHILDREN, clamp_amount};
use crate::report::format::format_gbp;

const INCOME_STEP: f64 = 1_000.0;
const PROPERTY_STEP: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Age,
    IncomeSource,
    Income,
    HasCapitalGains,
    CapitalGains,
    HasPartner,
    PartnerAge,
    PartnerIncomeSource,
    PartnerIncome,
    Children,
    ChildAge(usize),
    ChildPrivateSchool(usize),
    BuyingFirstHome,
    PropertyValue,
    IsRenter,
    IsPrivateRenter,
    Rent,
}

/// Fields shown for the current form state, top to bottom.
pub fn visible_fields(s: &HouseholdSituation) -> Vec<Field> {
    let mut out = vec![Field::Age, Field::IncomeSource];
    if s.you.income_source.has_income() {
        out.push(Field::Income);
    }
    out.push(Field::HasCapitalGains);
    if s.has_capital_gains {
        out.push(Field::CapitalGains);
    }
    out.push(Field::HasPartner);
    if s.has_partner {
        out.extend([Field::PartnerAge, Field::PartnerIncomeSource]);
        if s.partner.income_source.has_income() {
            out.push(Field::PartnerIncome);
        }
    }
    out.push(Field::Children);
    if s.has_children {
        for i in 0..s.children.len() {
            out.extend([Field::ChildAge(i), Field::ChildPrivateSchool(i)]);
        }
    }
    out.push(Field::BuyingFirstHome);
    if s.buying_first_home {
        out.push(Field::PropertyValue);
    }
    out.push(Field::IsRenter);
    if s.is_renter {
        out.extend([Field::IsPrivateRenter, Field::Rent]);
    }
    out
}

pub fn child_count(s: &HouseholdSituation) -> usize {
    if s.has_children { s.children.len() } else { 0 }
}

/// Step a field left (`delta < 0`) or right. Toggles flip either way.
pub fn adjust(s: &mut HouseholdSituation, field: Field, delta: i32) {
    let up = delta >= 0;
    match field {
        Field::Age => s.set_age(step_u32(s.you.age, up)),
        Field::IncomeSource => {
            s.you.income_source = if up { s.you.income_source.next() } else { s.you.income_source.prev() };
        }
        Field::Income => s.you.income = step_amount(s.you.income, INCOME_STEP, up),
        Field::HasCapitalGains => s.has_capital_gains = !s.has_capital_gains,
        Field::CapitalGains => s.capital_gains = step_amount(s.capital_gains, INCOME_STEP, up),
        Field::HasPartner => s.has_partner = !s.has_partner,
        Field::PartnerAge => s.set_partner_age(step_u32(s.partner.age, up)),
        Field::PartnerIncomeSource => {
            s.partner.income_source = if up {
                s.partner.income_source.next()
            } else {
                s.partner.income_source.prev()
            };
        }
        Field::PartnerIncome => s.partner.income = step_amount(s.partner.income, INCOME_STEP, up),
        Field::Children => {
            let count = child_count(s);
            let next = if up { (count + 1).min(MAX_CHILDREN) } else { count.saturating_sub(1) };
            if next == 0 {
                s.has_children = false;
            } else {
                s.has_children = true;
                s.set_child_count(next);
            }
        }
        Field::ChildAge(i) => {
            if let Some(age) = s.children.get(i).map(|c| c.age) {
                s.set_child_age(i, step_u32(age, up));
            }
        }
        Field::ChildPrivateSchool(i) => {
            if let Some(child) = s.children.get_mut(i) {
                child.attends_private_school = !child.attends_private_school;
            }
        }
        Field::BuyingFirstHome => s.buying_first_home = !s.buying_first_home,
        Field::PropertyValue => s.property_value = step_amount(s.property_value, PROPERTY_STEP, up),
        Field::IsRenter => s.is_renter = !s.is_renter,
        Field::IsPrivateRenter => s.is_private_renter = !s.is_private_renter,
        Field::Rent => s.rent = step_amount(s.rent, INCOME_STEP, up),
    }
}

/// `Label: value` text for one form row.
pub fn field_text(s: &HouseholdSituation, field: Field) -> String {
    match field {
        Field::Age => format!("Your age: {}", s.you.age),
        Field::IncomeSource => format!("Income source: {}", s.you.income_source.label()),
        Field::Income => format!("Annual income: {}", pounds(s.you.income)),
        Field::HasCapitalGains => format!("Capital gains: {}", yes_no(s.has_capital_gains)),
        Field::CapitalGains => format!("  Annual capital gains: {}", pounds(s.capital_gains)),
        Field::HasPartner => format!("Partner: {}", yes_no(s.has_partner)),
        Field::PartnerAge => format!("  Partner age: {}", s.partner.age),
        Field::PartnerIncomeSource => format!("  Partner income source: {}", s.partner.income_source.label()),
        Field::PartnerIncome => format!("  Partner income: {}", pounds(s.partner.income)),
        Field::Children => format!("Children: {}", child_count(s)),
        Field::ChildAge(i) => format!("  Child {} age: {}", i + 1, s.children.get(i).map_or(0, |c| c.age)),
        Field::ChildPrivateSchool(i) => format!(
            "  Child {} private school: {}",
            i + 1,
            yes_no(s.children.get(i).is_some_and(|c| c.attends_private_school))
        ),
        Field::BuyingFirstHome => format!("Buying first home: {}", yes_no(s.buying_first_home)),
        Field::PropertyValue => format!("  Property value: {}", pounds(s.property_value)),
        Field::IsRenter => format!("Renting: {}", yes_no(s.is_renter)),
        Field::IsPrivateRenter => format!("  Private landlord: {}", yes_no(s.is_private_renter)),
        Field::Rent => format!("  Annual rent: {}", pounds(s.rent)),
    }
}

fn step_u32(v: u32, up: bool) -> u32 {
    if up { v.saturating_add(1) } else { v.saturating_sub(1) }
}

fn step_amount(v: f64, step: f64, up: bool) -> f64 {
    clamp_amount(if up { v + step } else { v - step })
}

// Amounts are never negative, so drop the sign `format_gbp` adds.
fn pounds(v: f64) -> String {
    format_gbp(v).trim_start_matches('+').to_string()
}

fn yes_no(v: bool) -> &'static str {
    if v { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IncomeSource, MAX_ADULT_AGE, MAX_CHILD_AGE};

    #[test]
    fn default_form_hides_optional_sections() {
        let fields = visible_fields(&HouseholdSituation::default());
        assert_eq!(
            fields,
            vec![
                Field::Age,
                Field::IncomeSource,
                Field::Income,
                Field::HasCapitalGains,
                Field::HasPartner,
                Field::Children,
                Field::BuyingFirstHome,
                Field::IsRenter,
            ]
        );
    }

    #[test]
    fn toggles_reveal_their_fields() {
        let mut s = HouseholdSituation::default();
        adjust(&mut s, Field::HasPartner, 1);
        adjust(&mut s, Field::Children, 1);
        adjust(&mut s, Field::IsRenter, -1);
        let fields = visible_fields(&s);
        assert!(fields.contains(&Field::PartnerAge));
        // Partner template has no income source, so no income field.
        assert!(!fields.contains(&Field::PartnerIncome));
        assert!(fields.contains(&Field::ChildAge(0)));
        assert!(fields.contains(&Field::Rent));
        assert!(!fields.contains(&Field::PropertyValue));
    }

    #[test]
    fn children_count_is_clamped_and_uses_template() {
        let mut s = HouseholdSituation::default();
        adjust(&mut s, Field::Children, -1);
        assert_eq!(child_count(&s), 0);

        for _ in 0..(MAX_CHILDREN + 3) {
            adjust(&mut s, Field::Children, 1);
        }
        assert_eq!(child_count(&s), MAX_CHILDREN);
        assert!(s.children.iter().all(|c| c.age == 10));

        for _ in 0..MAX_CHILDREN {
            adjust(&mut s, Field::Children, -1);
        }
        assert_eq!(child_count(&s), 0);
        assert!(!s.has_children);
    }

    #[test]
    fn ages_and_amounts_respect_limits() {
        let mut s = HouseholdSituation::default();
        s.set_age(MAX_ADULT_AGE);
        adjust(&mut s, Field::Age, 1);
        assert_eq!(s.you.age, MAX_ADULT_AGE);

        s.has_children = true;
        s.set_child_age(0, MAX_CHILD_AGE);
        adjust(&mut s, Field::ChildAge(0), 1);
        assert_eq!(s.children[0].age, MAX_CHILD_AGE);

        s.you.income = 500.0;
        adjust(&mut s, Field::Income, -1);
        assert_eq!(s.you.income, 0.0);

        adjust(&mut s, Field::IncomeSource, -1);
        assert_eq!(s.you.income_source, IncomeSource::None);
        assert!(!visible_fields(&s).contains(&Field::Income));
    }

    #[test]
    fn field_text_formats_pounds() {
        let s = HouseholdSituation::default();
        assert_eq!(field_text(&s, Field::Income), "Annual income: £20,000");
        assert_eq!(field_text(&s, Field::Children), "Children: 0");
        assert_eq!(field_text(&s, Field::HasPartner), "Partner: no");
    }
}
