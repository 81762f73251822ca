//! Client for the external household calculator service.
//!
//! The service is a black box: we POST the household description and get
//! back a flat list of `(metric, value, party)` triples. An unset base URL
//! is a normal configuration state; the client then refuses to call out and
//! reports an actionable message instead.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Child, HouseholdResult, HouseholdSituation, IncomeSource, Party};

const API_ENV: &str = "HOUSEHOLD_API_URL";

#[derive(Debug, Error)]
pub enum HouseholdError {
    #[error("Household impact calculations require a backend API. Set HOUSEHOLD_API_URL to enable.")]
    NotConfigured,
    #[error("A household calculation is already in progress.")]
    Busy,
    /// Transport failure, non-success status or malformed body. `detail` is
    /// for logs; users only see the generic message.
    #[error("Failed to calculate household impacts. Please try again.")]
    Request { detail: String },
}

/// JSON body of `POST {base}/household`.
///
/// Fields for parts of the form that are switched off are sent as `null`
/// (or zero / empty for the always-present ones).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdRequest {
    pub year: i32,
    pub include_indirect: bool,
    pub age: u32,
    pub income_source: IncomeSource,
    pub income: f64,
    pub has_capital_gains: bool,
    pub capital_gains: f64,
    pub has_partner: bool,
    pub partner_age: Option<u32>,
    pub partner_income_source: Option<IncomeSource>,
    pub partner_income: Option<f64>,
    pub has_children: bool,
    pub children: Vec<Child>,
    pub buying_first_home: bool,
    pub property_value: Option<f64>,
    pub is_renter: bool,
    pub is_private_renter: Option<bool>,
    pub rent: Option<f64>,
}

impl HouseholdRequest {
    pub fn from_situation(s: &HouseholdSituation, year: i32, include_indirect: bool) -> Self {
        let partner = s.has_partner.then_some(&s.partner);
        Self {
            year,
            include_indirect,
            age: s.you.age,
            income_source: s.you.income_source,
            income: if s.you.income_source.has_income() { s.you.income } else { 0.0 },
            has_capital_gains: s.has_capital_gains,
            capital_gains: if s.has_capital_gains { s.capital_gains } else { 0.0 },
            has_partner: s.has_partner,
            partner_age: partner.map(|p| p.age),
            partner_income_source: partner.map(|p| p.income_source),
            partner_income: partner
                .filter(|p| p.income_source.has_income())
                .map(|p| p.income),
            has_children: s.has_children,
            children: if s.has_children { s.children.clone() } else { Vec::new() },
            buying_first_home: s.buying_first_home,
            property_value: s.buying_first_home.then_some(s.property_value),
            is_renter: s.is_renter,
            is_private_renter: s.is_renter.then_some(s.is_private_renter),
            rent: s.is_renter.then_some(s.rent),
        }
    }
}

pub struct HouseholdClient {
    base_url: Option<String>,
    client: Client,
    in_flight: AtomicBool,
}

impl HouseholdClient {
    /// Read `HOUSEHOLD_API_URL` (after loading `.env`). Unset or empty means
    /// "not configured", not an error.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base_url = std::env::var(API_ENV).ok();
        if base_url.as_deref().is_none_or(|u| u.trim().is_empty()) {
            info!("{API_ENV} not set; household calculator disabled");
        }
        Self::new(base_url)
    }

    pub fn new(base_url: Option<String>) -> Self {
        let base_url = base_url
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty());
        Self {
            base_url,
            client: Client::new(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submit a household for calculation.
    ///
    /// Only one submission per client may be in flight; overlapping calls
    /// are rejected with `HouseholdError::Busy`.
    pub fn calculate(
        &self,
        situation: &HouseholdSituation,
        year: i32,
        include_indirect: bool,
    ) -> Result<Vec<HouseholdResult>, HouseholdError> {
        let Some(base_url) = &self.base_url else {
            return Err(HouseholdError::NotConfigured);
        };
        let _guard = self.begin()?;

        let url = format!("{base_url}/household");
        let body = HouseholdRequest::from_situation(situation, year, include_indirect);
        debug!("POST {url} (year={year}, indirect={include_indirect})");

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| request_failed(format!("household request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(request_failed(format!(
                "household request failed with status {}",
                resp.status()
            )));
        }

        let body = resp
            .bytes()
            .map_err(|e| request_failed(format!("failed to read household response: {e}")))?;
        let results = parse_results(&body)
            .map_err(|e| request_failed(format!("failed to parse household response: {e}")))?;
        info!("household calculation returned {} results", results.len());
        Ok(results)
    }

    fn begin(&self) -> Result<InFlight<'_>, HouseholdError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| HouseholdError::Busy)?;
        Ok(InFlight(&self.in_flight))
    }
}

/// Clears the in-flight flag when the submission finishes, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One row as the service sends it; the party is resolved afterwards.
#[derive(Debug, Deserialize)]
struct WireResult {
    metric: String,
    value: f64,
    party: String,
}

/// Decode the service response. Rows naming a party we do not chart are
/// dropped rather than failing the whole response.
pub fn parse_results(bytes: &[u8]) -> Result<Vec<HouseholdResult>, serde_json::Error> {
    let rows: Vec<WireResult> = serde_json::from_slice(bytes)?;
    Ok(rows
        .into_iter()
        .filter_map(|row| match Party::from_label(&row.party) {
            Some(party) => Some(HouseholdResult {
                metric: row.metric,
                value: row.value,
                party,
            }),
            None => {
                debug!("dropping household result for unknown party '{}'", row.party);
                None
            }
        })
        .collect())
}

fn request_failed(detail: String) -> HouseholdError {
    warn!("{detail}");
    HouseholdError::Request { detail }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_client_reports_actionable_message() {
        let client = HouseholdClient::new(Some("   ".to_string()));
        assert!(!client.is_configured());
        let err = client
            .calculate(&HouseholdSituation::default(), 2028, true)
            .unwrap_err();
        assert!(matches!(err, HouseholdError::NotConfigured));
        assert!(err.to_string().contains("HOUSEHOLD_API_URL"));
    }

    #[test]
    fn overlapping_submission_is_rejected() {
        let client = HouseholdClient::new(Some("http://127.0.0.1:9".to_string()));
        let guard = client.begin().unwrap();
        assert!(client.is_busy());
        let err = client
            .calculate(&HouseholdSituation::default(), 2028, true)
            .unwrap_err();
        assert!(matches!(err, HouseholdError::Busy));

        drop(guard);
        assert!(!client.is_busy());
    }

    #[test]
    fn unknown_parties_are_dropped_from_results() {
        let body = br#"[
            {"metric": "Net change", "value": 310.5, "party": "Conservatives"},
            {"metric": "Net change", "value": 99.0, "party": "Green Party"},
            {"metric": "Net change", "value": -12.0, "party": "Labour"}
        ]"#;
        let results = parse_results(body).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].party, Party::Conservatives);
        assert_eq!(results[1].party, Party::Labour);
        assert_eq!(results[1].value, -12.0);
    }

    #[test]
    fn malformed_results_are_an_error() {
        assert!(parse_results(b"{\"results\": []}").is_err());
        assert!(parse_results(br#"[{"metric": "Net change", "party": "Labour"}]"#).is_err());
    }

    #[test]
    fn request_nulls_disabled_sections() {
        let body = HouseholdRequest::from_situation(&HouseholdSituation::default(), 2026, false);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["year"], 2026);
        assert_eq!(json["includeIndirect"], false);
        assert_eq!(json["incomeSource"], "Employment");
        assert_eq!(json["income"], 20000.0);
        assert_eq!(json["capitalGains"], 0.0);
        assert!(json["partnerAge"].is_null());
        assert!(json["partnerIncomeSource"].is_null());
        assert!(json["partnerIncome"].is_null());
        assert_eq!(json["children"], serde_json::json!([]));
        assert!(json["propertyValue"].is_null());
        assert!(json["isPrivateRenter"].is_null());
        assert!(json["rent"].is_null());
    }

    #[test]
    fn request_carries_enabled_sections() {
        let mut s = HouseholdSituation::default();
        s.you.income_source = IncomeSource::None;
        s.has_partner = true;
        s.partner.income_source = IncomeSource::None;
        s.has_children = true;
        s.children[0].attends_private_school = true;
        s.is_renter = true;
        s.is_private_renter = true;
        s.buying_first_home = true;

        let json = serde_json::to_value(HouseholdRequest::from_situation(&s, 2028, true)).unwrap();
        assert_eq!(json["income"], 0.0);
        assert_eq!(json["partnerAge"], 30);
        assert_eq!(json["partnerIncomeSource"], "None");
        assert!(json["partnerIncome"].is_null());
        assert_eq!(json["children"][0]["attendsPrivateSchool"], true);
        assert_eq!(json["propertyValue"], 200000.0);
        assert_eq!(json["isPrivateRenter"], true);
        assert_eq!(json["rent"], 20000.0);
    }
}
