use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use realty_returns_core::catalog::csv_feed;
use realty_returns_core::currency::{self, RateTable};
use realty_returns_core::investment::{self, sensitivity, PropertyFinancials, ScenarioParameters};
use realty_returns_core::{amortization, Currency};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> NapiResult<String> {
    serde_json::to_string(value).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct MetricsRequest {
    financials: PropertyFinancials,
    scenario: ScenarioParameters,
}

/// `{"financials": {...}, "scenario": {...}}` -> InvestmentMetrics
#[napi]
pub fn compute_metrics(input_json: String) -> NapiResult<String> {
    let req: MetricsRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let metrics =
        investment::compute_metrics(&req.financials, &req.scenario).map_err(to_napi_error)?;
    to_json(&metrics)
}

#[napi]
pub fn analyze_investment(input_json: String) -> NapiResult<String> {
    let input: investment::InvestmentAnalysisInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = investment::analyze_investment(&input).map_err(to_napi_error)?;
    to_json(&output)
}

/// Default scenario for a property view.
#[napi]
pub fn seed_scenario(financials_json: String) -> NapiResult<String> {
    let financials: PropertyFinancials =
        serde_json::from_str(&financials_json).map_err(to_napi_error)?;
    to_json(&ScenarioParameters::seeded(&financials))
}

#[napi]
pub fn scenario_sensitivity(input_json: String) -> NapiResult<String> {
    let input: sensitivity::ScenarioSensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = sensitivity::scenario_sensitivity(&input).map_err(to_napi_error)?;
    to_json(&output)
}

// ---------------------------------------------------------------------------
// Mortgage
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ScheduleRequest {
    principal: Decimal,
    annual_interest_rate_pct: Decimal,
    loan_term_years: u32,
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let req: ScheduleRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let schedule = amortization::amortization_schedule(
        req.principal,
        req.annual_interest_rate_pct,
        req.loan_term_years,
    )
    .map_err(to_napi_error)?;
    to_json(&schedule)
}

// ---------------------------------------------------------------------------
// Display currency
// ---------------------------------------------------------------------------

/// Amount in AED (decimal string) -> `"USD 3,390"`.
#[napi]
pub fn format_amount(amount_aed: String, currency_code: String) -> NapiResult<String> {
    let amount: Decimal = amount_aed.trim().parse().map_err(to_napi_error)?;
    let currency: Currency = currency_code.parse().map_err(to_napi_error)?;
    currency::format_amount(amount, currency, &RateTable::default()).map_err(to_napi_error)
}

#[derive(Serialize)]
struct ParsedAmount {
    currency: Currency,
    amount: Decimal,
}

/// `"-AED 1,373"` -> `{"currency": "AED", "amount": "-1373"}`
#[napi]
pub fn parse_amount(display: String) -> NapiResult<String> {
    let (currency, amount) = currency::parse_amount(&display).map_err(to_napi_error)?;
    to_json(&ParsedAmount { currency, amount })
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// CSV export of the listing sheet -> array of property records.
#[napi]
pub fn parse_catalog_csv(csv_text: String) -> NapiResult<String> {
    let records = csv_feed::parse_catalog_csv(&csv_text).map_err(to_napi_error)?;
    to_json(&records)
}
