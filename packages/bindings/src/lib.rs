use chrono::{Local, NaiveDate};
use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use mortgage_core::amortization::{self, MortgageInput};
use mortgage_core::portfolio::{self, PortfolioInput};
use mortgage_core::{share, Mortgage, MortgageType};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ---------------------------------------------------------------------------
// Single mortgage
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PaymentInput {
    principal: Decimal,
    rate: Decimal,
    years: Decimal,
    #[serde(default, rename = "type")]
    mortgage_type: MortgageType,
}

#[napi]
pub fn calculate_monthly_payment(input_json: String) -> NapiResult<String> {
    let input: PaymentInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let payment = mortgage_core::calculate_monthly_payment(
        input.principal,
        input.rate,
        input.years,
        input.mortgage_type,
    );
    serde_json::to_string(&payment).map_err(to_napi_error)
}

#[napi]
pub fn calculate_mortgage_details(input_json: String) -> NapiResult<String> {
    let input: MortgageInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage_core::calculate_mortgage_details(&input.mortgage, input.include_schedule);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_mortgage(input_json: String) -> NapiResult<String> {
    let input: MortgageInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::analyze_mortgage(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_payoff(input_json: String) -> NapiResult<String> {
    let mortgage: Mortgage = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let monthly_payment = mortgage_core::calculate_monthly_payment(
        mortgage.amount,
        mortgage.interest_rate,
        mortgage.term,
        mortgage.mortgage_type,
    );
    let output = mortgage_core::calculate_payoff(&mortgage, monthly_payment);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn balance_projection(input_json: String) -> NapiResult<String> {
    let mortgage: Mortgage = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::balance_projection(&mortgage);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Portfolio
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_portfolio(input_json: String) -> NapiResult<String> {
    let input: PortfolioInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = portfolio::analyze_portfolio(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn unified_timeline(input_json: String) -> NapiResult<String> {
    let input: PortfolioInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = portfolio::unified_timeline(&input.mortgages);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Share state
// ---------------------------------------------------------------------------

#[napi]
pub fn encode_share_state(input_json: String) -> NapiResult<String> {
    let input: PortfolioInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    share::encode_share_state(&input.mortgages, &Local).map_err(to_napi_error)
}

#[napi]
pub fn decode_share_state(encoded: String) -> NapiResult<String> {
    let mortgages = share::decode_share_state(&share::share_param(&encoded), today(), &Local)
        .map_err(to_napi_error)?;
    serde_json::to_string(&mortgages).map_err(to_napi_error)
}

#[napi]
pub fn restore_portfolio(encoded: Option<String>) -> NapiResult<String> {
    let restored = share::restore_portfolio(encoded.as_deref(), today(), &Local);
    serde_json::to_string(&restored).map_err(to_napi_error)
}

#[napi]
pub fn default_mortgage(number: u32) -> NapiResult<String> {
    let mortgage = share::default_mortgage(number as usize, today());
    serde_json::to_string(&mortgage).map_err(to_napi_error)
}
