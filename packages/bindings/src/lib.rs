use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use polpi_core::real_estate::amortization::{self, ScheduleRow};
use polpi_core::real_estate::assumptions::MAX_LOAN_TERM_YEARS;
use polpi_core::real_estate::investment::{self, InvestmentInput};
use polpi_core::real_estate::projection::{self, AmortizationPoint};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Loan terms for the schedule endpoint.
#[derive(Deserialize)]
struct LoanTerms {
    loan_amount: Decimal,
    annual_interest_rate: Decimal,
    loan_term_years: u32,
}

// ---------------------------------------------------------------------------
// Listing calculator
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_investment(input_json: String) -> NapiResult<String> {
    let input = InvestmentInput::from_json(&input_json).map_err(to_napi_error)?;
    let output = investment::analyze_investment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn investment_metrics(input_json: String) -> NapiResult<String> {
    let input = InvestmentInput::from_json(&input_json).map_err(to_napi_error)?;
    let metrics = investment::compute_investment_metrics(&input.assumptions());
    serde_json::to_string(&metrics).map_err(to_napi_error)
}

#[napi]
pub fn equity_curve(input_json: String) -> NapiResult<String> {
    let input = InvestmentInput::from_json(&input_json).map_err(to_napi_error)?;
    input.validate().map_err(to_napi_error)?;
    let curve = projection::project_equity_curve(
        &input.assumptions(),
        input.horizon_years(),
        input.sample_interval_months(),
    );
    let points: Vec<AmortizationPoint> = curve.iter().collect();
    serde_json::to_string(&points).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Mortgage
// ---------------------------------------------------------------------------

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    if !(1..=MAX_LOAN_TERM_YEARS).contains(&terms.loan_term_years) {
        return Err(to_napi_error(format!(
            "Invalid input: loan_term_years: Loan term must be between 1 and {MAX_LOAN_TERM_YEARS} years"
        )));
    }
    let schedule: Vec<ScheduleRow> = amortization::amortization_schedule(
        terms.loan_amount,
        terms.annual_interest_rate,
        terms.loan_term_years,
    );
    serde_json::to_string(&schedule).map_err(to_napi_error)
}
