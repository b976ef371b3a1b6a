use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Serialize;

use loan_calc_core::amortization::{self, LoanTerms};
use loan_calc_core::schemes::{self, SchemeComparisonInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[derive(Serialize)]
struct InstallmentOnly {
    monthly_installment: Decimal,
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

/// Rounded EMI only, for screens that just display the installment.
#[napi]
pub fn monthly_installment(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let emi = amortization::compute_monthly_installment(&terms).map_err(to_napi_error)?;
    serde_json::to_string(&InstallmentOnly {
        monthly_installment: emi,
    })
    .map_err(to_napi_error)
}

#[napi]
pub fn emi_summary(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::calculate_emi(&terms).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::calculate_schedule(&terms).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Schemes
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_schemes(input_json: String) -> NapiResult<String> {
    let input: SchemeComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = schemes::compare_schemes(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
