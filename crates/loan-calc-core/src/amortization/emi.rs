use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::schedule::generate_schedule;
use super::terms::LoanTerms;
use crate::time_value::{level_payment, round_currency};
use crate::types::*;
use crate::LoanCalcResult;

/// Rounding the EMI and each period's interest to whole units each move the
/// balance by at most half a unit, so ordinary residue in the final
/// installment stays near one unit per period (before compounding). Drift
/// beyond `tenure * this` means rounding ate the principal repayment and the
/// last installment has turned into a balloon.
const ROUNDING_DRIFT_PER_PERIOD: Decimal = dec!(1);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmiOutput {
    /// Rounded equated monthly installment.
    pub monthly_installment: Money,
    pub monthly_rate: Rate,
    /// Sum of every installment actually paid, final adjustment included.
    pub total_payment: Money,
    pub total_interest: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Equated monthly installment for `terms`, rounded once to a whole currency
/// unit (half-up) after the closed-form amortization formula.
pub fn compute_monthly_installment(terms: &LoanTerms) -> LoanCalcResult<Money> {
    terms.validate()?;
    let raw = level_payment(terms.monthly_rate(), terms.tenure_months, terms.principal)?;
    Ok(round_currency(raw))
}

/// EMI with schedule totals, wrapped in the standard output envelope.
pub fn calculate_emi(terms: &LoanTerms) -> LoanCalcResult<ComputationOutput<EmiOutput>> {
    let start = Instant::now();
    let plan = generate_schedule(terms)?;

    let mut warnings: Vec<String> = Vec::new();
    if terms.is_interest_free() {
        warnings.push("Interest-free loan: principal is spread evenly across the tenure".into());
    }
    if plan.monthly_installment.is_zero() {
        warnings.push(
            "EMI rounds to zero; the final installment repays the entire principal".into(),
        );
    }
    if let Some(last) = plan.schedule.last() {
        let drift = (last.installment - plan.monthly_installment).abs();
        let tolerance = ROUNDING_DRIFT_PER_PERIOD * Decimal::from(terms.tenure_months);
        if drift > tolerance {
            warnings.push(format!(
                "Final installment {} differs from EMI {} by {drift}",
                last.installment, plan.monthly_installment
            ));
        }
    }

    let output = EmiOutput {
        monthly_installment: plan.monthly_installment,
        monthly_rate: plan.monthly_rate,
        total_payment: plan.total_payment,
        total_interest: plan.total_interest,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "compounding": "monthly",
        "payment_timing": "arrears",
        "rounding": "half-up to whole currency unit, applied once to the EMI",
        "annual_rate_percent": terms.annual_rate_percent.to_string(),
        "monthly_rate": (terms.monthly_rate() * dec!(100)).to_string() + "%",
    });

    Ok(with_metadata(
        "Reducing-balance EMI: P*r*(1+r)^n / ((1+r)^n - 1)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}
