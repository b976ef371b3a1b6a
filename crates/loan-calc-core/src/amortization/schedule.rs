use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::emi::compute_monthly_installment;
use super::terms::LoanTerms;
use crate::error::LoanCalcError;
use crate::time_value::round_currency;
use crate::types::*;
use crate::LoanCalcResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One installment of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPeriod {
    /// 1-based period number.
    pub index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Amount paid this period (interest + principal).
    pub installment: Money,
    pub interest_component: Money,
    pub principal_component: Money,
    /// Outstanding principal after this period's payment.
    pub remaining_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentPlan {
    pub monthly_installment: Money,
    pub monthly_rate: Rate,
    pub schedule: Vec<PaymentPeriod>,
    pub total_interest: Money,
    pub total_payment: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Full reducing-balance schedule for `terms`.
///
/// Interest is rounded per period; the last period repays whatever balance
/// is left so the schedule always closes at exactly zero.
pub fn generate_schedule(terms: &LoanTerms) -> LoanCalcResult<InstallmentPlan> {
    let emi = compute_monthly_installment(terms)?;
    let rate = terms.monthly_rate();
    let n = terms.tenure_months;

    let mut schedule = Vec::with_capacity(n as usize);
    let mut balance = terms.principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_payment = Decimal::ZERO;

    for index in 1..=n {
        let interest = round_currency(
            balance
                .checked_mul(rate)
                .ok_or_else(|| overflow(terms, "interest"))?,
        );

        let principal = if index == n {
            balance
        } else {
            // Clamp so degenerate terms never overpay or negatively amortize.
            (emi - interest).max(Decimal::ZERO).min(balance)
        };

        balance -= principal;
        let installment = interest
            .checked_add(principal)
            .ok_or_else(|| overflow(terms, "installment"))?;
        total_interest = total_interest
            .checked_add(interest)
            .ok_or_else(|| overflow(terms, "total interest"))?;
        total_payment = total_payment
            .checked_add(installment)
            .ok_or_else(|| overflow(terms, "total payment"))?;

        schedule.push(PaymentPeriod {
            index,
            due_date: due_date_for(terms.first_due_date, index)?,
            installment,
            interest_component: interest,
            principal_component: principal,
            remaining_balance: balance,
        });
    }

    Ok(InstallmentPlan {
        monthly_installment: emi,
        monthly_rate: rate,
        schedule,
        total_interest,
        total_payment,
    })
}

/// Schedule wrapped in the standard output envelope.
pub fn calculate_schedule(terms: &LoanTerms) -> LoanCalcResult<ComputationOutput<InstallmentPlan>> {
    let start = Instant::now();
    let plan = generate_schedule(terms)?;

    let mut warnings: Vec<String> = Vec::new();
    let clamped = plan
        .schedule
        .iter()
        .take(plan.schedule.len().saturating_sub(1))
        .filter(|p| p.installment != plan.monthly_installment)
        .count();
    if clamped > 0 {
        warnings.push(format!(
            "{clamped} period(s) before the last pay less than the EMI because the balance was already repaid"
        ));
    }
    if let Some(last) = plan.schedule.last() {
        if last.installment != plan.monthly_installment {
            warnings.push(format!(
                "Final installment adjusted to {} to close the balance (EMI {})",
                last.installment, plan.monthly_installment
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "principal": terms.principal.to_string(),
        "annual_rate_percent": terms.annual_rate_percent.to_string(),
        "tenure_months": terms.tenure_months,
        "interest_rounding": "per period, half-up to whole currency unit",
        "final_period": "absorbs rounding residue",
    });

    Ok(with_metadata(
        "Reducing-balance amortization schedule",
        &assumptions,
        warnings,
        elapsed,
        plan,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn overflow(terms: &LoanTerms, quantity: &str) -> LoanCalcError {
    LoanCalcError::invalid_term(
        "principal",
        format!(
            "{} at {}% over {} months overflows the decimal range ({quantity})",
            terms.principal, terms.annual_rate_percent, terms.tenure_months
        ),
    )
}

fn due_date_for(first: Option<NaiveDate>, index: u32) -> LoanCalcResult<Option<NaiveDate>> {
    let Some(first) = first else {
        return Ok(None);
    };
    first
        .checked_add_months(Months::new(index - 1))
        .map(Some)
        .ok_or_else(|| LoanCalcError::InvalidInput {
            field: "first_due_date".into(),
            reason: format!("installment {index} falls outside the supported date range"),
        })
}
