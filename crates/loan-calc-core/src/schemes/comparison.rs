use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{generate_schedule, LoanTerms};
use crate::{LoanCalcError, LoanCalcResult, types::*};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// A loan product offered through the portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanScheme {
    pub name: String,
    pub annual_rate_percent: Percent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tenure_months: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeComparisonInput {
    pub principal: Money,
    pub tenure_months: u32,
    pub schemes: Vec<LoanScheme>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeQuote {
    pub name: String,
    pub annual_rate_percent: Percent,
    pub eligible: bool,
    /// Why the requested amount or tenure falls outside the scheme.
    pub ineligibility_reasons: Vec<String>,
    pub monthly_installment: Option<Money>,
    pub total_interest: Option<Money>,
    pub total_payment: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeComparisonOutput {
    pub quotes: Vec<SchemeQuote>,
    /// Eligible scheme with the lowest total repayment.
    pub best_scheme: Option<String>,
    pub eligible_count: usize,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Quote every scheme for the same principal and tenure and rank the
/// eligible ones by total repayment.
pub fn compare_schemes(
    input: &SchemeComparisonInput,
) -> LoanCalcResult<ComputationOutput<SchemeComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let mut quotes = Vec::with_capacity(input.schemes.len());
    for scheme in &input.schemes {
        let reasons = eligibility_reasons(scheme, input.principal, input.tenure_months);
        if !reasons.is_empty() {
            warnings.push(format!("{} is not available: {}", scheme.name, reasons.join("; ")));
            quotes.push(SchemeQuote {
                name: scheme.name.clone(),
                annual_rate_percent: scheme.annual_rate_percent,
                eligible: false,
                ineligibility_reasons: reasons,
                monthly_installment: None,
                total_interest: None,
                total_payment: None,
            });
            continue;
        }

        let terms = LoanTerms {
            principal: input.principal,
            annual_rate_percent: scheme.annual_rate_percent,
            tenure_months: input.tenure_months,
            first_due_date: None,
        };
        let plan = generate_schedule(&terms)?;
        quotes.push(SchemeQuote {
            name: scheme.name.clone(),
            annual_rate_percent: scheme.annual_rate_percent,
            eligible: true,
            ineligibility_reasons: Vec::new(),
            monthly_installment: Some(plan.monthly_installment),
            total_interest: Some(plan.total_interest),
            total_payment: Some(plan.total_payment),
        });
    }

    // min_by_key keeps the first of equal minima, so ties go to listing order.
    let best_scheme = quotes
        .iter()
        .filter_map(|q| q.total_payment.map(|total| (q, total)))
        .min_by_key(|(_, total)| *total)
        .map(|(q, _)| q.name.clone());

    let eligible_count = quotes.iter().filter(|q| q.eligible).count();
    if eligible_count == 0 {
        warnings.push("No scheme accepts the requested amount and tenure".into());
    }

    let output = SchemeComparisonOutput {
        quotes,
        best_scheme,
        eligible_count,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "principal": input.principal.to_string(),
        "tenure_months": input.tenure_months,
        "ranking": "lowest total repayment among eligible schemes",
    });

    Ok(with_metadata(
        "Scheme comparison on reducing-balance EMI",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &SchemeComparisonInput) -> LoanCalcResult<()> {
    // Principal and tenure must be valid regardless of scheme; the rate used
    // here is a placeholder that always passes.
    LoanTerms {
        principal: input.principal,
        annual_rate_percent: Decimal::ZERO,
        tenure_months: input.tenure_months,
        first_due_date: None,
    }
    .validate()?;

    if input.schemes.is_empty() {
        return Err(LoanCalcError::InsufficientData(
            "At least one scheme must be provided.".into(),
        ));
    }

    for (i, scheme) in input.schemes.iter().enumerate() {
        if scheme.annual_rate_percent < Decimal::ZERO {
            return Err(LoanCalcError::InvalidInput {
                field: format!("schemes[{i}].annual_rate_percent"),
                reason: format!("must be >= 0, got {}", scheme.annual_rate_percent),
            });
        }
        if let (Some(min), Some(max)) = (scheme.min_amount, scheme.max_amount) {
            if min > max {
                return Err(LoanCalcError::InvalidInput {
                    field: format!("schemes[{i}].min_amount"),
                    reason: format!("min_amount {min} exceeds max_amount {max}"),
                });
            }
        }
    }

    Ok(())
}

fn eligibility_reasons(scheme: &LoanScheme, principal: Money, tenure_months: u32) -> Vec<String> {
    let mut reasons = Vec::new();
    if let Some(min) = scheme.min_amount {
        if principal < min {
            reasons.push(format!("amount {principal} is below the minimum {min}"));
        }
    }
    if let Some(max) = scheme.max_amount {
        if principal > max {
            reasons.push(format!("amount {principal} exceeds the maximum {max}"));
        }
    }
    if let Some(max_tenure) = scheme.max_tenure_months {
        if tenure_months > max_tenure {
            reasons.push(format!(
                "tenure {tenure_months} months exceeds the maximum {max_tenure}"
            ));
        }
    }
    reasons
}
