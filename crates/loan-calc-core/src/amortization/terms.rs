use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LoanCalcError, TermViolation};
use crate::time_value;
use crate::types::{Money, Percent, Rate};
use crate::LoanCalcResult;

/// Longest tenure accepted: 100 years of monthly installments. Keeps the
/// schedule walk and its allocation bounded.
pub const MAX_TENURE_MONTHS: u32 = 1200;

/// Inputs to a single EMI / schedule calculation.
///
/// Built fresh per request and never mutated; every calculator entry point
/// validates it before doing any arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed.
    pub principal: Money,
    /// Nominal annual rate in percent; zero means interest-free.
    pub annual_rate_percent: Percent,
    /// Number of monthly installments.
    pub tenure_months: u32,
    /// Due date of the first installment. Later installments fall on the
    /// same day of each following month.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_due_date: Option<NaiveDate>,
}

impl LoanTerms {
    /// Build and validate terms in one step.
    pub fn new(
        principal: Money,
        annual_rate_percent: Percent,
        tenure_months: u32,
    ) -> LoanCalcResult<Self> {
        let terms = Self {
            principal,
            annual_rate_percent,
            tenure_months,
            first_due_date: None,
        };
        terms.validate()?;
        Ok(terms)
    }

    pub fn with_first_due_date(mut self, date: NaiveDate) -> Self {
        self.first_due_date = Some(date);
        self
    }

    /// Check every constraint and report all failures together.
    pub fn validate(&self) -> LoanCalcResult<()> {
        let mut violations = Vec::new();

        if self.principal <= Decimal::ZERO {
            violations.push(TermViolation::new(
                "principal",
                format!("must be > 0, got {}", self.principal),
            ));
        }
        if self.annual_rate_percent < Decimal::ZERO {
            violations.push(TermViolation::new(
                "annual_rate_percent",
                format!("must be >= 0, got {}", self.annual_rate_percent),
            ));
        }
        if self.tenure_months < 1 {
            violations.push(TermViolation::new(
                "tenure_months",
                format!("must be >= 1, got {}", self.tenure_months),
            ));
        } else if self.tenure_months > MAX_TENURE_MONTHS {
            violations.push(TermViolation::new(
                "tenure_months",
                format!("must be <= {MAX_TENURE_MONTHS}, got {}", self.tenure_months),
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(LoanCalcError::InvalidLoanTerms { violations })
        }
    }

    pub fn monthly_rate(&self) -> Rate {
        time_value::monthly_rate(self.annual_rate_percent)
    }

    pub fn is_interest_free(&self) -> bool {
        self.annual_rate_percent.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_accepts_valid_terms() {
        let terms = LoanTerms::new(dec!(500000), dec!(10.5), 60).unwrap();
        assert_eq!(terms.monthly_rate(), dec!(0.00875));
        assert!(!terms.is_interest_free());
    }

    #[test]
    fn test_zero_rate_is_valid() {
        let terms = LoanTerms::new(dec!(120000), Decimal::ZERO, 12).unwrap();
        assert!(terms.is_interest_free());
    }

    #[test]
    fn test_negative_principal_rejected() {
        let err = LoanTerms::new(dec!(-100), dec!(5), 12).unwrap_err();
        assert_eq!(err.violated_fields(), vec!["principal"]);
    }

    #[test]
    fn test_zero_tenure_message() {
        let err = LoanTerms::new(dec!(1000), dec!(5), 0).unwrap_err();
        assert!(err.to_string().contains("tenure_months must be >= 1, got 0"));
    }

    #[test]
    fn test_tenure_upper_bound() {
        assert!(LoanTerms::new(dec!(1000), Decimal::ZERO, MAX_TENURE_MONTHS).is_ok());
        let err = LoanTerms::new(dec!(1000), Decimal::ZERO, MAX_TENURE_MONTHS + 1).unwrap_err();
        assert_eq!(err.violated_fields(), vec!["tenure_months"]);
        assert!(err.to_string().contains("must be <= 1200, got 1201"));
    }

    #[test]
    fn test_all_violations_reported() {
        let terms = LoanTerms {
            principal: Decimal::ZERO,
            annual_rate_percent: dec!(-1),
            tenure_months: 0,
            first_due_date: None,
        };
        let err = terms.validate().unwrap_err();
        assert_eq!(
            err.violated_fields(),
            vec!["principal", "annual_rate_percent", "tenure_months"]
        );
    }

    #[test]
    fn test_deserialize_without_due_date() {
        let json = r#"{"principal":"500000","annual_rate_percent":"10.5","tenure_months":60}"#;
        let terms: LoanTerms = serde_json::from_str(json).unwrap();
        assert_eq!(terms.principal, dec!(500000));
        assert_eq!(terms.first_due_date, None);
    }
}
