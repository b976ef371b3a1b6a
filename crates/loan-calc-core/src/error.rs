use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single failed constraint on a loan input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermViolation {
    pub field: String,
    pub reason: String,
}

impl TermViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for TermViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

#[derive(Debug, Error)]
pub enum LoanCalcError {
    #[error("Invalid loan terms: {}", join_violations(.violations))]
    InvalidLoanTerms { violations: Vec<TermViolation> },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LoanCalcError {
    /// Shorthand for a single-field term violation.
    pub fn invalid_term(field: impl Into<String>, reason: impl Into<String>) -> Self {
        LoanCalcError::InvalidLoanTerms {
            violations: vec![TermViolation::new(field, reason)],
        }
    }

    /// Fields rejected by term validation; empty for other error kinds.
    pub fn violated_fields(&self) -> Vec<&str> {
        match self {
            LoanCalcError::InvalidLoanTerms { violations } => {
                violations.iter().map(|v| v.field.as_str()).collect()
            }
            LoanCalcError::InvalidInput { field, .. } => vec![field.as_str()],
            _ => Vec::new(),
        }
    }
}

fn join_violations(violations: &[TermViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<serde_json::Error> for LoanCalcError {
    fn from(e: serde_json::Error) -> Self {
        LoanCalcError::SerializationError(e.to_string())
    }
}
