pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "schemes")]
pub mod schemes;

pub use error::{LoanCalcError, TermViolation};
pub use types::*;

/// Standard result type for all loan-calc operations
pub type LoanCalcResult<T> = Result<T, LoanCalcError>;
