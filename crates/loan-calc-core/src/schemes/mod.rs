pub mod comparison;

pub use comparison::{compare_schemes, LoanScheme, SchemeComparisonInput, SchemeComparisonOutput, SchemeQuote};
