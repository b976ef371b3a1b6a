//! Equated monthly installment (EMI) and reducing-balance amortization.
//!
//! All figures are `Decimal`; the EMI is rounded once to a whole currency
//! unit and per-period interest is rounded as the schedule is walked, with
//! the final period absorbing any residue.

pub mod emi;
pub mod schedule;
pub mod terms;

pub use emi::{calculate_emi, compute_monthly_installment, EmiOutput};
pub use schedule::{calculate_schedule, generate_schedule, InstallmentPlan, PaymentPeriod};
pub use terms::{LoanTerms, MAX_TENURE_MONTHS};
