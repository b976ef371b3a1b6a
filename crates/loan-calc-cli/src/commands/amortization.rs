use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use loan_calc_core::amortization::{self, LoanTerms};

use crate::input;

/// Loan terms shared by the EMI and schedule commands
#[derive(Args)]
pub struct LoanTermsArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long, alias = "amount", allow_hyphen_values = true)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (10.5 = 10.5% p.a.)
    #[arg(long, alias = "annual-rate-percent", allow_hyphen_values = true)]
    pub rate: Option<Decimal>,

    /// Tenure in months
    #[arg(long, alias = "tenure-months")]
    pub tenure: Option<u32>,

    /// Due date of the first installment (YYYY-MM-DD)
    #[arg(long)]
    pub first_due_date: Option<NaiveDate>,
}

/// Arguments for the monthly installment calculation
#[derive(Args)]
pub struct EmiArgs {
    #[command(flatten)]
    pub terms: LoanTermsArgs,
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub terms: LoanTermsArgs,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = resolve_terms(args.terms)?;
    let result = amortization::calculate_emi(&terms)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = resolve_terms(args.terms)?;
    let result = amortization::calculate_schedule(&terms)?;
    Ok(serde_json::to_value(result)?)
}

fn resolve_terms(args: LoanTermsArgs) -> Result<LoanTerms, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        debug!(path = %path, "reading loan terms from file");
        return input::file::read_input(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        debug!("reading loan terms from stdin");
        return Ok(serde_json::from_value(data)?);
    }

    debug!("building loan terms from flags");
    Ok(LoanTerms {
        principal: args.principal
            .ok_or("--principal is required (or provide --input)")?,
        annual_rate_percent: args.rate
            .ok_or("--rate is required (or provide --input)")?,
        tenure_months: args.tenure
            .ok_or("--tenure is required (or provide --input)")?,
        first_due_date: args.first_due_date,
    })
}
