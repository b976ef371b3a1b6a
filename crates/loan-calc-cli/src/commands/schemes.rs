use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use loan_calc_core::schemes::{self, LoanScheme, SchemeComparisonInput};

use crate::input;

/// Arguments for comparing loan schemes
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CompareSchemesArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long, alias = "amount")]
    pub principal: Option<Decimal>,

    /// Tenure in months
    #[arg(long, alias = "tenure-months")]
    pub tenure: Option<u32>,

    /// Scheme as NAME=RATE, repeatable (e.g. --scheme "Home Saver=8.5")
    #[arg(long = "scheme", value_parser = parse_scheme)]
    pub schemes: Vec<LoanScheme>,
}

pub fn run_compare_schemes(args: CompareSchemesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let comparison: SchemeComparisonInput = if let Some(ref path) = args.input {
        debug!(path = %path, "reading scheme comparison from file");
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        debug!("reading scheme comparison from stdin");
        serde_json::from_value(data)?
    } else {
        SchemeComparisonInput {
            principal: args.principal
                .ok_or("--principal is required (or provide --input)")?,
            tenure_months: args.tenure
                .ok_or("--tenure is required (or provide --input)")?,
            schemes: args.schemes,
        }
    };

    debug!(schemes = comparison.schemes.len(), "comparing schemes");
    let result = schemes::compare_schemes(&comparison)?;
    Ok(serde_json::to_value(result)?)
}

fn parse_scheme(raw: &str) -> Result<LoanScheme, String> {
    let (name, rate) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=RATE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("scheme name is empty in '{raw}'"));
    }
    let annual_rate_percent: Decimal = rate
        .trim()
        .parse()
        .map_err(|e| format!("invalid rate '{rate}': {e}"))?;
    Ok(LoanScheme {
        name: name.to_string(),
        annual_rate_percent,
        min_amount: None,
        max_amount: None,
        max_tenure_months: None,
    })
}
