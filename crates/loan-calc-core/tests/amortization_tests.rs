use chrono::NaiveDate;
use loan_calc_core::amortization::{self, LoanTerms, MAX_TENURE_MONTHS};
use loan_calc_core::LoanCalcError;
use pretty_assertions::assert_eq;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;

fn home_loan() -> LoanTerms {
    // Five-year loan at 10.5% p.a.
    LoanTerms {
        principal: dec!(500_000),
        annual_rate_percent: dec!(10.5),
        tenure_months: 60,
        first_due_date: None,
    }
}

fn sample_terms() -> Vec<LoanTerms> {
    let mut out = Vec::new();
    for (principal, rate, months) in [
        (dec!(500_000), dec!(10.5), 60),
        (dec!(120_000), dec!(0), 12),
        (dec!(100_000), dec!(0), 7),
        (dec!(2_500_000), dec!(8.4), 240),
        (dec!(75_000.50), dec!(13.99), 18),
        (dec!(1), dec!(24), 36),
        (dec!(999_999), dec!(0.01), 360),
        (dec!(45_000), dec!(36), 1),
        // Near the decimal limit; principal plus interest still fits.
        (dec!(10_000_000_000_000_000_000_000_000_000), dec!(12), 12),
        (dec!(1_000), dec!(0), MAX_TENURE_MONTHS),
        (dec!(1_000_000), dec!(0), MAX_TENURE_MONTHS),
        (dec!(12_345.67), dec!(7.25), MAX_TENURE_MONTHS),
        (dec!(100_000), dec!(36), 360),
    ] {
        out.push(LoanTerms {
            principal,
            annual_rate_percent: rate,
            tenure_months: months,
            first_due_date: None,
        });
    }
    out
}

// ===========================================================================
// Monthly installment
// ===========================================================================

#[test]
fn test_emi_zero_rate_boundary() {
    let terms = LoanTerms::new(dec!(120_000), Decimal::ZERO, 12).unwrap();
    assert_eq!(
        amortization::compute_monthly_installment(&terms).unwrap(),
        dec!(10_000)
    );
}

#[test]
fn test_emi_standard_case_closed_form() {
    let terms = home_loan();
    let r = dec!(10.5) / dec!(1200);
    let growth = (Decimal::ONE + r).powi(60);
    let expected = (terms.principal * r * growth / (growth - Decimal::ONE))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    assert_eq!(amortization::compute_monthly_installment(&terms).unwrap(), expected);
}

#[test]
fn test_emi_is_pure() {
    let terms = home_loan();
    let first = amortization::compute_monthly_installment(&terms).unwrap();
    let second = amortization::compute_monthly_installment(&terms).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_emi_negative_principal_rejected() {
    let terms = LoanTerms {
        principal: dec!(-100),
        annual_rate_percent: dec!(5),
        tenure_months: 12,
        first_due_date: None,
    };
    let err = amortization::compute_monthly_installment(&terms).unwrap_err();
    match err {
        LoanCalcError::InvalidLoanTerms { violations } => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].field, "principal");
        }
        other => panic!("Expected InvalidLoanTerms, got {other:?}"),
    }
}

#[test]
fn test_emi_negative_rate_rejected() {
    let terms = LoanTerms {
        annual_rate_percent: dec!(-0.5),
        ..home_loan()
    };
    let err = amortization::compute_monthly_installment(&terms).unwrap_err();
    assert_eq!(err.violated_fields(), vec!["annual_rate_percent"]);
}

#[test]
fn test_emi_single_period_repays_with_one_month_interest() {
    let terms = LoanTerms::new(dec!(45_000), dec!(36), 1).unwrap();
    // 45,000 + 3% of 45,000
    assert_eq!(
        amortization::compute_monthly_installment(&terms).unwrap(),
        dec!(46_350)
    );
}

#[test]
fn test_emi_absurd_compounding_is_rejected_not_panicking() {
    let terms = LoanTerms::new(dec!(1000), dec!(100_000_000), MAX_TENURE_MONTHS).unwrap();
    let err = amortization::compute_monthly_installment(&terms).unwrap_err();
    assert!(matches!(err, LoanCalcError::InvalidLoanTerms { .. }));
}

#[test]
fn test_emi_single_period_division_overflow_is_rejected() {
    // P * (1 + r) for one month exceeds Decimal::MAX even though P * r fits.
    let terms = LoanTerms::new(Decimal::MAX, dec!(12), 1).unwrap();
    let err = amortization::compute_monthly_installment(&terms).unwrap_err();
    assert_eq!(err.violated_fields(), vec!["principal"]);
    assert!(amortization::calculate_emi(&terms).is_err());
    assert!(amortization::calculate_schedule(&terms).is_err());
}

#[test]
fn test_schedule_total_overflow_is_rejected() {
    // The EMI fits, but principal plus a year of interest does not.
    let terms = LoanTerms::new(dec!(75_000_000_000_000_000_000_000_000_000), dec!(12), 12).unwrap();
    assert!(amortization::compute_monthly_installment(&terms).is_ok());

    let err = amortization::generate_schedule(&terms).unwrap_err();
    assert_eq!(err.violated_fields(), vec!["principal"]);
    assert!(err.to_string().contains("overflows the decimal range"));
    assert!(amortization::calculate_emi(&terms).is_err());
    assert!(amortization::calculate_schedule(&terms).is_err());
}

#[test]
fn test_tenure_beyond_limit_rejected_before_allocation() {
    let terms = LoanTerms {
        principal: dec!(1_000),
        annual_rate_percent: Decimal::ZERO,
        tenure_months: u32::MAX,
        first_due_date: None,
    };
    let err = amortization::generate_schedule(&terms).unwrap_err();
    assert_eq!(err.violated_fields(), vec!["tenure_months"]);
    assert!(amortization::calculate_emi(&terms).is_err());
    assert!(amortization::calculate_schedule(&terms).is_err());
}

// ===========================================================================
// Schedule
// ===========================================================================

#[test]
fn test_schedule_length_matches_tenure() {
    for terms in sample_terms() {
        let plan = amortization::generate_schedule(&terms).unwrap();
        assert_eq!(plan.schedule.len(), terms.tenure_months as usize);
    }
}

#[test]
fn test_schedule_final_balance_is_exactly_zero() {
    for terms in sample_terms() {
        let plan = amortization::generate_schedule(&terms).unwrap();
        assert_eq!(plan.schedule.last().unwrap().remaining_balance, Decimal::ZERO);
    }
}

#[test]
fn test_schedule_principal_sums_to_loan() {
    for terms in sample_terms() {
        let plan = amortization::generate_schedule(&terms).unwrap();
        let repaid: Decimal = plan.schedule.iter().map(|p| p.principal_component).sum();
        assert_eq!(repaid, terms.principal, "leakage for {terms:?}");
    }
}

#[test]
fn test_schedule_periods_match_emi_except_last() {
    let plan = amortization::generate_schedule(&home_loan()).unwrap();
    let (last, rest) = plan.schedule.split_last().unwrap();
    for period in rest {
        assert_eq!(
            period.interest_component + period.principal_component,
            plan.monthly_installment,
            "period {}",
            period.index
        );
    }
    assert_eq!(last.installment, last.interest_component + last.principal_component);
}

#[test]
fn test_schedule_indices_are_one_based_and_sequential() {
    let plan = amortization::generate_schedule(&home_loan()).unwrap();
    let indices: Vec<u32> = plan.schedule.iter().map(|p| p.index).collect();
    assert_eq!(indices, (1..=60).collect::<Vec<u32>>());
}

#[test]
fn test_schedule_balance_is_non_increasing() {
    for terms in sample_terms() {
        let plan = amortization::generate_schedule(&terms).unwrap();
        let mut previous = terms.principal;
        for period in &plan.schedule {
            assert!(period.remaining_balance <= previous);
            assert!(period.remaining_balance >= Decimal::ZERO);
            previous = period.remaining_balance;
        }
    }
}

#[test]
fn test_schedule_interest_declines_over_time() {
    let plan = amortization::generate_schedule(&home_loan()).unwrap();
    let first = plan.schedule.first().unwrap().interest_component;
    let last = plan.schedule.last().unwrap().interest_component;
    // 500,000 * 0.00875 = 4,375
    assert_eq!(first, dec!(4375));
    assert!(last < first);
}

#[test]
fn test_schedule_totals_reconcile() {
    for terms in sample_terms() {
        let plan = amortization::generate_schedule(&terms).unwrap();
        assert_eq!(plan.total_interest + terms.principal, plan.total_payment);
        let paid: Decimal = plan.schedule.iter().map(|p| p.installment).sum();
        assert_eq!(paid, plan.total_payment);
    }
}

#[test]
fn test_schedule_due_dates_step_monthly() {
    let terms = home_loan().with_first_due_date(NaiveDate::from_ymd_opt(2025, 11, 5).unwrap());
    let plan = amortization::generate_schedule(&terms).unwrap();
    assert_eq!(
        plan.schedule[0].due_date,
        NaiveDate::from_ymd_opt(2025, 11, 5)
    );
    assert_eq!(
        plan.schedule[2].due_date,
        NaiveDate::from_ymd_opt(2026, 1, 5)
    );
    assert_eq!(
        plan.schedule[59].due_date,
        NaiveDate::from_ymd_opt(2030, 10, 5)
    );
}

#[test]
fn test_schedule_rejects_zero_tenure() {
    let terms = LoanTerms {
        tenure_months: 0,
        ..home_loan()
    };
    let err = amortization::generate_schedule(&terms).unwrap_err();
    assert!(err.to_string().contains("tenure_months must be >= 1, got 0"));
}

// ===========================================================================
// Envelopes
// ===========================================================================

#[test]
fn test_envelopes_succeed_across_sample_terms() {
    for terms in sample_terms() {
        let emi = amortization::calculate_emi(&terms).unwrap();
        let schedule = amortization::calculate_schedule(&terms).unwrap();
        assert_eq!(emi.result.total_payment, schedule.result.total_payment);
    }
}

#[test]
fn test_calculate_emi_envelope_totals() {
    let out = amortization::calculate_emi(&home_loan()).unwrap();
    assert_eq!(out.result.monthly_installment, dec!(10747));
    assert_eq!(out.result.monthly_rate, dec!(0.00875));
    assert_eq!(
        out.result.total_interest + dec!(500_000),
        out.result.total_payment
    );
    assert!(out.methodology.contains("EMI"));
}

#[test]
fn test_calculate_schedule_serializes_money_as_strings() {
    let out = amortization::calculate_schedule(&home_loan()).unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["result"]["monthly_installment"], "10747");
    assert_eq!(json["result"]["schedule"].as_array().unwrap().len(), 60);
    assert!(json["result"]["schedule"][0].get("due_date").is_none());
}
