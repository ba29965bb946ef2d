//! Property-based tests for the amortization engine.
//!
//! Invariants verified:
//! - the monthly payment is never negative, and exactly zero without a loan
//!   or without interest
//! - the remaining balance never increases as payments are made, hits zero
//!   exactly at the end of the term and stays there
//! - equity is always value minus balance

use polpi_core::real_estate::amortization::{compute_monthly_payment, remaining_balance};
use polpi_core::real_estate::assumptions::LoanAssumptions;
use polpi_core::real_estate::projection::project_equity_curve;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Loan amounts in whole pesos [1, 50 000 000].
fn loan_strat() -> impl Strategy<Value = Decimal> {
    (1u64..=50_000_000u64).prop_map(Decimal::from)
}

/// Annual rates [0.1%, 30%] in tenths of a percent.
fn rate_strat() -> impl Strategy<Value = Decimal> {
    (1u32..=300u32).prop_map(|tenths| Decimal::from(tenths) / dec!(1000))
}

fn term_strat() -> impl Strategy<Value = u32> {
    1u32..=30u32
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn payment_is_non_negative(loan in loan_strat(), rate in rate_strat(), term in term_strat()) {
        let pmt = compute_monthly_payment(loan, rate, term);
        prop_assert!(pmt > Decimal::ZERO);
        // At least the interest, at most the whole loan in one go plus interest
        prop_assert!(pmt >= loan * rate / dec!(12));
        prop_assert!(pmt <= loan * (Decimal::ONE + rate / dec!(12)));
    }

    #[test]
    fn payment_is_zero_without_financing(loan in loan_strat(), rate in rate_strat(), term in term_strat()) {
        prop_assert_eq!(compute_monthly_payment(Decimal::ZERO, rate, term), Decimal::ZERO);
        prop_assert_eq!(compute_monthly_payment(loan, Decimal::ZERO, term), Decimal::ZERO);
    }

    #[test]
    fn balance_is_monotone_and_closes_at_zero(
        loan in loan_strat(),
        rate in rate_strat(),
        term in term_strat(),
    ) {
        let monthly_rate = rate / dec!(12);
        let total = term * 12;
        let pmt = compute_monthly_payment(loan, rate, term);

        let mut previous = loan;
        for made in 0..=total + 12 {
            let balance = remaining_balance(loan, monthly_rate, pmt, total, made);
            prop_assert!(balance >= Decimal::ZERO);
            prop_assert!(balance <= previous, "balance rose at payment {}: {} > {}", made, balance, previous);
            if made >= total {
                prop_assert_eq!(balance, Decimal::ZERO);
            }
            previous = balance;
        }
    }

    #[test]
    fn equity_is_value_minus_balance(
        price in (100_000u64..=20_000_000u64).prop_map(Decimal::from),
        down_pct in (0u32..=100u32).prop_map(|p| Decimal::from(p) / dec!(100)),
        rate in rate_strat(),
        term in term_strat(),
        appreciation in (-20i32..=20i32).prop_map(|p| Decimal::from(p) / dec!(100)),
    ) {
        let assumptions = LoanAssumptions {
            property_price: price,
            down_payment_pct: down_pct,
            annual_interest_rate: rate,
            loan_term_years: term,
            monthly_rent: dec!(15000),
            annual_appreciation_rate: appreciation,
        };
        let curve = project_equity_curve(&assumptions, 10, 6);
        prop_assert_eq!(curve.iter().count(), 21);
        for p in &curve {
            prop_assert!(p.loan_balance >= Decimal::ZERO);
            prop_assert_eq!(p.equity, p.property_value - p.loan_balance);
        }
    }
}
