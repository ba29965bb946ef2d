use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::time_value::discount_factor;
use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One month of a fixed-payment amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Payment number, starting at 1
    pub month: u32,
    /// Total payment made this month
    pub payment: Money,
    /// Portion of the payment that reduces principal
    pub principal: Money,
    /// Portion of the payment that is interest on the opening balance
    pub interest: Money,
    /// Outstanding principal after the payment, never negative
    pub balance: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Fixed monthly payment of a fully amortizing loan.
///
/// `P * r(1+r)^n / ((1+r)^n - 1)` with `r = annual_rate / 12` and
/// `n = term_years * 12`, evaluated as `P * r / (1 - (1+r)^-n)` so that long
/// terms cannot overflow. Returns exactly zero when there is nothing to
/// finance or no interest to pay (loan, rate, or term at or below zero).
pub fn compute_monthly_payment(
    loan_amount: Money,
    annual_interest_rate: Rate,
    term_years: u32,
) -> Money {
    let monthly_rate = annual_interest_rate / dec!(12);
    let total_months = term_years.saturating_mul(12);

    if loan_amount <= Decimal::ZERO || monthly_rate <= Decimal::ZERO || total_months == 0 {
        return Decimal::ZERO;
    }

    let denominator = Decimal::ONE - discount_factor(monthly_rate, total_months);

    loan_amount
        .saturating_mul(monthly_rate)
        .checked_div(denominator)
        .unwrap_or(Decimal::ZERO)
}

/// Outstanding principal after `payments_made` fixed payments.
///
/// Present value of the payments still owed:
/// `pmt * ((1+r)^k - 1) / (r * (1+r)^k)` with `k = total_payments - payments_made`.
/// A loan with no payments left owes nothing; a loan with no payments made
/// or no interest rate still owes the original amount.
pub fn remaining_balance(
    loan_amount: Money,
    monthly_rate: Rate,
    payment: Money,
    total_payments: u32,
    payments_made: u32,
) -> Money {
    if payments_made >= total_payments {
        return Decimal::ZERO;
    }
    if payments_made == 0 || monthly_rate <= Decimal::ZERO {
        return loan_amount;
    }

    let remaining = total_payments - payments_made;
    let annuity = (Decimal::ONE - discount_factor(monthly_rate, remaining)) / monthly_rate;

    payment.saturating_mul(annuity).max(Decimal::ZERO)
}

/// Month-by-month amortization schedule.
///
/// Interest accrues on the opening balance and the rest of the payment goes
/// to principal. The schedule stops as soon as the balance is exhausted and
/// the last payment absorbs any rounding residue so the loan closes at zero.
/// Empty when no payment is due (nothing financed or a zero rate).
pub fn amortization_schedule(
    loan_amount: Money,
    annual_interest_rate: Rate,
    term_years: u32,
) -> Vec<ScheduleRow> {
    let payment = compute_monthly_payment(loan_amount, annual_interest_rate, term_years);
    if payment.is_zero() {
        return Vec::new();
    }

    let monthly_rate = annual_interest_rate / dec!(12);
    let total_months = term_years.saturating_mul(12);

    let mut schedule = Vec::with_capacity(total_months as usize);
    let mut balance = loan_amount;

    for month in 1..=total_months {
        let interest = balance * monthly_rate;
        let mut principal = payment - interest;
        balance -= principal;

        if month == total_months || balance <= Decimal::ZERO {
            // Close out the loan on the final row
            principal += balance;
            balance = Decimal::ZERO;
        }

        schedule.push(ScheduleRow {
            month,
            payment: principal + interest,
            principal,
            interest,
            balance,
        });

        if balance.is_zero() {
            break;
        }
    }

    schedule
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_payment_listing_default() {
        // 2.4M at 12% over 20 years, ~26,426/mo
        let payment = compute_monthly_payment(dec!(2400000), dec!(0.12), 20);
        assert!(
            (payment - dec!(26426)).abs() < dec!(5),
            "Monthly payment {payment} outside expected range"
        );
    }

    #[test]
    fn test_monthly_payment_sanity() {
        // $750k at 6.5% over 30 years, expected ~$4,740/mo
        let payment = compute_monthly_payment(dec!(750000), dec!(0.065), 30);
        assert!(
            payment > dec!(4700) && payment < dec!(4800),
            "Monthly payment {} outside expected range",
            payment
        );
    }

    #[test]
    fn test_zero_rate_has_no_payment() {
        assert_eq!(
            compute_monthly_payment(dec!(360000), Decimal::ZERO, 30),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_zero_loan_has_no_payment() {
        assert_eq!(
            compute_monthly_payment(Decimal::ZERO, dec!(0.12), 20),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_zero_term_has_no_payment() {
        assert_eq!(
            compute_monthly_payment(dec!(100000), dec!(0.12), 0),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_extreme_term_tends_to_interest_only() {
        // (1+r)^n overflows; payment converges to P * r
        let payment = compute_monthly_payment(dec!(1000000), dec!(0.99), 1000);
        assert_eq!(payment, dec!(1000000) * dec!(0.99) / dec!(12));
    }

    #[test]
    fn test_balance_before_any_payment_is_principal() {
        let pmt = compute_monthly_payment(dec!(2400000), dec!(0.12), 20);
        assert_eq!(
            remaining_balance(dec!(2400000), dec!(0.01), pmt, 240, 0),
            dec!(2400000)
        );
    }

    #[test]
    fn test_balance_zero_when_paid_off() {
        let pmt = compute_monthly_payment(dec!(2400000), dec!(0.12), 20);
        assert_eq!(
            remaining_balance(dec!(2400000), dec!(0.01), pmt, 240, 240),
            Decimal::ZERO
        );
        assert_eq!(
            remaining_balance(dec!(2400000), dec!(0.01), pmt, 240, 300),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_balance_zero_rate_is_principal() {
        assert_eq!(
            remaining_balance(dec!(500000), Decimal::ZERO, Decimal::ZERO, 240, 60),
            dec!(500000)
        );
    }

    #[test]
    fn test_balance_after_one_payment() {
        // After one payment: P(1+r) - pmt
        let pmt = compute_monthly_payment(dec!(2400000), dec!(0.12), 20);
        let balance = remaining_balance(dec!(2400000), dec!(0.01), pmt, 240, 1);
        let expected = dec!(2400000) * dec!(1.01) - pmt;
        assert!(
            (balance - expected).abs() < dec!(0.0001),
            "balance {balance}, expected {expected}"
        );
    }

    #[test]
    fn test_balance_matches_schedule() {
        let schedule = amortization_schedule(dec!(2400000), dec!(0.12), 20);
        let pmt = compute_monthly_payment(dec!(2400000), dec!(0.12), 20);
        let closed_form = remaining_balance(dec!(2400000), dec!(0.01), pmt, 240, 60);
        let iterated = schedule[59].balance;
        assert!(
            (closed_form - iterated).abs() < dec!(0.01),
            "closed form {closed_form} vs schedule {iterated}"
        );
    }

    #[test]
    fn test_schedule_length_and_closeout() {
        let schedule = amortization_schedule(dec!(360000), dec!(0.065), 30);
        assert_eq!(schedule.len(), 360);
        let last = schedule.last().unwrap();
        assert_eq!(last.month, 360);
        assert_eq!(last.balance, Decimal::ZERO);
    }

    #[test]
    fn test_schedule_principal_sums_to_loan() {
        let schedule = amortization_schedule(dec!(1000000), dec!(0.10), 10);
        let total_principal: Decimal = schedule.iter().map(|r| r.principal).sum();
        assert!(
            (total_principal - dec!(1000000)).abs() < dec!(0.000001),
            "principal total {total_principal}"
        );
    }

    #[test]
    fn test_schedule_first_row_split() {
        let schedule = amortization_schedule(dec!(2400000), dec!(0.12), 20);
        let first = &schedule[0];
        assert_eq!(first.month, 1);
        assert_eq!(first.interest, dec!(24000));
        assert_eq!(first.principal + first.interest, first.payment);
    }

    #[test]
    fn test_schedule_empty_without_financing() {
        assert!(amortization_schedule(dec!(1000000), Decimal::ZERO, 20).is_empty());
        assert!(amortization_schedule(Decimal::ZERO, dec!(0.12), 20).is_empty());
    }
}
