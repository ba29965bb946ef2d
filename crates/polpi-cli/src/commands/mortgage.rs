use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use polpi_core::real_estate::amortization::{
    amortization_schedule, compute_monthly_payment, remaining_balance,
};
use polpi_core::real_estate::assumptions::MAX_LOAN_TERM_YEARS;

const MAX_TERM: i64 = MAX_LOAN_TERM_YEARS as i64;

/// Arguments shared by the loan-only commands
#[derive(Args)]
pub struct LoanArgs {
    /// Amount financed
    #[arg(long)]
    pub loan_amount: Decimal,

    /// Annual interest rate as a decimal (0.12 = 12%)
    #[arg(long)]
    pub rate: Decimal,

    /// Financing term in years (1 to 100)
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=MAX_TERM))]
    pub term_years: u32,
}

/// Arguments for the fixed monthly payment
#[derive(Args)]
pub struct PaymentArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let LoanArgs {
        loan_amount,
        rate,
        term_years,
    } = args.loan;

    let monthly_payment = compute_monthly_payment(loan_amount, rate, term_years);
    let total_paid = monthly_payment.saturating_mul(Decimal::from(term_years.saturating_mul(12)));
    let total_interest = if monthly_payment.is_zero() {
        Decimal::ZERO
    } else {
        total_paid - loan_amount
    };

    Ok(json!({
        "loan_amount": loan_amount,
        "monthly_payment": monthly_payment,
        "total_paid": total_paid,
        "total_interest": total_interest,
    }))
}

/// Arguments for the outstanding balance
#[derive(Args)]
pub struct BalanceArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Number of monthly payments already made
    #[arg(long)]
    pub payments_made: u32,
}

pub fn run_balance(args: BalanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let LoanArgs {
        loan_amount,
        rate,
        term_years,
    } = args.loan;

    let monthly_rate = rate / Decimal::from(12);
    let total_payments = term_years.saturating_mul(12);
    let monthly_payment = compute_monthly_payment(loan_amount, rate, term_years);
    let balance = remaining_balance(
        loan_amount,
        monthly_rate,
        monthly_payment,
        total_payments,
        args.payments_made,
    );

    Ok(json!({
        "loan_amount": loan_amount,
        "monthly_payment": monthly_payment,
        "payments_made": args.payments_made,
        "payments_remaining": total_payments.saturating_sub(args.payments_made),
        "balance": balance,
        "principal_repaid": loan_amount - balance,
    }))
}

/// Arguments for the full amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let LoanArgs {
        loan_amount,
        rate,
        term_years,
    } = args.loan;

    let schedule = amortization_schedule(loan_amount, rate, term_years);
    if schedule.is_empty() {
        return Err("No payment is due: loan amount and interest rate must both be positive".into());
    }
    Ok(serde_json::to_value(schedule)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct LoanCli {
        #[command(flatten)]
        loan: LoanArgs,
    }

    fn parse(term: &str) -> Result<LoanCli, clap::Error> {
        LoanCli::try_parse_from([
            "polpi",
            "--loan-amount",
            "2400000",
            "--rate",
            "0.12",
            "--term-years",
            term,
        ])
    }

    #[test]
    fn test_term_years_range() {
        assert_eq!(parse("100").unwrap().loan.term_years, 100);
        assert!(parse("101").is_err());
        assert!(parse("0").is_err());
        assert!(parse("4294967295").is_err());
    }

    #[test]
    fn test_payment_at_longest_term() {
        let args = PaymentArgs {
            loan: parse("100").unwrap().loan,
        };
        let out = run_payment(args).unwrap();
        assert!(!out["monthly_payment"].is_null());
    }
}
