use clap::Args;
use log::debug;
use rust_decimal::Decimal;
use serde_json::Value;

use polpi_core::real_estate::assumptions::MAX_LOAN_TERM_YEARS;
use polpi_core::real_estate::investment::{
    analyze_investment, compute_investment_metrics, InvestmentInput,
};
use polpi_core::real_estate::projection::{project_equity_curve, AmortizationPoint};

use crate::input;

const MAX_TERM: i64 = MAX_LOAN_TERM_YEARS as i64;

/// Listing assumptions, from a file, piped JSON, or individual flags
#[derive(Args)]
pub struct ListingArgs {
    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Asking price of the listing
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Down payment as a decimal (default 0.20)
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual interest rate as a decimal (default 0.12)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Financing term in years (default 20, at most 100)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_TERM))]
    pub term_years: Option<u32>,

    /// Expected monthly rent (default max(15000, 0.6% of price))
    #[arg(long)]
    pub rent: Option<Decimal>,

    /// Annual appreciation as a decimal, negative for depreciation (default 0.05)
    #[arg(long, allow_hyphen_values = true)]
    pub appreciation: Option<Decimal>,
}

/// Projection sampling options
#[derive(Args)]
pub struct HorizonArgs {
    /// Projection horizon in years (default 5)
    #[arg(long)]
    pub horizon_years: Option<u32>,

    /// Months between projected points (default 6)
    #[arg(long)]
    pub interval_months: Option<u32>,
}

#[derive(Args)]
pub struct MetricsArgs {
    #[command(flatten)]
    pub listing: ListingArgs,
}

#[derive(Args)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub listing: ListingArgs,

    #[command(flatten)]
    pub horizon: HorizonArgs,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub listing: ListingArgs,

    #[command(flatten)]
    pub horizon: HorizonArgs,

    /// Include the month-by-month amortization schedule
    #[arg(long)]
    pub schedule: bool,
}

/// Resolve the calculator input: file first, then piped stdin, then flags.
fn resolve_input(args: ListingArgs) -> Result<InvestmentInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        debug!("using input file {path}");
        return input::file::read_input(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        debug!("using piped stdin input");
        return Ok(serde_json::from_value(data)?);
    }

    debug!("using command-line flags");
    let price = args
        .price
        .ok_or("--price is required (or provide --input)")?;

    Ok(InvestmentInput {
        down_payment_pct: args.down_payment,
        annual_interest_rate: args.rate,
        loan_term_years: args.term_years,
        monthly_rent: args.rent,
        annual_appreciation_rate: args.appreciation,
        ..InvestmentInput::for_price(price)
    })
}

fn apply_horizon(input: &mut InvestmentInput, horizon: HorizonArgs) {
    if horizon.horizon_years.is_some() {
        input.horizon_years = horizon.horizon_years;
    }
    if horizon.interval_months.is_some() {
        input.sample_interval_months = horizon.interval_months;
    }
}

pub fn run_metrics(args: MetricsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let investment_input = resolve_input(args.listing)?;
    let metrics = compute_investment_metrics(&investment_input.assumptions());
    Ok(serde_json::to_value(metrics)?)
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut investment_input = resolve_input(args.listing)?;
    apply_horizon(&mut investment_input, args.horizon);
    investment_input.validate()?;

    let curve = project_equity_curve(
        &investment_input.assumptions(),
        investment_input.horizon_years(),
        investment_input.sample_interval_months(),
    );
    let points: Vec<AmortizationPoint> = curve.iter().collect();
    Ok(serde_json::to_value(points)?)
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut investment_input = resolve_input(args.listing)?;
    apply_horizon(&mut investment_input, args.horizon);
    if args.schedule {
        investment_input.include_schedule = true;
    }

    let result = analyze_investment(&investment_input)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn listing_file(name: &str, json: &str) -> String {
        let path = std::env::temp_dir().join(format!("polpi-{}-{name}.json", std::process::id()));
        fs::write(&path, json).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn project_args(path: String, horizon_years: Option<u32>) -> ProjectArgs {
        ProjectArgs {
            listing: ListingArgs {
                input: Some(path),
                price: None,
                down_payment: None,
                rate: None,
                term_years: None,
                rent: None,
                appreciation: None,
            },
            horizon: HorizonArgs {
                horizon_years,
                interval_months: None,
            },
        }
    }

    #[test]
    fn test_project_default_horizon() {
        let path = listing_file("project-default", r#"{"property_price": "3000000"}"#);
        let out = run_project(project_args(path, None)).unwrap();
        assert_eq!(out.as_array().map(Vec::len), Some(11));
    }

    #[test]
    fn test_project_rejects_horizon_above_cap() {
        let path = listing_file("project-long", r#"{"property_price": "3000000"}"#);
        let err = run_project(project_args(path, Some(101))).unwrap_err();
        assert!(err.to_string().contains("horizon_years"), "got {err}");
    }

    #[test]
    fn test_project_rejects_invalid_listing() {
        let path = listing_file("project-zero", r#"{"property_price": "0"}"#);
        assert!(run_project(project_args(path, None)).is_err());
    }
}
