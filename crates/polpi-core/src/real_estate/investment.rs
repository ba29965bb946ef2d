use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::amortization::{amortization_schedule, compute_monthly_payment, ScheduleRow};
use super::assumptions::{
    default_monthly_rent, LoanAssumptions, DEFAULT_APPRECIATION_RATE, DEFAULT_DOWN_PAYMENT_PCT,
    DEFAULT_INTEREST_RATE, DEFAULT_LOAN_TERM_YEARS, MAX_LOAN_TERM_YEARS,
};
use super::formatting::{format_metrics, period_label, FormattedMetrics};
use super::projection::{project_equity_curve, AmortizationPoint};
use crate::error::PolpiError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::PolpiResult;

/// Projection horizon shown next to the calculator (years).
pub const DEFAULT_HORIZON_YEARS: u32 = 5;
/// Chart sampling interval (months).
pub const DEFAULT_SAMPLE_INTERVAL_MONTHS: u32 = 6;
/// Longest projection horizon accepted (years).
pub const MAX_HORIZON_YEARS: u32 = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Snapshot of the investment at origination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentMetrics {
    /// Financed amount
    pub loan_amount: Money,
    /// Cash paid up front
    pub down_payment_amount: Money,
    /// Fixed monthly mortgage payment (zero without financing)
    pub monthly_payment: Money,
    /// Rent less mortgage payment
    pub monthly_cash_flow: Money,
    /// 12 * monthly cash flow
    pub annual_cash_flow: Money,
    /// Annual rent / price * 100. `None` when the price is not positive.
    pub cap_rate_pct: Option<Decimal>,
    /// Annual cash flow / down payment * 100. `None` without a down payment.
    pub cash_on_cash_return_pct: Option<Decimal>,
}

/// Traffic-light classification used when displaying a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricRating {
    Favorable,
    Neutral,
    Unfavorable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRatings {
    pub monthly_cash_flow: MetricRating,
    pub cap_rate: MetricRating,
    pub cash_on_cash_return: MetricRating,
}

/// Tiered advice on the headline metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    ExcellentCapRate,
    GoodCapRate,
    AverageCapRate,
    LowCapRate,
    ExceptionalCashReturn,
    GoodCashReturn,
    ModerateCashReturn,
    NegativeCashReturn,
    ExcellentMonthlyCashFlow,
    PositiveMonthlyCashFlow,
    NegativeMonthlyCashFlow,
}

impl Recommendation {
    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::ExcellentCapRate => "Excelente cap rate - propiedad muy rentable",
            Recommendation::GoodCapRate => "Buen cap rate - inversión sólida",
            Recommendation::AverageCapRate => "Cap rate promedio - evaluar otros factores",
            Recommendation::LowCapRate => "Cap rate bajo - considerar otras opciones",
            Recommendation::ExceptionalCashReturn => "Retorno en efectivo excepcional",
            Recommendation::GoodCashReturn => "Buen retorno en efectivo",
            Recommendation::ModerateCashReturn => "Retorno moderado",
            Recommendation::NegativeCashReturn => "Flujo de efectivo negativo",
            Recommendation::ExcellentMonthlyCashFlow => "Excelente flujo de efectivo mensual",
            Recommendation::PositiveMonthlyCashFlow => "Flujo de efectivo positivo",
            Recommendation::NegativeMonthlyCashFlow => {
                "Flujo de efectivo negativo - tendrás que cubrir la diferencia"
            }
        }
    }
}

/// A recommendation paired with its display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationNote {
    pub kind: Recommendation,
    pub message: String,
}

impl From<Recommendation> for RecommendationNote {
    fn from(kind: Recommendation) -> Self {
        RecommendationNote {
            kind,
            message: kind.message().to_string(),
        }
    }
}

/// Calculator form input. Absent fields take the listing defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentInput {
    /// Asking price of the listing
    pub property_price: Money,
    /// Down payment share (default 20%)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub down_payment_pct: Option<Rate>,
    /// Annual mortgage rate (default 12%)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub annual_interest_rate: Option<Rate>,
    /// Financing term in years (default 20)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub loan_term_years: Option<u32>,
    /// Expected monthly rent (default max(15,000, 0.6% of price))
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub monthly_rent: Option<Money>,
    /// Annual appreciation (default 5%)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub annual_appreciation_rate: Option<Rate>,
    /// Equity projection horizon in years (default 5)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub horizon_years: Option<u32>,
    /// Months between projected points (default 6)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sample_interval_months: Option<u32>,
    /// Attach the full month-by-month schedule
    #[serde(default)]
    pub include_schedule: bool,
}

impl InvestmentInput {
    pub fn for_price(property_price: Money) -> Self {
        InvestmentInput {
            property_price,
            down_payment_pct: None,
            annual_interest_rate: None,
            loan_term_years: None,
            monthly_rent: None,
            annual_appreciation_rate: None,
            horizon_years: None,
            sample_interval_months: None,
            include_schedule: false,
        }
    }

    pub fn from_json(json: &str) -> PolpiResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolve the form into concrete assumptions, filling in defaults.
    pub fn assumptions(&self) -> LoanAssumptions {
        LoanAssumptions {
            property_price: self.property_price,
            down_payment_pct: self.down_payment_pct.unwrap_or(DEFAULT_DOWN_PAYMENT_PCT),
            annual_interest_rate: self.annual_interest_rate.unwrap_or(DEFAULT_INTEREST_RATE),
            loan_term_years: self.loan_term_years.unwrap_or(DEFAULT_LOAN_TERM_YEARS),
            monthly_rent: self
                .monthly_rent
                .unwrap_or_else(|| default_monthly_rent(self.property_price)),
            annual_appreciation_rate: self
                .annual_appreciation_rate
                .unwrap_or(DEFAULT_APPRECIATION_RATE),
        }
    }

    /// Check the resolved assumptions and projection horizon.
    pub fn validate(&self) -> PolpiResult<()> {
        validate_input(&self.assumptions(), self.horizon_years())
    }

    pub fn horizon_years(&self) -> u32 {
        self.horizon_years.unwrap_or(DEFAULT_HORIZON_YEARS)
    }

    pub fn sample_interval_months(&self) -> u32 {
        self.sample_interval_months
            .unwrap_or(DEFAULT_SAMPLE_INTERVAL_MONTHS)
    }
}

/// Complete calculator output for one listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentAnalysis {
    pub metrics: InvestmentMetrics,
    pub ratings: MetricRatings,
    /// Loan-to-value ratio
    pub ltv: Decimal,
    /// Sampled value / balance / equity points
    pub equity_curve: Vec<AmortizationPoint>,
    /// Chart label for each equity curve point
    pub chart_labels: Vec<String>,
    /// Equity at the end of the horizon
    pub ending_equity: Money,
    /// Full schedule, when requested and a payment is due
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<ScheduleRow>>,
    pub recommendations: Vec<RecommendationNote>,
    /// Display strings in pesos and percent
    pub formatted: FormattedMetrics,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Headline investment metrics for a set of assumptions.
///
/// Never fails: ratios that cannot be computed (zero price, zero down
/// payment, or a divisor so small the ratio leaves the Decimal range) come
/// back as `None` rather than NaN, infinity or a panic.
pub fn compute_investment_metrics(assumptions: &LoanAssumptions) -> InvestmentMetrics {
    let loan_amount = assumptions.loan_amount();
    let down_payment_amount = assumptions.down_payment_amount();

    let monthly_payment = compute_monthly_payment(
        loan_amount,
        assumptions.annual_interest_rate,
        assumptions.loan_term_years,
    );

    let monthly_cash_flow = assumptions.monthly_rent.saturating_sub(monthly_payment);
    let annual_cash_flow = monthly_cash_flow.saturating_mul(dec!(12));

    // Ratios past the Decimal range are as uncomputable as a zero divisor
    let cap_rate_pct = if assumptions.property_price > Decimal::ZERO {
        assumptions
            .monthly_rent
            .checked_mul(dec!(12))
            .and_then(|annual_rent| annual_rent.checked_div(assumptions.property_price))
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
    } else {
        None
    };

    let cash_on_cash_return_pct = if down_payment_amount > Decimal::ZERO {
        annual_cash_flow
            .checked_div(down_payment_amount)
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
    } else {
        None
    };

    InvestmentMetrics {
        loan_amount,
        down_payment_amount,
        monthly_payment,
        monthly_cash_flow,
        annual_cash_flow,
        cap_rate_pct,
        cash_on_cash_return_pct,
    }
}

/// Traffic-light ratings for the headline metrics.
pub fn rate_metrics(metrics: &InvestmentMetrics) -> MetricRatings {
    let monthly_cash_flow = if metrics.monthly_cash_flow >= Decimal::ZERO {
        MetricRating::Favorable
    } else {
        MetricRating::Unfavorable
    };

    MetricRatings {
        monthly_cash_flow,
        cap_rate: rate_threshold(metrics.cap_rate_pct, dec!(6), dec!(4)),
        cash_on_cash_return: rate_threshold(metrics.cash_on_cash_return_pct, dec!(8), dec!(5)),
    }
}

/// Tiered recommendations: cap rate, then cash-on-cash, then monthly cash flow.
pub fn recommend(metrics: &InvestmentMetrics) -> Vec<Recommendation> {
    let mut out = Vec::with_capacity(3);

    if let Some(cap) = metrics.cap_rate_pct {
        out.push(if cap >= dec!(8) {
            Recommendation::ExcellentCapRate
        } else if cap >= dec!(6) {
            Recommendation::GoodCapRate
        } else if cap >= dec!(4) {
            Recommendation::AverageCapRate
        } else {
            Recommendation::LowCapRate
        });
    }

    if let Some(coc) = metrics.cash_on_cash_return_pct {
        if coc >= dec!(12) {
            out.push(Recommendation::ExceptionalCashReturn);
        } else if coc >= dec!(8) {
            out.push(Recommendation::GoodCashReturn);
        } else if coc >= dec!(5) {
            out.push(Recommendation::ModerateCashReturn);
        } else if coc <= Decimal::ZERO {
            out.push(Recommendation::NegativeCashReturn);
        }
    }

    out.push(if metrics.monthly_cash_flow > dec!(5000) {
        Recommendation::ExcellentMonthlyCashFlow
    } else if metrics.monthly_cash_flow > Decimal::ZERO {
        Recommendation::PositiveMonthlyCashFlow
    } else {
        Recommendation::NegativeMonthlyCashFlow
    });

    out
}

/// Run the full listing calculator: metrics, ratings, equity projection,
/// optional schedule and recommendations.
pub fn analyze_investment(
    input: &InvestmentInput,
) -> PolpiResult<ComputationOutput<InvestmentAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.validate()?;
    let assumptions = input.assumptions();

    let metrics = compute_investment_metrics(&assumptions);
    debug!(
        "loan {} payment {} cash flow {}",
        metrics.loan_amount, metrics.monthly_payment, metrics.monthly_cash_flow
    );

    let ltv = metrics
        .loan_amount
        .checked_div(assumptions.property_price)
        .unwrap_or(Decimal::ZERO);

    let curve = project_equity_curve(
        &assumptions,
        input.horizon_years(),
        input.sample_interval_months(),
    );
    let equity_curve: Vec<AmortizationPoint> = curve.iter().collect();
    let chart_labels = equity_curve.iter().map(period_label).collect();
    let ending_equity = equity_curve
        .last()
        .map(|p| p.equity)
        .unwrap_or(metrics.down_payment_amount);

    let schedule = if input.include_schedule && !metrics.monthly_payment.is_zero() {
        Some(amortization_schedule(
            metrics.loan_amount,
            assumptions.annual_interest_rate,
            assumptions.loan_term_years,
        ))
    } else {
        None
    };

    // --- Warnings ---
    if metrics.monthly_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Monthly cash flow of {:.0} is negative: rent does not cover the mortgage payment",
            metrics.monthly_cash_flow
        ));
    }

    if ltv > dec!(0.80) {
        warnings.push(format!(
            "LTV of {:.1}% exceeds 80%: high leverage",
            ltv * dec!(100)
        ));
    }

    if assumptions.annual_interest_rate.is_zero() && !metrics.loan_amount.is_zero() {
        warnings.push("Interest rate is zero: no financing cost applied".into());
    }

    if metrics.cap_rate_pct.is_none() {
        warnings.push("Cap rate is not computable for this price".into());
    }

    if metrics.cash_on_cash_return_pct.is_none() {
        warnings.push("Cash-on-cash return is not computable for this down payment".into());
    }

    if let Some(p) = equity_curve.iter().find(|p| p.equity < Decimal::ZERO) {
        warnings.push(format!(
            "Equity turns negative at month {}: depreciation outpaces loan paydown",
            p.period_index
        ));
    }

    if input.horizon_years() > assumptions.loan_term_years {
        warnings.push(format!(
            "Horizon of {} years runs past the {}-year loan term",
            input.horizon_years(),
            assumptions.loan_term_years
        ));
    }

    for w in &warnings {
        warn!("{w}");
    }

    let ratings = rate_metrics(&metrics);
    let recommendations = recommend(&metrics)
        .into_iter()
        .map(RecommendationNote::from)
        .collect();
    let formatted = format_metrics(&metrics);

    let output = InvestmentAnalysis {
        metrics,
        ratings,
        ltv,
        equity_curve,
        chart_labels,
        ending_equity,
        schedule,
        recommendations,
        formatted,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Fixed-Rate Mortgage Amortization with Rental Cash Flow",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(assumptions: &LoanAssumptions, horizon_years: u32) -> PolpiResult<()> {
    if assumptions.property_price <= Decimal::ZERO {
        return Err(PolpiError::InvalidInput {
            field: "property_price".into(),
            reason: "Property price must be positive".into(),
        });
    }

    if assumptions.down_payment_pct < Decimal::ZERO || assumptions.down_payment_pct > Decimal::ONE
    {
        return Err(PolpiError::InvalidInput {
            field: "down_payment_pct".into(),
            reason: "Down payment must be between 0 and 1".into(),
        });
    }

    if assumptions.annual_interest_rate < Decimal::ZERO
        || assumptions.annual_interest_rate >= Decimal::ONE
    {
        return Err(PolpiError::InvalidInput {
            field: "annual_interest_rate".into(),
            reason: "Interest rate must be between 0 and 1 (exclusive upper)".into(),
        });
    }

    if !(1..=MAX_LOAN_TERM_YEARS).contains(&assumptions.loan_term_years) {
        return Err(PolpiError::InvalidInput {
            field: "loan_term_years".into(),
            reason: format!("Loan term must be between 1 and {MAX_LOAN_TERM_YEARS} years"),
        });
    }

    if assumptions.monthly_rent < Decimal::ZERO {
        return Err(PolpiError::InvalidInput {
            field: "monthly_rent".into(),
            reason: "Monthly rent cannot be negative".into(),
        });
    }

    if assumptions.annual_appreciation_rate <= dec!(-1) {
        return Err(PolpiError::InvalidInput {
            field: "annual_appreciation_rate".into(),
            reason: "Appreciation rate must be greater than -100%".into(),
        });
    }

    if !(1..=MAX_HORIZON_YEARS).contains(&horizon_years) {
        return Err(PolpiError::InvalidInput {
            field: "horizon_years".into(),
            reason: format!("Projection horizon must be between 1 and {MAX_HORIZON_YEARS} years"),
        });
    }

    Ok(())
}

fn rate_threshold(value: Option<Decimal>, favorable: Decimal, neutral: Decimal) -> MetricRating {
    match value {
        Some(v) if v >= favorable => MetricRating::Favorable,
        Some(v) if v >= neutral => MetricRating::Neutral,
        Some(_) => MetricRating::Unfavorable,
        None => MetricRating::Neutral,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
