//! Display strings for the listing calculator, in Mexican pesos.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::investment::InvestmentMetrics;
use super::projection::AmortizationPoint;
use crate::types::Money;

/// Placeholder shown for a ratio that cannot be computed.
pub const NOT_COMPUTABLE: &str = "—";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedMetrics {
    pub monthly_payment: String,
    pub monthly_cash_flow: String,
    pub annual_cash_flow: String,
    pub cap_rate: String,
    pub cash_on_cash_return: String,
}

pub fn format_metrics(metrics: &InvestmentMetrics) -> FormattedMetrics {
    FormattedMetrics {
        monthly_payment: format_mxn(metrics.monthly_payment),
        monthly_cash_flow: format_mxn(metrics.monthly_cash_flow),
        annual_cash_flow: format_mxn(metrics.annual_cash_flow),
        cap_rate: format_pct(metrics.cap_rate_pct),
        cash_on_cash_return: format_pct(metrics.cash_on_cash_return_pct),
    }
}

/// Whole pesos with thousands separators: `$26,426`, `-$1,426`.
pub fn format_mxn(amount: Money) -> String {
    let mut whole = amount
        .abs()
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    whole.rescale(0);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if amount < Decimal::ZERO && !whole.is_zero() {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Percentage with one decimal place (`10.0%`), or the placeholder.
pub fn format_pct(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format!("{}%", one_decimal(v)),
        None => NOT_COMPUTABLE.to_string(),
    }
}

/// Chart label: `Hoy` at origination, otherwise `Año 1.5`.
pub fn period_label(point: &AmortizationPoint) -> String {
    if point.period_index == 0 {
        "Hoy".to_string()
    } else {
        format!("Año {}", one_decimal(point.year))
    }
}

fn one_decimal(value: Decimal) -> Decimal {
    let mut v = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    v.rescale(1);
    v
}
