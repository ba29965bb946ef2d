use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::amortization::{compute_monthly_payment, remaining_balance};
use super::assumptions::LoanAssumptions;
use crate::time_value::growth_factor;
use crate::types::{Money, Rate, Years};

/// Property value, loan balance and equity at one sampled month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationPoint {
    /// Months since origination
    pub period_index: u32,
    /// `period_index / 12`
    pub year: Years,
    /// Price compounded by the appreciation rate to this month
    pub property_value: Money,
    /// Outstanding principal under the fixed-payment schedule
    pub loan_balance: Money,
    /// `property_value - loan_balance`; negative when the loan is under water
    pub equity: Money,
}

/// Lazy projection of value, balance and equity over a horizon.
///
/// Holds only the inputs, so it can be iterated any number of times and each
/// pass starts again at origination. Balance decay always follows the loan
/// term from the assumptions; past the end of the term the balance stays at
/// zero however long the horizon runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquityCurve {
    assumptions: LoanAssumptions,
    horizon_months: u32,
    step_months: u32,
    loan_amount: Money,
    monthly_rate: Rate,
    payment: Money,
    total_payments: u32,
}

/// Build the equity curve from month 0 to `horizon_years * 12`, sampled every
/// `sample_interval_months`. A zero interval yields the origination point only.
pub fn project_equity_curve(
    assumptions: &LoanAssumptions,
    horizon_years: u32,
    sample_interval_months: u32,
) -> EquityCurve {
    let loan_amount = assumptions.loan_amount();
    EquityCurve {
        horizon_months: horizon_years.saturating_mul(12),
        step_months: sample_interval_months,
        loan_amount,
        monthly_rate: assumptions.monthly_rate(),
        payment: compute_monthly_payment(
            loan_amount,
            assumptions.annual_interest_rate,
            assumptions.loan_term_years,
        ),
        total_payments: assumptions.total_payments(),
        assumptions: assumptions.clone(),
    }
}

impl EquityCurve {
    pub fn assumptions(&self) -> &LoanAssumptions {
        &self.assumptions
    }

    pub fn horizon_months(&self) -> u32 {
        self.horizon_months
    }

    pub fn monthly_payment(&self) -> Money {
        self.payment
    }

    /// Number of sampled points.
    pub fn len(&self) -> usize {
        if self.step_months == 0 {
            1
        } else {
            (self.horizon_months / self.step_months) as usize + 1
        }
    }

    /// Always false: the origination point is part of every curve.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> EquityCurveIter<'_> {
        EquityCurveIter {
            curve: self,
            next_month: Some(0),
        }
    }

    /// Evaluate the curve at an arbitrary month, sampled or not.
    pub fn point_at(&self, month: u32) -> AmortizationPoint {
        let year = Decimal::from(month) / dec!(12);

        let property_value = if self.assumptions.annual_appreciation_rate.is_zero() {
            self.assumptions.property_price
        } else {
            growth_factor(self.assumptions.annual_appreciation_rate, year)
                .and_then(|g| self.assumptions.property_price.checked_mul(g))
                .unwrap_or(Decimal::MAX)
        };

        let loan_balance = remaining_balance(
            self.loan_amount,
            self.monthly_rate,
            self.payment,
            self.total_payments,
            month,
        );

        AmortizationPoint {
            period_index: month,
            year,
            property_value,
            loan_balance,
            equity: property_value - loan_balance,
        }
    }
}

impl<'a> IntoIterator for &'a EquityCurve {
    type Item = AmortizationPoint;
    type IntoIter = EquityCurveIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the sampled months of an [`EquityCurve`].
#[derive(Debug, Clone)]
pub struct EquityCurveIter<'a> {
    curve: &'a EquityCurve,
    next_month: Option<u32>,
}

impl Iterator for EquityCurveIter<'_> {
    type Item = AmortizationPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let month = self.next_month?;
        self.next_month = if self.curve.step_months == 0 {
            None
        } else {
            month
                .checked_add(self.curve.step_months)
                .filter(|m| *m <= self.curve.horizon_months)
        };
        Some(self.curve.point_at(month))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next_month {
            None => 0,
            Some(_) if self.curve.step_months == 0 => 1,
            Some(m) => ((self.curve.horizon_months - m) / self.curve.step_months) as usize + 1,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for EquityCurveIter<'_> {}
