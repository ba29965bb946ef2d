use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Down payment used when the buyer has not entered one (20%).
pub const DEFAULT_DOWN_PAYMENT_PCT: Rate = dec!(0.20);
/// Annual mortgage rate used when none is entered (12%).
pub const DEFAULT_INTEREST_RATE: Rate = dec!(0.12);
/// Financing term in years used when none is entered.
pub const DEFAULT_LOAN_TERM_YEARS: u32 = 20;
/// Longest financing term accepted (years).
pub const MAX_LOAN_TERM_YEARS: u32 = 100;
/// Annual appreciation used when none is entered (5%).
pub const DEFAULT_APPRECIATION_RATE: Rate = dec!(0.05);
/// Floor for the estimated monthly rent, in pesos.
pub const MIN_ESTIMATED_RENT: Money = dec!(15000);
/// Monthly rent estimate as a share of the asking price (0.6%).
pub const RENT_TO_PRICE_RATIO: Rate = dec!(0.006);

/// Financing and rental assumptions for a single listing.
///
/// Immutable per calculation: every change in the calculator form produces a
/// new value and everything downstream is recomputed from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanAssumptions {
    /// Asking price of the property
    pub property_price: Money,
    /// Down payment as a fraction of price (0.20 = 20%)
    pub down_payment_pct: Rate,
    /// Nominal annual mortgage rate (0 disables financing cost)
    pub annual_interest_rate: Rate,
    /// Financing term in years
    pub loan_term_years: u32,
    /// Expected monthly rent
    pub monthly_rent: Money,
    /// Annual appreciation; negative values model depreciation
    pub annual_appreciation_rate: Rate,
}

impl LoanAssumptions {
    /// Assumptions for a listing price with every other field defaulted.
    pub fn for_price(property_price: Money) -> Self {
        LoanAssumptions {
            property_price,
            down_payment_pct: DEFAULT_DOWN_PAYMENT_PCT,
            annual_interest_rate: DEFAULT_INTEREST_RATE,
            loan_term_years: DEFAULT_LOAN_TERM_YEARS,
            monthly_rent: default_monthly_rent(property_price),
            annual_appreciation_rate: DEFAULT_APPRECIATION_RATE,
        }
    }

    /// Cash paid up front: price * down payment share.
    pub fn down_payment_amount(&self) -> Money {
        self.property_price.saturating_mul(self.down_payment_pct)
    }

    /// Financed amount, never negative.
    pub fn loan_amount(&self) -> Money {
        self.property_price
            .saturating_mul(Decimal::ONE.saturating_sub(self.down_payment_pct))
            .max(Decimal::ZERO)
    }

    /// Periodic (monthly) interest rate.
    pub fn monthly_rate(&self) -> Rate {
        self.annual_interest_rate / dec!(12)
    }

    /// Number of monthly payments over the financing term.
    pub fn total_payments(&self) -> u32 {
        self.loan_term_years.saturating_mul(12)
    }
}

/// Rent estimate for a listing: max(15,000, 0.6% of price).
pub fn default_monthly_rent(property_price: Money) -> Money {
    (property_price * RENT_TO_PRICE_RATIO).max(MIN_ESTIMATED_RENT)
}
