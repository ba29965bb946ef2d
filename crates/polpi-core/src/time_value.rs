use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::types::{Rate, Years};

/// Compound factor (1 + rate)^periods, by repeated squaring.
///
/// Returns `None` once the factor leaves the representable Decimal range.
pub fn compound_factor(rate: Rate, periods: u32) -> Option<Decimal> {
    (Decimal::ONE + rate).checked_powu(u64::from(periods))
}

/// Discount factor 1 / (1 + rate)^periods.
///
/// Saturates to zero when the compound factor overflows, which is the limit
/// the factor tends to for very long horizons.
pub fn discount_factor(rate: Rate, periods: u32) -> Decimal {
    compound_factor(rate, periods)
        .and_then(|c| Decimal::ONE.checked_div(c))
        .unwrap_or(Decimal::ZERO)
}

/// Growth factor (1 + rate)^years where `years` may be fractional.
///
/// A zero rate or zero elapsed time is exactly one. A rate at or below -100%
/// wipes the value out entirely.
pub fn growth_factor(rate: Rate, years: Years) -> Option<Decimal> {
    if rate.is_zero() || years.is_zero() {
        return Some(Decimal::ONE);
    }

    let base = Decimal::ONE + rate;
    if base <= Decimal::ZERO {
        return Some(Decimal::ZERO);
    }

    if years.fract().is_zero() {
        if let Some(whole) = years.to_u32() {
            return compound_factor(rate, whole);
        }
    }

    base.checked_powd(years)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compound_factor_basic() {
        // 1.1^3 = 1.331
        assert_eq!(compound_factor(dec!(0.1), 3), Some(dec!(1.331)));
    }

    #[test]
    fn test_compound_factor_zero_periods() {
        assert_eq!(compound_factor(dec!(0.25), 0), Some(Decimal::ONE));
    }

    #[test]
    fn test_compound_factor_overflow() {
        assert_eq!(compound_factor(dec!(10), 100), None);
    }

    #[test]
    fn test_compound_factor_huge_period_count() {
        // u32::MAX periods at a tiny rate must not walk every period
        let start = std::time::Instant::now();
        let factor = compound_factor(dec!(0.0000000001), u32::MAX);
        assert!(factor.is_some_and(|f| f > Decimal::ONE), "got {factor:?}");
        assert!(start.elapsed().as_secs() < 1, "took {:?}", start.elapsed());
    }

    #[test]
    fn test_discount_factor_saturates() {
        assert_eq!(discount_factor(dec!(10), 100), Decimal::ZERO);
    }

    #[test]
    fn test_discount_factor_basic() {
        // 1 / 1.25^2 = 0.64
        assert_eq!(discount_factor(dec!(0.25), 2), dec!(0.64));
    }

    #[test]
    fn test_growth_factor_zero_rate_is_exact() {
        assert_eq!(growth_factor(Decimal::ZERO, dec!(3.5)), Some(Decimal::ONE));
    }

    #[test]
    fn test_growth_factor_whole_years() {
        assert_eq!(growth_factor(dec!(0.05), dec!(2)), Some(dec!(1.1025)));
    }

    #[test]
    fn test_growth_factor_half_year() {
        // sqrt(1.21) = 1.1
        let g = growth_factor(dec!(0.21), dec!(0.5)).unwrap();
        assert!((g - dec!(1.1)).abs() < dec!(0.0000001), "got {g}");
    }

    #[test]
    fn test_growth_factor_total_loss() {
        assert_eq!(growth_factor(dec!(-1), dec!(2)), Some(Decimal::ZERO));
    }

    #[test]
    fn test_growth_factor_depreciation() {
        let g = growth_factor(dec!(-0.10), dec!(1)).unwrap();
        assert_eq!(g, dec!(0.90));
    }
}
