//! Straight-line depreciation of asset values.

use rust_decimal::Decimal;

use crate::types::Date;

/// Current book value of an asset under straight-line depreciation.
///
/// Depreciates `asset_value` evenly over `asset_life_months`, floored at
/// zero. Months elapsed are counted from `purchase_date` to `as_of` by
/// calendar month, ignoring the day of month once at least one full month
/// has passed.
pub fn straight_line_value(
    asset_value: Decimal,
    asset_life_months: i32,
    purchase_date: Date,
    as_of: Date,
) -> Decimal {
    if asset_life_months <= 0 || as_of <= purchase_date {
        return asset_value;
    }

    let elapsed = months_between(purchase_date, as_of);
    if elapsed >= i64::from(asset_life_months) {
        return Decimal::ZERO;
    }

    let monthly = asset_value / Decimal::from(asset_life_months);
    let depreciated = monthly * Decimal::from(elapsed);
    (asset_value - depreciated).round_dp(2).max(Decimal::ZERO)
}

/// Whole calendar months from `start` to `end` (`end` >= `start`).
fn months_between(start: Date, end: Date) -> i64 {
    use chrono::Datelike;
    let mut months =
        i64::from(end.year() - start.year()) * 12 + i64::from(end.month()) - i64::from(start.month());
    if end.day() < start.day() {
        months -= 1;
    }
    months.max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_no_depreciation_before_purchase_or_without_life() {
        let value = Decimal::from(1200);
        assert_eq!(
            straight_line_value(value, 0, date(2024, 1, 1), date(2025, 1, 1)),
            value
        );
        assert_eq!(
            straight_line_value(value, 36, date(2024, 6, 1), date(2024, 1, 1)),
            value
        );
    }

    #[test]
    fn test_linear_decline_by_month() {
        // 1200 over 12 months = 100/month.
        let value = Decimal::from(1200);
        let bought = date(2024, 1, 15);
        assert_eq!(
            straight_line_value(value, 12, bought, date(2024, 4, 15)),
            Decimal::from(900)
        );
        // One day short of the third month boundary.
        assert_eq!(
            straight_line_value(value, 12, bought, date(2024, 4, 14)),
            Decimal::from(1000)
        );
    }

    #[test]
    fn test_fully_depreciated_floors_at_zero() {
        let value = Decimal::from(1200);
        assert_eq!(
            straight_line_value(value, 12, date(2020, 1, 1), date(2024, 1, 1)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_rounding_to_cents() {
        // 1000 over 36 months = 27.777.../month.
        let value = Decimal::from(1000);
        let result = straight_line_value(value, 36, date(2024, 1, 1), date(2024, 4, 1));
        assert_eq!(result, Decimal::new(91667, 2)); // 916.67
    }
}
