use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};

/// late fee policy
///
/// A stateless configuration value: a monthly rate in [0, 1] applied to the
/// ORIGINAL invoice amount (never the remaining balance), prorated daily on a
/// fixed 30-day month. Range validation happens when the [`Rate`] is built,
/// so holding a policy means holding a valid one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LateFeePolicy {
    monthly_rate: Rate,
}

impl LateFeePolicy {
    pub fn new(monthly_rate: Rate) -> Self {
        Self { monthly_rate }
    }

    /// standard 5% monthly policy
    pub fn standard() -> Self {
        Self {
            monthly_rate: Rate::new(Decimal::new(5, 2)).unwrap_or(Rate::ZERO),
        }
    }

    /// policy that never charges late fees
    pub fn no_late_fees() -> Self {
        Self {
            monthly_rate: Rate::ZERO,
        }
    }

    pub fn monthly_rate(&self) -> Rate {
        self.monthly_rate
    }

    /// calculate the late fee for an invoice overdue at `now`
    ///
    /// Zero when `now <= due_date`. Otherwise:
    /// monthly_fee = original_amount * monthly_rate,
    /// daily_fee = monthly_fee / 30 (fixed convention, not calendar months),
    /// fee = daily_fee * whole days overdue (calendar-date difference),
    /// rounded half-up to cents exactly once, at this final step.
    pub fn calculate_fee(
        &self,
        original_amount: Money,
        due_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Money {
        if now <= due_date {
            return Money::ZERO;
        }

        let days_overdue = (now.date_naive() - due_date.date_naive()).num_days().max(0);

        let monthly_fee = original_amount.as_decimal() * self.monthly_rate.as_decimal();
        let daily_fee = monthly_fee / Decimal::from(30);
        let total_fee = daily_fee * Decimal::from(days_overdue);

        // non-negative by construction: amount >= 0, rate >= 0, days >= 0
        Money::round_non_negative(total_fee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn due() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_no_fee_on_or_before_due_date() {
        let policy = LateFeePolicy::standard();
        let amount = Money::from_major(1500);

        assert_eq!(policy.calculate_fee(amount, due(), due()), Money::ZERO);
        assert_eq!(
            policy.calculate_fee(amount, due(), due() - Duration::days(10)),
            Money::ZERO
        );
    }

    #[test]
    fn test_fifteen_days_at_five_percent() {
        // 1500.00 * 0.05 = 75.00/month -> 2.50/day -> 37.50 at 15 days
        let policy = LateFeePolicy::standard();
        let amount = Money::from_major(1500);
        let now = due() + Duration::days(15);

        let fee = policy.calculate_fee(amount, due(), now);
        assert_eq!(fee, Money::from_str_exact("37.50").unwrap());
    }

    #[test]
    fn test_half_cent_rounds_up_once_at_the_end() {
        // 1.00 * 0.75 = 0.75/month -> 0.025/day; one day overdue is a
        // 2.5 cent fee, which rounds half-up to 3 cents
        let policy = LateFeePolicy::new(Rate::new(dec!(0.75)).unwrap());
        let amount = Money::from_major(1);
        let now = due() + Duration::days(1);

        let fee = policy.calculate_fee(amount, due(), now);
        assert_eq!(fee, Money::from_minor(3));
    }

    #[test]
    fn test_fee_uses_calendar_date_difference() {
        let policy = LateFeePolicy::standard();
        let amount = Money::from_major(300);
        let due_late_evening = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 0).unwrap();

        // two minutes later but past midnight: one whole day overdue
        let now = Utc.with_ymd_and_hms(2024, 3, 2, 0, 1, 0).unwrap();
        let fee = policy.calculate_fee(amount, due_late_evening, now);
        // 300 * 0.05 / 30 = 0.50 per day
        assert_eq!(fee, Money::from_str_exact("0.50").unwrap());

        // later the same day as the due date: overdue by the clock but zero
        // whole days, so zero fee
        let same_day = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 30).unwrap();
        assert_eq!(
            policy.calculate_fee(amount, due_late_evening, same_day),
            Money::ZERO
        );
    }

    #[test]
    fn test_zero_rate_policy_never_charges() {
        let policy = LateFeePolicy::no_late_fees();
        let fee = policy.calculate_fee(Money::from_major(10_000), due(), due() + Duration::days(90));
        assert_eq!(fee, Money::ZERO);
    }

    proptest! {
        #[test]
        fn prop_no_fee_when_not_past_due(
            rate_bps in 0u32..=10_000,
            amount_cents in 0u64..=10_000_000,
            not_late_days in 0i64..=365,
        ) {
            let rate = Rate::new(Decimal::new(rate_bps as i64, 4)).unwrap();
            let policy = LateFeePolicy::new(rate);
            let amount = Money::from_minor(amount_cents);
            let now = due() - Duration::days(not_late_days);

            prop_assert_eq!(policy.calculate_fee(amount, due(), now), Money::ZERO);
        }

        #[test]
        fn prop_fee_scales_with_days(
            days in 1i64..=365,
        ) {
            // fee for n days equals n times the single-day fee before rounding;
            // with a 0.50/day policy the relation survives rounding exactly
            let policy = LateFeePolicy::standard();
            let amount = Money::from_major(300);
            let fee = policy.calculate_fee(amount, due(), due() + Duration::days(days));
            let expected = Money::round_non_negative(dec!(0.50) * Decimal::from(days));
            prop_assert_eq!(fee, expected);
        }
    }
}
