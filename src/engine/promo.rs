// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Debt;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Payoff countdown for a debt on a promotional rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromoPayoff {
    pub promo_end_date: NaiveDate,
    /// Thirty-day months until the promo ends, at least 1.
    pub months_remaining: i64,
    /// Whole dollars per month to clear the balance in time; 0 when the
    /// balance is unknown.
    pub monthly_needed: Decimal,
    pub current_payment: Decimal,
    pub on_track: bool,
}

/// `None` for debts without a promo window.
pub fn promo_payoff(debt: &Debt, today: NaiveDate) -> Option<PromoPayoff> {
    let end = debt.promo_end_date?;
    let days = (end - today).num_days();
    // ceil(days / 30); an expired promo leaves one month to pay everything.
    let months_remaining = (days.max(0) + 29).div_euclid(30).max(1);
    let monthly_needed = match debt.balance {
        Some(balance) if balance > Decimal::ZERO => (balance / Decimal::from(months_remaining))
            .round_dp_with_strategy(0, RoundingStrategy::AwayFromZero),
        _ => Decimal::ZERO,
    };
    Some(PromoPayoff {
        promo_end_date: end,
        months_remaining,
        monthly_needed,
        current_payment: debt.monthly_payment,
        on_track: debt.monthly_payment >= monthly_needed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DebtKind;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn card(balance: Option<i64>, payment: i64, promo_end: Option<NaiveDate>) -> Debt {
        Debt {
            id: 1,
            name: "Venture card".into(),
            kind: DebtKind::CreditCard,
            original_amount: None,
            balance: balance.map(Decimal::from),
            interest_rate: None,
            monthly_payment: Decimal::from(payment),
            notes: None,
            promo_end_date: promo_end,
            promo_rate: Some(Decimal::ZERO),
            post_promo_rate: Some(Decimal::new(2899, 2)),
        }
    }

    #[test]
    fn no_window_no_payoff() {
        assert!(promo_payoff(&card(Some(100), 10, None), d(2025, 1, 1)).is_none());
    }

    #[test]
    fn months_round_up_and_payment_ceils() {
        // 2025-01-01 -> 2025-07-01 is 181 days => 7 months.
        let p = promo_payoff(&card(Some(6000), 900, Some(d(2025, 7, 1))), d(2025, 1, 1)).unwrap();
        assert_eq!(p.months_remaining, 7);
        assert_eq!(p.monthly_needed, Decimal::from(858));
        assert!(p.on_track);

        let p = promo_payoff(&card(Some(6000), 800, Some(d(2025, 7, 1))), d(2025, 1, 1)).unwrap();
        assert!(!p.on_track);
    }

    #[test]
    fn exact_thirty_days_is_one_month() {
        let p = promo_payoff(&card(Some(300), 300, Some(d(2025, 1, 31))), d(2025, 1, 1)).unwrap();
        assert_eq!(p.months_remaining, 1);
        assert_eq!(p.monthly_needed, Decimal::from(300));
    }

    #[test]
    fn expired_promo_wants_full_balance() {
        let p = promo_payoff(&card(Some(1200), 100, Some(d(2024, 12, 1))), d(2025, 1, 1)).unwrap();
        assert_eq!(p.months_remaining, 1);
        assert_eq!(p.monthly_needed, Decimal::from(1200));
        assert!(!p.on_track);
    }

    #[test]
    fn unknown_balance_needs_nothing() {
        let p = promo_payoff(&card(None, 0, Some(d(2025, 6, 1))), d(2025, 1, 1)).unwrap();
        assert_eq!(p.monthly_needed, Decimal::ZERO);
        assert!(p.on_track);
    }
}
