// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::aggregate::CategorySpending;
use crate::engine::discretionary::PROBLEM_CATEGORY;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt;

/// Below this daily limit all discretionary spending stops.
pub const STOP_BELOW: i64 = 10;
/// Below this daily limit spending is allowed but flagged.
pub const CAUTION_BELOW: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendingStatus {
    Safe,
    Caution,
    Stop,
}

impl SpendingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpendingStatus::Safe => "safe",
            SpendingStatus::Caution => "caution",
            SpendingStatus::Stop => "stop",
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            SpendingStatus::Safe => "🟢",
            SpendingStatus::Caution => "🟡",
            SpendingStatus::Stop => "🔴",
        }
    }
}

impl fmt::Display for SpendingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyVerdict {
    /// Whole dollars.
    pub daily_limit: i64,
    pub status: SpendingStatus,
    pub can_spend_today: bool,
}

/// `max(0, round(remaining / days))`, half away from zero.
pub fn daily_limit(discretionary_remaining: Decimal, days_remaining: i64) -> i64 {
    let days = Decimal::from(days_remaining.max(1));
    let per_day = (discretionary_remaining / days)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    per_day.to_i64().unwrap_or(0).max(0)
}

pub fn classify(
    discretionary_remaining: Decimal,
    days_remaining: i64,
    breakdown: &[CategorySpending],
) -> DailyVerdict {
    let limit = daily_limit(discretionary_remaining, days_remaining);
    let problem_over = breakdown
        .iter()
        .any(|c| c.category == PROBLEM_CATEGORY && c.is_over);
    let status = if limit < STOP_BELOW || discretionary_remaining < Decimal::ZERO {
        SpendingStatus::Stop
    } else if limit < CAUTION_BELOW || problem_over {
        SpendingStatus::Caution
    } else {
        SpendingStatus::Safe
    };
    DailyVerdict {
        daily_limit: limit,
        status,
        can_spend_today: status != SpendingStatus::Stop && limit > 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(category: &str, spent: i64, budget: i64) -> CategorySpending {
        CategorySpending::new(category, Decimal::from(spent), Decimal::from(budget))
    }

    fn within_budget() -> Vec<CategorySpending> {
        vec![row("Delivery", 50, 100), row("Groceries", 20, 175)]
    }

    #[test]
    fn thresholds() {
        let rows = within_budget();
        assert_eq!(classify(Decimal::from(9), 1, &rows).status, SpendingStatus::Stop);
        assert_ne!(classify(Decimal::from(10), 1, &rows).status, SpendingStatus::Stop);
        assert_eq!(
            classify(Decimal::from(29), 1, &rows).status,
            SpendingStatus::Caution
        );
        assert_eq!(classify(Decimal::from(30), 1, &rows).status, SpendingStatus::Safe);
    }

    #[test]
    fn over_budget_total_stops_even_with_days_left() {
        let v = classify(Decimal::from(-5), 3, &within_budget());
        assert_eq!(v.daily_limit, 0);
        assert_eq!(v.status, SpendingStatus::Stop);
        assert!(!v.can_spend_today);
    }

    #[test]
    fn delivery_overspend_forces_caution() {
        let safe = classify(Decimal::from(450), 15, &within_budget());
        assert_eq!(safe.daily_limit, 30);
        assert_eq!(safe.status, SpendingStatus::Safe);
        assert!(safe.can_spend_today);

        let rows = vec![row("Delivery", 130, 100), row("Groceries", 20, 175)];
        let flagged = classify(Decimal::from(450), 15, &rows);
        assert_eq!(flagged.daily_limit, 30);
        assert_eq!(flagged.status, SpendingStatus::Caution);
    }

    #[test]
    fn other_overspent_categories_do_not_force_caution() {
        let rows = vec![row("Groceries", 200, 175)];
        assert_eq!(
            classify(Decimal::from(450), 15, &rows).status,
            SpendingStatus::Safe
        );
    }

    #[test]
    fn rounding_and_monotonicity() {
        assert_eq!(daily_limit(Decimal::new(2450, 2), 1), 25);
        assert_eq!(daily_limit(Decimal::new(2449, 2), 1), 24);
        assert_eq!(daily_limit(Decimal::from(100), 3), 33);
        let mut prev = 0;
        for remaining in (0..600).step_by(7) {
            let l = daily_limit(Decimal::from(remaining), 11);
            assert!(l >= prev);
            prev = l;
        }
        let mut prev = i64::MAX;
        for days in 1..=16 {
            let l = daily_limit(Decimal::from(500), days);
            assert!(l <= prev);
            prev = l;
        }
    }
}
