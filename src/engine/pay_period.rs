// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{month_end, month_start};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Last day of the first half-month period.
pub const FIRST_PAYDAY: u32 = 15;

/// One half of a semi-monthly pay cycle: the 1st..=15th or the 16th..=month end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PayPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// 1-based position of the reference date in the period.
    pub day_in_period: i64,
    pub total_days: i64,
    /// Includes the reference date itself; never below 1.
    pub days_remaining: i64,
}

impl PayPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

pub fn resolve_pay_period(today: NaiveDate) -> PayPeriod {
    let first = month_start(today);
    let (start_date, end_date) = if today.day() <= FIRST_PAYDAY {
        (first, first.with_day(FIRST_PAYDAY).unwrap_or(first))
    } else {
        (
            first.with_day(FIRST_PAYDAY + 1).unwrap_or(first),
            month_end(today),
        )
    };
    let total_days = (end_date - start_date).num_days() + 1;
    let day_in_period = (today - start_date).num_days() + 1;
    PayPeriod {
        start_date,
        end_date,
        day_in_period,
        total_days,
        days_remaining: (total_days - day_in_period + 1).max(1),
    }
}

/// Days until the next payday (15th or last day of month). On the last day
/// itself this reports 15, the length of the next first-half wait, without
/// rolling into next month's calendar.
pub fn days_until_payday(today: NaiveDate) -> i64 {
    let day = i64::from(today.day());
    let last = i64::from(month_end(today).day());
    let payday = i64::from(FIRST_PAYDAY);
    if day < payday {
        payday - day
    } else if day < last {
        last - day
    } else {
        payday
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn fifteenth_closes_first_period() {
        let p = resolve_pay_period(d(2025, 6, 15));
        assert_eq!(p.start_date, d(2025, 6, 1));
        assert_eq!(p.end_date, d(2025, 6, 15));
        assert_eq!(p.day_in_period, 15);
        assert_eq!(p.total_days, 15);
        assert_eq!(p.days_remaining, 1);
    }

    #[test]
    fn sixteenth_opens_second_period() {
        let p = resolve_pay_period(d(2025, 6, 16));
        assert_eq!(p.start_date, d(2025, 6, 16));
        assert_eq!(p.end_date, d(2025, 6, 30));
        assert_eq!(p.day_in_period, 1);
        assert_eq!(p.total_days, 15);
        assert_eq!(p.days_remaining, 15);
    }

    #[test]
    fn leap_february_second_half() {
        let p = resolve_pay_period(d(2024, 2, 20));
        assert_eq!(p.end_date, d(2024, 2, 29));
        assert_eq!(p.total_days, 14);
        assert_eq!(p.days_remaining, 10);

        let p = resolve_pay_period(d(2025, 2, 28));
        assert_eq!(p.end_date, d(2025, 2, 28));
        assert_eq!(p.total_days, 13);
        assert_eq!(p.days_remaining, 1);
    }

    #[test]
    fn periods_partition_every_month() {
        for (y, m) in [(2024, 2), (2025, 2), (2025, 4), (2025, 7), (2025, 12)] {
            let last = month_end(d(y, m, 1)).day();
            let mut first_half = 0;
            let mut second_half = 0;
            for day in 1..=last {
                let date = d(y, m, day);
                let p = resolve_pay_period(date);
                assert!(p.contains(date));
                assert!(p.days_remaining >= 1);
                assert_eq!(p.day_in_period + p.days_remaining - 1, p.total_days);
                if p.start_date.day() == 1 {
                    assert_eq!(p.end_date.day(), 15);
                    first_half += 1;
                } else {
                    assert_eq!(p.start_date.day(), 16);
                    assert_eq!(p.end_date.day(), last);
                    second_half += 1;
                }
            }
            assert_eq!(first_half, 15);
            assert_eq!(first_half + second_half, last);
        }
    }

    #[test]
    fn payday_countdown() {
        assert_eq!(days_until_payday(d(2025, 6, 1)), 14);
        assert_eq!(days_until_payday(d(2025, 6, 15)), 15);
        assert_eq!(days_until_payday(d(2025, 6, 20)), 10);
        assert_eq!(days_until_payday(d(2025, 6, 30)), 15);
        assert_eq!(days_until_payday(d(2024, 2, 28)), 1);
    }
}
