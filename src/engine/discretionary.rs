// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Compiled-in allowances for day-to-day spending.
//!
//! This table is separate from the user-editable `budget_categories` rows:
//! those are monthly and drive the fixed/variable totals, this one is
//! semi-monthly and drives only the daily limit.

use rust_decimal::Decimal;
use serde::Serialize;

/// Category whose overspend alone is enough to raise a caution.
pub const PROBLEM_CATEGORY: &str = "Delivery";

/// Bucket for transactions that arrive without a category.
pub const FALLBACK_CATEGORY: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Allowance {
    pub category: String,
    pub monthly: Decimal,
    pub semi_monthly: Decimal,
}

impl Allowance {
    /// Semi-monthly defaults to half the monthly figure.
    pub fn new(category: &str, monthly: Decimal) -> Self {
        Allowance {
            category: category.to_string(),
            monthly,
            semi_monthly: monthly / Decimal::TWO,
        }
    }

    pub fn with_semi_monthly(mut self, semi_monthly: Decimal) -> Self {
        self.semi_monthly = semi_monthly;
        self
    }
}

/// Ordered category -> allowance table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllowanceTable {
    entries: Vec<Allowance>,
}

impl AllowanceTable {
    pub fn new(entries: Vec<Allowance>) -> Self {
        AllowanceTable { entries }
    }

    pub fn entries(&self) -> &[Allowance] {
        &self.entries
    }

    pub fn get(&self, category: &str) -> Option<&Allowance> {
        self.entries.iter().find(|a| a.category == category)
    }

    pub fn total_semi_monthly(&self) -> Decimal {
        self.entries.iter().map(|a| a.semi_monthly).sum()
    }

    pub fn total_monthly(&self) -> Decimal {
        self.entries.iter().map(|a| a.monthly).sum()
    }
}

impl Default for AllowanceTable {
    fn default() -> Self {
        let d = |v: i64| Decimal::from(v);
        AllowanceTable::new(vec![
            Allowance::new("Groceries", d(350)),
            Allowance::new("Delivery", d(200)),
            Allowance::new("Transportation", d(375)),
            Allowance::new("Restaurants", d(300)),
            Allowance::new("Entertainment", d(150)),
            Allowance::new("Bars & Nightlife", d(150)),
            Allowance::new("Shops", d(150)),
            Allowance::new("Other", d(100)),
            Allowance::new("Healthcare", d(200)),
            Allowance::new("Pets", d(275)),
        ])
    }
}
