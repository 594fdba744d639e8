// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::discretionary::{AllowanceTable, FALLBACK_CATEGORY};
use crate::models::{Transaction, percent_of};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Categories that move money without spending it.
pub const NON_SPEND_CATEGORIES: &[&str] = &["Income", "Internal Transfers"];

/// Which sign marks an expense in the stored amounts.
///
/// Exactly one sign counts: a row is spend when its amount has the expense
/// sign and its category is not income or a transfer. Spend is the absolute
/// value of the amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseSign {
    #[default]
    Positive,
    Negative,
}

impl ExpenseSign {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseSign::Positive => "positive",
            ExpenseSign::Negative => "negative",
        }
    }

    pub fn spend_of(&self, tx: &Transaction) -> Option<Decimal> {
        if NON_SPEND_CATEGORIES
            .iter()
            .any(|c| c.eq_ignore_ascii_case(tx.category.trim()))
        {
            return None;
        }
        let is_expense = match self {
            ExpenseSign::Positive => tx.amount.is_sign_positive() && !tx.amount.is_zero(),
            ExpenseSign::Negative => tx.amount.is_sign_negative() && !tx.amount.is_zero(),
        };
        is_expense.then(|| tx.amount.abs())
    }
}

impl FromStr for ExpenseSign {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(ExpenseSign::Positive),
            "negative" => Ok(ExpenseSign::Negative),
            other => Err(anyhow!(
                "Unknown expense sign '{}' (use positive|negative)",
                other
            )),
        }
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateWindow { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySpending {
    pub category: String,
    pub spent: Decimal,
    pub budget: Decimal,
    /// May go negative once the category is overspent.
    pub remaining: Decimal,
    pub percent_used: i64,
    pub is_over: bool,
}

impl CategorySpending {
    pub fn new(category: &str, spent: Decimal, budget: Decimal) -> Self {
        CategorySpending {
            category: category.to_string(),
            spent,
            budget,
            remaining: budget - spent,
            percent_used: percent_of(spent, budget),
            is_over: spent > budget,
        }
    }
}

/// Sums spend per category for non-excluded rows inside `window`.
/// Rows without a category land in "Other".
pub fn bucket_spend(
    transactions: &[Transaction],
    window: DateWindow,
    sign: ExpenseSign,
) -> BTreeMap<String, Decimal> {
    let mut buckets: BTreeMap<String, Decimal> = BTreeMap::new();
    for tx in transactions
        .iter()
        .filter(|t| !t.is_excluded && window.contains(t.date))
    {
        let Some(spent) = sign.spend_of(tx) else {
            continue;
        };
        let category = match tx.category.trim() {
            "" => FALLBACK_CATEGORY,
            c => c,
        };
        *buckets.entry(category.to_string()).or_insert(Decimal::ZERO) += spent;
    }
    buckets
}

/// One record per table entry, in table order, including untouched categories.
pub fn aggregate_by_category(
    transactions: &[Transaction],
    window: DateWindow,
    table: &AllowanceTable,
    sign: ExpenseSign,
) -> Vec<CategorySpending> {
    let buckets = bucket_spend(transactions, window, sign);
    table
        .entries()
        .iter()
        .map(|a| {
            let spent = buckets.get(&a.category).copied().unwrap_or(Decimal::ZERO);
            CategorySpending::new(&a.category, spent, a.semi_monthly)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn tx(day: u32, amount: &str, category: &str, excluded: bool) -> Transaction {
        Transaction {
            id: 0,
            date: d(day),
            description: "x".into(),
            amount: amount.parse().unwrap(),
            category: category.into(),
            is_excluded: excluded,
            hash: String::new(),
        }
    }

    fn window() -> DateWindow {
        DateWindow::new(d(1), d(15))
    }

    #[test]
    fn filters_window_exclusions_and_sign() {
        let txs = vec![
            tx(1, "20.00", "Groceries", false),
            tx(15, "5.50", "Groceries", false),
            tx(16, "99", "Groceries", false),
            tx(3, "40", "Groceries", true),
            tx(4, "-12", "Groceries", false),
            tx(5, "2000", "Income", false),
        ];
        let b = bucket_spend(&txs, window(), ExpenseSign::Positive);
        assert_eq!(b.get("Groceries"), Some(&Decimal::new(2550, 2)));
        assert!(!b.contains_key("Income"));
    }

    #[test]
    fn negative_convention_counts_magnitude() {
        let txs = vec![
            tx(2, "-30", "Delivery", false),
            tx(2, "10", "Delivery", false),
            tx(3, "-500", "Internal Transfers", false),
        ];
        let b = bucket_spend(&txs, window(), ExpenseSign::Negative);
        assert_eq!(b.get("Delivery"), Some(&Decimal::from(30)));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn blank_category_falls_back_to_other() {
        let txs = vec![tx(2, "7", "  ", false)];
        let b = bucket_spend(&txs, window(), ExpenseSign::Positive);
        assert_eq!(b.get("Other"), Some(&Decimal::from(7)));
    }

    #[test]
    fn every_table_category_gets_a_record() {
        let txs = vec![tx(2, "120", "Delivery", false), tx(2, "80", "Rent", false)];
        let table = AllowanceTable::default();
        let rows = aggregate_by_category(&txs, window(), &table, ExpenseSign::Positive);
        assert_eq!(rows.len(), table.entries().len());
        let delivery = rows.iter().find(|r| r.category == "Delivery").unwrap();
        assert_eq!(delivery.remaining, Decimal::from(-20));
        assert_eq!(delivery.percent_used, 120);
        assert!(delivery.is_over);
        let pets = rows.iter().find(|r| r.category == "Pets").unwrap();
        assert_eq!(pets.spent, Decimal::ZERO);
        assert!(!pets.is_over);
        assert!(rows.iter().all(|r| r.category != "Rent"));
    }

    #[test]
    fn zero_budget_reports_zero_percent() {
        let c = CategorySpending::new("Gifts", Decimal::from(15), Decimal::ZERO);
        assert_eq!(c.percent_used, 0);
        assert!(c.is_over);
    }

    #[test]
    fn aggregation_is_repeatable() {
        let txs = vec![tx(2, "12.34", "Shops", false), tx(9, "1", "", false)];
        let table = AllowanceTable::default();
        let a = aggregate_by_category(&txs, window(), &table, ExpenseSign::Positive);
        let b = aggregate_by_category(&txs, window(), &table, ExpenseSign::Positive);
        assert_eq!(a, b);
    }
}
