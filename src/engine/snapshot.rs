// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Profile;
use crate::engine::aggregate::{CategorySpending, DateWindow, aggregate_by_category, bucket_spend};
use crate::engine::discretionary::AllowanceTable;
use crate::engine::pay_period::{PayPeriod, days_until_payday, resolve_pay_period};
use crate::engine::promo::{PromoPayoff, promo_payoff};
use crate::engine::status::{SpendingStatus, classify};
use crate::models::{
    Account, AccountKind, AdviceRule, BudgetCategory, Debt, DebtKind, Goal, Transaction,
};
use crate::store;
use crate::utils::{month_end, month_start};
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct DebtLine {
    #[serde(flatten)]
    pub debt: Debt,
    pub promo: Option<PromoPayoff>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalLine {
    #[serde(flatten)]
    pub goal: Goal,
    pub percent_complete: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetLine {
    pub name: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetSummary {
    pub fixed: Vec<BudgetLine>,
    pub variable: Vec<BudgetLine>,
    pub total_fixed: Decimal,
    pub total_variable: Decimal,
    pub total_budget: Decimal,
}

impl BudgetSummary {
    /// Excluded categories never reach either side of the split.
    pub fn from_categories(categories: &[BudgetCategory]) -> Self {
        let line = |c: &BudgetCategory| BudgetLine {
            name: c.name.clone(),
            amount: c.monthly_budget,
        };
        let fixed: Vec<BudgetLine> = categories
            .iter()
            .filter(|c| c.is_fixed && !c.is_excluded)
            .map(line)
            .collect();
        let variable: Vec<BudgetLine> = categories
            .iter()
            .filter(|c| !c.is_fixed && !c.is_excluded)
            .map(line)
            .collect();
        let total_fixed: Decimal = fixed.iter().map(|l| l.amount).sum();
        let total_variable: Decimal = variable.iter().map(|l| l.amount).sum();
        BudgetSummary {
            fixed,
            variable,
            total_fixed,
            total_variable,
            total_budget: total_fixed + total_variable,
        }
    }
}

/// Calendar-month view over every category seen, measured against the
/// persisted monthly budget rather than the discretionary table.
#[derive(Debug, Clone, Serialize)]
pub struct MonthSummary {
    pub spending: BTreeMap<String, Decimal>,
    pub total_spent: Decimal,
    pub budget_remaining: Decimal,
    pub days_in_month: i64,
    pub day_of_month: i64,
    pub days_remaining: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscretionarySummary {
    pub total_budget: Decimal,
    pub total_spent: Decimal,
    pub remaining: Decimal,
    pub by_category: Vec<CategorySpending>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinancialSnapshot {
    pub as_of: NaiveDate,
    pub user: Profile,
    pub accounts: Vec<Account>,
    /// Same figure as `total_cash`; kept for older readers.
    pub total_savings: Decimal,
    pub total_cash: Decimal,
    pub total_investments: Decimal,
    pub total_credit_card_debt: Decimal,
    pub debts: Vec<DebtLine>,
    pub total_debt_payments: Decimal,
    pub budget: BudgetSummary,
    pub goals: Vec<GoalLine>,
    pub rules: Vec<AdviceRule>,
    pub current_month: MonthSummary,
    pub days_until_payday: i64,
    pub target_monthly_savings: Decimal,
    pub daily_spending_limit: i64,
    pub can_spend_today: bool,
    pub spending_status: SpendingStatus,
    pub pay_period: PayPeriod,
    pub discretionary: DiscretionarySummary,
}

/// Raw rows a snapshot is computed from.
#[derive(Debug, Clone)]
pub struct SnapshotInputs {
    pub profile: Profile,
    pub accounts: Vec<Account>,
    pub debts: Vec<Debt>,
    pub budget_categories: Vec<BudgetCategory>,
    pub goals: Vec<Goal>,
    pub rules: Vec<AdviceRule>,
    /// Must cover at least the calendar month of `today`.
    pub transactions: Vec<Transaction>,
}

impl SnapshotInputs {
    /// Every read must succeed; the first failure aborts the snapshot.
    pub fn load(conn: &Connection, today: NaiveDate) -> Result<Self> {
        let month = DateWindow::new(month_start(today), month_end(today));
        Ok(SnapshotInputs {
            profile: Profile::load(conn).context("Load profile")?,
            accounts: store::load_accounts(conn).context("Load accounts")?,
            debts: store::load_debts(conn).context("Load debts")?,
            budget_categories: store::load_budget_categories(conn)
                .context("Load budget categories")?,
            goals: store::load_goals(conn).context("Load goals")?,
            rules: store::load_rules(conn, true).context("Load rules")?,
            transactions: store::load_transactions(conn, month)?,
        })
    }
}

pub fn build_snapshot(conn: &Connection, today: NaiveDate) -> Result<FinancialSnapshot> {
    let inputs = SnapshotInputs::load(conn, today)?;
    let snap = assemble(inputs, today, &AllowanceTable::default());
    tracing::info!(
        as_of = %snap.as_of,
        daily_limit = snap.daily_spending_limit,
        status = %snap.spending_status,
        "snapshot built"
    );
    Ok(snap)
}

pub fn assemble(
    inputs: SnapshotInputs,
    today: NaiveDate,
    table: &AllowanceTable,
) -> FinancialSnapshot {
    let SnapshotInputs {
        profile,
        accounts,
        debts,
        budget_categories,
        goals,
        rules,
        transactions,
    } = inputs;
    let sign = profile.expense_sign;

    let total_cash: Decimal = accounts
        .iter()
        .filter(|a| a.kind.is_cash())
        .map(|a| a.balance)
        .sum();
    let total_investments: Decimal = accounts
        .iter()
        .filter(|a| a.kind == AccountKind::Investment)
        .map(|a| a.balance)
        .sum();
    let total_credit_card_debt: Decimal = debts
        .iter()
        .filter(|d| d.kind == DebtKind::CreditCard)
        .map(|d| d.balance.unwrap_or(Decimal::ZERO))
        .sum();
    let total_debt_payments: Decimal = debts.iter().map(|d| d.monthly_payment).sum();

    let budget = BudgetSummary::from_categories(&budget_categories);
    let target_monthly_savings = profile.net_monthly_income - budget.total_budget;

    let month_window = DateWindow::new(month_start(today), month_end(today));
    let spending = bucket_spend(&transactions, month_window, sign);
    let total_spent: Decimal = spending.values().copied().sum();
    let days_in_month = i64::from(month_end(today).day());
    let day_of_month = i64::from(today.day());
    let current_month = MonthSummary {
        spending,
        total_spent,
        budget_remaining: budget.total_budget - total_spent,
        days_in_month,
        day_of_month,
        days_remaining: days_in_month - day_of_month,
    };

    let pay_period = resolve_pay_period(today);
    let period_window = DateWindow::new(pay_period.start_date, pay_period.end_date);
    let by_category = aggregate_by_category(&transactions, period_window, table, sign);
    let discretionary_spent: Decimal = by_category.iter().map(|c| c.spent).sum();
    let discretionary_budget = table.total_semi_monthly();
    let discretionary_remaining = discretionary_budget - discretionary_spent;
    let verdict = classify(
        discretionary_remaining,
        pay_period.days_remaining,
        &by_category,
    );

    let debts = debts
        .into_iter()
        .map(|debt| DebtLine {
            promo: promo_payoff(&debt, today),
            debt,
        })
        .collect();
    let goals = goals
        .into_iter()
        .map(|goal| GoalLine {
            percent_complete: goal.percent_complete(),
            goal,
        })
        .collect();

    FinancialSnapshot {
        as_of: today,
        user: profile,
        accounts,
        total_savings: total_cash,
        total_cash,
        total_investments,
        total_credit_card_debt,
        debts,
        total_debt_payments,
        budget,
        goals,
        rules,
        current_month,
        days_until_payday: days_until_payday(today),
        target_monthly_savings,
        daily_spending_limit: verdict.daily_limit,
        can_spend_today: verdict.can_spend_today,
        spending_status: verdict.status,
        pay_period,
        discretionary: DiscretionarySummary {
            total_budget: discretionary_budget,
            total_spent: discretionary_spent,
            remaining: discretionary_remaining,
            by_category,
        },
    }
}
