// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed reads and writes over the SQLite tables.

use crate::engine::aggregate::DateWindow;
use crate::models::{Account, AdviceRule, BudgetCategory, ChatMessage, Debt, Goal, Transaction};
use crate::utils::{row_decimal, row_opt_decimal};
use anyhow::{Context, Result};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::str::FromStr;

fn parse_col<T>(r: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = anyhow::Error>,
{
    let s: String = r.get(idx)?;
    s.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

fn account_from_row(r: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: r.get(0)?,
        name: r.get(1)?,
        kind: parse_col(r, 2)?,
        institution: r.get(3)?,
        balance: row_decimal(r, 4)?,
        last_updated: r.get(5)?,
    })
}

pub fn load_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, type, institution, current_balance, last_updated
         FROM accounts ORDER BY name",
    )?;
    let rows = stmt.query_map([], account_from_row)?;
    let out = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(out)
}

/// `None` when no row has this id.
pub fn load_account(conn: &Connection, id: i64) -> Result<Option<Account>> {
    conn.query_row(
        "SELECT id, name, type, institution, current_balance, last_updated
         FROM accounts WHERE id=?1",
        params![id],
        account_from_row,
    )
    .optional()
    .with_context(|| format!("Load account {}", id))
}

const DEBT_COLUMNS: &str = "SELECT id, name, type, original_amount, current_balance, interest_rate,
            monthly_payment, notes, promo_end_date, promo_rate, post_promo_rate
     FROM debts";

fn debt_from_row(r: &Row<'_>) -> rusqlite::Result<Debt> {
    Ok(Debt {
        id: r.get(0)?,
        name: r.get(1)?,
        kind: parse_col(r, 2)?,
        original_amount: row_opt_decimal(r, 3)?,
        balance: row_opt_decimal(r, 4)?,
        interest_rate: row_opt_decimal(r, 5)?,
        monthly_payment: row_decimal(r, 6)?,
        notes: r.get(7)?,
        promo_end_date: r.get(8)?,
        promo_rate: row_opt_decimal(r, 9)?,
        post_promo_rate: row_opt_decimal(r, 10)?,
    })
}

pub fn load_debts(conn: &Connection) -> Result<Vec<Debt>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY name", DEBT_COLUMNS))?;
    let rows = stmt.query_map([], debt_from_row)?;
    let out = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(out)
}

/// `None` when no row has this id.
pub fn load_debt(conn: &Connection, id: i64) -> Result<Option<Debt>> {
    conn.query_row(
        &format!("{} WHERE id=?1", DEBT_COLUMNS),
        params![id],
        debt_from_row,
    )
    .optional()
    .with_context(|| format!("Load debt {}", id))
}

pub fn load_budget_categories(conn: &Connection) -> Result<Vec<BudgetCategory>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, monthly_budget, is_fixed, is_excluded
         FROM budget_categories ORDER BY is_fixed DESC, name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(BudgetCategory {
            id: r.get(0)?,
            name: r.get(1)?,
            monthly_budget: row_decimal(r, 2)?,
            is_fixed: r.get(3)?,
            is_excluded: r.get(4)?,
        })
    })?;
    let out = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(out)
}

const GOAL_COLUMNS: &str =
    "SELECT id, name, target_amount, current_amount, priority, target_date, notes FROM goals";

fn goal_from_row(r: &Row<'_>) -> rusqlite::Result<Goal> {
    Ok(Goal {
        id: r.get(0)?,
        name: r.get(1)?,
        target_amount: row_decimal(r, 2)?,
        current_amount: row_decimal(r, 3)?,
        priority: r.get(4)?,
        target_date: r.get(5)?,
        notes: r.get(6)?,
    })
}

pub fn load_goals(conn: &Connection) -> Result<Vec<Goal>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY priority, id", GOAL_COLUMNS))?;
    let rows = stmt.query_map([], goal_from_row)?;
    let out = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(out)
}

/// `None` when no row has this id.
pub fn load_goal(conn: &Connection, id: i64) -> Result<Option<Goal>> {
    conn.query_row(
        &format!("{} WHERE id=?1", GOAL_COLUMNS),
        params![id],
        goal_from_row,
    )
    .optional()
    .with_context(|| format!("Load goal {}", id))
}

pub fn load_rules(conn: &Connection, active_only: bool) -> Result<Vec<AdviceRule>> {
    let sql = if active_only {
        "SELECT id, name, condition, action, is_active FROM advice_rules WHERE is_active=1 ORDER BY id"
    } else {
        "SELECT id, name, condition, action, is_active FROM advice_rules ORDER BY id"
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |r| {
        Ok(AdviceRule {
            id: r.get(0)?,
            name: r.get(1)?,
            condition: r.get(2)?,
            action: r.get(3)?,
            is_active: r.get(4)?,
        })
    })?;
    let out = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(out)
}

pub fn load_transactions(conn: &Connection, window: DateWindow) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, description, amount, category, is_excluded, hash
         FROM transactions WHERE date>=?1 AND date<=?2 ORDER BY date, id",
    )?;
    let rows = stmt.query_map(params![window.start, window.end], |r| {
        Ok(Transaction {
            id: r.get(0)?,
            date: r.get(1)?,
            description: r.get(2)?,
            amount: row_decimal(r, 3)?,
            category: r.get(4)?,
            is_excluded: r.get(5)?,
            hash: r.get(6)?,
        })
    })?;
    let out = rows
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("Load transactions {}..{}", window.start, window.end))?;
    Ok(out)
}

/// Inserts unless a row with the same hash exists. Returns whether it was new.
pub fn insert_transaction(conn: &Connection, tx: &Transaction) -> Result<bool> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO transactions(date, description, amount, category, is_excluded, hash)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            tx.date,
            tx.description,
            tx.amount.to_string(),
            tx.category,
            tx.is_excluded,
            tx.hash
        ],
    )?;
    Ok(n == 1)
}

/// The `limit` most recent messages, oldest first.
pub fn recent_chat(conn: &Connection, limit: usize) -> Result<Vec<ChatMessage>> {
    let mut stmt = conn.prepare(
        "SELECT role, content FROM (
             SELECT id, role, content FROM chat_history ORDER BY id DESC LIMIT ?1
         ) ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![limit as i64], |r| {
        Ok(ChatMessage {
            role: parse_col(r, 0)?,
            content: r.get(1)?,
        })
    })?;
    let out = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(out)
}

pub fn append_chat(conn: &Connection, messages: &[ChatMessage]) -> Result<()> {
    let mut stmt = conn.prepare("INSERT INTO chat_history(role, content) VALUES (?1, ?2)")?;
    for m in messages {
        stmt.execute(params![m.role.as_str(), m.content])?;
    }
    Ok(())
}
