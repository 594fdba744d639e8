// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{ensure_amounts, parse_deltas};
use crate::config::KEY_LAST_BALANCE_UPDATE;
use crate::error::AppError;
use crate::models::AccountKind;
use crate::store::{load_account, load_accounts};
use crate::utils::{fmt_usd, maybe_print_json, parse_decimal, pretty_table, touch_setting};
use anyhow::Result;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A partial account. Without `id` it describes a new account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountDelta {
    pub id: Option<i64>,
    pub name: Option<String>,
    #[serde(alias = "type")]
    pub kind: Option<AccountKind>,
    pub institution: Option<String>,
    #[serde(alias = "current_balance")]
    pub balance: Option<Decimal>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdateSummary {
    pub updated: usize,
    pub inserted: usize,
}

pub(crate) fn required_name(name: Option<&String>, what: &str) -> Result<String> {
    match name.map(|n| n.trim()).filter(|n| !n.is_empty()) {
        Some(n) => Ok(n.to_string()),
        None => Err(AppError::validation(format!("A new {} needs a name", what)).into()),
    }
}

pub(crate) fn insert_account(conn: &Connection, delta: &AccountDelta) -> Result<i64> {
    let name = required_name(delta.name.as_ref(), "account")?;
    let kind = delta.kind.unwrap_or(AccountKind::Checking);
    let institution = delta
        .institution
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("Not specified");
    conn.execute(
        "INSERT INTO accounts(name, type, institution, current_balance) VALUES (?1, ?2, ?3, ?4)",
        params![
            name,
            kind.as_str(),
            institution,
            delta.balance.unwrap_or(Decimal::ZERO).to_string()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Applies each delta on its own; a failure leaves earlier ones in place.
pub fn apply_updates(conn: &Connection, deltas: &[AccountDelta]) -> Result<UpdateSummary> {
    let mut summary = UpdateSummary::default();
    for delta in deltas {
        ensure_amounts(&[delta.balance])?;
        let Some(id) = delta.id else {
            insert_account(conn, delta)?;
            summary.inserted += 1;
            continue;
        };
        let current = load_account(conn, id)?
            .ok_or_else(|| AppError::validation(format!("Account {} not found", id)))?;
        conn.execute(
            "UPDATE accounts SET name=?1, type=?2, institution=?3, current_balance=?4,
                    last_updated=datetime('now')
             WHERE id=?5",
            params![
                delta.name.as_deref().unwrap_or(&current.name),
                delta.kind.unwrap_or(current.kind).as_str(),
                delta.institution.as_deref().unwrap_or(&current.institution),
                delta.balance.unwrap_or(current.balance).to_string(),
                id
            ],
        )?;
        summary.updated += 1;
    }
    touch_setting(conn, KEY_LAST_BALANCE_UPDATE)?;
    tracing::info!(
        updated = summary.updated,
        inserted = summary.inserted,
        "account balances applied"
    );
    Ok(summary)
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("update", sub)) => {
            let deltas: Vec<AccountDelta> = parse_deltas(sub)?;
            let s = apply_updates(conn, &deltas)?;
            println!("Updated {} account(s), added {}", s.updated, s.inserted);
        }
        Some(("set-balance", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let balance = parse_decimal(sub.get_one::<String>("balance").unwrap())
                .map_err(|e| AppError::validation(format!("{:#}", e)))?;
            apply_updates(
                conn,
                &[AccountDelta {
                    id: Some(id),
                    balance: Some(balance),
                    ..Default::default()
                }],
            )?;
            println!("Account {} balance set to {}", id, fmt_usd(balance));
        }
        Some(("list", sub)) => {
            let accounts = load_accounts(conn)?;
            if maybe_print_json(sub.get_flag("json"), &accounts)? {
                return Ok(());
            }
            let data = accounts
                .into_iter()
                .map(|a| {
                    vec![
                        a.id.to_string(),
                        a.name,
                        a.kind.to_string(),
                        a.institution,
                        fmt_usd(a.balance),
                        a.last_updated.unwrap_or_default(),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(
                    &["ID", "Name", "Type", "Institution", "Balance", "Updated"],
                    data
                )
            );
        }
        _ => {}
    }
    Ok(())
}
