// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::accounts::{AccountDelta, insert_account, required_name};
use crate::commands::{ensure_amounts, parse_deltas};
use crate::config::{KEY_LAST_BALANCE_UPDATE, KEY_LAST_IMPORT, KEY_ONBOARDING_COMPLETE};
use crate::store::{load_accounts, load_debts, load_goals};
use crate::utils::{get_setting, maybe_print_json, set_setting, touch_setting};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnboardingStatus {
    pub complete: bool,
    pub missing_data: Vec<&'static str>,
    pub last_balance_update: Option<String>,
    pub last_transaction_import: Option<String>,
}

pub fn status(conn: &Connection) -> Result<OnboardingStatus> {
    let accounts = load_accounts(conn)?;
    let debts = load_debts(conn)?;
    let goals = load_goals(conn)?;

    let mut missing_data = Vec::new();
    if !accounts.iter().any(|a| a.balance > Decimal::ZERO) {
        missing_data.push("account_balances");
    }
    if debts.is_empty() || debts.iter().any(|d| d.balance.is_none()) {
        missing_data.push("debt_balances");
    }
    if goals.is_empty() {
        missing_data.push("goals");
    }

    Ok(OnboardingStatus {
        complete: get_setting(conn, KEY_ONBOARDING_COMPLETE)?.as_deref() == Some("true"),
        missing_data,
        last_balance_update: get_setting(conn, KEY_LAST_BALANCE_UPDATE)?,
        last_transaction_import: get_setting(conn, KEY_LAST_IMPORT)?,
    })
}

/// Drops every account and inserts the given ones. Entries are checked before
/// anything is deleted; the delete and inserts themselves are not atomic.
pub fn replace_accounts(conn: &Connection, accounts: &[AccountDelta]) -> Result<usize> {
    for a in accounts {
        required_name(a.name.as_ref(), "account")?;
        ensure_amounts(&[a.balance])?;
    }
    let removed = conn.execute("DELETE FROM accounts", [])?;
    for a in accounts {
        insert_account(conn, a)?;
    }
    touch_setting(conn, KEY_LAST_BALANCE_UPDATE)?;
    tracing::info!(removed, inserted = accounts.len(), "accounts replaced");
    Ok(accounts.len())
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("accounts", sub)) => {
            let accounts: Vec<AccountDelta> = parse_deltas(sub)?;
            let n = replace_accounts(conn, &accounts)?;
            println!("Saved {} account(s)", n);
        }
        Some(("status", sub)) => {
            let st = status(conn)?;
            if maybe_print_json(sub.get_flag("json"), &st)? {
                return Ok(());
            }
            println!("Complete: {}", if st.complete { "yes" } else { "no" });
            if st.missing_data.is_empty() {
                println!("Missing: nothing");
            } else {
                println!("Missing: {}", st.missing_data.join(", "));
            }
            println!(
                "Last balance update: {}",
                st.last_balance_update.as_deref().unwrap_or("never")
            );
            println!(
                "Last transaction import: {}",
                st.last_transaction_import.as_deref().unwrap_or("never")
            );
        }
        Some(("complete", _)) => {
            set_setting(conn, KEY_ONBOARDING_COMPLETE, "true")?;
            touch_setting(conn, KEY_LAST_BALANCE_UPDATE)?;
            println!("Onboarding marked complete");
        }
        _ => {}
    }
    Ok(())
}
