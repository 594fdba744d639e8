// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{KEY_EXPENSE_SIGN, KEY_NET_INCOME, KEY_PAY_SCHEDULE, KEY_USER_NAME, Profile};
use crate::engine::aggregate::ExpenseSign;
use crate::error::AppError;
use crate::utils::{fmt_usd, maybe_print_json, parse_decimal, set_setting};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let mut changed = 0;
            if let Some(name) = sub.get_one::<String>("name") {
                set_setting(conn, KEY_USER_NAME, name.trim())?;
                changed += 1;
            }
            if let Some(raw) = sub.get_one::<String>("income") {
                let income = parse_decimal(raw)
                    .map_err(|e| AppError::validation(format!("{:#}", e)))?;
                set_setting(conn, KEY_NET_INCOME, &income.to_string())?;
                changed += 1;
            }
            if let Some(schedule) = sub.get_one::<String>("pay_schedule") {
                set_setting(conn, KEY_PAY_SCHEDULE, schedule.trim())?;
                changed += 1;
            }
            if let Some(raw) = sub.get_one::<String>("expense_sign") {
                let sign: ExpenseSign = raw
                    .parse()
                    .map_err(|e| AppError::validation(format!("{:#}", e)))?;
                set_setting(conn, KEY_EXPENSE_SIGN, sign.as_str())?;
                changed += 1;
            }
            println!("Updated {} profile setting(s)", changed);
        }
        Some(("show", sub)) => {
            let p = Profile::load(conn)?;
            if maybe_print_json(sub.get_flag("json"), &p)? {
                return Ok(());
            }
            println!("Name: {}", p.name);
            println!("Net monthly income: {}", fmt_usd(p.net_monthly_income));
            println!("Pay schedule: {}", p.pay_schedule);
            println!("Expenses are: {} amounts", p.expense_sign.as_str());
        }
        _ => {}
    }
    Ok(())
}
