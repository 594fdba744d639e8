// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::snapshot::BudgetSummary;
use crate::error::AppError;
use crate::store::load_budget_categories;
use crate::utils::{fmt_usd, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let n = conn.execute("DELETE FROM budget_categories WHERE name=?1", params![name])?;
            if n == 0 {
                return Err(AppError::validation(format!("No budget category '{}'", name)).into());
            }
            println!("Removed budget category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim();
    if name.is_empty() {
        return Err(AppError::validation("Category name is required").into());
    }
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())
        .map_err(|e| AppError::validation(format!("{:#}", e)))?;
    let fixed = sub.get_flag("fixed");
    let excluded = sub.get_flag("excluded");
    conn.execute(
        "INSERT INTO budget_categories(name, monthly_budget, is_fixed, is_excluded) VALUES (?1,?2,?3,?4)
         ON CONFLICT(name) DO UPDATE SET monthly_budget=excluded.monthly_budget,
             is_fixed=excluded.is_fixed, is_excluded=excluded.is_excluded",
        params![name, amount.to_string(), fixed, excluded],
    )?;
    println!(
        "Budget set: {} = {}/month{}{}",
        name,
        fmt_usd(amount),
        if fixed { " (fixed)" } else { "" },
        if excluded { " (excluded)" } else { "" }
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let categories = load_budget_categories(conn)?;
    if maybe_print_json(sub.get_flag("json"), &categories)? {
        return Ok(());
    }
    let summary = BudgetSummary::from_categories(&categories);
    let data = categories
        .into_iter()
        .map(|c| {
            let kind = if c.is_excluded {
                "excluded"
            } else if c.is_fixed {
                "fixed"
            } else {
                "variable"
            };
            vec![c.name, fmt_usd(c.monthly_budget), kind.to_string()]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Monthly", "Kind"], data));
    println!(
        "Fixed {} + variable {} = {}",
        fmt_usd(summary.total_fixed),
        fmt_usd(summary.total_variable),
        fmt_usd(summary.total_budget)
    );
    Ok(())
}
