// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::categorizer::Categorizer;
use crate::commands::as_of;
use crate::engine::aggregate::DateWindow;
use crate::error::AppError;
use crate::models::Transaction;
use crate::store::load_transactions;
use crate::utils::{fmt_usd, maybe_print_json, month_end, month_start, parse_date, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, params};

/// Confidence given to a category the user assigned by hand.
const MANUAL_CONFIDENCE: f64 = 0.95;

pub fn handle(
    conn: &Connection,
    m: &clap::ArgMatches,
    categorizer: &mut Categorizer,
) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("exclude", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let excluded = !sub.get_flag("undo");
            let n = conn.execute(
                "UPDATE transactions SET is_excluded=?1 WHERE id=?2",
                params![excluded, id],
            )?;
            if n == 0 {
                return Err(AppError::validation(format!("Transaction {} not found", id)).into());
            }
            println!(
                "Transaction {} {}",
                id,
                if excluded { "excluded" } else { "included" }
            );
        }
        Some(("categorize", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let category = sub.get_one::<String>("category").unwrap().trim();
            if category.is_empty() {
                return Err(AppError::validation("Category is required").into());
            }
            let n = conn.execute(
                "UPDATE transactions SET category=?1 WHERE id=?2",
                params![category, id],
            )?;
            if n == 0 {
                return Err(AppError::validation(format!("Transaction {} not found", id)).into());
            }
            if sub.get_flag("learn") {
                let description: String = conn.query_row(
                    "SELECT description FROM transactions WHERE id=?1",
                    params![id],
                    |r| r.get(0),
                )?;
                categorizer.learn(conn, &description, category, MANUAL_CONFIDENCE)?;
            }
            println!("Transaction {} -> {}", id, category);
        }
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let today = as_of(sub)?;
    let bound = |key: &str, default: NaiveDate| -> Result<NaiveDate> {
        match sub.get_one::<String>(key) {
            Some(raw) => parse_date(raw)
                .map_err(|e| anyhow::Error::from(AppError::validation(format!("{:#}", e)))),
            None => Ok(default),
        }
    };
    let window = DateWindow::new(
        bound("from", month_start(today))?,
        bound("to", month_end(today))?,
    );
    let category = sub.get_one::<String>("category").map(|c| c.trim());
    let mut rows: Vec<Transaction> = load_transactions(conn, window)?
        .into_iter()
        .filter(|t| category.is_none_or(|c| t.category.eq_ignore_ascii_case(c)))
        .collect();
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    if maybe_print_json(sub.get_flag("json"), &rows)? {
        return Ok(());
    }
    let data = rows
        .into_iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.date.to_string(),
                t.description,
                fmt_usd(t.amount),
                t.category,
                if t.is_excluded { "yes" } else { "" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Description", "Amount", "Category", "Excluded"],
            data
        )
    );
    Ok(())
}
