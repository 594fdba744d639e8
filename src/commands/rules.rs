// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::AppError;
use crate::store::load_rules;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};

fn required<'a>(sub: &'a clap::ArgMatches, key: &str) -> Result<&'a str> {
    let v = sub.get_one::<String>(key).unwrap().trim();
    if v.is_empty() {
        return Err(AppError::validation(format!("Rule {} must not be empty", key)).into());
    }
    Ok(v)
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required(sub, "name")?;
            let condition = required(sub, "condition")?;
            let action = required(sub, "action")?;
            conn.execute(
                "INSERT INTO advice_rules(name, condition, action) VALUES (?1,?2,?3)",
                params![name, condition, action],
            )?;
            println!("Added rule {}: if {} then {}", conn.last_insert_rowid(), condition, action);
        }
        Some(("list", sub)) => {
            let rules = load_rules(conn, false)?;
            if maybe_print_json(sub.get_flag("json"), &rules)? {
                return Ok(());
            }
            let data = rules
                .into_iter()
                .map(|r| {
                    vec![
                        r.id.to_string(),
                        r.name,
                        r.condition,
                        r.action,
                        if r.is_active { "yes" } else { "no" }.to_string(),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["ID", "Name", "When", "Then", "Active"], data)
            );
        }
        Some(("toggle", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let n = conn.execute(
                "UPDATE advice_rules SET is_active = 1 - is_active WHERE id=?1",
                params![id],
            )?;
            if n == 0 {
                return Err(AppError::validation(format!("Rule {} not found", id)).into());
            }
            println!("Toggled rule {}", id);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            conn.execute("DELETE FROM advice_rules WHERE id=?1", params![id])?;
            println!("Removed rule {}", id);
        }
        _ => {}
    }
    Ok(())
}
