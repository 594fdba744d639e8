// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::accounts::{UpdateSummary, required_name};
use crate::commands::{ensure_amounts, parse_deltas};
use crate::engine::snapshot::GoalLine;
use crate::error::AppError;
use crate::store::{load_goal, load_goals};
use crate::utils::{fmt_usd, maybe_print_json, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalDelta {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub target_amount: Option<Decimal>,
    pub current_amount: Option<Decimal>,
    pub priority: Option<i64>,
    pub target_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

pub fn apply_updates(conn: &Connection, deltas: &[GoalDelta]) -> Result<UpdateSummary> {
    let mut summary = UpdateSummary::default();
    for delta in deltas {
        ensure_amounts(&[delta.target_amount, delta.current_amount])?;
        let Some(id) = delta.id else {
            let name = required_name(delta.name.as_ref(), "goal")?;
            conn.execute(
                "INSERT INTO goals(name, target_amount, current_amount, priority, target_date, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    name,
                    delta.target_amount.unwrap_or(Decimal::ZERO).to_string(),
                    delta.current_amount.unwrap_or(Decimal::ZERO).to_string(),
                    delta.priority.unwrap_or(99),
                    delta.target_date,
                    delta.notes,
                ],
            )?;
            summary.inserted += 1;
            continue;
        };
        let cur = load_goal(conn, id)?
            .ok_or_else(|| AppError::validation(format!("Goal {} not found", id)))?;
        conn.execute(
            "UPDATE goals SET name=?1, target_amount=?2, current_amount=?3, priority=?4,
                    target_date=?5, notes=?6
             WHERE id=?7",
            params![
                delta.name.as_deref().unwrap_or(&cur.name),
                delta.target_amount.unwrap_or(cur.target_amount).to_string(),
                delta.current_amount.unwrap_or(cur.current_amount).to_string(),
                delta.priority.unwrap_or(cur.priority),
                delta.target_date.or(cur.target_date),
                delta.notes.as_ref().or(cur.notes.as_ref()),
                id
            ],
        )?;
        summary.updated += 1;
    }
    tracing::info!(
        updated = summary.updated,
        inserted = summary.inserted,
        "goal updates applied"
    );
    Ok(summary)
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("update", sub)) => {
            let deltas: Vec<GoalDelta> = parse_deltas(sub)?;
            let s = apply_updates(conn, &deltas)?;
            println!("Updated {} goal(s), added {}", s.updated, s.inserted);
        }
        Some(("list", sub)) => {
            let lines: Vec<GoalLine> = load_goals(conn)?
                .into_iter()
                .map(|goal| GoalLine {
                    percent_complete: goal.percent_complete(),
                    goal,
                })
                .collect();
            if maybe_print_json(sub.get_flag("json"), &lines)? {
                return Ok(());
            }
            let data = lines
                .into_iter()
                .map(|l| {
                    vec![
                        l.goal.priority.to_string(),
                        l.goal.id.to_string(),
                        l.goal.name,
                        fmt_usd(l.goal.current_amount),
                        fmt_usd(l.goal.target_amount),
                        format!("{}%", l.percent_complete),
                        l.goal
                            .target_date
                            .map(|d| d.to_string())
                            .unwrap_or_default(),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(
                    &["Priority", "ID", "Goal", "Saved", "Target", "Done", "By"],
                    data
                )
            );
        }
        _ => {}
    }
    Ok(())
}
