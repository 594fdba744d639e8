// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::accounts::{UpdateSummary, required_name};
use crate::commands::{as_of, ensure_amounts, parse_deltas};
use crate::config::KEY_LAST_BALANCE_UPDATE;
use crate::engine::promo::promo_payoff;
use crate::engine::snapshot::DebtLine;
use crate::error::AppError;
use crate::models::DebtKind;
use crate::store::{load_debt, load_debts};
use crate::utils::{fmt_usd, maybe_print_json, pretty_table, touch_setting};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DebtDelta {
    pub id: Option<i64>,
    pub name: Option<String>,
    #[serde(alias = "type")]
    pub kind: Option<DebtKind>,
    pub original_amount: Option<Decimal>,
    #[serde(alias = "current_balance")]
    pub balance: Option<Decimal>,
    pub interest_rate: Option<Decimal>,
    pub monthly_payment: Option<Decimal>,
    pub notes: Option<String>,
    pub promo_end_date: Option<NaiveDate>,
    pub promo_rate: Option<Decimal>,
    pub post_promo_rate: Option<Decimal>,
}

fn text(d: Option<Decimal>) -> Option<String> {
    d.map(|v| v.to_string())
}

pub fn apply_updates(conn: &Connection, deltas: &[DebtDelta]) -> Result<UpdateSummary> {
    let mut summary = UpdateSummary::default();
    for delta in deltas {
        ensure_amounts(&[
            delta.original_amount,
            delta.balance,
            delta.interest_rate,
            delta.monthly_payment,
            delta.promo_rate,
            delta.post_promo_rate,
        ])?;
        let Some(id) = delta.id else {
            let name = required_name(delta.name.as_ref(), "debt")?;
            conn.execute(
                "INSERT INTO debts(name, type, original_amount, current_balance, interest_rate,
                                   monthly_payment, notes, promo_end_date, promo_rate, post_promo_rate)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    name,
                    delta.kind.unwrap_or(DebtKind::Other).as_str(),
                    text(delta.original_amount),
                    text(delta.balance),
                    text(delta.interest_rate),
                    delta.monthly_payment.unwrap_or(Decimal::ZERO).to_string(),
                    delta.notes,
                    delta.promo_end_date,
                    text(delta.promo_rate),
                    text(delta.post_promo_rate),
                ],
            )?;
            summary.inserted += 1;
            continue;
        };
        let cur = load_debt(conn, id)?
            .ok_or_else(|| AppError::validation(format!("Debt {} not found", id)))?;
        conn.execute(
            "UPDATE debts SET name=?1, type=?2, original_amount=?3, current_balance=?4,
                    interest_rate=?5, monthly_payment=?6, notes=?7, promo_end_date=?8,
                    promo_rate=?9, post_promo_rate=?10, last_updated=datetime('now')
             WHERE id=?11",
            params![
                delta.name.as_deref().unwrap_or(&cur.name),
                delta.kind.unwrap_or(cur.kind).as_str(),
                text(delta.original_amount.or(cur.original_amount)),
                text(delta.balance.or(cur.balance)),
                text(delta.interest_rate.or(cur.interest_rate)),
                delta.monthly_payment.unwrap_or(cur.monthly_payment).to_string(),
                delta.notes.as_ref().or(cur.notes.as_ref()),
                delta.promo_end_date.or(cur.promo_end_date),
                text(delta.promo_rate.or(cur.promo_rate)),
                text(delta.post_promo_rate.or(cur.post_promo_rate)),
                id
            ],
        )?;
        summary.updated += 1;
    }
    touch_setting(conn, KEY_LAST_BALANCE_UPDATE)?;
    tracing::info!(
        updated = summary.updated,
        inserted = summary.inserted,
        "debt updates applied"
    );
    Ok(summary)
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("update", sub)) => {
            let deltas: Vec<DebtDelta> = parse_deltas(sub)?;
            let s = apply_updates(conn, &deltas)?;
            println!("Updated {} debt(s), added {}", s.updated, s.inserted);
        }
        Some(("list", sub)) => {
            let today = as_of(sub)?;
            let lines: Vec<DebtLine> = load_debts(conn)?
                .into_iter()
                .map(|debt| DebtLine {
                    promo: promo_payoff(&debt, today),
                    debt,
                })
                .collect();
            if maybe_print_json(sub.get_flag("json"), &lines)? {
                return Ok(());
            }
            let data = lines
                .into_iter()
                .map(|l| {
                    let promo = match &l.promo {
                        Some(p) => format!(
                            "ends {} ({} mo): need {}/mo, {}",
                            p.promo_end_date,
                            p.months_remaining,
                            fmt_usd(p.monthly_needed),
                            if p.on_track { "on track" } else { "BEHIND" }
                        ),
                        None => String::new(),
                    };
                    vec![
                        l.debt.id.to_string(),
                        l.debt.name,
                        l.debt.kind.to_string(),
                        l.debt
                            .balance
                            .map(fmt_usd)
                            .unwrap_or_else(|| "unknown".to_string()),
                        l.debt
                            .interest_rate
                            .map(|r| format!("{}%", r.normalize()))
                            .unwrap_or_default(),
                        fmt_usd(l.debt.monthly_payment),
                        promo,
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(
                    &["ID", "Name", "Type", "Balance", "Rate", "Payment", "Promo"],
                    data
                )
            );
        }
        _ => {}
    }
    Ok(())
}
