// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::as_of;
use crate::engine::snapshot::{FinancialSnapshot, build_snapshot};
use crate::utils::{fmt_usd, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let snap = build_snapshot(conn, as_of(m)?)?;
    if maybe_print_json(m.get_flag("json"), &snap)? {
        return Ok(());
    }
    print_summary(&snap);
    Ok(())
}

fn print_summary(snap: &FinancialSnapshot) {
    let p = &snap.pay_period;
    println!(
        "{} {}  Daily limit: {}  ({} days left in {}..{})",
        snap.spending_status.marker(),
        snap.spending_status.as_str().to_uppercase(),
        fmt_usd(Decimal::from(snap.daily_spending_limit)),
        p.days_remaining,
        p.start_date,
        p.end_date
    );
    println!(
        "Discretionary: {} spent of {}, {} left",
        fmt_usd(snap.discretionary.total_spent),
        fmt_usd(snap.discretionary.total_budget),
        fmt_usd(snap.discretionary.remaining)
    );

    let data = snap
        .discretionary
        .by_category
        .iter()
        .map(|c| {
            vec![
                c.category.clone(),
                fmt_usd(c.spent),
                fmt_usd(c.budget),
                fmt_usd(c.remaining),
                format!("{}%{}", c.percent_used, if c.is_over { " OVER" } else { "" }),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Spent", "Budget", "Remaining", "Used"], data)
    );

    let totals = vec![
        vec!["Cash".to_string(), fmt_usd(snap.total_cash)],
        vec!["Investments".to_string(), fmt_usd(snap.total_investments)],
        vec![
            "Credit card debt".to_string(),
            fmt_usd(snap.total_credit_card_debt),
        ],
        vec![
            "Debt payments / month".to_string(),
            fmt_usd(snap.total_debt_payments),
        ],
        vec!["Monthly budget".to_string(), fmt_usd(snap.budget.total_budget)],
        vec![
            "Target savings / month".to_string(),
            fmt_usd(snap.target_monthly_savings),
        ],
        vec![
            "Month spent / remaining".to_string(),
            format!(
                "{} / {}",
                fmt_usd(snap.current_month.total_spent),
                fmt_usd(snap.current_month.budget_remaining)
            ),
        ],
        vec![
            "Days until payday".to_string(),
            snap.days_until_payday.to_string(),
        ],
    ];
    println!("{}", pretty_table(&["Total", "Amount"], totals));
}
