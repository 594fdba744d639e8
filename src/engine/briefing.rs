// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Renders a snapshot as the system briefing for the advisor model.
//! Every number here is already decided by the snapshot.

use crate::engine::snapshot::{DebtLine, FinancialSnapshot};
use crate::models::AccountKind;
use crate::utils::fmt_usd;
use rust_decimal::Decimal;

fn pct(d: Decimal) -> String {
    format!("{}%", d.normalize())
}

fn debt_line(line: &DebtLine) -> String {
    let d = &line.debt;
    let mut s = match d.balance {
        Some(b) => format!("- {}: {} remaining", d.name, fmt_usd(b)),
        None => format!("- {}: balance unknown", d.name),
    };
    if let Some(p) = &line.promo {
        let after = d
            .post_promo_rate
            .map(pct)
            .unwrap_or_else(|| "the standard rate".to_string());
        s.push_str(&format!(
            " at {} (PROMO ends {} - {} months left, then {})",
            pct(d.promo_rate.unwrap_or(Decimal::ZERO)),
            p.promo_end_date.format("%b %Y"),
            p.months_remaining,
            after
        ));
    } else if let Some(rate) = d.interest_rate {
        s.push_str(&format!(" at {}", pct(rate)));
    }
    s.push_str(&format!(", paying {}/month", fmt_usd(d.monthly_payment)));
    if let Some(notes) = d.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        s.push_str(&format!(". {}", notes.trim()));
    }
    s
}

fn promo_alert(line: &DebtLine) -> Option<String> {
    let p = line.promo.as_ref()?;
    let d = &line.debt;
    let balance = d
        .balance
        .map(fmt_usd)
        .unwrap_or_else(|| "an unknown balance".to_string());
    let after = d
        .post_promo_rate
        .map(pct)
        .unwrap_or_else(|| "the standard rate".to_string());
    let verdict = if p.on_track {
        "✅ ON TRACK"
    } else {
        "⚠️ NEED TO INCREASE PAYMENTS"
    };
    Some(format!(
        "The {} has {} at {} APR that MUST be paid off by {} or it jumps to {} APR.\n\
         - {} months remaining\n\
         - Need to pay ~{}/month to pay off in time\n\
         - Current payment: {}/month\n\
         - {}",
        d.name,
        balance,
        pct(d.promo_rate.unwrap_or(Decimal::ZERO)),
        p.promo_end_date.format("%B %Y"),
        after,
        p.months_remaining,
        fmt_usd(p.monthly_needed),
        fmt_usd(p.current_payment),
        verdict
    ))
}

fn accounts_of(snap: &FinancialSnapshot, pick: impl Fn(AccountKind) -> bool) -> Vec<String> {
    snap.accounts
        .iter()
        .filter(|a| pick(a.kind))
        .map(|a| format!("- {}: {}", a.name, fmt_usd(a.balance)))
        .collect()
}

fn budget_list(lines: &[crate::engine::snapshot::BudgetLine]) -> String {
    lines
        .iter()
        .map(|l| format!("{} {}", l.name, fmt_usd(l.amount)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_advisor_briefing(snap: &FinancialSnapshot) -> String {
    let name = &snap.user.name;
    let limit = fmt_usd(Decimal::from(snap.daily_spending_limit));
    let income = snap.user.net_monthly_income;
    let mut out: Vec<String> = Vec::new();

    out.push(format!(
        "You are {}'s personal financial advisor. Your PRIMARY job is to say how much they can spend TODAY and whether they should save or spend.",
        name
    ));
    out.push(String::new());
    out.push(format!(
        "## TODAY'S SPENDING STATUS {}",
        snap.spending_status.marker()
    ));
    out.push(format!("**Daily spending limit: {}**", limit));
    out.push(format!(
        "Status: {} {}",
        snap.spending_status.as_str().to_uppercase(),
        if snap.can_spend_today {
            "- Can spend up to daily limit"
        } else {
            "- STOP discretionary spending"
        }
    ));
    out.push(format!(
        "Pay period: {} to {} (day {} of {}, {} days left including today)",
        snap.pay_period.start_date,
        snap.pay_period.end_date,
        snap.pay_period.day_in_period,
        snap.pay_period.total_days,
        snap.pay_period.days_remaining
    ));
    out.push(format!(
        "Discretionary this period: {} spent of {}, {} left",
        fmt_usd(snap.discretionary.total_spent),
        fmt_usd(snap.discretionary.total_budget),
        fmt_usd(snap.discretionary.remaining)
    ));
    for c in snap.discretionary.by_category.iter().filter(|c| c.is_over) {
        out.push(format!(
            "- OVER: {} {} of {} ({}%)",
            c.category,
            fmt_usd(c.spent),
            fmt_usd(c.budget),
            c.percent_used
        ));
    }
    out.push(String::new());
    out.push("## Current Date".to_string());
    out.push(snap.as_of.format("%A, %B %-d, %Y").to_string());
    out.push(String::new());

    out.push(format!("## {}'s Financial Profile", name));
    out.push(String::new());
    out.push(format!(
        "**Income:** {}/month net ({} per paycheck on the 15th and last day of month)",
        fmt_usd(income),
        fmt_usd(income / Decimal::TWO)
    ));
    out.push(format!(
        "**Days until next payday:** {}",
        snap.days_until_payday
    ));
    out.push(String::new());
    out.push(format!("**Cash Available:** {}", fmt_usd(snap.total_cash)));
    out.extend(accounts_of(snap, |k| k.is_cash()));
    out.push(String::new());
    out.push(format!(
        "**Investments:** {}",
        fmt_usd(snap.total_investments)
    ));
    out.extend(accounts_of(snap, |k| k == AccountKind::Investment));
    out.push(String::new());
    out.push(format!(
        "**Credit Card Debt:** {}",
        fmt_usd(snap.total_credit_card_debt)
    ));
    out.push(String::new());
    out.push(format!(
        "**Monthly Budget:** {} total",
        fmt_usd(snap.budget.total_budget)
    ));
    out.push(format!(
        "- Fixed costs: {} ({})",
        fmt_usd(snap.budget.total_fixed),
        budget_list(&snap.budget.fixed)
    ));
    out.push(format!(
        "- Variable: {} ({})",
        fmt_usd(snap.budget.total_variable),
        budget_list(&snap.budget.variable)
    ));
    out.push(String::new());
    out.push(format!(
        "**Target Savings:** {}/month",
        fmt_usd(snap.target_monthly_savings)
    ));
    out.push(String::new());
    out.push("**Debts:**".to_string());
    out.extend(snap.debts.iter().map(debt_line));
    out.push(String::new());
    out.push("**Goals (in priority order):**".to_string());
    out.extend(snap.goals.iter().map(|g| {
        format!(
            "{}. {}: {}/{} ({}%)",
            g.goal.priority,
            g.goal.name,
            fmt_usd(g.goal.current_amount),
            fmt_usd(g.goal.target_amount),
            g.percent_complete
        )
    }));
    out.push(String::new());

    let m = &snap.current_month;
    out.push(format!(
        "**This Month (Day {}/{}):**",
        m.day_of_month, m.days_in_month
    ));
    out.push(format!("- Total spent: {}", fmt_usd(m.total_spent)));
    out.push(format!("- Budget remaining: {}", fmt_usd(m.budget_remaining)));
    if m.spending.is_empty() {
        out.push("- No transactions recorded this month yet".to_string());
    } else {
        let parts: Vec<String> = m
            .spending
            .iter()
            .map(|(cat, amt)| format!("{}: {}", cat, fmt_usd(*amt)))
            .collect();
        out.push(format!("- By category: {}", parts.join(", ")));
    }
    out.push(String::new());
    out.push("**Active Rules:**".to_string());
    out.extend(
        snap.rules
            .iter()
            .map(|r| format!("- {}: if {} then {}", r.name, r.condition, r.action)),
    );
    out.push(String::new());

    out.push("## Your Role".to_string());
    out.push(String::new());
    out.push(format!(
        "1. **DAILY SPENDING ADVISOR (PRIMARY):** Always lead with how much {} can spend today. The daily limit of {} is the discretionary budget left this pay period divided by the days left in it.",
        name, limit
    ));
    out.push(String::new());
    out.push("2. **Purchase Decisions:** When asked \"Can I buy X?\":".to_string());
    out.push(format!(
        "   - If cost <= daily limit: \"Yes, this fits within today's {} limit\"",
        limit
    ));
    out.push(
        "   - If cost > daily limit but <= weekly (daily * 7): \"This would use X days of budget. Can you wait?\""
            .to_string(),
    );
    out.push("   - If cost is large: Calculate impact on goals and savings".to_string());
    out.push(String::new());
    out.push("3. **Save vs Spend Advice:** Be direct. \"Save\" or \"Spend\" with clear reasoning.".to_string());
    out.push(String::new());
    out.push("4. **Future Planning:** Help plan for upcoming expenses by calculating how they affect cash flow.".to_string());
    out.push(String::new());
    out.push("5. **Debt Optimization:** Always consider interest rates and promo periods.".to_string());

    let alerts: Vec<String> = snap.debts.iter().filter_map(promo_alert).collect();
    if !alerts.is_empty() {
        out.push(String::new());
        out.push("## CRITICAL: Promo Rate Alert".to_string());
        out.push(alerts.join("\n\n"));
    }

    out.push(String::new());
    out.push("## Response Style".to_string());
    out.push(String::new());
    for line in [
        "- Be direct and concise",
        "- Lead with the answer (yes/no), then explain",
        "- Use specific numbers from the data above",
        "- Don't lecture",
        "- Celebrate progress when warranted",
        "- Push back on bad decisions, but respect autonomy",
    ] {
        out.push(line.to_string());
    }
    out.join("\n")
}
