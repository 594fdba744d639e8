// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::advisor::Advisor;
use crate::commands::as_of;
use crate::engine::briefing::render_advisor_briefing;
use crate::engine::snapshot::build_snapshot;
use crate::error::AppError;
use crate::models::ChatMessage;
use crate::store::{append_chat, recent_chat};
use crate::utils::{fmt_usd, maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

/// Prior turns sent along with each new message.
pub const HISTORY_LIMIT: usize = 20;

/// Just enough of the snapshot for a caller to refresh its header.
#[derive(Debug, Serialize)]
pub struct MiniSnapshot {
    pub total_savings: Decimal,
    pub budget_remaining: Decimal,
    pub days_until_payday: i64,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub snapshot: MiniSnapshot,
}

fn required_message(message: &str) -> Result<&str> {
    let message = message.trim();
    if message.is_empty() {
        return Err(AppError::validation("Message is required").into());
    }
    Ok(message)
}

/// One chat turn. The question and answer are stored together only once the
/// advisor has replied.
pub fn send(
    conn: &Connection,
    advisor: &dyn Advisor,
    message: &str,
    today: NaiveDate,
) -> Result<ChatReply> {
    let message = required_message(message)?;

    let snap = build_snapshot(conn, today)?;
    let briefing = render_advisor_briefing(&snap);
    let history = recent_chat(conn, HISTORY_LIMIT)?;

    let response = advisor
        .reply(&briefing, &history, message)
        .context("Failed to process chat")?;

    append_chat(
        conn,
        &[
            ChatMessage::user(message),
            ChatMessage::assistant(response.as_str()),
        ],
    )?;
    tracing::info!(history = history.len(), "chat turn stored");

    Ok(ChatReply {
        response,
        snapshot: MiniSnapshot {
            total_savings: snap.total_savings,
            budget_remaining: snap.current_month.budget_remaining,
            days_until_payday: snap.days_until_payday,
        },
    })
}

/// `chat --message`. The advisor is only built once the arguments are valid,
/// so a bad message never needs an API key.
pub fn handle<A, F>(conn: &Connection, m: &clap::ArgMatches, make_advisor: F) -> Result<()>
where
    A: Advisor,
    F: FnOnce() -> Result<A>,
{
    let message = required_message(
        m.get_one::<String>("message")
            .map(String::as_str)
            .unwrap_or(""),
    )?;
    let today = as_of(m)?;
    let advisor = make_advisor()?;
    let reply = send(conn, &advisor, message, today)?;
    if maybe_print_json(m.get_flag("json"), &reply)? {
        return Ok(());
    }
    println!("{}", reply.response);
    println!();
    println!(
        "Savings {} | Budget left {} | Payday in {} days",
        fmt_usd(reply.snapshot.total_savings),
        fmt_usd(reply.snapshot.budget_remaining),
        reply.snapshot.days_until_payday
    );
    Ok(())
}

/// `chat history` and `chat clear`; neither needs the advisor.
pub fn handle_history(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("history", sub)) => {
            let limit = *sub.get_one::<usize>("limit").unwrap();
            let messages = recent_chat(conn, limit)?;
            if maybe_print_json(sub.get_flag("json"), &messages)? {
                return Ok(());
            }
            let data = messages
                .into_iter()
                .map(|msg| vec![msg.role.as_str().to_string(), msg.content])
                .collect();
            println!("{}", pretty_table(&["Role", "Message"], data));
        }
        Some(("clear", _)) => {
            let n = conn.execute("DELETE FROM chat_history", [])?;
            println!("Cleared {} messages", n);
        }
        _ => {}
    }
    Ok(())
}
