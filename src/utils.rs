// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

const UA: &str = concat!("daylimit/", env!("CARGO_PKG_VERSION"));

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

/// Accepts `YYYY-MM-DD` or `MM/DD/YYYY`.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD or MM/DD/YYYY", s))
}

/// Largest magnitude accepted for any money value (one trillion). Sums of
/// values under this bound cannot overflow `Decimal`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

pub fn check_amount(d: Decimal) -> Result<Decimal> {
    if d.abs() > MAX_AMOUNT {
        anyhow::bail!("Amount {} is out of range", d);
    }
    Ok(d)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    let d = s
        .trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))?;
    check_amount(d)
}

/// Parses a bank-export amount: `$1,234.50`, `-12.00`, `(45.10)`.
/// Parenthesized values are negative.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let raw = s.trim();
    let (negated, inner) = match raw.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, raw),
    };
    let cleaned: String = inner
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-' || *c == '+')
        .collect();
    if cleaned.is_empty() {
        return Err(anyhow::anyhow!("Invalid amount '{}'", s));
    }
    let v = parse_decimal(&cleaned).with_context(|| format!("Invalid amount '{}'", s))?;
    Ok(if negated { -v.abs() } else { v })
}

/// Two-place dollar amount, thousands grouped, `.00` dropped for whole values.
pub fn fmt_usd(d: Decimal) -> String {
    let r = d.round_dp(2);
    let neg = r.is_sign_negative() && !r.is_zero();
    let s = format!("{:.2}", r.abs());
    let (int, frac) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    let mut grouped = String::new();
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let body = if frac == "00" {
        grouped
    } else {
        format!("{}.{}", grouped, frac)
    };
    if neg {
        format!("-${}", body)
    } else {
        format!("${}", body)
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(json_flag: bool, v: &T) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    Ok(false)
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn touch_setting(conn: &Connection, key: &str) -> Result<()> {
    set_setting(conn, key, &chrono::Utc::now().to_rfc3339())
}

fn decimal_from_text(idx: usize, s: &str) -> rusqlite::Result<Decimal> {
    let conversion = |e: Box<dyn std::error::Error + Send + Sync>| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e)
    };
    let d = s
        .trim()
        .parse::<Decimal>()
        .map_err(|e| conversion(Box::new(e)))?;
    if d.abs() > MAX_AMOUNT {
        return Err(conversion(format!("amount {} is out of range", d).into()));
    }
    Ok(d)
}

/// Money columns are stored as TEXT.
pub fn row_decimal(r: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = r.get(idx)?;
    decimal_from_text(idx, &s)
}

pub fn row_opt_decimal(r: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    let s: Option<String> = r.get(idx)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => decimal_from_text(idx, v).map(Some),
    }
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (y, m) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}
