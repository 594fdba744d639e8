// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::categorizer::Categorizer;
use crate::config::{KEY_LAST_IMPORT, Profile};
use crate::error::AppError;
use crate::models::Transaction;
use crate::store::insert_transaction;
use crate::utils::{fmt_usd, maybe_print_json, parse_amount, parse_date, touch_setting};
use anyhow::Result;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashSet};

const DATE_HEADERS: &[&str] = &["date", "transaction date", "posted date", "posting date"];
const DESCRIPTION_HEADERS: &[&str] = &["description", "merchant", "payee", "name", "memo"];
const AMOUNT_HEADERS: &[&str] = &["amount", "amount (usd)", "transaction amount"];
const CATEGORY_HEADERS: &[&str] = &["category"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub duplicates: usize,
    pub total_parsed: usize,
    pub date_range: Option<DateRange>,
    pub categories: Vec<String>,
    pub total_spend: Decimal,
}

struct Columns {
    date: Option<usize>,
    description: Option<usize>,
    amount: Option<usize>,
    category: Option<usize>,
}

impl Columns {
    fn detect(headers: &StringRecord) -> Self {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };
        Columns {
            date: find(DATE_HEADERS),
            description: find(DESCRIPTION_HEADERS),
            amount: find(AMOUNT_HEADERS),
            category: find(CATEGORY_HEADERS),
        }
    }
}

/// Content key for dedup: the same date, description and amount always
/// produce the same hash.
pub fn content_hash(date: NaiveDate, description: &str, amount: Decimal) -> String {
    let key = format!("{}|{}|{:.2}", date, description, amount.round_dp(2));
    hex::encode(Sha256::digest(key.as_bytes()))
}

struct ParsedRow {
    date: NaiveDate,
    description: String,
    amount: Decimal,
    category: String,
}

fn parse_row(rec: &StringRecord, cols: &Columns) -> Result<ParsedRow> {
    let field = |idx: Option<usize>| idx.and_then(|i| rec.get(i)).map(str::trim).unwrap_or("");
    let date = parse_date(field(cols.date))?;
    let description = field(cols.description);
    if description.is_empty() {
        anyhow::bail!("missing description");
    }
    let amount = parse_amount(field(cols.amount))?;
    Ok(ParsedRow {
        date,
        description: description.to_string(),
        amount,
        category: field(cols.category).to_string(),
    })
}

pub fn import_csv(
    conn: &mut Connection,
    path: &str,
    categorizer: &Categorizer,
) -> Result<ImportReport> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| AppError::validation(format!("Cannot read CSV {}: {}", path, e)))?;
    let headers = rdr.headers()?.clone();
    let cols = Columns::detect(&headers);

    let mut sample: Option<Vec<String>> = None;
    let mut parsed = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let rec = match result {
            Ok(rec) => rec,
            Err(e) => {
                tracing::debug!(line = line + 2, error = %e, "dropping unreadable row");
                continue;
            }
        };
        if sample.is_none() {
            sample = Some(rec.iter().map(str::to_string).collect());
        }
        match parse_row(&rec, &cols) {
            Ok(row) => parsed.push(row),
            Err(e) => tracing::debug!(line = line + 2, error = %e, "dropping row"),
        }
    }

    if parsed.is_empty() {
        return Err(AppError::ImportEmpty {
            headers: headers.iter().map(str::to_string).collect(),
            sample,
        }
        .into());
    }

    let sign = Profile::load(conn)?.expense_sign;
    let total_parsed = parsed.len();
    let mut seen: HashSet<String> = HashSet::new();
    let mut imported: Vec<Transaction> = Vec::new();
    let mut duplicates = 0;

    let tx = conn.transaction()?;
    for row in parsed {
        let hash = content_hash(row.date, &row.description, row.amount);
        if !seen.insert(hash.clone()) {
            duplicates += 1;
            continue;
        }
        let category = if row.category.is_empty() {
            categorizer
                .categorize(&row.description, row.amount, None)
                .category
        } else {
            row.category
        };
        let record = Transaction {
            id: 0,
            date: row.date,
            description: row.description,
            amount: row.amount,
            category,
            is_excluded: false,
            hash,
        };
        if insert_transaction(&tx, &record)? {
            imported.push(record);
        } else {
            duplicates += 1;
        }
    }
    touch_setting(&tx, KEY_LAST_IMPORT)?;
    tx.commit()?;

    let date_range = match (
        imported.iter().map(|t| t.date).min(),
        imported.iter().map(|t| t.date).max(),
    ) {
        (Some(start), Some(end)) => Some(DateRange { start, end }),
        _ => None,
    };
    let categories: BTreeSet<String> = imported.iter().map(|t| t.category.clone()).collect();
    let total_spend: Decimal = imported.iter().filter_map(|t| sign.spend_of(t)).sum();

    tracing::info!(
        imported = imported.len(),
        duplicates,
        total_parsed,
        "transactions imported"
    );
    Ok(ImportReport {
        imported: imported.len(),
        duplicates,
        total_parsed,
        date_range,
        categories: categories.into_iter().collect(),
        total_spend: total_spend.round_dp(2),
    })
}

pub fn handle(
    conn: &mut Connection,
    m: &clap::ArgMatches,
    categorizer: &Categorizer,
) -> Result<()> {
    let path = m.get_one::<String>("path").unwrap().trim();
    let report = import_csv(conn, path, categorizer)?;
    if maybe_print_json(m.get_flag("json"), &report)? {
        return Ok(());
    }
    println!(
        "Imported {} of {} parsed rows ({} duplicates) from {}",
        report.imported, report.total_parsed, report.duplicates, path
    );
    if let Some(r) = report.date_range {
        println!("Dates: {} to {}", r.start, r.end);
    }
    if !report.categories.is_empty() {
        println!("Categories: {}", report.categories.join(", "));
    }
    println!("Total spend: {}", fmt_usd(report.total_spend));
    Ok(())
}
