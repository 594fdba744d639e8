// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod budgets;
pub mod chat;
pub mod debts;
pub mod goals;
pub mod importer;
pub mod merchants;
pub mod onboarding;
pub mod profile;
pub mod rules;
pub mod status;
pub mod transactions;

use crate::error::AppError;
use crate::utils::{check_amount, parse_date};
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Reference date for a snapshot: `--date` when given, otherwise today.
pub(crate) fn as_of(m: &clap::ArgMatches) -> Result<NaiveDate> {
    match m.get_one::<String>("date") {
        Some(raw) => parse_date(raw)
            .map_err(|e| anyhow::Error::from(AppError::validation(format!("{:#}", e)))),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Parses a `--data` JSON array of deltas.
pub(crate) fn parse_deltas<T>(m: &clap::ArgMatches) -> Result<Vec<T>>
where
    T: serde::de::DeserializeOwned,
{
    let raw = m.get_one::<String>("data").unwrap();
    serde_json::from_str::<Vec<T>>(raw).map_err(|e| {
        anyhow::Error::from(AppError::validation(format!("Invalid update data: {}", e)))
    })
}

/// Rejects delta amounts outside the supported range.
pub(crate) fn ensure_amounts(values: &[Option<Decimal>]) -> Result<()> {
    for v in values.iter().flatten() {
        check_amount(*v)
            .map_err(|e| anyhow::Error::from(AppError::validation(format!("{:#}", e))))?;
    }
    Ok(())
}
