// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::aggregate::ExpenseSign;
use crate::utils::{get_setting, parse_decimal};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub const KEY_USER_NAME: &str = "user_name";
pub const KEY_NET_INCOME: &str = "net_monthly_income";
pub const KEY_PAY_SCHEDULE: &str = "pay_schedule";
pub const KEY_EXPENSE_SIGN: &str = "expense_sign";
pub const KEY_ONBOARDING_COMPLETE: &str = "onboarding_complete";
pub const KEY_LAST_BALANCE_UPDATE: &str = "last_balance_update";
pub const KEY_LAST_IMPORT: &str = "last_transaction_import";

pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const MODEL_ENV: &str = "DAYLIMIT_MODEL";
pub const MAX_TOKENS_ENV: &str = "DAYLIMIT_MAX_TOKENS";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Who the numbers belong to, read from the settings table.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub name: String,
    pub net_monthly_income: Decimal,
    pub pay_schedule: String,
    pub expense_sign: ExpenseSign,
}

impl Profile {
    pub fn load(conn: &Connection) -> Result<Self> {
        let name = get_setting(conn, KEY_USER_NAME)?.unwrap_or_else(|| "User".to_string());
        let net_monthly_income = match get_setting(conn, KEY_NET_INCOME)? {
            Some(s) => parse_decimal(&s).context("Stored net monthly income is corrupt")?,
            None => Decimal::ZERO,
        };
        let pay_schedule =
            get_setting(conn, KEY_PAY_SCHEDULE)?.unwrap_or_else(|| "semi-monthly".to_string());
        let expense_sign = match get_setting(conn, KEY_EXPENSE_SIGN)? {
            Some(s) => s.parse()?,
            None => ExpenseSign::default(),
        };
        Ok(Profile {
            name,
            net_monthly_income,
            pay_schedule,
            expense_sign,
        })
    }
}

/// Connection details for the hosted advisor model.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
}

impl AdvisorConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| anyhow!("{} is not set", API_KEY_ENV))?;
        let model = std::env::var(MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let max_tokens = match std::env::var(MAX_TOKENS_ENV) {
            Ok(v) => v
                .trim()
                .parse::<u32>()
                .with_context(|| format!("Invalid {} '{}'", MAX_TOKENS_ENV, v))?,
            Err(_) => DEFAULT_MAX_TOKENS,
        };
        Ok(AdvisorConfig {
            api_key,
            model,
            max_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::set_setting;

    #[test]
    fn profile_defaults_when_unset() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        let p = Profile::load(&conn).unwrap();
        assert_eq!(p.name, "User");
        assert_eq!(p.net_monthly_income, Decimal::ZERO);
        assert_eq!(p.expense_sign, ExpenseSign::Positive);
    }

    #[test]
    fn profile_reads_settings() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        set_setting(&conn, KEY_USER_NAME, "Sam").unwrap();
        set_setting(&conn, KEY_NET_INCOME, "11840").unwrap();
        set_setting(&conn, KEY_EXPENSE_SIGN, "negative").unwrap();
        let p = Profile::load(&conn).unwrap();
        assert_eq!(p.name, "Sam");
        assert_eq!(p.net_monthly_income, Decimal::from(11840));
        assert_eq!(p.expense_sign, ExpenseSign::Negative);
    }
}
