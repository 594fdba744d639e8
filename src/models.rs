// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Checking,
    Savings,
    Investment,
    Credit,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Checking => "checking",
            AccountKind::Savings => "savings",
            AccountKind::Investment => "investment",
            AccountKind::Credit => "credit",
        }
    }

    /// Checking and savings count as spendable cash.
    pub fn is_cash(&self) -> bool {
        matches!(self, AccountKind::Checking | AccountKind::Savings)
    }
}

impl FromStr for AccountKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "checking" => Ok(AccountKind::Checking),
            "savings" => Ok(AccountKind::Savings),
            "investment" => Ok(AccountKind::Investment),
            "credit" => Ok(AccountKind::Credit),
            other => Err(anyhow!(
                "Unknown account type '{}' (use checking|savings|investment|credit)",
                other
            )),
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub kind: AccountKind,
    pub institution: String,
    pub balance: Decimal,
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtKind {
    Irs,
    CarLoan,
    PersonalLoan,
    CreditCard,
    Other,
}

impl DebtKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebtKind::Irs => "irs",
            DebtKind::CarLoan => "car_loan",
            DebtKind::PersonalLoan => "personal_loan",
            DebtKind::CreditCard => "credit_card",
            DebtKind::Other => "other",
        }
    }
}

impl FromStr for DebtKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "irs" => Ok(DebtKind::Irs),
            "car_loan" => Ok(DebtKind::CarLoan),
            "personal_loan" => Ok(DebtKind::PersonalLoan),
            "credit_card" => Ok(DebtKind::CreditCard),
            "other" => Ok(DebtKind::Other),
            other => Err(anyhow!(
                "Unknown debt type '{}' (use irs|car_loan|personal_loan|credit_card|other)",
                other
            )),
        }
    }
}

impl fmt::Display for DebtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    pub id: i64,
    pub name: String,
    pub kind: DebtKind,
    pub original_amount: Option<Decimal>,
    /// `None` when the balance is not known yet.
    pub balance: Option<Decimal>,
    pub interest_rate: Option<Decimal>,
    pub monthly_payment: Decimal,
    pub notes: Option<String>,
    pub promo_end_date: Option<NaiveDate>,
    pub promo_rate: Option<Decimal>,
    pub post_promo_rate: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub id: i64,
    pub name: String,
    pub monthly_budget: Decimal,
    pub is_fixed: bool,
    pub is_excluded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub priority: i64,
    pub target_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl Goal {
    /// Whole-number progress; a zero target reports 0.
    pub fn percent_complete(&self) -> i64 {
        percent_of(self.current_amount, self.target_amount)
    }
}

/// `round(part / whole * 100)`, 0 when `whole` is zero. Saturates instead of
/// overflowing when `whole` is tiny.
pub fn percent_of(part: Decimal, whole: Decimal) -> i64 {
    if whole.is_zero() {
        return 0;
    }
    let saturated = if part.is_sign_negative() != whole.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    };
    part.checked_div(whole)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .map(|r| r.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|r| r.to_i64())
        .unwrap_or(saturated)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub is_excluded: bool,
    pub hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceRule {
    pub id: i64,
    pub name: String,
    pub condition: String,
    pub action: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

impl FromStr for ChatRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(ChatRole::User),
            "assistant" => Ok(ChatRole::Assistant),
            other => Err(anyhow!("Unknown chat role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}
