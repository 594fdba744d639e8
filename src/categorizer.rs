// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Guesses a category for imported rows that arrive without one.
//!
//! A `Categorizer` is built once per process. The importer only reads it;
//! learned merchant mappings go through `&mut` and are written to `merchant_map`.

use crate::store;
use anyhow::Result;
use regex::Regex;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Learning only sticks above this confidence.
pub const LEARN_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub category: String,
    pub confidence: f64,
    pub reasoning: String,
    pub alternatives: Vec<(String, f64)>,
}

struct PatternRule {
    pattern: Regex,
    category: &'static str,
    confidence: f64,
    source: &'static str,
}

pub struct Categorizer {
    rules: Vec<PatternRule>,
    merchants: HashMap<String, String>,
    recurring: HashMap<Decimal, (String, f64)>,
}

const BUILTIN_PATTERNS: &[(&str, &str, f64, &str)] = &[
    (
        r"(?i)walmart|target|kroger|safeway|whole foods|trader joe|costco",
        "Groceries",
        0.95,
        "merchant",
    ),
    (
        r"(?i)doordash|uber eats|grubhub|postmates|instacart",
        "Delivery",
        0.95,
        "merchant",
    ),
    (
        r"(?i)mcdonald|burger|pizza|starbucks|dunkin|chipotle",
        "Restaurants",
        0.90,
        "merchant",
    ),
    (
        r"(?i)uber|lyft|shell|chevron|exxon|bp gas",
        "Transportation",
        0.90,
        "merchant",
    ),
    (
        r"(?i)netflix|spotify|amazon prime|disney|hulu",
        "Subscriptions",
        0.95,
        "merchant",
    ),
    (
        r"(?i)electric|water|gas company|internet|cable",
        "Utilities",
        0.90,
        "description",
    ),
    (
        r"(?i)rent|mortgage|property management",
        "Rent",
        0.95,
        "description",
    ),
];

impl Categorizer {
    /// Built-in rules only.
    pub fn new() -> Result<Self> {
        let mut rules = Vec::with_capacity(BUILTIN_PATTERNS.len());
        for (pat, category, confidence, source) in BUILTIN_PATTERNS {
            rules.push(PatternRule {
                pattern: Regex::new(pat)?,
                category: *category,
                confidence: *confidence,
                source: *source,
            });
        }
        let mut merchants = HashMap::new();
        merchants.insert("AMAZON.COM".to_string(), "Shops".to_string());
        merchants.insert("PAYPAL".to_string(), "Other".to_string());
        merchants.insert("VENMO".to_string(), "Other".to_string());
        merchants.insert("ZELLE".to_string(), "Internal Transfers".to_string());
        Ok(Categorizer {
            rules,
            merchants,
            recurring: HashMap::new(),
        })
    }

    /// Built-in rules, every mapping learned so far, and the committed
    /// monthly amounts (fixed budget lines, debt payments) as recurring hints.
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut c = Self::new()?;
        for cat in store::load_budget_categories(conn)?
            .into_iter()
            .filter(|b| b.is_fixed && !b.is_excluded)
        {
            c = c.with_recurring(cat.monthly_budget, cat.name, 0.95);
        }
        for debt in store::load_debts(conn)? {
            c = c.with_recurring(debt.monthly_payment, "Loans", 0.95);
        }
        let mut stmt = conn.prepare("SELECT merchant, category FROM merchant_map")?;
        let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
        for row in rows {
            let (merchant, category) = row?;
            c.merchants.insert(merchant, category);
        }
        tracing::debug!(merchants = c.merchants.len(), "categorizer loaded");
        Ok(c)
    }

    /// Registers a recurring amount (rent, loan payment) with its category.
    pub fn with_recurring(
        mut self,
        amount: Decimal,
        category: impl Into<String>,
        confidence: f64,
    ) -> Self {
        if !amount.is_zero() {
            self.recurring
                .insert(amount.abs().round_dp(2), (category.into(), confidence));
        }
        self
    }

    pub fn categorize(
        &self,
        description: &str,
        amount: Decimal,
        existing: Option<&str>,
    ) -> Prediction {
        let mut candidates: Vec<(String, f64, String)> = Vec::new();
        let key = description.trim().to_uppercase();
        if let Some(cat) = self.merchants.get(&key) {
            candidates.push((cat.clone(), 0.95, "Exact merchant match".to_string()));
        }
        let magnitude = amount.abs().round_dp(2);
        if let Some((cat, confidence)) = self.recurring.get(&magnitude) {
            candidates.push((
                cat.clone(),
                *confidence,
                format!("Recurring amount pattern: ${:.2}", magnitude),
            ));
        }
        for rule in &self.rules {
            if rule.pattern.is_match(description) {
                candidates.push((
                    rule.category.to_string(),
                    rule.confidence,
                    format!("{} pattern match", rule.source),
                ));
            }
        }
        if candidates.is_empty() {
            match existing.map(str::trim).filter(|e| !e.is_empty()) {
                Some(e) => candidates.push((
                    e.to_string(),
                    0.3,
                    "Existing category (low confidence)".to_string(),
                )),
                None => candidates.push((
                    "Other".to_string(),
                    0.1,
                    "No patterns matched".to_string(),
                )),
            }
        }
        // Stable sort keeps earlier, more specific sources ahead on ties.
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
        let mut it = candidates.into_iter();
        let (category, confidence, reasoning) = it
            .next()
            .unwrap_or_else(|| ("Other".to_string(), 0.1, String::new()));
        Prediction {
            category,
            confidence,
            reasoning,
            alternatives: it.take(3).map(|(c, conf, _)| (c, conf)).collect(),
        }
    }

    /// Remembers a correction. Returns whether it was kept.
    pub fn learn(
        &mut self,
        conn: &Connection,
        description: &str,
        category: &str,
        confidence: f64,
    ) -> Result<bool> {
        if confidence <= LEARN_THRESHOLD {
            return Ok(false);
        }
        let key = description.trim().to_uppercase();
        conn.execute(
            "INSERT INTO merchant_map(merchant, category) VALUES (?1, ?2)
             ON CONFLICT(merchant) DO UPDATE SET category=excluded.category",
            params![key, category],
        )?;
        tracing::info!(merchant = %key, category, "learned merchant mapping");
        self.merchants.insert(key, category.to_string());
        Ok(true)
    }

    pub fn merchants(&self) -> Vec<(String, String)> {
        let mut v: Vec<_> = self
            .merchants
            .iter()
            .map(|(m, c)| (m.clone(), c.clone()))
            .collect();
        v.sort();
        v
    }
}
