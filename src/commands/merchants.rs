// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::categorizer::Categorizer;
use crate::error::AppError;
use crate::utils::{maybe_print_json, parse_amount, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(
    conn: &Connection,
    m: &clap::ArgMatches,
    categorizer: &mut Categorizer,
) -> Result<()> {
    match m.subcommand() {
        Some(("learn", sub)) => {
            let merchant = sub.get_one::<String>("merchant").unwrap().trim();
            let category = sub.get_one::<String>("category").unwrap().trim();
            if merchant.is_empty() || category.is_empty() {
                return Err(AppError::validation("Merchant and category are required").into());
            }
            let confidence = *sub.get_one::<f64>("confidence").unwrap();
            if categorizer.learn(conn, merchant, category, confidence)? {
                println!("Learned: {} -> {}", merchant.to_uppercase(), category);
            } else {
                println!("Not learned: confidence {} is too low", confidence);
            }
        }
        Some(("list", sub)) => {
            let merchants = categorizer.merchants();
            if maybe_print_json(sub.get_flag("json"), &merchants)? {
                return Ok(());
            }
            let data = merchants.into_iter().map(|(m, c)| vec![m, c]).collect();
            println!("{}", pretty_table(&["Merchant", "Category"], data));
        }
        Some(("guess", sub)) => {
            let description = sub.get_one::<String>("description").unwrap();
            let amount = parse_amount(sub.get_one::<String>("amount").unwrap())
                .map_err(|e| AppError::validation(format!("{:#}", e)))?;
            let p = categorizer.categorize(description, amount, None);
            if maybe_print_json(sub.get_flag("json"), &p)? {
                return Ok(());
            }
            println!("{} ({:.0}%): {}", p.category, p.confidence * 100.0, p.reasoning);
        }
        _ => {}
    }
    Ok(())
}
