// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use daylimit::advisor::AnthropicAdvisor;
use daylimit::categorizer::Categorizer;
use daylimit::{cli, commands, db, error};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let matches = cli::build_cli().get_matches();

    let mut conn = db::open_or_init()?;
    let mut categorizer = Categorizer::load(&conn)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("status", sub)) => commands::status::handle(&conn, sub)?,
        Some(("chat", sub)) if sub.subcommand().is_some() => {
            commands::chat::handle_history(&conn, sub)?
        }
        Some(("chat", sub)) => commands::chat::handle(&conn, sub, AnthropicAdvisor::from_env)?,
        Some(("account", sub)) => commands::accounts::handle(&conn, sub)?,
        Some(("debt", sub)) => commands::debts::handle(&conn, sub)?,
        Some(("goal", sub)) => commands::goals::handle(&conn, sub)?,
        Some(("onboarding", sub)) => commands::onboarding::handle(&conn, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut conn, sub, &categorizer)?,
        Some(("tx", sub)) => commands::transactions::handle(&conn, sub, &mut categorizer)?,
        Some(("budget", sub)) => commands::budgets::handle(&conn, sub)?,
        Some(("rules", sub)) => commands::rules::handle(&conn, sub)?,
        Some(("merchant", sub)) => commands::merchants::handle(&conn, sub, &mut categorizer)?,
        Some(("profile", sub)) => commands::profile::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

fn main() {
    let _ = dotenvy::dotenv();
    init_tracing();

    if let Err(err) = run() {
        let (code, message) = error::describe(&err);
        eprintln!("error: {}", message);
        std::process::exit(code);
    }
}
