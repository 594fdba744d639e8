// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use daylimit::categorizer::Categorizer;
use daylimit::commands::{budgets, merchants, profile, rules, transactions};
use daylimit::config::Profile;
use daylimit::engine::aggregate::ExpenseSign;
use daylimit::error::describe;
use daylimit::store::{load_budget_categories, load_rules};
use daylimit::{cli, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn run<F>(args: &[&str], f: F) -> anyhow::Result<()>
where
    F: FnOnce(&clap::ArgMatches) -> anyhow::Result<()>,
{
    let mut argv = vec!["daylimit"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some((name, sub)) if name == args[0] => f(sub),
        _ => panic!("no {} subcommand", args[0]),
    }
}

#[test]
fn rules_add_toggle_remove() {
    let conn = base_conn();
    run(
        &["rules", "add", "--name", "Coffee", "--when", "buying coffee", "--then", "brew at home"],
        |m| rules::handle(&conn, m),
    )
    .unwrap();
    assert_eq!(load_rules(&conn, true).unwrap().len(), 1);

    run(&["rules", "toggle", "--id", "1"], |m| rules::handle(&conn, m)).unwrap();
    assert!(load_rules(&conn, true).unwrap().is_empty());
    assert_eq!(load_rules(&conn, false).unwrap().len(), 1);

    let err = run(&["rules", "toggle", "--id", "7"], |m| rules::handle(&conn, m)).unwrap_err();
    assert_eq!(describe(&err).0, 2);

    run(&["rules", "rm", "--id", "1"], |m| rules::handle(&conn, m)).unwrap();
    assert!(load_rules(&conn, false).unwrap().is_empty());
}

#[test]
fn rule_text_must_not_be_blank() {
    let conn = base_conn();
    let err = run(
        &["rules", "add", "--name", "x", "--when", "  ", "--then", "y"],
        |m| rules::handle(&conn, m),
    )
    .unwrap_err();
    assert_eq!(describe(&err).0, 2);
}

#[test]
fn budget_set_upserts_flags() {
    let conn = base_conn();
    run(
        &["budget", "set", "--name", "Rent", "--amount", "3495", "--fixed"],
        |m| budgets::handle(&conn, m),
    )
    .unwrap();
    run(
        &["budget", "set", "--name", "Rent", "--amount", "3600", "--fixed"],
        |m| budgets::handle(&conn, m),
    )
    .unwrap();
    run(
        &["budget", "set", "--name", "Moving", "--amount", "5000", "--excluded"],
        |m| budgets::handle(&conn, m),
    )
    .unwrap();
    let cats = load_budget_categories(&conn).unwrap();
    assert_eq!(cats.len(), 2);
    let rent = cats.iter().find(|c| c.name == "Rent").unwrap();
    assert_eq!(rent.monthly_budget, Decimal::from(3600));
    assert!(rent.is_fixed);
    assert!(cats.iter().find(|c| c.name == "Moving").unwrap().is_excluded);

    run(&["budget", "list"], |m| budgets::handle(&conn, m)).unwrap();
    run(&["budget", "rm", "--name", "Moving"], |m| budgets::handle(&conn, m)).unwrap();
    let err =
        run(&["budget", "rm", "--name", "Moving"], |m| budgets::handle(&conn, m)).unwrap_err();
    assert_eq!(describe(&err).0, 2);
}

#[test]
fn profile_set_and_bad_sign() {
    let conn = base_conn();
    run(
        &[
            "profile",
            "set",
            "--name",
            "Sam",
            "--income",
            "11840",
            "--expense-sign",
            "Negative",
        ],
        |m| profile::handle(&conn, m),
    )
    .unwrap();
    let p = Profile::load(&conn).unwrap();
    assert_eq!(p.name, "Sam");
    assert_eq!(p.net_monthly_income, Decimal::from(11840));
    assert_eq!(p.expense_sign, ExpenseSign::Negative);

    let err = run(&["profile", "set", "--expense-sign", "sideways"], |m| {
        profile::handle(&conn, m)
    })
    .unwrap_err();
    assert_eq!(describe(&err).0, 2);
}

#[test]
fn learned_merchant_feeds_categorizer() {
    let conn = base_conn();
    let mut cat = Categorizer::load(&conn).unwrap();
    run(
        &["merchant", "learn", "--merchant", "Blue Bottle", "--category", "Restaurants"],
        |m| merchants::handle(&conn, m, &mut cat),
    )
    .unwrap();
    assert_eq!(
        cat.categorize("BLUE BOTTLE", Decimal::from(6), None).category,
        "Restaurants"
    );
    let reloaded = Categorizer::load(&conn).unwrap();
    assert_eq!(
        reloaded.categorize("blue bottle", Decimal::from(6), None).category,
        "Restaurants"
    );
}

#[test]
fn transaction_exclude_and_recategorize() {
    let conn = base_conn();
    conn.execute(
        "INSERT INTO transactions(date, description, amount, category, hash)
         VALUES ('2025-06-17', 'Corner Florist', '30', 'Other', 'h1')",
        [],
    )
    .unwrap();
    let mut cat = Categorizer::load(&conn).unwrap();

    run(&["tx", "exclude", "--id", "1"], |m| {
        transactions::handle(&conn, m, &mut cat)
    })
    .unwrap();
    let excluded: bool = conn
        .query_row("SELECT is_excluded FROM transactions WHERE id=1", [], |r| r.get(0))
        .unwrap();
    assert!(excluded);

    run(
        &["tx", "categorize", "--id", "1", "--category", "Shops", "--learn"],
        |m| transactions::handle(&conn, m, &mut cat),
    )
    .unwrap();
    let category: String = conn
        .query_row("SELECT category FROM transactions WHERE id=1", [], |r| r.get(0))
        .unwrap();
    assert_eq!(category, "Shops");
    assert_eq!(
        cat.categorize("Corner Florist", Decimal::from(9), None).category,
        "Shops"
    );

    run(
        &["tx", "list", "--from", "2025-06-01", "--to", "2025-06-30", "--json"],
        |m| transactions::handle(&conn, m, &mut cat),
    )
    .unwrap();
}
