// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use daylimit::commands::{accounts, debts, goals, onboarding};
use daylimit::error::describe;
use daylimit::store::{load_accounts, load_debts, load_goals};
use daylimit::utils::get_setting;
use daylimit::{cli, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Parses `args` and hands the named subcommand's matches to `f`.
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
fn account_deltas_update_and_insert() {
    let conn = base_conn();
    conn.execute(
        "INSERT INTO accounts(name, type, current_balance) VALUES ('Checking', 'checking', '100')",
        [],
    )
    .unwrap();
    run(
        &[
            "account",
            "update",
            "--data",
            r#"[{"id": 1, "balance": 2500.75}, {"name": "HYSA", "type": "savings", "balance": "9000"}]"#,
        ],
        |m| accounts::handle(&conn, m),
    )
    .unwrap();

    let all = load_accounts(&conn).unwrap();
    assert_eq!(all.len(), 2);
    let checking = all.iter().find(|a| a.name == "Checking").unwrap();
    assert_eq!(checking.balance, dec("2500.75"));
    let hysa = all.iter().find(|a| a.name == "HYSA").unwrap();
    assert_eq!(hysa.balance, Decimal::from(9000));
    assert_eq!(hysa.institution, "Not specified");
    assert!(get_setting(&conn, "last_balance_update").unwrap().is_some());
}

#[test]
fn account_delta_for_missing_id_keeps_earlier_rows() {
    let conn = base_conn();
    let err = run(
        &[
            "account",
            "update",
            "--data",
            r#"[{"name": "Cash jar", "balance": 40}, {"id": 99, "balance": 1}]"#,
        ],
        |m| accounts::handle(&conn, m),
    )
    .unwrap_err();
    assert_eq!(describe(&err), (2, "Account 99 not found".to_string()));
    assert_eq!(load_accounts(&conn).unwrap().len(), 1);
}

#[test]
fn malformed_delta_json_is_validation() {
    let conn = base_conn();
    let err = run(&["account", "update", "--data", "{not json"], |m| {
        accounts::handle(&conn, m)
    })
    .unwrap_err();
    assert_eq!(describe(&err).0, 2);
}

#[test]
fn new_account_needs_a_name() {
    let conn = base_conn();
    let err = run(&["account", "update", "--data", r#"[{"balance": 5}]"#], |m| {
        accounts::handle(&conn, m)
    })
    .unwrap_err();
    assert_eq!(describe(&err).0, 2);
}

#[test]
fn set_balance_accepts_negative() {
    let conn = base_conn();
    conn.execute(
        "INSERT INTO accounts(name, type, current_balance) VALUES ('Card', 'credit', '0')",
        [],
    )
    .unwrap();
    run(
        &["account", "set-balance", "--id", "1", "--balance", "-320.10"],
        |m| accounts::handle(&conn, m),
    )
    .unwrap();
    assert_eq!(load_accounts(&conn).unwrap()[0].balance, dec("-320.10"));
}

#[test]
fn debt_deltas_keep_untouched_fields() {
    let conn = base_conn();
    run(
        &[
            "debt",
            "update",
            "--data",
            r#"[{"name": "Venture Card", "type": "credit_card", "balance": 4000, "monthly_payment": 200,
                 "promo_end_date": "2025-12-31", "promo_rate": 0, "post_promo_rate": 24.99}]"#,
        ],
        |m| debts::handle(&conn, m),
    )
    .unwrap();
    run(
        &["debt", "update", "--data", r#"[{"id": 1, "balance": 3500}]"#],
        |m| debts::handle(&conn, m),
    )
    .unwrap();
    let d = &load_debts(&conn).unwrap()[0];
    assert_eq!(d.balance, Some(Decimal::from(3500)));
    assert_eq!(d.monthly_payment, Decimal::from(200));
    assert_eq!(d.post_promo_rate, Some(dec("24.99")));
    assert_eq!(d.promo_end_date.unwrap().to_string(), "2025-12-31");

    run(&["debt", "list", "--date", "2025-06-16", "--json"], |m| {
        debts::handle(&conn, m)
    })
    .unwrap();
}

#[test]
fn goal_progress_updates() {
    let conn = base_conn();
    run(
        &[
            "goal",
            "update",
            "--data",
            r#"[{"name": "Emergency fund", "target_amount": 25000, "priority": 1},
                {"name": "Trip", "target_amount": 3000}]"#,
        ],
        |m| goals::handle(&conn, m),
    )
    .unwrap();
    run(
        &["goal", "update", "--data", r#"[{"id": 1, "current_amount": 2500}]"#],
        |m| goals::handle(&conn, m),
    )
    .unwrap();
    let all = load_goals(&conn).unwrap();
    assert_eq!(all[0].name, "Emergency fund");
    assert_eq!(all[0].percent_complete(), 10);
    assert_eq!(all[1].priority, 99);
}

#[test]
fn onboarding_replaces_accounts_and_reports_gaps() {
    let conn = base_conn();
    conn.execute(
        "INSERT INTO accounts(name, type, current_balance) VALUES ('Old', 'checking', '1')",
        [],
    )
    .unwrap();

    let st = onboarding::status(&conn).unwrap();
    assert_eq!(st.missing_data, vec!["debt_balances", "goals"]);
    assert!(!st.complete);

    run(
        &[
            "onboarding",
            "accounts",
            "--data",
            r#"[{"name": "Checking", "type": "checking", "balance": 0},
                {"name": "Brokerage", "type": "investment", "balance": 10000, "institution": "Vanguard"}]"#,
        ],
        |m| onboarding::handle(&conn, m),
    )
    .unwrap();
    let all = load_accounts(&conn).unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|a| a.name != "Old"));

    conn.execute(
        "INSERT INTO debts(name, type, current_balance, monthly_payment) VALUES ('IRS', 'irs', NULL, '500')",
        [],
    )
    .unwrap();
    let st = onboarding::status(&conn).unwrap();
    // The brokerage balance is positive, the unknown IRS balance is not.
    assert_eq!(st.missing_data, vec!["debt_balances", "goals"]);

    run(&["onboarding", "complete"], |m| onboarding::handle(&conn, m)).unwrap();
    let st = onboarding::status(&conn).unwrap();
    assert!(st.complete);
    assert!(st.last_balance_update.is_some());
    assert!(st.last_transaction_import.is_none());
}

#[test]
fn onboarding_with_no_positive_balance_flags_accounts() {
    let conn = base_conn();
    let st = onboarding::status(&conn).unwrap();
    assert_eq!(
        st.missing_data,
        vec!["account_balances", "debt_balances", "goals"]
    );
}

#[test]
fn onboarding_with_a_nameless_account_keeps_existing_ones() {
    let conn = base_conn();
    conn.execute(
        "INSERT INTO accounts(name, type, current_balance) VALUES ('Checking', 'checking', '1200')",
        [],
    )
    .unwrap();
    let err = run(
        &[
            "onboarding",
            "accounts",
            "--data",
            r#"[{"name": "HYSA", "balance": 9000}, {"balance": 5}]"#,
        ],
        |m| onboarding::handle(&conn, m),
    )
    .unwrap_err();
    assert_eq!(describe(&err).0, 2);
    let all = load_accounts(&conn).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Checking");
}

#[test]
fn out_of_range_delta_amount_is_validation() {
    let conn = base_conn();
    let err = run(
        &[
            "account",
            "update",
            "--data",
            r#"[{"name": "Vault", "balance": "100000000000000000000"}]"#,
        ],
        |m| accounts::handle(&conn, m),
    )
    .unwrap_err();
    assert_eq!(describe(&err).0, 2);
    assert!(load_accounts(&conn).unwrap().is_empty());

    let err = run(
        &["goal", "update", "--data", r#"[{"name": "Moon", "target_amount": "2000000000000"}]"#],
        |m| goals::handle(&conn, m),
    )
    .unwrap_err();
    assert_eq!(describe(&err).0, 2);
}
