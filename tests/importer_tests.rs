// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use daylimit::categorizer::Categorizer;
use daylimit::commands::importer::{self, content_hash, import_csv};
use daylimit::error::{AppError, describe};
use daylimit::{cli, db};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::io::Write;
use tempfile::NamedTempFile;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn csv_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

fn count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn importing_same_file_twice_reports_duplicates() {
    let mut conn = base_conn();
    let cat = Categorizer::load(&conn).unwrap();
    let file = csv_file("Date,Description,Amount,Category\n2025-06-03,Trader Joe's,42.10,Groceries\n");
    let path = file.path().to_str().unwrap();

    let first = import_csv(&mut conn, path, &cat).unwrap();
    assert_eq!(first.imported, 1);
    assert_eq!(first.duplicates, 0);

    let second = import_csv(&mut conn, path, &cat).unwrap();
    assert_eq!(second.imported, 0);
    assert_eq!(second.duplicates, 1);
    assert_eq!(second.total_parsed, 1);
    assert!(second.date_range.is_none());
    assert_eq!(count(&conn), 1);
}

#[test]
fn duplicate_rows_within_one_file_collapse() {
    let mut conn = base_conn();
    let cat = Categorizer::load(&conn).unwrap();
    let file = csv_file(
        "date,description,amount\n2025-06-03,Coffee,4.50\n2025-06-03,Coffee,4.5\n2025-06-04,Coffee,4.50\n",
    );
    let r = import_csv(&mut conn, file.path().to_str().unwrap(), &cat).unwrap();
    assert_eq!(r.imported, 2);
    assert_eq!(r.duplicates, 1);
    assert_eq!(count(&conn), 2);
}

#[test]
fn synonyms_quotes_and_formats_are_understood() {
    let mut conn = base_conn();
    let cat = Categorizer::load(&conn).unwrap();
    let file = csv_file(
        "\"Posted Date\",\"Merchant\",\"AMOUNT\"\n\
         06/05/2025,\"Shell, Inc.\",\"$1,234.50\"\n\
         2025-06-07,Refund desk,(45.10)\n",
    );
    let r = import_csv(&mut conn, file.path().to_str().unwrap(), &cat).unwrap();
    assert_eq!(r.imported, 2);
    let range = r.date_range.unwrap();
    assert_eq!(range.start.to_string(), "2025-06-05");
    assert_eq!(range.end.to_string(), "2025-06-07");
    // Positive amounts are expenses by default.
    assert_eq!(r.total_spend, "1234.50".parse::<Decimal>().unwrap());

    let (desc, amount, category): (String, String, String) = conn
        .query_row(
            "SELECT description, amount, category FROM transactions WHERE date='2025-06-05'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .unwrap();
    assert_eq!(desc, "Shell, Inc.");
    assert_eq!(amount.parse::<Decimal>().unwrap(), "1234.50".parse::<Decimal>().unwrap());
    assert_eq!(category, "Transportation");

    let refund: String = conn
        .query_row(
            "SELECT amount FROM transactions WHERE date='2025-06-07'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(refund.parse::<Decimal>().unwrap(), "-45.10".parse::<Decimal>().unwrap());
}

#[test]
fn bad_rows_are_dropped_not_fatal() {
    let mut conn = base_conn();
    let cat = Categorizer::load(&conn).unwrap();
    let file = csv_file(
        "Date,Description,Amount\n\
         not a date,Thing,1.00\n\
         2025-06-03,,1.00\n\
         2025-06-03,Thing,abc\n\
         2025-06-03,Corner Florist,12.00\n",
    );
    let r = import_csv(&mut conn, file.path().to_str().unwrap(), &cat).unwrap();
    assert_eq!(r.total_parsed, 1);
    assert_eq!(r.imported, 1);
    assert_eq!(r.categories, vec!["Other".to_string()]);
}

#[test]
fn provided_category_wins_over_categorizer() {
    let mut conn = base_conn();
    let cat = Categorizer::load(&conn).unwrap();
    let file = csv_file("Date,Description,Amount,Category\n2025-06-03,DoorDash,30,Restaurants\n2025-06-04,DoorDash,25,\n");
    let r = import_csv(&mut conn, file.path().to_str().unwrap(), &cat).unwrap();
    assert_eq!(r.categories, vec!["Delivery".to_string(), "Restaurants".to_string()]);
}

#[test]
fn nothing_parseable_is_an_import_error() {
    let mut conn = base_conn();
    let cat = Categorizer::load(&conn).unwrap();
    let file = csv_file("When,What,HowMuch\n2025-06-03,Coffee,4.50\n");
    let err = import_csv(&mut conn, file.path().to_str().unwrap(), &cat).unwrap_err();
    match err.downcast_ref::<AppError>() {
        Some(AppError::ImportEmpty { headers, sample }) => {
            assert_eq!(headers, &["When", "What", "HowMuch"].map(String::from).to_vec());
            assert_eq!(sample.as_ref().unwrap()[1], "Coffee");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(describe(&err).0, 2);
    assert_eq!(count(&conn), 0);
}

#[test]
fn missing_file_is_a_validation_error() {
    let mut conn = base_conn();
    let cat = Categorizer::load(&conn).unwrap();
    let err = import_csv(&mut conn, "/nonexistent/daylimit.csv", &cat).unwrap_err();
    assert_eq!(describe(&err).0, 2);
}

#[test]
fn hash_ignores_amount_scale() {
    let date = chrono::NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
    let a = content_hash(date, "Coffee", "4.5".parse().unwrap());
    let b = content_hash(date, "Coffee", "4.50".parse().unwrap());
    assert_eq!(a, b);
    assert_eq!(a.len(), 64);
    assert_ne!(a, content_hash(date, "Coffee", "4.51".parse().unwrap()));
}

#[test]
fn import_command_trims_path_and_records_timestamp() {
    let mut conn = base_conn();
    let cat = Categorizer::load(&conn).unwrap();
    let file = csv_file("date,description,amount\n2025-06-03,Shop,5.00\n");
    let padded = format!("  {}  ", file.path().to_str().unwrap());
    let matches = cli::build_cli().get_matches_from(["daylimit", "import", "--path", &padded]);
    if let Some(("import", sub)) = matches.subcommand() {
        importer::handle(&mut conn, sub, &cat).unwrap();
    } else {
        panic!("no import subcommand");
    }
    assert_eq!(count(&conn), 1);
    let stamp = daylimit::utils::get_setting(&conn, "last_transaction_import").unwrap();
    assert!(stamp.is_some());
}
