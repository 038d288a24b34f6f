// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use serde_json::json;
use spendclip::{cli, commands::exporter, db};
use tempfile::tempdir;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute("INSERT INTO users(name, currency) VALUES('tester','USD')", [])
        .unwrap();
    conn.execute("INSERT INTO settings(key, value) VALUES('owner','1')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO accounts(owner_id, name, type, currency, initial_balance, current_balance)
         VALUES (1,'Checking','BANK','USD','100','87.66')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO categories(owner_id, name, type) VALUES (1,'Groceries','EXPENSE')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(owner_id, account_id, category_id, type, amount, currency,
                                  date, status, description)
         VALUES (1, 1, 1, 'EXPENSE', '12.34', 'USD', '2025-01-02', 'CLEARED', 'Weekly run')",
        [],
    )
    .unwrap();
    conn
}

#[test]
fn export_transactions_writes_pretty_json() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "spendclip",
        "export",
        "transactions",
        "--format",
        "json",
        "--out",
        &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&conn, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "date": "2025-01-02",
                "account": "Checking",
                "category": "Groceries",
                "type": "EXPENSE",
                "amount": "12.34",
                "currency": "USD",
                "status": "CLEARED",
                "description": "Weekly run",
                "reference": null
            }
        ])
    );
}

#[test]
fn export_transactions_writes_csv_with_header() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "spendclip",
        "export",
        "transactions",
        "--format",
        "csv",
        "--out",
        &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&conn, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next().unwrap(),
        "date,account,category,type,amount,currency,status,description,reference"
    );
    assert_eq!(
        lines.next().unwrap(),
        "2025-01-02,Checking,Groceries,EXPENSE,12.34,USD,CLEARED,Weekly run,"
    );
}

#[test]
fn export_budgets_includes_items() {
    let conn = base_conn();
    conn.execute(
        "INSERT INTO budgets(owner_id, name, period_type, start_date, end_date)
         VALUES (1,'August','MONTHLY','2025-08-01','2025-08-31')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO budget_items(budget_id, category_id, limit_amount, warning_percent)
         VALUES (1, 1, '10000', 80)",
        [],
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("budgets.json");
    let out_str = out_path.to_string_lossy().to_string();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "spendclip",
        "export",
        "budgets",
        "--format",
        "json",
        "--out",
        &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&conn, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed[0]["budget"], "August");
    assert_eq!(parsed[0]["category"], "Groceries");
    assert_eq!(parsed[0]["item_limit"], "10000");
    assert_eq!(parsed[0]["warning_percent"], 80);
}
