// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use spendclip::error::LedgerError;
use spendclip::transactions::{self, TransferRequest};
use spendclip::{db, ledger};

fn setup() -> (Connection, i64, i64) {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute("INSERT INTO users(name, currency) VALUES('tester','PKR')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO categories(owner_id, name, type) VALUES (1,'Transfer','TRANSFER')",
        [],
    )
    .unwrap();
    let a = ledger::create_account(&conn, 1, "A", "BANK", "PKR", dec("5000")).unwrap();
    let b = ledger::create_account(&conn, 1, "B", "BANK", "PKR", dec("0")).unwrap();
    (conn, a.id, b.id)
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn request(source: i64, destination: i64, amount: &str) -> TransferRequest {
    TransferRequest {
        owner_id: 1,
        source_account_id: source,
        destination_account_id: destination,
        amount: dec(amount),
        date: NaiveDate::from_ymd_opt(2025, 8, 5).unwrap(),
        description: None,
        reference: None,
    }
}

fn balance_of(conn: &Connection, account_id: i64) -> Decimal {
    let s: String = conn
        .query_row(
            "SELECT current_balance FROM accounts WHERE id=?1",
            params![account_id],
            |r| r.get(0),
        )
        .unwrap();
    s.parse().unwrap()
}

fn transaction_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap()
}

// 1000 from A(5000) to B(0) leaves 4000/1000 with mutually linked legs.
#[test]
fn transfer_moves_funds_and_links_both_legs() {
    let (mut conn, a, b) = setup();
    let outcome = transactions::transfer_funds(&mut conn, &request(a, b, "1000"), false).unwrap();

    assert_eq!(outcome.source_balance_before, dec("5000"));
    assert_eq!(outcome.source_balance_after, dec("4000"));
    assert_eq!(outcome.destination_balance_before, dec("0"));
    assert_eq!(outcome.destination_balance_after, dec("1000"));
    assert_eq!(balance_of(&conn, a), dec("4000"));
    assert_eq!(balance_of(&conn, b), dec("1000"));

    let out_leg = transactions::get(&conn, 1, outcome.out_transaction_id).unwrap();
    let in_leg = transactions::get(&conn, 1, outcome.in_transaction_id).unwrap();
    assert_eq!(out_leg.linked_transaction_id, Some(in_leg.id));
    assert_eq!(in_leg.linked_transaction_id, Some(out_leg.id));
    assert_eq!(out_leg.r#type, "TRANSFER");
    assert_eq!(in_leg.r#type, "TRANSFER");
    assert_eq!(out_leg.status, "CLEARED");
    assert_eq!(in_leg.status, "CLEARED");
    assert_eq!(out_leg.account_id, a);
    assert_eq!(in_leg.account_id, b);
    assert_eq!(out_leg.description.as_deref(), Some("Transfer to B"));
    assert_eq!(in_leg.description.as_deref(), Some("Transfer from A"));
}

#[test]
fn rejects_nonpositive_amount() {
    let (mut conn, a, b) = setup();
    let err = transactions::transfer_funds(&mut conn, &request(a, b, "-5"), false).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount));
}

#[test]
fn rejects_same_account() {
    let (mut conn, a, _) = setup();
    let err = transactions::transfer_funds(&mut conn, &request(a, a, "10"), false).unwrap_err();
    assert!(matches!(err, LedgerError::SameAccountTransfer));
}

#[test]
fn rejects_unknown_destination() {
    let (mut conn, a, _) = setup();
    let err = transactions::transfer_funds(&mut conn, &request(a, 999, "10"), false).unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(_)));
    assert_eq!(transaction_count(&conn), 0);
}

// 1000 from A(500) is refused and neither balance changes.
#[test]
fn insufficient_balance_leaves_no_trace() {
    let (mut conn, a, b) = setup();
    conn.execute(
        "UPDATE accounts SET current_balance='500' WHERE id=?1",
        params![a],
    )
    .unwrap();

    let err = transactions::transfer_funds(&mut conn, &request(a, b, "1000"), false).unwrap_err();
    match err {
        LedgerError::InsufficientBalance { balance, required } => {
            assert_eq!(balance, dec("500"));
            assert_eq!(required, dec("1000"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(balance_of(&conn, a), dec("500"));
    assert_eq!(balance_of(&conn, b), dec("0"));
    assert_eq!(transaction_count(&conn), 0);
}

#[test]
fn allow_negative_permits_overdraft() {
    let (mut conn, a, b) = setup();
    conn.execute(
        "UPDATE accounts SET current_balance='500' WHERE id=?1",
        params![a],
    )
    .unwrap();
    let outcome = transactions::transfer_funds(&mut conn, &request(a, b, "1000"), true).unwrap();
    assert_eq!(outcome.source_balance_after, dec("-500"));
    assert_eq!(outcome.destination_balance_after, dec("1000"));
}

#[test]
fn rejects_currency_mismatch() {
    let (mut conn, a, _) = setup();
    let c = ledger::create_account(&conn, 1, "C", "BANK", "USD", dec("0")).unwrap();
    let err = transactions::transfer_funds(&mut conn, &request(a, c.id, "10"), false).unwrap_err();
    match err {
        LedgerError::CurrencyMismatch(from, to) => {
            assert_eq!(from, "PKR");
            assert_eq!(to, "USD");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(transaction_count(&conn), 0);
}

#[test]
fn rejects_archived_endpoint() {
    let (mut conn, a, b) = setup();
    ledger::archive(&conn, 1, b, true).unwrap();
    let err = transactions::transfer_funds(&mut conn, &request(a, b, "10"), false).unwrap_err();
    match err {
        LedgerError::ArchivedAccount(name) => assert_eq!(name, "B"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(transaction_count(&conn), 0);
    assert_eq!(balance_of(&conn, a), dec("5000"));
}

// Failure after validation must roll everything back, not leave one leg.
#[test]
fn missing_transfer_category_aborts_atomically() {
    let (mut conn, a, b) = setup();
    conn.execute("DELETE FROM categories WHERE type='TRANSFER'", [])
        .unwrap();

    let err = transactions::transfer_funds(&mut conn, &request(a, b, "100"), false).unwrap_err();
    assert!(matches!(err, LedgerError::CategoryNotFound(_)));
    assert_eq!(transaction_count(&conn), 0);
    assert_eq!(balance_of(&conn, a), dec("5000"));
    assert_eq!(balance_of(&conn, b), dec("0"));
}
