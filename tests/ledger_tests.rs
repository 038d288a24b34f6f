// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use spendclip::error::LedgerError;
use spendclip::{db, ledger};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute("INSERT INTO users(name, currency) VALUES('tester','PKR')", [])
        .unwrap();
    conn
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn create_account_starts_current_at_initial() {
    let conn = setup();
    let account = ledger::create_account(&conn, 1, "Wallet", "CASH", "pkr", dec("250.75")).unwrap();
    assert_eq!(account.initial_balance, dec("250.75"));
    assert_eq!(account.current_balance, dec("250.75"));
    assert_eq!(account.currency, "PKR");
    assert!(!account.archived);
}

#[test]
fn create_account_rejects_negative_initial_balance() {
    let conn = setup();
    let err = ledger::create_account(&conn, 1, "Wallet", "CASH", "PKR", dec("-1")).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount));
}

#[test]
fn apply_delta_moves_balance_both_ways() {
    let conn = setup();
    let account = ledger::create_account(&conn, 1, "Bank", "BANK", "PKR", dec("100")).unwrap();
    let after = ledger::apply_delta(&conn, account.id, dec("40.50")).unwrap();
    assert_eq!(after, dec("140.50"));
    let after = ledger::apply_delta(&conn, account.id, dec("-90.50")).unwrap();
    assert_eq!(after, dec("50.00"));
}

#[test]
fn apply_delta_unknown_account_fails() {
    let conn = setup();
    let err = ledger::apply_delta(&conn, 999, dec("10")).unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(_)));
}

#[test]
fn archive_refuses_nonzero_balance_without_force() {
    let conn = setup();
    let account = ledger::create_account(&conn, 1, "Bank", "BANK", "PKR", dec("75")).unwrap();
    let err = ledger::archive(&conn, 1, account.id, false).unwrap_err();
    match err {
        LedgerError::AccountHasBalance(balance) => assert_eq!(balance, dec("75")),
        other => panic!("unexpected error: {other:?}"),
    }

    ledger::archive(&conn, 1, account.id, true).unwrap();
    let archived: bool = conn
        .query_row(
            "SELECT archived FROM accounts WHERE id=?1",
            params![account.id],
            |r| r.get(0),
        )
        .unwrap();
    assert!(archived);
}

#[test]
fn archive_zero_balance_needs_no_force() {
    let conn = setup();
    let account = ledger::create_account(&conn, 1, "Empty", "CASH", "PKR", dec("0")).unwrap();
    ledger::archive(&conn, 1, account.id, false).unwrap();
}

#[test]
fn change_currency_blocked_once_transactions_exist() {
    let conn = setup();
    let account = ledger::create_account(&conn, 1, "Bank", "BANK", "PKR", dec("0")).unwrap();

    let updated = ledger::change_currency(&conn, 1, account.id, "eur").unwrap();
    assert_eq!(updated.currency, "EUR");

    conn.execute(
        "INSERT INTO categories(owner_id, name, type) VALUES(1,'Misc','EXPENSE')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(owner_id, account_id, category_id, type, amount, currency, date, status)
         VALUES (1, ?1, 1, 'EXPENSE', '5', 'EUR', '2025-01-05', 'PENDING')",
        params![account.id],
    )
    .unwrap();

    let err = ledger::change_currency(&conn, 1, account.id, "USD").unwrap_err();
    assert!(matches!(err, LedgerError::AccountHasTransactions));
}

#[test]
fn foreign_owner_account_reads_as_not_found() {
    let conn = setup();
    conn.execute("INSERT INTO users(name, currency) VALUES('other','PKR')", [])
        .unwrap();
    let account = ledger::create_account(&conn, 1, "Bank", "BANK", "PKR", dec("10")).unwrap();
    let err = ledger::archive(&conn, 2, account.id, true).unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(_)));
}

#[test]
fn onboarding_seeds_cash_account_and_default_categories() {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let owner = ledger::onboard_owner(&mut conn, "fresh", "pkr").unwrap();

    let (name, kind, currency, balance): (String, String, String, String) = conn
        .query_row(
            "SELECT name, type, currency, current_balance FROM accounts WHERE owner_id=?1",
            params![owner],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )
        .unwrap();
    assert_eq!(name, "Cash");
    assert_eq!(kind, "CASH");
    assert_eq!(currency, "PKR");
    assert_eq!(balance, "0");

    let categories: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM categories WHERE owner_id=?1",
            params![owner],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(categories, 3);
    let transfer_type: String = conn
        .query_row(
            "SELECT type FROM categories WHERE owner_id=?1 AND name='Transfer'",
            params![owner],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(transfer_type, "TRANSFER");
}
