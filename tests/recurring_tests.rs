// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, Weekday};
use rusqlite::Connection;
use rust_decimal::Decimal;
use spendclip::error::LedgerError;
use spendclip::models::{Frequency, TransactionType};
use spendclip::recurring::{self, RuleRequest, RuleUpdate};
use spendclip::{db, ledger};

fn setup() -> (Connection, i64, i64) {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute("INSERT INTO users(name, currency) VALUES('tester','PKR')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO categories(owner_id, name, type) VALUES (1,'Bills','EXPENSE')",
        [],
    )
    .unwrap();
    let account = ledger::create_account(&conn, 1, "Main", "BANK", "PKR", dec("1000")).unwrap();
    (conn, account.id, 1)
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn monthly_request(account: i64, category: i64) -> RuleRequest {
    RuleRequest {
        owner_id: 1,
        account_id: account,
        category_id: category,
        r#type: TransactionType::Expense,
        amount: dec("1500"),
        currency: None,
        description: Some("Rent".into()),
        frequency: Frequency::Monthly,
        interval: 1,
        day_of_month: Some(31),
        day_of_week: None,
        start_date: date(2025, 1, 31),
        end_date: None,
    }
}

#[test]
fn create_computes_initial_next_run_with_clamp() {
    let (conn, account, category) = setup();
    let rule = recurring::create_rule(&conn, &monthly_request(account, category)).unwrap();
    assert_eq!(rule.next_run_date, date(2025, 2, 28));
    assert!(rule.active);
    assert_eq!(rule.currency, "PKR");
    assert_eq!(rule.amount, dec("1500"));
}

#[test]
fn create_validates_schedule_fields() {
    let (conn, account, category) = setup();

    let mut bad = monthly_request(account, category);
    bad.interval = 0;
    assert!(matches!(
        recurring::create_rule(&conn, &bad).unwrap_err(),
        LedgerError::InvalidInterval
    ));

    let mut bad = monthly_request(account, category);
    bad.day_of_month = None;
    assert!(matches!(
        recurring::create_rule(&conn, &bad).unwrap_err(),
        LedgerError::InvalidDayOfMonth
    ));

    let mut bad = monthly_request(account, category);
    bad.day_of_month = Some(32);
    assert!(matches!(
        recurring::create_rule(&conn, &bad).unwrap_err(),
        LedgerError::InvalidDayOfMonth
    ));

    let mut bad = monthly_request(account, category);
    bad.frequency = Frequency::Weekly;
    bad.day_of_week = None;
    assert!(matches!(
        recurring::create_rule(&conn, &bad).unwrap_err(),
        LedgerError::InvalidDayOfWeek
    ));

    let mut bad = monthly_request(account, category);
    bad.end_date = Some(date(2025, 1, 1));
    assert!(matches!(
        recurring::create_rule(&conn, &bad).unwrap_err(),
        LedgerError::InvalidDateRange
    ));

    let mut bad = monthly_request(account, category);
    bad.amount = dec("0");
    assert!(matches!(
        recurring::create_rule(&conn, &bad).unwrap_err(),
        LedgerError::InvalidAmount
    ));

    let mut bad = monthly_request(account, category);
    bad.account_id = 77;
    assert!(matches!(
        recurring::create_rule(&conn, &bad).unwrap_err(),
        LedgerError::AccountNotFound(_)
    ));

    let mut bad = monthly_request(account, category);
    bad.category_id = 77;
    assert!(matches!(
        recurring::create_rule(&conn, &bad).unwrap_err(),
        LedgerError::CategoryNotFound(_)
    ));
}

// Schedule changes restep from the current next-run date, not the start date.
#[test]
fn interval_change_advances_from_current_next_run() {
    let (conn, account, category) = setup();
    let mut req = monthly_request(account, category);
    req.day_of_month = Some(15);
    req.start_date = date(2025, 1, 10);
    let rule = recurring::create_rule(&conn, &req).unwrap();
    assert_eq!(rule.next_run_date, date(2025, 2, 15));

    let updated = recurring::update_rule(
        &conn,
        1,
        rule.id,
        &RuleUpdate {
            interval: Some(2),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(updated.interval, 2);
    assert_eq!(updated.next_run_date, date(2025, 4, 15));
}

#[test]
fn day_of_month_change_resteps_with_new_day() {
    let (conn, account, category) = setup();
    let rule = recurring::create_rule(&conn, &monthly_request(account, category)).unwrap();
    // next run sits at Feb 28; switching to day 1 steps to Mar 1
    let updated = recurring::update_rule(
        &conn,
        1,
        rule.id,
        &RuleUpdate {
            day_of_month: Some(1),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(updated.day_of_month, Some(1));
    assert_eq!(updated.next_run_date, date(2025, 3, 1));
}

#[test]
fn day_of_week_change_ignored_for_monthly_rules() {
    let (conn, account, category) = setup();
    let rule = recurring::create_rule(&conn, &monthly_request(account, category)).unwrap();
    let updated = recurring::update_rule(
        &conn,
        1,
        rule.id,
        &RuleUpdate {
            day_of_week: Some(Weekday::Fri),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(updated.day_of_week, None);
    assert_eq!(updated.next_run_date, rule.next_run_date);
}

#[test]
fn update_validates_end_date_against_start() {
    let (conn, account, category) = setup();
    let rule = recurring::create_rule(&conn, &monthly_request(account, category)).unwrap();
    let err = recurring::update_rule(
        &conn,
        1,
        rule.id,
        &RuleUpdate {
            end_date: Some(date(2024, 12, 31)),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidDateRange));
}

#[test]
fn toggle_and_delete_lifecycle() {
    let (conn, account, category) = setup();
    let rule = recurring::create_rule(&conn, &monthly_request(account, category)).unwrap();

    recurring::set_active(&conn, 1, rule.id, false).unwrap();
    let listed = recurring::list_rules(&conn, 1, Some(false)).unwrap();
    assert_eq!(listed.len(), 1);
    assert!(!listed[0].active);
    assert!(recurring::list_rules(&conn, 1, Some(true)).unwrap().is_empty());

    recurring::delete_rule(&conn, 1, rule.id).unwrap();
    assert!(matches!(
        recurring::delete_rule(&conn, 1, rule.id).unwrap_err(),
        LedgerError::RecurringRuleNotFound(_)
    ));
    assert!(recurring::list_rules(&conn, 1, None).unwrap().is_empty());
}

#[test]
fn list_orders_by_next_run_date() {
    let (conn, account, category) = setup();
    let mut later = monthly_request(account, category);
    later.start_date = date(2025, 3, 15);
    later.day_of_month = Some(15);
    let mut sooner = monthly_request(account, category);
    sooner.start_date = date(2025, 1, 10);
    sooner.day_of_month = Some(10);

    let later_rule = recurring::create_rule(&conn, &later).unwrap();
    let sooner_rule = recurring::create_rule(&conn, &sooner).unwrap();

    let listed = recurring::list_rules(&conn, 1, None).unwrap();
    assert_eq!(listed[0].id, sooner_rule.id);
    assert_eq!(listed[1].id, later_rule.id);
}
