// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Account ledger: owns every balance mutation and the archival rules.

use rusqlite::{Connection, params};
use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};
use crate::models::Account;
use crate::store;

/// Creates the owner row plus the records every fresh record set gets: a
/// zero-balance Cash account and the Income/Expense/Transfer categories.
pub fn onboard_owner(conn: &mut Connection, name: &str, currency: &str) -> Result<i64> {
    let currency = currency.to_uppercase();
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO users(name, currency) VALUES (?1, ?2)",
        params![name, currency],
    )?;
    let owner_id = tx.last_insert_rowid();
    tx.execute(
        "INSERT INTO accounts(owner_id, name, type, currency, initial_balance, current_balance)
         VALUES (?1, 'Cash', 'CASH', ?2, '0', '0')",
        params![owner_id, currency],
    )?;
    for (cat_name, cat_type) in [
        ("Income", "INCOME"),
        ("Expense", "EXPENSE"),
        ("Transfer", "TRANSFER"),
    ] {
        tx.execute(
            "INSERT INTO categories(owner_id, name, type) VALUES (?1, ?2, ?3)",
            params![owner_id, cat_name, cat_type],
        )?;
    }
    tx.commit()?;
    Ok(owner_id)
}

pub fn create_account(
    conn: &Connection,
    owner_id: i64,
    name: &str,
    kind: &str,
    currency: &str,
    initial_balance: Decimal,
) -> Result<Account> {
    if initial_balance < Decimal::ZERO {
        return Err(LedgerError::InvalidAmount);
    }
    conn.execute(
        "INSERT INTO accounts(owner_id, name, type, currency, initial_balance, current_balance)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![
            owner_id,
            name,
            kind,
            currency.to_uppercase(),
            initial_balance.to_string()
        ],
    )?;
    store::account_owned(conn, owner_id, conn.last_insert_rowid())
}

/// The only sanctioned way any component changes a balance. Runs inside
/// whatever store transaction the caller holds; returns the new balance.
pub fn apply_delta(conn: &Connection, account_id: i64, delta: Decimal) -> Result<Decimal> {
    let account = store::find_account(conn, account_id)?
        .ok_or_else(|| LedgerError::AccountNotFound(format!("id {}", account_id)))?;
    let new_balance = account.current_balance + delta;
    conn.execute(
        "UPDATE accounts SET current_balance=?1, updated_at=datetime('now') WHERE id=?2",
        params![new_balance.to_string(), account_id],
    )?;
    Ok(new_balance)
}

/// Terminal soft-delete. Refused while a balance remains unless forced.
pub fn archive(conn: &Connection, owner_id: i64, account_id: i64, force: bool) -> Result<()> {
    let account = store::account_owned(conn, owner_id, account_id)?;
    if !force && account.current_balance != Decimal::ZERO {
        return Err(LedgerError::AccountHasBalance(account.current_balance));
    }
    conn.execute(
        "UPDATE accounts SET archived=1, updated_at=datetime('now') WHERE id=?1",
        params![account_id],
    )?;
    Ok(())
}

/// Straight code swap, no conversion; refused once transactions reference
/// the account.
pub fn change_currency(
    conn: &Connection,
    owner_id: i64,
    account_id: i64,
    new_code: &str,
) -> Result<Account> {
    let account = store::account_owned(conn, owner_id, account_id)?;
    if store::exists_transactions_for(conn, account.id)? {
        return Err(LedgerError::AccountHasTransactions);
    }
    conn.execute(
        "UPDATE accounts SET currency=?1, updated_at=datetime('now') WHERE id=?2",
        params![new_code.to_uppercase(), account.id],
    )?;
    store::account_owned(conn, owner_id, account_id)
}

pub fn update_details(
    conn: &Connection,
    owner_id: i64,
    account_id: i64,
    name: Option<&str>,
    kind: Option<&str>,
) -> Result<Account> {
    let account = store::account_owned(conn, owner_id, account_id)?;
    if let Some(name) = name {
        conn.execute(
            "UPDATE accounts SET name=?1, updated_at=datetime('now') WHERE id=?2",
            params![name, account.id],
        )?;
    }
    if let Some(kind) = kind {
        conn.execute(
            "UPDATE accounts SET type=?1, updated_at=datetime('now') WHERE id=?2",
            params![kind, account.id],
        )?;
    }
    store::account_owned(conn, owner_id, account_id)
}
