// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transaction processor: validates and records expenses, income, and
//! two-sided transfers. Every balance change goes through the account
//! ledger, inside a single store transaction per operation.

use chrono::NaiveDate;
use rusqlite::{Connection, TransactionBehavior, params};
use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};
use crate::ledger;
use crate::models::{Transaction, TransactionStatus, TransactionType, TransferOutcome};
use crate::store;

#[derive(Debug, Clone)]
pub struct TransactionRequest {
    pub owner_id: i64,
    pub account_id: i64,
    pub category_id: i64,
    pub r#type: TransactionType,
    pub amount: Decimal,
    pub currency: Option<String>,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub status: TransactionStatus,
    pub description: Option<String>,
    pub reference: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub owner_id: i64,
    pub source_account_id: i64,
    pub destination_account_id: i64,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub reference: Option<String>,
}

/// Records an EXPENSE or INCOME transaction. Only CLEARED transactions touch
/// the balance; PENDING ones wait for `update_status`. Returns the stored
/// record and the account balance after the operation.
pub fn create_transaction(
    conn: &mut Connection,
    req: &TransactionRequest,
    allow_negative: bool,
) -> Result<(Transaction, Decimal)> {
    if req.amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount);
    }
    if req.r#type == TransactionType::Transfer {
        return Err(LedgerError::InvalidTransactionType(
            req.r#type.as_str().to_string(),
        ));
    }

    // Immediate mode takes the write lock up front, serializing concurrent
    // balance mutations at the store.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let account = store::account_owned(&tx, req.owner_id, req.account_id)?;
    if account.archived {
        return Err(LedgerError::ArchivedAccount(account.name));
    }
    let category = store::category_owned(&tx, req.owner_id, req.category_id)?;
    if !category.r#type.eq_ignore_ascii_case(req.r#type.as_str()) {
        return Err(LedgerError::CategoryTypeMismatch {
            requested: req.r#type.as_str().to_string(),
            category: category.r#type,
        });
    }

    if req.r#type == TransactionType::Expense && req.status == TransactionStatus::Cleared {
        let projected = account.current_balance - req.amount;
        if projected < Decimal::ZERO && !allow_negative {
            return Err(LedgerError::InsufficientBalance {
                balance: account.current_balance,
                required: req.amount,
            });
        }
    }

    let record = Transaction {
        id: 0,
        owner_id: req.owner_id,
        account_id: req.account_id,
        category_id: req.category_id,
        r#type: req.r#type.as_str().to_string(),
        amount: req.amount,
        currency: req
            .currency
            .as_deref()
            .map(str::to_uppercase)
            .unwrap_or_else(|| account.currency.clone()),
        date: req.date,
        time: req.time.clone(),
        status: req.status.as_str().to_string(),
        linked_transaction_id: None,
        description: req.description.clone(),
        reference: req.reference.clone(),
    };
    let id = store::insert_transaction(&tx, &record)?;

    let balance_after = if req.status == TransactionStatus::Cleared {
        let delta = match req.r#type {
            TransactionType::Expense => -req.amount,
            _ => req.amount,
        };
        ledger::apply_delta(&tx, req.account_id, delta)?
    } else {
        account.current_balance
    };

    tx.commit()?;
    let stored = store::transaction_owned(conn, req.owner_id, id)?;
    Ok((stored, balance_after))
}

/// The only permitted transition is PENDING -> CLEARED, which applies the
/// held-back balance delta. Every other requested transition is a no-op on
/// purpose: a cleared transaction cannot be walked back.
pub fn update_status(
    conn: &mut Connection,
    owner_id: i64,
    transaction_id: i64,
    new_status: &str,
) -> Result<Transaction> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let record = store::transaction_owned(&tx, owner_id, transaction_id)?;
    if record.status == "PENDING" && new_status == "CLEARED" {
        let delta = if record.r#type == "EXPENSE" {
            -record.amount
        } else {
            record.amount
        };
        ledger::apply_delta(&tx, record.account_id, delta)?;
        tx.execute(
            "UPDATE transactions SET status='CLEARED', updated_at=datetime('now') WHERE id=?1",
            params![transaction_id],
        )?;
    }
    tx.commit()?;
    store::transaction_owned(conn, owner_id, transaction_id)
}

/// Moves funds between two same-currency accounts by writing a CLEARED
/// TRANSFER leg on each side. The two inserts, the mutual link update, and
/// both balance deltas commit or roll back as one unit; a half-written
/// transfer is never visible.
pub fn transfer_funds(
    conn: &mut Connection,
    req: &TransferRequest,
    allow_negative: bool,
) -> Result<TransferOutcome> {
    if req.amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount);
    }
    if req.source_account_id == req.destination_account_id {
        return Err(LedgerError::SameAccountTransfer);
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let source = store::account_owned(&tx, req.owner_id, req.source_account_id)?;
    let destination = store::account_owned(&tx, req.owner_id, req.destination_account_id)?;
    if source.archived {
        return Err(LedgerError::ArchivedAccount(source.name));
    }
    if destination.archived {
        return Err(LedgerError::ArchivedAccount(destination.name));
    }
    if source.currency != destination.currency {
        return Err(LedgerError::CurrencyMismatch(
            source.currency,
            destination.currency,
        ));
    }
    if !allow_negative && source.current_balance - req.amount < Decimal::ZERO {
        return Err(LedgerError::InsufficientBalance {
            balance: source.current_balance,
            required: req.amount,
        });
    }

    let category = store::transfer_category(&tx, req.owner_id)?;

    let out_leg = Transaction {
        id: 0,
        owner_id: req.owner_id,
        account_id: source.id,
        category_id: category.id,
        r#type: "TRANSFER".to_string(),
        amount: req.amount,
        currency: source.currency.clone(),
        date: req.date,
        time: None,
        status: "CLEARED".to_string(),
        linked_transaction_id: None,
        description: Some(
            req.description
                .clone()
                .unwrap_or_else(|| format!("Transfer to {}", destination.name)),
        ),
        reference: req.reference.clone(),
    };
    let out_id = store::insert_transaction(&tx, &out_leg)?;

    let in_leg = Transaction {
        account_id: destination.id,
        linked_transaction_id: Some(out_id),
        description: Some(
            req.description
                .clone()
                .unwrap_or_else(|| format!("Transfer from {}", source.name)),
        ),
        ..out_leg
    };
    let in_id = store::insert_transaction(&tx, &in_leg)?;

    tx.execute(
        "UPDATE transactions SET linked_transaction_id=?1, updated_at=datetime('now') WHERE id=?2",
        params![in_id, out_id],
    )?;

    let source_after = ledger::apply_delta(&tx, source.id, -req.amount)?;
    let destination_after = ledger::apply_delta(&tx, destination.id, req.amount)?;

    tx.commit()?;

    Ok(TransferOutcome {
        out_transaction_id: out_id,
        in_transaction_id: in_id,
        source_account_id: source.id,
        source_account_name: source.name,
        source_balance_before: source.current_balance,
        source_balance_after: source_after,
        destination_account_id: destination.id,
        destination_account_name: destination.name,
        destination_balance_before: destination.current_balance,
        destination_balance_after: destination_after,
        amount: req.amount,
        currency: source.currency,
        date: req.date,
    })
}

pub fn get(conn: &Connection, owner_id: i64, transaction_id: i64) -> Result<Transaction> {
    store::transaction_owned(conn, owner_id, transaction_id)
}

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub account_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<String>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub limit: Option<usize>,
}

pub fn list_transactions(
    conn: &Connection,
    owner_id: i64,
    filter: &TransactionFilter,
) -> Result<Vec<Transaction>> {
    if let (Some(from), Some(to)) = (filter.from, filter.to) {
        if to < from {
            return Err(LedgerError::InvalidDateRange);
        }
    }
    if let (Some(min), Some(max)) = (filter.min_amount, filter.max_amount) {
        if max < min {
            return Err(LedgerError::InvalidAmountRange(format!(
                "min {} exceeds max {}",
                min, max
            )));
        }
    }

    let mut sql = String::from(
        "SELECT id, owner_id, account_id, category_id, type, amount, currency, date, time, \
                status, linked_transaction_id, description, reference \
         FROM transactions WHERE owner_id=?1",
    );
    let mut args: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(owner_id)];
    if let Some(account_id) = filter.account_id {
        args.push(Box::new(account_id));
        sql.push_str(&format!(" AND account_id=?{}", args.len()));
    }
    if let Some(from) = filter.from {
        args.push(Box::new(from));
        sql.push_str(&format!(" AND date>=?{}", args.len()));
    }
    if let Some(to) = filter.to {
        args.push(Box::new(to));
        sql.push_str(&format!(" AND date<=?{}", args.len()));
    }
    if let Some(ref status) = filter.status {
        args.push(Box::new(status.clone()));
        sql.push_str(&format!(" AND status=?{}", args.len()));
    }
    sql.push_str(" ORDER BY date DESC, id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = args.iter().map(|b| b.as_ref()).collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;

    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let amount_s: String = r.get(5)?;
        let amount = store::decimal(&amount_s)?;
        if let Some(min) = filter.min_amount {
            if amount < min {
                continue;
            }
        }
        if let Some(max) = filter.max_amount {
            if amount > max {
                continue;
            }
        }
        out.push(Transaction {
            id: r.get(0)?,
            owner_id: r.get(1)?,
            account_id: r.get(2)?,
            category_id: r.get(3)?,
            r#type: r.get(4)?,
            amount,
            currency: r.get(6)?,
            date: r.get(7)?,
            time: r.get(8)?,
            status: r.get(9)?,
            linked_transaction_id: r.get(10)?,
            description: r.get(11)?,
            reference: r.get(12)?,
        });
        if let Some(limit) = filter.limit {
            if out.len() == limit {
                break;
            }
        }
    }
    Ok(out)
}

/// Read-only query surface for the budget evaluator: CLEARED EXPENSE totals
/// per category over a date range, across all of the owner's accounts.
pub fn sum_cleared_expenses(
    conn: &Connection,
    owner_id: i64,
    category_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Decimal> {
    let mut stmt = conn.prepare_cached(
        "SELECT amount FROM transactions
         WHERE owner_id=?1 AND category_id=?2 AND type='EXPENSE' AND status='CLEARED'
           AND date>=?3 AND date<=?4",
    )?;
    let mut rows = stmt.query(params![owner_id, category_id, start, end])?;
    let mut total = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let amount: String = r.get(0)?;
        total += store::decimal(&amount)?;
    }
    Ok(total)
}
