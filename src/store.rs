// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Narrow data-access helpers shared by the ledger components. Each lookup is
//! owner-scoped where the record carries an owner; a foreign owner's record is
//! reported as not found.

use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};
use crate::models::{Account, Budget, BudgetItem, Category, Frequency, RecurringRule, Transaction};
use crate::recurrence;

pub fn decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .map_err(|_| LedgerError::Storage(format!("invalid decimal '{}'", s)))
}

fn map_account(r: &Row) -> rusqlite::Result<(i64, i64, String, String, String, String, String, bool)> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
        r.get(7)?,
    ))
}

fn account_from(parts: (i64, i64, String, String, String, String, String, bool)) -> Result<Account> {
    let (id, owner_id, name, kind, currency, initial, current, archived) = parts;
    Ok(Account {
        id,
        owner_id,
        name,
        r#type: kind,
        currency,
        initial_balance: decimal(&initial)?,
        current_balance: decimal(&current)?,
        archived,
    })
}

const ACCOUNT_COLS: &str =
    "id, owner_id, name, type, currency, initial_balance, current_balance, archived";

pub fn find_account(conn: &Connection, id: i64) -> Result<Option<Account>> {
    let parts = conn
        .query_row(
            &format!("SELECT {} FROM accounts WHERE id=?1", ACCOUNT_COLS),
            params![id],
            map_account,
        )
        .optional()?;
    parts.map(account_from).transpose()
}

/// Loads an account and verifies ownership; both failures surface identically.
pub fn account_owned(conn: &Connection, owner_id: i64, id: i64) -> Result<Account> {
    match find_account(conn, id)? {
        Some(acc) if acc.owner_id == owner_id => Ok(acc),
        _ => Err(LedgerError::AccountNotFound(format!("id {}", id))),
    }
}

pub fn account_by_name(conn: &Connection, owner_id: i64, name: &str) -> Result<Account> {
    let parts = conn
        .query_row(
            &format!(
                "SELECT {} FROM accounts WHERE owner_id=?1 AND name=?2",
                ACCOUNT_COLS
            ),
            params![owner_id, name],
            map_account,
        )
        .optional()?;
    match parts {
        Some(p) => account_from(p),
        None => Err(LedgerError::AccountNotFound(name.to_string())),
    }
}

pub fn accounts_by_owner(
    conn: &Connection,
    owner_id: i64,
    include_archived: bool,
) -> Result<Vec<Account>> {
    let sql = if include_archived {
        format!(
            "SELECT {} FROM accounts WHERE owner_id=?1 ORDER BY name",
            ACCOUNT_COLS
        )
    } else {
        format!(
            "SELECT {} FROM accounts WHERE owner_id=?1 AND archived=0 ORDER BY name",
            ACCOUNT_COLS
        )
    };
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![owner_id], map_account)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(account_from(row?)?);
    }
    Ok(out)
}

pub fn exists_transactions_for(conn: &Connection, account_id: i64) -> Result<bool> {
    let hit: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM transactions WHERE account_id=?1 LIMIT 1",
            params![account_id],
            |r| r.get(0),
        )
        .optional()?;
    Ok(hit.is_some())
}

fn map_category(r: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: r.get(0)?,
        owner_id: r.get(1)?,
        name: r.get(2)?,
        r#type: r.get(3)?,
    })
}

pub fn category_owned(conn: &Connection, owner_id: i64, id: i64) -> Result<Category> {
    let cat = conn
        .query_row(
            "SELECT id, owner_id, name, type FROM categories WHERE id=?1",
            params![id],
            map_category,
        )
        .optional()?;
    match cat {
        Some(c) if c.owner_id == owner_id => Ok(c),
        _ => Err(LedgerError::CategoryNotFound(format!("id {}", id))),
    }
}

pub fn category_by_name(conn: &Connection, owner_id: i64, name: &str) -> Result<Category> {
    conn.query_row(
        "SELECT id, owner_id, name, type FROM categories WHERE owner_id=?1 AND name=?2",
        params![owner_id, name],
        map_category,
    )
    .optional()?
    .ok_or_else(|| LedgerError::CategoryNotFound(name.to_string()))
}

/// The category transfer legs are filed under: the oldest TRANSFER-typed
/// category the owner has. No implicit creation when absent.
pub fn transfer_category(conn: &Connection, owner_id: i64) -> Result<Category> {
    conn.query_row(
        "SELECT id, owner_id, name, type FROM categories
         WHERE owner_id=?1 AND type='TRANSFER' ORDER BY id LIMIT 1",
        params![owner_id],
        map_category,
    )
    .optional()?
    .ok_or_else(|| LedgerError::CategoryNotFound("type TRANSFER".to_string()))
}

const TRANSACTION_COLS: &str = "id, owner_id, account_id, category_id, type, amount, currency, \
                                date, time, status, linked_transaction_id, description, reference";

fn map_transaction(r: &Row) -> rusqlite::Result<(Transaction, String)> {
    let amount: String = r.get(5)?;
    Ok((
        Transaction {
            id: r.get(0)?,
            owner_id: r.get(1)?,
            account_id: r.get(2)?,
            category_id: r.get(3)?,
            r#type: r.get(4)?,
            amount: Decimal::ZERO,
            currency: r.get(6)?,
            date: r.get(7)?,
            time: r.get(8)?,
            status: r.get(9)?,
            linked_transaction_id: r.get(10)?,
            description: r.get(11)?,
            reference: r.get(12)?,
        },
        amount,
    ))
}

fn transaction_from(pair: (Transaction, String)) -> Result<Transaction> {
    let (mut t, amount) = pair;
    t.amount = decimal(&amount)?;
    Ok(t)
}

pub fn transaction_owned(conn: &Connection, owner_id: i64, id: i64) -> Result<Transaction> {
    let pair = conn
        .query_row(
            &format!("SELECT {} FROM transactions WHERE id=?1", TRANSACTION_COLS),
            params![id],
            map_transaction,
        )
        .optional()?;
    match pair {
        Some(p) => {
            let t = transaction_from(p)?;
            if t.owner_id == owner_id {
                Ok(t)
            } else {
                Err(LedgerError::TransactionNotFound(id))
            }
        }
        None => Err(LedgerError::TransactionNotFound(id)),
    }
}

pub fn insert_transaction(conn: &Connection, t: &Transaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions(owner_id, account_id, category_id, type, amount, currency,
                                  date, time, status, linked_transaction_id, description, reference)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
        params![
            t.owner_id,
            t.account_id,
            t.category_id,
            t.r#type,
            t.amount.to_string(),
            t.currency,
            t.date,
            t.time,
            t.status,
            t.linked_transaction_id,
            t.description,
            t.reference
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn map_rule(r: &Row) -> rusqlite::Result<(RecurringRule, String, String, Option<String>)> {
    let amount: String = r.get(5)?;
    let frequency: String = r.get(8)?;
    let day_of_week: Option<String> = r.get(11)?;
    Ok((
        RecurringRule {
            id: r.get(0)?,
            owner_id: r.get(1)?,
            account_id: r.get(2)?,
            category_id: r.get(3)?,
            r#type: r.get(4)?,
            amount: Decimal::ZERO,
            currency: r.get(6)?,
            description: r.get(7)?,
            frequency: Frequency::Daily,
            interval: r.get(9)?,
            day_of_month: r.get(10)?,
            day_of_week: None,
            start_date: r.get(12)?,
            end_date: r.get(13)?,
            next_run_date: r.get(14)?,
            active: r.get(15)?,
        },
        amount,
        frequency,
        day_of_week,
    ))
}

fn rule_from(parts: (RecurringRule, String, String, Option<String>)) -> Result<RecurringRule> {
    let (mut rule, amount, frequency, day_of_week) = parts;
    rule.amount = decimal(&amount)?;
    rule.frequency = Frequency::parse(&frequency)?;
    rule.day_of_week = match day_of_week {
        Some(name) => Some(recurrence::weekday_from_name(&name)?),
        None => None,
    };
    Ok(rule)
}

const RULE_COLS: &str = "id, owner_id, account_id, category_id, type, amount, currency, \
                         description, frequency, interval, day_of_month, day_of_week, \
                         start_date, end_date, next_run_date, active";

pub fn rule_owned(conn: &Connection, owner_id: i64, id: i64) -> Result<RecurringRule> {
    let parts = conn
        .query_row(
            &format!("SELECT {} FROM recurring_rules WHERE id=?1", RULE_COLS),
            params![id],
            map_rule,
        )
        .optional()?;
    match parts {
        Some(p) => {
            let rule = rule_from(p)?;
            if rule.owner_id == owner_id {
                Ok(rule)
            } else {
                Err(LedgerError::RecurringRuleNotFound(id))
            }
        }
        None => Err(LedgerError::RecurringRuleNotFound(id)),
    }
}

pub fn rules_by_owner(
    conn: &Connection,
    owner_id: i64,
    active: Option<bool>,
) -> Result<Vec<RecurringRule>> {
    let mut sql = format!(
        "SELECT {} FROM recurring_rules WHERE owner_id=?1",
        RULE_COLS
    );
    if active.is_some() {
        sql.push_str(" AND active=?2");
    }
    sql.push_str(" ORDER BY next_run_date");
    let mut stmt = conn.prepare(&sql)?;
    let mut out = Vec::new();
    if let Some(flag) = active {
        let rows = stmt.query_map(params![owner_id, flag], map_rule)?;
        for row in rows {
            out.push(rule_from(row?)?);
        }
    } else {
        let rows = stmt.query_map(params![owner_id], map_rule)?;
        for row in rows {
            out.push(rule_from(row?)?);
        }
    }
    Ok(out)
}

fn map_budget(r: &Row) -> rusqlite::Result<(Budget, String, Option<String>)> {
    let period: String = r.get(3)?;
    let limit: Option<String> = r.get(6)?;
    Ok((
        Budget {
            id: r.get(0)?,
            owner_id: r.get(1)?,
            name: r.get(2)?,
            period_type: crate::models::PeriodType::Custom,
            start_date: r.get(4)?,
            end_date: r.get(5)?,
            total_limit: None,
            notes: r.get(7)?,
        },
        period,
        limit,
    ))
}

fn budget_from(parts: (Budget, String, Option<String>)) -> Result<Budget> {
    let (mut b, period, limit) = parts;
    b.period_type = crate::models::PeriodType::parse(&period)?;
    b.total_limit = match limit {
        Some(s) => Some(decimal(&s)?),
        None => None,
    };
    Ok(b)
}

const BUDGET_COLS: &str = "id, owner_id, name, period_type, start_date, end_date, total_limit, notes";

pub fn budget_owned(conn: &Connection, owner_id: i64, id: i64) -> Result<Budget> {
    let parts = conn
        .query_row(
            &format!("SELECT {} FROM budgets WHERE id=?1", BUDGET_COLS),
            params![id],
            map_budget,
        )
        .optional()?;
    match parts {
        Some(p) => {
            let b = budget_from(p)?;
            if b.owner_id == owner_id {
                Ok(b)
            } else {
                Err(LedgerError::BudgetNotFound(id))
            }
        }
        None => Err(LedgerError::BudgetNotFound(id)),
    }
}

pub fn budgets_by_owner(conn: &Connection, owner_id: i64) -> Result<Vec<Budget>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM budgets WHERE owner_id=?1 ORDER BY start_date DESC",
        BUDGET_COLS
    ))?;
    let rows = stmt.query_map(params![owner_id], map_budget)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(budget_from(row?)?);
    }
    Ok(out)
}

fn map_item(r: &Row) -> rusqlite::Result<(BudgetItem, String)> {
    let limit: String = r.get(3)?;
    Ok((
        BudgetItem {
            id: r.get(0)?,
            budget_id: r.get(1)?,
            category_id: r.get(2)?,
            limit_amount: Decimal::ZERO,
            warning_percent: r.get(4)?,
        },
        limit,
    ))
}

fn item_from(parts: (BudgetItem, String)) -> Result<BudgetItem> {
    let (mut item, limit) = parts;
    item.limit_amount = decimal(&limit)?;
    Ok(item)
}

pub fn budget_item(conn: &Connection, id: i64) -> Result<BudgetItem> {
    conn.query_row(
        "SELECT id, budget_id, category_id, limit_amount, warning_percent
         FROM budget_items WHERE id=?1",
        params![id],
        map_item,
    )
    .optional()?
    .map(item_from)
    .transpose()?
    .ok_or(LedgerError::BudgetItemNotFound(id))
}

pub fn budget_items_for(conn: &Connection, budget_id: i64) -> Result<Vec<BudgetItem>> {
    let mut stmt = conn.prepare(
        "SELECT id, budget_id, category_id, limit_amount, warning_percent
         FROM budget_items WHERE budget_id=?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![budget_id], map_item)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(item_from(row?)?);
    }
    Ok(out)
}
