// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Recurring-rule management. Schedule math lives in `recurrence`; this
//! module validates rules and keeps `next_run_date` in step when
//! schedule-affecting fields change.

use chrono::{NaiveDate, Weekday};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};
use crate::models::{Frequency, RecurringRule, TransactionType};
use crate::recurrence;
use crate::store;

#[derive(Debug, Clone)]
pub struct RuleRequest {
    pub owner_id: i64,
    pub account_id: i64,
    pub category_id: i64,
    pub r#type: TransactionType,
    pub amount: Decimal,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub frequency: Frequency,
    pub interval: i64,
    pub day_of_month: Option<u32>,
    pub day_of_week: Option<Weekday>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

pub fn create_rule(conn: &Connection, req: &RuleRequest) -> Result<RecurringRule> {
    if req.amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount);
    }
    if req.interval < 1 {
        return Err(LedgerError::InvalidInterval);
    }
    if req.frequency == Frequency::Monthly {
        match req.day_of_month {
            Some(d) if (1..=31).contains(&d) => {}
            _ => return Err(LedgerError::InvalidDayOfMonth),
        }
    }
    if req.frequency == Frequency::Weekly && req.day_of_week.is_none() {
        return Err(LedgerError::InvalidDayOfWeek);
    }
    if let Some(end) = req.end_date {
        if end < req.start_date {
            return Err(LedgerError::InvalidDateRange);
        }
    }

    let account = store::account_owned(conn, req.owner_id, req.account_id)?;
    store::category_owned(conn, req.owner_id, req.category_id)?;

    let next_run = recurrence::initial_next_run(
        req.start_date,
        req.frequency,
        req.interval,
        req.day_of_month,
        req.day_of_week,
    );

    conn.execute(
        "INSERT INTO recurring_rules(owner_id, account_id, category_id, type, amount, currency,
                                     description, frequency, interval, day_of_month, day_of_week,
                                     start_date, end_date, next_run_date, active)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,1)",
        params![
            req.owner_id,
            req.account_id,
            req.category_id,
            req.r#type.as_str(),
            req.amount.to_string(),
            req.currency
                .as_deref()
                .map(str::to_uppercase)
                .unwrap_or_else(|| account.currency.clone()),
            req.description,
            req.frequency.as_str(),
            req.interval,
            req.day_of_month,
            req.day_of_week.map(recurrence::weekday_name),
            req.start_date,
            req.end_date,
            next_run,
        ],
    )?;
    store::rule_owned(conn, req.owner_id, conn.last_insert_rowid())
}

#[derive(Debug, Clone, Default)]
pub struct RuleUpdate {
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub interval: Option<i64>,
    pub day_of_month: Option<u32>,
    pub day_of_week: Option<Weekday>,
    pub end_date: Option<NaiveDate>,
}

/// Applies a partial update. Changing interval, day-of-month, or day-of-week
/// recomputes the next run from the rule's *current* next-run date with the
/// new parameters, never from the original start date.
pub fn update_rule(
    conn: &Connection,
    owner_id: i64,
    rule_id: i64,
    changes: &RuleUpdate,
) -> Result<RecurringRule> {
    let mut rule = store::rule_owned(conn, owner_id, rule_id)?;

    if let Some(amount) = changes.amount {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount);
        }
        rule.amount = amount;
    }
    if let Some(ref description) = changes.description {
        rule.description = Some(description.clone());
    }
    if let Some(interval) = changes.interval {
        if interval < 1 {
            return Err(LedgerError::InvalidInterval);
        }
        rule.interval = interval;
        rule.next_run_date = recurrence::next_run(
            rule.next_run_date,
            rule.frequency,
            rule.interval,
            rule.day_of_month,
        );
    }
    if let Some(day) = changes.day_of_month {
        if rule.frequency == Frequency::Monthly {
            if !(1..=31).contains(&day) {
                return Err(LedgerError::InvalidDayOfMonth);
            }
            rule.day_of_month = Some(day);
            rule.next_run_date = recurrence::next_run(
                rule.next_run_date,
                rule.frequency,
                rule.interval,
                rule.day_of_month,
            );
        }
    }
    if let Some(day) = changes.day_of_week {
        if rule.frequency == Frequency::Weekly {
            rule.day_of_week = Some(day);
            rule.next_run_date = recurrence::next_run(
                rule.next_run_date,
                rule.frequency,
                rule.interval,
                rule.day_of_month,
            );
        }
    }
    if let Some(end) = changes.end_date {
        if end < rule.start_date {
            return Err(LedgerError::InvalidDateRange);
        }
        rule.end_date = Some(end);
    }

    conn.execute(
        "UPDATE recurring_rules
         SET amount=?1, description=?2, interval=?3, day_of_month=?4, day_of_week=?5,
             end_date=?6, next_run_date=?7, updated_at=datetime('now')
         WHERE id=?8",
        params![
            rule.amount.to_string(),
            rule.description,
            rule.interval,
            rule.day_of_month,
            rule.day_of_week.map(recurrence::weekday_name),
            rule.end_date,
            rule.next_run_date,
            rule_id,
        ],
    )?;
    store::rule_owned(conn, owner_id, rule_id)
}

pub fn set_active(conn: &Connection, owner_id: i64, rule_id: i64, active: bool) -> Result<()> {
    store::rule_owned(conn, owner_id, rule_id)?;
    conn.execute(
        "UPDATE recurring_rules SET active=?1, updated_at=datetime('now') WHERE id=?2",
        params![active, rule_id],
    )?;
    Ok(())
}

pub fn delete_rule(conn: &Connection, owner_id: i64, rule_id: i64) -> Result<()> {
    store::rule_owned(conn, owner_id, rule_id)?;
    conn.execute(
        "DELETE FROM recurring_rules WHERE id=?1",
        params![rule_id],
    )?;
    Ok(())
}

pub fn list_rules(
    conn: &Connection,
    owner_id: i64,
    active: Option<bool>,
) -> Result<Vec<RecurringRule>> {
    store::rules_by_owner(conn, owner_id, active)
}
