// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget management and the progress evaluator. Evaluation is read-only:
//! it reaches transaction history exclusively through the transaction
//! processor's query surface.

use chrono::{Datelike, Days, Months, NaiveDate};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};
use crate::models::{
    Budget, BudgetItem, BudgetItemProgress, BudgetProgress, BudgetStatus, ItemStatus, PeriodType,
};
use crate::recurrence;
use crate::store;
use crate::transactions;

const DEFAULT_WARNING_PERCENT: i64 = 80;

#[derive(Debug, Clone)]
pub struct BudgetRequest {
    pub owner_id: i64,
    pub name: String,
    pub period_type: PeriodType,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub total_limit: Option<Decimal>,
    pub notes: Option<String>,
}

/// Inclusive end date for a fixed-length period: start + period - 1 day.
fn period_end(start: NaiveDate, period_type: PeriodType) -> NaiveDate {
    match period_type {
        PeriodType::Weekly => start + Days::new(6),
        PeriodType::Monthly => start + Months::new(1) - Days::new(1),
        PeriodType::Yearly => start + Months::new(12) - Days::new(1),
        PeriodType::Custom => start,
    }
}

pub fn create_budget(conn: &Connection, req: &BudgetRequest) -> Result<Budget> {
    let end_date = if req.period_type == PeriodType::Custom {
        req.end_date.ok_or(LedgerError::InvalidDateRange)?
    } else {
        period_end(req.start_date, req.period_type)
    };
    if end_date < req.start_date {
        return Err(LedgerError::InvalidDateRange);
    }
    if let Some(limit) = req.total_limit {
        if limit <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount);
        }
    }

    conn.execute(
        "INSERT INTO budgets(owner_id, name, period_type, start_date, end_date, total_limit, notes)
         VALUES (?1,?2,?3,?4,?5,?6,?7)",
        params![
            req.owner_id,
            req.name,
            req.period_type.as_str(),
            req.start_date,
            end_date,
            req.total_limit.map(|l| l.to_string()),
            req.notes,
        ],
    )?;
    store::budget_owned(conn, req.owner_id, conn.last_insert_rowid())
}

#[derive(Debug, Clone, Default)]
pub struct BudgetUpdate {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_limit: Option<Decimal>,
    pub notes: Option<String>,
}

pub fn update_budget(
    conn: &Connection,
    owner_id: i64,
    budget_id: i64,
    changes: &BudgetUpdate,
) -> Result<Budget> {
    let mut budget = store::budget_owned(conn, owner_id, budget_id)?;
    if let Some(ref name) = changes.name {
        budget.name = name.clone();
    }
    if let Some(start) = changes.start_date {
        budget.start_date = start;
    }
    if let Some(end) = changes.end_date {
        budget.end_date = end;
    }
    if budget.end_date < budget.start_date {
        return Err(LedgerError::InvalidDateRange);
    }
    if let Some(limit) = changes.total_limit {
        if limit <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount);
        }
        budget.total_limit = Some(limit);
    }
    if let Some(ref notes) = changes.notes {
        budget.notes = Some(notes.clone());
    }

    conn.execute(
        "UPDATE budgets
         SET name=?1, start_date=?2, end_date=?3, total_limit=?4, notes=?5,
             updated_at=datetime('now')
         WHERE id=?6",
        params![
            budget.name,
            budget.start_date,
            budget.end_date,
            budget.total_limit.map(|l| l.to_string()),
            budget.notes,
            budget_id,
        ],
    )?;
    store::budget_owned(conn, owner_id, budget_id)
}

pub fn delete_budget(conn: &Connection, owner_id: i64, budget_id: i64) -> Result<()> {
    store::budget_owned(conn, owner_id, budget_id)?;
    conn.execute(
        "DELETE FROM budget_items WHERE budget_id=?1",
        params![budget_id],
    )?;
    conn.execute("DELETE FROM budgets WHERE id=?1", params![budget_id])?;
    Ok(())
}

pub fn list_budgets(conn: &Connection, owner_id: i64) -> Result<Vec<Budget>> {
    store::budgets_by_owner(conn, owner_id)
}

pub fn add_item(
    conn: &Connection,
    owner_id: i64,
    budget_id: i64,
    category_id: i64,
    limit_amount: Decimal,
    warning_percent: Option<i64>,
) -> Result<BudgetItem> {
    store::budget_owned(conn, owner_id, budget_id)?;
    store::category_owned(conn, owner_id, category_id)?;
    if limit_amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount);
    }
    let warning = warning_percent.unwrap_or(DEFAULT_WARNING_PERCENT);
    if !(1..=100).contains(&warning) {
        return Err(LedgerError::InvalidAmountRange(format!(
            "warning percent {} outside 1-100",
            warning
        )));
    }
    conn.execute(
        "INSERT INTO budget_items(budget_id, category_id, limit_amount, warning_percent)
         VALUES (?1,?2,?3,?4)",
        params![budget_id, category_id, limit_amount.to_string(), warning],
    )?;
    store::budget_item(conn, conn.last_insert_rowid())
}

pub fn update_item(
    conn: &Connection,
    owner_id: i64,
    item_id: i64,
    limit_amount: Option<Decimal>,
    warning_percent: Option<i64>,
) -> Result<BudgetItem> {
    let item = store::budget_item(conn, item_id)?;
    store::budget_owned(conn, owner_id, item.budget_id)?;
    if let Some(limit) = limit_amount {
        if limit <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount);
        }
        conn.execute(
            "UPDATE budget_items SET limit_amount=?1 WHERE id=?2",
            params![limit.to_string(), item_id],
        )?;
    }
    if let Some(warning) = warning_percent {
        if !(1..=100).contains(&warning) {
            return Err(LedgerError::InvalidAmountRange(format!(
                "warning percent {} outside 1-100",
                warning
            )));
        }
        conn.execute(
            "UPDATE budget_items SET warning_percent=?1 WHERE id=?2",
            params![warning, item_id],
        )?;
    }
    store::budget_item(conn, item_id)
}

pub fn delete_item(conn: &Connection, owner_id: i64, item_id: i64) -> Result<()> {
    let item = store::budget_item(conn, item_id)?;
    store::budget_owned(conn, owner_id, item.budget_id)?;
    conn.execute("DELETE FROM budget_items WHERE id=?1", params![item_id])?;
    Ok(())
}

pub fn list_items(conn: &Connection, owner_id: i64, budget_id: i64) -> Result<Vec<BudgetItem>> {
    store::budget_owned(conn, owner_id, budget_id)?;
    store::budget_items_for(conn, budget_id)
}

/// UPCOMING before the range, EXPIRED after it, ACTIVE inside it. Derived
/// on every read, never stored.
pub fn budget_status(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> BudgetStatus {
    if today < start {
        BudgetStatus::Upcoming
    } else if today > end {
        BudgetStatus::Expired
    } else {
        BudgetStatus::Active
    }
}

fn item_status(percentage: Decimal, warning_percent: i64) -> ItemStatus {
    if percentage >= Decimal::from(100) {
        ItemStatus::OverBudget
    } else if percentage >= Decimal::from(warning_percent) {
        ItemStatus::Warning
    } else {
        ItemStatus::OnTrack
    }
}

fn consumption_percentage(actual: Decimal, limit: Decimal) -> Decimal {
    if limit > Decimal::ZERO {
        (actual / limit * Decimal::from(100)).round_dp(4)
    } else {
        Decimal::ZERO
    }
}

/// Progress for every budget overlapping the reporting window. Item actuals
/// are measured over the budget's own date range, not the window; the window
/// only selects which budgets appear. Defaults to the current month.
pub fn progress(
    conn: &Connection,
    owner_id: i64,
    report_start: Option<NaiveDate>,
    report_end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<Vec<BudgetProgress>> {
    let (report_start, report_end) = match (report_start, report_end) {
        (Some(start), Some(end)) => {
            if end < start {
                return Err(LedgerError::InvalidDateRange);
            }
            (start, end)
        }
        _ => {
            let first = today.with_day(1).unwrap_or(today);
            let last_day = recurrence::days_in_month(today.year(), today.month());
            let last = today.with_day(last_day).unwrap_or(today);
            (first, last)
        }
    };

    let budgets = store::budgets_by_owner(conn, owner_id)?;
    let mut reports = Vec::new();
    for budget in budgets {
        if budget.end_date < report_start || budget.start_date > report_end {
            continue;
        }

        let items = store::budget_items_for(conn, budget.id)?;
        let mut item_reports = Vec::new();
        let mut total_budgeted = Decimal::ZERO;
        let mut total_actual = Decimal::ZERO;
        for item in items {
            let actual = transactions::sum_cleared_expenses(
                conn,
                owner_id,
                item.category_id,
                budget.start_date,
                budget.end_date,
            )?;
            let remaining = item.limit_amount - actual;
            let percentage = consumption_percentage(actual, item.limit_amount);
            let category_name: Option<String> = conn
                .query_row(
                    "SELECT name FROM categories WHERE id=?1",
                    params![item.category_id],
                    |r| r.get(0),
                )
                .optional()?;

            total_budgeted += item.limit_amount;
            total_actual += actual;
            item_reports.push(BudgetItemProgress {
                budget_item_id: item.id,
                category_id: item.category_id,
                category_name: category_name.unwrap_or_default(),
                budgeted: item.limit_amount,
                actual,
                remaining,
                percentage,
                status: item_status(percentage, item.warning_percent),
                warning_percent: item.warning_percent,
            });
        }

        let overall_percentage = consumption_percentage(total_actual, total_budgeted);
        reports.push(BudgetProgress {
            budget_id: budget.id,
            budget_name: budget.name,
            budget_start_date: budget.start_date,
            budget_end_date: budget.end_date,
            budget_status: budget_status(budget.start_date, budget.end_date, today),
            total_budgeted,
            total_actual,
            total_remaining: total_budgeted - total_actual,
            overall_percentage,
            overall_status: item_status(overall_percentage, DEFAULT_WARNING_PERCENT),
            items: item_reports,
            report_start_date: report_start,
            report_end_date: report_end,
        });
    }
    Ok(reports)
}
