// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budgets::{self, BudgetRequest, BudgetUpdate};
use crate::models::PeriodType;
use crate::store;
use crate::utils::{current_owner, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("update", sub)) => update(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("item-add", sub)) => item_add(conn, sub)?,
        Some(("item-update", sub)) => item_update(conn, sub)?,
        Some(("item-rm", sub)) => item_rm(conn, sub)?,
        Some(("items", sub)) => items(conn, sub)?,
        Some(("progress", sub)) => progress(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = current_owner(conn)?;
    let req = BudgetRequest {
        owner_id: owner,
        name: sub.get_one::<String>("name").unwrap().clone(),
        period_type: PeriodType::parse(sub.get_one::<String>("period").unwrap())?,
        start_date: parse_date(sub.get_one::<String>("start").unwrap())?,
        end_date: sub
            .get_one::<String>("end")
            .map(|s| parse_date(s))
            .transpose()?,
        total_limit: sub
            .get_one::<String>("limit")
            .map(|s| parse_decimal(s))
            .transpose()?,
        notes: sub.get_one::<String>("notes").cloned(),
    };
    let budget = budgets::create_budget(conn, &req)?;
    println!(
        "Added budget '{}' ({}) covering {} to {}",
        budget.name,
        budget.period_type.as_str(),
        budget.start_date,
        budget.end_date
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = current_owner(conn)?;
    let today = chrono::Utc::now().date_naive();
    let all = budgets::list_budgets(conn, owner)?;
    let data: Vec<Vec<String>> = all
        .iter()
        .map(|b| {
            vec![
                b.id.to_string(),
                b.name.clone(),
                b.period_type.as_str().to_string(),
                b.start_date.to_string(),
                b.end_date.to_string(),
                b.total_limit.map(|l| l.to_string()).unwrap_or_default(),
                budgets::budget_status(b.start_date, b.end_date, today)
                    .as_str()
                    .to_string(),
            ]
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Period", "Start", "End", "Limit", "Status"],
                data
            )
        );
    }
    Ok(())
}

fn update(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = current_owner(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let changes = BudgetUpdate {
        name: sub.get_one::<String>("name").cloned(),
        start_date: sub
            .get_one::<String>("start")
            .map(|s| parse_date(s))
            .transpose()?,
        end_date: sub
            .get_one::<String>("end")
            .map(|s| parse_date(s))
            .transpose()?,
        total_limit: sub
            .get_one::<String>("limit")
            .map(|s| parse_decimal(s))
            .transpose()?,
        notes: sub.get_one::<String>("notes").cloned(),
    };
    let budget = budgets::update_budget(conn, owner, id, &changes)?;
    println!("Updated budget '{}'", budget.name);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = current_owner(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    budgets::delete_budget(conn, owner, id)?;
    println!("Removed budget {}", id);
    Ok(())
}

fn item_add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = current_owner(conn)?;
    let budget_id = *sub.get_one::<i64>("budget").unwrap();
    let category =
        store::category_by_name(conn, owner, sub.get_one::<String>("category").unwrap())?;
    let limit = parse_decimal(sub.get_one::<String>("limit").unwrap())?;
    let warning = sub.get_one::<i64>("warning").copied();
    let item = budgets::add_item(conn, owner, budget_id, category.id, limit, warning)?;
    println!(
        "Added item {} for '{}' with limit {} (warn at {}%)",
        item.id, category.name, item.limit_amount, item.warning_percent
    );
    Ok(())
}

fn item_update(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = current_owner(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let limit = sub
        .get_one::<String>("limit")
        .map(|s| parse_decimal(s))
        .transpose()?;
    let warning = sub.get_one::<i64>("warning").copied();
    let item = budgets::update_item(conn, owner, id, limit, warning)?;
    println!(
        "Updated item {}: limit {} (warn at {}%)",
        item.id, item.limit_amount, item.warning_percent
    );
    Ok(())
}

fn item_rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = current_owner(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    budgets::delete_item(conn, owner, id)?;
    println!("Removed item {}", id);
    Ok(())
}

fn items(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = current_owner(conn)?;
    let budget_id = *sub.get_one::<i64>("budget").unwrap();
    let all = budgets::list_items(conn, owner, budget_id)?;
    let rows: Vec<Vec<String>> = all
        .iter()
        .map(|i| {
            vec![
                i.id.to_string(),
                i.category_id.to_string(),
                i.limit_amount.to_string(),
                format!("{}%", i.warning_percent),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Category", "Limit", "Warn"], rows)
    );
    Ok(())
}

fn progress(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = current_owner(conn)?;
    let from = sub
        .get_one::<String>("from")
        .map(|s| parse_date(s))
        .transpose()?;
    let to = sub
        .get_one::<String>("to")
        .map(|s| parse_date(s))
        .transpose()?;
    let today = chrono::Utc::now().date_naive();
    let reports = budgets::progress(conn, owner, from, to, today)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &reports)? {
        return Ok(());
    }
    for report in &reports {
        println!(
            "{} [{}] {} to {} - {} of {} spent ({:.1}%, {})",
            report.budget_name,
            report.budget_status.as_str(),
            report.budget_start_date,
            report.budget_end_date,
            report.total_actual,
            report.total_budgeted,
            report.overall_percentage,
            report.overall_status.as_str()
        );
        let rows: Vec<Vec<String>> = report
            .items
            .iter()
            .map(|i| {
                vec![
                    i.category_name.clone(),
                    i.budgeted.to_string(),
                    i.actual.to_string(),
                    i.remaining.to_string(),
                    format!("{:.1}%", i.percentage),
                    i.status.as_str().to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Category", "Budgeted", "Actual", "Remaining", "Used", "Status"],
                rows
            )
        );
    }
    Ok(())
}
