// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Frequency, TransactionType};
use crate::recurrence;
use crate::recurring::{self, RuleRequest, RuleUpdate};
use crate::store;
use crate::utils::{current_owner, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("update", sub)) => update(conn, sub)?,
        Some(("activate", sub)) => toggle(conn, sub, true)?,
        Some(("deactivate", sub)) => toggle(conn, sub, false)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = current_owner(conn)?;
    let account = store::account_by_name(conn, owner, sub.get_one::<String>("account").unwrap())?;
    let category =
        store::category_by_name(conn, owner, sub.get_one::<String>("category").unwrap())?;
    let req = RuleRequest {
        owner_id: owner,
        account_id: account.id,
        category_id: category.id,
        r#type: TransactionType::parse(sub.get_one::<String>("type").unwrap())?,
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        currency: None,
        description: sub.get_one::<String>("description").cloned(),
        frequency: Frequency::parse(sub.get_one::<String>("frequency").unwrap())?,
        interval: *sub.get_one::<i64>("interval").unwrap(),
        day_of_month: sub.get_one::<u32>("day-of-month").copied(),
        day_of_week: sub
            .get_one::<String>("day-of-week")
            .map(|s| recurrence::weekday_from_name(s))
            .transpose()?,
        start_date: parse_date(sub.get_one::<String>("start").unwrap())?,
        end_date: sub
            .get_one::<String>("end")
            .map(|s| parse_date(s))
            .transpose()?,
    };
    let rule = recurring::create_rule(conn, &req)?;
    println!(
        "Added rule {}: {} {} {} ({}), next run {}",
        rule.id,
        recurrence::frequency_description(
            rule.frequency,
            rule.interval,
            rule.day_of_month,
            rule.day_of_week
        ),
        rule.amount,
        rule.currency,
        rule.r#type,
        rule.next_run_date
    );
    Ok(())
}

#[derive(Serialize)]
struct RuleRow {
    id: i64,
    r#type: String,
    amount: String,
    currency: String,
    schedule: String,
    next_run: String,
    status: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = current_owner(conn)?;
    let active = if sub.get_flag("active") {
        Some(true)
    } else if sub.get_flag("inactive") {
        Some(false)
    } else {
        None
    };
    let today = chrono::Utc::now().date_naive();
    let rules = recurring::list_rules(conn, owner, active)?;
    let data: Vec<RuleRow> = rules
        .iter()
        .map(|r| RuleRow {
            id: r.id,
            r#type: r.r#type.clone(),
            amount: r.amount.to_string(),
            currency: r.currency.clone(),
            schedule: recurrence::frequency_description(
                r.frequency,
                r.interval,
                r.day_of_month,
                r.day_of_week,
            ),
            next_run: r.next_run_date.to_string(),
            status: recurrence::status_description(r.active, r.end_date, today).to_string(),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.r#type.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                    r.schedule.clone(),
                    r.next_run.clone(),
                    r.status.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Type", "Amount", "CCY", "Schedule", "Next Run", "Status"],
                rows
            )
        );
    }
    Ok(())
}

fn update(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = current_owner(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let changes = RuleUpdate {
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        description: sub.get_one::<String>("description").cloned(),
        interval: sub.get_one::<i64>("interval").copied(),
        day_of_month: sub.get_one::<u32>("day-of-month").copied(),
        day_of_week: sub
            .get_one::<String>("day-of-week")
            .map(|s| recurrence::weekday_from_name(s))
            .transpose()?,
        end_date: sub
            .get_one::<String>("end")
            .map(|s| parse_date(s))
            .transpose()?,
    };
    let rule = recurring::update_rule(conn, owner, id, &changes)?;
    println!("Updated rule {}, next run {}", rule.id, rule.next_run_date);
    Ok(())
}

fn toggle(conn: &Connection, sub: &clap::ArgMatches, active: bool) -> Result<()> {
    let owner = current_owner(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    recurring::set_active(conn, owner, id, active)?;
    println!(
        "Rule {} {}",
        id,
        if active { "activated" } else { "deactivated" }
    );
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = current_owner(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    recurring::delete_rule(conn, owner, id)?;
    println!("Removed rule {}", id);
    Ok(())
}
