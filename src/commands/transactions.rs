// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use crate::models::{TransactionStatus, TransactionType};
use crate::transactions::{self, TransactionFilter, TransactionRequest, TransferRequest};
use crate::utils::{current_owner, maybe_print_json, parse_date, parse_decimal, pretty_table};
use crate::store;
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("status", sub)) => status(conn, sub)?,
        Some(("transfer", sub)) => transfer(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = current_owner(conn)?;
    let account = store::account_by_name(conn, owner, sub.get_one::<String>("account").unwrap())?;
    let category =
        store::category_by_name(conn, owner, sub.get_one::<String>("category").unwrap())?;
    let kind = TransactionType::parse(sub.get_one::<String>("type").unwrap())?;
    let status = if sub.get_flag("pending") {
        TransactionStatus::Pending
    } else {
        TransactionStatus::Cleared
    };
    let req = TransactionRequest {
        owner_id: owner,
        account_id: account.id,
        category_id: category.id,
        r#type: kind,
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        currency: None,
        date: parse_date(sub.get_one::<String>("date").unwrap())?,
        time: sub.get_one::<String>("time").cloned(),
        status,
        description: sub.get_one::<String>("description").cloned(),
        reference: sub.get_one::<String>("reference").cloned(),
    };
    let allow_negative = sub.get_flag("allow-negative");
    let (tx, balance_after) = transactions::create_transaction(conn, &req, allow_negative)?;
    println!(
        "Recorded {} {} of {} {} on {} (balance now {})",
        tx.status, tx.r#type, tx.amount, tx.currency, tx.date, balance_after
    );
    Ok(())
}

fn status(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = current_owner(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let new_status = sub.get_one::<String>("status").unwrap();
    let tx = transactions::update_status(conn, owner, id, new_status)?;
    println!("Transaction {} is {}", tx.id, tx.status);
    Ok(())
}

fn transfer(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = current_owner(conn)?;
    let source = store::account_by_name(conn, owner, sub.get_one::<String>("from").unwrap())?;
    let destination = store::account_by_name(conn, owner, sub.get_one::<String>("to").unwrap())?;
    let req = TransferRequest {
        owner_id: owner,
        source_account_id: source.id,
        destination_account_id: destination.id,
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        date: parse_date(sub.get_one::<String>("date").unwrap())?,
        description: sub.get_one::<String>("description").cloned(),
        reference: sub.get_one::<String>("reference").cloned(),
    };
    let allow_negative = sub.get_flag("allow-negative");
    let outcome = transactions::transfer_funds(conn, &req, allow_negative)?;
    println!(
        "Transferred {} {} from '{}' to '{}' (balances now {} / {})",
        outcome.amount,
        outcome.currency,
        outcome.source_account_name,
        outcome.destination_account_name,
        outcome.source_balance_after,
        outcome.destination_balance_after
    );
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub account: String,
    pub category: String,
    pub r#type: String,
    pub amount: String,
    pub currency: String,
    pub status: String,
    pub description: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let owner = current_owner(conn)?;
    let account_id = match sub.get_one::<String>("account") {
        Some(name) => Some(store::account_by_name(conn, owner, name)?.id),
        None => None,
    };
    let filter = TransactionFilter {
        account_id,
        from: sub
            .get_one::<String>("from")
            .map(|s| parse_date(s))
            .transpose()?,
        to: sub
            .get_one::<String>("to")
            .map(|s| parse_date(s))
            .transpose()?,
        status: sub.get_one::<String>("status").cloned(),
        min_amount: sub
            .get_one::<String>("min-amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        max_amount: sub
            .get_one::<String>("max-amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        limit: sub.get_one::<usize>("limit").copied(),
    };
    let records = transactions::list_transactions(conn, owner, &filter)?;

    let account_names: HashMap<i64, String> = store::accounts_by_owner(conn, owner, true)?
        .into_iter()
        .map(|a| (a.id, a.name))
        .collect();
    let mut stmt = conn.prepare("SELECT id, name FROM categories WHERE owner_id=?1")?;
    let category_names: HashMap<i64, String> = stmt
        .query_map([owner], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?)))?
        .collect::<rusqlite::Result<_>>()?;

    Ok(records
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id,
            date: t.date.to_string(),
            account: account_names.get(&t.account_id).cloned().unwrap_or_default(),
            category: category_names
                .get(&t.category_id)
                .cloned()
                .unwrap_or_default(),
            r#type: t.r#type,
            amount: t.amount.to_string(),
            currency: t.currency,
            status: t.status,
            description: t.description.unwrap_or_default(),
        })
        .collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.account.clone(),
                    r.category.clone(),
                    r.r#type.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                    r.status.clone(),
                    r.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Account", "Category", "Type", "Amount", "CCY", "Status", "Description"],
                rows,
            )
        );
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = current_owner(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let tx = transactions::get(conn, owner, id)?;
    println!("{}", serde_json::to_string_pretty(&tx)?);
    Ok(())
}
