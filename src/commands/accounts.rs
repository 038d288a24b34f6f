// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{current_owner, maybe_print_json, parse_decimal, pretty_table};
use crate::{ledger, store};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let owner = current_owner(conn)?;
            let name = sub.get_one::<String>("name").unwrap();
            let typ = sub.get_one::<String>("type").unwrap();
            let ccy = sub.get_one::<String>("currency").unwrap();
            let initial = parse_decimal(sub.get_one::<String>("initial-balance").unwrap())?;
            let account = ledger::create_account(conn, owner, name, typ, ccy, initial)?;
            println!(
                "Added account '{}' ({}, {}) starting at {}",
                account.name, account.r#type, account.currency, account.initial_balance
            );
        }
        Some(("list", sub)) => {
            let owner = current_owner(conn)?;
            let include_archived = sub.get_flag("all");
            let accounts = store::accounts_by_owner(conn, owner, include_archived)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
                let rows: Vec<Vec<String>> = accounts
                    .iter()
                    .map(|a| {
                        vec![
                            a.name.clone(),
                            a.r#type.clone(),
                            a.currency.clone(),
                            format!("{:.2}", a.current_balance),
                            if a.archived { "yes".into() } else { "".into() },
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Name", "Type", "CCY", "Balance", "Archived"], rows)
                );
            }
        }
        Some(("update", sub)) => {
            let owner = current_owner(conn)?;
            let name = sub.get_one::<String>("name").unwrap();
            let account = store::account_by_name(conn, owner, name)?;
            let updated = ledger::update_details(
                conn,
                owner,
                account.id,
                sub.get_one::<String>("rename").map(|s| s.as_str()),
                sub.get_one::<String>("type").map(|s| s.as_str()),
            )?;
            println!("Updated account '{}' ({})", updated.name, updated.r#type);
        }
        Some(("archive", sub)) => {
            let owner = current_owner(conn)?;
            let name = sub.get_one::<String>("name").unwrap();
            let force = sub.get_flag("force");
            let account = store::account_by_name(conn, owner, name)?;
            ledger::archive(conn, owner, account.id, force)?;
            println!("Archived account '{}'", name);
        }
        Some(("set-currency", sub)) => {
            let owner = current_owner(conn)?;
            let name = sub.get_one::<String>("name").unwrap();
            let ccy = sub.get_one::<String>("currency").unwrap();
            let account = store::account_by_name(conn, owner, name)?;
            let updated = ledger::change_currency(conn, owner, account.id, ccy)?;
            println!("Account '{}' now {}", updated.name, updated.currency);
        }
        _ => {}
    }
    Ok(())
}
