// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::current_owner;
use anyhow::Result;
use rusqlite::{Connection, params};
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        Some(("budgets", sub)) => export_budgets(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap();
    let out = sub.get_one::<String>("out").unwrap();
    let owner = current_owner(conn)?;

    let mut stmt = conn.prepare(
        "SELECT t.date, a.name as account, c.name as category, t.type, t.amount, t.currency,
                t.status, t.description, t.reference
         FROM transactions t
         LEFT JOIN accounts a ON t.account_id=a.id
         LEFT JOIN categories c ON t.category_id=c.id
         WHERE t.owner_id=?1
         ORDER BY t.date, t.id",
    )?;
    let rows = stmt.query_map(params![owner], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, Option<String>>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, Option<String>>(7)?,
            r.get::<_, Option<String>>(8)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "account",
                "category",
                "type",
                "amount",
                "currency",
                "status",
                "description",
                "reference",
            ])?;
            for row in rows {
                let (d, a, c, t, amt, ccy, st, desc, re) = row?;
                wtr.write_record([
                    d,
                    a.unwrap_or_default(),
                    c.unwrap_or_default(),
                    t,
                    amt,
                    ccy,
                    st,
                    desc.unwrap_or_default(),
                    re.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            let mut items = Vec::new();
            for row in rows {
                let (d, a, c, t, amt, ccy, st, desc, re) = row?;
                items.push(json!({
                    "date": d, "account": a, "category": c, "type": t, "amount": amt,
                    "currency": ccy, "status": st, "description": desc, "reference": re
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
    }
    println!("Exported transactions to {}", out);
    Ok(())
}

fn export_budgets(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap();
    let out = sub.get_one::<String>("out").unwrap();
    let owner = current_owner(conn)?;

    let mut stmt = conn.prepare(
        "SELECT b.name, b.period_type, b.start_date, b.end_date, b.total_limit,
                c.name as category, i.limit_amount, i.warning_percent
         FROM budgets b
         LEFT JOIN budget_items i ON i.budget_id=b.id
         LEFT JOIN categories c ON i.category_id=c.id
         WHERE b.owner_id=?1
         ORDER BY b.start_date, b.id, i.id",
    )?;
    let rows = stmt.query_map(params![owner], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, Option<String>>(6)?,
            r.get::<_, Option<i64>>(7)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "budget",
                "period",
                "start",
                "end",
                "total_limit",
                "category",
                "item_limit",
                "warning_percent",
            ])?;
            for row in rows {
                let (name, period, start, end, total, cat, lim, warn) = row?;
                wtr.write_record([
                    name,
                    period,
                    start,
                    end,
                    total.unwrap_or_default(),
                    cat.unwrap_or_default(),
                    lim.unwrap_or_default(),
                    warn.map(|w| w.to_string()).unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            let mut items = Vec::new();
            for row in rows {
                let (name, period, start, end, total, cat, lim, warn) = row?;
                items.push(json!({
                    "budget": name, "period": period, "start": start, "end": end,
                    "total_limit": total, "category": cat, "item_limit": lim,
                    "warning_percent": warn
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
    }
    println!("Exported budgets to {}", out);
    Ok(())
}
