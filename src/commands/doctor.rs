// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use crate::utils::{current_owner, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection) -> Result<()> {
    let owner = current_owner(conn)?;
    let mut rows = Vec::new();

    // 1) Balance drift: current balance vs initial + sum of cleared effects.
    for account in store::accounts_by_owner(conn, owner, true)? {
        let mut stmt = conn.prepare(
            "SELECT type, amount, id, linked_transaction_id FROM transactions
             WHERE account_id=?1 AND status='CLEARED'",
        )?;
        let mut cur = stmt.query(params![account.id])?;
        let mut expected = account.initial_balance;
        while let Some(r) = cur.next()? {
            let typ: String = r.get(0)?;
            let amount_s: String = r.get(1)?;
            let id: i64 = r.get(2)?;
            let linked: Option<i64> = r.get(3)?;
            let amount = amount_s.parse::<Decimal>().unwrap_or(Decimal::ZERO);
            match typ.as_str() {
                "EXPENSE" => expected -= amount,
                "INCOME" => expected += amount,
                // out-leg is written before its in-leg, so it has the lower id
                "TRANSFER" => match linked {
                    Some(linked_id) if id < linked_id => expected -= amount,
                    Some(_) => expected += amount,
                    None => {}
                },
                _ => {}
            }
        }
        if expected != account.current_balance {
            rows.push(vec![
                "balance_drift".into(),
                format!(
                    "{}: stored {} vs recomputed {}",
                    account.name, account.current_balance, expected
                ),
            ]);
        }
    }

    // 2) Transfer legs without a living counterpart
    let mut stmt = conn.prepare(
        "SELECT id, linked_transaction_id FROM transactions
         WHERE owner_id=?1 AND type='TRANSFER'",
    )?;
    let mut cur = stmt.query(params![owner])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let linked: Option<i64> = r.get(1)?;
        match linked {
            None => rows.push(vec!["unlinked_transfer_leg".into(), format!("id {}", id)]),
            Some(linked_id) => {
                let hit: Option<i64> = conn
                    .query_row(
                        "SELECT 1 FROM transactions WHERE id=?1",
                        params![linked_id],
                        |r| r.get(0),
                    )
                    .optional()?;
                if hit.is_none() {
                    rows.push(vec![
                        "orphaned_transfer_leg".into(),
                        format!("id {} links to missing {}", id, linked_id),
                    ]);
                }
            }
        }
    }

    // 3) Transactions whose currency disagrees with their account
    let mut stmt = conn.prepare(
        "SELECT t.id, t.currency, a.currency FROM transactions t
         JOIN accounts a ON t.account_id=a.id
         WHERE t.owner_id=?1 AND t.currency != a.currency",
    )?;
    let mut cur = stmt.query(params![owner])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let tc: String = r.get(1)?;
        let ac: String = r.get(2)?;
        rows.push(vec![
            "currency_mismatch".into(),
            format!("tx {} is {} on a {} account", id, tc, ac),
        ]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
