// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{current_owner, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let owner = current_owner(conn)?;
            let name = sub.get_one::<String>("name").unwrap();
            let typ = sub.get_one::<String>("type").unwrap();
            conn.execute(
                "INSERT INTO categories(owner_id, name, type) VALUES (?1, ?2, ?3)",
                params![owner, name, typ],
            )?;
            println!("Added category '{}' ({})", name, typ);
        }
        Some(("list", _)) => {
            let owner = current_owner(conn)?;
            let mut stmt = conn
                .prepare("SELECT name, type FROM categories WHERE owner_id=?1 ORDER BY name")?;
            let rows = stmt.query_map(params![owner], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (n, t) = row?;
                data.push(vec![n, t]);
            }
            println!("{}", pretty_table(&["Category", "Type"], data));
        }
        Some(("rm", sub)) => {
            let owner = current_owner(conn)?;
            let name = sub.get_one::<String>("name").unwrap();
            conn.execute(
                "DELETE FROM categories WHERE owner_id=?1 AND name=?2",
                params![owner, name],
            )?;
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
