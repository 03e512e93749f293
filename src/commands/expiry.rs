// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{days_until, expiry_counts, sort_expiry};
use crate::config::AppConfig;
use crate::db::KeyValueStore;
use crate::models::{ExpiryItem, ExpiryPatch};
use crate::store::RecordStore;
use crate::utils::{maybe_print_json, parse_date, pretty_table, today};
use crate::validate::{validate_expiry, validate_name};
use anyhow::Result;
use serde::Serialize;

pub fn handle(
    store: &mut RecordStore,
    kv: &dyn KeyValueStore,
    cfg: &AppConfig,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, kv, sub)?,
        Some(("edit", sub)) => edit(store, kv, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            if store.expiry.remove(id) {
                store.save_expiry(kv)?;
            }
            println!("Removed expiry item {}", id);
        }
        Some(("list", sub)) => list(store, cfg, sub)?,
        Some(("summary", sub)) => {
            let counts = expiry_counts(store.expiry.list(), today());
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &counts)? {
                let data = vec![
                    vec!["Today".to_string(), counts.today.to_string()],
                    vec!["This week".to_string(), counts.week.to_string()],
                    vec!["This month".to_string(), counts.month.to_string()],
                    vec!["This year".to_string(), counts.year.to_string()],
                ];
                println!("{}", pretty_table(&["Expiring", "Items"], data));
            }
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &mut RecordStore, kv: &dyn KeyValueStore, sub: &clap::ArgMatches) -> Result<()> {
    let expiry = match sub.get_one::<String>("date") {
        Some(raw) => Some(parse_date(raw)?),
        None => Some(today()),
    };
    let (name, expiry) = validate_expiry(sub.get_one::<String>("name").unwrap(), expiry)?;
    let id = store.expiry.add(ExpiryItem::new(&name, expiry)).id.clone();
    store.save_expiry(kv)?;
    println!("Tracking '{}' expiring {} (id: {})", name, expiry, id);
    Ok(())
}

fn edit(store: &mut RecordStore, kv: &dyn KeyValueStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let name = sub
        .get_one::<String>("name")
        .map(|n| validate_name(n).map(str::to_string))
        .transpose()?;
    let expiry = sub
        .get_one::<String>("date")
        .map(|d| parse_date(d))
        .transpose()?;
    if store.expiry.update(id, ExpiryPatch { name, expiry }) {
        store.save_expiry(kv)?;
        println!("Updated expiry item {}", id);
    } else {
        println!("No expiry item with id {}", id);
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ExpiryRow {
    pub id: String,
    pub name: String,
    pub expiry: String,
    pub days_left: i64,
}

pub fn query_rows(store: &RecordStore) -> Vec<ExpiryRow> {
    let now = today();
    sort_expiry(store.expiry.list())
        .into_iter()
        .map(|e| ExpiryRow {
            id: e.id.clone(),
            name: e.name.clone(),
            expiry: e.expiry.to_string(),
            days_left: days_until(now, e.expiry),
        })
        .collect()
}

fn status(days_left: i64, warn_within: i64) -> String {
    match days_left {
        d if d < 0 => format!("expired {} day(s) ago", -d),
        0 => "expires today".to_string(),
        d if d <= warn_within => format!("{} day(s) left (soon)", d),
        d => format!("{} day(s) left", d),
    }
}

fn list(store: &RecordStore, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(store);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| {
                vec![
                    r.name,
                    r.expiry,
                    status(r.days_left, cfg.expiry_warning_days),
                    r.id,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Item", "Expiry", "Status", "ID"], rows)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wording() {
        assert_eq!(status(-2, 7), "expired 2 day(s) ago");
        assert_eq!(status(0, 7), "expires today");
        assert_eq!(status(3, 7), "3 day(s) left (soon)");
        assert_eq!(status(30, 7), "30 day(s) left");
    }
}
