// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{filter_transactions, TransactionFilter};
use crate::config::AppConfig;
use crate::db::KeyValueStore;
use crate::models::{Transaction, TransactionPatch, TxType};
use crate::store::RecordStore;
use crate::utils::{
    date_filter_from_matches, format_money, maybe_print_json, parse_date, parse_decimal,
    pretty_table, today,
};
use crate::validate::{clamp_to_today, validate_amount, validate_date};
use anyhow::Result;
use serde::Serialize;

pub fn handle(
    store: &mut RecordStore,
    kv: &dyn KeyValueStore,
    cfg: &AppConfig,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, kv, cfg, sub)?,
        Some(("edit", sub)) => edit(store, kv, sub)?,
        Some(("rm", sub)) => rm(store, kv, sub)?,
        Some(("list", sub)) => list(store, cfg, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(
    store: &mut RecordStore,
    kv: &dyn KeyValueStore,
    cfg: &AppConfig,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?.abs();
    validate_amount(amount)?;
    let tx_type: TxType = sub.get_one::<String>("type").unwrap().parse()?;
    let category = sub
        .get_one::<String>("category")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let date = match sub.get_one::<String>("date") {
        Some(s) => Some(parse_date(s)?),
        None => Some(today()),
    };
    let date = clamp_to_today(validate_date(date)?, today());
    let description = sub
        .get_one::<String>("description")
        .cloned()
        .unwrap_or_default();

    let tx = store
        .transactions
        .add(Transaction::new(amount, tx_type, category, date, description))
        .clone();
    store.save_transactions(kv)?;
    println!(
        "Recorded {} {} on {} in '{}' (id: {})",
        tx.tx_type,
        format_money(tx.amount, &cfg.currency_symbol),
        tx.date,
        tx.category,
        tx.id
    );
    Ok(())
}

fn edit(store: &mut RecordStore, kv: &dyn KeyValueStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let amount = match sub.get_one::<String>("amount") {
        Some(raw) => {
            let amount = parse_decimal(raw)?.abs();
            validate_amount(amount)?;
            Some(amount)
        }
        None => None,
    };
    let tx_type = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<TxType>())
        .transpose()?;
    let date = match sub.get_one::<String>("date") {
        Some(raw) => Some(clamp_to_today(parse_date(raw)?, today())),
        None => None,
    };
    let patch = TransactionPatch {
        amount,
        tx_type,
        category: sub.get_one::<String>("category").map(|s| s.trim().to_string()),
        date,
        description: sub.get_one::<String>("description").cloned(),
    };
    if patch.is_empty() {
        println!("Nothing to change for {}", id);
        return Ok(());
    }
    if store.transactions.update(id, patch) {
        store.save_transactions(kv)?;
        println!("Updated transaction {}", id);
    } else {
        println!("No transaction with id {}", id);
    }
    Ok(())
}

fn rm(store: &mut RecordStore, kv: &dyn KeyValueStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    if store.transactions.remove(id) {
        store.save_transactions(kv)?;
    }
    println!("Removed transaction {}", id);
    Ok(())
}

fn list(store: &RecordStore, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.tx_type.clone(),
                    r.category.clone(),
                    format_money(r.amount.parse().unwrap_or_default(), &cfg.currency_symbol),
                    r.description.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Type", "Category", "Amount", "Description", "ID"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub category: String,
    pub amount: String,
    pub description: String,
}

pub fn query_rows(store: &RecordStore, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let filter = TransactionFilter {
        tx_type: sub
            .get_one::<String>("type")
            .map(|s| s.parse::<TxType>())
            .transpose()?,
        category: sub.get_one::<String>("category").map(|s| s.trim().to_string()),
        range: date_filter_from_matches(sub)?.resolve(today()),
    };
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);

    Ok(filter_transactions(store.transactions.list(), &filter)
        .into_iter()
        .take(limit)
        .map(|t| TransactionRow {
            id: t.id.clone(),
            date: t.date.to_string(),
            tx_type: t.tx_type.to_string(),
            category: t.category.clone(),
            amount: t.amount.to_string(),
            description: t.description.clone(),
        })
        .collect())
}
