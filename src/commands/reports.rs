// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{
    aggregate_by_category, compute_totals, share_percent, CategoryBreakdown, Totals,
};
use crate::config::AppConfig;
use crate::range::DateRange;
use crate::store::RecordStore;
use crate::utils::{date_filter_from_matches, format_money, maybe_print_json, pretty_table, today};
use anyhow::Result;

pub fn handle(store: &RecordStore, cfg: &AppConfig, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("totals", sub)) => totals(store, cfg, sub)?,
        Some(("categories", sub)) => categories(store, cfg, sub)?,
        _ => {}
    }
    Ok(())
}

fn scope(sub: &clap::ArgMatches) -> Result<Option<DateRange>> {
    Ok(date_filter_from_matches(sub)?.resolve(today()))
}

fn scope_label(range: Option<&DateRange>) -> String {
    match range {
        Some(r) => format!("{} .. {}", r.start, r.end),
        None => "all time".to_string(),
    }
}

pub fn totals_for(store: &RecordStore, sub: &clap::ArgMatches) -> Result<Totals> {
    let range = scope(sub)?;
    Ok(compute_totals(store.transactions.list(), range.as_ref()))
}

pub fn categories_for(store: &RecordStore, sub: &clap::ArgMatches) -> Result<CategoryBreakdown> {
    let range = scope(sub)?;
    Ok(aggregate_by_category(store.transactions.list(), range.as_ref()))
}

fn totals(store: &RecordStore, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let range = scope(sub)?;
    let t = compute_totals(store.transactions.list(), range.as_ref());
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &t)? {
        let sym = &cfg.currency_symbol;
        let data = vec![
            vec!["Income".to_string(), format_money(t.income, sym)],
            vec!["Expense".to_string(), format_money(-t.expense, sym)],
            vec!["Investment".to_string(), format_money(t.investment, sym)],
            vec!["Savings".to_string(), format_money(t.savings, sym)],
        ];
        println!("Period: {}", scope_label(range.as_ref()));
        println!("{}", pretty_table(&["", "Total"], data));
    }
    Ok(())
}

fn categories(store: &RecordStore, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let range = scope(sub)?;
    let breakdown = aggregate_by_category(store.transactions.list(), range.as_ref());
    let entries: Vec<(String, rust_decimal::Decimal)> = if sub.get_flag("sort") {
        breakdown.sorted_desc()
    } else {
        breakdown.iter().map(|(c, v)| (c.to_string(), v)).collect()
    };
    if sub.get_flag("json") || sub.get_flag("jsonl") {
        let rows: Vec<serde_json::Value> = entries
            .iter()
            .map(|(c, v)| serde_json::json!({ "category": c, "spent": v }))
            .collect();
        maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)?;
        return Ok(());
    }
    let total = breakdown.total();
    let mut data = Vec::new();
    for (cat, amt) in entries {
        data.push(vec![
            cat,
            format_money(amt, &cfg.currency_symbol),
            format!("{:.1}%", share_percent(amt, total)),
        ]);
    }
    println!("Period: {}", scope_label(range.as_ref()));
    println!("{}", pretty_table(&["Category", "Spent", "Share"], data));
    Ok(())
}
