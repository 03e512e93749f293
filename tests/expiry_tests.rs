// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, Local, NaiveDate};
use tallybook::aggregate::expiry_counts;
use tallybook::config::AppConfig;
use tallybook::db::MemoryStore;
use tallybook::models::ExpiryItem;
use tallybook::store::RecordStore;
use tallybook::{cli, commands::expiry};

fn run(store: &mut RecordStore, kv: &MemoryStore, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["tallybook", "expiry"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("expiry", sub)) = matches.subcommand() {
        expiry::handle(store, kv, &AppConfig::default(), sub)
    } else {
        panic!("no expiry subcommand");
    }
}

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn add_edit_remove_and_persist() {
    let kv = MemoryStore::new();
    let mut store = RecordStore::new();
    run(&mut store, &kv, &["add", "--name", "Yogurt", "--date", "2025-05-10"]).unwrap();
    let item = store.expiry.list()[0].clone();
    assert_eq!(item.expiry, d("2025-05-10"));

    run(&mut store, &kv, &["edit", "--id", &item.id, "--date", "2025-05-12"]).unwrap();
    let edited = store.expiry.get(&item.id).unwrap();
    assert_eq!(edited.name, "Yogurt");
    assert_eq!(edited.expiry, d("2025-05-12"));
    assert_eq!(RecordStore::load(&kv).expiry, store.expiry);

    run(&mut store, &kv, &["rm", "--id", &item.id]).unwrap();
    run(&mut store, &kv, &["rm", "--id", &item.id]).unwrap();
    assert!(store.expiry.is_empty());
    assert!(RecordStore::load(&kv).expiry.is_empty());
}

#[test]
fn date_defaults_to_today_and_name_is_required() {
    let kv = MemoryStore::new();
    let mut store = RecordStore::new();
    run(&mut store, &kv, &["add", "--name", "Cheese"]).unwrap();
    assert_eq!(store.expiry.list()[0].expiry, Local::now().date_naive());

    let err = run(&mut store, &kv, &["add", "--name", " ", "--date", "2025-01-01"]).unwrap_err();
    assert_eq!(err.to_string(), "Name is required");
    assert!(run(&mut store, &kv, &["add", "--name", "Jam", "--date", "soon"]).is_err());
    assert_eq!(store.expiry.len(), 1);
}

#[test]
fn rows_are_soonest_first_with_signed_days_left() {
    let kv = MemoryStore::new();
    let mut store = RecordStore::new();
    let today = Local::now().date_naive();
    for (name, offset) in [("Later", 10), ("Past", -3), ("Now", 0)] {
        let date = (today + Duration::days(offset)).to_string();
        run(&mut store, &kv, &["add", "--name", name, "--date", &date]).unwrap();
    }

    let rows = expiry::query_rows(&store);
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Past", "Now", "Later"]);
    let days: Vec<i64> = rows.iter().map(|r| r.days_left).collect();
    assert_eq!(days, vec![-3, 0, 10]);
}

#[test]
fn counts_use_monday_weeks_and_calendar_months() {
    // 2025-06-11 is a Wednesday.
    let today = d("2025-06-11");
    let items: Vec<ExpiryItem> = [
        "2025-06-11", // today, week, month, year
        "2025-06-09", // Monday of this week
        "2025-06-15", // Sunday of this week
        "2025-06-16", // next Monday
        "2025-06-30",
        "2025-12-31",
        "2026-01-01",
    ]
    .iter()
    .map(|s| ExpiryItem::new("x", d(s)))
    .collect();

    let counts = expiry_counts(&items, today);
    assert_eq!(counts.today, 1);
    assert_eq!(counts.week, 3);
    assert_eq!(counts.month, 5);
    assert_eq!(counts.year, 6);
}
