// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KeyValueStore;
use crate::models::{PurchaseItem, PurchasePatch};
use crate::store::RecordStore;
use crate::utils::{maybe_print_json, pretty_table};
use crate::validate::validate_name;
use anyhow::Result;

pub fn handle(store: &mut RecordStore, kv: &dyn KeyValueStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = validate_name(sub.get_one::<String>("name").unwrap())?;
            let id = store.purchases.add(PurchaseItem::new(name)).id.clone();
            store.save_purchases(kv)?;
            println!("Added '{}' to the shopping list (id: {})", name, id);
        }
        Some(("edit", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let name = validate_name(sub.get_one::<String>("name").unwrap())?;
            let patch = PurchasePatch {
                name: Some(name.to_string()),
            };
            if store.purchases.update(id, patch) {
                store.save_purchases(kv)?;
                println!("Updated purchase {}", id);
            } else {
                println!("No purchase with id {}", id);
            }
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            if store.purchases.remove(id) {
                store.save_purchases(kv)?;
            }
            println!("Removed purchase {}", id);
        }
        Some(("list", sub)) => {
            let items = store.purchases.list();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
                let data = items
                    .iter()
                    .map(|p| vec![p.name.clone(), p.id.clone()])
                    .collect();
                println!("{}", pretty_table(&["Item", "ID"], data));
            }
        }
        _ => {}
    }
    Ok(())
}
