// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KeyValueStore;
use crate::normalize::{apply_import, parse_import, ImportMode};
use crate::store::RecordStore;
use anyhow::{Context, Result};

pub fn handle(store: &mut RecordStore, kv: &dyn KeyValueStore, m: &clap::ArgMatches) -> Result<()> {
    let path = m.get_one::<String>("path").unwrap().trim();
    let mode: ImportMode = m.get_one::<String>("mode").unwrap().parse()?;

    let text = std::fs::read_to_string(path).with_context(|| format!("Open {}", path))?;
    let items = parse_import(&text).with_context(|| format!("Import from {} failed", path))?;

    let summary = apply_import(&mut store.transactions, items, mode);
    store.save_transactions(kv)?;
    println!(
        "Imported {} transactions from {} ({})",
        summary.imported,
        path,
        match mode {
            ImportMode::Replace => "replaced existing data".to_string(),
            ImportMode::Merge => format!("merged, {} ids reassigned", summary.reassigned_ids),
        }
    );
    Ok(())
}
