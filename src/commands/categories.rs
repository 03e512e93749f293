// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::models::known_categories;
use crate::store::RecordStore;
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle(store: &RecordStore, cfg: &AppConfig, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", _)) = m.subcommand() {
        let data = known_categories(store.transactions.list(), &cfg.categories)
            .into_iter()
            .map(|c| vec![c])
            .collect();
        println!("{}", pretty_table(&["Category"], data));
    }
    Ok(())
}
