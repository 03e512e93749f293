// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use tallybook::config::{write_default_config, AppConfig};
use tallybook::store::RecordStore;
use tallybook::{cli, commands, db, log};

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    log::init_logging(matches.get_flag("verbose"));

    let result = run(&matches);
    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn run(matches: &clap::ArgMatches) -> Result<()> {
    if let Some(("setup", _)) = matches.subcommand() {
        let path = match matches.get_one::<String>("config") {
            Some(p) => std::path::PathBuf::from(p),
            None => AppConfig::default_config_path()?,
        };
        write_default_config(&path)?;
        println!("Created default configuration at {}", path.display());
        return Ok(());
    }

    let cfg = match matches.get_one::<String>("config") {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    let kv = db::open_or_init(&cfg)?;
    let mut store = RecordStore::load(&kv);

    match matches.subcommand() {
        Some(("tx", sub)) => commands::transactions::handle(&mut store, &kv, &cfg, sub)?,
        Some(("report", sub)) => commands::reports::handle(&store, &cfg, sub)?,
        Some(("category", sub)) => commands::categories::handle(&store, &cfg, sub)?,
        Some(("purchase", sub)) => commands::purchases::handle(&mut store, &kv, sub)?,
        Some(("expiry", sub)) => commands::expiry::handle(&mut store, &kv, &cfg, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut store, &kv, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
