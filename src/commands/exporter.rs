// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Transaction;
use crate::store::RecordStore;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use csv::{QuoteStyle, WriterBuilder};
use serde::Serialize;
use std::io::Write;
use tracing::info;

pub const EXPORT_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument<'a> {
    pub version: u32,
    pub exported_at: String,
    pub items: &'a [Transaction],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

pub fn handle(store: &RecordStore, m: &clap::ArgMatches) -> Result<()> {
    let fmt = m.get_one::<String>("format").unwrap().trim().to_lowercase();
    if fmt != "json" && fmt != "csv" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }
    let out = match m.get_one::<String>("out") {
        Some(p) => p.trim().to_string(),
        None => default_file_name(Utc::now(), &fmt),
    };
    let items = store.transactions.list();

    let mut buf = Vec::new();
    match fmt.as_str() {
        "csv" => write_csv(items, &mut buf)?,
        _ => buf = export_json(items, Utc::now(), None)?.into_bytes(),
    }
    std::fs::write(&out, &buf).with_context(|| format!("Write {}", out))?;
    info!(count = items.len(), path = %out, "export written");
    println!("Exported {} transactions to {}", items.len(), out);
    Ok(())
}

pub fn default_file_name(now: DateTime<Utc>, ext: &str) -> String {
    format!("expenses-{}.{}", now.format("%Y-%m-%d"), ext)
}

/// Pretty-printed `{version, exportedAt, items, metadata?}` document.
pub fn export_json(
    items: &[Transaction],
    now: DateTime<Utc>,
    metadata: Option<serde_json::Value>,
) -> Result<String> {
    let doc = ExportDocument {
        version: EXPORT_VERSION,
        exported_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        items,
        metadata,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// `Date,Description,Category,Amount,Type` with every field quoted.
pub fn write_csv<W: Write>(items: &[Transaction], writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);
    wtr.write_record(["Date", "Description", "Category", "Amount", "Type"])?;
    for t in items {
        wtr.write_record([
            t.date.to_string(),
            t.description.clone(),
            t.category.clone(),
            t.amount.to_string(),
            t.tx_type.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
