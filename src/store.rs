// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KeyValueStore;
use crate::models::{ExpiryItem, PurchaseItem, Record, Transaction};
use crate::utils::{now_millis, uid};
use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

pub const TRANSACTIONS_KEY: &str = "transactions-v1";
pub const PURCHASES_KEY: &str = "purchases-v1";
pub const EXPIRY_KEY: &str = "expiry-v1";

/// An ordered list of records of one kind, addressed by `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Record> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Stamps a fresh `id` and `createdAt` on the record and appends it.
    pub fn add(&mut self, mut record: T) -> &T {
        let mut id = uid();
        while self.contains(&id) {
            id = uid();
        }
        record.set_id(id);
        record.set_created_at(now_millis());
        debug!(id = record.id(), "record added");
        self.items.push(record);
        &self.items[self.items.len() - 1]
    }

    /// Shallow-merges `patch` into the record with `id`. Returns `false` when
    /// no such record exists; that is not an error.
    pub fn update(&mut self, id: &str, patch: T::Patch) -> bool {
        match self.items.iter_mut().find(|r| r.id() == id) {
            Some(record) => {
                record.apply(patch);
                debug!(id, "record updated");
                true
            }
            None => {
                debug!(id, "update skipped, id not found");
                false
            }
        }
    }

    /// Drops every record with `id`. Idempotent; returns whether anything
    /// was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|r| r.id() != id);
        let removed = self.items.len() != before;
        debug!(id, removed, "record remove");
        removed
    }

    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|r| r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Swaps the whole collection for `items`.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Appends `incoming`, keeping ids unique: a record whose id is blank or
    /// already present gets a freshly generated one. Returns how many ids
    /// were reassigned.
    pub fn merge(&mut self, incoming: Vec<T>) -> usize {
        let mut seen: HashSet<String> = self.items.iter().map(|r| r.id().to_string()).collect();
        let mut reassigned = 0;
        for mut record in incoming {
            if record.id().trim().is_empty() || seen.contains(record.id()) {
                let mut id = uid();
                while seen.contains(&id) {
                    id = uid();
                }
                record.set_id(id);
                reassigned += 1;
            }
            seen.insert(record.id().to_string());
            self.items.push(record);
        }
        reassigned
    }
}

/// The three independently persisted collections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    pub transactions: Collection<Transaction>,
    pub purchases: Collection<PurchaseItem>,
    pub expiry: Collection<ExpiryItem>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every collection. Missing or unreadable data yields an empty
    /// collection rather than an error.
    pub fn load(kv: &dyn KeyValueStore) -> Self {
        Self {
            transactions: Collection::from_vec(load_collection(kv, TRANSACTIONS_KEY)),
            purchases: Collection::from_vec(load_collection(kv, PURCHASES_KEY)),
            expiry: Collection::from_vec(load_collection(kv, EXPIRY_KEY)),
        }
    }

    pub fn save_transactions(&self, kv: &dyn KeyValueStore) -> Result<()> {
        save_collection(kv, TRANSACTIONS_KEY, self.transactions.list())
    }

    pub fn save_purchases(&self, kv: &dyn KeyValueStore) -> Result<()> {
        save_collection(kv, PURCHASES_KEY, self.purchases.list())
    }

    pub fn save_expiry(&self, kv: &dyn KeyValueStore) -> Result<()> {
        save_collection(kv, EXPIRY_KEY, self.expiry.list())
    }

    pub fn save(&self, kv: &dyn KeyValueStore) -> Result<()> {
        self.save_transactions(kv)?;
        self.save_purchases(kv)?;
        self.save_expiry(kv)
    }
}

fn load_collection<T: DeserializeOwned>(kv: &dyn KeyValueStore, key: &str) -> Vec<T> {
    let raw = match kv.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "failed to read collection, starting empty");
            return Vec::new();
        }
    };
    match serde_json::from_str::<Option<Vec<T>>>(&raw) {
        Ok(items) => {
            let items = items.unwrap_or_default();
            debug!(key, count = items.len(), "collection loaded");
            items
        }
        Err(e) => {
            warn!(key, error = %e, "stored collection is not valid, starting empty");
            Vec::new()
        }
    }
}

fn save_collection<T: Serialize>(kv: &dyn KeyValueStore, key: &str, items: &[T]) -> Result<()> {
    let json = serde_json::to_string(items)?;
    kv.set(key, &json)
        .with_context(|| format!("Failed to save collection '{}'", key))
}
