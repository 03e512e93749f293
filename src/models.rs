// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::anyhow;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_CATEGORY: &str = "Other";

pub const DEFAULT_CATEGORIES: [&str; 11] = [
    "Groceries",
    "Dining",
    "Rent",
    "Utilities",
    "Transportation",
    "Shopping",
    "Healthcare",
    "Entertainment",
    "Salary",
    "Business",
    DEFAULT_CATEGORY,
];

/// Direction of a transaction. Amounts are always non-negative; the sign of a
/// record's effect is carried here only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Expense,
    Income,
    Investment,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Expense => "expense",
            TxType::Income => "income",
            TxType::Investment => "investment",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(TxType::Expense),
            "income" => Ok(TxType::Income),
            "investment" => Ok(TxType::Investment),
            other => Err(anyhow!(
                "Invalid type '{}', expected expense|income|investment",
                other
            )),
        }
    }
}

/// Common surface of the three record kinds held by the store.
pub trait Record: Clone {
    type Patch;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn created_at(&self) -> i64;
    fn set_created_at(&mut self, created_at: i64);
    /// Shallow merge; `id` and `createdAt` are never touched.
    fn apply(&mut self, patch: Self::Patch);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: i64,
}

impl Transaction {
    /// Builds an unsaved transaction. `id` and `created_at` are assigned when
    /// the record is added to a collection.
    pub fn new(
        amount: Decimal,
        tx_type: TxType,
        category: impl Into<String>,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        let category = category.into();
        Self {
            id: String::new(),
            amount: amount.abs(),
            tx_type,
            category: if category.trim().is_empty() {
                DEFAULT_CATEGORY.to_string()
            } else {
                category
            },
            date,
            description: description.into(),
            created_at: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub amount: Option<Decimal>,
    pub tx_type: Option<TxType>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        *self == TransactionPatch::default()
    }
}

impl Record for Transaction {
    type Patch = TransactionPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }

    fn set_created_at(&mut self, created_at: i64) {
        self.created_at = created_at;
    }

    fn apply(&mut self, patch: TransactionPatch) {
        if let Some(amount) = patch.amount {
            self.amount = amount.abs();
        }
        if let Some(tx_type) = patch.tx_type {
            self.tx_type = tx_type;
        }
        if let Some(category) = patch.category.filter(|c| !c.trim().is_empty()) {
            self.category = category;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }
}

/// A shopping list entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: i64,
}

impl PurchaseItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            created_at: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchasePatch {
    pub name: Option<String>,
}

impl Record for PurchaseItem {
    type Patch = PurchasePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }

    fn set_created_at(&mut self, created_at: i64) {
        self.created_at = created_at;
    }

    fn apply(&mut self, patch: PurchasePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
    }
}

/// A product whose expiration date is being watched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryItem {
    pub id: String,
    pub name: String,
    pub expiry: NaiveDate,
    #[serde(default)]
    pub created_at: i64,
}

impl ExpiryItem {
    pub fn new(name: impl Into<String>, expiry: NaiveDate) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            expiry,
            created_at: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpiryPatch {
    pub name: Option<String>,
    pub expiry: Option<NaiveDate>,
}

impl Record for ExpiryItem {
    type Patch = ExpiryPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }

    fn set_created_at(&mut self, created_at: i64) {
        self.created_at = created_at;
    }

    fn apply(&mut self, patch: ExpiryPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(expiry) = patch.expiry {
            self.expiry = expiry;
        }
    }
}

/// Built-in categories, then `extra`, then whatever the data uses, in
/// first-seen order without duplicates.
pub fn known_categories(transactions: &[Transaction], extra: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let candidates = DEFAULT_CATEGORIES
        .iter()
        .map(|c| c.to_string())
        .chain(extra.iter().cloned())
        .chain(transactions.iter().map(|t| t.category.clone()));
    for c in candidates {
        if c.trim().is_empty() || out.contains(&c) {
            continue;
        }
        out.push(c);
    }
    out
}
