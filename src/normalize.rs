// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Coercion of loosely-typed, externally supplied JSON into [`Transaction`]s.

use crate::error::ImportError;
use crate::models::{Transaction, TxType, DEFAULT_CATEGORY};
use crate::store::Collection;
use crate::utils::uid;
use anyhow::anyhow;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tracing::{debug, info};

/// Largest amount an imported record keeps (10^28). Anything bigger is stored
/// as this value so it still survives the float encoding used on disk.
pub const AMOUNT_CEILING: Decimal =
    Decimal::from_parts(0x1000_0000, 0x3E25_0261, 0x204F_CE5E, false, 0);

/// Magnitudes below this round to zero at the 28-digit scale.
const SMALLEST_SCALED: f64 = 1e-28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Discard the current collection and keep only the imported records.
    Replace,
    /// Append imported records, reassigning ids that collide.
    Merge,
}

impl FromStr for ImportMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "replace" => Ok(ImportMode::Replace),
            "merge" | "append" => Ok(ImportMode::Merge),
            other => Err(anyhow!("Invalid import mode '{}', expected replace|merge", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub reassigned_ids: usize,
}

/// Normalizes one raw record against the current clock.
pub fn normalize(raw: &Value) -> Option<Transaction> {
    normalize_at(raw, Local::now().date_naive(), Utc::now().timestamp_millis())
}

/// Normalizes one raw record. `today` and `now_ms` fill in missing dates and
/// creation times. Returns `None` only when the record is not an object or
/// its amount cannot be read as a finite number.
pub fn normalize_at(raw: &Value, today: NaiveDate, now_ms: i64) -> Option<Transaction> {
    let obj = raw.as_object()?;

    let amount = coerce_amount(obj.get("amount"))?.abs().min(AMOUNT_CEILING);

    let id = match obj.get("id").and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => uid(),
    };

    let tx_type = match obj.get("type").and_then(Value::as_str) {
        Some("income") => TxType::Income,
        Some("investment") => TxType::Investment,
        _ => TxType::Expense,
    };

    let category = match obj.get("category").and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => DEFAULT_CATEGORY.to_string(),
    };

    let date = obj.get("date").and_then(coerce_date).unwrap_or(today);

    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let created_at = obj
        .get("createdAt")
        .and_then(coerce_timestamp)
        .unwrap_or(now_ms);

    Some(Transaction {
        id,
        amount,
        tx_type,
        category,
        date,
        description,
        created_at,
    })
}

fn parse_numeric(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s)) {
        return Some(d);
    }
    // Finite values outside the exact decimal range: clamp the huge ones and
    // round the tiny ones to 28 places.
    let f = s.parse::<f64>().ok().filter(|f| f.is_finite())?;
    if f.abs() >= 1e28 {
        return Some(AMOUNT_CEILING);
    }
    if f.abs() < SMALLEST_SCALED {
        return Some(Decimal::ZERO);
    }
    Decimal::from_f64(f).map(|d| d.round_dp(28))
}

fn coerce_amount(v: Option<&Value>) -> Option<Decimal> {
    match v? {
        // The JSON text of a number is its shortest exact form, so parse that
        // rather than going through f64.
        Value::Number(n) => parse_numeric(&n.to_string()),
        Value::String(s) => parse_numeric(s),
        _ => None,
    }
}

fn coerce_date(v: &Value) -> Option<NaiveDate> {
    match v {
        Value::String(s) => parse_loose_date(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.with_timezone(&Local).date_naive()),
        _ => None,
    }
}

/// Accepts `YYYY-MM-DD`, RFC 3339 and naive `YYYY-MM-DD[T ]HH:MM:SS`. The
/// calendar day is taken as written, never shifted across time zones.
pub fn parse_loose_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

fn coerce_timestamp(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(f) = s.parse::<f64>() {
                if f.is_finite() {
                    return Some(f as i64);
                }
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.timestamp_millis());
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| Utc.from_utc_datetime(&dt).timestamp_millis())
        }
        _ => None,
    }
}

/// Pulls the record list out of a bare array or an `{items: [...]}` envelope.
pub fn extract_items(doc: &Value) -> Result<&Vec<Value>, ImportError> {
    match doc {
        Value::Array(items) => Ok(items),
        Value::Object(map) => map
            .get("items")
            .and_then(Value::as_array)
            .ok_or(ImportError::InvalidFormat),
        _ => Err(ImportError::InvalidFormat),
    }
}

/// Normalizes every element, dropping the unusable ones. Fails when nothing
/// survives.
pub fn normalize_batch(doc: &Value) -> Result<Vec<Transaction>, ImportError> {
    let items = extract_items(doc)?;
    let cleaned: Vec<Transaction> = items.iter().filter_map(normalize).collect();
    debug!(
        offered = items.len(),
        kept = cleaned.len(),
        "normalized import batch"
    );
    if cleaned.is_empty() {
        return Err(ImportError::NoValidRecords);
    }
    Ok(cleaned)
}

pub fn parse_import(text: &str) -> Result<Vec<Transaction>, ImportError> {
    let doc: Value = serde_json::from_str(text)?;
    normalize_batch(&doc)
}

/// Commits an already validated batch.
pub fn apply_import(
    collection: &mut Collection<Transaction>,
    items: Vec<Transaction>,
    mode: ImportMode,
) -> ImportSummary {
    let imported = items.len();
    let reassigned_ids = match mode {
        ImportMode::Replace => {
            collection.replace_all(items);
            0
        }
        ImportMode::Merge => collection.merge(items),
    };
    info!(imported, reassigned_ids, ?mode, "import committed");
    ImportSummary {
        imported,
        reassigned_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn norm(v: Value) -> Option<Transaction> {
        normalize_at(&v, d("2025-06-15"), 1_000)
    }

    #[test]
    fn amount_is_absolute_value() {
        for (raw, expect) in [
            (json!(-12.5), "12.5"),
            (json!(40), "40"),
            (json!("  -7.25 "), "7.25"),
            (json!("1e3"), "1000"),
            (json!(0), "0"),
        ] {
            let t = norm(json!({ "amount": raw })).unwrap();
            assert_eq!(t.amount, expect.parse::<Decimal>().unwrap());
            assert!(!t.amount.is_sign_negative() || t.amount.is_zero());
        }
    }

    #[test]
    fn out_of_range_finite_amounts_are_kept() {
        for raw in [json!(1e30), json!("1e30"), json!(-7e28), json!("123456789012345678901234567890")] {
            assert_eq!(norm(json!({ "amount": raw })).unwrap().amount, AMOUNT_CEILING);
        }
        for raw in [json!(1e-30), json!("1e-30")] {
            assert_eq!(norm(json!({ "amount": raw })).unwrap().amount, Decimal::ZERO);
        }
        assert_eq!(
            norm(json!({ "amount": "5e-28" })).unwrap().amount,
            "0.0000000000000000000000000005".parse::<Decimal>().unwrap()
        );
        assert_eq!(AMOUNT_CEILING.to_string(), "10000000000000000000000000000");
    }

    #[test]
    fn non_numeric_amount_drops_record() {
        for raw in [
            json!({ "amount": "abc" }),
            json!({ "amount": "NaN" }),
            json!({ "amount": "Infinity" }),
            json!({ "amount": null }),
            json!({ "amount": [1] }),
            json!({ "category": "Dining" }),
            json!("not an object"),
        ] {
            assert!(norm(raw).is_none());
        }
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let t = norm(json!({ "amount": 5, "id": "  ", "category": "", "date": "garbage",
                             "description": 12, "createdAt": "nope" }))
        .unwrap();
        assert!(!t.id.trim().is_empty());
        assert_eq!(t.tx_type, TxType::Expense);
        assert_eq!(t.category, "Other");
        assert_eq!(t.date, d("2025-06-15"));
        assert_eq!(t.description, "");
        assert_eq!(t.created_at, 1_000);
    }

    #[test]
    fn type_keeps_closed_set_and_narrows_unknowns() {
        assert_eq!(norm(json!({"amount": 1, "type": "income"})).unwrap().tx_type, TxType::Income);
        assert_eq!(
            norm(json!({"amount": 1, "type": "investment"})).unwrap().tx_type,
            TxType::Investment
        );
        assert_eq!(norm(json!({"amount": 1, "type": "Income"})).unwrap().tx_type, TxType::Expense);
        assert_eq!(norm(json!({"amount": 1, "type": "gift"})).unwrap().tx_type, TxType::Expense);
    }

    #[test]
    fn created_at_accepts_numbers_and_date_strings() {
        assert_eq!(norm(json!({"amount": 1, "createdAt": 1700})).unwrap().created_at, 1700);
        assert_eq!(norm(json!({"amount": 1, "createdAt": "1700"})).unwrap().created_at, 1700);
        assert_eq!(
            norm(json!({"amount": 1, "createdAt": "1970-01-01T00:00:01Z"}))
                .unwrap()
                .created_at,
            1000
        );
        assert_eq!(
            norm(json!({"amount": 1, "createdAt": "1970-01-02"})).unwrap().created_at,
            86_400_000
        );
    }

    #[test]
    fn dates_keep_calendar_day_as_written() {
        assert_eq!(parse_loose_date("2025-03-09"), Some(d("2025-03-09")));
        assert_eq!(parse_loose_date("2025-03-09T23:30:00-08:00"), Some(d("2025-03-09")));
        assert_eq!(parse_loose_date("2025-03-09 08:15:00"), Some(d("2025-03-09")));
        assert_eq!(parse_loose_date("09/03/2025"), None);
    }

    #[test]
    fn batch_accepts_array_or_items_envelope() {
        let arr = json!([{ "amount": 1 }, { "amount": "x" }]);
        assert_eq!(normalize_batch(&arr).unwrap().len(), 1);
        let env = json!({ "version": 1, "items": [{ "amount": 2 }, { "amount": 3 }] });
        assert_eq!(normalize_batch(&env).unwrap().len(), 2);
    }

    #[test]
    fn batch_rejects_bad_shapes_and_empty_results() {
        assert!(matches!(
            normalize_batch(&json!({ "data": [] })),
            Err(ImportError::InvalidFormat)
        ));
        assert!(matches!(
            normalize_batch(&json!(42)),
            Err(ImportError::InvalidFormat)
        ));
        assert!(matches!(
            normalize_batch(&json!([{ "amount": "abc" }])),
            Err(ImportError::NoValidRecords)
        ));
        assert!(matches!(
            parse_import("{oops"),
            Err(ImportError::InvalidJson(_))
        ));
    }

    #[test]
    fn import_modes() {
        "merge".parse::<ImportMode>().unwrap();
        assert_eq!("Replace".parse::<ImportMode>().unwrap(), ImportMode::Replace);
        assert!("upsert".parse::<ImportMode>().is_err());

        let mut c = Collection::new();
        c.add(Transaction::new(Decimal::ONE, TxType::Expense, "A", d("2025-01-01"), ""));
        let batch = parse_import(r#"[{"id":"x1","amount":2},{"id":"x2","amount":3}]"#).unwrap();
        let s = apply_import(&mut c, batch.clone(), ImportMode::Merge);
        assert_eq!(s, ImportSummary { imported: 2, reassigned_ids: 0 });
        assert_eq!(c.len(), 3);

        let s = apply_import(&mut c, batch, ImportMode::Replace);
        assert_eq!(s.imported, 2);
        assert_eq!(c.len(), 2);
        assert!(c.contains("x1") && c.contains("x2"));
    }
}
