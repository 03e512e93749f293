// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Side-effect-free views derived from the record collections.

use crate::models::{ExpiryItem, Transaction, TxType, DEFAULT_CATEGORY};
use crate::range::DateRange;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::cmp::Reverse;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub investment: Decimal,
    /// `income - expense`. Investments are not counted against savings.
    pub savings: Decimal,
}

fn in_scope(t: &Transaction, range: Option<&DateRange>) -> bool {
    range.is_none_or(|r| r.contains(t.date))
}

/// Sums saturate at `Decimal::MAX` rather than overflowing.
pub fn compute_totals(transactions: &[Transaction], range: Option<&DateRange>) -> Totals {
    let mut totals = Totals::default();
    for t in transactions.iter().filter(|t| in_scope(t, range)) {
        let amount = t.amount.abs();
        match t.tx_type {
            TxType::Income => totals.income = totals.income.saturating_add(amount),
            TxType::Expense => totals.expense = totals.expense.saturating_add(amount),
            TxType::Investment => {
                totals.investment = totals.investment.saturating_add(amount)
            }
        }
    }
    totals.savings = totals.income.saturating_sub(totals.expense);
    totals
}

/// Expense sums per category, in the order categories are first met.
/// Serializes as a JSON object with the same key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBreakdown {
    entries: Vec<(String, Decimal)>,
}

impl CategoryBreakdown {
    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> Decimal {
        self.entries
            .iter()
            .fold(Decimal::ZERO, |acc, (_, v)| acc.saturating_add(*v))
    }

    /// Largest spend first; ties keep first-seen order.
    pub fn sorted_desc(&self) -> Vec<(String, Decimal)> {
        let mut out = self.entries.clone();
        out.sort_by_key(|(_, v)| Reverse(*v));
        out
    }

    fn add(&mut self, category: &str, amount: Decimal) {
        match self.entries.iter_mut().find(|(c, _)| c == category) {
            Some((_, v)) => *v = v.saturating_add(amount),
            None => self.entries.push((category.to_string(), amount)),
        }
    }
}

impl Serialize for CategoryBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (c, v) in &self.entries {
            map.serialize_entry(c, v)?;
        }
        map.end()
    }
}

pub fn aggregate_by_category(
    transactions: &[Transaction],
    range: Option<&DateRange>,
) -> CategoryBreakdown {
    let mut out = CategoryBreakdown::default();
    for t in transactions
        .iter()
        .filter(|t| t.tx_type == TxType::Expense && in_scope(t, range))
    {
        let category = if t.category.trim().is_empty() {
            DEFAULT_CATEGORY
        } else {
            t.category.as_str()
        };
        out.add(category, t.amount.abs());
    }
    out
}

/// `part` as a percentage of `total`; zero when `total` is zero.
pub fn share_percent(part: Decimal, total: Decimal) -> Decimal {
    part.checked_div(total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// Signed whole days from `reference` to `target`: positive when `target` is
/// later, zero on the same day.
pub fn days_until(reference: NaiveDate, target: NaiveDate) -> i64 {
    (target - reference).num_days()
}

/// Like [`days_until`] for zoned timestamps; each side is first reduced to its
/// local calendar day so DST transitions cannot skew the count.
pub fn days_until_at<Tz: TimeZone>(reference: &DateTime<Tz>, target: &DateTime<Tz>) -> i64 {
    days_until(reference.date_naive(), target.date_naive())
}

/// How many expiry items land today, this week (Monday start), this month and
/// this year. One item may count in several buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ExpiryCounts {
    pub today: usize,
    pub week: usize,
    pub month: usize,
    pub year: usize,
}

pub fn expiry_counts(items: &[ExpiryItem], today: NaiveDate) -> ExpiryCounts {
    let week_start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    let week = DateRange::new(week_start, week_start + Duration::days(6));
    let month = DateRange::month_of(today);
    let year = DateRange::new(
        NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
        NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today),
    );

    let mut counts = ExpiryCounts::default();
    for e in items {
        if e.expiry == today {
            counts.today += 1;
        }
        if week.contains(e.expiry) {
            counts.week += 1;
        }
        if month.contains(e.expiry) {
            counts.month += 1;
        }
        if year.contains(e.expiry) {
            counts.year += 1;
        }
    }
    counts
}

/// Newest day first; within a day, most recently created first.
pub fn sort_for_display(transactions: &[Transaction]) -> Vec<&Transaction> {
    let mut out: Vec<&Transaction> = transactions.iter().collect();
    out.sort_by_key(|t| Reverse((t.date, t.created_at)));
    out
}

/// Expiry items soonest first.
pub fn sort_expiry(items: &[ExpiryItem]) -> Vec<&ExpiryItem> {
    let mut out: Vec<&ExpiryItem> = items.iter().collect();
    out.sort_by_key(|e| (e.expiry, e.created_at));
    out
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub tx_type: Option<TxType>,
    pub category: Option<String>,
    pub range: Option<DateRange>,
}

impl TransactionFilter {
    pub fn matches(&self, t: &Transaction) -> bool {
        self.tx_type.is_none_or(|ty| t.tx_type == ty)
            && self.category.as_deref().is_none_or(|c| t.category == c)
            && in_scope(t, self.range.as_ref())
    }
}

/// Display-ordered view of the transactions passing `filter`.
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    filter: &TransactionFilter,
) -> Vec<&'a Transaction> {
    sort_for_display(transactions)
        .into_iter()
        .filter(|t| filter.matches(t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::DateFilter;
    use chrono::FixedOffset;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tx(amount: &str, ty: TxType, cat: &str, date: &str) -> Transaction {
        Transaction::new(amount.parse().unwrap(), ty, cat, d(date), "")
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn totals_without_range_include_everything() {
        let txs = vec![
            tx("100", TxType::Income, "Salary", "2020-01-01"),
            tx("40", TxType::Expense, "Dining", "2031-12-31"),
        ];
        let t = compute_totals(&txs, None);
        assert_eq!(t.income, dec("100"));
        assert_eq!(t.expense, dec("40"));
        assert_eq!(t.savings, dec("60"));
        assert_eq!(t.investment, Decimal::ZERO);
    }

    #[test]
    fn investment_is_tracked_but_not_in_savings() {
        let txs = vec![
            tx("100", TxType::Income, "Salary", "2025-01-01"),
            tx("30", TxType::Investment, "Mutual Funds", "2025-01-02"),
            tx("20", TxType::Expense, "Rent", "2025-01-03"),
        ];
        let t = compute_totals(&txs, None);
        assert_eq!(t.investment, dec("30"));
        assert_eq!(t.savings, dec("80"));
    }

    #[test]
    fn this_month_end_is_inclusive_next_month_excluded() {
        let today = d("2025-04-10");
        let range = DateFilter::ThisMonth.resolve(today).unwrap();
        let txs = vec![
            tx("5", TxType::Expense, "A", "2025-04-30"),
            tx("7", TxType::Expense, "A", "2025-05-01"),
            tx("11", TxType::Expense, "A", "2025-04-01"),
            tx("13", TxType::Expense, "A", "2025-03-31"),
        ];
        let t = compute_totals(&txs, Some(&range));
        assert_eq!(t.expense, dec("16"));
    }

    #[test]
    fn category_breakdown_excludes_income_and_keeps_first_seen_order() {
        let txs = vec![
            tx("3", TxType::Expense, "Rent", "2025-01-01"),
            tx("10", TxType::Expense, "Groceries", "2025-01-01"),
            tx("999", TxType::Income, "Salary", "2025-01-01"),
            tx("5", TxType::Expense, "Groceries", "2025-01-02"),
            tx("50", TxType::Investment, "Stocks", "2025-01-02"),
        ];
        let b = aggregate_by_category(&txs, None);
        assert_eq!(b.len(), 2);
        assert_eq!(b.get("Groceries"), Some(dec("15")));
        assert_eq!(b.get("Salary"), None);
        let order: Vec<&str> = b.iter().map(|(c, _)| c).collect();
        assert_eq!(order, vec!["Rent", "Groceries"]);
        assert_eq!(b.sorted_desc()[0].0, "Groceries");
        assert_eq!(b.total(), dec("18"));

        let json = serde_json::to_string(&b).unwrap();
        assert!(json.find("Rent").unwrap() < json.find("Groceries").unwrap());
    }

    #[test]
    fn category_breakdown_respects_range() {
        let txs = vec![
            tx("3", TxType::Expense, "Rent", "2025-01-01"),
            tx("4", TxType::Expense, "Dining", "2025-02-01"),
        ];
        let r = DateRange::new(d("2025-02-01"), d("2025-02-28"));
        let b = aggregate_by_category(&txs, Some(&r));
        assert_eq!(b.len(), 1);
        assert_eq!(b.get("Dining"), Some(dec("4")));
    }

    #[test]
    fn days_until_is_calendar_arithmetic() {
        let today = d("2025-03-09");
        assert_eq!(days_until(today, today), 0);
        assert_eq!(days_until(today, d("2025-03-10")), 1);
        assert_eq!(days_until(today, d("2025-03-08")), -1);
        assert_eq!(days_until(d("2024-12-31"), d("2025-03-01")), 60);
    }

    #[test]
    fn days_until_ignores_offset_shift_across_dst() {
        // 23:30 at UTC-5 to 00:30 at UTC-4 is exactly 24h apart but two days
        // on the wall calendar.
        let winter = FixedOffset::west_opt(5 * 3600).unwrap();
        let summer = FixedOffset::west_opt(4 * 3600).unwrap();
        let before = winter.with_ymd_and_hms(2025, 3, 8, 23, 30, 0).unwrap();
        let after = summer.with_ymd_and_hms(2025, 3, 10, 0, 30, 0).unwrap();
        assert_eq!((after - before).num_hours(), 24);
        assert_eq!(days_until_at(&before, &after), 2);
        assert_eq!(days_until_at(&after, &before), -2);
    }

    #[test]
    fn expiry_counts_bucket_by_calendar_windows() {
        // 2025-06-18 is a Wednesday; its week runs 16th..22nd.
        let today = d("2025-06-18");
        let items: Vec<ExpiryItem> = ["2025-06-18", "2025-06-16", "2025-06-23", "2025-12-31", "2026-01-01"]
            .iter()
            .map(|s| ExpiryItem::new("x", d(s)))
            .collect();
        let c = expiry_counts(&items, today);
        assert_eq!(
            c,
            ExpiryCounts {
                today: 1,
                week: 2,
                month: 3,
                year: 4
            }
        );
    }

    #[test]
    fn display_order_is_date_then_created_desc() {
        let mut a = tx("1", TxType::Expense, "A", "2025-01-01");
        a.created_at = 5;
        let mut b = tx("2", TxType::Expense, "A", "2025-01-02");
        b.created_at = 1;
        let mut c = tx("3", TxType::Expense, "A", "2025-01-02");
        c.created_at = 9;
        let txs = vec![a, b, c];
        let amounts: Vec<String> = sort_for_display(&txs)
            .iter()
            .map(|t| t.amount.to_string())
            .collect();
        assert_eq!(amounts, vec!["3", "2", "1"]);
    }

    #[test]
    fn filter_by_type_and_category() {
        let txs = vec![
            tx("1", TxType::Expense, "Rent", "2025-01-01"),
            tx("2", TxType::Income, "Rent", "2025-01-01"),
            tx("3", TxType::Expense, "Dining", "2025-01-01"),
        ];
        let f = TransactionFilter {
            tx_type: Some(TxType::Expense),
            category: Some("Rent".into()),
            range: None,
        };
        let out = filter_transactions(&txs, &f);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].amount, dec("1"));
    }

    #[test]
    fn sums_saturate_instead_of_overflowing() {
        let mut big = tx("1", TxType::Income, "Salary", "2025-01-01");
        big.amount = Decimal::MAX;
        let mut spend = tx("1", TxType::Expense, "Rent", "2025-01-02");
        spend.amount = Decimal::MAX;
        let txs = vec![big.clone(), big, spend.clone(), spend];

        let t = compute_totals(&txs, None);
        assert_eq!(t.income, Decimal::MAX);
        assert_eq!(t.expense, Decimal::MAX);
        assert_eq!(t.savings, Decimal::ZERO);

        let by_cat = aggregate_by_category(&txs, None);
        assert_eq!(by_cat.get("Rent"), Some(Decimal::MAX));
        assert_eq!(by_cat.total(), Decimal::MAX);
    }

    #[test]
    fn share_percent_handles_zero_and_huge_totals() {
        assert_eq!(share_percent(dec("5"), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(share_percent(dec("1"), dec("4")), dec("25"));
        assert_eq!(share_percent(Decimal::MAX, Decimal::MAX), dec("100"));
    }
}
