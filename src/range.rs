// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Named date filters and the inclusive calendar-day ranges they resolve to.

use anyhow::{anyhow, Result};
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    All,
    ThisMonth,
    PreviousMonth,
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl DateFilter {
    /// Accepts `all`, `this-month`, `previous-month` (or `prev-month`) and
    /// `custom`, plus the camelCase spellings.
    pub fn from_name(
        name: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self> {
        match name.trim().to_lowercase().replace('_', "-").as_str() {
            "all" | "all-time" | "alltime" => Ok(DateFilter::All),
            "this-month" | "thismonth" => Ok(DateFilter::ThisMonth),
            "previous-month" | "previousmonth" | "prev-month" | "prevmonth" => {
                Ok(DateFilter::PreviousMonth)
            }
            "custom" => Ok(DateFilter::Custom { start, end }),
            other => Err(anyhow!(
                "Unknown date filter '{}', expected all|this-month|previous-month|custom",
                other
            )),
        }
    }

    /// Concrete range for this filter, or `None` when nothing should be
    /// filtered out.
    pub fn resolve(&self, today: NaiveDate) -> Option<DateRange> {
        match *self {
            DateFilter::All => None,
            DateFilter::ThisMonth => Some(DateRange::month_of(today)),
            DateFilter::PreviousMonth => {
                let first = first_of_month(today);
                first
                    .checked_sub_months(Months::new(1))
                    .map(DateRange::month_of)
            }
            DateFilter::Custom {
                start: Some(start),
                end: Some(end),
            } => Some(DateRange { start, end }),
            // A half-open custom range means no filtering at all.
            DateFilter::Custom { .. } => None,
        }
    }
}

/// Inclusive `[start, end]` at calendar-day granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn month_of(date: NaiveDate) -> Self {
        let start = first_of_month(date);
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    /// An inverted range (`start > end`) contains nothing.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
