// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::ValidationError;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Largest amount a single entry may carry (seven integer digits).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(999_999_999, 0, 0, false, 2);

pub fn validate_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::AmountNotPositive);
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge(MAX_AMOUNT.to_string()));
    }
    Ok(())
}

/// Only presence is checked; future dates are handled by [`clamp_to_today`].
pub fn validate_date(date: Option<NaiveDate>) -> Result<NaiveDate, ValidationError> {
    date.ok_or(ValidationError::DateRequired)
}

/// Transactions cannot be dated after `today`; later dates are pulled back.
pub fn clamp_to_today(date: NaiveDate, today: NaiveDate) -> NaiveDate {
    date.min(today)
}

pub fn validate_name(name: &str) -> Result<&str, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    Ok(trimmed)
}

pub fn validate_expiry(
    name: &str,
    expiry: Option<NaiveDate>,
) -> Result<(String, NaiveDate), ValidationError> {
    let name = validate_name(name)?;
    let expiry = expiry.ok_or(ValidationError::ExpiryDateRequired)?;
    Ok((name.to_string(), expiry))
}
