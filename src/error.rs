// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures that abort a whole import. Nothing is committed when one of these
/// is returned.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Invalid file format: expected an array or {{items: []}}")]
    InvalidFormat,
    #[error("No valid transactions found")]
    NoValidRecords,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Amount must be greater than 0")]
    AmountNotPositive,
    #[error("Amount cannot exceed {0}")]
    AmountTooLarge(String),
    #[error("Date is required")]
    DateRequired,
    #[error("Name is required")]
    NameRequired,
    #[error("Expiry date is required")]
    ExpiryDateRequired,
}
