// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod expiry;
pub mod exporter;
pub mod importer;
pub mod purchases;
pub mod reports;
pub mod transactions;
