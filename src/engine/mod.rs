// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pay-period budget engine: turns stored rows into the daily spending limit.

pub mod aggregate;
pub mod briefing;
pub mod discretionary;
pub mod pay_period;
pub mod promo;
pub mod snapshot;
pub mod status;
