// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Request-level operations. Each takes the verified caller identity where
//! one is needed and returns [`AppResult`](crate::error::AppResult).

pub mod accounts;
pub mod admin;
pub mod budgets;
pub mod credit_cards;
pub mod gold;
pub mod identity;
pub mod stats;
pub mod transactions;

use crate::error::{AppError, AppResult};

pub(crate) fn required(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn positive(field: &str, value: rust_decimal::Decimal) -> AppResult<()> {
    if value <= rust_decimal::Decimal::ZERO {
        return Err(AppError::Validation(format!("{field} must be greater than 0")));
    }
    Ok(())
}

pub(crate) fn check_period(month: u32, year: i32) -> AppResult<()> {
    if !(1..=12).contains(&month) {
        return Err(AppError::validation("month must be between 1 and 12"));
    }
    if year < 2020 {
        return Err(AppError::validation("year must be 2020 or later"));
    }
    Ok(())
}
