// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::auth::Identity;
use crate::error::{AppError, AppResult};
use crate::models::Transaction;
use crate::repo;

const RECENT: u32 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_accounts: usize,
    pub total_balance: Decimal,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub total_budgets: usize,
    pub total_credit_cards: usize,
    pub recent_transactions: Vec<Transaction>,
}

/// Overview of the caller's money. Balances include pockets.
pub fn dashboard(conn: &Connection, caller: &Identity) -> AppResult<DashboardStats> {
    let accounts = repo::accounts::list_for_user(conn, caller.user_id)?;
    let summary = repo::transactions::summary_for_user(conn, caller.user_id)?;
    let total_balance = accounts
        .iter()
        .try_fold(Decimal::ZERO, |acc, a| acc.checked_add(a.balance))
        .ok_or_else(|| AppError::Internal("total balance is out of range".into()))?;
    Ok(DashboardStats {
        total_accounts: accounts.len(),
        total_balance,
        total_income: summary.total_income,
        total_expense: summary.total_expense,
        total_budgets: repo::budgets::list_for_user(conn, caller.user_id)?.len(),
        total_credit_cards: repo::credit_cards::list_for_user(conn, caller.user_id)?.len(),
        recent_transactions: repo::transactions::list_for_user(conn, caller.user_id, RECENT, 0)?,
    })
}
