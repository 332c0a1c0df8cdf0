// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Utc;
use rusqlite::{Connection, TransactionBehavior};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::access::authorize;
use crate::auth::Identity;
use crate::error::{AppError, AppResult};
use crate::models::Budget;
use crate::repo;

#[derive(Debug, Clone)]
pub struct NewBudget {
    pub category: String,
    pub amount: Decimal,
    pub month: u32,
    pub year: i32,
}

/// A (month, year) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub month: u32,
    pub year: i32,
}

fn fresh(caller: &Identity, category: String, amount: Decimal, period: Period) -> Budget {
    let now = Utc::now();
    Budget {
        id: Uuid::new_v4(),
        user_id: caller.user_id,
        category,
        amount,
        budget_month: period.month,
        budget_year: period.year,
        created_at: now,
        updated_at: now,
    }
}

pub fn create(conn: &Connection, caller: &Identity, new: NewBudget) -> AppResult<Budget> {
    let category = super::required("category", &new.category)?;
    super::positive("amount", new.amount)?;
    super::check_period(new.month, new.year)?;
    let period = Period {
        month: new.month,
        year: new.year,
    };
    let budget = fresh(caller, category, new.amount, period);
    repo::budgets::insert(conn, &budget)?;
    tracing::info!(budget_id = %budget.id, "budget created");
    Ok(budget)
}

/// All budgets, or only those of `period` when given.
pub fn list(
    conn: &Connection,
    caller: &Identity,
    period: Option<Period>,
) -> AppResult<Vec<Budget>> {
    match period {
        Some(p) => {
            super::check_period(p.month, p.year)?;
            repo::budgets::list_for_period(conn, caller.user_id, p.month, p.year)
        }
        None => repo::budgets::list_for_user(conn, caller.user_id),
    }
}

pub fn get(conn: &Connection, caller: &Identity, id: Uuid) -> AppResult<Budget> {
    authorize(repo::budgets::get(conn, id)?, caller)
}

pub fn delete(conn: &Connection, caller: &Identity, id: Uuid) -> AppResult<()> {
    let budget = authorize(repo::budgets::get(conn, id)?, caller)?;
    if !repo::budgets::delete(conn, budget.id)? {
        return Err(AppError::not_found("Budget"));
    }
    tracing::info!(budget_id = %budget.id, "budget deleted");
    Ok(())
}

/// Copies every budget of `from` into `to`. Categories already budgeted in
/// `to` are left alone. Returns how many were copied.
pub fn copy_from_month(
    conn: &mut Connection,
    caller: &Identity,
    from: Period,
    to: Period,
) -> AppResult<usize> {
    super::check_period(from.month, from.year)?;
    super::check_period(to.month, to.year)?;

    let db = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let source = repo::budgets::list_for_period(&db, caller.user_id, from.month, from.year)?;
    let mut copied = 0;
    for b in source {
        let copy = fresh(caller, b.category, b.amount, to);
        if repo::budgets::insert_if_absent(&db, &copy)? {
            copied += 1;
        }
    }
    db.commit()?;
    tracing::info!(
        user_id = %caller.user_id,
        from_month = from.month,
        from_year = from.year,
        to_month = to.month,
        to_year = to.year,
        copied,
        "budgets copied"
    );
    Ok(copied)
}
