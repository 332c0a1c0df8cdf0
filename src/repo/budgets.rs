// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};
use uuid::Uuid;

use crate::error::{AppError, AppResult, is_unique_violation};
use crate::models::Budget;
use crate::utils::{decimal_col, uuid_col};

const COLUMNS: &str =
    "id, user_id, category, amount, budget_month, budget_year, created_at, updated_at";

fn from_row(r: &Row<'_>) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: uuid_col(r, 0)?,
        user_id: uuid_col(r, 1)?,
        category: r.get(2)?,
        amount: decimal_col(r, 3)?,
        budget_month: r.get(4)?,
        budget_year: r.get(5)?,
        created_at: r.get(6)?,
        updated_at: r.get(7)?,
    })
}

fn insert_row(conn: &Connection, b: &Budget, on_conflict: &str) -> rusqlite::Result<usize> {
    let sql = format!(
        "INSERT INTO budgets(id, user_id, category, amount, budget_month, budget_year, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) {on_conflict}"
    );
    conn.execute(
        &sql,
        params![
            b.id.to_string(),
            b.user_id.to_string(),
            b.category,
            b.amount.to_string(),
            b.budget_month,
            b.budget_year,
            b.created_at,
            b.updated_at
        ],
    )
}

pub fn insert(conn: &Connection, budget: &Budget) -> AppResult<()> {
    insert_row(conn, budget, "").map_err(|err| {
        if is_unique_violation(&err) {
            AppError::Conflict(format!(
                "Budget for '{}' in {:02}/{} already exists",
                budget.category, budget.budget_month, budget.budget_year
            ))
        } else {
            AppError::from(err)
        }
    })?;
    Ok(())
}

/// Inserts unless (user, category, month, year) is already taken.
/// Returns whether a row was written.
pub fn insert_if_absent(conn: &Connection, budget: &Budget) -> AppResult<bool> {
    let changed = insert_row(
        conn,
        budget,
        "ON CONFLICT(user_id, category, budget_month, budget_year) DO NOTHING",
    )?;
    Ok(changed > 0)
}

pub fn get(conn: &Connection, id: Uuid) -> AppResult<Option<Budget>> {
    let sql = format!("SELECT {COLUMNS} FROM budgets WHERE id=?1");
    let budget = conn
        .query_row(&sql, params![id.to_string()], from_row)
        .optional()?;
    Ok(budget)
}

pub fn list_for_user(conn: &Connection, user_id: Uuid) -> AppResult<Vec<Budget>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM budgets WHERE user_id=?1
         ORDER BY budget_year DESC, budget_month DESC, category"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id.to_string()], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn list_for_period(
    conn: &Connection,
    user_id: Uuid,
    month: u32,
    year: i32,
) -> AppResult<Vec<Budget>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM budgets WHERE user_id=?1 AND budget_month=?2 AND budget_year=?3
         ORDER BY category"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id.to_string(), month, year], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn delete(conn: &Connection, id: Uuid) -> AppResult<bool> {
    let changed = conn.execute("DELETE FROM budgets WHERE id=?1", params![id.to_string()])?;
    Ok(changed > 0)
}
