// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Target, Transaction, TransactionSummary, TransactionType};
use crate::utils::{decimal_col, enum_col, opt_uuid_col, uuid_col};

const COLUMNS: &str = "id, user_id, account_id, credit_card_id, type, category, amount, description, transaction_date, created_at, updated_at";

fn from_row(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    let target = Target::from_parts(opt_uuid_col(r, 2)?, opt_uuid_col(r, 3)?)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    Ok(Transaction {
        id: uuid_col(r, 0)?,
        user_id: uuid_col(r, 1)?,
        target,
        r#type: enum_col(r, 4)?,
        category: r.get(5)?,
        amount: decimal_col(r, 6)?,
        description: r.get(7)?,
        transaction_date: r.get(8)?,
        created_at: r.get(9)?,
        updated_at: r.get(10)?,
    })
}

fn collect(
    stmt: &mut rusqlite::Statement<'_>,
    params: impl rusqlite::Params,
) -> AppResult<Vec<Transaction>> {
    let rows = stmt.query_map(params, from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn insert(conn: &Connection, tx: &Transaction) -> AppResult<()> {
    conn.execute(
        "INSERT INTO transactions(id, user_id, account_id, credit_card_id, type, category, amount, description, transaction_date, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            tx.id.to_string(),
            tx.user_id.to_string(),
            tx.target.account_id().map(|id| id.to_string()),
            tx.target.credit_card_id().map(|id| id.to_string()),
            tx.r#type.as_str(),
            tx.category,
            tx.amount.to_string(),
            tx.description,
            tx.transaction_date,
            tx.created_at,
            tx.updated_at
        ],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, id: Uuid) -> AppResult<Option<Transaction>> {
    let sql = format!("SELECT {COLUMNS} FROM transactions WHERE id=?1");
    let tx = conn
        .query_row(&sql, params![id.to_string()], from_row)
        .optional()?;
    Ok(tx)
}

/// Newest first by transaction date, then creation time.
pub fn list_for_user(
    conn: &Connection,
    user_id: Uuid,
    limit: u32,
    offset: u32,
) -> AppResult<Vec<Transaction>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM transactions WHERE user_id=?1
         ORDER BY transaction_date DESC, created_at DESC LIMIT ?2 OFFSET ?3"
    );
    let mut stmt = conn.prepare(&sql)?;
    collect(&mut stmt, params![user_id.to_string(), limit, offset])
}

/// Every transaction of the user, oldest first.
pub fn list_all_for_user(conn: &Connection, user_id: Uuid) -> AppResult<Vec<Transaction>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM transactions WHERE user_id=?1
         ORDER BY transaction_date, created_at"
    );
    let mut stmt = conn.prepare(&sql)?;
    collect(&mut stmt, params![user_id.to_string()])
}

pub fn update(conn: &Connection, tx: &Transaction) -> AppResult<()> {
    conn.execute(
        "UPDATE transactions SET account_id=?1, credit_card_id=?2, type=?3, category=?4, amount=?5,
             description=?6, transaction_date=?7, updated_at=?8
         WHERE id=?9",
        params![
            tx.target.account_id().map(|id| id.to_string()),
            tx.target.credit_card_id().map(|id| id.to_string()),
            tx.r#type.as_str(),
            tx.category,
            tx.amount.to_string(),
            tx.description,
            tx.transaction_date,
            tx.updated_at,
            tx.id.to_string()
        ],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, id: Uuid) -> AppResult<bool> {
    let changed = conn.execute(
        "DELETE FROM transactions WHERE id=?1",
        params![id.to_string()],
    )?;
    Ok(changed > 0)
}

fn out_of_range() -> AppError {
    AppError::Internal("transaction totals are out of range".into())
}

/// Cash-flow totals over account-targeted transactions only; card
/// transactions move debt, not cash.
pub fn summary_for_user(conn: &Connection, user_id: Uuid) -> AppResult<TransactionSummary> {
    let mut stmt = conn.prepare(
        "SELECT type, amount FROM transactions
         WHERE user_id=?1 AND credit_card_id IS NULL AND type IN ('income','expense')",
    )?;
    let rows = stmt.query_map(params![user_id.to_string()], |r| {
        Ok((enum_col::<TransactionType>(r, 0)?, decimal_col(r, 1)?))
    })?;
    let mut summary = TransactionSummary::default();
    for row in rows {
        let (kind, amount) = row?;
        let total = match kind {
            TransactionType::Income => &mut summary.total_income,
            TransactionType::Expense => &mut summary.total_expense,
            TransactionType::Transfer => continue,
        };
        *total = total.checked_add(amount).ok_or_else(out_of_range)?;
    }
    summary.balance = summary
        .total_income
        .checked_sub(summary.total_expense)
        .ok_or_else(out_of_range)?;
    Ok(summary)
}
