// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::CreditCard;
use crate::utils::{decimal_col, uuid_col};

const COLUMNS: &str = "id, user_id, card_name, last_four_digits, credit_limit, current_balance, billing_date, payment_due_date, created_at, updated_at";

fn from_row(r: &Row<'_>) -> rusqlite::Result<CreditCard> {
    Ok(CreditCard {
        id: uuid_col(r, 0)?,
        user_id: uuid_col(r, 1)?,
        card_name: r.get(2)?,
        last_four_digits: r.get(3)?,
        credit_limit: decimal_col(r, 4)?,
        current_balance: decimal_col(r, 5)?,
        billing_date: r.get(6)?,
        payment_due_date: r.get(7)?,
        created_at: r.get(8)?,
        updated_at: r.get(9)?,
    })
}

pub fn insert(conn: &Connection, card: &CreditCard) -> AppResult<()> {
    conn.execute(
        "INSERT INTO credit_cards(id, user_id, card_name, last_four_digits, credit_limit, current_balance, billing_date, payment_due_date, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            card.id.to_string(),
            card.user_id.to_string(),
            card.card_name,
            card.last_four_digits,
            card.credit_limit.to_string(),
            card.current_balance.to_string(),
            card.billing_date,
            card.payment_due_date,
            card.created_at,
            card.updated_at
        ],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, id: Uuid) -> AppResult<Option<CreditCard>> {
    let sql = format!("SELECT {COLUMNS} FROM credit_cards WHERE id=?1");
    let card = conn
        .query_row(&sql, params![id.to_string()], from_row)
        .optional()?;
    Ok(card)
}

pub fn list_for_user(conn: &Connection, user_id: Uuid) -> AppResult<Vec<CreditCard>> {
    let sql =
        format!("SELECT {COLUMNS} FROM credit_cards WHERE user_id=?1 ORDER BY created_at DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id.to_string()], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Adds `delta` to the outstanding balance. Returns false if the card does
/// not exist. Callers must hold a write transaction across this call.
pub fn adjust_balance(conn: &Connection, id: Uuid, delta: Decimal) -> AppResult<bool> {
    let current = conn
        .query_row(
            "SELECT current_balance FROM credit_cards WHERE id=?1",
            params![id.to_string()],
            |r| decimal_col(r, 0),
        )
        .optional()?;
    let Some(current) = current else {
        return Ok(false);
    };
    let next = current
        .checked_add(delta)
        .ok_or_else(|| AppError::validation("Credit card balance is out of range"))?;
    conn.execute(
        "UPDATE credit_cards SET current_balance=?1, updated_at=?2 WHERE id=?3",
        params![
            next.to_string(),
            chrono::Utc::now(),
            id.to_string()
        ],
    )?;
    Ok(true)
}

pub fn delete(conn: &Connection, id: Uuid) -> AppResult<bool> {
    let changed = conn.execute(
        "DELETE FROM credit_cards WHERE id=?1",
        params![id.to_string()],
    )?;
    Ok(changed > 0)
}
