// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Account;
use crate::utils::{decimal_col, enum_col, opt_uuid_col, uuid_col};

const COLUMNS: &str =
    "id, user_id, name, type, balance, currency, parent_account_id, created_at, updated_at";

fn from_row(r: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: uuid_col(r, 0)?,
        user_id: uuid_col(r, 1)?,
        name: r.get(2)?,
        r#type: enum_col(r, 3)?,
        balance: decimal_col(r, 4)?,
        currency: r.get(5)?,
        parent_account_id: opt_uuid_col(r, 6)?,
        created_at: r.get(7)?,
        updated_at: r.get(8)?,
        sub_accounts: Vec::new(),
    })
}

pub fn insert(conn: &Connection, account: &Account) -> AppResult<()> {
    conn.execute(
        "INSERT INTO accounts(id, user_id, name, type, balance, currency, parent_account_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            account.id.to_string(),
            account.user_id.to_string(),
            account.name,
            account.r#type.as_str(),
            account.balance.to_string(),
            account.currency,
            account.parent_account_id.map(|id| id.to_string()),
            account.created_at,
            account.updated_at
        ],
    )?;
    Ok(())
}

/// Loads one account without its pockets.
pub fn get(conn: &Connection, id: Uuid) -> AppResult<Option<Account>> {
    let sql = format!("SELECT {COLUMNS} FROM accounts WHERE id=?1");
    let account = conn
        .query_row(&sql, params![id.to_string()], from_row)
        .optional()?;
    Ok(account)
}

pub fn list_children(conn: &Connection, parent_id: Uuid) -> AppResult<Vec<Account>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM accounts WHERE parent_account_id=?1 ORDER BY created_at DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![parent_id.to_string()], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Every account the user owns, flat.
pub fn list_for_user(conn: &Connection, user_id: Uuid) -> AppResult<Vec<Account>> {
    let sql = format!("SELECT {COLUMNS} FROM accounts WHERE user_id=?1 ORDER BY created_at DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id.to_string()], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Main accounts with their pockets attached.
pub fn list_tree_for_user(conn: &Connection, user_id: Uuid) -> AppResult<Vec<Account>> {
    let all = list_for_user(conn, user_id)?;
    let mut mains = Vec::new();
    let mut children: HashMap<Uuid, Vec<Account>> = HashMap::new();
    for account in all {
        match account.parent_account_id {
            Some(parent) => children.entry(parent).or_default().push(account),
            None => mains.push(account),
        }
    }
    for main in &mut mains {
        if let Some(subs) = children.remove(&main.id) {
            main.sub_accounts = subs;
        }
    }
    Ok(mains)
}

pub fn update(conn: &Connection, account: &Account) -> AppResult<()> {
    conn.execute(
        "UPDATE accounts SET name=?1, currency=?2, updated_at=?3 WHERE id=?4",
        params![
            account.name,
            account.currency,
            account.updated_at,
            account.id.to_string()
        ],
    )?;
    Ok(())
}

/// Adds `delta` to the stored balance. Returns false if the account does not
/// exist. Callers must hold a write transaction across this call.
pub fn adjust_balance(conn: &Connection, id: Uuid, delta: Decimal) -> AppResult<bool> {
    let current = conn
        .query_row(
            "SELECT balance FROM accounts WHERE id=?1",
            params![id.to_string()],
            |r| decimal_col(r, 0),
        )
        .optional()?;
    let Some(current) = current else {
        return Ok(false);
    };
    let next = current
        .checked_add(delta)
        .ok_or_else(|| AppError::validation("Account balance is out of range"))?;
    conn.execute(
        "UPDATE accounts SET balance=?1, updated_at=?2 WHERE id=?3",
        params![
            next.to_string(),
            chrono::Utc::now(),
            id.to_string()
        ],
    )?;
    Ok(true)
}

pub fn delete(conn: &Connection, id: Uuid) -> AppResult<bool> {
    let changed = conn.execute("DELETE FROM accounts WHERE id=?1", params![id.to_string()])?;
    Ok(changed > 0)
}
