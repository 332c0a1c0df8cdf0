// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};
use uuid::Uuid;

use crate::error::{AppError, AppResult, is_unique_violation};
use crate::models::User;
use crate::utils::uuid_col;

const COLUMNS: &str =
    "id, email, username, password_hash, full_name, is_admin, created_at, updated_at";

fn from_row(r: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: uuid_col(r, 0)?,
        email: r.get(1)?,
        username: r.get(2)?,
        password_hash: r.get(3)?,
        full_name: r.get(4)?,
        is_admin: r.get(5)?,
        created_at: r.get(6)?,
        updated_at: r.get(7)?,
    })
}

fn find_one(conn: &Connection, filter: &str, value: &str) -> AppResult<Option<User>> {
    let sql = format!("SELECT {COLUMNS} FROM users WHERE {filter}");
    let user = conn
        .query_row(&sql, params![value], from_row)
        .optional()?;
    Ok(user)
}

pub fn insert(conn: &Connection, user: &User) -> AppResult<()> {
    conn.execute(
        "INSERT INTO users(id, email, username, password_hash, full_name, is_admin, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            user.id.to_string(),
            user.email,
            user.username,
            user.password_hash,
            user.full_name,
            user.is_admin,
            user.created_at,
            user.updated_at
        ],
    )
    .map_err(|err| {
        if is_unique_violation(&err) {
            AppError::Conflict("Email or username already registered".into())
        } else {
            AppError::from(err)
        }
    })?;
    Ok(())
}

pub fn get(conn: &Connection, id: Uuid) -> AppResult<Option<User>> {
    find_one(conn, "id = ?1", &id.to_string())
}

pub fn get_by_email(conn: &Connection, email: &str) -> AppResult<Option<User>> {
    find_one(conn, "email = ?1 COLLATE NOCASE", email)
}

pub fn get_by_username(conn: &Connection, username: &str) -> AppResult<Option<User>> {
    find_one(conn, "username = ?1", username)
}

pub fn get_by_email_or_username(conn: &Connection, login: &str) -> AppResult<Option<User>> {
    find_one(conn, "email = ?1 COLLATE NOCASE OR username = ?1", login)
}

pub fn list(conn: &Connection) -> AppResult<Vec<User>> {
    let sql = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn update(conn: &Connection, user: &User) -> AppResult<()> {
    conn.execute(
        "UPDATE users SET full_name=?1, is_admin=?2, updated_at=?3 WHERE id=?4",
        params![
            user.full_name,
            user.is_admin,
            user.updated_at,
            user.id.to_string()
        ],
    )?;
    Ok(())
}

pub fn set_admin(conn: &Connection, id: Uuid, is_admin: bool) -> AppResult<bool> {
    let changed = conn.execute(
        "UPDATE users SET is_admin=?1, updated_at=?2 WHERE id=?3",
        params![is_admin, chrono::Utc::now(), id.to_string()],
    )?;
    Ok(changed > 0)
}

pub fn delete(conn: &Connection, id: Uuid) -> AppResult<bool> {
    let changed = conn.execute("DELETE FROM users WHERE id=?1", params![id.to_string()])?;
    Ok(changed > 0)
}

pub fn count(conn: &Connection) -> AppResult<(i64, i64)> {
    let counts = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(is_admin), 0) FROM users",
        [],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )?;
    Ok(counts)
}
