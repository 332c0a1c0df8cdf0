// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use uuid::Uuid;

use crate::error::{AppError, AppResult, is_unique_violation};
use crate::models::{ApiConfiguration, ConfigMap};
use crate::utils::uuid_col;

const COLUMNS: &str = "id, api_name, api_type, config, is_active, created_at, updated_at";

fn from_row(r: &Row<'_>) -> rusqlite::Result<ApiConfiguration> {
    let raw: String = r.get(3)?;
    let config: ConfigMap = serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
    Ok(ApiConfiguration {
        id: uuid_col(r, 0)?,
        api_name: r.get(1)?,
        api_type: r.get(2)?,
        config,
        is_active: r.get(4)?,
        created_at: r.get(5)?,
        updated_at: r.get(6)?,
    })
}

pub fn insert(conn: &Connection, api: &ApiConfiguration) -> AppResult<()> {
    let config = serde_json::to_string(&api.config)?;
    conn.execute(
        "INSERT INTO api_configurations(id, api_name, api_type, config, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            api.id.to_string(),
            api.api_name,
            api.api_type,
            config,
            api.is_active,
            api.created_at,
            api.updated_at
        ],
    )
    .map_err(|err| {
        if is_unique_violation(&err) {
            AppError::Conflict(format!("API configuration '{}' already exists", api.api_name))
        } else {
            AppError::from(err)
        }
    })?;
    Ok(())
}

pub fn get(conn: &Connection, id: Uuid) -> AppResult<Option<ApiConfiguration>> {
    let sql = format!("SELECT {COLUMNS} FROM api_configurations WHERE id=?1");
    let api = conn
        .query_row(&sql, params![id.to_string()], from_row)
        .optional()?;
    Ok(api)
}

pub fn get_by_name(conn: &Connection, name: &str) -> AppResult<Option<ApiConfiguration>> {
    let sql = format!("SELECT {COLUMNS} FROM api_configurations WHERE api_name=?1");
    let api = conn.query_row(&sql, params![name], from_row).optional()?;
    Ok(api)
}

pub fn list(conn: &Connection) -> AppResult<Vec<ApiConfiguration>> {
    let sql = format!("SELECT {COLUMNS} FROM api_configurations ORDER BY api_name");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn update(conn: &Connection, api: &ApiConfiguration) -> AppResult<()> {
    let config = serde_json::to_string(&api.config)?;
    conn.execute(
        "UPDATE api_configurations SET config=?1, is_active=?2, updated_at=?3 WHERE id=?4",
        params![config, api.is_active, api.updated_at, api.id.to_string()],
    )?;
    Ok(())
}
