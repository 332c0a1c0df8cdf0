// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Gold holdings per user and the shared per-day price table.

use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{GoldAsset, GoldPrice};
use crate::utils::{decimal_col, enum_col, uuid_col};

const ASSET_COLUMNS: &str = "id, user_id, name, gold_type, weight_gram, purchase_price_per_gram, purchase_date, storage_location, notes, created_at, updated_at";
const PRICE_COLUMNS: &str = "id, price_date, price_per_gram, source, created_at, updated_at";

fn asset_from_row(r: &Row<'_>) -> rusqlite::Result<GoldAsset> {
    Ok(GoldAsset {
        id: uuid_col(r, 0)?,
        user_id: uuid_col(r, 1)?,
        name: r.get(2)?,
        gold_type: enum_col(r, 3)?,
        weight_gram: decimal_col(r, 4)?,
        purchase_price_per_gram: decimal_col(r, 5)?,
        purchase_date: r.get(6)?,
        storage_location: r.get(7)?,
        notes: r.get(8)?,
        created_at: r.get(9)?,
        updated_at: r.get(10)?,
    })
}

fn price_from_row(r: &Row<'_>) -> rusqlite::Result<GoldPrice> {
    Ok(GoldPrice {
        id: uuid_col(r, 0)?,
        price_date: r.get(1)?,
        price_per_gram: decimal_col(r, 2)?,
        source: r.get(3)?,
        created_at: r.get(4)?,
        updated_at: r.get(5)?,
    })
}

pub fn insert_asset(conn: &Connection, a: &GoldAsset) -> AppResult<()> {
    conn.execute(
        "INSERT INTO gold_assets(id, user_id, name, gold_type, weight_gram, purchase_price_per_gram, purchase_date, storage_location, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            a.id.to_string(),
            a.user_id.to_string(),
            a.name,
            a.gold_type.as_str(),
            a.weight_gram.to_string(),
            a.purchase_price_per_gram.to_string(),
            a.purchase_date,
            a.storage_location,
            a.notes,
            a.created_at,
            a.updated_at
        ],
    )?;
    Ok(())
}

pub fn get_asset(conn: &Connection, id: Uuid) -> AppResult<Option<GoldAsset>> {
    let sql = format!("SELECT {ASSET_COLUMNS} FROM gold_assets WHERE id=?1");
    let asset = conn
        .query_row(&sql, params![id.to_string()], asset_from_row)
        .optional()?;
    Ok(asset)
}

pub fn list_assets_for_user(conn: &Connection, user_id: Uuid) -> AppResult<Vec<GoldAsset>> {
    let sql = format!(
        "SELECT {ASSET_COLUMNS} FROM gold_assets WHERE user_id=?1
         ORDER BY purchase_date DESC, created_at DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id.to_string()], asset_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn delete_asset(conn: &Connection, id: Uuid) -> AppResult<bool> {
    let changed = conn.execute(
        "DELETE FROM gold_assets WHERE id=?1",
        params![id.to_string()],
    )?;
    Ok(changed > 0)
}

/// Most recent price by price date.
pub fn latest_price(conn: &Connection) -> AppResult<Option<GoldPrice>> {
    let sql = format!("SELECT {PRICE_COLUMNS} FROM gold_prices ORDER BY price_date DESC LIMIT 1");
    let price = conn.query_row(&sql, [], price_from_row).optional()?;
    Ok(price)
}

pub fn price_history(conn: &Connection, limit: u32) -> AppResult<Vec<GoldPrice>> {
    let sql =
        format!("SELECT {PRICE_COLUMNS} FROM gold_prices ORDER BY price_date DESC LIMIT ?1");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![limit], price_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// One row per date; a second submission for the same date overwrites the
/// price and source in place and keeps the original id.
pub fn upsert_price(
    conn: &Connection,
    date: NaiveDate,
    price_per_gram: Decimal,
    source: &str,
) -> AppResult<GoldPrice> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO gold_prices(id, price_date, price_per_gram, source, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)
         ON CONFLICT(price_date) DO UPDATE SET
             price_per_gram=excluded.price_per_gram,
             source=excluded.source,
             updated_at=excluded.updated_at",
        params![
            Uuid::new_v4().to_string(),
            date,
            price_per_gram.to_string(),
            source,
            now
        ],
    )?;
    let sql = format!("SELECT {PRICE_COLUMNS} FROM gold_prices WHERE price_date=?1");
    let price = conn.query_row(&sql, params![date], price_from_row)?;
    Ok(price)
}

pub fn count_prices(conn: &Connection) -> AppResult<i64> {
    let n = conn.query_row("SELECT COUNT(*) FROM gold_prices", [], |r| r.get(0))?;
    Ok(n)
}
