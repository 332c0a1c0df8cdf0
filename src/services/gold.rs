// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use uuid::Uuid;

use crate::access::{authorize, require_admin};
use crate::auth::Identity;
use crate::config::{DEFAULT_PRICE_HISTORY, MAX_PRICE_HISTORY};
use crate::error::{AppError, AppResult};
use crate::models::{ApiConfiguration, GoldAsset, GoldPrice, GoldType};
use crate::repo;
use crate::utils::http_client;
use crate::valuation::{self, GoldSummary, ValuedGoldAsset};

const DEFAULT_PRICE_FIELD: &str = "/price_per_gram";

#[derive(Debug, Clone)]
pub struct NewGoldAsset {
    pub name: String,
    pub gold_type: GoldType,
    pub weight_gram: Decimal,
    pub purchase_price_per_gram: Decimal,
    pub purchase_date: NaiveDate,
    pub storage_location: Option<String>,
    pub notes: Option<String>,
}

pub fn create(
    conn: &Connection,
    caller: &Identity,
    new: NewGoldAsset,
) -> AppResult<ValuedGoldAsset> {
    let name = super::required("name", &new.name)?;
    super::positive("weight_gram", new.weight_gram)?;
    super::positive("purchase_price_per_gram", new.purchase_price_per_gram)?;
    let now = Utc::now();
    let asset = GoldAsset {
        id: Uuid::new_v4(),
        user_id: caller.user_id,
        name,
        gold_type: new.gold_type,
        weight_gram: new.weight_gram,
        purchase_price_per_gram: new.purchase_price_per_gram,
        purchase_date: new.purchase_date,
        storage_location: new.storage_location.unwrap_or_default(),
        notes: new.notes.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };
    let latest = repo::gold::latest_price(conn)?;
    let valued = valuation::value_asset(asset, latest.as_ref())?;
    repo::gold::insert_asset(conn, &valued.asset)?;
    tracing::info!(asset_id = %valued.asset.id, user_id = %caller.user_id, "gold asset created");
    Ok(valued)
}

pub fn list(conn: &Connection, caller: &Identity) -> AppResult<Vec<ValuedGoldAsset>> {
    let latest = repo::gold::latest_price(conn)?;
    let assets = repo::gold::list_assets_for_user(conn, caller.user_id)?;
    assets
        .into_iter()
        .map(|a| valuation::value_asset(a, latest.as_ref()))
        .collect()
}

pub fn get(conn: &Connection, caller: &Identity, id: Uuid) -> AppResult<ValuedGoldAsset> {
    let asset = authorize(repo::gold::get_asset(conn, id)?, caller)?;
    let latest = repo::gold::latest_price(conn)?;
    valuation::value_asset(asset, latest.as_ref())
}

pub fn delete(conn: &Connection, caller: &Identity, id: Uuid) -> AppResult<()> {
    let asset = authorize(repo::gold::get_asset(conn, id)?, caller)?;
    repo::gold::delete_asset(conn, asset.id)?;
    tracing::info!(asset_id = %asset.id, "gold asset deleted");
    Ok(())
}

pub fn summary(conn: &Connection, caller: &Identity) -> AppResult<GoldSummary> {
    let latest = repo::gold::latest_price(conn)?;
    let valued = list(conn, caller)?;
    valuation::summarize(&valued, latest.as_ref())
}

pub fn latest_price(conn: &Connection) -> AppResult<GoldPrice> {
    repo::gold::latest_price(conn)?.ok_or_else(|| AppError::not_found("Gold price"))
}

/// Out-of-range limits fall back to the default window.
pub fn history_limit(requested: Option<u32>) -> u32 {
    match requested {
        Some(n) if (1..=MAX_PRICE_HISTORY).contains(&n) => n,
        _ => DEFAULT_PRICE_HISTORY,
    }
}

pub fn price_history(conn: &Connection, limit: Option<u32>) -> AppResult<Vec<GoldPrice>> {
    repo::gold::price_history(conn, history_limit(limit))
}

/// Records today's price, replacing any price already set today.
pub fn set_today_price(
    conn: &Connection,
    caller: &Identity,
    price_per_gram: Decimal,
    source: Option<&str>,
) -> AppResult<GoldPrice> {
    require_admin(conn, caller)?;
    super::positive("price_per_gram", price_per_gram)?;
    let source = source
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("admin");
    let price = repo::gold::upsert_price(conn, Utc::now().date_naive(), price_per_gram, source)?;
    tracing::info!(price_date = %price.price_date, price = %price.price_per_gram, source, "gold price set");
    Ok(price)
}

/// Reads the price out of a provider response. The value may be a JSON
/// number or a numeric string.
pub fn extract_price(body: &Value, pointer: &str) -> AppResult<Decimal> {
    let raw = body.pointer(pointer).ok_or_else(|| {
        AppError::Validation(format!("Price field '{pointer}' missing from response"))
    })?;
    let price = match raw {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string())),
        Value::String(s) => Decimal::from_str(s.trim()),
        _ => {
            return Err(AppError::Validation(format!(
                "Price field '{pointer}' is not numeric"
            )));
        }
    }
    .map_err(|_| AppError::Validation(format!("Price field '{pointer}' is not numeric")))?;
    if price <= Decimal::ZERO {
        return Err(AppError::validation("Fetched price must be greater than 0"));
    }
    Ok(price)
}

fn config_str<'a>(api: &'a ApiConfiguration, key: &str) -> Option<&'a str> {
    api.config
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Pulls today's price from the named provider and stores it.
pub fn fetch_today_price(
    conn: &Connection,
    caller: &Identity,
    api_name: &str,
) -> AppResult<GoldPrice> {
    require_admin(conn, caller)?;
    let api = repo::api_configs::get_by_name(conn, api_name.trim())?
        .ok_or_else(|| AppError::not_found("API configuration"))?;
    if !api.is_active {
        return Err(AppError::Validation(format!(
            "API configuration '{}' is not active",
            api.api_name
        )));
    }
    let url = config_str(&api, "url").ok_or_else(|| {
        AppError::Validation(format!("API configuration '{}' has no url", api.api_name))
    })?;
    let pointer = config_str(&api, "price_field").unwrap_or(DEFAULT_PRICE_FIELD);
    let source = config_str(&api, "source").unwrap_or(api.api_name.as_str());

    let internal = |err: reqwest::Error| AppError::Internal(format!("price fetch failed: {err}"));
    let client = http_client().map_err(|err| AppError::Internal(err.to_string()))?;
    tracing::debug!(api = %api.api_name, url, "fetching gold price");
    let body: Value = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(internal)?
        .json()
        .map_err(internal)?;
    let price_per_gram = extract_price(&body, pointer)?;
    let price = repo::gold::upsert_price(conn, Utc::now().date_naive(), price_per_gram, source)?;
    tracing::info!(price_date = %price.price_date, price = %price.price_per_gram, source, "gold price fetched");
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn history_limit_falls_back() {
        assert_eq!(history_limit(None), 30);
        assert_eq!(history_limit(Some(0)), 30);
        assert_eq!(history_limit(Some(366)), 30);
        assert_eq!(history_limit(Some(365)), 365);
        assert_eq!(history_limit(Some(7)), 7);
    }

    #[test]
    fn extract_price_accepts_numbers_and_strings() {
        let body = json!({"data": {"buy": "1050000.50"}, "price_per_gram": 1000000});
        assert_eq!(extract_price(&body, "/price_per_gram").unwrap(), dec!(1000000));
        assert_eq!(extract_price(&body, "/data/buy").unwrap(), dec!(1050000.50));
    }

    #[test]
    fn extract_price_rejects_missing_or_bad_values() {
        let body = json!({"price_per_gram": -1, "name": "x", "flag": true});
        assert_eq!(extract_price(&body, "/missing").unwrap_err().kind(), "validation");
        assert_eq!(extract_price(&body, "/price_per_gram").unwrap_err().kind(), "validation");
        assert_eq!(extract_price(&body, "/name").unwrap_err().kind(), "validation");
        assert_eq!(extract_price(&body, "/flag").unwrap_err().kind(), "validation");
    }
}
