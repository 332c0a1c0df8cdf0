// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! User management and provider configuration. Every operation except
//! [`grant_admin`] requires an admin caller.

use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

use crate::access::require_admin;
use crate::auth::Identity;
use crate::error::{AppError, AppResult};
use crate::models::{ApiConfiguration, ConfigMap, GoldPrice, User};
use crate::repo;

#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub full_name: Option<String>,
    pub is_admin: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewApiConfiguration {
    pub api_name: String,
    pub api_type: String,
    pub config: ConfigMap,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ApiChanges {
    pub config: Option<ConfigMap>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemStats {
    pub total_users: i64,
    pub total_admins: i64,
    pub total_gold_prices: i64,
    pub latest_gold_price: Option<GoldPrice>,
    pub total_api_configs: usize,
    pub active_api_configs: usize,
}

pub fn list_users(conn: &Connection, caller: &Identity) -> AppResult<Vec<User>> {
    require_admin(conn, caller)?;
    repo::users::list(conn)
}

pub fn get_user(conn: &Connection, caller: &Identity, id: Uuid) -> AppResult<User> {
    require_admin(conn, caller)?;
    repo::users::get(conn, id)?.ok_or_else(|| AppError::not_found("User"))
}

pub fn update_user(
    conn: &Connection,
    caller: &Identity,
    id: Uuid,
    changes: UserChanges,
) -> AppResult<User> {
    require_admin(conn, caller)?;
    let mut user = repo::users::get(conn, id)?.ok_or_else(|| AppError::not_found("User"))?;
    if let Some(name) = changes.full_name {
        user.full_name = super::required("full_name", &name)?;
    }
    if let Some(flag) = changes.is_admin {
        user.is_admin = flag;
    }
    user.updated_at = Utc::now();
    repo::users::update(conn, &user)?;
    tracing::info!(user_id = %user.id, admin = %caller.user_id, "user updated");
    Ok(user)
}

/// Deletes a user and everything they own. Admins cannot delete themselves
/// this way.
pub fn delete_user(conn: &Connection, caller: &Identity, id: Uuid) -> AppResult<()> {
    require_admin(conn, caller)?;
    if id == caller.user_id {
        return Err(AppError::validation("cannot delete your own account"));
    }
    if !repo::users::delete(conn, id)? {
        return Err(AppError::not_found("User"));
    }
    tracing::info!(user_id = %id, admin = %caller.user_id, "user deleted");
    Ok(())
}

pub fn list_apis(conn: &Connection, caller: &Identity) -> AppResult<Vec<ApiConfiguration>> {
    require_admin(conn, caller)?;
    repo::api_configs::list(conn)
}

pub fn get_api(conn: &Connection, caller: &Identity, id: Uuid) -> AppResult<ApiConfiguration> {
    require_admin(conn, caller)?;
    repo::api_configs::get(conn, id)?.ok_or_else(|| AppError::not_found("API configuration"))
}

pub fn create_api(
    conn: &Connection,
    caller: &Identity,
    new: NewApiConfiguration,
) -> AppResult<ApiConfiguration> {
    require_admin(conn, caller)?;
    let now = Utc::now();
    let api = ApiConfiguration {
        id: Uuid::new_v4(),
        api_name: super::required("api_name", &new.api_name)?,
        api_type: super::required("api_type", &new.api_type)?,
        config: new.config,
        is_active: new.is_active,
        created_at: now,
        updated_at: now,
    };
    repo::api_configs::insert(conn, &api)?;
    tracing::info!(api = %api.api_name, "api configuration created");
    Ok(api)
}

pub fn update_api(
    conn: &Connection,
    caller: &Identity,
    id: Uuid,
    changes: ApiChanges,
) -> AppResult<ApiConfiguration> {
    require_admin(conn, caller)?;
    let mut api =
        repo::api_configs::get(conn, id)?.ok_or_else(|| AppError::not_found("API configuration"))?;
    if let Some(config) = changes.config {
        api.config = config;
    }
    if let Some(active) = changes.is_active {
        api.is_active = active;
    }
    api.updated_at = Utc::now();
    repo::api_configs::update(conn, &api)?;
    tracing::info!(api = %api.api_name, active = api.is_active, "api configuration updated");
    Ok(api)
}

pub fn system_stats(conn: &Connection, caller: &Identity) -> AppResult<SystemStats> {
    require_admin(conn, caller)?;
    let (total_users, total_admins) = repo::users::count(conn)?;
    let apis = repo::api_configs::list(conn)?;
    Ok(SystemStats {
        total_users,
        total_admins,
        total_gold_prices: repo::gold::count_prices(conn)?,
        latest_gold_price: repo::gold::latest_price(conn)?,
        active_api_configs: apis.iter().filter(|a| a.is_active).count(),
        total_api_configs: apis.len(),
    })
}

/// Local bootstrap: promotes an existing user by email or username.
pub fn grant_admin(conn: &Connection, login: &str) -> AppResult<User> {
    let mut user = repo::users::get_by_email_or_username(conn, login.trim())?
        .ok_or_else(|| AppError::not_found("User"))?;
    repo::users::set_admin(conn, user.id, true)?;
    user.is_admin = true;
    tracing::info!(user_id = %user.id, "admin granted");
    Ok(user)
}
