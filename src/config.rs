// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rand::RngCore;
use rand::rngs::OsRng;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::path::PathBuf;

use crate::auth::TokenKeys;
use crate::utils::{get_setting, set_setting};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.fintrack", "Fintrack", "fintrack"));

pub const TOKEN_TTL_DAYS: i64 = 7;
pub const DEFAULT_CURRENCY: &str = "IDR";
pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const DEFAULT_PRICE_HISTORY: u32 = 30;
pub const MAX_PRICE_HISTORY: u32 = 365;

const TOKEN_SECRET_KEY: &str = "token_secret";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub token_secret: Option<String>,
    pub token: Option<String>,
    pub log_filter: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, falling back to platform defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let db_path = match non_empty("FINTRACK_DB") {
            Some(p) => PathBuf::from(p),
            None => default_db_path()?,
        };
        Ok(Config {
            db_path,
            token_secret: non_empty("FINTRACK_TOKEN_SECRET"),
            token: non_empty("FINTRACK_TOKEN"),
            log_filter: non_empty("FINTRACK_LOG"),
        })
    }

    /// Signing keys for session tokens. Without an explicit secret, one is
    /// generated on first use and kept in the settings table.
    pub fn token_keys(&self, conn: &Connection) -> Result<TokenKeys> {
        if let Some(secret) = &self.token_secret {
            return Ok(TokenKeys::new(secret.as_bytes()));
        }
        if let Some(stored) = get_setting(conn, TOKEN_SECRET_KEY)? {
            let bytes = hex::decode(&stored).context("Stored token secret is not valid hex")?;
            return Ok(TokenKeys::new(&bytes));
        }
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        set_setting(conn, TOKEN_SECRET_KEY, &hex::encode(bytes))?;
        tracing::info!("generated new token signing secret");
        Ok(TokenKeys::new(&bytes))
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    Ok(proj.data_dir().join("fintrack.sqlite"))
}

pub fn token_ttl() -> chrono::Duration {
    chrono::Duration::days(TOKEN_TTL_DAYS)
}
