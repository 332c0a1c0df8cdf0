// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod admin;
pub mod auth;
pub mod budgets;
pub mod cards;
pub mod exporter;
pub mod gold;
pub mod stats;
pub mod transactions;

use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::auth::Identity;
use crate::config::Config;
use crate::error::AppError;
use crate::utils::{parse_decimal, parse_uuid};

/// Verifies the bearer token given with `--token` or `FINTRACK_TOKEN`.
pub fn caller(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<Identity> {
    let token = m
        .get_one::<String>("token")
        .cloned()
        .or_else(|| cfg.token.clone())
        .ok_or_else(|| AppError::Unauthorized("Authorization token required".into()))?;
    let keys = cfg.token_keys(conn)?;
    Ok(keys.verify(&token)?)
}

pub(crate) fn req<'a>(m: &'a clap::ArgMatches, id: &str) -> Result<&'a str> {
    m.get_one::<String>(id)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing required argument --{id}"))
}

pub(crate) fn opt<'a>(m: &'a clap::ArgMatches, id: &str) -> Option<&'a str> {
    m.get_one::<String>(id).map(String::as_str)
}

pub(crate) fn id(m: &clap::ArgMatches) -> Result<Uuid> {
    parse_uuid(req(m, "id")?)
}

pub(crate) fn opt_uuid(m: &clap::ArgMatches, id: &str) -> Result<Option<Uuid>> {
    opt(m, id).map(parse_uuid).transpose()
}

pub(crate) fn opt_decimal(m: &clap::ArgMatches, id: &str) -> Result<Option<Decimal>> {
    opt(m, id).map(parse_decimal).transpose()
}

pub(crate) fn copied<T: Copy + Send + Sync + 'static>(m: &clap::ArgMatches, id: &str) -> Result<T> {
    m.get_one::<T>(id)
        .copied()
        .with_context(|| format!("missing required argument --{id}"))
}

pub(crate) fn json(m: &clap::ArgMatches) -> bool {
    m.get_flag("json")
}

pub(crate) fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}
