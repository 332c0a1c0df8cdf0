// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::auth::print_users;
use super::{caller, id, json, opt, req, yes_no};
use crate::config::Config;
use crate::models::{ApiConfiguration, ConfigMap};
use crate::services::admin::{self, ApiChanges, NewApiConfiguration, UserChanges};
use crate::utils::{maybe_print_json, pretty_table};

fn parse_config(raw: &str) -> Result<ConfigMap> {
    serde_json::from_str::<ConfigMap>(raw).context("--config must be a JSON object")
}

fn print_apis(list: &[ApiConfiguration]) {
    let rows = list
        .iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                a.api_name.clone(),
                a.api_type.clone(),
                yes_no(a.is_active),
                serde_json::Value::Object(a.config.clone()).to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Name", "Type", "Active", "Config"], rows)
    );
}

fn handle_users(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let users = admin::list_users(conn, &who)?;
            if !maybe_print_json(json(sub), &users)? {
                print_users(&users);
            }
        }
        Some(("show", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let user = admin::get_user(conn, &who, id(sub)?)?;
            if !maybe_print_json(json(sub), &user)? {
                print_users(std::slice::from_ref(&user));
            }
        }
        Some(("edit", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let changes = UserChanges {
                full_name: opt(sub, "full-name").map(str::to_string),
                is_admin: sub.get_one::<bool>("admin").copied(),
            };
            let user = admin::update_user(conn, &who, id(sub)?, changes)?;
            if !maybe_print_json(json(sub), &user)? {
                println!("Updated user {}", user.email);
            }
        }
        Some(("rm", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let user_id = id(sub)?;
            admin::delete_user(conn, &who, user_id)?;
            println!("Deleted user {}", user_id);
        }
        _ => {}
    }
    Ok(())
}

fn handle_apis(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let apis = admin::list_apis(conn, &who)?;
            if !maybe_print_json(json(sub), &apis)? {
                print_apis(&apis);
            }
        }
        Some(("show", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let api = admin::get_api(conn, &who, id(sub)?)?;
            if !maybe_print_json(json(sub), &api)? {
                print_apis(std::slice::from_ref(&api));
            }
        }
        Some(("add", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let new = NewApiConfiguration {
                api_name: req(sub, "name")?.to_string(),
                api_type: req(sub, "type")?.to_string(),
                config: opt(sub, "config")
                    .map(parse_config)
                    .transpose()?
                    .unwrap_or_default(),
                is_active: sub.get_flag("active"),
            };
            let api = admin::create_api(conn, &who, new)?;
            if !maybe_print_json(json(sub), &api)? {
                println!("Added API configuration '{}' {}", api.api_name, api.id);
            }
        }
        Some(("set", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let changes = ApiChanges {
                config: opt(sub, "config").map(parse_config).transpose()?,
                is_active: sub.get_one::<bool>("active").copied(),
            };
            let api = admin::update_api(conn, &who, id(sub)?, changes)?;
            if !maybe_print_json(json(sub), &api)? {
                println!(
                    "Updated API configuration '{}' (active: {})",
                    api.api_name,
                    yes_no(api.is_active)
                );
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("user", sub)) => handle_users(conn, cfg, sub)?,
        Some(("api", sub)) => handle_apis(conn, cfg, sub)?,
        Some(("stats", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let s = admin::system_stats(conn, &who)?;
            if !maybe_print_json(json(sub), &s)? {
                let latest = s
                    .latest_gold_price
                    .as_ref()
                    .map(|p| format!("{} ({})", p.price_per_gram.round_dp(2), p.price_date))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{}",
                    pretty_table(
                        &["Metric", "Value"],
                        vec![
                            vec!["Users".into(), s.total_users.to_string()],
                            vec!["Admins".into(), s.total_admins.to_string()],
                            vec!["Gold prices".into(), s.total_gold_prices.to_string()],
                            vec!["Latest gold price".into(), latest],
                            vec![
                                "API configurations".into(),
                                format!("{} ({} active)", s.total_api_configs, s.active_api_configs),
                            ],
                        ],
                    )
                );
            }
        }
        _ => {}
    }
    Ok(())
}
