// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::{caller, id, json, opt, opt_uuid, req};
use crate::config::Config;
use crate::models::{Account, AccountType};
use crate::services::accounts::{self, AccountChanges, NewAccount};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

fn row(a: &Account, indent: &str) -> Vec<String> {
    vec![
        a.id.to_string(),
        format!("{indent}{}", a.name),
        a.r#type.to_string(),
        fmt_money(&a.balance, &a.currency),
        a.created_at.format("%Y-%m-%d").to_string(),
    ]
}

fn print_tree(accounts: &[Account]) {
    let mut data = Vec::new();
    for a in accounts {
        data.push(row(a, ""));
        for sub in &a.sub_accounts {
            data.push(row(sub, "  └ "));
        }
    }
    println!(
        "{}",
        pretty_table(&["ID", "Name", "Type", "Balance", "Created"], data)
    );
}

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let new = NewAccount {
                name: req(sub, "name")?.to_string(),
                r#type: req(sub, "type")?.parse::<AccountType>()?,
                currency: opt(sub, "currency").map(str::to_string),
                parent_account_id: opt_uuid(sub, "parent")?,
            };
            let account = accounts::create(conn, &who, new)?;
            if !maybe_print_json(json(sub), &account)? {
                println!(
                    "Added account '{}' ({}, {}) {}",
                    account.name, account.r#type, account.currency, account.id
                );
            }
        }
        Some(("list", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let list = accounts::list(conn, &who)?;
            if !maybe_print_json(json(sub), &list)? {
                print_tree(&list);
            }
        }
        Some(("show", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let account = accounts::get(conn, &who, id(sub)?)?;
            if !maybe_print_json(json(sub), &account)? {
                print_tree(std::slice::from_ref(&account));
            }
        }
        Some(("edit", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let changes = AccountChanges {
                name: opt(sub, "name").map(str::to_string),
                currency: opt(sub, "currency").map(str::to_string),
            };
            let account = accounts::update(conn, &who, id(sub)?, changes)?;
            if !maybe_print_json(json(sub), &account)? {
                println!("Updated account '{}'", account.name);
            }
        }
        Some(("rm", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let account_id = id(sub)?;
            accounts::delete(conn, &who, account_id)?;
            println!("Removed account {}", account_id);
        }
        _ => {}
    }
    Ok(())
}
