// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::{caller, json, req, yes_no};
use crate::config::Config;
use crate::models::User;
use crate::services::identity::{self, Registration};
use crate::utils::{maybe_print_json, pretty_table};

pub(crate) fn print_users(users: &[User]) {
    let rows = users
        .iter()
        .map(|u| {
            vec![
                u.id.to_string(),
                u.email.clone(),
                u.username.clone().unwrap_or_default(),
                u.full_name.clone(),
                yes_no(u.is_admin),
                u.created_at.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Email", "Username", "Full name", "Admin", "Created"],
            rows
        )
    );
}

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("register", sub)) => {
            let reg = Registration {
                email: req(sub, "email")?.to_string(),
                username: req(sub, "username")?.to_string(),
                password: req(sub, "password")?.to_string(),
                full_name: req(sub, "full-name")?.to_string(),
            };
            let user = identity::register(conn, &reg)?;
            if !maybe_print_json(json(sub), &user)? {
                println!("Registered {} ({})", user.email, user.id);
            }
        }
        Some(("login", sub)) => {
            let keys = cfg.token_keys(conn)?;
            let session =
                identity::login(conn, &keys, req(sub, "login")?, req(sub, "password")?)?;
            if !maybe_print_json(json(sub), &session)? {
                println!("{}", session.token);
                eprintln!(
                    "Logged in as {}. Export FINTRACK_TOKEN or pass --token.",
                    session.user.email
                );
            }
        }
        Some(("me", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let user = identity::me(conn, &who)?;
            if !maybe_print_json(json(sub), &user)? {
                print_users(std::slice::from_ref(&user));
            }
        }
        _ => {}
    }
    Ok(())
}
