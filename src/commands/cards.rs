// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::{caller, copied, id, json, opt_decimal, req};
use crate::config::Config;
use crate::models::CreditCard;
use crate::services::credit_cards::{self, NewCreditCard};
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};

fn print_cards(list: &[CreditCard]) {
    let rows = list
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.card_name.clone(),
                format!("**** {}", c.last_four_digits),
                c.credit_limit.round_dp(2).to_string(),
                c.current_balance.round_dp(2).to_string(),
                c.billing_date.to_string(),
                c.payment_due_date.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Card", "Number", "Limit", "Balance", "Billing", "Due"],
            rows
        )
    );
}

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let new = NewCreditCard {
                card_name: req(sub, "name")?.to_string(),
                last_four_digits: req(sub, "last-four")?.to_string(),
                credit_limit: parse_decimal(req(sub, "limit")?)?,
                current_balance: opt_decimal(sub, "balance")?,
                billing_date: copied(sub, "billing-day")?,
                payment_due_date: copied(sub, "due-day")?,
            };
            let card = credit_cards::create(conn, &who, new)?;
            if !maybe_print_json(json(sub), &card)? {
                println!("Added card '{}' {}", card.card_name, card.id);
            }
        }
        Some(("list", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let list = credit_cards::list(conn, &who)?;
            if !maybe_print_json(json(sub), &list)? {
                print_cards(&list);
            }
        }
        Some(("show", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let card = credit_cards::get(conn, &who, id(sub)?)?;
            if !maybe_print_json(json(sub), &card)? {
                print_cards(std::slice::from_ref(&card));
            }
        }
        Some(("rm", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let card_id = id(sub)?;
            credit_cards::delete(conn, &who, card_id)?;
            println!("Removed card {}", card_id);
        }
        _ => {}
    }
    Ok(())
}
