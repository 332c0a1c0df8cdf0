// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;

use super::{caller, exporter, id, json, opt, opt_uuid, req};
use crate::config::Config;
use crate::models::{Target, Transaction, TransactionType};
use crate::services::transactions::{self, NewTransaction, Page, TransactionChanges};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};

fn print_transactions(txs: &[Transaction]) {
    let rows = txs
        .iter()
        .map(|t| {
            let target = match t.target {
                Target::Account(id) => format!("account {id}"),
                Target::CreditCard(id) => format!("card {id}"),
            };
            vec![
                t.id.to_string(),
                t.transaction_date.to_string(),
                t.r#type.to_string(),
                t.category.clone(),
                t.amount.round_dp(2).to_string(),
                target,
                t.description.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Type", "Category", "Amount", "Target", "Description"],
            rows
        )
    );
}

pub fn handle(conn: &mut Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let new = NewTransaction {
                account_id: opt_uuid(sub, "account")?,
                credit_card_id: opt_uuid(sub, "card")?,
                r#type: req(sub, "type")?.parse::<TransactionType>()?,
                category: req(sub, "category")?.to_string(),
                amount: parse_decimal(req(sub, "amount")?)?,
                description: opt(sub, "description").map(str::to_string),
                transaction_date: opt(sub, "date").map(parse_date).transpose()?,
            };
            let tx = transactions::create(conn, &who, new)?;
            if !maybe_print_json(json(sub), &tx)? {
                println!(
                    "Recorded {} {} ({}) {}",
                    tx.r#type, tx.amount, tx.category, tx.id
                );
            }
        }
        Some(("list", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let mut page = Page::default();
            if let Some(limit) = sub.get_one::<u32>("limit") {
                page.limit = *limit;
            }
            if let Some(offset) = sub.get_one::<u32>("offset") {
                page.offset = *offset;
            }
            let list = transactions::list(conn, &who, page)?;
            if !maybe_print_json(json(sub), &list)? {
                print_transactions(&list);
            }
        }
        Some(("show", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let tx = transactions::get(conn, &who, id(sub)?)?;
            if !maybe_print_json(json(sub), &tx)? {
                print_transactions(std::slice::from_ref(&tx));
            }
        }
        Some(("edit", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let changes = TransactionChanges {
                account_id: opt_uuid(sub, "account")?,
                credit_card_id: opt_uuid(sub, "card")?,
                r#type: opt(sub, "type")
                    .map(str::parse::<TransactionType>)
                    .transpose()?,
                category: opt(sub, "category").map(str::to_string),
                amount: opt(sub, "amount").map(parse_decimal).transpose()?,
                description: opt(sub, "description").map(str::to_string),
                transaction_date: opt(sub, "date").map(parse_date).transpose()?,
            };
            let tx = transactions::update(conn, &who, id(sub)?, changes)?;
            if !maybe_print_json(json(sub), &tx)? {
                println!("Updated transaction {}", tx.id);
            }
        }
        Some(("rm", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let tx_id = id(sub)?;
            transactions::delete(conn, &who, tx_id)?;
            println!("Deleted transaction {}", tx_id);
        }
        Some(("summary", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let s = transactions::summary(conn, &who)?;
            if !maybe_print_json(json(sub), &s)? {
                println!(
                    "{}",
                    pretty_table(
                        &["Income", "Expense", "Net"],
                        vec![vec![
                            s.total_income.round_dp(2).to_string(),
                            s.total_expense.round_dp(2).to_string(),
                            s.balance.round_dp(2).to_string(),
                        ]],
                    )
                );
            }
        }
        Some(("export", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let out = req(sub, "out")?;
            let all = transactions::list_all(conn, &who)?;
            let n = exporter::write_transactions(&all, req(sub, "format")?, Path::new(out))?;
            println!("Exported {} transactions to {}", n, out);
        }
        _ => {}
    }
    Ok(())
}

