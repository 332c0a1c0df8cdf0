// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::{caller, copied, id, json, req};
use crate::config::Config;
use crate::models::Budget;
use crate::services::budgets::{self, NewBudget, Period};
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};

fn print_budgets(list: &[Budget]) {
    let rows = list
        .iter()
        .map(|b| {
            vec![
                b.id.to_string(),
                format!("{}-{:02}", b.budget_year, b.budget_month),
                b.category.clone(),
                b.amount.round_dp(2).to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Month", "Category", "Amount"], rows)
    );
}

pub fn handle(conn: &mut Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let new = NewBudget {
                category: req(sub, "category")?.to_string(),
                amount: parse_decimal(req(sub, "amount")?)?,
                month: copied(sub, "month")?,
                year: copied(sub, "year")?,
            };
            let b = budgets::create(conn, &who, new)?;
            if !maybe_print_json(json(sub), &b)? {
                println!(
                    "Budget set: {} {}-{:02} = {}",
                    b.category, b.budget_year, b.budget_month, b.amount
                );
            }
        }
        Some(("list", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let period = match (sub.get_one::<u32>("month"), sub.get_one::<i32>("year")) {
                (Some(month), Some(year)) => Some(Period {
                    month: *month,
                    year: *year,
                }),
                _ => None,
            };
            let list = budgets::list(conn, &who, period)?;
            if !maybe_print_json(json(sub), &list)? {
                print_budgets(&list);
            }
        }
        Some(("show", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let b = budgets::get(conn, &who, id(sub)?)?;
            if !maybe_print_json(json(sub), &b)? {
                print_budgets(std::slice::from_ref(&b));
            }
        }
        Some(("rm", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let budget_id = id(sub)?;
            budgets::delete(conn, &who, budget_id)?;
            println!("Deleted budget {}", budget_id);
        }
        Some(("copy", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let from = Period {
                month: copied(sub, "from-month")?,
                year: copied(sub, "from-year")?,
            };
            let to = Period {
                month: copied(sub, "to-month")?,
                year: copied(sub, "to-year")?,
            };
            let n = budgets::copy_from_month(conn, &who, from, to)?;
            if !maybe_print_json(json(sub), &serde_json::json!({ "copied_count": n }))? {
                println!(
                    "Copied {} budgets from {}-{:02} to {}-{:02}",
                    n, from.year, from.month, to.year, to.month
                );
            }
        }
        _ => {}
    }
    Ok(())
}
