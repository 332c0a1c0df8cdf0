// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::{caller, json};
use crate::config::Config;
use crate::services::stats;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    let who = caller(conn, cfg, m)?;
    let s = stats::dashboard(conn, &who)?;
    if maybe_print_json(json(m), &s)? {
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(
            &["Metric", "Value"],
            vec![
                vec!["Accounts".into(), s.total_accounts.to_string()],
                vec!["Total balance".into(), s.total_balance.round_dp(2).to_string()],
                vec!["Income".into(), s.total_income.round_dp(2).to_string()],
                vec!["Expense".into(), s.total_expense.round_dp(2).to_string()],
                vec!["Budgets".into(), s.total_budgets.to_string()],
                vec!["Credit cards".into(), s.total_credit_cards.to_string()],
            ],
        )
    );
    if !s.recent_transactions.is_empty() {
        let rows = s
            .recent_transactions
            .iter()
            .map(|t| {
                vec![
                    t.transaction_date.to_string(),
                    t.r#type.to_string(),
                    t.category.clone(),
                    t.amount.round_dp(2).to_string(),
                ]
            })
            .collect();
        println!("Recent");
        println!(
            "{}",
            pretty_table(&["Date", "Type", "Category", "Amount"], rows)
        );
    }
    Ok(())
}
