// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fintrack::config::Config;
use fintrack::models::TransactionType;
use fintrack::services::identity::{self, Registration};
use fintrack::services::transactions::{self, NewTransaction};
use fintrack::services::{accounts, accounts::NewAccount};
use fintrack::{auth::Identity, cli, commands, db};
use rusqlite::Connection;
use rust_decimal_macros::dec;
use tempfile::tempdir;

fn setup() -> (Connection, Config, String) {
    let mut conn = db::open_in_memory().unwrap();
    let cfg = Config {
        db_path: ":memory:".into(),
        token_secret: Some("export-tests".into()),
        token: None,
        log_filter: None,
    };
    let user = identity::register(
        &conn,
        &Registration {
            email: "a@example.com".into(),
            username: "alice".into(),
            password: "secret123".into(),
            full_name: "Alice".into(),
        },
    )
    .unwrap();
    let me = Identity {
        user_id: user.id,
        email: user.email.clone(),
    };
    let acct = accounts::create(
        &conn,
        &me,
        NewAccount {
            name: "Main".into(),
            r#type: fintrack::models::AccountType::Cash,
            currency: None,
            parent_account_id: None,
        },
    )
    .unwrap();
    transactions::create(
        &mut conn,
        &me,
        NewTransaction {
            account_id: Some(acct.id),
            credit_card_id: None,
            r#type: TransactionType::Expense,
            category: "Groceries".into(),
            amount: dec!(12.34),
            description: Some("Weekly, run".into()),
            transaction_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 2),
        },
    )
    .unwrap();
    let keys = cfg.token_keys(&conn).unwrap();
    let session = identity::login(&conn, &keys, "alice", "secret123").unwrap();
    (conn, cfg, session.token)
}

fn run_export(format: &str, file: &str) -> String {
    let (mut conn, cfg, token) = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join(file);
    let out_str = out.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "fintrack",
        "tx",
        "export",
        "--format",
        format,
        "--out",
        out_str.as_str(),
        "--token",
        token.as_str(),
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    commands::transactions::handle(&mut conn, &cfg, tx_m).unwrap();
    std::fs::read_to_string(out).unwrap()
}

#[test]
fn export_writes_csv_with_header() {
    let contents = run_export("csv", "tx.csv");
    let mut lines = contents.lines();
    assert_eq!(
        lines.next().unwrap(),
        "date,type,category,amount,target,target_id,description,id"
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("2025-01-02,expense,Groceries,12.34,account,"));
    assert!(row.contains("\"Weekly, run\""));
}

#[test]
fn export_writes_pretty_json() {
    let contents = run_export("JSON", "tx.json");
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["category"], "Groceries");
    assert_eq!(items[0]["amount"], "12.34");
    assert_eq!(items[0]["target"], "account");
    assert!(contents.contains("\n  "));
}

#[test]
fn private_commands_need_a_token() {
    let (mut conn, cfg, _) = setup();
    let matches = cli::build_cli().get_matches_from(["fintrack", "tx", "summary"]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let err = commands::transactions::handle(&mut conn, &cfg, tx_m).unwrap_err();
    let app = err.downcast_ref::<fintrack::error::AppError>().unwrap();
    assert_eq!(app.kind(), "unauthorized");
}
