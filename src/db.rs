// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::fs;
use std::path::Path;

use crate::config::Config;

pub fn open_or_init(cfg: &Config) -> Result<Connection> {
    let path = &cfg.db_path;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data dir {}", dir.display()))?;
    }
    open_at(path)
}

pub fn open_at(path: &Path) -> Result<Connection> {
    let mut conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    conn.busy_timeout(std::time::Duration::from_secs(5))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let mut conn = Connection::open_in_memory()?;
    init_schema(&mut conn)?;
    Ok(conn)
}

fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS users(
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        username TEXT UNIQUE,
        password_hash TEXT NOT NULL,
        full_name TEXT NOT NULL,
        is_admin INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS accounts(
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('bank','wallet','cash','paylater')),
        balance TEXT NOT NULL DEFAULT '0',
        currency TEXT NOT NULL,
        parent_account_id TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY(parent_account_id) REFERENCES accounts(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_accounts_user ON accounts(user_id);

    CREATE TABLE IF NOT EXISTS credit_cards(
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        card_name TEXT NOT NULL,
        last_four_digits TEXT NOT NULL,
        credit_limit TEXT NOT NULL,
        current_balance TEXT NOT NULL DEFAULT '0',
        billing_date INTEGER NOT NULL CHECK(billing_date BETWEEN 1 AND 31),
        payment_due_date INTEGER NOT NULL CHECK(payment_due_date BETWEEN 1 AND 31),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_credit_cards_user ON credit_cards(user_id);

    -- account_id / credit_card_id carry no foreign key: deleting an account
    -- or card leaves its transactions in place.
    CREATE TABLE IF NOT EXISTS transactions(
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        account_id TEXT,
        credit_card_id TEXT,
        type TEXT NOT NULL CHECK(type IN ('income','expense','transfer')),
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        transaction_date TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        CHECK((account_id IS NULL) <> (credit_card_id IS NULL)),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_user_date
        ON transactions(user_id, transaction_date);

    CREATE TABLE IF NOT EXISTS budgets(
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        budget_month INTEGER NOT NULL CHECK(budget_month BETWEEN 1 AND 12),
        budget_year INTEGER NOT NULL CHECK(budget_year >= 2020),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE(user_id, category, budget_month, budget_year),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS gold_assets(
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        gold_type TEXT NOT NULL CHECK(gold_type IN ('antam','ubs','galeri24','pegadaian','other')),
        weight_gram TEXT NOT NULL,
        purchase_price_per_gram TEXT NOT NULL,
        purchase_date TEXT NOT NULL,
        storage_location TEXT NOT NULL DEFAULT '',
        notes TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS gold_prices(
        id TEXT PRIMARY KEY,
        price_date TEXT NOT NULL UNIQUE,
        price_per_gram TEXT NOT NULL,
        source TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS api_configurations(
        id TEXT PRIMARY KEY,
        api_name TEXT NOT NULL UNIQUE,
        api_type TEXT NOT NULL,
        config TEXT NOT NULL DEFAULT '{}',
        is_active INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fintrack.sqlite");
        drop(open_at(&path).unwrap());
        let conn = open_at(&path).unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN
                 ('users','accounts','credit_cards','transactions','budgets','gold_assets','gold_prices','api_configurations','settings')",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(tables, 9);
    }

    #[test]
    fn transaction_rows_need_exactly_one_target() {
        let conn = open_in_memory().unwrap();
        conn.execute(
            "INSERT INTO users(id,email,password_hash,full_name,created_at,updated_at)
             VALUES ('u1','u@x.io','h','U','2025-01-01','2025-01-01')",
            [],
        )
        .unwrap();
        let both = conn.execute(
            "INSERT INTO transactions(id,user_id,account_id,credit_card_id,type,category,amount,transaction_date,created_at,updated_at)
             VALUES ('t1','u1','a','c','expense','Food','1','2025-01-01','x','x')",
            [],
        );
        assert!(both.is_err());
        let neither = conn.execute(
            "INSERT INTO transactions(id,user_id,type,category,amount,transaction_date,created_at,updated_at)
             VALUES ('t2','u1','expense','Food','1','2025-01-01','x','x')",
            [],
        );
        assert!(neither.is_err());
    }
}
