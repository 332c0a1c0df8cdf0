// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Utc;
use rusqlite::Connection;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::access::authorize;
use crate::auth::Identity;
use crate::config::DEFAULT_CURRENCY;
use crate::error::{AppError, AppResult};
use crate::models::{Account, AccountType};
use crate::repo;

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub r#type: AccountType,
    pub currency: Option<String>,
    pub parent_account_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub currency: Option<String>,
}

fn normalize_currency(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|c| !c.is_empty()) {
        Some(c) => c.to_ascii_uppercase(),
        None => DEFAULT_CURRENCY.to_string(),
    }
}

/// New accounts start at zero. A pocket must hang off a main account the
/// caller owns.
pub fn create(conn: &Connection, caller: &Identity, new: NewAccount) -> AppResult<Account> {
    let name = super::required("name", &new.name)?;
    if let Some(parent_id) = new.parent_account_id {
        let parent = authorize(repo::accounts::get(conn, parent_id)?, caller)?;
        if parent.parent_account_id.is_some() {
            return Err(AppError::validation(
                "A sub-account cannot have its own sub-accounts",
            ));
        }
    }
    let now = Utc::now();
    let account = Account {
        id: Uuid::new_v4(),
        user_id: caller.user_id,
        name,
        r#type: new.r#type,
        balance: Decimal::ZERO,
        currency: normalize_currency(new.currency.as_deref()),
        parent_account_id: new.parent_account_id,
        created_at: now,
        updated_at: now,
        sub_accounts: Vec::new(),
    };
    repo::accounts::insert(conn, &account)?;
    tracing::info!(account_id = %account.id, user_id = %caller.user_id, "account created");
    Ok(account)
}

/// Main accounts, each carrying its pockets.
pub fn list(conn: &Connection, caller: &Identity) -> AppResult<Vec<Account>> {
    repo::accounts::list_tree_for_user(conn, caller.user_id)
}

pub fn get(conn: &Connection, caller: &Identity, id: Uuid) -> AppResult<Account> {
    let mut account = authorize(repo::accounts::get(conn, id)?, caller)?;
    if account.parent_account_id.is_none() {
        account.sub_accounts = repo::accounts::list_children(conn, account.id)?;
    }
    Ok(account)
}

pub fn update(
    conn: &Connection,
    caller: &Identity,
    id: Uuid,
    changes: AccountChanges,
) -> AppResult<Account> {
    let mut account = authorize(repo::accounts::get(conn, id)?, caller)?;
    if let Some(name) = changes.name {
        account.name = super::required("name", &name)?;
    }
    if changes.currency.is_some() {
        account.currency = normalize_currency(changes.currency.as_deref());
    }
    account.updated_at = Utc::now();
    repo::accounts::update(conn, &account)?;
    Ok(account)
}

/// Removes the account and its pockets. Transactions posted against it stay.
pub fn delete(conn: &Connection, caller: &Identity, id: Uuid) -> AppResult<()> {
    let account = authorize(repo::accounts::get(conn, id)?, caller)?;
    repo::accounts::delete(conn, account.id)?;
    tracing::info!(account_id = %account.id, "account deleted");
    Ok(())
}
