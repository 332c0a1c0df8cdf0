// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transaction lifecycle. Every mutation runs in one immediate SQLite
//! transaction covering the row write and both balance adjustments.

use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, TransactionBehavior};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::access::authorize;
use crate::auth::Identity;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::{AppError, AppResult};
use crate::ledger;
use crate::models::{Target, Transaction, TransactionSummary, TransactionType};
use crate::repo;

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: Option<Uuid>,
    pub credit_card_id: Option<Uuid>,
    pub r#type: TransactionType,
    pub category: String,
    pub amount: Decimal,
    pub description: Option<String>,
    pub transaction_date: Option<NaiveDate>,
}

/// Fields left as `None` keep their stored value. Supplying one of the two
/// target ids moves the transaction there.
#[derive(Debug, Clone, Default)]
pub struct TransactionChanges {
    pub account_id: Option<Uuid>,
    pub credit_card_id: Option<Uuid>,
    pub r#type: Option<TransactionType>,
    pub category: Option<String>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub transaction_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// The target must exist and belong to the caller.
fn check_target(conn: &Connection, caller: &Identity, target: &Target) -> AppResult<()> {
    match target {
        Target::Account(id) => {
            authorize(repo::accounts::get(conn, *id)?, caller)?;
        }
        Target::CreditCard(id) => {
            authorize(repo::credit_cards::get(conn, *id)?, caller)?;
        }
    }
    Ok(())
}

pub fn create(
    conn: &mut Connection,
    caller: &Identity,
    new: NewTransaction,
) -> AppResult<Transaction> {
    let target = Target::from_parts(new.account_id, new.credit_card_id)?;
    super::positive("amount", new.amount)?;
    let category = super::required("category", &new.category)?;

    let db = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    check_target(&db, caller, &target)?;
    let now = Utc::now();
    let tx = Transaction {
        id: Uuid::new_v4(),
        user_id: caller.user_id,
        target,
        r#type: new.r#type,
        category,
        amount: new.amount,
        description: new.description.unwrap_or_default(),
        transaction_date: new.transaction_date.unwrap_or_else(|| now.date_naive()),
        created_at: now,
        updated_at: now,
    };
    repo::transactions::insert(&db, &tx)?;
    ledger::apply(&db, tx.r#type, tx.amount, &tx.target)?;
    db.commit()?;
    tracing::info!(transaction_id = %tx.id, user_id = %caller.user_id, "transaction created");
    Ok(tx)
}

pub fn list(conn: &Connection, caller: &Identity, page: Page) -> AppResult<Vec<Transaction>> {
    repo::transactions::list_for_user(conn, caller.user_id, page.limit, page.offset)
}

/// The caller's whole history, oldest first.
pub fn list_all(conn: &Connection, caller: &Identity) -> AppResult<Vec<Transaction>> {
    repo::transactions::list_all_for_user(conn, caller.user_id)
}

pub fn get(conn: &Connection, caller: &Identity, id: Uuid) -> AppResult<Transaction> {
    authorize(repo::transactions::get(conn, id)?, caller)
}

pub fn update(
    conn: &mut Connection,
    caller: &Identity,
    id: Uuid,
    changes: TransactionChanges,
) -> AppResult<Transaction> {
    let new_target = match (changes.account_id, changes.credit_card_id) {
        (None, None) => None,
        (a, c) => Some(Target::from_parts(a, c)?),
    };
    if let Some(amount) = changes.amount {
        super::positive("amount", amount)?;
    }
    let category = changes
        .category
        .as_deref()
        .map(|c| super::required("category", c))
        .transpose()?;

    let db = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let prior = authorize(repo::transactions::get(&db, id)?, caller)?;
    if let Some(target) = &new_target {
        check_target(&db, caller, target)?;
    }

    let moved = new_target.is_some();
    let mut tx = prior.clone();
    if let Some(target) = new_target {
        tx.target = target;
    }
    if let Some(kind) = changes.r#type {
        tx.r#type = kind;
    }
    if let Some(category) = category {
        tx.category = category;
    }
    if let Some(amount) = changes.amount {
        tx.amount = amount;
    }
    if let Some(description) = changes.description {
        tx.description = description;
    }
    if let Some(date) = changes.transaction_date {
        tx.transaction_date = date;
    }
    tx.updated_at = Utc::now();

    ledger::reverse(&db, prior.r#type, prior.amount, &prior.target)?;
    if moved {
        ledger::apply(&db, tx.r#type, tx.amount, &tx.target)?;
    } else {
        ledger::reapply(&db, tx.r#type, tx.amount, &tx.target)?;
    }
    repo::transactions::update(&db, &tx)?;
    db.commit()?;
    tracing::info!(transaction_id = %tx.id, "transaction updated");
    Ok(tx)
}

pub fn delete(conn: &mut Connection, caller: &Identity, id: Uuid) -> AppResult<()> {
    let db = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let tx = authorize(repo::transactions::get(&db, id)?, caller)?;
    ledger::reverse(&db, tx.r#type, tx.amount, &tx.target)?;
    if !repo::transactions::delete(&db, tx.id)? {
        return Err(AppError::not_found("Transaction"));
    }
    db.commit()?;
    tracing::info!(transaction_id = %tx.id, "transaction deleted");
    Ok(())
}

/// Income and expense across account-targeted transactions.
pub fn summary(conn: &Connection, caller: &Identity) -> AppResult<TransactionSummary> {
    repo::transactions::summary_for_user(conn, caller.user_id)
}
