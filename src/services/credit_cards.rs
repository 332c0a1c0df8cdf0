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
use crate::error::{AppError, AppResult};
use crate::models::CreditCard;
use crate::repo;

#[derive(Debug, Clone)]
pub struct NewCreditCard {
    pub card_name: String,
    pub last_four_digits: String,
    pub credit_limit: Decimal,
    pub current_balance: Option<Decimal>,
    pub billing_date: u32,
    pub payment_due_date: u32,
}

fn day_of_month(field: &str, day: u32) -> AppResult<()> {
    if !(1..=31).contains(&day) {
        return Err(AppError::Validation(format!(
            "{field} must be between 1 and 31"
        )));
    }
    Ok(())
}

pub fn create(conn: &Connection, caller: &Identity, new: NewCreditCard) -> AppResult<CreditCard> {
    let card_name = super::required("card_name", &new.card_name)?;
    let last_four = new.last_four_digits.trim().to_string();
    if last_four.chars().count() != 4 {
        return Err(AppError::validation(
            "last_four_digits must be exactly 4 characters",
        ));
    }
    super::positive("credit_limit", new.credit_limit)?;
    day_of_month("billing_date", new.billing_date)?;
    day_of_month("payment_due_date", new.payment_due_date)?;

    let now = Utc::now();
    let card = CreditCard {
        id: Uuid::new_v4(),
        user_id: caller.user_id,
        card_name,
        last_four_digits: last_four,
        credit_limit: new.credit_limit,
        current_balance: new.current_balance.unwrap_or(Decimal::ZERO),
        billing_date: new.billing_date,
        payment_due_date: new.payment_due_date,
        created_at: now,
        updated_at: now,
    };
    repo::credit_cards::insert(conn, &card)?;
    tracing::info!(card_id = %card.id, user_id = %caller.user_id, "credit card created");
    Ok(card)
}

pub fn list(conn: &Connection, caller: &Identity) -> AppResult<Vec<CreditCard>> {
    repo::credit_cards::list_for_user(conn, caller.user_id)
}

pub fn get(conn: &Connection, caller: &Identity, id: Uuid) -> AppResult<CreditCard> {
    authorize(repo::credit_cards::get(conn, id)?, caller)
}

/// Transactions charged to the card stay behind.
pub fn delete(conn: &Connection, caller: &Identity, id: Uuid) -> AppResult<()> {
    let card = authorize(repo::credit_cards::get(conn, id)?, caller)?;
    repo::credit_cards::delete(conn, card.id)?;
    tracing::info!(card_id = %card.id, "credit card deleted");
    Ok(())
}
