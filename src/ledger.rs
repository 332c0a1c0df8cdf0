// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Running balances of accounts and credit cards.
//!
//! Balances move by deltas when transactions are posted, edited or removed.
//! All functions here expect to run inside the caller's write transaction.

use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};
use crate::models::{Target, TransactionType};
use crate::repo;

/// Balance effect of one transaction on its target. Cards track debt, so
/// their sign is inverted.
pub fn signed_delta(kind: TransactionType, amount: Decimal, target: &Target) -> Decimal {
    let base = match kind {
        TransactionType::Income => amount,
        TransactionType::Expense => -amount,
        TransactionType::Transfer => Decimal::ZERO,
    };
    match target {
        Target::Account(_) => base,
        Target::CreditCard(_) => -base,
    }
}

fn adjust(conn: &Connection, target: &Target, delta: Decimal) -> AppResult<bool> {
    match target {
        Target::Account(id) => repo::accounts::adjust_balance(conn, *id, delta),
        Target::CreditCard(id) => repo::credit_cards::adjust_balance(conn, *id, delta),
    }
}

/// Posts the effect of a transaction. The target must exist.
pub fn apply(
    conn: &Connection,
    kind: TransactionType,
    amount: Decimal,
    target: &Target,
) -> AppResult<()> {
    let delta = signed_delta(kind, amount, target);
    if delta.is_zero() {
        return Ok(());
    }
    if !adjust(conn, target, delta)? {
        return Err(match target {
            Target::Account(_) => AppError::not_found("Account"),
            Target::CreditCard(_) => AppError::not_found("Credit card"),
        });
    }
    tracing::debug!(?target, %delta, "balance applied");
    Ok(())
}

/// Posts the effect of an edited transaction that stays on its stored
/// target. A target deleted since the transaction was recorded is skipped.
pub fn reapply(
    conn: &Connection,
    kind: TransactionType,
    amount: Decimal,
    target: &Target,
) -> AppResult<()> {
    let delta = signed_delta(kind, amount, target);
    if delta.is_zero() {
        return Ok(());
    }
    if adjust(conn, target, delta)? {
        tracing::debug!(?target, %delta, "balance applied");
    } else {
        tracing::warn!(?target, "application skipped, target no longer exists");
    }
    Ok(())
}

/// Undoes a previously posted effect. A target that no longer exists is
/// skipped.
pub fn reverse(
    conn: &Connection,
    kind: TransactionType,
    amount: Decimal,
    target: &Target,
) -> AppResult<()> {
    let delta = -signed_delta(kind, amount, target);
    if delta.is_zero() {
        return Ok(());
    }
    if adjust(conn, target, delta)? {
        tracing::debug!(?target, %delta, "balance reversed");
    } else {
        tracing::warn!(?target, "reversal skipped, target no longer exists");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn account_signs() {
        let t = Target::Account(Uuid::new_v4());
        assert_eq!(signed_delta(TransactionType::Income, dec!(10), &t), dec!(10));
        assert_eq!(signed_delta(TransactionType::Expense, dec!(10), &t), dec!(-10));
        assert_eq!(signed_delta(TransactionType::Transfer, dec!(10), &t), dec!(0));
    }

    #[test]
    fn card_signs_are_inverted() {
        let t = Target::CreditCard(Uuid::new_v4());
        assert_eq!(signed_delta(TransactionType::Expense, dec!(10), &t), dec!(10));
        assert_eq!(signed_delta(TransactionType::Income, dec!(10), &t), dec!(-10));
        assert_eq!(signed_delta(TransactionType::Transfer, dec!(10), &t), dec!(0));
    }

    #[test]
    fn reversing_a_missing_target_is_not_an_error() {
        let conn = crate::db::open_in_memory().unwrap();
        let gone = Target::Account(Uuid::new_v4());
        reverse(&conn, TransactionType::Expense, dec!(5), &gone).unwrap();
        let err = apply(&conn, TransactionType::Expense, dec!(5), &gone).unwrap_err();
        assert_eq!(err.kind(), "not_found");
        reapply(&conn, TransactionType::Expense, dec!(5), &gone).unwrap();
    }
}
