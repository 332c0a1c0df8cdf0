// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fintrack::auth::Identity;
use fintrack::db;
use fintrack::models::{AccountType, Target, TransactionType};
use fintrack::services::accounts::{self, NewAccount};
use fintrack::services::credit_cards::{self, NewCreditCard};
use fintrack::services::identity::{self, Registration};
use fintrack::services::transactions::{self, NewTransaction, Page, TransactionChanges};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn user(conn: &Connection, name: &str) -> Identity {
    let u = identity::register(
        conn,
        &Registration {
            email: format!("{name}@example.com"),
            username: name.to_string(),
            password: "secret123".into(),
            full_name: name.to_string(),
        },
    )
    .unwrap();
    Identity {
        user_id: u.id,
        email: u.email,
    }
}

fn account(conn: &Connection, who: &Identity) -> Uuid {
    accounts::create(
        conn,
        who,
        NewAccount {
            name: "Main".into(),
            r#type: AccountType::Bank,
            currency: None,
            parent_account_id: None,
        },
    )
    .unwrap()
    .id
}

fn card(conn: &Connection, who: &Identity) -> Uuid {
    credit_cards::create(
        conn,
        who,
        NewCreditCard {
            card_name: "Visa".into(),
            last_four_digits: "4242".into(),
            credit_limit: dec!(10000000),
            current_balance: None,
            billing_date: 25,
            payment_due_date: 10,
        },
    )
    .unwrap()
    .id
}

fn on_account(id: Uuid, kind: TransactionType, amount: Decimal) -> NewTransaction {
    NewTransaction {
        account_id: Some(id),
        credit_card_id: None,
        r#type: kind,
        category: "General".into(),
        amount,
        description: None,
        transaction_date: None,
    }
}

fn on_card(id: Uuid, kind: TransactionType, amount: Decimal) -> NewTransaction {
    NewTransaction {
        account_id: None,
        credit_card_id: Some(id),
        ..on_account(id, kind, amount)
    }
}

fn account_balance(conn: &Connection, who: &Identity, id: Uuid) -> Decimal {
    accounts::get(conn, who, id).unwrap().balance
}

fn card_balance(conn: &Connection, who: &Identity, id: Uuid) -> Decimal {
    credit_cards::get(conn, who, id).unwrap().current_balance
}

#[test]
fn balance_is_income_minus_expense() {
    let mut conn = db::open_in_memory().unwrap();
    let me = user(&conn, "alice");
    let acct = account(&conn, &me);
    let ops = [
        (TransactionType::Income, dec!(1500.25)),
        (TransactionType::Expense, dec!(200.10)),
        (TransactionType::Transfer, dec!(999)),
        (TransactionType::Expense, dec!(0.15)),
        (TransactionType::Income, dec!(10)),
    ];
    for (kind, amount) in ops {
        transactions::create(&mut conn, &me, on_account(acct, kind, amount)).unwrap();
    }
    assert_eq!(account_balance(&conn, &me, acct), dec!(1310.00));
}

#[test]
fn expense_income_delete_scenario() {
    let mut conn = db::open_in_memory().unwrap();
    let me = user(&conn, "alice");
    let acct = account(&conn, &me);
    assert_eq!(account_balance(&conn, &me, acct), dec!(0));

    transactions::create(&mut conn, &me, on_account(acct, TransactionType::Expense, dec!(100)))
        .unwrap();
    assert_eq!(account_balance(&conn, &me, acct), dec!(-100));

    let income =
        transactions::create(&mut conn, &me, on_account(acct, TransactionType::Income, dec!(30)))
            .unwrap();
    assert_eq!(account_balance(&conn, &me, acct), dec!(-70));

    transactions::delete(&mut conn, &me, income.id).unwrap();
    assert_eq!(account_balance(&conn, &me, acct), dec!(-100));
}

#[test]
fn card_effects_are_inverted_and_reversible() {
    let mut conn = db::open_in_memory().unwrap();
    let me = user(&conn, "alice");
    let visa = card(&conn, &me);

    let spend =
        transactions::create(&mut conn, &me, on_card(visa, TransactionType::Expense, dec!(250)))
            .unwrap();
    assert_eq!(card_balance(&conn, &me, visa), dec!(250));
    let payment =
        transactions::create(&mut conn, &me, on_card(visa, TransactionType::Income, dec!(100)))
            .unwrap();
    assert_eq!(card_balance(&conn, &me, visa), dec!(150));

    transactions::delete(&mut conn, &me, payment.id).unwrap();
    transactions::delete(&mut conn, &me, spend.id).unwrap();
    assert_eq!(card_balance(&conn, &me, visa), dec!(0));
}

#[test]
fn amount_edit_moves_balance_by_difference() {
    let mut conn = db::open_in_memory().unwrap();
    let me = user(&conn, "alice");
    let acct = account(&conn, &me);
    let tx =
        transactions::create(&mut conn, &me, on_account(acct, TransactionType::Expense, dec!(40)))
            .unwrap();

    let same = TransactionChanges {
        amount: Some(dec!(40)),
        ..Default::default()
    };
    transactions::update(&mut conn, &me, tx.id, same).unwrap();
    assert_eq!(account_balance(&conn, &me, acct), dec!(-40));

    let bigger = TransactionChanges {
        amount: Some(dec!(65.5)),
        ..Default::default()
    };
    let updated = transactions::update(&mut conn, &me, tx.id, bigger).unwrap();
    assert_eq!(updated.amount, dec!(65.5));
    assert_eq!(account_balance(&conn, &me, acct), dec!(-65.5));

    let flipped = TransactionChanges {
        r#type: Some(TransactionType::Income),
        ..Default::default()
    };
    transactions::update(&mut conn, &me, tx.id, flipped).unwrap();
    assert_eq!(account_balance(&conn, &me, acct), dec!(65.5));
}

#[test]
fn moving_from_account_to_card_reverses_then_applies_inverted() {
    let mut conn = db::open_in_memory().unwrap();
    let me = user(&conn, "alice");
    let acct = account(&conn, &me);
    let visa = card(&conn, &me);
    let tx =
        transactions::create(&mut conn, &me, on_account(acct, TransactionType::Expense, dec!(80)))
            .unwrap();
    assert_eq!(account_balance(&conn, &me, acct), dec!(-80));

    let moved = transactions::update(
        &mut conn,
        &me,
        tx.id,
        TransactionChanges {
            credit_card_id: Some(visa),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(moved.target, Target::CreditCard(visa));
    assert_eq!(account_balance(&conn, &me, acct), dec!(0));
    assert_eq!(card_balance(&conn, &me, visa), dec!(80));
}

#[test]
fn target_must_be_exactly_one_and_owned() {
    let mut conn = db::open_in_memory().unwrap();
    let me = user(&conn, "alice");
    let other = user(&conn, "bob");
    let acct = account(&conn, &me);
    let visa = card(&conn, &me);
    let theirs = account(&conn, &other);

    let mut both = on_account(acct, TransactionType::Expense, dec!(1));
    both.credit_card_id = Some(visa);
    let err = transactions::create(&mut conn, &me, both).unwrap_err();
    assert_eq!(err.kind(), "validation");

    let mut neither = on_account(acct, TransactionType::Expense, dec!(1));
    neither.account_id = None;
    assert_eq!(
        transactions::create(&mut conn, &me, neither).unwrap_err().kind(),
        "validation"
    );

    let zero = on_account(acct, TransactionType::Expense, dec!(0));
    assert_eq!(
        transactions::create(&mut conn, &me, zero).unwrap_err().kind(),
        "validation"
    );

    let foreign = on_account(theirs, TransactionType::Expense, dec!(1));
    assert_eq!(
        transactions::create(&mut conn, &me, foreign).unwrap_err().kind(),
        "forbidden"
    );
    let missing = on_account(Uuid::new_v4(), TransactionType::Expense, dec!(1));
    assert_eq!(
        transactions::create(&mut conn, &me, missing).unwrap_err().kind(),
        "not_found"
    );
    assert_eq!(account_balance(&conn, &other, theirs), dec!(0));
    assert!(transactions::list(&conn, &me, Page::default()).unwrap().is_empty());
}

#[test]
fn other_users_cannot_touch_a_transaction() {
    let mut conn = db::open_in_memory().unwrap();
    let me = user(&conn, "alice");
    let other = user(&conn, "bob");
    let acct = account(&conn, &me);
    let tx =
        transactions::create(&mut conn, &me, on_account(acct, TransactionType::Expense, dec!(5)))
            .unwrap();

    assert_eq!(
        transactions::get(&conn, &other, tx.id).unwrap_err().kind(),
        "forbidden"
    );
    assert_eq!(
        transactions::delete(&mut conn, &other, tx.id).unwrap_err().kind(),
        "forbidden"
    );
    assert_eq!(
        transactions::get(&conn, &other, Uuid::new_v4()).unwrap_err().kind(),
        "not_found"
    );
    assert_eq!(account_balance(&conn, &me, acct), dec!(-5));
}

#[test]
fn deleting_after_the_account_is_gone_still_removes_the_row() {
    let mut conn = db::open_in_memory().unwrap();
    let me = user(&conn, "alice");
    let acct = account(&conn, &me);
    let tx =
        transactions::create(&mut conn, &me, on_account(acct, TransactionType::Expense, dec!(12)))
            .unwrap();
    accounts::delete(&conn, &me, acct).unwrap();

    transactions::delete(&mut conn, &me, tx.id).unwrap();
    assert_eq!(
        transactions::get(&conn, &me, tx.id).unwrap_err().kind(),
        "not_found"
    );
}

#[test]
fn editing_after_the_account_is_gone_keeps_the_stored_target() {
    let mut conn = db::open_in_memory().unwrap();
    let me = user(&conn, "alice");
    let acct = account(&conn, &me);
    let tx =
        transactions::create(&mut conn, &me, on_account(acct, TransactionType::Expense, dec!(12)))
            .unwrap();
    accounts::delete(&conn, &me, acct).unwrap();

    let edited = transactions::update(
        &mut conn,
        &me,
        tx.id,
        TransactionChanges {
            description: Some("fix typo".into()),
            amount: Some(dec!(15)),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(edited.description, "fix typo");
    assert_eq!(edited.target, Target::Account(acct));
    let stored = transactions::get(&conn, &me, tx.id).unwrap();
    assert_eq!(stored.amount, dec!(15));
}

#[test]
fn moving_off_a_deleted_account_applies_to_the_new_target() {
    let mut conn = db::open_in_memory().unwrap();
    let me = user(&conn, "alice");
    let acct = account(&conn, &me);
    let visa = card(&conn, &me);
    let tx =
        transactions::create(&mut conn, &me, on_account(acct, TransactionType::Expense, dec!(40)))
            .unwrap();
    accounts::delete(&conn, &me, acct).unwrap();

    transactions::update(
        &mut conn,
        &me,
        tx.id,
        TransactionChanges {
            credit_card_id: Some(visa),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(card_balance(&conn, &me, visa), dec!(40));
}

#[test]
fn balance_overflow_is_rejected_and_rolled_back() {
    let mut conn = db::open_in_memory().unwrap();
    let me = user(&conn, "alice");
    let acct = account(&conn, &me);
    transactions::create(&mut conn, &me, on_account(acct, TransactionType::Income, Decimal::MAX))
        .unwrap();

    let again = on_account(acct, TransactionType::Income, Decimal::MAX);
    let err = transactions::create(&mut conn, &me, again).unwrap_err();
    assert_eq!(err.kind(), "validation");
    assert_eq!(account_balance(&conn, &me, acct), Decimal::MAX);
    assert_eq!(transactions::list_all(&conn, &me).unwrap().len(), 1);
}

#[test]
fn card_balance_overflow_is_rejected() {
    let mut conn = db::open_in_memory().unwrap();
    let me = user(&conn, "alice");
    let visa = card(&conn, &me);
    transactions::create(&mut conn, &me, on_card(visa, TransactionType::Expense, Decimal::MAX))
        .unwrap();
    let more = on_card(visa, TransactionType::Expense, dec!(1));
    let err = transactions::create(&mut conn, &me, more).unwrap_err();
    assert_eq!(err.kind(), "validation");
    assert_eq!(card_balance(&conn, &me, visa), Decimal::MAX);
}

#[test]
fn summary_counts_account_transactions_only() {
    let mut conn = db::open_in_memory().unwrap();
    let me = user(&conn, "alice");
    let acct = account(&conn, &me);
    let visa = card(&conn, &me);
    transactions::create(&mut conn, &me, on_account(acct, TransactionType::Income, dec!(1000)))
        .unwrap();
    transactions::create(&mut conn, &me, on_account(acct, TransactionType::Expense, dec!(300)))
        .unwrap();
    transactions::create(&mut conn, &me, on_card(visa, TransactionType::Expense, dec!(700)))
        .unwrap();

    let s = transactions::summary(&conn, &me).unwrap();
    assert_eq!(s.total_income, dec!(1000));
    assert_eq!(s.total_expense, dec!(300));
    assert_eq!(s.balance, dec!(700));
}

#[test]
fn list_is_paged_newest_first() {
    let mut conn = db::open_in_memory().unwrap();
    let me = user(&conn, "alice");
    let acct = account(&conn, &me);
    for day in 1..=4 {
        let mut new = on_account(acct, TransactionType::Expense, dec!(1));
        new.transaction_date = chrono::NaiveDate::from_ymd_opt(2025, 1, day);
        transactions::create(&mut conn, &me, new).unwrap();
    }
    let page = transactions::list(&conn, &me, Page { limit: 2, offset: 1 }).unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].transaction_date.to_string(), "2025-01-03");
    assert_eq!(page[1].transaction_date.to_string(), "2025-01-02");
}
