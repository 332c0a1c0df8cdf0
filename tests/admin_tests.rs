// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fintrack::auth::Identity;
use fintrack::db;
use fintrack::models::AccountType;
use fintrack::services::accounts::{self, NewAccount};
use fintrack::services::admin::{self, ApiChanges, NewApiConfiguration, UserChanges};
use fintrack::services::identity::{self, Registration};
use rusqlite::Connection;
use serde_json::json;

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

#[test]
fn non_admins_are_forbidden() {
    let conn = db::open_in_memory().unwrap();
    let me = user(&conn, "alice");
    assert_eq!(admin::list_users(&conn, &me).unwrap_err().kind(), "forbidden");
    assert_eq!(admin::system_stats(&conn, &me).unwrap_err().kind(), "forbidden");
    assert_eq!(admin::list_apis(&conn, &me).unwrap_err().kind(), "forbidden");
}

#[test]
fn admin_cannot_delete_self_but_can_delete_others() {
    let conn = db::open_in_memory().unwrap();
    let root = user(&conn, "root");
    admin::grant_admin(&conn, "root@example.com").unwrap();
    let victim = user(&conn, "bob");
    accounts::create(
        &conn,
        &victim,
        NewAccount {
            name: "Wallet".into(),
            r#type: AccountType::Wallet,
            currency: None,
            parent_account_id: None,
        },
    )
    .unwrap();

    let err = admin::delete_user(&conn, &root, root.user_id).unwrap_err();
    assert_eq!(err.kind(), "validation");
    assert_eq!(err.to_string(), "cannot delete your own account");

    admin::delete_user(&conn, &root, victim.user_id).unwrap();
    assert_eq!(
        admin::get_user(&conn, &root, victim.user_id).unwrap_err().kind(),
        "not_found"
    );
    assert!(accounts::list(&conn, &victim).unwrap().is_empty());
}

#[test]
fn user_edit_and_stats() {
    let conn = db::open_in_memory().unwrap();
    let root = user(&conn, "root");
    admin::grant_admin(&conn, "root").unwrap();
    let bob = user(&conn, "bob");

    let updated = admin::update_user(
        &conn,
        &root,
        bob.user_id,
        UserChanges {
            full_name: Some("Robert".into()),
            is_admin: Some(true),
        },
    )
    .unwrap();
    assert_eq!(updated.full_name, "Robert");
    assert!(updated.is_admin);

    let stats = admin::system_stats(&conn, &root).unwrap();
    assert_eq!(stats.total_users, 2);
    assert_eq!(stats.total_admins, 2);
    assert!(stats.latest_gold_price.is_none());
}

#[test]
fn api_configurations_round_trip_their_config() {
    let conn = db::open_in_memory().unwrap();
    let root = user(&conn, "root");
    admin::grant_admin(&conn, "root").unwrap();

    let config = json!({"url": "https://prices.example/api", "price_field": "/data/buy"});
    let api = admin::create_api(
        &conn,
        &root,
        NewApiConfiguration {
            api_name: "provider".into(),
            api_type: "gold_price".into(),
            config: config.as_object().unwrap().clone(),
            is_active: false,
        },
    )
    .unwrap();

    let dup = admin::create_api(
        &conn,
        &root,
        NewApiConfiguration {
            api_name: "provider".into(),
            api_type: "gold_price".into(),
            config: Default::default(),
            is_active: false,
        },
    )
    .unwrap_err();
    assert_eq!(dup.kind(), "conflict");

    let toggled = admin::update_api(
        &conn,
        &root,
        api.id,
        ApiChanges {
            config: None,
            is_active: Some(true),
        },
    )
    .unwrap();
    assert!(toggled.is_active);

    let loaded = admin::get_api(&conn, &root, api.id).unwrap();
    assert_eq!(loaded.config["price_field"], "/data/buy");
    assert!(loaded.is_active);
    let stats = admin::system_stats(&conn, &root).unwrap();
    assert_eq!(stats.active_api_configs, 1);
}

#[test]
fn granting_admin_to_unknown_login_is_not_found() {
    let conn = db::open_in_memory().unwrap();
    assert_eq!(admin::grant_admin(&conn, "ghost").unwrap_err().kind(), "not_found");
}
