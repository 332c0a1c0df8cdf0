// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Utc;
use regex::Regex;
use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::{self, Identity, TokenKeys};
use crate::config::token_ttl;
use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::repo;

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

fn validate(reg: &Registration) -> AppResult<(String, String, String)> {
    let email = reg.email.trim().to_lowercase();
    let email_re = Regex::new(EMAIL_PATTERN)
        .map_err(|e| AppError::Internal(format!("Invalid email pattern: {e}")))?;
    if !email_re.is_match(&email) {
        return Err(AppError::validation("Invalid email address"));
    }
    let username = reg.username.trim().to_string();
    if !(3..=50).contains(&username.chars().count()) {
        return Err(AppError::validation(
            "username must be between 3 and 50 characters",
        ));
    }
    if reg.password.chars().count() < 6 {
        return Err(AppError::validation(
            "password must be at least 6 characters",
        ));
    }
    let full_name = super::required("full_name", &reg.full_name)?;
    Ok((email, username, full_name))
}

pub fn register(conn: &Connection, reg: &Registration) -> AppResult<User> {
    let (email, username, full_name) = validate(reg)?;
    if repo::users::get_by_email(conn, &email)?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }
    if repo::users::get_by_username(conn, &username)?.is_some() {
        return Err(AppError::Conflict("Username already taken".into()));
    }
    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        email,
        username: Some(username),
        password_hash: auth::hash_password(&reg.password)?,
        full_name,
        is_admin: false,
        created_at: now,
        updated_at: now,
    };
    repo::users::insert(conn, &user)?;
    tracing::info!(user_id = %user.id, "user registered");
    Ok(user)
}

/// Unknown login and wrong password fail identically.
pub fn login(
    conn: &Connection,
    keys: &TokenKeys,
    login: &str,
    password: &str,
) -> AppResult<Session> {
    let login = login.trim();
    let Some(user) = repo::users::get_by_email_or_username(conn, login)? else {
        tracing::info!("login rejected");
        return Err(AppError::invalid_credentials());
    };
    if !auth::verify_password(&user.password_hash, password) {
        tracing::info!("login rejected");
        return Err(AppError::invalid_credentials());
    }
    let token = keys.issue(user.id, &user.email, token_ttl())?;
    tracing::info!(user_id = %user.id, "login succeeded");
    Ok(Session { token, user })
}

pub fn me(conn: &Connection, caller: &Identity) -> AppResult<User> {
    repo::users::get(conn, caller.user_id)?.ok_or_else(|| AppError::not_found("User"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg(email: &str, username: &str, password: &str) -> Registration {
        Registration {
            email: email.into(),
            username: username.into(),
            password: password.into(),
            full_name: "Test User".into(),
        }
    }

    #[test]
    fn rejects_malformed_input() {
        let conn = crate::db::open_in_memory().unwrap();
        for bad in [
            reg("not-an-email", "alice", "secret1"),
            reg("alice@localhost", "alice", "secret1"),
            reg("al ice@b.io", "alice", "secret1"),
            reg("a@b.io", "al", "secret1"),
            reg("a@b.io", "alice", "short"),
        ] {
            let err = register(&conn, &bad).unwrap_err();
            assert_eq!(err.kind(), "validation", "{bad:?}");
        }
        let mut blank_name = reg("a@b.io", "alice", "secret1");
        blank_name.full_name = "   ".into();
        assert_eq!(register(&conn, &blank_name).unwrap_err().kind(), "validation");
    }

    #[test]
    fn email_is_normalised() {
        let conn = crate::db::open_in_memory().unwrap();
        let user = register(&conn, &reg("  Alice@Example.COM ", "alice", "secret1")).unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert!(!user.is_admin);
        let err = register(&conn, &reg("ALICE@example.com", "alice2", "secret1")).unwrap_err();
        assert_eq!(err.kind(), "conflict");
    }
}
