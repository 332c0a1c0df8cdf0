// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Credential hashing and session tokens.
//!
//! Tokens are `base64url(claims).hex(hmac_sha256(secret, base64url(claims)))`.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|err| AppError::Internal(format!("failed to hash password: {err}")))
}

/// False for a wrong password and for a hash that cannot be parsed.
pub fn verify_password(hash: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// The authenticated caller, as carried by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    email: String,
    iat: i64,
    exp: i64,
}

#[derive(Clone)]
pub struct TokenKeys {
    secret: Vec<u8>,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys").finish_non_exhaustive()
    }
}

impl TokenKeys {
    pub fn new(secret: &[u8]) -> Self {
        TokenKeys {
            secret: secret.to_vec(),
        }
    }

    pub fn issue(&self, user_id: Uuid, email: &str, ttl: chrono::Duration) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let mac = self.sign(payload.as_bytes())?;
        Ok(format!("{payload}.{mac}"))
    }

    pub fn verify(&self, token: &str) -> AppResult<Identity> {
        let invalid = || AppError::Unauthorized("Invalid or expired token".into());
        let (payload, mac) = token.trim().split_once('.').ok_or_else(invalid)?;
        let expected = self.sign(payload.as_bytes())?;
        if !macs_match(mac, &expected) {
            return Err(invalid());
        }
        let raw = URL_SAFE_NO_PAD.decode(payload).map_err(|_| invalid())?;
        let claims: Claims = serde_json::from_slice(&raw).map_err(|_| invalid())?;
        if claims.exp <= Utc::now().timestamp() {
            return Err(invalid());
        }
        Ok(Identity {
            user_id: claims.sub,
            email: claims.email,
        })
    }

    fn sign(&self, payload: &[u8]) -> AppResult<String> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|err| AppError::Internal(format!("invalid token secret: {err}")))?;
        mac.update(payload);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

fn macs_match(presented: &str, computed: &str) -> bool {
    let (Ok(presented), Ok(computed)) = (hex::decode(presented), hex::decode(computed)) else {
        return false;
    };
    if presented.len() != computed.len() {
        return false;
    }
    presented.ct_eq(computed.as_slice()).into()
}
