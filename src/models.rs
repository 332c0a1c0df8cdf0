// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::AppError;

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident, $label:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => {
                        let allowed: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                        Err(AppError::Validation(format!(
                            "Invalid {} '{}'. Must be one of: {}",
                            $label,
                            other,
                            allowed.join(", ")
                        )))
                    }
                }
            }
        }
    };
}

string_enum!(AccountType, "account type", {
    Bank => "bank",
    Wallet => "wallet",
    Cash => "cash",
    Paylater => "paylater",
});

string_enum!(TransactionType, "transaction type", {
    Income => "income",
    Expense => "expense",
    Transfer => "transfer",
});

string_enum!(GoldType, "gold type", {
    Antam => "antam",
    Ubs => "ubs",
    Galeri24 => "galeri24",
    Pegadaian => "pegadaian",
    Other => "other",
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub full_name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub r#type: AccountType,
    pub balance: Decimal,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_account_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // pockets, populated on reads of main accounts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_accounts: Vec<Account>,
}

/// Where a transaction is posted. Exactly one owning entity, by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Target {
    Account(Uuid),
    CreditCard(Uuid),
}

impl Target {
    /// Builds a target from the two optional ids a caller may supply.
    pub fn from_parts(
        account_id: Option<Uuid>,
        credit_card_id: Option<Uuid>,
    ) -> Result<Self, AppError> {
        match (account_id, credit_card_id) {
            (Some(id), None) => Ok(Target::Account(id)),
            (None, Some(id)) => Ok(Target::CreditCard(id)),
            (None, None) => Err(AppError::validation(
                "Either account_id or credit_card_id must be provided",
            )),
            (Some(_), Some(_)) => Err(AppError::validation(
                "Cannot provide both account_id and credit_card_id",
            )),
        }
    }

    pub fn account_id(&self) -> Option<Uuid> {
        match self {
            Target::Account(id) => Some(*id),
            Target::CreditCard(_) => None,
        }
    }

    pub fn credit_card_id(&self) -> Option<Uuid> {
        match self {
            Target::CreditCard(id) => Some(*id),
            Target::Account(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub target: Target,
    pub r#type: TransactionType,
    pub category: String,
    pub amount: Decimal,
    pub description: String,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    pub amount: Decimal,
    pub budget_month: u32,
    pub budget_year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCard {
    pub id: Uuid,
    pub user_id: Uuid,
    pub card_name: String,
    pub last_four_digits: String,
    pub credit_limit: Decimal,
    pub current_balance: Decimal,
    pub billing_date: u32,
    pub payment_due_date: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldAsset {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub gold_type: GoldType,
    pub weight_gram: Decimal,
    pub purchase_price_per_gram: Decimal,
    pub purchase_date: NaiveDate,
    pub storage_location: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldPrice {
    pub id: Uuid,
    pub price_date: NaiveDate,
    pub price_per_gram: Decimal,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type ConfigMap = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfiguration {
    pub id: Uuid,
    pub api_name: String,
    pub api_type: String,
    pub config: ConfigMap,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
