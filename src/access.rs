// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use uuid::Uuid;

use crate::auth::Identity;
use crate::error::{AppError, AppResult};
use crate::models::{Account, Budget, CreditCard, GoldAsset, Transaction, User};
use crate::repo;

/// Entities recorded against a single owning user.
pub trait Owned {
    const LABEL: &'static str;

    fn owner_id(&self) -> Uuid;
}

macro_rules! owned {
    ($ty:ty, $label:literal) => {
        impl Owned for $ty {
            const LABEL: &'static str = $label;

            fn owner_id(&self) -> Uuid {
                self.user_id
            }
        }
    };
}

owned!(Account, "Account");
owned!(Transaction, "Transaction");
owned!(Budget, "Budget");
owned!(CreditCard, "Credit card");
owned!(GoldAsset, "Gold asset");

/// NotFound when absent, Forbidden when someone else owns it.
pub fn authorize<T: Owned>(found: Option<T>, caller: &Identity) -> AppResult<T> {
    let entity = found.ok_or_else(|| AppError::not_found(T::LABEL))?;
    if entity.owner_id() != caller.user_id {
        tracing::debug!(entity = T::LABEL, caller = %caller.user_id, "ownership check failed");
        return Err(AppError::access_denied());
    }
    Ok(entity)
}

/// Loads the caller's user record and insists on the admin flag.
pub fn require_admin(conn: &Connection, caller: &Identity) -> AppResult<User> {
    let user = repo::users::get(conn, caller.user_id)?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    if !user.is_admin {
        return Err(AppError::Forbidden("Admin access required".into()));
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn budget(owner: Uuid) -> Budget {
        let now = Utc::now();
        Budget {
            id: Uuid::new_v4(),
            user_id: owner,
            category: "Food".into(),
            amount: dec!(100),
            budget_month: 1,
            budget_year: 2025,
            created_at: now,
            updated_at: now,
        }
    }

    fn caller(id: Uuid) -> Identity {
        Identity {
            user_id: id,
            email: "c@x.io".into(),
        }
    }

    #[test]
    fn absent_is_not_found_before_forbidden() {
        let err = authorize::<Budget>(None, &caller(Uuid::new_v4())).unwrap_err();
        assert_eq!(err.to_string(), "Budget not found");
    }

    #[test]
    fn foreign_owner_is_forbidden() {
        let err = authorize(Some(budget(Uuid::new_v4())), &caller(Uuid::new_v4())).unwrap_err();
        assert_eq!(err.kind(), "forbidden");
        let me = Uuid::new_v4();
        assert!(authorize(Some(budget(me)), &caller(me)).is_ok());
    }

    #[test]
    fn unknown_caller_is_unauthorized_for_admin_paths() {
        let conn = crate::db::open_in_memory().unwrap();
        let err = require_admin(&conn, &caller(Uuid::new_v4())).unwrap_err();
        assert_eq!(err.kind(), "unauthorized");
    }
}
