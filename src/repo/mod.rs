// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Storage access, one module per table. Every function takes a plain
//! `&Connection` so it can run standalone or inside a caller's transaction.

pub mod accounts;
pub mod api_configs;
pub mod budgets;
pub mod credit_cards;
pub mod gold;
pub mod transactions;
pub mod users;
