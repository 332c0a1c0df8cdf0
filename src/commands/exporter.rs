// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use serde_json::json;
use std::path::Path;

use crate::models::{Target, Transaction};

const HEADER: [&str; 8] = [
    "date",
    "type",
    "category",
    "amount",
    "target",
    "target_id",
    "description",
    "id",
];

fn target_parts(target: &Target) -> (&'static str, String) {
    match target {
        Target::Account(id) => ("account", id.to_string()),
        Target::CreditCard(id) => ("credit_card", id.to_string()),
    }
}

/// Writes `txs` to `out` as csv or json. Returns the number of rows.
pub fn write_transactions(txs: &[Transaction], format: &str, out: &Path) -> Result<usize> {
    match format.trim().to_lowercase().as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(HEADER)?;
            for t in txs {
                let (kind, target_id) = target_parts(&t.target);
                wtr.write_record([
                    t.transaction_date.to_string(),
                    t.r#type.to_string(),
                    t.category.clone(),
                    t.amount.to_string(),
                    kind.to_string(),
                    target_id,
                    t.description.clone(),
                    t.id.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for t in txs {
                let (kind, target_id) = target_parts(&t.target);
                items.push(json!({
                    "date": t.transaction_date, "type": t.r#type, "category": t.category,
                    "amount": t.amount, "target": kind, "target_id": target_id,
                    "description": t.description, "id": t.id
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(txs.len())
}
