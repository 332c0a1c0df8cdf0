// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::{caller, id, json, opt, req};
use crate::config::Config;
use crate::models::{GoldPrice, GoldType};
use crate::services::gold::{self, NewGoldAsset};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};
use crate::valuation::ValuedGoldAsset;

fn print_assets(list: &[ValuedGoldAsset]) {
    let rows = list
        .iter()
        .map(|v| {
            vec![
                v.asset.id.to_string(),
                v.asset.name.clone(),
                v.asset.gold_type.to_string(),
                v.asset.weight_gram.normalize().to_string(),
                v.purchase_value.round_dp(2).to_string(),
                v.current_value.round_dp(2).to_string(),
                v.profit_loss.round_dp(2).to_string(),
                format!("{}%", v.profit_loss_percent.round_dp(2)),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Name", "Type", "Grams", "Cost", "Value", "P/L", "P/L %"],
            rows
        )
    );
}

fn print_prices(list: &[GoldPrice]) {
    let rows = list
        .iter()
        .map(|p| {
            vec![
                p.price_date.to_string(),
                p.price_per_gram.round_dp(2).to_string(),
                p.source.clone(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Date", "Price/g", "Source"], rows));
}

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let new = NewGoldAsset {
                name: req(sub, "name")?.to_string(),
                gold_type: req(sub, "type")?.parse::<GoldType>()?,
                weight_gram: parse_decimal(req(sub, "weight")?)?,
                purchase_price_per_gram: parse_decimal(req(sub, "price")?)?,
                purchase_date: parse_date(req(sub, "date")?)?,
                storage_location: opt(sub, "storage").map(str::to_string),
                notes: opt(sub, "notes").map(str::to_string),
            };
            let valued = gold::create(conn, &who, new)?;
            if !maybe_print_json(json(sub), &valued)? {
                print_assets(std::slice::from_ref(&valued));
            }
        }
        Some(("list", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let list = gold::list(conn, &who)?;
            if !maybe_print_json(json(sub), &list)? {
                print_assets(&list);
            }
        }
        Some(("show", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let valued = gold::get(conn, &who, id(sub)?)?;
            if !maybe_print_json(json(sub), &valued)? {
                print_assets(std::slice::from_ref(&valued));
            }
        }
        Some(("rm", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let asset_id = id(sub)?;
            gold::delete(conn, &who, asset_id)?;
            println!("Removed gold asset {}", asset_id);
        }
        Some(("summary", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let s = gold::summary(conn, &who)?;
            if !maybe_print_json(json(sub), &s)? {
                let price = match (s.current_price_per_gram, s.price_date) {
                    (Some(p), Some(d)) => format!("{} ({})", p.round_dp(2), d),
                    _ => "-".to_string(),
                };
                println!(
                    "{}",
                    pretty_table(
                        &["Assets", "Grams", "Cost", "Value", "P/L", "P/L %", "Price/g"],
                        vec![vec![
                            s.total_assets.to_string(),
                            s.total_weight_gram.normalize().to_string(),
                            s.total_purchase_value.round_dp(2).to_string(),
                            s.total_current_value.round_dp(2).to_string(),
                            s.total_profit_loss.round_dp(2).to_string(),
                            format!("{}%", s.profit_loss_percent.round_dp(2)),
                            price,
                        ]],
                    )
                );
            }
        }
        Some(("price", sub)) => {
            let price = gold::latest_price(conn)?;
            if !maybe_print_json(json(sub), &price)? {
                print_prices(std::slice::from_ref(&price));
            }
        }
        Some(("history", sub)) => {
            let list = gold::price_history(conn, sub.get_one::<u32>("limit").copied())?;
            if !maybe_print_json(json(sub), &list)? {
                print_prices(&list);
            }
        }
        Some(("set-price", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let price = gold::set_today_price(
                conn,
                &who,
                parse_decimal(req(sub, "price")?)?,
                opt(sub, "source"),
            )?;
            if !maybe_print_json(json(sub), &price)? {
                println!(
                    "Gold price for {} set to {}",
                    price.price_date, price.price_per_gram
                );
            }
        }
        Some(("fetch-price", sub)) => {
            let who = caller(conn, cfg, sub)?;
            let price = gold::fetch_today_price(conn, &who, req(sub, "api")?)?;
            if !maybe_print_json(json(sub), &price)? {
                println!(
                    "Fetched gold price for {}: {} ({})",
                    price.price_date, price.price_per_gram, price.source
                );
            }
        }
        _ => {}
    }
    Ok(())
}
