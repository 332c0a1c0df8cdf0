// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-time valuation of gold holdings against the latest price.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::{GoldAsset, GoldPrice};

#[derive(Debug, Clone, Serialize)]
pub struct ValuedGoldAsset {
    #[serde(flatten)]
    pub asset: GoldAsset,
    pub current_price_per_gram: Option<Decimal>,
    pub purchase_value: Decimal,
    pub current_value: Decimal,
    pub profit_loss: Decimal,
    pub profit_loss_percent: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GoldSummary {
    pub total_assets: usize,
    pub total_weight_gram: Decimal,
    pub total_purchase_value: Decimal,
    pub total_current_value: Decimal,
    pub total_profit_loss: Decimal,
    pub profit_loss_percent: Decimal,
    pub current_price_per_gram: Option<Decimal>,
    pub price_date: Option<NaiveDate>,
}

/// `part / whole * 100`, or zero when there is nothing to divide by.
/// `None` when the result does not fit in a `Decimal`.
pub fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole.is_zero() {
        return Some(Decimal::ZERO);
    }
    part.checked_div(whole)?.checked_mul(Decimal::ONE_HUNDRED)
}

fn out_of_range() -> AppError {
    AppError::validation("Gold valuation is out of range")
}

pub fn value_asset(asset: GoldAsset, latest: Option<&GoldPrice>) -> AppResult<ValuedGoldAsset> {
    let current_price = latest.map(|p| p.price_per_gram);
    let purchase_value = asset
        .weight_gram
        .checked_mul(asset.purchase_price_per_gram)
        .ok_or_else(out_of_range)?;
    let current_value = match current_price {
        Some(p) => asset.weight_gram.checked_mul(p).ok_or_else(out_of_range)?,
        None => Decimal::ZERO,
    };
    let profit_loss = current_value
        .checked_sub(purchase_value)
        .ok_or_else(out_of_range)?;
    let profit_loss_percent = percent_of(profit_loss, purchase_value).ok_or_else(out_of_range)?;
    Ok(ValuedGoldAsset {
        asset,
        current_price_per_gram: current_price,
        purchase_value,
        current_value,
        profit_loss,
        profit_loss_percent,
    })
}

pub fn summarize(assets: &[ValuedGoldAsset], latest: Option<&GoldPrice>) -> AppResult<GoldSummary> {
    let mut s = GoldSummary {
        total_assets: assets.len(),
        current_price_per_gram: latest.map(|p| p.price_per_gram),
        price_date: latest.map(|p| p.price_date),
        ..GoldSummary::default()
    };
    let add = |total: Decimal, v: Decimal| total.checked_add(v).ok_or_else(out_of_range);
    for a in assets {
        s.total_weight_gram = add(s.total_weight_gram, a.asset.weight_gram)?;
        s.total_purchase_value = add(s.total_purchase_value, a.purchase_value)?;
        s.total_current_value = add(s.total_current_value, a.current_value)?;
        s.total_profit_loss = add(s.total_profit_loss, a.profit_loss)?;
    }
    s.profit_loss_percent =
        percent_of(s.total_profit_loss, s.total_purchase_value).ok_or_else(out_of_range)?;
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GoldType;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn asset(weight: Decimal, price: Decimal) -> GoldAsset {
        let now = Utc::now();
        GoldAsset {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Bar".into(),
            gold_type: GoldType::Antam,
            weight_gram: weight,
            purchase_price_per_gram: price,
            purchase_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            storage_location: String::new(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn price(p: Decimal) -> GoldPrice {
        let now = Utc::now();
        GoldPrice {
            id: Uuid::new_v4(),
            price_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            price_per_gram: p,
            source: "admin".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn ten_grams_gain() {
        let latest = price(dec!(950000));
        let v = value_asset(asset(dec!(10), dec!(900000)), Some(&latest)).unwrap();
        assert_eq!(v.purchase_value, dec!(9000000));
        assert_eq!(v.current_value, dec!(9500000));
        assert_eq!(v.profit_loss, dec!(500000));
        assert_eq!(v.profit_loss_percent.round_dp(2), dec!(5.56));
    }

    #[test]
    fn no_price_values_holding_at_zero() {
        let v = value_asset(asset(dec!(2), dec!(100)), None).unwrap();
        assert_eq!(v.current_value, dec!(0));
        assert_eq!(v.profit_loss, dec!(-200));
        assert_eq!(v.profit_loss_percent, dec!(-100));
        assert!(v.current_price_per_gram.is_none());
    }

    #[test]
    fn zero_purchase_value_gives_zero_percent() {
        assert_eq!(percent_of(dec!(50), dec!(0)), Some(dec!(0)));
        let s = summarize(&[], None).unwrap();
        assert_eq!(s.profit_loss_percent, dec!(0));
        assert_eq!(s.total_assets, 0);
    }

    #[test]
    fn summary_adds_up_holdings() {
        let latest = price(dec!(1000));
        let assets = vec![
            value_asset(asset(dec!(1), dec!(800)), Some(&latest)).unwrap(),
            value_asset(asset(dec!(3), dec!(1200)), Some(&latest)).unwrap(),
        ];
        let s = summarize(&assets, Some(&latest)).unwrap();
        assert_eq!(s.total_weight_gram, dec!(4));
        assert_eq!(s.total_purchase_value, dec!(4400));
        assert_eq!(s.total_current_value, dec!(4000));
        assert_eq!(s.total_profit_loss, dec!(-400));
        assert_eq!(s.price_date, Some(latest.price_date));
    }

    #[test]
    fn oversized_holding_is_rejected_instead_of_overflowing() {
        let huge = dec!(1000000000000000000);
        let err = value_asset(asset(huge, huge), None).unwrap_err();
        assert_eq!(err.kind(), "validation");

        let latest = price(huge);
        let err = value_asset(asset(huge, dec!(1)), Some(&latest)).unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn percent_of_a_tiny_base_does_not_panic() {
        assert_eq!(percent_of(Decimal::MAX, dec!(0.0000000001)), None);
    }

    #[test]
    fn summary_totals_that_overflow_are_rejected() {
        let big = Decimal::MAX / dec!(2);
        let assets = vec![
            value_asset(asset(dec!(1), big), None).unwrap(),
            value_asset(asset(dec!(1), big), None).unwrap(),
            value_asset(asset(dec!(1), big), None).unwrap(),
        ];
        assert_eq!(summarize(&assets, None).unwrap_err().kind(), "validation");
    }
}
