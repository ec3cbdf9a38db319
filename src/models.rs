//! Data types exchanged with the tax engine
//!
//! `Operation` is what a caller feeds in, `TaxResult` is what comes back,
//! and `TradingState` is the running position owned by one calculation.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::str::FromStr;

/// Kind of trade. Anything other than these two tags fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Buy,
    Sell,
}

/// One trade instruction, as it appears on an input line
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Operation {
    #[serde(rename = "operation")]
    pub kind: OperationKind,
    #[serde(rename = "unit-cost")]
    pub unit_cost: Decimal,
    pub quantity: Decimal,
}

impl Operation {
    pub fn buy(unit_cost: Decimal, quantity: Decimal) -> Self {
        Self {
            kind: OperationKind::Buy,
            unit_cost,
            quantity,
        }
    }

    pub fn sell(unit_cost: Decimal, quantity: Decimal) -> Self {
        Self {
            kind: OperationKind::Sell,
            unit_cost,
            quantity,
        }
    }

    /// Gross value of the trade (`unit_cost * quantity`), `None` on overflow
    pub fn total_value(&self) -> Option<Decimal> {
        self.unit_cost.checked_mul(self.quantity)
    }
}

/// Tax owed on a single operation, already rounded to cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxResult {
    #[serde(serialize_with = "serialize_json_number")]
    pub tax: Decimal,
}

impl TaxResult {
    pub fn zero() -> Self {
        Self { tax: Decimal::ZERO }
    }
}

/// Running state for one independent sequence of operations.
///
/// `quantity` may go negative on over-sell; nothing here clamps it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradingState {
    pub quantity: Decimal,
    pub weighted_average: Decimal,
    pub accumulated_loss: Decimal,
}

impl TradingState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Write a decimal as a plain JSON number: integers without a fractional
/// part (`10000`), everything else in its shortest form (`9400.5`).
///
/// Fractional values travel as `f64`, parsed from the decimal text so the
/// nearest double is picked. That is exact up to 15 significant digits
/// (cents on amounts below ten trillion); past that the printed cents may
/// differ from the stored value.
fn serialize_json_number<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let normalized = value.normalize();
    if normalized.scale() == 0 {
        if let Some(int) = normalized.to_i64() {
            return serializer.serialize_i64(int);
        }
    }
    match f64::from_str(&normalized.to_string()) {
        Ok(float) if float.is_finite() => serializer.serialize_f64(float),
        _ => Err(serde::ser::Error::custom(format!(
            "tax value {} is not representable as a JSON number",
            value
        ))),
    }
}
