use rust_decimal::Decimal;
use serde::Deserialize;

/// Sales with a total value up to this amount pay no tax on their profit
pub const EXEMPTION_THRESHOLD: Decimal = Decimal::from_parts(20000, 0, 0, false, 0);

/// 20% of taxable profit
pub const TAX_RATE: Decimal = Decimal::from_parts(2, 0, 0, false, 1);

/// Policy parameters applied to every sell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaxPolicy {
    pub exemption_threshold: Decimal,
    pub rate: Decimal,
}

impl Default for TaxPolicy {
    fn default() -> Self {
        Self {
            exemption_threshold: EXEMPTION_THRESHOLD,
            rate: TAX_RATE,
        }
    }
}
