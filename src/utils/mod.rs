//! Rounding and display helpers for monetary values

use rust_decimal::{Decimal, RoundingStrategy};

/// Round a monetary amount to cents, ties away from zero (2.345 -> 2.35).
///
/// # Examples
/// ```
/// use capital_gains::utils::round_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_currency(dec!(4000.0074)), dec!(4000.01));
/// assert_eq!(round_currency(dec!(2.345)), dec!(2.35));
/// ```
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format as Brazilian Real for log output: "R$ 1.234,56"
///
/// # Examples
/// ```
/// use capital_gains::utils::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234.56)), "R$ 1.234,56");
/// assert_eq!(format_currency(dec!(-500)), "R$ -500,00");
/// ```
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_currency(value.abs());
    let formatted = format!("{:.2}", rounded);
    let (integer_part, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let digits: Vec<char> = integer_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    let sign = if value < Decimal::ZERO && !rounded.is_zero() { "-" } else { "" };
    format!("R$ {}{},{}", sign, grouped, cents)
}
