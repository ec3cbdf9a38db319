use rust_decimal::Decimal;

/// New average cost after adding a purchase lot to an existing position.
///
/// Returns zero when the combined quantity is zero (no position left), and
/// `None` when an intermediate value does not fit in a `Decimal`.
pub fn weighted_average(
    current_quantity: Decimal,
    current_average: Decimal,
    purchase_quantity: Decimal,
    purchase_price: Decimal,
) -> Option<Decimal> {
    let total_quantity = current_quantity.checked_add(purchase_quantity)?;

    if total_quantity.is_zero() {
        return Some(Decimal::ZERO);
    }

    let current_total = current_quantity.checked_mul(current_average)?;
    let purchase_total = purchase_quantity.checked_mul(purchase_price)?;

    current_total.checked_add(purchase_total)?.checked_div(total_quantity)
}
