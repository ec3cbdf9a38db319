use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::policy::TaxPolicy;
use super::weighted_average::weighted_average;
use crate::error::CapitalGainsError;
use crate::models::{Operation, OperationKind, TaxResult, TradingState};
use crate::utils::{format_currency, round_currency};

/// Stateful tax calculator for one sequence of operations.
///
/// Buys move the weighted average cost; sells realize profit or loss
/// against it. Losses are carried forward and consumed by later taxable
/// profits.
///
/// Amounts too large for `Decimal` yield `CapitalGainsError::Overflow` and
/// leave the state untouched.
#[derive(Debug, Clone)]
pub struct TaxCalculator {
    state: TradingState,
    policy: TaxPolicy,
}

impl TaxCalculator {
    pub fn new(policy: TaxPolicy) -> Self {
        Self::with_state(policy, TradingState::new())
    }

    /// Resume from an existing state (e.g. a position carried in from elsewhere)
    pub fn with_state(policy: TaxPolicy, state: TradingState) -> Self {
        Self { state, policy }
    }

    pub fn state(&self) -> &TradingState {
        &self.state
    }

    pub fn into_state(self) -> TradingState {
        self.state
    }

    pub fn apply(&mut self, operation: &Operation) -> Result<TaxResult, CapitalGainsError> {
        match operation.kind {
            OperationKind::Buy => self.process_buy(operation),
            OperationKind::Sell => self.process_sell(operation),
        }
    }

    /// Add a purchase lot to the position. Never taxed.
    pub fn process_buy(&mut self, operation: &Operation) -> Result<TaxResult, CapitalGainsError> {
        let average = weighted_average(
            self.state.quantity,
            self.state.weighted_average,
            operation.quantity,
            operation.unit_cost,
        )
        .ok_or(CapitalGainsError::Overflow("weighted average"))?;
        let quantity = checked(self.state.quantity.checked_add(operation.quantity), "position")?;

        self.state.weighted_average = average;
        self.state.quantity = quantity;

        Ok(TaxResult::zero())
    }

    /// Realize a sale against the current weighted average cost
    pub fn process_sell(&mut self, operation: &Operation) -> Result<TaxResult, CapitalGainsError> {
        let operation_value = checked(operation.total_value(), "sale value")?;
        let profit_or_loss = checked(
            operation
                .unit_cost
                .checked_sub(self.state.weighted_average)
                .and_then(|margin| margin.checked_mul(operation.quantity)),
            "profit",
        )?;
        let quantity = checked(self.state.quantity.checked_sub(operation.quantity), "position")?;

        // Losses always carry forward, even on exempt sales
        if profit_or_loss < Decimal::ZERO {
            let accumulated_loss = checked(
                self.state.accumulated_loss.checked_add(profit_or_loss.abs()),
                "accumulated loss",
            )?;
            self.set_quantity(quantity, operation);
            self.state.accumulated_loss = accumulated_loss;
            debug!(
                "Loss of {} recorded, carried forward: {}",
                format_currency(profit_or_loss.abs()),
                format_currency(accumulated_loss)
            );
            return Ok(TaxResult::zero());
        }

        if operation_value <= self.policy.exemption_threshold {
            self.set_quantity(quantity, operation);
            return Ok(TaxResult::zero());
        }

        let loss_applied = profit_or_loss.min(self.state.accumulated_loss);
        let taxable_profit = profit_or_loss - loss_applied;
        let tax = round_currency(checked(taxable_profit.checked_mul(self.policy.rate), "tax")?);

        self.set_quantity(quantity, operation);
        self.state.accumulated_loss -= loss_applied;
        debug!(
            "Sale of {} taxed: profit {}, loss applied {}, tax {}",
            format_currency(operation_value),
            format_currency(profit_or_loss),
            format_currency(loss_applied),
            format_currency(tax)
        );

        Ok(TaxResult { tax })
    }

    fn set_quantity(&mut self, quantity: Decimal, operation: &Operation) {
        if quantity < Decimal::ZERO {
            warn!(
                "Sell of {} units leaves a negative position ({})",
                operation.quantity, quantity
            );
        }
        self.state.quantity = quantity;
    }
}

impl Default for TaxCalculator {
    fn default() -> Self {
        Self::new(TaxPolicy::default())
    }
}

fn checked(value: Option<Decimal>, what: &'static str) -> Result<Decimal, CapitalGainsError> {
    value.ok_or(CapitalGainsError::Overflow(what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn buy(unit_cost: Decimal, quantity: Decimal) -> Operation {
        Operation::buy(unit_cost, quantity)
    }

    fn sell(unit_cost: Decimal, quantity: Decimal) -> Operation {
        Operation::sell(unit_cost, quantity)
    }

    /// Calculator holding 100 units at 10 with the given carried loss
    fn holding_100_at_10(accumulated_loss: Decimal) -> TaxCalculator {
        TaxCalculator::with_state(
            TaxPolicy::default(),
            TradingState {
                quantity: dec!(100),
                weighted_average: dec!(10),
                accumulated_loss,
            },
        )
    }

    #[test]
    fn test_buy_is_never_taxed() {
        let mut calc = TaxCalculator::default();
        let result = calc.process_buy(&buy(dec!(10), dec!(100))).unwrap();
        assert_eq!(result.tax, Decimal::ZERO);
    }

    #[test]
    fn test_buy_updates_quantity_and_average() {
        let mut calc = TaxCalculator::default();
        calc.process_buy(&buy(dec!(10), dec!(100))).unwrap();
        assert_eq!(calc.state().quantity, dec!(100));
        assert_eq!(calc.state().weighted_average, dec!(10));

        calc.process_buy(&buy(dec!(20), dec!(100))).unwrap();
        assert_eq!(calc.state().quantity, dec!(200));
        assert_eq!(calc.state().weighted_average, dec!(15));
    }

    #[test]
    fn test_buy_does_not_touch_accumulated_loss() {
        let mut calc = holding_100_at_10(dec!(1000));
        calc.process_buy(&buy(dec!(10), dec!(100))).unwrap();
        assert_eq!(calc.state().accumulated_loss, dec!(1000));
    }

    #[test]
    fn test_exempt_sell_with_profit() {
        let mut calc = holding_100_at_10(Decimal::ZERO);
        let result = calc.process_sell(&sell(dec!(20), dec!(50))).unwrap();
        assert_eq!(result.tax, Decimal::ZERO);
        assert_eq!(calc.state().quantity, dec!(50));
    }

    #[test]
    fn test_sell_exactly_at_threshold_is_exempt() {
        let mut calc = holding_100_at_10(Decimal::ZERO);
        // 100 * 200 = 20000
        let result = calc.process_sell(&sell(dec!(200), dec!(100))).unwrap();
        assert_eq!(result.tax, Decimal::ZERO);
    }

    #[test]
    fn test_taxed_sell_above_threshold() {
        let mut calc = holding_100_at_10(Decimal::ZERO);
        let result = calc.process_sell(&sell(dec!(20), dec!(5000))).unwrap();
        assert_eq!(result.tax, dec!(10000));
    }

    #[test]
    fn test_loss_is_accumulated() {
        let mut calc = holding_100_at_10(Decimal::ZERO);
        let result = calc.process_sell(&sell(dec!(5), dec!(50))).unwrap();
        assert_eq!(result.tax, Decimal::ZERO);
        assert_eq!(calc.state().accumulated_loss, dec!(250));
    }

    #[test]
    fn test_loss_fully_consumed_by_profit() {
        let mut calc = holding_100_at_10(dec!(5000));
        let result = calc.process_sell(&sell(dec!(20), dec!(5000))).unwrap();
        assert_eq!(result.tax, dec!(9000));
        assert_eq!(calc.state().accumulated_loss, Decimal::ZERO);
    }

    #[test]
    fn test_partial_loss_deduction() {
        let mut calc = holding_100_at_10(dec!(3000));
        let result = calc.process_sell(&sell(dec!(20), dec!(5000))).unwrap();
        assert_eq!(result.tax, dec!(9400));
        assert_eq!(calc.state().accumulated_loss, Decimal::ZERO);
    }

    #[test]
    fn test_loss_larger_than_profit() {
        let mut calc = holding_100_at_10(dec!(60000));
        let result = calc.process_sell(&sell(dec!(20), dec!(5000))).unwrap();
        assert_eq!(result.tax, Decimal::ZERO);
        assert_eq!(calc.state().accumulated_loss, dec!(10000));
    }

    #[test]
    fn test_exempt_sell_keeps_accumulated_loss() {
        let mut calc = holding_100_at_10(dec!(100));
        let result = calc.process_sell(&sell(dec!(15), dec!(100))).unwrap();
        assert_eq!(result.tax, Decimal::ZERO);
        assert_eq!(calc.state().accumulated_loss, dec!(100));
    }

    #[test]
    fn test_tax_is_rounded_to_cents() {
        let mut calc = TaxCalculator::default();
        calc.process_buy(&buy(dec!(10.53), dec!(10000))).unwrap();
        let result = calc.process_sell(&sell(dec!(15.78), dec!(10000))).unwrap();
        assert_eq!(result.tax, dec!(10500));

        let mut calc = TaxCalculator::default();
        calc.process_buy(&buy(dec!(10), dec!(3))).unwrap();
        // profit 3 * 6666.679 = 20000.037 -> tax 4000.0074
        let result = calc.process_sell(&sell(dec!(6676.679), dec!(3))).unwrap();
        assert_eq!(result.tax, dec!(4000.01));
        assert_eq!(result.tax.scale(), 2);
    }

    #[test]
    fn test_sell_all_then_buy_resets_average() {
        let mut calc = TaxCalculator::default();
        calc.process_buy(&buy(dec!(10), dec!(100))).unwrap();
        calc.process_sell(&sell(dec!(15), dec!(100))).unwrap();
        assert_eq!(calc.state().quantity, Decimal::ZERO);

        calc.process_buy(&buy(dec!(20), dec!(50))).unwrap();
        assert_eq!(calc.state().quantity, dec!(50));
        assert_eq!(calc.state().weighted_average, dec!(20));
    }

    #[test]
    fn test_oversell_is_permitted() {
        let mut calc = holding_100_at_10(Decimal::ZERO);
        let result = calc.process_sell(&sell(dec!(12), dec!(150))).unwrap();
        assert_eq!(result.tax, Decimal::ZERO);
        assert_eq!(calc.state().quantity, dec!(-50));
    }

    #[test]
    fn test_custom_policy() {
        let policy = TaxPolicy {
            exemption_threshold: Decimal::ZERO,
            rate: dec!(0.15),
        };
        let mut calc = TaxCalculator::new(policy);
        calc.apply(&buy(dec!(10), dec!(100))).unwrap();
        let result = calc.apply(&sell(dec!(20), dec!(50))).unwrap();
        assert_eq!(result.tax, dec!(75));
    }

    #[test]
    fn test_overflow_is_an_error_and_keeps_state() {
        let huge = Decimal::from(1_000_000_000_000_000_i64);
        let mut calc = holding_100_at_10(dec!(50));

        let err = calc.process_buy(&buy(huge, huge)).unwrap_err();
        assert!(matches!(err, CapitalGainsError::Overflow("weighted average")));

        let err = calc.process_sell(&sell(huge, huge)).unwrap_err();
        assert!(matches!(err, CapitalGainsError::Overflow("sale value")));

        assert_eq!(calc.state(), holding_100_at_10(dec!(50)).state());
    }
}
