use super::calculator::TaxCalculator;
use super::policy::TaxPolicy;
use crate::error::CapitalGainsError;
use crate::models::{Operation, TaxResult};

/// Compute the tax for every operation of one independent sequence,
/// starting from an empty position. Output order matches input order.
pub fn process_operations(operations: &[Operation]) -> Result<Vec<TaxResult>, CapitalGainsError> {
    process_operations_with_policy(operations, &TaxPolicy::default())
}

/// Same as [`process_operations`], under a custom threshold and rate.
pub fn process_operations_with_policy(
    operations: &[Operation],
    policy: &TaxPolicy,
) -> Result<Vec<TaxResult>, CapitalGainsError> {
    let mut calculator = TaxCalculator::new(*policy);

    operations
        .iter()
        .map(|operation| calculator.apply(operation))
        .collect()
}
