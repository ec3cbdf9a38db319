// Tax module - weighted average cost, exemption and loss carryforward

pub mod calculator;
pub mod policy;
pub mod processor;
pub mod weighted_average;

pub use calculator::TaxCalculator;
pub use policy::{TaxPolicy, EXEMPTION_THRESHOLD, TAX_RATE};
pub use processor::{process_operations, process_operations_with_policy};
pub use weighted_average::weighted_average;
