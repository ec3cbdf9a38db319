//! Capital gains - tax owed on stock operations
//!
//! Computes the tax due on each operation of a buy/sell sequence using a
//! weighted average cost basis, a per-sale exemption threshold and loss
//! carryforward between sales.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod tax;
pub mod utils;

pub use models::{Operation, OperationKind, TaxResult, TradingState};
pub use tax::{process_operations, TaxCalculator, TaxPolicy};
