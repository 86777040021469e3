//! Reporting computations over the stored ledger: lifetime and month-scoped
//! aggregation, budget enrichment, and the composed dashboard snapshot.
//!
//! All money math is exact [`rust_decimal::Decimal`]; nothing here ever
//! rounds through floating point.

pub mod budget;
pub mod dashboard;
pub mod error;
pub mod ledger;
pub mod period;
pub mod summary;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use error::{ComputeError, Result};
