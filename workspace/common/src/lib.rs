//! Common transport-layer types shared between the backend handlers and the
//! compute crate. These structs are the derived, never-persisted report
//! shapes: a dashboard snapshot, monthly rollup rows and enriched budget
//! statuses. All currency fields are exact `Decimal` values serialized as
//! strings, never binary floats.

mod report;

pub use report::{BudgetStatus, DashboardSummary, MonthlyTotals, TransactionDto};
