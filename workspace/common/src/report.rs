use std::collections::BTreeMap;

use chrono::NaiveDate;
use model::entities::transaction::TransactionKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A transaction row as it appears in list responses and in the dashboard's
/// recent-activity excerpt. The category name is resolved at load time so
/// clients never need a second lookup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TransactionDto {
    pub id: i32,
    pub amount: Decimal,
    pub description: String,
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
    pub kind: TransactionKind,
    pub date: NaiveDate,
}

/// Income/expense/net totals for one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct MonthlyTotals {
    /// Calendar month, 1 through 12.
    pub month: u32,
    pub year: i32,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

/// A budget row enriched with computed spending figures for its month.
///
/// `remaining` may be negative and `percentage_used` may exceed 100; an
/// overspent budget is representable, not an error. A zero-amount budget
/// reports `percentage_used` of zero rather than dividing by zero.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BudgetStatus {
    pub id: i32,
    pub category_id: i32,
    pub category_name: String,
    /// The allotted amount.
    pub amount: Decimal,
    pub month: u32,
    pub year: i32,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage_used: Decimal,
}

/// A point-in-time aggregated view of one user's financial activity.
///
/// Lifetime totals and category breakdowns, a trailing six-month rollup
/// ending at the as-of month, and the five most recent transactions.
/// `budget_status` is populated by the budget summary endpoint, not here;
/// the dashboard always returns it empty.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DashboardSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_balance: Decimal,
    /// Lifetime expense totals keyed by category name, alphabetical.
    /// Uncategorized spending counts in `total_expenses` only.
    pub expense_by_category: BTreeMap<String, Decimal>,
    pub income_by_category: BTreeMap<String, Decimal>,
    /// Exactly six entries, oldest first, last entry is the as-of month.
    pub monthly_summary: Vec<MonthlyTotals>,
    pub recent_transactions: Vec<TransactionDto>,
    pub budget_status: Vec<BudgetStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_fields_serialize_as_strings() {
        let totals = MonthlyTotals {
            month: 2,
            year: 2024,
            income: Decimal::new(150000, 2),
            expenses: Decimal::new(4250, 2),
            net: Decimal::new(145750, 2),
        };

        let json = serde_json::to_value(&totals).unwrap();
        assert_eq!(json["income"], "1500.00");
        assert_eq!(json["expenses"], "42.50");
        assert_eq!(json["net"], "1457.50");
    }

    #[test]
    fn test_transaction_kind_round_trip() {
        let json = serde_json::to_value(TransactionKind::Expense).unwrap();
        assert_eq!(json, "expense");

        let kind: TransactionKind = serde_json::from_value(json).unwrap();
        assert_eq!(kind, TransactionKind::Expense);
    }
}
