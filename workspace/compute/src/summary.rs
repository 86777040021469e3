use std::collections::BTreeMap;

use common::BudgetStatus;
use model::entities::budget;
use model::entities::transaction::TransactionKind;
use model::ledger::LedgerEntry;
use rust_decimal::Decimal;
use tracing::debug;

use crate::period::MonthOfYear;

// Pure filter/group/reduce over a materialized ledger slice. All
// arithmetic stays in exact `Decimal`; an empty ledger is a zero-valued
// outcome everywhere, never an error.

fn matches(entry: &LedgerEntry, kind: TransactionKind, period: Option<MonthOfYear>) -> bool {
    entry.kind() == kind && period.is_none_or(|p| p.contains(entry.date()))
}

/// Sums entries of the given kind per category name, optionally scoped to
/// one calendar month. Uncategorized entries are excluded from the mapping
/// (they contribute to totals, not to the breakdown). The `BTreeMap` keys
/// iterate alphabetically, which keeps the result deterministic.
pub fn sum_by_kind_and_category(
    entries: &[LedgerEntry],
    kind: TransactionKind,
    period: Option<MonthOfYear>,
) -> BTreeMap<String, Decimal> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();

    for entry in entries.iter().filter(|e| matches(e, kind, period)) {
        if let Some(category) = entry.category() {
            *totals.entry(category.name.clone()).or_insert(Decimal::ZERO) += entry.amount();
        }
    }

    debug!(?kind, groups = totals.len(), "grouped ledger entries by category");
    totals
}

/// Sums all entries of the given kind, optionally scoped to one calendar
/// month. Returns zero when nothing matches.
pub fn total_by_kind(
    entries: &[LedgerEntry],
    kind: TransactionKind,
    period: Option<MonthOfYear>,
) -> Decimal {
    entries
        .iter()
        .filter(|e| matches(e, kind, period))
        .map(LedgerEntry::amount)
        .sum()
}

/// Like [`total_by_kind`] but restricted to entries of one category.
pub fn total_for_category(
    entries: &[LedgerEntry],
    kind: TransactionKind,
    category_id: i32,
    period: Option<MonthOfYear>,
) -> Decimal {
    entries
        .iter()
        .filter(|e| matches(e, kind, period) && e.category_id() == Some(category_id))
        .map(LedgerEntry::amount)
        .sum()
}

/// Enriches a budget row with computed spending figures.
///
/// `remaining` goes negative on overspend and `percentage_used` is not
/// clamped at 100. A zero allotment yields a percentage of zero; dividing
/// by zero is a defined edge case here, not an error path.
pub fn budget_status(budget: &budget::Model, category_name: &str, spent: Decimal) -> BudgetStatus {
    // normalize() drops trailing zeros so 25.00 serializes as "25".
    let percentage_used = if budget.amount > Decimal::ZERO {
        (spent / budget.amount * Decimal::ONE_HUNDRED)
            .round_dp(2)
            .normalize()
    } else {
        Decimal::ZERO
    };

    BudgetStatus {
        id: budget.id,
        category_id: budget.category_id,
        category_name: category_name.to_string(),
        amount: budget.amount,
        month: budget.month as u32,
        year: budget.year,
        spent,
        remaining: budget.amount - spent,
        percentage_used,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 2)
    }

    fn sample_ledger() -> Vec<LedgerEntry> {
        vec![
            LedgerEntry::with_category(
                date(2024, 3, 5),
                dec(5000), // 50.00
                TransactionKind::Expense,
                1,
                "Food",
            ),
            LedgerEntry::with_category(
                date(2024, 3, 20),
                dec(2550), // 25.50
                TransactionKind::Expense,
                1,
                "Food",
            ),
            LedgerEntry::with_category(
                date(2024, 2, 28),
                dec(80000), // 800.00
                TransactionKind::Expense,
                2,
                "Rent",
            ),
            // Uncategorized expense: in totals, not in the breakdown.
            LedgerEntry::new(date(2024, 3, 10), dec(1000), TransactionKind::Expense),
            LedgerEntry::with_category(
                date(2024, 3, 1),
                dec(150000), // 1500.00
                TransactionKind::Income,
                3,
                "Salary",
            ),
        ]
    }

    #[test]
    fn test_sum_by_kind_and_category_lifetime() {
        let entries = sample_ledger();
        let by_category = sum_by_kind_and_category(&entries, TransactionKind::Expense, None);

        assert_eq!(by_category.len(), 2);
        assert_eq!(by_category["Food"], dec(7550));
        assert_eq!(by_category["Rent"], dec(80000));

        // Alphabetical iteration order.
        let names: Vec<_> = by_category.keys().cloned().collect();
        assert_eq!(names, vec!["Food".to_string(), "Rent".to_string()]);
    }

    #[test]
    fn test_sum_by_kind_and_category_month_scoped() {
        let entries = sample_ledger();
        let march = MonthOfYear::new(3, 2024).unwrap();
        let by_category =
            sum_by_kind_and_category(&entries, TransactionKind::Expense, Some(march));

        // The February rent entry is filtered out.
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category["Food"], dec(7550));
    }

    #[test]
    fn test_empty_ledger_yields_empty_mapping_and_zero_total() {
        let entries: Vec<LedgerEntry> = vec![];
        assert!(sum_by_kind_and_category(&entries, TransactionKind::Expense, None).is_empty());
        assert_eq!(
            total_by_kind(&entries, TransactionKind::Income, None),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_categorized_sums_plus_uncategorized_equal_total() {
        let entries = sample_ledger();

        let total = total_by_kind(&entries, TransactionKind::Expense, None);
        let grouped: Decimal =
            sum_by_kind_and_category(&entries, TransactionKind::Expense, None)
                .values()
                .copied()
                .sum();

        // The 10.00 uncategorized entry accounts for the difference.
        assert_eq!(total, dec(88550));
        assert_eq!(total - grouped, dec(1000));
    }

    #[test]
    fn test_net_balance_identity() {
        let entries = sample_ledger();
        let income = total_by_kind(&entries, TransactionKind::Income, None);
        let expenses = total_by_kind(&entries, TransactionKind::Expense, None);

        assert_eq!(income - expenses, dec(150000) - dec(88550));
    }

    #[test]
    fn test_total_for_category() {
        let entries = sample_ledger();
        let march = MonthOfYear::new(3, 2024).unwrap();

        assert_eq!(
            total_for_category(&entries, TransactionKind::Expense, 1, Some(march)),
            dec(7550)
        );
        assert_eq!(
            total_for_category(&entries, TransactionKind::Expense, 2, Some(march)),
            Decimal::ZERO
        );
    }

    fn test_budget(amount: Decimal) -> budget::Model {
        budget::Model {
            id: 1,
            owner_id: 1,
            category_id: 1,
            amount,
            month: 3,
            year: 2024,
        }
    }

    #[test]
    fn test_budget_status_partial_use() {
        let status = budget_status(&test_budget(dec(20000)), "Food", dec(5000));

        assert_eq!(status.spent, dec(5000));
        assert_eq!(status.remaining, dec(15000));
        assert_eq!(status.percentage_used, Decimal::new(25, 0));
    }

    #[test]
    fn test_budget_status_overspend_is_representable() {
        let status = budget_status(&test_budget(dec(10000)), "Food", dec(15000));

        assert_eq!(status.remaining, dec(-5000));
        assert_eq!(status.percentage_used, Decimal::new(150, 0));
    }

    #[test]
    fn test_budget_status_zero_amount_has_zero_percentage() {
        let status = budget_status(&test_budget(Decimal::ZERO), "Food", dec(4200));

        assert_eq!(status.percentage_used, Decimal::ZERO);
        assert_eq!(status.remaining, dec(-4200));
    }

    #[test]
    fn test_budget_status_percentage_rounds_to_two_places() {
        // 10.00 of 30.00 is 33.333...%, rounded to 33.33.
        let status = budget_status(&test_budget(dec(3000)), "Food", dec(1000));
        assert_eq!(status.percentage_used, Decimal::new(3333, 2));
    }
}
