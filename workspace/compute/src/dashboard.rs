use chrono::NaiveDate;
use common::DashboardSummary;
use common::MonthlyTotals;
use model::entities::transaction::TransactionKind;
use sea_orm::DatabaseConnection;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::ledger::{load_category_names, load_owner_transactions, to_dto, to_entries};
use crate::period::MonthOfYear;
use crate::summary::{sum_by_kind_and_category, total_by_kind};

/// Months in the trailing rollup, the as-of month included.
const ROLLUP_MONTHS: u32 = 6;

/// Rows in the recent-activity excerpt.
const RECENT_LIMIT: usize = 5;

/// Composes one consistent dashboard snapshot for an owner as of a given
/// date.
///
/// Totals and category breakdowns cover the whole ledger; only the monthly
/// rollup is month-scoped. The rollup always has exactly [`ROLLUP_MONTHS`]
/// entries, oldest first, ending at the month `as_of` falls in and wrapping
/// year boundaries on the way back. An owner with no transactions gets an
/// all-zero snapshot, not an error.
///
/// `budget_status` stays empty here; budget enrichment is served by the
/// budget summary path instead of being fused into the dashboard.
#[instrument(skip(db))]
pub async fn build_dashboard(
    db: &DatabaseConnection,
    owner_id: i32,
    as_of: NaiveDate,
) -> Result<DashboardSummary> {
    let category_names = load_category_names(db, owner_id).await?;
    let models = load_owner_transactions(db, owner_id).await?;
    let entries = to_entries(&models, &category_names);

    let total_income = total_by_kind(&entries, TransactionKind::Income, None);
    let total_expenses = total_by_kind(&entries, TransactionKind::Expense, None);

    let current = MonthOfYear::from_date(as_of);
    let monthly_summary: Vec<MonthlyTotals> = (0..ROLLUP_MONTHS)
        .rev()
        .map(|i| {
            let period = current.months_back(i);
            let income = total_by_kind(&entries, TransactionKind::Income, Some(period));
            let expenses = total_by_kind(&entries, TransactionKind::Expense, Some(period));
            MonthlyTotals {
                month: period.month(),
                year: period.year(),
                income,
                expenses,
                net: income - expenses,
            }
        })
        .collect();

    // The ledger is loaded date asc, id asc; walking it backwards gives
    // the most recent rows with insertion order as the same-day tiebreak.
    let recent_transactions = models
        .iter()
        .rev()
        .take(RECENT_LIMIT)
        .map(|m| to_dto(m, &category_names))
        .collect();

    debug!(owner_id, %as_of, entries = entries.len(), "built dashboard snapshot");

    Ok(DashboardSummary {
        total_income,
        total_expenses,
        net_balance: total_income - total_expenses,
        expense_by_category: sum_by_kind_and_category(&entries, TransactionKind::Expense, None),
        income_by_category: sum_by_kind_and_category(&entries, TransactionKind::Income, None),
        monthly_summary,
        recent_transactions,
        budget_status: Vec::new(),
    })
}
