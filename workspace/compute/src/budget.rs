use chrono::NaiveDate;
use common::BudgetStatus;
use model::entities::transaction::TransactionKind;
use model::entities::{budget, category};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, instrument};

use crate::error::{ComputeError, Result};
use crate::ledger::{load_category_names, load_owner_transactions, to_entries};
use crate::period::MonthOfYear;
use crate::summary::{budget_status, total_for_category};

/// Returns the owner's budgets for one target month, each enriched with
/// spending figures, ordered by budget id.
///
/// When `period` is `None` the target defaults to the month and year of
/// `today`. Callers that received only one of month/year pass `None` too:
/// the single supplied value is ignored and today wins. That mirrors the
/// long-standing behavior of the summary endpoint and is deliberately not
/// a partial default.
#[instrument(skip(db))]
pub async fn list_budget_statuses(
    db: &DatabaseConnection,
    owner_id: i32,
    period: Option<MonthOfYear>,
    today: NaiveDate,
) -> Result<Vec<BudgetStatus>> {
    let target = period.unwrap_or_else(|| MonthOfYear::from_date(today));

    let budgets = budget::Entity::find()
        .filter(budget::Column::OwnerId.eq(owner_id))
        .filter(budget::Column::Month.eq(target.month() as i32))
        .filter(budget::Column::Year.eq(target.year()))
        .order_by_asc(budget::Column::Id)
        .all(db)
        .await?;

    if budgets.is_empty() {
        return Ok(Vec::new());
    }

    let category_names = load_category_names(db, owner_id).await?;
    let models = load_owner_transactions(db, owner_id).await?;
    let entries = to_entries(&models, &category_names);

    debug!(
        owner_id,
        month = target.month(),
        year = target.year(),
        budgets = budgets.len(),
        "computing budget statuses"
    );

    budgets
        .iter()
        .map(|b| {
            let name = category_names.get(&b.category_id).ok_or_else(|| {
                ComputeError::NotFound(format!("category {} for budget {}", b.category_id, b.id))
            })?;
            let spent = total_for_category(
                &entries,
                TransactionKind::Expense,
                b.category_id,
                Some(target),
            );
            Ok(budget_status(b, name, spent))
        })
        .collect()
}

/// Enriches a single budget row, used when listing or creating one budget.
#[instrument(skip(db, budget))]
pub async fn status_for_budget(
    db: &DatabaseConnection,
    budget: &budget::Model,
) -> Result<BudgetStatus> {
    let category = category::Entity::find_by_id(budget.category_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            ComputeError::NotFound(format!(
                "category {} for budget {}",
                budget.category_id, budget.id
            ))
        })?;

    let target = MonthOfYear::new(budget.month as u32, budget.year)?;

    let category_names = load_category_names(db, budget.owner_id).await?;
    let models = load_owner_transactions(db, budget.owner_id).await?;
    let entries = to_entries(&models, &category_names);

    let spent = total_for_category(
        &entries,
        TransactionKind::Expense,
        budget.category_id,
        Some(target),
    );

    Ok(budget_status(budget, &category.name, spent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{
        seed_budget, seed_category, seed_transaction, seed_user, setup_db,
    };
    use rust_decimal::Decimal;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 2)
    }

    #[tokio::test]
    async fn test_spent_and_remaining_for_one_budget() {
        let db = setup_db().await;
        let owner = seed_user(&db, "alice").await;
        let food = seed_category(&db, owner.id, "Food").await;

        seed_transaction(&db, owner.id, dec(5000), "expense", Some(food.id), date(2024, 3, 10))
            .await;
        seed_budget(&db, owner.id, food.id, dec(20000), 3, 2024).await;

        let statuses = list_budget_statuses(&db, owner.id, None, date(2024, 3, 15))
            .await
            .unwrap();

        assert_eq!(statuses.len(), 1);
        let status = &statuses[0];
        assert_eq!(status.category_name, "Food");
        assert_eq!(status.spent, dec(5000));
        assert_eq!(status.remaining, dec(15000));
        assert_eq!(status.percentage_used, Decimal::new(25, 0));
    }

    #[tokio::test]
    async fn test_spent_excludes_other_months_categories_and_income() {
        let db = setup_db().await;
        let owner = seed_user(&db, "bob").await;
        let food = seed_category(&db, owner.id, "Food").await;
        let rent = seed_category(&db, owner.id, "Rent").await;

        seed_transaction(&db, owner.id, dec(3000), "expense", Some(food.id), date(2024, 3, 5))
            .await;
        // Wrong month.
        seed_transaction(&db, owner.id, dec(9000), "expense", Some(food.id), date(2024, 2, 5))
            .await;
        // Wrong category.
        seed_transaction(&db, owner.id, dec(80000), "expense", Some(rent.id), date(2024, 3, 1))
            .await;
        // Income in the budget's category never counts as spending.
        seed_transaction(&db, owner.id, dec(2000), "income", Some(food.id), date(2024, 3, 8))
            .await;

        seed_budget(&db, owner.id, food.id, dec(10000), 3, 2024).await;

        let statuses = list_budget_statuses(&db, owner.id, None, date(2024, 3, 15))
            .await
            .unwrap();

        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].spent, dec(3000));
    }

    #[tokio::test]
    async fn test_explicit_period_overrides_today() {
        let db = setup_db().await;
        let owner = seed_user(&db, "carol").await;
        let food = seed_category(&db, owner.id, "Food").await;

        seed_budget(&db, owner.id, food.id, dec(10000), 1, 2024).await;
        seed_transaction(&db, owner.id, dec(2500), "expense", Some(food.id), date(2024, 1, 20))
            .await;

        let january = MonthOfYear::new(1, 2024).unwrap();
        let statuses =
            list_budget_statuses(&db, owner.id, Some(january), date(2024, 3, 15))
                .await
                .unwrap();

        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].month, 1);
        assert_eq!(statuses[0].spent, dec(2500));

        // Defaulting to today finds no budget for March.
        let statuses = list_budget_statuses(&db, owner.id, None, date(2024, 3, 15))
            .await
            .unwrap();
        assert!(statuses.is_empty());
    }

    #[tokio::test]
    async fn test_statuses_are_ordered_by_budget_id() {
        let db = setup_db().await;
        let owner = seed_user(&db, "dave").await;
        let food = seed_category(&db, owner.id, "Food").await;
        let rent = seed_category(&db, owner.id, "Rent").await;
        let fun = seed_category(&db, owner.id, "Fun").await;

        let first = seed_budget(&db, owner.id, food.id, dec(10000), 3, 2024).await;
        let second = seed_budget(&db, owner.id, rent.id, dec(90000), 3, 2024).await;
        let third = seed_budget(&db, owner.id, fun.id, dec(5000), 3, 2024).await;

        let statuses = list_budget_statuses(&db, owner.id, None, date(2024, 3, 15))
            .await
            .unwrap();

        let ids: Vec<i32> = statuses.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![first.id, second.id, third.id]);
    }

    #[tokio::test]
    async fn test_status_for_budget() {
        let db = setup_db().await;
        let owner = seed_user(&db, "erin").await;
        let food = seed_category(&db, owner.id, "Food").await;

        seed_transaction(&db, owner.id, dec(15000), "expense", Some(food.id), date(2024, 3, 2))
            .await;
        let budget_row = seed_budget(&db, owner.id, food.id, dec(10000), 3, 2024).await;

        let status = status_for_budget(&db, &budget_row).await.unwrap();

        assert_eq!(status.category_name, "Food");
        assert_eq!(status.spent, dec(15000));
        assert_eq!(status.remaining, dec(-5000));
        assert_eq!(status.percentage_used, Decimal::new(150, 0));
    }

    #[tokio::test]
    async fn test_no_budgets_yields_empty_list() {
        let db = setup_db().await;
        let owner = seed_user(&db, "frank").await;

        let statuses = list_budget_statuses(&db, owner.id, None, date(2024, 3, 15))
            .await
            .unwrap();
        assert!(statuses.is_empty());
    }
}
