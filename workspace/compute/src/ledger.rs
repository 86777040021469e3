use std::collections::HashMap;

use common::TransactionDto;
use model::entities::{category, transaction};
use model::ledger::LedgerEntry;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::debug;

use crate::error::Result;

/// Loads the `category id -> name` map for one owner.
pub async fn load_category_names(
    db: &DatabaseConnection,
    owner_id: i32,
) -> Result<HashMap<i32, String>> {
    let categories = category::Entity::find()
        .filter(category::Column::OwnerId.eq(owner_id))
        .all(db)
        .await?;

    Ok(categories.into_iter().map(|c| (c.id, c.name)).collect())
}

/// Loads the full transaction ledger for one owner, oldest first with ids
/// as the tiebreak so downstream ordering is reproducible.
pub async fn load_owner_transactions(
    db: &DatabaseConnection,
    owner_id: i32,
) -> Result<Vec<transaction::Model>> {
    let transactions = transaction::Entity::find()
        .filter(transaction::Column::OwnerId.eq(owner_id))
        .order_by_asc(transaction::Column::Date)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await?;

    debug!(owner_id, rows = transactions.len(), "loaded owner ledger");
    Ok(transactions)
}

/// Materializes stored rows into the in-memory entries the aggregation
/// functions consume.
pub fn to_entries(
    models: &[transaction::Model],
    category_names: &HashMap<i32, String>,
) -> Vec<LedgerEntry> {
    models
        .iter()
        .map(|m| LedgerEntry::from_model(m, category_names))
        .collect()
}

/// Converts a stored row into its transport shape, resolving the category
/// name from the preloaded map.
pub fn to_dto(model: &transaction::Model, category_names: &HashMap<i32, String>) -> TransactionDto {
    TransactionDto {
        id: model.id,
        amount: model.amount,
        description: model.description.clone(),
        category_id: model.category_id,
        category_name: model
            .category_id
            .and_then(|id| category_names.get(&id).cloned()),
        kind: model.kind,
        date: model.date,
    }
}
