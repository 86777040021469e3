//! Shared seeding helpers for the async tests in this crate. Each test gets
//! its own in-memory sqlite database with the full schema applied.

use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use model::entities::transaction::TransactionKind;
use model::entities::{budget, category, transaction, user};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set, Statement};

pub(crate) async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("connect to in-memory sqlite");
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA foreign_keys = ON;",
    ))
    .await
    .expect("enable foreign keys");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub(crate) async fn seed_user(db: &DatabaseConnection, username: &str) -> user::Model {
    user::ActiveModel {
        username: Set(username.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert user")
}

pub(crate) async fn seed_category(
    db: &DatabaseConnection,
    owner_id: i32,
    name: &str,
) -> category::Model {
    category::ActiveModel {
        owner_id: Set(owner_id),
        name: Set(name.to_string()),
        description: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert category")
}

pub(crate) async fn seed_transaction(
    db: &DatabaseConnection,
    owner_id: i32,
    amount: Decimal,
    kind: &str,
    category_id: Option<i32>,
    date: NaiveDate,
) -> transaction::Model {
    let kind = match kind {
        "income" => TransactionKind::Income,
        "expense" => TransactionKind::Expense,
        other => panic!("unknown transaction kind {other:?}"),
    };
    let now = chrono::Utc::now().naive_utc();
    transaction::ActiveModel {
        owner_id: Set(owner_id),
        amount: Set(amount),
        description: Set(format!("{kind:?} of {amount}")),
        category_id: Set(category_id),
        kind: Set(kind),
        date: Set(date),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert transaction")
}

pub(crate) async fn seed_budget(
    db: &DatabaseConnection,
    owner_id: i32,
    category_id: i32,
    amount: Decimal,
    month: i32,
    year: i32,
) -> budget::Model {
    budget::ActiveModel {
        owner_id: Set(owner_id),
        category_id: Set(category_id),
        amount: Set(amount),
        month: Set(month),
        year: Set(year),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert budget")
}
