use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, Utc};
use common::TransactionDto;
use compute::ledger::{load_category_names, to_dto};
use model::entities::transaction::TransactionKind;
use model::entities::{category, transaction, user};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

use crate::schemas::{ApiResponse, AppState, ErrorResponse, TransactionListQuery};

/// Request body for recording a transaction
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateTransactionRequest {
    /// Transaction amount (always positive; direction comes from `kind`)
    #[schema(value_type = String)]
    pub amount: Decimal,
    /// What the money was for
    pub description: String,
    /// Optional category
    pub category_id: Option<i32>,
    /// income or expense
    pub kind: TransactionKind,
    /// Date the transaction occurred (YYYY-MM-DD)
    pub date: NaiveDate,
}

/// Request body for updating a transaction
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateTransactionRequest {
    #[schema(value_type = Option<String>)]
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub kind: Option<TransactionKind>,
    pub date: Option<NaiveDate>,
}

async fn owner_exists(state: &AppState, user_id: i32) -> Result<bool, StatusCode> {
    user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await
        .map(|found| found.is_some())
        .map_err(|db_error| {
            error!("Failed to look up user {}: {}", user_id, db_error);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Rejects category ids that do not exist or belong to another owner.
async fn check_category_ownership(
    state: &AppState,
    user_id: i32,
    category_id: i32,
) -> Result<(), StatusCode> {
    let found = category::Entity::find_by_id(category_id)
        .filter(category::Column::OwnerId.eq(user_id))
        .one(&state.db)
        .await
        .map_err(|db_error| {
            error!("Failed to look up category {}: {}", category_id, db_error);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if found.is_none() {
        warn!("Category {} not found for user {}", category_id, user_id);
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(())
}

async fn find_owned_transaction(
    state: &AppState,
    user_id: i32,
    transaction_id: i32,
) -> Result<Option<transaction::Model>, StatusCode> {
    transaction::Entity::find_by_id(transaction_id)
        .filter(transaction::Column::OwnerId.eq(user_id))
        .one(&state.db)
        .await
        .map_err(|db_error| {
            error!("Failed to look up transaction {}: {}", transaction_id, db_error);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

async fn to_dto_response(
    state: &AppState,
    model: &transaction::Model,
) -> Result<TransactionDto, StatusCode> {
    let category_names = load_category_names(&state.db, model.owner_id)
        .await
        .map_err(|compute_error| {
            error!("Failed to load category names: {}", compute_error);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    Ok(to_dto(model, &category_names))
}

/// Record a new transaction
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/transactions",
    tag = "transactions",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
    ),
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction recorded successfully", body = ApiResponse<TransactionDto>),
        (status = 404, description = "User or category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_transaction(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionDto>>), StatusCode> {
    debug!("Recording {:?} of {} for user {}", request.kind, request.amount, user_id);

    if !owner_exists(&state, user_id).await? {
        warn!("User {} not found while recording transaction", user_id);
        return Err(StatusCode::NOT_FOUND);
    }
    if let Some(category_id) = request.category_id {
        check_category_ownership(&state, user_id, category_id).await?;
    }

    let now = Utc::now().naive_utc();
    let new_transaction = transaction::ActiveModel {
        owner_id: Set(user_id),
        amount: Set(request.amount),
        description: Set(request.description),
        category_id: Set(request.category_id),
        kind: Set(request.kind),
        date: Set(request.date),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_transaction.insert(&state.db).await {
        Ok(transaction_model) => {
            info!("Transaction recorded with ID: {}", transaction_model.id);
            let dto = to_dto_response(&state, &transaction_model).await?;
            let response = ApiResponse {
                data: dto,
                message: "Transaction recorded successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!("Failed to record transaction: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// List a user's transactions
///
/// Newest first, with ids as the same-day tiebreak. The optional filters
/// combine with AND semantics.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/transactions",
    tag = "transactions",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        ("kind" = Option<TransactionKind>, Query, description = "Restrict to one kind"),
        ("category_id" = Option<i32>, Query, description = "Restrict to one category"),
        ("start_date" = Option<NaiveDate>, Query, description = "Earliest date to include"),
        ("end_date" = Option<NaiveDate>, Query, description = "Latest date to include"),
    ),
    responses(
        (status = 200, description = "Transactions retrieved successfully", body = ApiResponse<Vec<TransactionDto>>),
        (status = 400, description = "Malformed filter", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_transactions(
    Path(user_id): Path<i32>,
    Query(query): Query<TransactionListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TransactionDto>>>, StatusCode> {
    let mut finder = transaction::Entity::find()
        .filter(transaction::Column::OwnerId.eq(user_id));

    if let Some(kind) = query.kind {
        finder = finder.filter(transaction::Column::Kind.eq(kind));
    }
    if let Some(category_id) = query.category_id {
        finder = finder.filter(transaction::Column::CategoryId.eq(category_id));
    }
    if let Some(start_date) = query.start_date {
        finder = finder.filter(transaction::Column::Date.gte(start_date));
    }
    if let Some(end_date) = query.end_date {
        finder = finder.filter(transaction::Column::Date.lte(end_date));
    }

    let models = match finder
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::Id)
        .all(&state.db)
        .await
    {
        Ok(models) => models,
        Err(db_error) => {
            error!("Failed to retrieve transactions for user {}: {}", user_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let category_names = load_category_names(&state.db, user_id)
        .await
        .map_err(|compute_error| {
            error!("Failed to load category names: {}", compute_error);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    debug!("Retrieved {} transactions for user {}", models.len(), user_id);
    let response = ApiResponse {
        data: models.iter().map(|m| to_dto(m, &category_names)).collect(),
        message: "Transactions retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific transaction
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/transactions/{transaction_id}",
    tag = "transactions",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    responses(
        (status = 200, description = "Transaction retrieved successfully", body = ApiResponse<TransactionDto>),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_transaction(
    Path((user_id, transaction_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TransactionDto>>, StatusCode> {
    match find_owned_transaction(&state, user_id, transaction_id).await? {
        Some(transaction_model) => {
            let dto = to_dto_response(&state, &transaction_model).await?;
            let response = ApiResponse {
                data: dto,
                message: "Transaction retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        None => {
            warn!("Transaction {} not found for user {}", transaction_id, user_id);
            Err(StatusCode::NOT_FOUND)
        }
    }
}

/// Update a transaction
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/transactions/{transaction_id}",
    tag = "transactions",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    request_body = UpdateTransactionRequest,
    responses(
        (status = 200, description = "Transaction updated successfully", body = ApiResponse<TransactionDto>),
        (status = 404, description = "Transaction or category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_transaction(
    Path((user_id, transaction_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Json<ApiResponse<TransactionDto>>, StatusCode> {
    let Some(existing) = find_owned_transaction(&state, user_id, transaction_id).await? else {
        warn!("Transaction {} not found for user {}", transaction_id, user_id);
        return Err(StatusCode::NOT_FOUND);
    };

    if let Some(category_id) = request.category_id {
        check_category_ownership(&state, user_id, category_id).await?;
    }

    let mut transaction_active: transaction::ActiveModel = existing.into();
    if let Some(amount) = request.amount {
        transaction_active.amount = Set(amount);
    }
    if let Some(description) = request.description {
        transaction_active.description = Set(description);
    }
    if let Some(category_id) = request.category_id {
        transaction_active.category_id = Set(Some(category_id));
    }
    if let Some(kind) = request.kind {
        transaction_active.kind = Set(kind);
    }
    if let Some(date) = request.date {
        transaction_active.date = Set(date);
    }
    transaction_active.updated_at = Set(Utc::now().naive_utc());

    match transaction_active.update(&state.db).await {
        Ok(updated) => {
            info!("Transaction {} updated", transaction_id);
            let dto = to_dto_response(&state, &updated).await?;
            let response = ApiResponse {
                data: dto,
                message: "Transaction updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to update transaction {}: {}", transaction_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete a transaction
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/transactions/{transaction_id}",
    tag = "transactions",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    responses(
        (status = 200, description = "Transaction deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_transaction(
    Path((user_id, transaction_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    let Some(existing) = find_owned_transaction(&state, user_id, transaction_id).await? else {
        warn!("Transaction {} not found for user {}", transaction_id, user_id);
        return Err(StatusCode::NOT_FOUND);
    };

    match transaction::Entity::delete_by_id(existing.id).exec(&state.db).await {
        Ok(_) => {
            info!("Transaction {} deleted", transaction_id);
            let response = ApiResponse {
                data: format!("Transaction {} deleted", transaction_id),
                message: "Transaction deleted successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to delete transaction {}: {}", transaction_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
