use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use common::BudgetStatus;
use compute::budget::{list_budget_statuses, status_for_budget};
use compute::period::MonthOfYear;
use compute::ComputeError;
use model::entities::{budget, category};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

use crate::schemas::{ApiResponse, AppState, BudgetSummaryQuery, ErrorResponse};

/// Request body for creating a budget
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateBudgetRequest {
    /// Category the budget caps
    pub category_id: i32,
    /// Monthly allotment
    #[schema(value_type = String)]
    pub amount: Decimal,
    /// Month the budget applies to (1-12)
    pub month: u32,
    /// Year the budget applies to
    pub year: i32,
}

/// Request body for updating a budget
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateBudgetRequest {
    pub category_id: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub amount: Option<Decimal>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

fn is_unique_violation(err: &DbErr) -> bool {
    let message = err.to_string().to_lowercase();
    message.contains("unique") || message.contains("constraint")
}

fn duplicate_budget_response() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::CONFLICT,
        Json(ErrorResponse {
            error: "A budget for this category and month already exists".to_string(),
            code: "BUDGET_ALREADY_EXISTS".to_string(),
            success: false,
        }),
    )
}

fn invalid_month_response(detail: String) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: detail,
            code: "INVALID_MONTH".to_string(),
            success: false,
        }),
    )
}

fn internal_error_response(context: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("Internal server error while {context}"),
            code: "DATABASE_ERROR".to_string(),
            success: false,
        }),
    )
}

fn not_found_response(what: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("{what} not found"),
            code: "NOT_FOUND".to_string(),
            success: false,
        }),
    )
}

async fn check_category_ownership(
    state: &AppState,
    user_id: i32,
    category_id: i32,
) -> Result<(), (StatusCode, Json<ErrorResponse>)> {
    let found = category::Entity::find_by_id(category_id)
        .filter(category::Column::OwnerId.eq(user_id))
        .one(&state.db)
        .await
        .map_err(|db_error| {
            error!("Failed to look up category {}: {}", category_id, db_error);
            internal_error_response("checking the category")
        })?;

    if found.is_none() {
        warn!("Category {} not found for user {}", category_id, user_id);
        return Err(not_found_response("Category"));
    }
    Ok(())
}

async fn find_owned_budget(
    state: &AppState,
    user_id: i32,
    budget_id: i32,
) -> Result<Option<budget::Model>, (StatusCode, Json<ErrorResponse>)> {
    budget::Entity::find_by_id(budget_id)
        .filter(budget::Column::OwnerId.eq(user_id))
        .one(&state.db)
        .await
        .map_err(|db_error| {
            error!("Failed to look up budget {}: {}", budget_id, db_error);
            internal_error_response("looking up the budget")
        })
}

async fn enrich(
    state: &AppState,
    budget_model: &budget::Model,
) -> Result<BudgetStatus, (StatusCode, Json<ErrorResponse>)> {
    status_for_budget(&state.db, budget_model)
        .await
        .map_err(|compute_error| match compute_error {
            ComputeError::NotFound(detail) => {
                warn!("Budget {} enrichment failed: {}", budget_model.id, detail);
                not_found_response("Category")
            }
            ComputeError::InvalidPeriod(detail) => invalid_month_response(detail),
            ComputeError::Database(db_error) => {
                error!("Failed to enrich budget {}: {}", budget_model.id, db_error);
                internal_error_response("computing budget status")
            }
        })
}

/// Create a new budget
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/budgets",
    tag = "budgets",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
    ),
    request_body = CreateBudgetRequest,
    responses(
        (status = 201, description = "Budget created successfully", body = ApiResponse<BudgetStatus>),
        (status = 400, description = "Month outside 1-12", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Budget already exists for this category and month", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_budget(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<CreateBudgetRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BudgetStatus>>), (StatusCode, Json<ErrorResponse>)> {
    debug!(
        "Creating budget of {} for category {} in {}/{}",
        request.amount, request.category_id, request.month, request.year
    );

    let period = MonthOfYear::new(request.month, request.year)
        .map_err(|err| invalid_month_response(err.to_string()))?;
    check_category_ownership(&state, user_id, request.category_id).await?;

    let new_budget = budget::ActiveModel {
        owner_id: Set(user_id),
        category_id: Set(request.category_id),
        amount: Set(request.amount),
        month: Set(period.month() as i32),
        year: Set(period.year()),
        ..Default::default()
    };

    match new_budget.insert(&state.db).await {
        Ok(budget_model) => {
            info!("Budget created with ID: {}", budget_model.id);
            let status = enrich(&state, &budget_model).await?;
            let response = ApiResponse {
                data: status,
                message: "Budget created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) if is_unique_violation(&db_error) => {
            warn!("Duplicate budget for user {}: {}", user_id, db_error);
            Err(duplicate_budget_response())
        }
        Err(db_error) => {
            error!("Failed to create budget: {}", db_error);
            Err(internal_error_response("creating the budget"))
        }
    }
}

/// Get all budgets for a user
///
/// Every row is enriched with spent, remaining and percentage figures for
/// its own month.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/budgets",
    tag = "budgets",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
    ),
    responses(
        (status = 200, description = "Budgets retrieved successfully", body = ApiResponse<Vec<BudgetStatus>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_budgets(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<BudgetStatus>>>, (StatusCode, Json<ErrorResponse>)> {
    let budgets = budget::Entity::find()
        .filter(budget::Column::OwnerId.eq(user_id))
        .order_by_asc(budget::Column::Id)
        .all(&state.db)
        .await
        .map_err(|db_error| {
            error!("Failed to retrieve budgets for user {}: {}", user_id, db_error);
            internal_error_response("retrieving budgets")
        })?;

    let mut statuses = Vec::with_capacity(budgets.len());
    for budget_model in &budgets {
        statuses.push(enrich(&state, budget_model).await?);
    }

    debug!("Retrieved {} budgets for user {}", statuses.len(), user_id);
    Ok(Json(ApiResponse {
        data: statuses,
        message: "Budgets retrieved successfully".to_string(),
        success: true,
    }))
}

/// Get the budget summary for one month
///
/// With both `month` and `year` supplied, summarizes that month. With one
/// or neither supplied, falls back to the current month; a lone `month` or
/// `year` is ignored rather than partially applied.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/budgets/summary",
    tag = "budgets",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        ("month" = Option<u32>, Query, description = "Month to summarize (1-12)"),
        ("year" = Option<i32>, Query, description = "Year to summarize"),
    ),
    responses(
        (status = 200, description = "Budget summary retrieved successfully", body = ApiResponse<Vec<BudgetStatus>>),
        (status = 400, description = "Malformed month or year", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_budget_summary(
    Path(user_id): Path<i32>,
    Query(query): Query<BudgetSummaryQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<BudgetStatus>>>, (StatusCode, Json<ErrorResponse>)> {
    let period = match (query.month, query.year) {
        (Some(month), Some(year)) => Some(
            MonthOfYear::new(month, year)
                .map_err(|err| invalid_month_response(err.to_string()))?,
        ),
        _ => None,
    };

    let today = Utc::now().date_naive();
    let statuses = list_budget_statuses(&state.db, user_id, period, today)
        .await
        .map_err(|compute_error| match compute_error {
            ComputeError::NotFound(detail) => {
                warn!("Budget summary for user {} failed: {}", user_id, detail);
                not_found_response("Category")
            }
            ComputeError::InvalidPeriod(detail) => invalid_month_response(detail),
            ComputeError::Database(db_error) => {
                error!("Failed to summarize budgets for user {}: {}", user_id, db_error);
                internal_error_response("summarizing budgets")
            }
        })?;

    debug!("Summarized {} budgets for user {}", statuses.len(), user_id);
    Ok(Json(ApiResponse {
        data: statuses,
        message: "Budget summary retrieved successfully".to_string(),
        success: true,
    }))
}

/// Get a specific budget
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/budgets/{budget_id}",
    tag = "budgets",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        ("budget_id" = i32, Path, description = "Budget ID"),
    ),
    responses(
        (status = 200, description = "Budget retrieved successfully", body = ApiResponse<BudgetStatus>),
        (status = 404, description = "Budget not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_budget(
    Path((user_id, budget_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BudgetStatus>>, (StatusCode, Json<ErrorResponse>)> {
    let Some(budget_model) = find_owned_budget(&state, user_id, budget_id).await? else {
        warn!("Budget {} not found for user {}", budget_id, user_id);
        return Err(not_found_response("Budget"));
    };

    let status = enrich(&state, &budget_model).await?;
    Ok(Json(ApiResponse {
        data: status,
        message: "Budget retrieved successfully".to_string(),
        success: true,
    }))
}

/// Update a budget
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/budgets/{budget_id}",
    tag = "budgets",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        ("budget_id" = i32, Path, description = "Budget ID"),
    ),
    request_body = UpdateBudgetRequest,
    responses(
        (status = 200, description = "Budget updated successfully", body = ApiResponse<BudgetStatus>),
        (status = 400, description = "Month outside 1-12", body = ErrorResponse),
        (status = 404, description = "Budget or category not found", body = ErrorResponse),
        (status = 409, description = "Budget already exists for this category and month", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_budget(
    Path((user_id, budget_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
    Json(request): Json<UpdateBudgetRequest>,
) -> Result<Json<ApiResponse<BudgetStatus>>, (StatusCode, Json<ErrorResponse>)> {
    let Some(existing) = find_owned_budget(&state, user_id, budget_id).await? else {
        warn!("Budget {} not found for user {}", budget_id, user_id);
        return Err(not_found_response("Budget"));
    };

    if let Some(month) = request.month {
        MonthOfYear::new(month, request.year.unwrap_or(existing.year))
            .map_err(|err| invalid_month_response(err.to_string()))?;
    }
    if let Some(category_id) = request.category_id {
        check_category_ownership(&state, user_id, category_id).await?;
    }

    let mut budget_active: budget::ActiveModel = existing.into();
    if let Some(category_id) = request.category_id {
        budget_active.category_id = Set(category_id);
    }
    if let Some(amount) = request.amount {
        budget_active.amount = Set(amount);
    }
    if let Some(month) = request.month {
        budget_active.month = Set(month as i32);
    }
    if let Some(year) = request.year {
        budget_active.year = Set(year);
    }

    match budget_active.update(&state.db).await {
        Ok(updated) => {
            info!("Budget {} updated", budget_id);
            let status = enrich(&state, &updated).await?;
            Ok(Json(ApiResponse {
                data: status,
                message: "Budget updated successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) if is_unique_violation(&db_error) => {
            warn!("Duplicate budget on update {}: {}", budget_id, db_error);
            Err(duplicate_budget_response())
        }
        Err(db_error) => {
            error!("Failed to update budget {}: {}", budget_id, db_error);
            Err(internal_error_response("updating the budget"))
        }
    }
}

/// Delete a budget
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/budgets/{budget_id}",
    tag = "budgets",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        ("budget_id" = i32, Path, description = "Budget ID"),
    ),
    responses(
        (status = 200, description = "Budget deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Budget not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_budget(
    Path((user_id, budget_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ErrorResponse>)> {
    let Some(existing) = find_owned_budget(&state, user_id, budget_id).await? else {
        warn!("Budget {} not found for user {}", budget_id, user_id);
        return Err(not_found_response("Budget"));
    };

    match budget::Entity::delete_by_id(existing.id).exec(&state.db).await {
        Ok(_) => {
            info!("Budget {} deleted", budget_id);
            Ok(Json(ApiResponse {
                data: format!("Budget {} deleted", budget_id),
                message: "Budget deleted successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) => {
            error!("Failed to delete budget {}: {}", budget_id, db_error);
            Err(internal_error_response("deleting the budget"))
        }
    }
}
