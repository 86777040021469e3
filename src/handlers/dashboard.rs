use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, Utc};
use common::DashboardSummary;
use compute::dashboard::build_dashboard;
use sea_orm::EntityTrait;
use tracing::{debug, error, instrument, warn};

use crate::schemas::{ApiResponse, AppState, DashboardQuery, ErrorResponse};

/// Get the dashboard snapshot for a user
///
/// Lifetime totals and per-category breakdowns, a six-month rollup ending
/// at `as_of` (default: today), and the five most recent transactions.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/dashboard",
    tag = "dashboard",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        ("as_of" = Option<NaiveDate>, Query, description = "Reference date for the rollup (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Dashboard retrieved successfully", body = ApiResponse<DashboardSummary>),
        (status = 400, description = "Malformed as_of date", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_dashboard(
    Path(user_id): Path<i32>,
    Query(query): Query<DashboardQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardSummary>>, StatusCode> {
    let user_found = model::entities::user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await
        .map_err(|db_error| {
            error!("Failed to look up user {}: {}", user_id, db_error);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    if user_found.is_none() {
        warn!("User {} not found for dashboard", user_id);
        return Err(StatusCode::NOT_FOUND);
    }

    let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());
    debug!("Building dashboard for user {} as of {}", user_id, as_of);

    match build_dashboard(&state.db, user_id, as_of).await {
        Ok(summary) => Ok(Json(ApiResponse {
            data: summary,
            message: "Dashboard retrieved successfully".to_string(),
            success: true,
        })),
        Err(compute_error) => {
            error!("Failed to build dashboard for user {}: {}", user_id, compute_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
