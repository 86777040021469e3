use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use model::entities::{category, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for creating a category
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCategoryRequest {
    /// Category name
    pub name: String,
    /// Optional free-form description
    pub description: Option<String>,
}

/// Request body for updating a category
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateCategoryRequest {
    /// Category name
    pub name: Option<String>,
    /// Optional free-form description
    pub description: Option<String>,
}

/// Category response model
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl From<category::Model> for CategoryResponse {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            name: model.name,
            description: model.description,
        }
    }
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

/// Finds a category scoped to one owner, so one user can never address
/// another user's rows by id.
async fn find_owned_category(
    state: &AppState,
    user_id: i32,
    category_id: i32,
) -> Result<Option<category::Model>, StatusCode> {
    category::Entity::find_by_id(category_id)
        .filter(category::Column::OwnerId.eq(user_id))
        .one(&state.db)
        .await
        .map_err(|db_error| {
            error!("Failed to look up category {}: {}", category_id, db_error);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Create a new category
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/categories",
    tag = "categories",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
    ),
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created successfully", body = ApiResponse<CategoryResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_category(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponse>>), StatusCode> {
    debug!("Creating category '{}' for user {}", request.name, user_id);

    if !owner_exists(&state, user_id).await? {
        warn!("User {} not found while creating category", user_id);
        return Err(StatusCode::NOT_FOUND);
    }

    let new_category = category::ActiveModel {
        owner_id: Set(user_id),
        name: Set(request.name),
        description: Set(request.description),
        ..Default::default()
    };

    match new_category.insert(&state.db).await {
        Ok(category_model) => {
            info!("Category created with ID: {}", category_model.id);
            let response = ApiResponse {
                data: CategoryResponse::from(category_model),
                message: "Category created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!("Failed to create category: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get all categories for a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/categories",
    tag = "categories",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
    ),
    responses(
        (status = 200, description = "Categories retrieved successfully", body = ApiResponse<Vec<CategoryResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_categories(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CategoryResponse>>>, StatusCode> {
    match category::Entity::find()
        .filter(category::Column::OwnerId.eq(user_id))
        .order_by_asc(category::Column::Id)
        .all(&state.db)
        .await
    {
        Ok(categories) => {
            debug!("Retrieved {} categories for user {}", categories.len(), user_id);
            let response = ApiResponse {
                data: categories.into_iter().map(CategoryResponse::from).collect(),
                message: "Categories retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve categories for user {}: {}", user_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific category
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/categories/{category_id}",
    tag = "categories",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        ("category_id" = i32, Path, description = "Category ID"),
    ),
    responses(
        (status = 200, description = "Category retrieved successfully", body = ApiResponse<CategoryResponse>),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_category(
    Path((user_id, category_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CategoryResponse>>, StatusCode> {
    match find_owned_category(&state, user_id, category_id).await? {
        Some(category_model) => {
            let response = ApiResponse {
                data: CategoryResponse::from(category_model),
                message: "Category retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        None => {
            warn!("Category {} not found for user {}", category_id, user_id);
            Err(StatusCode::NOT_FOUND)
        }
    }
}

/// Update a category
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/categories/{category_id}",
    tag = "categories",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        ("category_id" = i32, Path, description = "Category ID"),
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated successfully", body = ApiResponse<CategoryResponse>),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_category(
    Path((user_id, category_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<ApiResponse<CategoryResponse>>, StatusCode> {
    let Some(existing) = find_owned_category(&state, user_id, category_id).await? else {
        warn!("Category {} not found for user {}", category_id, user_id);
        return Err(StatusCode::NOT_FOUND);
    };

    let mut category_active: category::ActiveModel = existing.into();
    if let Some(name) = request.name {
        category_active.name = Set(name);
    }
    if let Some(description) = request.description {
        category_active.description = Set(Some(description));
    }

    match category_active.update(&state.db).await {
        Ok(updated) => {
            info!("Category {} updated", category_id);
            let response = ApiResponse {
                data: CategoryResponse::from(updated),
                message: "Category updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to update category {}: {}", category_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete a category
///
/// Transactions in the category are kept with their category cleared;
/// budgets for the category are deleted along with it.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/categories/{category_id}",
    tag = "categories",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        ("category_id" = i32, Path, description = "Category ID"),
    ),
    responses(
        (status = 200, description = "Category deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_category(
    Path((user_id, category_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    let Some(existing) = find_owned_category(&state, user_id, category_id).await? else {
        warn!("Category {} not found for user {}", category_id, user_id);
        return Err(StatusCode::NOT_FOUND);
    };

    match category::Entity::delete_by_id(existing.id).exec(&state.db).await {
        Ok(_) => {
            info!("Category {} deleted", category_id);
            let response = ApiResponse {
                data: format!("Category {} deleted", category_id),
                message: "Category deleted successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to delete category {}: {}", category_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
