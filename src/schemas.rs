use chrono::NaiveDate;
use common::{BudgetStatus, DashboardSummary, MonthlyTotals, TransactionDto};
use model::entities::transaction::TransactionKind;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
}

/// Query parameters for the budget summary endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct BudgetSummaryQuery {
    /// Month to summarize (1-12)
    pub month: Option<u32>,
    /// Year to summarize (e.g., 2024)
    pub year: Option<i32>,
}

/// Query parameters for the dashboard endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct DashboardQuery {
    /// Reference date for the monthly rollup (YYYY-MM-DD, defaults to today)
    pub as_of: Option<NaiveDate>,
}

/// Query parameters for listing transactions
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransactionListQuery {
    /// Restrict to one kind (income or expense)
    pub kind: Option<TransactionKind>,
    /// Restrict to one category
    pub category_id: Option<i32>,
    /// Earliest date to include (YYYY-MM-DD)
    pub start_date: Option<NaiveDate>,
    /// Latest date to include (YYYY-MM-DD)
    pub end_date: Option<NaiveDate>,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::categories::create_category,
        crate::handlers::categories::get_categories,
        crate::handlers::categories::get_category,
        crate::handlers::categories::update_category,
        crate::handlers::categories::delete_category,
        crate::handlers::transactions::create_transaction,
        crate::handlers::transactions::get_transactions,
        crate::handlers::transactions::get_transaction,
        crate::handlers::transactions::update_transaction,
        crate::handlers::transactions::delete_transaction,
        crate::handlers::budgets::create_budget,
        crate::handlers::budgets::get_budgets,
        crate::handlers::budgets::get_budget,
        crate::handlers::budgets::update_budget,
        crate::handlers::budgets::delete_budget,
        crate::handlers::budgets::get_budget_summary,
        crate::handlers::dashboard::get_dashboard,
    ),
    components(
        schemas(
            ApiResponse<DashboardSummary>,
            ApiResponse<Vec<BudgetStatus>>,
            ErrorResponse,
            HealthResponse,
            BudgetSummaryQuery,
            DashboardQuery,
            TransactionListQuery,
            DashboardSummary,
            MonthlyTotals,
            BudgetStatus,
            TransactionDto,
            TransactionKind,
            crate::handlers::users::CreateUserRequest,
            crate::handlers::users::UpdateUserRequest,
            crate::handlers::users::UserResponse,
            crate::handlers::categories::CreateCategoryRequest,
            crate::handlers::categories::UpdateCategoryRequest,
            crate::handlers::categories::CategoryResponse,
            crate::handlers::transactions::CreateTransactionRequest,
            crate::handlers::transactions::UpdateTransactionRequest,
            crate::handlers::budgets::CreateBudgetRequest,
            crate::handlers::budgets::UpdateBudgetRequest,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User management endpoints"),
        (name = "categories", description = "Category management endpoints"),
        (name = "transactions", description = "Transaction ledger endpoints"),
        (name = "budgets", description = "Budget and budget summary endpoints"),
        (name = "dashboard", description = "Dashboard reporting endpoints"),
    ),
    info(
        title = "FinBook API",
        description = "Personal bookkeeping API - budgets, transactions and dashboard reporting",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
