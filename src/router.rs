use crate::handlers::{
    budgets::{
        create_budget, delete_budget, get_budget, get_budget_summary, get_budgets, update_budget,
    },
    categories::{
        create_category, delete_category, get_categories, get_category, update_category,
    },
    dashboard::get_dashboard,
    health::health_check,
    transactions::{
        create_transaction, delete_transaction, get_transaction, get_transactions,
        update_transaction,
    },
    users::{create_user, delete_user, get_user, get_users, update_user},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // User CRUD routes
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id", put(update_user))
        .route("/api/v1/users/:user_id", delete(delete_user))
        // Category CRUD routes
        .route("/api/v1/users/:user_id/categories", post(create_category))
        .route("/api/v1/users/:user_id/categories", get(get_categories))
        .route("/api/v1/users/:user_id/categories/:category_id", get(get_category))
        .route("/api/v1/users/:user_id/categories/:category_id", put(update_category))
        .route("/api/v1/users/:user_id/categories/:category_id", delete(delete_category))
        // Transaction CRUD routes
        .route("/api/v1/users/:user_id/transactions", post(create_transaction))
        .route("/api/v1/users/:user_id/transactions", get(get_transactions))
        .route("/api/v1/users/:user_id/transactions/:transaction_id", get(get_transaction))
        .route("/api/v1/users/:user_id/transactions/:transaction_id", put(update_transaction))
        .route("/api/v1/users/:user_id/transactions/:transaction_id", delete(delete_transaction))
        // Budget CRUD and summary routes
        .route("/api/v1/users/:user_id/budgets", post(create_budget))
        .route("/api/v1/users/:user_id/budgets", get(get_budgets))
        .route("/api/v1/users/:user_id/budgets/summary", get(get_budget_summary))
        .route("/api/v1/users/:user_id/budgets/:budget_id", get(get_budget))
        .route("/api/v1/users/:user_id/budgets/:budget_id", put(update_budget))
        .route("/api/v1/users/:user_id/budgets/:budget_id", delete(delete_budget))
        // Dashboard
        .route("/api/v1/users/:user_id/dashboard", get(get_dashboard))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
