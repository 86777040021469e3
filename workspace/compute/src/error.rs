use thiserror::Error;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A month/year pair that does not name a calendar month
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// A referenced row (category, budget) is absent
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
