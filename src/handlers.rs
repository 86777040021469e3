pub mod budgets;
pub mod categories;
pub mod dashboard;
pub mod health;
pub mod transactions;
pub mod users;
