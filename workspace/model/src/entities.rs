//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the bookkeeping application here:
//! users, their categories, their transaction ledger and their
//! monthly per-category budgets.

pub mod budget;
pub mod category;
pub mod transaction;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::budget::Entity as Budget;
    pub use super::category::Entity as Category;
    pub use super::transaction::Entity as Transaction;
    pub use super::user::Entity as User;
}
