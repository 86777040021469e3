pub mod entities;
pub mod ledger;

// Re-export tracing for use in this crate
pub use tracing;
