//! CLI command implementations.

pub mod query;
pub mod retailers;

pub use query::QueryCommand;
pub use retailers::RetailersCommand;
