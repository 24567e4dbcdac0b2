//! price-scout - Multi-retailer price comparison CLI
//!
//! Queries several retailers in parallel, falling back through each
//! retailer's adapter chain until a price resolves, and marks the
//! cheapest offer.

pub mod aggregator;
pub mod chain;
pub mod commands;
pub mod config;
pub mod error;
pub mod estimator;
pub mod format;
pub mod offer;
pub mod price;
pub mod providers;

pub use aggregator::Aggregator;
pub use chain::{ChainOutcome, FallbackChain};
pub use config::{Config, OutputFormat};
pub use error::{ConfigError, FetchFailure};
pub use offer::Offer;
pub use providers::PriceProvider;
