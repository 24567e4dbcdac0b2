//! Query command implementation.

use crate::aggregator::Aggregator;
use crate::config::Config;
use crate::format::Formatter;
use anyhow::{Context, Result};
use tracing::info;

/// Executes a price query across all configured retailers.
pub struct QueryCommand {
    config: Config,
}

impl QueryCommand {
    /// Creates a new query command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the query and returns formatted output.
    pub async fn execute(&self, query: &str) -> Result<String> {
        let aggregator =
            Aggregator::from_config(&self.config).context("Failed to build retailer chains")?;

        self.execute_with_aggregator(&aggregator, query).await
    }

    /// Executes the query with a provided aggregator (for testing).
    pub async fn execute_with_aggregator(
        &self,
        aggregator: &Aggregator,
        query: &str,
    ) -> Result<String> {
        let query = query.trim();
        if query.is_empty() {
            anyhow::bail!("Query must not be empty");
        }

        info!("Querying prices for: {}", query);

        let offers = aggregator.aggregate(query).await;

        info!("Collected {} offers", offers.len());

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_offers(&offers))
    }
}
