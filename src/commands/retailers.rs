//! Retailers command implementation.

use crate::config::{AdapterConfig, Config};
use anyhow::Result;

/// Lists the configured retailers and their adapter chains.
pub struct RetailersCommand {
    config: Config,
}

impl RetailersCommand {
    /// Creates a new retailers command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Returns a listing of every retailer and its adapters, in query order.
    pub fn execute(&self) -> Result<String> {
        let mut lines = Vec::new();

        for retailer in &self.config.retailers {
            lines.push(format!("{}  ({})", retailer.name, retailer.search_url));

            for (i, adapter) in retailer.adapters.iter().enumerate() {
                let desc = match adapter {
                    AdapterConfig::Structured { endpoint, .. } => {
                        format!("structured  {}", endpoint)
                    }
                    AdapterConfig::Scrape { price_selector, .. } => {
                        format!("scrape      {}", price_selector)
                    }
                    AdapterConfig::Constant { price } => format!("constant    {}", price),
                };
                lines.push(format!("  {}. {}", i + 1, desc));
            }

            if retailer.estimate_on_exhaustion {
                lines.push("     estimates price when exhausted".to_string());
            }
            lines.push(String::new());
        }

        lines.push(format!("Total: {} retailers", self.config.retailers.len()));

        Ok(lines.join("\n"))
    }
}
