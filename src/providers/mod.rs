//! Price providers: uniform capability over heterogeneous external sources.
//!
//! Every external source sits behind [`PriceProvider`]. Adapters absorb all
//! externally-triggered conditions (timeouts, bad status codes, malformed
//! bodies) into a [`FetchFailure`] value; nothing a remote source does can
//! raise past the fallback chain.

pub mod constant;
pub mod scrape;
pub mod structured;

pub use constant::ConstantProvider;
pub use scrape::ScrapeProvider;
pub use structured::StructuredApiProvider;

use crate::config::{AdapterConfig, RetailerConfig};
use crate::error::{ConfigError, FetchFailure};
use crate::offer::Offer;
use async_trait::async_trait;

/// Capability contract for a single external price source.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetches offers for a query. An `Ok` list may be empty (nothing
    /// found) and its first offer may be unpriced; both mean "try the next
    /// adapter" to the chain.
    async fn fetch(&self, query: &str) -> Result<Vec<Offer>, FetchFailure>;

    /// Short adapter name for diagnostics.
    fn name(&self) -> &str;
}

/// Builds a provider from its configuration. Missing credentials and
/// invalid selectors surface here, at startup.
pub fn build_provider(
    retailer: &RetailerConfig,
    adapter: &AdapterConfig,
) -> Result<Box<dyn PriceProvider>, ConfigError> {
    match adapter {
        AdapterConfig::Structured { .. } => {
            Ok(Box::new(StructuredApiProvider::from_config(retailer, adapter)?))
        }
        AdapterConfig::Scrape { .. } => {
            Ok(Box::new(ScrapeProvider::from_config(retailer, adapter)?))
        }
        AdapterConfig::Constant { price } => {
            Ok(Box::new(ConstantProvider::new(retailer, *price)))
        }
    }
}

/// Expands a `{query}` URL template with the percent-encoded query.
pub(crate) fn render_search_url(template: &str, query: &str) -> String {
    template.replace("{query}", &urlencoding::encode(query))
}

/// Returns the scheme://host part of a URL, for resolving relative links.
pub(crate) fn url_origin(url: &str) -> String {
    match url.find("://") {
        Some(scheme_end) => {
            let rest = &url[scheme_end + 3..];
            match rest.find('/') {
                Some(path_start) => url[..scheme_end + 3 + path_start].to_string(),
                None => url.to_string(),
            }
        }
        None => url.to_string(),
    }
}
