//! Fixed-price provider, the terminal rung of a fallback chain.
//!
//! Never touches the network and never fails, so a chain ending in one is
//! guaranteed to resolve. Useful for retailers without a scrapeable page
//! yet, and in tests.

use crate::config::RetailerConfig;
use crate::error::FetchFailure;
use crate::offer::Offer;
use crate::providers::{render_search_url, PriceProvider};
use async_trait::async_trait;

/// Adapter that always returns one offer at a configured price.
pub struct ConstantProvider {
    retailer: String,
    shipping: String,
    search_url: String,
    price: u64,
}

impl ConstantProvider {
    pub fn new(retailer: &RetailerConfig, price: u64) -> Self {
        Self {
            retailer: retailer.name.clone(),
            shipping: retailer.shipping_note.clone(),
            search_url: retailer.search_url.clone(),
            price,
        }
    }
}

#[async_trait]
impl PriceProvider for ConstantProvider {
    async fn fetch(&self, query: &str) -> Result<Vec<Offer>, FetchFailure> {
        let url = render_search_url(&self.search_url, query);
        Ok(vec![Offer::priced(&self.retailer, self.price, &self.shipping, url)])
    }

    fn name(&self) -> &str {
        "constant"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_retailer() -> RetailerConfig {
        RetailerConfig {
            name: "Flipkart".to_string(),
            search_url: "https://www.flipkart.com/search?q={query}".to_string(),
            shipping_note: "See on Flipkart".to_string(),
            estimate_on_exhaustion: true,
            adapters: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_fetch_returns_fixed_price() {
        let provider = ConstantProvider::new(&make_retailer(), 2499);
        let offers = provider.fetch("wireless mouse").await.unwrap();

        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].price, Some(2499));
        assert_eq!(offers[0].retailer, "Flipkart");
        assert_eq!(offers[0].status, "In Stock");
        assert_eq!(offers[0].url, "https://www.flipkart.com/search?q=wireless%20mouse");
        assert!(!offers[0].estimated);
    }

    #[tokio::test]
    async fn test_fetch_never_fails() {
        let provider = ConstantProvider::new(&make_retailer(), 0);
        assert!(provider.fetch("").await.is_ok());
    }

    #[test]
    fn test_provider_name() {
        let provider = ConstantProvider::new(&make_retailer(), 1);
        assert_eq!(provider.name(), "constant");
    }
}
