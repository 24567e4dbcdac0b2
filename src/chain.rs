//! Ordered fallback across a retailer's adapters.
//!
//! Adapters run strictly in configured order and the chain stops at the
//! first one that yields a priced offer. Adapter failures are logged and
//! absorbed here; a chain can end exhausted but it cannot error.

use crate::config::RetailerConfig;
use crate::error::ConfigError;
use crate::estimator;
use crate::offer::Offer;
use crate::providers::{build_provider, render_search_url, PriceProvider};
use tracing::{debug, warn};

/// Result of walking a retailer's adapters.
#[derive(Debug)]
pub enum ChainOutcome {
    /// An adapter produced a priced offer.
    Resolved(Offer),
    /// Every adapter failed or came back without a usable price.
    Exhausted,
}

/// All adapters for one retailer, tried in order.
pub struct FallbackChain {
    retailer: String,
    search_url: String,
    shipping: String,
    estimate_on_exhaustion: bool,
    adapters: Vec<Box<dyn PriceProvider>>,
}

impl FallbackChain {
    /// Builds the chain from a retailer's configuration. Template and
    /// adapter problems are fatal here so a broken retailer never reaches
    /// query time.
    pub fn from_config(retailer: &RetailerConfig) -> Result<Self, ConfigError> {
        if !retailer.search_url.contains("{query}") {
            return Err(ConfigError::InvalidTemplate {
                retailer: retailer.name.clone(),
                template: retailer.search_url.clone(),
                placeholder: "{query}",
            });
        }

        if retailer.adapters.is_empty() {
            return Err(ConfigError::EmptyChain(retailer.name.clone()));
        }

        let adapters = retailer
            .adapters
            .iter()
            .map(|adapter| build_provider(retailer, adapter))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            retailer: retailer.name.clone(),
            search_url: retailer.search_url.clone(),
            shipping: retailer.shipping_note.clone(),
            estimate_on_exhaustion: retailer.estimate_on_exhaustion,
            adapters,
        })
    }

    /// Assembles a chain from parts. Used by tests with mock providers.
    pub fn new(
        retailer: impl Into<String>,
        search_url: impl Into<String>,
        shipping: impl Into<String>,
        estimate_on_exhaustion: bool,
        adapters: Vec<Box<dyn PriceProvider>>,
    ) -> Self {
        Self {
            retailer: retailer.into(),
            search_url: search_url.into(),
            shipping: shipping.into(),
            estimate_on_exhaustion,
            adapters,
        }
    }

    pub fn retailer(&self) -> &str {
        &self.retailer
    }

    pub fn estimates_on_exhaustion(&self) -> bool {
        self.estimate_on_exhaustion
    }

    pub fn adapter_names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// Walks the adapters in order, returning the first priced offer.
    /// Empty result lists and unpriced offers fall through to the next
    /// adapter, same as failures.
    pub async fn resolve(&self, query: &str) -> ChainOutcome {
        for adapter in &self.adapters {
            match adapter.fetch(query).await {
                Ok(offers) => match offers.into_iter().next() {
                    Some(offer) if offer.price.is_some() => {
                        debug!("{}: {} adapter resolved at {:?}", self.retailer, adapter.name(), offer.price);
                        return ChainOutcome::Resolved(offer);
                    }
                    Some(_) => {
                        debug!("{}: {} adapter found item without a price", self.retailer, adapter.name());
                    }
                    None => {
                        debug!("{}: {} adapter found nothing", self.retailer, adapter.name());
                    }
                },
                Err(failure) => {
                    warn!("{}: {} adapter failed: {}", self.retailer, adapter.name(), failure);
                }
            }
        }

        ChainOutcome::Exhausted
    }

    /// Synthetic offer for an exhausted chain, if this retailer opted in.
    /// `anchor` is a real price from another retailer, when one exists.
    pub fn fallback_offer(&self, query: &str, anchor: Option<u64>) -> Option<Offer> {
        if !self.estimate_on_exhaustion {
            return None;
        }

        let price = estimator::estimate(anchor, query);
        let url = render_search_url(&self.search_url, query);
        Some(Offer::estimated(&self.retailer, price, &self.shipping, url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdapterConfig;
    use crate::error::FetchFailure;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Scripted provider: returns a fixed outcome and counts calls.
    struct ScriptedProvider {
        outcome: Result<Vec<Offer>, FetchFailure>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedProvider {
        fn new(outcome: Result<Vec<Offer>, FetchFailure>) -> (Box<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (Box::new(Self { outcome, calls: calls.clone() }), calls)
        }
    }

    #[async_trait]
    impl PriceProvider for ScriptedProvider {
        async fn fetch(&self, _query: &str) -> Result<Vec<Offer>, FetchFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.outcome {
                Ok(offers) => Ok(offers.clone()),
                Err(FetchFailure::SourceUnavailable(m)) => {
                    Err(FetchFailure::SourceUnavailable(m.clone()))
                }
                Err(FetchFailure::UnparseableResponse(m)) => {
                    Err(FetchFailure::UnparseableResponse(m.clone()))
                }
                Err(FetchFailure::NoUsablePrice) => Err(FetchFailure::NoUsablePrice),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn priced(price: u64) -> Vec<Offer> {
        vec![Offer::priced("Shop", price, "Standard", "https://shop.example/s?q=x")]
    }

    fn make_chain(adapters: Vec<Box<dyn PriceProvider>>, estimate: bool) -> FallbackChain {
        FallbackChain::new("Shop", "https://shop.example/s?q={query}", "Standard", estimate, adapters)
    }

    #[tokio::test]
    async fn test_resolve_first_adapter_wins() {
        let (first, first_calls) = ScriptedProvider::new(Ok(priced(999)));
        let (second, second_calls) = ScriptedProvider::new(Ok(priced(1)));

        let chain = make_chain(vec![first, second], false);
        let outcome = chain.resolve("mouse").await;

        match outcome {
            ChainOutcome::Resolved(offer) => assert_eq!(offer.price, Some(999)),
            ChainOutcome::Exhausted => panic!("expected a resolved offer"),
        }
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        // Short-circuit: the cheaper second adapter is never consulted.
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_failure_falls_through() {
        let (first, _) =
            ScriptedProvider::new(Err(FetchFailure::SourceUnavailable("timeout".to_string())));
        let (second, second_calls) = ScriptedProvider::new(Ok(priced(750)));

        let chain = make_chain(vec![first, second], false);
        let outcome = chain.resolve("mouse").await;

        match outcome {
            ChainOutcome::Resolved(offer) => assert_eq!(offer.price, Some(750)),
            ChainOutcome::Exhausted => panic!("expected the second adapter to resolve"),
        }
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolve_empty_and_unpriced_fall_through() {
        let (empty, _) = ScriptedProvider::new(Ok(Vec::new()));
        let (unpriced, _) = ScriptedProvider::new(Ok(vec![Offer::unpriced(
            "Shop",
            "Standard",
            "https://shop.example",
        )]));
        let (last, _) = ScriptedProvider::new(Ok(priced(499)));

        let chain = make_chain(vec![empty, unpriced, last], false);
        match chain.resolve("mouse").await {
            ChainOutcome::Resolved(offer) => assert_eq!(offer.price, Some(499)),
            ChainOutcome::Exhausted => panic!("expected resolution from the last adapter"),
        }
    }

    #[tokio::test]
    async fn test_resolve_exhausted() {
        let (first, _) = ScriptedProvider::new(Err(FetchFailure::NoUsablePrice));
        let (second, _) = ScriptedProvider::new(Ok(Vec::new()));

        let chain = make_chain(vec![first, second], false);
        assert!(matches!(chain.resolve("mouse").await, ChainOutcome::Exhausted));
    }

    #[test]
    fn test_fallback_offer_disabled() {
        let chain = make_chain(Vec::new(), false);
        assert!(chain.fallback_offer("mouse", Some(100)).is_none());
    }

    #[test]
    fn test_fallback_offer_anchored_range() {
        let chain = make_chain(Vec::new(), true);

        for _ in 0..50 {
            let offer = chain.fallback_offer("mouse", Some(100)).unwrap();
            let price = offer.price.unwrap();
            assert!((95..=105).contains(&price), "estimate {} outside ±5% of 100", price);
            assert!(offer.estimated);
            assert_eq!(offer.url, "https://shop.example/s?q=mouse");
        }
    }

    #[test]
    fn test_fallback_offer_anchorless_is_deterministic() {
        let chain = make_chain(Vec::new(), true);
        let a = chain.fallback_offer("wireless mouse", None).unwrap();
        let b = chain.fallback_offer("wireless mouse", None).unwrap();
        assert_eq!(a.price, b.price);
    }

    #[test]
    fn test_from_config_rejects_template_without_placeholder() {
        let retailer = RetailerConfig {
            name: "Shop".to_string(),
            search_url: "https://shop.example/search".to_string(),
            shipping_note: "Standard".to_string(),
            estimate_on_exhaustion: false,
            adapters: vec![AdapterConfig::Constant { price: 1 }],
        };

        match FallbackChain::from_config(&retailer) {
            Err(ConfigError::InvalidTemplate { retailer, placeholder, .. }) => {
                assert_eq!(retailer, "Shop");
                assert_eq!(placeholder, "{query}");
            }
            _ => panic!("expected InvalidTemplate"),
        }
    }

    #[test]
    fn test_from_config_rejects_empty_chain() {
        let retailer = RetailerConfig {
            name: "Shop".to_string(),
            search_url: "https://shop.example/s?q={query}".to_string(),
            shipping_note: "Standard".to_string(),
            estimate_on_exhaustion: false,
            adapters: Vec::new(),
        };

        match FallbackChain::from_config(&retailer) {
            Err(ConfigError::EmptyChain(name)) => assert_eq!(name, "Shop"),
            _ => panic!("expected EmptyChain"),
        }
    }

    #[test]
    fn test_from_config_builds_adapters_in_order() {
        let retailer = RetailerConfig {
            name: "Shop".to_string(),
            search_url: "https://shop.example/s?q={query}".to_string(),
            shipping_note: "Standard".to_string(),
            estimate_on_exhaustion: false,
            adapters: vec![
                AdapterConfig::Scrape {
                    url: None,
                    price_selector: ".price".to_string(),
                    link_selector: None,
                    timeout_secs: 5,
                },
                AdapterConfig::Constant { price: 100 },
            ],
        };

        let chain = FallbackChain::from_config(&retailer).unwrap();
        assert_eq!(chain.adapter_names(), vec!["scrape", "constant"]);
        assert_eq!(chain.retailer(), "Shop");
    }
}
