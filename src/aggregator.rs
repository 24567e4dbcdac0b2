//! Fan-out across retailers and assembly of the final offer list.
//!
//! Every retailer's chain runs on its own task under a shared deadline.
//! Results come back in configured retailer order regardless of completion
//! order, so output is stable run to run. Estimation happens here, after
//! the join, because the anchor is the cheapest real price any other
//! retailer produced.

use crate::chain::{ChainOutcome, FallbackChain};
use crate::config::Config;
use crate::error::ConfigError;
use crate::offer::Offer;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

/// Runs all retailer chains for a query and merges their offers.
pub struct Aggregator {
    chains: Vec<Arc<FallbackChain>>,
    deadline: Duration,
}

impl Aggregator {
    /// Builds one chain per configured retailer.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let chains = config
            .retailers
            .iter()
            .map(FallbackChain::from_config)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(chains, Duration::from_millis(config.deadline_ms)))
    }

    pub fn new(chains: Vec<FallbackChain>, deadline: Duration) -> Self {
        Self { chains: chains.into_iter().map(Arc::new).collect(), deadline }
    }

    pub fn chains(&self) -> &[Arc<FallbackChain>] {
        &self.chains
    }

    /// Resolves all chains in parallel and returns the merged offer list,
    /// in configured retailer order, with the cheapest offer(s) marked.
    pub async fn aggregate(&self, query: &str) -> Vec<Offer> {
        info!("Aggregating {} retailers for {:?}", self.chains.len(), query);

        let handles: Vec<_> = self
            .chains
            .iter()
            .map(|chain| {
                let chain = Arc::clone(chain);
                let query = query.to_string();
                let deadline = self.deadline;
                tokio::spawn(async move { timeout(deadline, chain.resolve(&query)).await })
            })
            .collect();

        // Await in spawn order: position i always belongs to retailer i.
        let mut outcomes = Vec::with_capacity(handles.len());
        for (chain, handle) in self.chains.iter().zip(handles) {
            let outcome = match handle.await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(_elapsed)) => {
                    warn!("{}: deadline exceeded", chain.retailer());
                    ChainOutcome::Exhausted
                }
                Err(join_err) => {
                    warn!("{}: chain task failed: {}", chain.retailer(), join_err);
                    ChainOutcome::Exhausted
                }
            };
            outcomes.push(outcome);
        }

        let anchor = outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                ChainOutcome::Resolved(offer) => offer.price,
                ChainOutcome::Exhausted => None,
            })
            .min();

        let mut offers = Vec::with_capacity(outcomes.len());
        for (chain, outcome) in self.chains.iter().zip(outcomes) {
            match outcome {
                ChainOutcome::Resolved(offer) => offers.push(offer),
                ChainOutcome::Exhausted => match chain.fallback_offer(query, anchor) {
                    Some(offer) => {
                        info!("{}: exhausted, using estimated price {:?}", chain.retailer(), offer.price);
                        offers.push(offer);
                    }
                    None => {
                        info!("{}: exhausted, omitted from results", chain.retailer());
                    }
                },
            }
        }

        mark_best(&mut offers);
        offers
    }
}

/// Marks every offer carrying the minimum price. Ties all get the mark;
/// a list with no priced offers gets none.
pub fn mark_best(offers: &mut [Offer]) {
    let Some(min) = offers.iter().filter_map(|o| o.price).min() else {
        return;
    };

    for offer in offers.iter_mut() {
        offer.best = offer.price == Some(min);
    }
}
