//! Provider for JSON search APIs (Rainforest-style).
//!
//! Issues one search request and trusts the provider's own ranking: the
//! first entry in the result array is the offer. If the search entry
//! carries no parseable price and a detail endpoint is configured, exactly
//! one secondary request is made, keyed by the entry's product id. The
//! cheap path always goes first to bound outbound request volume.

use crate::config::{AdapterConfig, RetailerConfig};
use crate::error::{ConfigError, FetchFailure};
use crate::offer::Offer;
use crate::price;
use crate::providers::{render_search_url, PriceProvider};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use wreq::Client;

/// Adapter for a structured JSON search endpoint.
pub struct StructuredApiProvider {
    client: Client,
    retailer: String,
    shipping: String,
    /// Rendered search URL with all fixed params and the credential; only
    /// the search term is appended per request.
    endpoint: String,
    query_param: String,
    results_pointer: String,
    detail_endpoint: Option<String>,
    id_key: String,
    /// Offer link used when the entry has no link of its own.
    fallback_url: String,
}

impl StructuredApiProvider {
    /// Builds the provider, resolving the API credential from the
    /// environment. An unset credential env var is fatal here so
    /// misconfiguration never degrades into silent per-request omission.
    pub fn from_config(
        retailer: &RetailerConfig,
        adapter: &AdapterConfig,
    ) -> Result<Self, ConfigError> {
        let AdapterConfig::Structured {
            endpoint,
            api_key_env,
            api_key_param,
            query_param,
            params,
            results_pointer,
            detail_endpoint,
            id_key,
            timeout_secs,
        } = adapter
        else {
            unreachable!("build_provider dispatches on adapter kind");
        };

        let mut pairs: Vec<(String, String)> =
            params.iter().map(|(k, v)| (k.clone(), v.clone())).collect();

        if let Some(var) = api_key_env {
            let key = std::env::var(var)
                .map_err(|_| ConfigError::MissingCredential(var.clone()))?;
            pairs.push((api_key_param.clone(), key));
        }

        let mut endpoint = endpoint.clone();
        for (k, v) in &pairs {
            // The configured endpoint may already carry a query string.
            let sep = if endpoint.contains('?') { '&' } else { '?' };
            endpoint.push(sep);
            endpoint.push_str(&urlencoding::encode(k));
            endpoint.push('=');
            endpoint.push_str(&urlencoding::encode(v));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(*timeout_secs))
            .connect_timeout(Duration::from_secs((*timeout_secs).min(10)))
            .build()
            .map_err(|e| ConfigError::Io {
                path: retailer.name.clone(),
                source: std::io::Error::other(e),
            })?;

        Ok(Self {
            client,
            retailer: retailer.name.clone(),
            shipping: retailer.shipping_note.clone(),
            endpoint,
            query_param: query_param.clone(),
            results_pointer: results_pointer.clone(),
            detail_endpoint: detail_endpoint.clone(),
            id_key: id_key.clone(),
            fallback_url: retailer.search_url.clone(),
        })
    }

    async fn get_json(&self, url: &str) -> Result<Value, FetchFailure> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchFailure::SourceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::SourceUnavailable(format!("status {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchFailure::SourceUnavailable(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| FetchFailure::UnparseableResponse(e.to_string()))
    }

    /// Secondary lookup when the search entry omits the price. Probes the
    /// detail body directly, then under its `product` key.
    async fn detail_price(&self, id: &str) -> Option<u64> {
        let template = self.detail_endpoint.as_deref()?;
        let url = template.replace("{id}", &urlencoding::encode(id));

        match self.get_json(&url).await {
            Ok(detail) => {
                price::parse(&detail).or_else(|| detail.get("product").and_then(price::parse))
            }
            Err(failure) => {
                warn!("{}: detail lookup for {} failed: {}", self.retailer, id, failure);
                None
            }
        }
    }
}

#[async_trait]
impl PriceProvider for StructuredApiProvider {
    async fn fetch(&self, query: &str) -> Result<Vec<Offer>, FetchFailure> {
        let sep = if self.endpoint.contains('?') { '&' } else { '?' };
        let url = format!(
            "{}{}{}={}",
            self.endpoint,
            sep,
            self.query_param,
            urlencoding::encode(query)
        );

        let body = self.get_json(&url).await?;

        let results = body
            .pointer(&self.results_pointer)
            .and_then(Value::as_array)
            .ok_or_else(|| {
                FetchFailure::UnparseableResponse(format!(
                    "no result array at {}",
                    self.results_pointer
                ))
            })?;

        let Some(first) = results.first() else {
            debug!("{}: empty result set for {:?}", self.retailer, query);
            return Ok(Vec::new());
        };

        let link = first
            .get("link")
            .or_else(|| first.get("url"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| render_search_url(&self.fallback_url, query));

        let mut found = price::parse(first);

        if found.is_none() {
            if let Some(id) = first.get(&self.id_key).and_then(Value::as_str) {
                found = self.detail_price(id).await;
            }
        }

        let offer = match found {
            Some(value) => Offer::priced(&self.retailer, value, &self.shipping, link),
            None => Offer::unpriced(&self.retailer, &self.shipping, link),
        };

        Ok(vec![offer])
    }

    fn name(&self) -> &str {
        "structured"
    }
}
