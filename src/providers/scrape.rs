//! Provider that scrapes a retailer's public search page.
//!
//! Requests go out with browser TLS fingerprint emulation and matching
//! headers. The price is taken from the first element matching the
//! configured CSS selector; selectors are validated at construction so a
//! typo fails at startup rather than on every request.

use crate::config::{AdapterConfig, RetailerConfig};
use crate::error::{ConfigError, FetchFailure};
use crate::offer::Offer;
use crate::price;
use crate::providers::{render_search_url, url_origin, PriceProvider};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;
use wreq::Client;
use wreq_util::Emulation;

/// Adapter that extracts a price from retailer search-page HTML.
pub struct ScrapeProvider {
    client: Client,
    retailer: String,
    shipping: String,
    /// `{query}` URL template for the page to scrape.
    url_template: String,
    price_selector: Selector,
    link_selector: Option<Selector>,
}

impl ScrapeProvider {
    pub fn from_config(
        retailer: &RetailerConfig,
        adapter: &AdapterConfig,
    ) -> Result<Self, ConfigError> {
        let AdapterConfig::Scrape { url, price_selector, link_selector, timeout_secs } = adapter
        else {
            unreachable!("build_provider dispatches on adapter kind");
        };

        let parse_selector = |raw: &str| {
            Selector::parse(raw).map_err(|_| ConfigError::InvalidSelector {
                retailer: retailer.name.clone(),
                selector: raw.to_string(),
            })
        };

        let price_selector = parse_selector(price_selector)?;
        let link_selector = link_selector.as_deref().map(parse_selector).transpose()?;

        let client = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
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
            url_template: url.clone().unwrap_or_else(|| retailer.search_url.clone()),
            price_selector,
            link_selector,
        })
    }

    async fn get(&self, url: &str) -> Result<String, FetchFailure> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8")
            .header("Accept-Language", "en-IN,en;q=0.9")
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache")
            .header("Sec-Ch-Ua", "\"Chromium\";v=\"131\", \"Not_A Brand\";v=\"24\"")
            .header("Sec-Ch-Ua-Mobile", "?0")
            .header("Sec-Ch-Ua-Platform", "\"macOS\"")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Sec-Fetch-User", "?1")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await
            .map_err(|e| FetchFailure::SourceUnavailable(e.to_string()))?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(FetchFailure::SourceUnavailable(format!("status {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| FetchFailure::SourceUnavailable(e.to_string()))
    }

    /// Extracts the price and product link from the page. Separate from the
    /// async path because `Html` is not `Send` and must not live across an
    /// await point.
    fn extract(&self, html: &str, page_url: &str) -> Result<(u64, String), FetchFailure> {
        let document = Html::parse_document(html);

        let text = document
            .select(&self.price_selector)
            .next()
            .map(|el| el.text().collect::<String>())
            .ok_or(FetchFailure::NoUsablePrice)?;

        let value = price::parse_text(&text).ok_or(FetchFailure::NoUsablePrice)?;

        let link = self
            .link_selector
            .as_ref()
            .and_then(|sel| document.select(sel).next())
            .and_then(|el| el.value().attr("href"))
            .map(|href| {
                if href.starts_with('/') {
                    format!("{}{}", url_origin(page_url), href)
                } else {
                    href.to_string()
                }
            })
            .unwrap_or_else(|| page_url.to_string());

        Ok((value, link))
    }
}

#[async_trait]
impl PriceProvider for ScrapeProvider {
    async fn fetch(&self, query: &str) -> Result<Vec<Offer>, FetchFailure> {
        let url = render_search_url(&self.url_template, query);
        let html = self.get(&url).await?;

        let (value, link) = self.extract(&html, &url)?;
        Ok(vec![Offer::priced(&self.retailer, value, &self.shipping, link)])
    }

    fn name(&self) -> &str {
        "scrape"
    }
}
