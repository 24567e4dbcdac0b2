//! The offer data model: one retailer's priced result for a query.

use serde::{Deserialize, Serialize};

/// One retailer's result for a query.
///
/// An offer is constructed once by an adapter (or the estimator), passed by
/// value through the chain and aggregator, and never mutated afterwards
/// except for the aggregator's final `best` assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    /// Retailer identifier (e.g., "Amazon", "Flipkart").
    pub retailer: String,
    /// Price in the local currency's display unit (rupees, not paise).
    /// `None` means the price is unknown.
    pub price: Option<u64>,
    /// Availability label (e.g., "In Stock", "Price unavailable").
    pub status: String,
    /// Free-text shipping note, shown as-is.
    pub shipping: String,
    /// Link to the offer; a provider link or a constructed search URL,
    /// never empty.
    pub url: String,
    /// True if the price was synthesized rather than fetched.
    #[serde(default)]
    pub estimated: bool,
    /// True for the cheapest offer(s) of the run. Assigned only by the
    /// aggregator, exactly once per run.
    #[serde(default)]
    pub best: bool,
}

impl Offer {
    /// Creates an offer with a fetched price.
    pub fn priced(
        retailer: impl Into<String>,
        price: u64,
        shipping: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            retailer: retailer.into(),
            price: Some(price),
            status: "In Stock".to_string(),
            shipping: shipping.into(),
            url: url.into(),
            estimated: false,
            best: false,
        }
    }

    /// Creates an offer for an item that was found but carries no price.
    pub fn unpriced(
        retailer: impl Into<String>,
        shipping: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            retailer: retailer.into(),
            price: None,
            status: "Price unavailable".to_string(),
            shipping: shipping.into(),
            url: url.into(),
            estimated: false,
            best: false,
        }
    }

    /// Creates an offer with a synthesized price.
    pub fn estimated(
        retailer: impl Into<String>,
        price: u64,
        shipping: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            retailer: retailer.into(),
            price: Some(price),
            status: "In Stock".to_string(),
            shipping: shipping.into(),
            url: url.into(),
            estimated: true,
            best: false,
        }
    }
}
