//! Configuration management with TOML, environment variables, and CLI overrides.
//!
//! The whole provider topology lives here: which retailers to query, the
//! ordered adapter chain for each, and the per-retailer estimation policy.
//! The config is constructed once at startup and read-only afterwards.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Overall per-request deadline in milliseconds. A chain that has not
    /// finished by then is treated as exhausted.
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Retailers to query, in the order offers should be returned.
    #[serde(default = "default_retailers")]
    pub retailers: Vec<RetailerConfig>,
}

/// One retailer and its ordered adapter chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetailerConfig {
    /// Retailer identifier shown in results (e.g., "Amazon").
    pub name: String,

    /// Search URL template with a `{query}` placeholder. Used as the offer
    /// link when a provider gives no direct link, and for estimated offers.
    pub search_url: String,

    /// Free-text shipping note attached to this retailer's offers.
    #[serde(default = "default_shipping_note")]
    pub shipping_note: String,

    /// Whether to synthesize an estimated price when every adapter fails.
    /// Off by default: an exhausted retailer is omitted from results.
    #[serde(default)]
    pub estimate_on_exhaustion: bool,

    /// Adapters to try, strictly in this order.
    pub adapters: Vec<AdapterConfig>,
}

/// One price source behind the uniform provider contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AdapterConfig {
    /// JSON search API, optionally followed by a detail lookup when the
    /// search response omits the price.
    Structured {
        /// Search endpoint URL (no query string).
        endpoint: String,
        /// Env var holding the API key. Unset var fails at startup.
        #[serde(default)]
        api_key_env: Option<String>,
        /// Query parameter name the API key is passed as.
        #[serde(default = "default_api_key_param")]
        api_key_param: String,
        /// Query parameter name the search term is passed as.
        #[serde(default = "default_query_param")]
        query_param: String,
        /// Additional fixed query parameters.
        #[serde(default)]
        params: BTreeMap<String, String>,
        /// JSON pointer to the result array in the search response.
        #[serde(default = "default_results_pointer")]
        results_pointer: String,
        /// Detail endpoint template with an `{id}` placeholder, queried only
        /// when the search entry has no parseable price.
        #[serde(default)]
        detail_endpoint: Option<String>,
        /// Key of the product id inside a search entry.
        #[serde(default = "default_id_key")]
        id_key: String,
        #[serde(default = "default_structured_timeout")]
        timeout_secs: u64,
    },

    /// HTML search-results page scraped with a fixed CSS selector.
    Scrape {
        /// Page URL template with a `{query}` placeholder. Defaults to the
        /// retailer's `search_url`.
        #[serde(default)]
        url: Option<String>,
        /// Selector for the price element; the first match wins.
        price_selector: String,
        /// Optional selector for the product link.
        #[serde(default)]
        link_selector: Option<String>,
        #[serde(default = "default_scrape_timeout")]
        timeout_secs: u64,
    },

    /// Fixed price source, for synthetic retailers and tests.
    Constant { price: u64 },
}

fn default_deadline_ms() -> u64 {
    25_000
}

fn default_shipping_note() -> String {
    "Standard shipping".to_string()
}

fn default_api_key_param() -> String {
    "api_key".to_string()
}

fn default_query_param() -> String {
    "q".to_string()
}

fn default_results_pointer() -> String {
    "/search_results".to_string()
}

fn default_id_key() -> String {
    "id".to_string()
}

fn default_structured_timeout() -> u64 {
    10
}

fn default_scrape_timeout() -> u64 {
    15
}

fn default_retailers() -> Vec<RetailerConfig> {
    vec![
        RetailerConfig {
            name: "Amazon".to_string(),
            search_url: "https://www.amazon.in/s?k={query}".to_string(),
            shipping_note: "See on Amazon".to_string(),
            estimate_on_exhaustion: false,
            adapters: vec![AdapterConfig::Scrape {
                url: None,
                price_selector: ".a-price-whole".to_string(),
                link_selector: Some("h2 a".to_string()),
                timeout_secs: default_scrape_timeout(),
            }],
        },
        RetailerConfig {
            name: "Flipkart".to_string(),
            search_url: "https://www.flipkart.com/search?q={query}".to_string(),
            shipping_note: "See on Flipkart".to_string(),
            estimate_on_exhaustion: true,
            adapters: vec![AdapterConfig::Scrape {
                url: None,
                price_selector: "._30jeq3".to_string(),
                link_selector: None,
                timeout_secs: default_scrape_timeout(),
            }],
        },
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deadline_ms: default_deadline_ms(),
            format: OutputFormat::Table,
            retailers: default_retailers(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;

        toml::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("price-scout.toml");
        if local_config.exists() {
            debug!("Found price-scout.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("price-scout").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(deadline) = std::env::var("PRICE_SCOUT_DEADLINE_MS") {
            if let Ok(d) = deadline.parse() {
                self.deadline_ms = d;
            }
        }

        if let Ok(format) = std::env::var("PRICE_SCOUT_FORMAT") {
            if let Ok(f) = format.parse() {
                self.format = f;
            }
        }

        self
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
