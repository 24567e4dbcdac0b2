//! Error taxonomy for the aggregation engine.
//!
//! Only [`ConfigError`] is fatal, and only at startup. Everything a remote
//! source can do wrong at request time is a [`FetchFailure`]: a value the
//! fallback chain absorbs and logs, never an error that propagates to the
//! aggregation boundary.

use thiserror::Error;

/// Fatal configuration problems, detected when the engine is constructed.
///
/// Raising these at construction time keeps misconfiguration visible
/// immediately instead of manifesting as a silently missing retailer on
/// every request.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A provider requires a credential and the named env var is unset.
    #[error("missing credential: environment variable {0} is not set")]
    MissingCredential(String),

    /// A scrape adapter was configured with a CSS selector that fails to parse.
    #[error("invalid CSS selector {selector:?} for retailer {retailer}")]
    InvalidSelector { retailer: String, selector: String },

    /// A URL template is missing its required placeholder.
    #[error("URL template {template:?} for retailer {retailer} must contain {placeholder:?}")]
    InvalidTemplate { retailer: String, template: String, placeholder: &'static str },

    /// A retailer was configured with no adapters at all.
    #[error("retailer {0} has no adapters configured")]
    EmptyChain(String),

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Why a single adapter attempt produced no usable offer.
///
/// These are diagnostic values, not raised errors: the chain converts every
/// variant into "try the next adapter" and records the reason via `tracing`.
#[derive(Debug, Error)]
pub enum FetchFailure {
    /// Network failure, timeout, or a non-2xx response.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// The body came back but was not the shape we expected.
    #[error("unparseable response: {0}")]
    UnparseableResponse(String),

    /// An item was found but no price field resolved to a value.
    #[error("no usable price in response")]
    NoUsablePrice,
}
