//! Error types for fetching and importing web pages.

use docportal_core::error::CoreError;

/// Failure of a single fetch attempt.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status code.
    #[error("HTTP error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A JSON-envelope proxy answered without usable `contents`.
    #[error("Malformed proxy envelope: {0}")]
    Envelope(String),

    /// The response succeeded but carried no body.
    #[error("Empty response body")]
    EmptyBody,
}

/// Failure of a whole import.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Invalid import source: {0}")]
    InvalidSource(String),

    #[error(
        "Unable to fetch content due to CORS restrictions ({attempts} attempts failed). \
         Try using \"demo\" as the URL for sample content."
    )]
    FetchFailed { attempts: usize },

    #[error("No readable content found on the webpage")]
    EmptyContent,

    #[error(transparent)]
    Core(#[from] CoreError),
}
