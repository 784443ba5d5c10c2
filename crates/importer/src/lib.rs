//! Web page importer for the documentation portal.
//!
//! Fetches a page (directly, then through public proxies), extracts its main
//! content, optionally carries its styles along inside a scope container, and
//! stores the result as a new page.

pub mod config;
pub mod demo;
pub mod error;
pub mod fetch;
pub mod orchestrator;
pub mod source;

pub use config::ImporterConfig;
pub use error::{FetchError, ImportError};
pub use fetch::{FetchPolicy, HtmlFetcher, HttpFetcher};
pub use orchestrator::{ImportRequest, Importer, PreparedImport};
