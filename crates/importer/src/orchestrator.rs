//! Import pipeline: fetch, extract, optionally scope styles, then persist.
//!
//! [`Importer::prepare`] does all network and parsing work without touching
//! the store; [`Importer::commit`] then creates the page. A failed import
//! therefore never leaves partial state behind, and because committing needs
//! `&mut Portal` no two imports can write at the same time.

use chrono::{DateTime, Utc};
use docportal_content::{extract, scope, styles};
use docportal_core::portal::Portal;
use docportal_core::types::DbId;
use scraper::Html;
use serde::Serialize;

use crate::config::ImporterConfig;
use crate::demo::DEMO_HTML;
use crate::error::{FetchError, ImportError};
use crate::fetch::{FetchPolicy, HtmlFetcher, HttpFetcher};
use crate::source::{normalize_source, ImportSource};

/// Title used when neither an override nor a `<title>` is available.
pub const DEFAULT_IMPORT_TITLE: &str = "Imported Web Content";

/// Imported titles are cut to this many characters.
pub const MAX_IMPORT_TITLE_CHARS: usize = 100;

/// What to import.
#[derive(Debug, Clone, Default)]
pub struct ImportRequest {
    pub source: String,
    pub title: Option<String>,
    pub include_styles: bool,
}

/// A fully processed page, ready to be stored.
#[derive(Debug, Clone, Serialize)]
pub struct PreparedImport {
    pub source: String,
    pub title: String,
    pub content: String,
    /// Scope class wrapping the content when styles were imported.
    pub scope_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Pure steps
// ---------------------------------------------------------------------------

/// Pick the page title: explicit override, then the document `<title>`,
/// then [`DEFAULT_IMPORT_TITLE`]. The result is cut to
/// [`MAX_IMPORT_TITLE_CHARS`] and trimmed.
pub fn resolve_import_title(title_override: Option<&str>, document: &Html) -> String {
    let raw = title_override
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| extract::document_title(document))
        .unwrap_or_else(|| DEFAULT_IMPORT_TITLE.to_string());

    let title: String = raw.chars().take(MAX_IMPORT_TITLE_CHARS).collect();
    let title = title.trim();
    if title.is_empty() {
        DEFAULT_IMPORT_TITLE.to_string()
    } else {
        title.to_string()
    }
}

/// Wrap extracted content in a scope container with its stylesheet.
pub fn wrap_scoped(scope_id: &str, source: &str, scoped_css: &str, content: &str) -> String {
    let source_note = source.replace("*/", "").replace('<', "");
    format!(
        "<div class=\"{scope_id}\">\n<style>\n/* Imported styles from: {source_note} */\n{scoped_css}\n</style>\n{content}\n</div>"
    )
}

/// Turn fetched HTML into a [`PreparedImport`].
///
/// Styles are only processed for non-demo sources. `now` seeds the scope id.
pub fn process_html(
    html: &str,
    source: &ImportSource,
    title_override: Option<&str>,
    include_styles: bool,
    now: DateTime<Utc>,
) -> Result<PreparedImport, ImportError> {
    let document = Html::parse_document(html);
    let title = resolve_import_title(title_override, &document);

    let content = extract::extract(&document);
    if content.trim().is_empty() {
        return Err(ImportError::EmptyContent);
    }

    let (content, scope_id) = if include_styles && !source.is_demo() {
        let css = styles::harvest_styles(&document);
        let scope_id = scope::generate_scope_id(source.as_str(), now);
        let scoped = scope::scope(&css, &format!(".{scope_id}"));
        let wrapped = wrap_scoped(&scope_id, source.as_str(), &scoped, &content);
        (wrapped, Some(scope_id))
    } else {
        (content, None)
    };

    Ok(PreparedImport {
        source: source.to_string(),
        title,
        content,
        scope_id,
    })
}

// ---------------------------------------------------------------------------
// Importer
// ---------------------------------------------------------------------------

/// Imports web pages into a [`Portal`].
pub struct Importer<F> {
    fetcher: F,
    policy: FetchPolicy,
    author: String,
}

impl Importer<HttpFetcher> {
    /// An importer using HTTP with the configured proxies and author.
    pub fn from_config(config: &ImporterConfig) -> Result<Self, FetchError> {
        Ok(Self::new(
            HttpFetcher::new(config)?,
            FetchPolicy::from_config(config),
            config.author.clone(),
        ))
    }
}

impl<F: HtmlFetcher> Importer<F> {
    pub fn new(fetcher: F, policy: FetchPolicy, author: impl Into<String>) -> Self {
        Self {
            fetcher,
            policy,
            author: author.into(),
        }
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// Fetch and process a page without storing it.
    pub async fn prepare(&self, request: &ImportRequest) -> Result<PreparedImport, ImportError> {
        let source = normalize_source(&request.source)?;

        let html = match &source {
            ImportSource::Demo => DEMO_HTML.to_string(),
            ImportSource::Url(url) => self.policy.fetch(&self.fetcher, url.as_str()).await?,
        };

        process_html(
            &html,
            &source,
            request.title.as_deref(),
            request.include_styles,
            Utc::now(),
        )
    }

    /// Store a prepared import as a new, active page.
    pub fn commit(&self, portal: &mut Portal, prepared: &PreparedImport) -> Result<DbId, ImportError> {
        let page_id = portal.create_page(
            Some(prepared.title.as_str()),
            Some(prepared.content.as_str()),
            &self.author,
        )?;
        tracing::info!(
            page_id,
            title = %prepared.title,
            source = %prepared.source,
            scoped = prepared.scope_id.is_some(),
            "Imported page",
        );
        Ok(page_id)
    }

    /// Fetch, process, and store a page, returning its id.
    pub async fn import(
        &self,
        portal: &mut Portal,
        request: &ImportRequest,
    ) -> Result<DbId, ImportError> {
        let prepared = self.prepare(request).await?;
        self.commit(portal, &prepared)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
