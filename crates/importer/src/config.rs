//! Importer configuration loaded from environment variables.

use std::time::Duration;

use docportal_core::page::DEFAULT_AUTHOR;

/// Default per-request timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

/// Placeholder replaced by the percent-encoded source URL in proxy templates.
pub const URL_PLACEHOLDER: &str = "{url}";

/// Proxies tried after a failed direct fetch, in `IMPORT_PROXIES` syntax.
pub const DEFAULT_PROXIES: &str =
    "json:https://api.allorigins.win/get?url={url},raw:https://corsproxy.io/?{url}";

/// How a proxy returns the fetched page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// The body is the page HTML.
    Raw,
    /// The body is a JSON object whose `contents` field holds the page HTML.
    JsonEnvelope,
}

/// A public proxy endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyEndpoint {
    pub template: String,
    pub format: ResponseFormat,
}

impl ProxyEndpoint {
    pub fn raw(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            format: ResponseFormat::Raw,
        }
    }

    pub fn json(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            format: ResponseFormat::JsonEnvelope,
        }
    }

    /// Parse a `json:<template>` or `raw:<template>` entry.
    ///
    /// Returns `None` for an unknown prefix or a template without
    /// [`URL_PLACEHOLDER`].
    pub fn parse(entry: &str) -> Option<Self> {
        let (kind, template) = entry.trim().split_once(':')?;
        if !template.contains(URL_PLACEHOLDER) {
            return None;
        }
        match kind {
            "json" => Some(Self::json(template)),
            "raw" => Some(Self::raw(template)),
            _ => None,
        }
    }

    /// The proxy URL that fetches `source`.
    pub fn url_for(&self, source: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(source.as_bytes()).collect();
        self.template.replace(URL_PLACEHOLDER, &encoded)
    }
}

/// Parse a comma-separated proxy list, dropping invalid entries.
pub fn parse_proxies(list: &str) -> Vec<ProxyEndpoint> {
    list.split(',')
        .filter(|s| !s.trim().is_empty())
        .filter_map(|entry| {
            let parsed = ProxyEndpoint::parse(entry);
            if parsed.is_none() {
                tracing::warn!(entry = entry.trim(), "Ignoring invalid proxy entry");
            }
            parsed
        })
        .collect()
}

/// Importer configuration.
#[derive(Debug, Clone)]
pub struct ImporterConfig {
    /// Per-request timeout in seconds (default: `15`).
    pub fetch_timeout_secs: u64,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Proxies tried after the direct fetch, in order.
    pub proxies: Vec<ProxyEndpoint>,
    /// Author recorded on imported pages (default: `Current User`).
    pub author: String,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            user_agent: default_user_agent(),
            proxies: parse_proxies(DEFAULT_PROXIES),
            author: DEFAULT_AUTHOR.to_string(),
        }
    }
}

fn default_user_agent() -> String {
    format!("docportal-importer/{}", env!("CARGO_PKG_VERSION"))
}

impl ImporterConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                                 |
    /// |-----------------------------|-----------------------------------------|
    /// | `IMPORT_FETCH_TIMEOUT_SECS` | `15`                                    |
    /// | `IMPORT_USER_AGENT`         | `docportal-importer/<version>`          |
    /// | `IMPORT_PROXIES`            | allorigins (JSON), then corsproxy.io    |
    /// | `IMPORT_AUTHOR`             | `Current User`                          |
    ///
    /// Absent or unparsable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let fetch_timeout_secs = lookup("IMPORT_FETCH_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(defaults.fetch_timeout_secs);

        let user_agent = lookup("IMPORT_USER_AGENT")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.user_agent);

        let proxies = lookup("IMPORT_PROXIES")
            .map(|v| parse_proxies(&v))
            .unwrap_or(defaults.proxies);

        let author = lookup("IMPORT_AUTHOR")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.author);

        Self {
            fetch_timeout_secs,
            user_agent,
            proxies,
            author,
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> ImporterConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ImporterConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let config = config_from(&[]);
        assert_eq!(config.fetch_timeout_secs, 15);
        assert!(config.user_agent.starts_with("docportal-importer/"));
        assert_eq!(config.author, "Current User");
        assert_eq!(
            config.proxies,
            vec![
                ProxyEndpoint::json("https://api.allorigins.win/get?url={url}"),
                ProxyEndpoint::raw("https://corsproxy.io/?{url}"),
            ]
        );
    }

    #[test]
    fn variables_override_defaults() {
        let config = config_from(&[
            ("IMPORT_FETCH_TIMEOUT_SECS", "3"),
            ("IMPORT_USER_AGENT", "test-agent"),
            ("IMPORT_PROXIES", "raw:http://localhost:9/p?u={url}"),
            ("IMPORT_AUTHOR", "Importer Bot"),
        ]);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(3));
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.proxies, vec![ProxyEndpoint::raw("http://localhost:9/p?u={url}")]);
        assert_eq!(config.author, "Importer Bot");
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config_from(&[
            ("IMPORT_FETCH_TIMEOUT_SECS", "soon"),
            ("IMPORT_AUTHOR", "   "),
        ]);
        assert_eq!(config.fetch_timeout_secs, DEFAULT_FETCH_TIMEOUT_SECS);
        assert_eq!(config.author, DEFAULT_AUTHOR);
    }

    #[test]
    fn empty_proxy_list_disables_proxies() {
        assert!(config_from(&[("IMPORT_PROXIES", "")]).proxies.is_empty());
    }

    // -- ProxyEndpoint -------------------------------------------------------

    #[test]
    fn proxy_entries_parse() {
        assert_eq!(
            ProxyEndpoint::parse(" json:https://p.example/get?url={url} "),
            Some(ProxyEndpoint::json("https://p.example/get?url={url}"))
        );
        assert_eq!(ProxyEndpoint::parse("xml:https://p.example/{url}"), None);
        assert_eq!(ProxyEndpoint::parse("raw:https://p.example/"), None);
        assert_eq!(ProxyEndpoint::parse("no-prefix"), None);
    }

    #[test]
    fn proxy_url_encodes_source() {
        let proxy = ProxyEndpoint::raw("https://corsproxy.io/?{url}");
        assert_eq!(
            proxy.url_for("https://example.com/a b?x=1&y=2"),
            "https://corsproxy.io/?https%3A%2F%2Fexample.com%2Fa+b%3Fx%3D1%26y%3D2"
        );
    }
}
