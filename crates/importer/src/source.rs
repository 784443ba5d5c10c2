//! Import source normalization.

use url::Url;

use crate::demo::DEMO_SOURCE;
use crate::error::ImportError;

/// Where an import reads its HTML from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    /// The built-in sample article.
    Demo,
    /// A web page.
    Url(Url),
}

impl ImportSource {
    pub fn is_demo(&self) -> bool {
        matches!(self, Self::Demo)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Demo => DEMO_SOURCE,
            Self::Url(url) => url.as_str(),
        }
    }
}

impl std::fmt::Display for ImportSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turn user input into an [`ImportSource`].
///
/// `demo` selects the sample article. `http` and `https` URLs are accepted
/// as given; input without a scheme is treated as an `https` host. Anything
/// else is rejected.
pub fn normalize_source(input: &str) -> Result<ImportSource, ImportError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ImportError::InvalidSource("Please enter a URL".into()));
    }
    if input == DEMO_SOURCE {
        return Ok(ImportSource::Demo);
    }

    let candidate = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{input}")
    };

    let url = Url::parse(&candidate)
        .map_err(|e| ImportError::InvalidSource(format!("{input}: {e}")))?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some_and(|h| !h.is_empty()) => {
            Ok(ImportSource::Url(url))
        }
        "http" | "https" => Err(ImportError::InvalidSource(format!("{input}: missing host"))),
        other => Err(ImportError::InvalidSource(format!(
            "{input}: unsupported scheme '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn demo_token() {
        assert_eq!(normalize_source("  demo ").unwrap(), ImportSource::Demo);
        assert!(normalize_source("demo").unwrap().is_demo());
    }

    #[test]
    fn http_urls_are_kept() {
        let src = normalize_source("http://example.com/docs?page=2").unwrap();
        assert_eq!(src.as_str(), "http://example.com/docs?page=2");
    }

    #[test]
    fn bare_host_gets_https() {
        let src = normalize_source("example.com/guide").unwrap();
        assert_eq!(src.as_str(), "https://example.com/guide");
    }

    #[test]
    fn rejects_empty_and_other_schemes() {
        assert_matches!(normalize_source("   "), Err(ImportError::InvalidSource(_)));
        assert_matches!(
            normalize_source("ftp://example.com/file"),
            Err(ImportError::InvalidSource(msg)) if msg.contains("unsupported scheme")
        );
        assert_matches!(normalize_source("http://"), Err(ImportError::InvalidSource(_)));
        assert_matches!(normalize_source("exa mple.com"), Err(ImportError::InvalidSource(_)));
    }
}
