//! Documentation pages: the entity, its defaults, and validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Date, DbId};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Title given to a page created without one.
pub const DEFAULT_TITLE: &str = "New Document";

/// Content given to a page created without any.
pub const DEFAULT_CONTENT: &str = "<h1>New Document</h1><p>Add content here...</p>";

/// Author recorded for edits made through the portal.
pub const DEFAULT_AUTHOR: &str = "Current User";

/// Maximum title length in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A documentation page. `content` is an HTML fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub last_updated: Date,
    pub author: String,
}

impl Page {
    /// The metadata line shown under the page title.
    pub fn meta_line(&self) -> String {
        format!("Last updated: {} by {}", self.last_updated, self.author)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a page title (non-empty, at most [`MAX_TITLE_LENGTH`] chars).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Resolve an optional title to the one actually stored.
///
/// Blank input falls back to [`DEFAULT_TITLE`]; anything else is trimmed.
pub fn resolve_title(title: Option<&str>) -> &str {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => DEFAULT_TITLE,
    }
}

/// Resolve optional content to the content actually stored.
pub fn resolve_content(content: Option<&str>) -> &str {
    match content {
        Some(c) if !c.is_empty() => c,
        _ => DEFAULT_CONTENT,
    }
}
