//! Inline page comments.
//!
//! A comment is either page-level (`element_selector == None`) or linked to
//! an element of the rendered page through a CSS selector. Resolution is
//! one-way: a resolved comment never becomes active again.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Maximum comment length in characters.
pub const MAX_COMMENT_LENGTH: usize = 5_000;

/// Lifecycle state of a [`Comment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentStatus {
    Active,
    Resolved,
}

impl CommentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: DbId,
    pub page_id: DbId,
    pub content: String,
    pub author: String,
    pub timestamp: Timestamp,
    pub element_selector: Option<String>,
    pub status: CommentStatus,
}

impl Comment {
    pub fn is_active(&self) -> bool {
        self.status == CommentStatus::Active
    }
}

/// Validate comment text after trimming (non-empty, bounded length).
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Comment must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment must be at most {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Normalize a submitted element selector; blank means page-level.
pub fn normalize_selector(selector: Option<&str>) -> Option<String> {
    selector
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
