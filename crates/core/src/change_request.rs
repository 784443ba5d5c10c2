//! Change requests: proposed page content awaiting approval.
//!
//! A request is created `pending` and moves exactly once, to either
//! `approved` (its proposed content is copied into the page) or `rejected`.
//! Both outcomes are terminal.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Date, DbId};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle state of a [`ChangeRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    /// String representation for display, logging, and serialization.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Capitalized label used on request cards.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Statuses this status may move to.
    pub fn valid_transitions(&self) -> &'static [RequestStatus] {
        match self {
            Self::Pending => &[Self::Approved, Self::Rejected],
            Self::Approved | Self::Rejected => &[],
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate that a change request may move from `current` to `next`.
pub fn validate_transition(current: RequestStatus, next: RequestStatus) -> Result<(), CoreError> {
    if current.valid_transitions().contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Cannot move change request from '{current}' to '{next}'"
        )))
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// Snapshot of a page's content at request time alongside the proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequest {
    pub id: DbId,
    pub page_id: DbId,
    pub original_content: String,
    pub proposed_content: String,
    pub request_date: Date,
    pub requester: String,
    pub status: RequestStatus,
}

impl ChangeRequest {
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

/// A change request joined with its page title, for the requests list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestListing {
    pub request_id: DbId,
    pub page_id: DbId,
    pub page_title: String,
    pub requester: String,
    pub request_date: Date,
    pub status: RequestStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_be_approved_or_rejected() {
        assert!(validate_transition(RequestStatus::Pending, RequestStatus::Approved).is_ok());
        assert!(validate_transition(RequestStatus::Pending, RequestStatus::Rejected).is_ok());
    }

    #[test]
    fn terminal_states_cannot_move() {
        for terminal in [RequestStatus::Approved, RequestStatus::Rejected] {
            for next in [
                RequestStatus::Pending,
                RequestStatus::Approved,
                RequestStatus::Rejected,
            ] {
                assert!(validate_transition(terminal, next).is_err());
            }
        }
    }

    #[test]
    fn pending_cannot_stay_pending() {
        assert!(validate_transition(RequestStatus::Pending, RequestStatus::Pending).is_err());
    }

    #[test]
    fn labels_and_strings() {
        assert_eq!(RequestStatus::Approved.as_str(), "approved");
        assert_eq!(RequestStatus::Approved.label(), "Approved");
        assert_eq!(format!("{}", RequestStatus::Rejected), "rejected");
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&RequestStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
    }
}
