//! The in-memory portal store.
//!
//! [`Portal`] owns every page, change request, and comment, and is the only
//! way to mutate them. Callers hold it explicitly (no global state) and
//! re-render from it after each call.
//!
//! Invariants kept by every operation:
//! - at least one page exists;
//! - every change request and comment references an existing page;
//! - ids are unique per collection and assigned as `max(existing) + 1`.

use chrono::Utc;
use serde::Serialize;

use crate::change_request::{self, ChangeRequest, RequestListing, RequestStatus};
use crate::comment::{self, Comment, CommentStatus};
use crate::diff;
use crate::error::CoreError;
use crate::page::{self, Page};
use crate::seed;
use crate::types::{next_id, today, DbId};

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// What deleting a page would take with it, for a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionImpact {
    pub change_requests: usize,
    pub pending_requests: usize,
    pub active_comments: usize,
}

/// Outcome of a successful page deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionReport {
    pub deleted_page: Page,
    pub requests_removed: usize,
    pub comments_removed: usize,
    pub active_page_id: DbId,
}

// ---------------------------------------------------------------------------
// Portal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Portal {
    pages: Vec<Page>,
    change_requests: Vec<ChangeRequest>,
    comments: Vec<Comment>,
    active_page: DbId,
}

impl Default for Portal {
    fn default() -> Self {
        Self::new()
    }
}

impl Portal {
    /// A portal holding a single default page.
    pub fn new() -> Self {
        let first = Page {
            id: 1,
            title: page::DEFAULT_TITLE.to_string(),
            content: page::DEFAULT_CONTENT.to_string(),
            last_updated: today(),
            author: page::DEFAULT_AUTHOR.to_string(),
        };
        Self {
            active_page: first.id,
            pages: vec![first],
            change_requests: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// A portal populated with the sample pages and change request.
    pub fn seeded() -> Self {
        let pages = seed::sample_pages();
        Self {
            active_page: pages[0].id,
            pages,
            change_requests: seed::sample_change_requests(),
            comments: Vec::new(),
        }
    }

    /// Build a portal from existing collections, checking the invariants.
    ///
    /// The first page becomes active.
    pub fn from_parts(
        pages: Vec<Page>,
        change_requests: Vec<ChangeRequest>,
        comments: Vec<Comment>,
    ) -> Result<Self, CoreError> {
        let Some(first) = pages.first() else {
            return Err(CoreError::Validation(
                "A portal needs at least one page".into(),
            ));
        };
        ensure_unique("page", pages.iter().map(|p| p.id))?;
        ensure_unique("change request", change_requests.iter().map(|r| r.id))?;
        ensure_unique("comment", comments.iter().map(|c| c.id))?;

        let has_page = |id: DbId| pages.iter().any(|p| p.id == id);
        if let Some(r) = change_requests.iter().find(|r| !has_page(r.page_id)) {
            return Err(CoreError::NotFound { entity: "page", id: r.page_id });
        }
        if let Some(c) = comments.iter().find(|c| !has_page(c.page_id)) {
            return Err(CoreError::NotFound { entity: "page", id: c.page_id });
        }

        Ok(Self {
            active_page: first.id,
            pages,
            change_requests,
            comments,
        })
    }

    // -- pages ---------------------------------------------------------------

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, id: DbId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    pub fn get_page(&self, id: DbId) -> Result<&Page, CoreError> {
        self.page(id).ok_or(CoreError::NotFound { entity: "page", id })
    }

    pub fn active_page_id(&self) -> DbId {
        self.active_page
    }

    pub fn active_page(&self) -> &Page {
        // The active id always names an existing page and `pages` is never empty.
        self.page(self.active_page).unwrap_or(&self.pages[0])
    }

    pub fn set_active_page(&mut self, id: DbId) -> Result<(), CoreError> {
        self.get_page(id)?;
        self.active_page = id;
        Ok(())
    }

    /// Create a page and make it active. Blank title/content get defaults.
    pub fn create_page(
        &mut self,
        title: Option<&str>,
        content: Option<&str>,
        author: &str,
    ) -> Result<DbId, CoreError> {
        let title = page::resolve_title(title);
        page::validate_title(title)?;

        let id = next_id(self.pages.iter().map(|p| p.id));
        self.pages.push(Page {
            id,
            title: title.to_string(),
            content: page::resolve_content(content).to_string(),
            last_updated: today(),
            author: author.to_string(),
        });
        self.active_page = id;

        tracing::info!(page_id = id, title = %title, "Created page");
        Ok(id)
    }

    /// Replace a page's content and stamp today's date.
    pub fn update_page(&mut self, id: DbId, content: &str) -> Result<(), CoreError> {
        let page = self
            .pages
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CoreError::NotFound { entity: "page", id })?;
        page.content = content.to_string();
        page.last_updated = today();
        Ok(())
    }

    pub fn deletion_impact(&self, id: DbId) -> Result<DeletionImpact, CoreError> {
        self.get_page(id)?;
        let requests: Vec<_> = self.requests_for_page(id).collect();
        Ok(DeletionImpact {
            change_requests: requests.len(),
            pending_requests: requests.iter().filter(|r| r.is_pending()).count(),
            active_comments: self.comment_count(id),
        })
    }

    /// Delete a page with its change requests and comments.
    ///
    /// Refuses to delete the last remaining page. When the active page is
    /// deleted, the page before it (or the new first page) becomes active.
    pub fn delete_page(&mut self, id: DbId) -> Result<DeletionReport, CoreError> {
        let index = self
            .pages
            .iter()
            .position(|p| p.id == id)
            .ok_or(CoreError::NotFound { entity: "page", id })?;

        if self.pages.len() <= 1 {
            return Err(CoreError::Conflict(
                "Cannot delete the last remaining page. Create another page first.".into(),
            ));
        }

        let deleted_page = self.pages.remove(index);
        if self.active_page == id {
            self.active_page = self.pages[index.saturating_sub(1)].id;
        }

        let requests_before = self.change_requests.len();
        self.change_requests.retain(|r| r.page_id != id);
        let comments_before = self.comments.len();
        self.comments.retain(|c| c.page_id != id);

        let report = DeletionReport {
            deleted_page,
            requests_removed: requests_before - self.change_requests.len(),
            comments_removed: comments_before - self.comments.len(),
            active_page_id: self.active_page,
        };

        tracing::info!(
            page_id = id,
            requests_removed = report.requests_removed,
            comments_removed = report.comments_removed,
            active_page_id = report.active_page_id,
            "Deleted page",
        );
        Ok(report)
    }

    // -- change requests -----------------------------------------------------

    pub fn change_requests(&self) -> &[ChangeRequest] {
        &self.change_requests
    }

    pub fn change_request(&self, id: DbId) -> Option<&ChangeRequest> {
        self.change_requests.iter().find(|r| r.id == id)
    }

    pub fn requests_for_page(&self, page_id: DbId) -> impl Iterator<Item = &ChangeRequest> {
        self.change_requests.iter().filter(move |r| r.page_id == page_id)
    }

    pub fn pending_count(&self) -> usize {
        self.change_requests.iter().filter(|r| r.is_pending()).count()
    }

    /// Record a proposal against a page, snapshotting both versions.
    pub fn create_change_request(
        &mut self,
        page_id: DbId,
        original_content: &str,
        proposed_content: &str,
        requester: &str,
    ) -> Result<DbId, CoreError> {
        self.get_page(page_id)?;

        let id = next_id(self.change_requests.iter().map(|r| r.id));
        self.change_requests.push(ChangeRequest {
            id,
            page_id,
            original_content: original_content.to_string(),
            proposed_content: proposed_content.to_string(),
            request_date: today(),
            requester: requester.to_string(),
            status: RequestStatus::Pending,
        });

        tracing::info!(request_id = id, page_id, requester = %requester, "Created change request");
        Ok(id)
    }

    /// Propose edited content for a page; rejected when nothing changed.
    pub fn submit_edit(
        &mut self,
        page_id: DbId,
        proposed_content: &str,
        requester: &str,
    ) -> Result<DbId, CoreError> {
        let current = self.get_page(page_id)?.content.clone();
        if !diff::has_changes(&current, proposed_content) {
            return Err(CoreError::Validation(
                "No changes were made to the document.".into(),
            ));
        }
        self.create_change_request(page_id, &current, proposed_content, requester)
    }

    /// Approve a pending request, copying its proposal into the page.
    pub fn approve_request(&mut self, id: DbId) -> Result<(), CoreError> {
        let (page_id, proposed) = {
            let request = self.pending_request(id, RequestStatus::Approved)?;
            (request.page_id, request.proposed_content.clone())
        };
        self.update_page(page_id, &proposed)?;
        self.set_request_status(id, RequestStatus::Approved);

        tracing::info!(request_id = id, page_id, "Approved change request");
        Ok(())
    }

    /// Reject a pending request. The page is left untouched.
    pub fn reject_request(&mut self, id: DbId) -> Result<(), CoreError> {
        self.pending_request(id, RequestStatus::Rejected)?;
        self.set_request_status(id, RequestStatus::Rejected);

        tracing::info!(request_id = id, "Rejected change request");
        Ok(())
    }

    /// All requests with their page titles, newest first.
    pub fn request_listing(&self) -> Vec<RequestListing> {
        let mut listing: Vec<RequestListing> = self
            .change_requests
            .iter()
            .filter_map(|r| {
                let page = self.page(r.page_id)?;
                Some(RequestListing {
                    request_id: r.id,
                    page_id: r.page_id,
                    page_title: page.title.clone(),
                    requester: r.requester.clone(),
                    request_date: r.request_date,
                    status: r.status,
                })
            })
            .collect();
        listing.sort_by(|a, b| {
            b.request_date
                .cmp(&a.request_date)
                .then(b.request_id.cmp(&a.request_id))
        });
        listing
    }

    fn pending_request(
        &self,
        id: DbId,
        next: RequestStatus,
    ) -> Result<&ChangeRequest, CoreError> {
        let request = self
            .change_request(id)
            .ok_or(CoreError::NotFound { entity: "change request", id })?;
        change_request::validate_transition(request.status, next)?;
        Ok(request)
    }

    fn set_request_status(&mut self, id: DbId, status: RequestStatus) {
        if let Some(request) = self.change_requests.iter_mut().find(|r| r.id == id) {
            request.status = status;
        }
    }

    // -- comments ------------------------------------------------------------

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn comment(&self, id: DbId) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    /// Add an active comment to a page.
    ///
    /// `element_selector` links the comment to an element of the rendered
    /// page; `None` or blank makes it a page-level comment.
    pub fn add_comment(
        &mut self,
        page_id: DbId,
        content: &str,
        author: &str,
        element_selector: Option<&str>,
    ) -> Result<DbId, CoreError> {
        self.get_page(page_id)?;
        comment::validate_content(content)?;

        let id = next_id(self.comments.iter().map(|c| c.id));
        self.comments.push(Comment {
            id,
            page_id,
            content: content.trim().to_string(),
            author: author.to_string(),
            timestamp: Utc::now(),
            element_selector: comment::normalize_selector(element_selector),
            status: CommentStatus::Active,
        });

        tracing::info!(comment_id = id, page_id, "Added comment");
        Ok(id)
    }

    /// Resolve an active comment. Resolution is terminal.
    pub fn resolve_comment(&mut self, id: DbId) -> Result<(), CoreError> {
        let comment = self
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CoreError::NotFound { entity: "comment", id })?;
        if !comment.is_active() {
            return Err(CoreError::Conflict(format!("Comment {id} is already resolved")));
        }
        comment.status = CommentStatus::Resolved;

        tracing::info!(comment_id = id, "Resolved comment");
        Ok(())
    }

    /// Active comments on a page, newest first.
    pub fn active_comments(&self, page_id: DbId) -> Vec<&Comment> {
        let mut comments: Vec<&Comment> = self
            .comments
            .iter()
            .filter(|c| c.page_id == page_id && c.is_active())
            .collect();
        comments.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        comments
    }

    pub fn comment_count(&self, page_id: DbId) -> usize {
        self.comments
            .iter()
            .filter(|c| c.page_id == page_id && c.is_active())
            .count()
    }
}

fn ensure_unique(entity: &str, ids: impl Iterator<Item = DbId>) -> Result<(), CoreError> {
    let mut seen = std::collections::HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CoreError::Conflict(format!("Duplicate {entity} id {id}")));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn portal_with_three_pages() -> Portal {
        let mut portal = Portal::new();
        portal.create_page(Some("Second"), Some("<p>2</p>"), "A").unwrap();
        portal.create_page(Some("Third"), Some("<p>3</p>"), "A").unwrap();
        portal
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn new_portal_has_one_active_page() {
        let portal = Portal::new();
        assert_eq!(portal.pages().len(), 1);
        assert_eq!(portal.active_page().title, page::DEFAULT_TITLE);
    }

    #[test]
    fn seeded_portal_has_sample_data() {
        let portal = Portal::seeded();
        assert_eq!(portal.pages().len(), 3);
        assert_eq!(portal.pending_count(), 1);
        assert_eq!(portal.active_page_id(), 1);
    }

    #[test]
    fn from_parts_rejects_empty_and_dangling() {
        assert_matches!(
            Portal::from_parts(vec![], vec![], vec![]),
            Err(CoreError::Validation(_))
        );
        let mut requests = seed::sample_change_requests();
        requests[0].page_id = 99;
        assert_matches!(
            Portal::from_parts(seed::sample_pages(), requests, vec![]),
            Err(CoreError::NotFound { entity: "page", id: 99 })
        );
    }

    #[test]
    fn from_parts_rejects_duplicate_ids() {
        let mut pages = seed::sample_pages();
        pages[1].id = 1;
        assert_matches!(
            Portal::from_parts(pages, vec![], vec![]),
            Err(CoreError::Conflict(_))
        );
    }

    // -- pages ---------------------------------------------------------------

    #[test]
    fn create_page_assigns_max_plus_one_and_activates() {
        let mut portal = Portal::seeded();
        portal.delete_page(2).unwrap();
        let id = portal.create_page(Some("Fresh"), None, "Me").unwrap();
        assert_eq!(id, 4);
        assert_eq!(portal.active_page_id(), 4);
        assert_eq!(portal.get_page(4).unwrap().content, page::DEFAULT_CONTENT);
    }

    #[test]
    fn create_page_rejects_overlong_title() {
        let mut portal = Portal::new();
        let title = "x".repeat(page::MAX_TITLE_LENGTH + 1);
        assert_matches!(
            portal.create_page(Some(&title), None, "Me"),
            Err(CoreError::Validation(_))
        );
        assert_eq!(portal.pages().len(), 1);
    }

    #[test]
    fn set_active_page_requires_existing_page() {
        let mut portal = Portal::seeded();
        assert_matches!(
            portal.set_active_page(42),
            Err(CoreError::NotFound { entity: "page", id: 42 })
        );
        portal.set_active_page(3).unwrap();
        assert_eq!(portal.active_page().title, "Maintenance Schedule");
    }

    #[test]
    fn deleting_only_page_fails_and_changes_nothing() {
        let mut portal = Portal::new();
        let before = portal.pages().to_vec();
        assert_matches!(portal.delete_page(1), Err(CoreError::Conflict(_)));
        assert_eq!(portal.pages(), before.as_slice());
    }

    #[test]
    fn deleting_unknown_page_is_not_found() {
        let mut portal = Portal::seeded();
        assert_matches!(portal.delete_page(9), Err(CoreError::NotFound { .. }));
    }

    #[test]
    fn deleting_active_page_selects_previous() {
        let mut portal = portal_with_three_pages();
        portal.set_active_page(3).unwrap();
        let report = portal.delete_page(3).unwrap();
        assert_eq!(report.active_page_id, 2);
        assert_eq!(portal.active_page_id(), 2);
    }

    #[test]
    fn deleting_first_active_page_selects_new_first() {
        let mut portal = portal_with_three_pages();
        portal.set_active_page(1).unwrap();
        portal.delete_page(1).unwrap();
        assert_eq!(portal.active_page_id(), 2);
    }

    #[test]
    fn deleting_inactive_page_keeps_active() {
        let mut portal = portal_with_three_pages();
        portal.set_active_page(3).unwrap();
        portal.delete_page(1).unwrap();
        assert_eq!(portal.active_page_id(), 3);
    }

    #[test]
    fn delete_cascades_requests_and_comments() {
        let mut portal = Portal::seeded();
        portal.add_comment(2, "Check this", "Reviewer", None).unwrap();
        portal.add_comment(1, "Other page", "Reviewer", None).unwrap();

        let impact = portal.deletion_impact(2).unwrap();
        assert_eq!(
            impact,
            DeletionImpact { change_requests: 1, pending_requests: 1, active_comments: 1 }
        );

        let report = portal.delete_page(2).unwrap();
        assert_eq!(report.requests_removed, 1);
        assert_eq!(report.comments_removed, 1);
        assert!(portal.change_requests().is_empty());
        assert_eq!(portal.comments().len(), 1);
        assert!(portal.comments().iter().all(|c| c.page_id != 2));
    }

    // -- change requests -----------------------------------------------------

    #[test]
    fn submit_edit_without_changes_is_rejected() {
        let mut portal = Portal::seeded();
        let content = portal.get_page(1).unwrap().content.clone();
        assert_matches!(
            portal.submit_edit(1, &content, "Me"),
            Err(CoreError::Validation(msg)) if msg.contains("No changes")
        );
        assert_eq!(portal.change_requests().len(), 1);
    }

    #[test]
    fn submit_edit_snapshots_both_versions() {
        let mut portal = Portal::seeded();
        let original = portal.get_page(3).unwrap().content.clone();
        let id = portal.submit_edit(3, "<p>rewritten</p>", "Me").unwrap();
        assert_eq!(id, 102);

        let request = portal.change_request(id).unwrap();
        assert_eq!(request.original_content, original);
        assert_eq!(request.proposed_content, "<p>rewritten</p>");
        assert_eq!(request.status, RequestStatus::Pending);
        // Page untouched until approval.
        assert_eq!(portal.get_page(3).unwrap().content, original);
    }

    #[test]
    fn approve_copies_proposed_content() {
        let mut portal = Portal::seeded();
        portal.approve_request(101).unwrap();

        let request = portal.change_request(101).unwrap();
        assert_eq!(request.status, RequestStatus::Approved);
        assert_eq!(portal.get_page(2).unwrap().content, request.proposed_content);
        assert_eq!(portal.get_page(2).unwrap().last_updated, today());
        assert_eq!(portal.pending_count(), 0);
    }

    #[test]
    fn reject_leaves_page_untouched() {
        let mut portal = Portal::seeded();
        let before = portal.get_page(2).unwrap().clone();
        portal.reject_request(101).unwrap();
        assert_eq!(portal.change_request(101).unwrap().status, RequestStatus::Rejected);
        assert_eq!(portal.get_page(2).unwrap(), &before);
    }

    #[test]
    fn decided_requests_cannot_be_decided_again() {
        let mut portal = Portal::seeded();
        portal.reject_request(101).unwrap();
        assert_matches!(portal.approve_request(101), Err(CoreError::Conflict(_)));
        assert_matches!(portal.reject_request(101), Err(CoreError::Conflict(_)));
        assert_eq!(portal.change_request(101).unwrap().status, RequestStatus::Rejected);
    }

    #[test]
    fn unknown_request_is_not_found() {
        let mut portal = Portal::seeded();
        assert_matches!(
            portal.approve_request(5),
            Err(CoreError::NotFound { entity: "change request", id: 5 })
        );
    }

    #[test]
    fn listing_is_newest_first_with_titles() {
        let mut portal = Portal::seeded();
        let id = portal.submit_edit(1, "<p>new</p>", "Me").unwrap();
        let listing = portal.request_listing();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].request_id, id);
        assert_eq!(listing[0].page_title, "Machine Overview");
        assert_eq!(listing[1].request_id, 101);
        assert_eq!(listing[1].status.label(), "Pending");
    }

    // -- comments ------------------------------------------------------------

    #[test]
    fn comments_require_existing_page_and_text() {
        let mut portal = Portal::seeded();
        assert_matches!(
            portal.add_comment(77, "hi", "Me", None),
            Err(CoreError::NotFound { entity: "page", id: 77 })
        );
        assert_matches!(
            portal.add_comment(1, "   ", "Me", None),
            Err(CoreError::Validation(_))
        );
        assert!(portal.comments().is_empty());
    }

    #[test]
    fn add_comment_trims_and_links_selector() {
        let mut portal = Portal::seeded();
        let id = portal
            .add_comment(1, "  Clarify specs  ", "Me", Some("h2:nth-of-type(1)"))
            .unwrap();
        let comment = portal.comment(id).unwrap();
        assert_eq!(comment.content, "Clarify specs");
        assert_eq!(comment.element_selector.as_deref(), Some("h2:nth-of-type(1)"));
        assert_eq!(comment.status, CommentStatus::Active);
    }

    #[test]
    fn resolved_comments_drop_out_of_listing() {
        let mut portal = Portal::seeded();
        let first = portal.add_comment(1, "one", "Me", None).unwrap();
        let second = portal.add_comment(1, "two", "Me", None).unwrap();
        assert_eq!(portal.comment_count(1), 2);

        let listed: Vec<DbId> = portal.active_comments(1).iter().map(|c| c.id).collect();
        assert_eq!(listed, vec![second, first]);

        portal.resolve_comment(first).unwrap();
        assert_eq!(portal.comment_count(1), 1);
        assert_eq!(portal.active_comments(1)[0].id, second);
    }

    #[test]
    fn resolution_is_terminal() {
        let mut portal = Portal::seeded();
        let id = portal.add_comment(1, "one", "Me", None).unwrap();
        portal.resolve_comment(id).unwrap();
        assert_matches!(portal.resolve_comment(id), Err(CoreError::Conflict(_)));
        assert_matches!(
            portal.resolve_comment(999),
            Err(CoreError::NotFound { entity: "comment", id: 999 })
        );
    }
}
