//! Sample pages and a pending change request used to populate a fresh portal.

use crate::change_request::{ChangeRequest, RequestStatus};
use crate::page::Page;
use crate::types::Date;

const MACHINE_OVERVIEW: &str = r#"
<h1>Machine Overview</h1>
<p>Lorem ipsum dolor sit amet, consectetur adipiscing elit. Nullam in dui mauris. Vivamus hendrerit arcu sed erat molestie vehicula. Sed auctor neque eu tellus rhoncus ut eleifend nibh porttitor. Ut in nulla enim.</p>
<h2>Specifications</h2>
<p>Donec et mollis dolor. Praesent et diam eget libero egestas mattis sit amet vitae augue. Nam tincidunt congue enim, ut porta lorem lacinia consectetur.</p>
<h2>Safety Guidelines</h2>
<p>Suspendisse lectus leo, consectetur in tempor sit amet, placerat quis neque. Etiam luctus porttitor lorem, sed suscipit est rutrum non. Curabitur lobortis nisl a enim congue semper.</p>
"#;

const OPERATING_INSTRUCTIONS: &str = r#"
<h1>Operating Instructions</h1>
<p>Lorem ipsum dolor sit amet, consectetur adipiscing elit. Nullam in dui mauris. Vivamus hendrerit arcu sed erat molestie vehicula. Sed auctor neque eu tellus rhoncus ut eleifend nibh porttitor.</p>
<h2>Startup Procedure</h2>
<p>Donec et mollis dolor. Praesent et diam eget libero egestas mattis sit amet vitae augue. Nam tincidunt congue enim, ut porta lorem lacinia consectetur.</p>
<h2>Shutdown Procedure</h2>
<p>Suspendisse lectus leo, consectetur in tempor sit amet, placerat quis neque. Etiam luctus porttitor lorem, sed suscipit est rutrum non.</p>
"#;

const OPERATING_INSTRUCTIONS_PROPOSED: &str = r#"
<h1>Operating Instructions</h1>
<p>Lorem ipsum dolor sit amet, consectetur adipiscing elit. Nullam in dui mauris. Vivamus hendrerit arcu sed erat molestie vehicula. Sed auctor neque eu tellus rhoncus ut eleifend nibh porttitor.</p>
<h2>Startup Procedure - UPDATED</h2>
<p>Donec et mollis dolor. Praesent et diam eget libero egestas mattis sit amet vitae augue. Nam tincidunt congue enim, ut porta lorem lacinia consectetur.</p>
<p>ADDITIONAL IMPORTANT SAFETY INFORMATION: Lorem ipsum dolor sit amet, consectetur adipiscing elit.</p>
<h2>Shutdown Procedure</h2>
<p>Suspendisse lectus leo, consectetur in tempor sit amet, placerat quis neque. Etiam luctus porttitor lorem, sed suscipit est rutrum non.</p>
<h2>Emergency Shutdown</h2>
<p>NEW SECTION: In case of emergency, press the red button located on the front panel.</p>
"#;

const MAINTENANCE_SCHEDULE: &str = r#"
<h1>Maintenance Schedule</h1>
<p>Lorem ipsum dolor sit amet, consectetur adipiscing elit. Nullam in dui mauris. Vivamus hendrerit arcu sed erat molestie vehicula.</p>
<h2>Daily Checks</h2>
<p>Donec et mollis dolor. Praesent et diam eget libero egestas mattis sit amet vitae augue. Nam tincidunt congue enim, ut porta lorem lacinia consectetur.</p>
<h2>Monthly Maintenance</h2>
<p>Suspendisse lectus leo, consectetur in tempor sit amet, placerat quis neque. Etiam luctus porttitor lorem, sed suscipit est rutrum non.</p>
<h2>Annual Servicing</h2>
<p>Mauris tempor ligula sit amet magna. Suspendisse potenti. Ut a nunc id a magna ornare volutpat. Vestibulum eget lectus.</p>
"#;

fn date(y: i32, m: u32, d: u32) -> Date {
    // Literal calendar dates below are all valid.
    Date::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn page(id: i64, title: &str, content: &str, last_updated: Date, author: &str) -> Page {
    Page {
        id,
        title: title.to_string(),
        content: content.to_string(),
        last_updated,
        author: author.to_string(),
    }
}

/// The three sample pages.
pub fn sample_pages() -> Vec<Page> {
    vec![
        page(1, "Machine Overview", MACHINE_OVERVIEW, date(2025, 5, 1), "System Admin"),
        page(
            2,
            "Operating Instructions",
            OPERATING_INSTRUCTIONS,
            date(2025, 5, 5),
            "Technical Writer",
        ),
        page(
            3,
            "Maintenance Schedule",
            MAINTENANCE_SCHEDULE,
            date(2025, 4, 28),
            "Maintenance Engineer",
        ),
    ]
}

/// One pending request against "Operating Instructions".
pub fn sample_change_requests() -> Vec<ChangeRequest> {
    vec![ChangeRequest {
        id: 101,
        page_id: 2,
        original_content: OPERATING_INSTRUCTIONS.to_string(),
        proposed_content: OPERATING_INSTRUCTIONS_PROPOSED.to_string(),
        request_date: date(2025, 5, 14),
        requester: "Safety Officer".to_string(),
        status: RequestStatus::Pending,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_request_targets_sample_page_snapshot() {
        let pages = sample_pages();
        let requests = sample_change_requests();
        let target = pages.iter().find(|p| p.id == requests[0].page_id).unwrap();
        assert_eq!(target.content, requests[0].original_content);
        assert!(requests[0].is_pending());
    }

    #[test]
    fn sample_dates_are_real() {
        assert!(sample_pages()
            .iter()
            .all(|p| p.last_updated != Date::default()));
    }
}
