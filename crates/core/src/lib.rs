//! Documentation portal domain: pages, change requests, comments, and the
//! in-memory [`portal::Portal`] store that owns them.
//!
//! Nothing in this crate performs I/O. HTML parsing lives in
//! `docportal-content`; fetching and importing live in `docportal-importer`.

pub mod change_request;
pub mod comment;
pub mod diff;
pub mod error;
pub mod html;
pub mod page;
pub mod portal;
pub mod seed;
pub mod types;
