//! Content processing for imported and rendered pages.
//!
//! Everything here is a synchronous, single-pass transformation over a
//! parsed HTML document or a CSS string:
//!
//! - [`extract`]: reduce a web page to whitelisted, escaped block elements.
//! - [`sanitize`]: drop CSS lines matching a denylist of unsafe patterns.
//! - [`scope`]: prefix CSS selectors with a per-import scope class.
//! - [`styles`]: harvest a document's stylesheets for scoping.
//! - [`anchors`]: link comments to elements of a rendered page.

pub mod anchors;
pub mod extract;
pub mod sanitize;
pub mod scope;
pub mod styles;
