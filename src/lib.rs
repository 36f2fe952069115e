//! Fail-closed sanitization of CMS content for server-rendered pages.
//!
//! Everything a renderer receives from the CMS passes through this crate
//! first: plain-text fields, link targets, image URLs, curated rich HTML,
//! structured rich-text documents and linked data (JSON-LD).
//!
//! Two layers:
//! - **Primitives**: synchronous, regex-based [`Sanitizer`]s that promote a
//!   [`Tainted<T>`] to a [`Verified<T>`], wrapped by the fail-closed
//!   functions [`sanitize_text`], [`sanitize_url`] and [`sanitize_image_url`].
//! - **Engine-backed**: [`ContentSanitizer`] routes text, URLs and HTML
//!   through a process-wide DOM engine and falls back to the primitives
//!   whenever the engine is missing or fails.
//!
//! No public entry point returns an error or panics on hostile input: a
//! rejected value becomes `""`, an empty array or an empty map, and the
//! rejection is logged through `tracing`.
//!
//! # Core Types
//!
//! - [`Tainted<T>`]: untrusted input that must be sanitized before use
//! - [`Verified<T>`]: output of a successful sanitization
//! - [`SanitizationPolicy`]: compiled allowlists and patterns
//! - [`ContentSanitizer`]: engine-backed entry point for all content
//! - [`document::Block`]: one block of a rich-text document
//!
//! # Examples
//!
//! ```
//! use content_sanitize::{sanitize_url, ContentSanitizer};
//! use futures::executor::block_on;
//! use serde_json::json;
//!
//! assert_eq!(sanitize_url("javascript:alert(1)"), "");
//!
//! let sanitizer = ContentSanitizer::new();
//! let document = json!([
//!     { "_type": "block", "_key": "a", "children": [
//!         { "_type": "span", "text": "Sunday <script>x()</script>service" }
//!     ]}
//! ]);
//! let clean = block_on(sanitizer.document_value(&document));
//! assert_eq!(clean[0]["children"][0]["text"], "Sunday service");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod content;
pub mod document;
pub mod engine;
mod error;
pub mod linked_data;
mod logging;
pub mod policy;
mod sanitizer;
pub mod selftest;
mod tainted;
mod verified;

#[cfg(test)]
mod test_utils;

pub use content::ContentSanitizer;
#[cfg(feature = "html-engine")]
pub use engine::DomEngine;
pub use engine::{CleanProfile, EngineHandle, HtmlEngine, HtmlOptions};
pub use error::{
    ConfigError, EngineError, EngineErrorKind, SanitizationError, SanitizationErrorKind,
};
pub use policy::{PolicyConfig, SanitizationPolicy};
pub use sanitizer::{
    escape_html, sanitize_image_url, sanitize_text, sanitize_url, strip_tags, ImageUrlSanitizer,
    KeySanitizer, MarkSanitizer, Sanitizer, TextSanitizer, UrlSanitizer,
};
pub use tainted::Tainted;
pub use verified::Verified;
