use std::borrow::Cow;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use ammonia::{Builder, UrlRelative};

use super::{CleanProfile, HtmlEngine};
use crate::{EngineError, EngineErrorKind, SanitizationPolicy, UrlSanitizer};

/// Elements removed together with their content.
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

/// Schemes the parser accepts on absolute `href`/`src` values.
const URL_SCHEMES: &[&str] = &["http", "https", "ftp", "ftps", "mailto", "tel"];

/// In-process DOM engine backed by html5ever, through `ammonia`.
///
/// The engine itself holds no state; everything it may keep comes from the
/// [`CleanProfile`] of each call. Every `href`/`src` that survives the
/// parser is re-checked against the profile's URL policy, and any attribute
/// shaped like an event handler is dropped regardless of the allow-list.
#[derive(Debug, Default)]
pub struct DomEngine {
    _private: (),
}

impl DomEngine {
    /// Creates a DOM engine.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

fn vet_attribute<'u>(
    policy: &SanitizationPolicy,
    attribute: &str,
    value: &'u str,
) -> Option<Cow<'u, str>> {
    if policy.is_event_handler(attribute) {
        return None;
    }
    match attribute {
        "href" | "src" => UrlSanitizer::with_policy(policy)
            .check(value)
            .ok()
            .map(Cow::Borrowed),
        _ => Some(Cow::Borrowed(value)),
    }
}

impl HtmlEngine for DomEngine {
    fn backend(&self) -> &'static str {
        "html5ever"
    }

    fn clean(&self, html: &str, profile: &CleanProfile) -> Result<String, EngineError> {
        let tags: HashSet<&str> = profile
            .tags()
            .iter()
            .map(String::as_str)
            .filter(|t| !RAW_TEXT_TAGS.contains(t))
            .collect();
        let attributes: HashSet<&str> = profile.attributes().iter().map(String::as_str).collect();
        let policy = Arc::clone(profile.policy());

        let mut builder = Builder::empty();
        builder
            .tags(tags)
            .generic_attributes(attributes)
            .clean_content_tags(RAW_TEXT_TAGS.iter().copied().collect())
            .url_schemes(URL_SCHEMES.iter().copied().collect())
            .url_relative(UrlRelative::PassThrough)
            .link_rel(Some("noopener noreferrer"))
            .strip_comments(true)
            .attribute_filter(move |_element, attribute, value| {
                vet_attribute(&policy, attribute, value)
            });

        // ammonia asserts on inconsistent builder state; never let that
        // escape into page rendering.
        panic::catch_unwind(AssertUnwindSafe(|| builder.clean(html).to_string())).map_err(|_| {
            EngineError::new(EngineErrorKind::Failed, "engine panicked while cleaning")
        })
    }
}
