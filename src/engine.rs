//! Rich-text engine adapter.
//!
//! The engine is a DOM-based HTML sanitizer. Exactly one instance exists
//! per process: the first call to [`shared`] runs the capability probe and
//! memoizes the outcome. When no backend is available the probe's error is
//! returned to every caller, and each call site recovers with a primitive
//! fallback on its own.

#[cfg(feature = "html-engine")]
mod dom;

#[cfg(feature = "html-engine")]
pub use dom::DomEngine;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::{EngineError, SanitizationPolicy};

/// Shared handle to the process-wide engine.
pub type EngineHandle = Arc<dyn HtmlEngine>;

static SHARED: OnceLock<Result<EngineHandle, EngineError>> = OnceLock::new();

/// A DOM-backed HTML sanitizer.
///
/// Implementations parse `html` as a fragment, drop every element and
/// attribute the profile does not allow, and serialise the result.
pub trait HtmlEngine: Send + Sync + fmt::Debug {
    /// Short name of the backing implementation, for logs.
    fn backend(&self) -> &'static str;

    /// Cleans an HTML fragment according to `profile`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` if the backend fails; callers fall back to the
    /// primitive sanitizers.
    fn clean(&self, html: &str, profile: &CleanProfile) -> Result<String, EngineError>;
}

/// Returns the process-wide engine, probing for a backend on first use.
///
/// # Errors
///
/// Returns `EngineError` with kind `Unavailable` when the crate was built
/// without a DOM backend. The same error is returned on every call.
pub fn shared() -> Result<EngineHandle, EngineError> {
    SHARED.get_or_init(probe).clone()
}

#[cfg(feature = "html-engine")]
fn probe() -> Result<EngineHandle, EngineError> {
    let engine = DomEngine::new();
    crate::logging::engine_selected(engine.backend());
    Ok(Arc::new(engine))
}

#[cfg(not(feature = "html-engine"))]
fn probe() -> Result<EngineHandle, EngineError> {
    Err(EngineError::new(
        crate::EngineErrorKind::Unavailable,
        "built without the html-engine feature",
    ))
}

/// Caller-side restrictions for the rich-HTML profile.
///
/// Options can only remove tags from the policy ceiling, never add them.
///
/// # Examples
///
/// ```
/// use content_sanitize::{CleanProfile, HtmlOptions, SanitizationPolicy};
/// use std::sync::Arc;
///
/// let policy = Arc::new(SanitizationPolicy::default());
/// let options = HtmlOptions { allow_images: false, ..HtmlOptions::default() };
/// let profile = CleanProfile::rich(&policy, &options);
///
/// assert!(!profile.tags().contains("img"));
/// assert!(profile.tags().contains("a"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Keep `<a>` elements
    pub allow_links: bool,
    /// Keep `<img>` elements
    pub allow_images: bool,
    /// Further restrict tags to this list (intersected with the ceiling)
    pub only_tags: Option<Vec<String>>,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            allow_links: true,
            allow_images: true,
            only_tags: None,
        }
    }
}

/// What the engine may keep for one clean call.
#[derive(Debug, Clone)]
pub struct CleanProfile {
    tags: BTreeSet<String>,
    attributes: BTreeSet<String>,
    policy: Arc<SanitizationPolicy>,
}

impl CleanProfile {
    /// Strips every tag and keeps text content.
    pub fn text_only(policy: &Arc<SanitizationPolicy>) -> Self {
        Self {
            tags: BTreeSet::new(),
            attributes: BTreeSet::new(),
            policy: Arc::clone(policy),
        }
    }

    /// Keeps only `<a href>`; used to round-trip a single URL.
    pub fn anchor(policy: &Arc<SanitizationPolicy>) -> Self {
        Self {
            tags: BTreeSet::from(["a".to_string()]),
            attributes: BTreeSet::from(["href".to_string()]),
            policy: Arc::clone(policy),
        }
    }

    /// The policy ceiling narrowed by `options`.
    pub fn rich(policy: &Arc<SanitizationPolicy>, options: &HtmlOptions) -> Self {
        let mut tags: BTreeSet<String> = policy
            .allowed_tags()
            .difference(policy.forbidden_tags())
            .cloned()
            .collect();
        let mut attributes: BTreeSet<String> = policy
            .allowed_attributes()
            .iter()
            .filter(|a| !policy.is_event_handler(a))
            .cloned()
            .collect();

        if !options.allow_links {
            tags.remove("a");
            attributes.remove("href");
        }
        if !options.allow_images {
            tags.remove("img");
            attributes.remove("src");
        }
        if let Some(only) = &options.only_tags {
            let only: BTreeSet<String> = only.iter().map(|t| t.to_ascii_lowercase()).collect();
            tags.retain(|t| only.contains(t));
        }

        Self {
            tags,
            attributes,
            policy: Arc::clone(policy),
        }
    }

    /// Tags the engine may keep.
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Attributes the engine may keep on any kept tag.
    pub fn attributes(&self) -> &BTreeSet<String> {
        &self.attributes
    }

    /// Policy used to vet `href`/`src` values and event handlers.
    pub fn policy(&self) -> &Arc<SanitizationPolicy> {
        &self.policy
    }
}
