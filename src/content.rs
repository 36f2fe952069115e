use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::engine::{self, CleanProfile, EngineHandle, HtmlOptions};
use crate::{
    escape_html, logging, sanitize_text, EngineError, EngineErrorKind, SanitizationError,
    SanitizationErrorKind, SanitizationPolicy, UrlSanitizer,
};

#[derive(Clone)]
enum EngineSlot {
    Shared,
    Fixed(EngineHandle),
    Absent,
}

impl fmt::Debug for EngineSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineSlot::Shared => write!(f, "Shared"),
            EngineSlot::Fixed(engine) => write!(f, "Fixed({})", engine.backend()),
            EngineSlot::Absent => write!(f, "Absent"),
        }
    }
}

/// Engine-backed sanitizer for everything the renderer receives.
///
/// Every method is total: it returns a sanitized value for any input and
/// never an error. When the engine is unavailable or fails, each method
/// falls back to the primitive sanitizers independently.
///
/// The async methods perform no I/O; they exist so that sibling blocks,
/// spans and mark definitions can be sanitized as jointly awaited futures.
///
/// # Examples
///
/// ```
/// use content_sanitize::ContentSanitizer;
/// use futures::executor::block_on;
///
/// let sanitizer = ContentSanitizer::new();
///
/// let title = block_on(sanitizer.text("<b>Hello</b> world"));
/// assert_eq!(title, "Hello world");
///
/// let href = block_on(sanitizer.url("javascript:alert(1)"));
/// assert_eq!(href, "");
/// ```
#[derive(Debug, Clone)]
pub struct ContentSanitizer {
    policy: Arc<SanitizationPolicy>,
    engine: EngineSlot,
}

impl Default for ContentSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentSanitizer {
    /// Creates a sanitizer using the process-wide policy and engine.
    pub fn new() -> Self {
        Self {
            policy: Arc::new(SanitizationPolicy::global().clone()),
            engine: EngineSlot::Shared,
        }
    }

    /// Replaces the policy used by this sanitizer.
    pub fn with_policy(mut self, policy: SanitizationPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Uses a specific engine instead of the process-wide one.
    pub fn with_engine(mut self, engine: EngineHandle) -> Self {
        self.engine = EngineSlot::Fixed(engine);
        self
    }

    /// Disables the engine so every call takes its primitive fallback.
    pub fn without_engine(mut self) -> Self {
        self.engine = EngineSlot::Absent;
        self
    }

    /// The policy this sanitizer enforces.
    pub fn policy(&self) -> &SanitizationPolicy {
        &self.policy
    }

    /// Resolves the engine for one call.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` if no engine is available to this sanitizer.
    pub fn engine(&self) -> Result<EngineHandle, EngineError> {
        match &self.engine {
            EngineSlot::Shared => engine::shared(),
            EngineSlot::Fixed(engine) => Ok(Arc::clone(engine)),
            EngineSlot::Absent => Err(EngineError::new(
                EngineErrorKind::Unavailable,
                "engine disabled for this sanitizer",
            )),
        }
    }

    fn clean_with_engine(&self, html: &str, profile: &CleanProfile) -> Result<String, EngineError> {
        self.engine()?.clean(html, profile)
    }

    /// Sanitizes plain text with the engine, stripping every tag.
    ///
    /// Stronger than [`sanitize_text`]: the engine parses real markup, so
    /// obfuscated tags a regex would miss are removed too. The engine result
    /// is trimmed, which suits standalone fields such as titles and alt text.
    /// Falls back to [`sanitize_text`], untrimmed, if the engine is unusable.
    pub async fn text(&self, input: &str) -> String {
        self.strip_all("text", input, true)
    }

    /// Like [`text`](Self::text) but keeps leading and trailing whitespace,
    /// so adjacent spans of one block still join with their spaces.
    pub(crate) async fn span_text(&self, input: &str) -> String {
        self.strip_all("span", input, false)
    }

    fn strip_all(&self, site: &'static str, input: &str, trim: bool) -> String {
        if input.is_empty() {
            return String::new();
        }

        let profile = CleanProfile::text_only(&self.policy);
        match self.clean_with_engine(input, &profile) {
            Ok(cleaned) if trim => cleaned.trim().to_string(),
            Ok(cleaned) => cleaned,
            Err(e) => {
                logging::engine_fallback(site, &e);
                sanitize_text(input)
            }
        }
    }

    /// Sanitizes a URL, round-tripping it through the engine as an anchor.
    ///
    /// Returns `""` when the URL is rejected. If the engine is unusable the
    /// result of the synchronous URL checks is returned; if the engine strips
    /// the `href`, the URL is rejected.
    pub async fn url(&self, input: &str) -> String {
        let checked = match UrlSanitizer::with_policy(&self.policy).check(input) {
            Ok(checked) => checked,
            Err(e) => {
                if e.kind() != SanitizationErrorKind::Empty {
                    logging::policy_violation("url", &e);
                }
                return String::new();
            }
        };

        let fragment = format!("<a href=\"{}\">link</a>", escape_html(checked));
        let profile = CleanProfile::anchor(&self.policy);

        match self.clean_with_engine(&fragment, &profile) {
            Ok(cleaned) => match extract_href(&cleaned) {
                Some(href) => href,
                None => {
                    logging::policy_violation(
                        "url",
                        &SanitizationError::new(
                            SanitizationErrorKind::DisallowedUri,
                            "engine removed the href",
                        ),
                    );
                    String::new()
                }
            },
            Err(e) => {
                logging::engine_fallback("url", &e);
                checked.to_string()
            }
        }
    }

    /// Sanitizes curated rich HTML against the policy ceiling narrowed by `options`.
    ///
    /// Falls back to fully escaped text if the engine is unusable.
    pub async fn html(&self, input: &str, options: &HtmlOptions) -> String {
        if input.is_empty() {
            return String::new();
        }

        let profile = CleanProfile::rich(&self.policy, options);
        match self.clean_with_engine(input, &profile) {
            Ok(cleaned) => cleaned,
            Err(e) => {
                logging::engine_fallback("html", &e);
                sanitize_text(input)
            }
        }
    }
}

fn href_attribute() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\shref="([^"]*)""#).expect("href pattern must compile"))
}

/// Extracts and unescapes the `href` of the first anchor in serialised HTML.
fn extract_href(html: &str) -> Option<String> {
    let raw = href_attribute().captures(html)?.get(1)?.as_str();
    let href = html_escape::decode_html_entities(raw).into_owned();
    if href.is_empty() {
        None
    } else {
        Some(href)
    }
}
