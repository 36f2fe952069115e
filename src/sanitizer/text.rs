use std::sync::OnceLock;

use regex::Regex;

use super::Sanitizer;
use crate::{SanitizationError, SanitizationErrorKind, Tainted, Verified};

/// Script and style elements, including their content.
fn raw_text_element() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>")
            .expect("raw text element pattern must compile")
    })
}

/// Anything a browser would start parsing as markup: `<` followed by a
/// letter, `/`, `!` or `?`, up to the next `>` or the end of input.
fn tag_like() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<[a-zA-Z/!?][^>]*(?:>|$)").expect("tag pattern must compile")
    })
}

/// Removes every tag-like substring, dropping script and style bodies.
///
/// An unterminated tag swallows the rest of the input.
///
/// # Examples
///
/// ```
/// use content_sanitize::strip_tags;
///
/// assert_eq!(strip_tags("<p>Hello <b>World</b></p>"), "Hello World");
/// assert_eq!(strip_tags("1 < 2"), "1 < 2");
/// assert_eq!(strip_tags("ok<img src=x onerror=alert(1)"), "ok");
/// ```
pub fn strip_tags(input: &str) -> String {
    let without_bodies = raw_text_element().replace_all(input, "");
    tag_like().replace_all(&without_bodies, "").into_owned()
}

/// Escapes the five HTML-significant characters `& < > " '`.
///
/// # Examples
///
/// ```
/// use content_sanitize::escape_html;
///
/// assert_eq!(
///     escape_html(r#"A & B < C > D "q" 's'"#),
///     "A &amp; B &lt; C &gt; D &quot;q&quot; &#x27;s&#x27;"
/// );
/// ```
pub fn escape_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            _ => output.push(c),
        }
    }
    output
}

/// The synchronous text primitive: strip tags, then escape entities.
///
/// The output contains no literal `<` or `>` and is safe in a text node.
/// It is not idempotent on `&`: re-sanitizing `&amp;` yields `&amp;amp;`.
///
/// # Examples
///
/// ```
/// use content_sanitize::{Sanitizer, Tainted, TextSanitizer};
///
/// let verified = TextSanitizer::new()
///     .sanitize(Tainted::new("<em>Zazen</em> at 6:00".to_string()))
///     .expect("non-empty input");
/// assert_eq!(verified.as_ref(), "Zazen at 6:00");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSanitizer;

impl TextSanitizer {
    /// Creates a text sanitizer.
    pub fn new() -> Self {
        Self
    }
}

impl Sanitizer<String> for TextSanitizer {
    fn sanitize(&self, input: Tainted<String>) -> Result<Verified<String>, SanitizationError> {
        let raw = input.into_inner();

        if raw.is_empty() {
            return Err(SanitizationError::new(
                SanitizationErrorKind::Empty,
                "text is empty",
            ));
        }

        Ok(Verified::new_unchecked(escape_html(&strip_tags(&raw))))
    }
}
