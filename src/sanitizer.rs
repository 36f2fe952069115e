//! Primitive sanitizers.
//!
//! Each primitive is a [`Sanitizer<String>`] that promotes a
//! `Tainted<String>` to a `Verified<String>` or explains why it refused.
//! The free functions at the bottom are the fail-closed surface used by
//! rendering code: they never return an error, only the sanitized value or
//! an empty string.

mod identifier;
mod image;
mod text;
mod uri;

pub use identifier::{KeySanitizer, MarkSanitizer};
pub use image::ImageUrlSanitizer;
pub use text::{escape_html, strip_tags, TextSanitizer};
pub use uri::UrlSanitizer;

use crate::{logging, SanitizationError, SanitizationErrorKind, Tainted, Verified};

/// Trait for sanitizing tainted values into verified values.
///
/// # Invariants
///
/// Implementations MUST:
/// - Validate/sanitize the input according to their policy rules
/// - Only call `Verified::new_unchecked` after validation succeeds
/// - Return `Err(SanitizationError)` if validation fails
/// - Not leak the rejected input in errors
///
/// # Examples
///
/// ```
/// use content_sanitize::{Sanitizer, Tainted, UrlSanitizer, SanitizationErrorKind};
///
/// let sanitizer = UrlSanitizer::new();
/// let error = sanitizer
///     .sanitize(Tainted::new("javascript:alert(1)".to_string()))
///     .unwrap_err();
///
/// assert_eq!(error.kind(), SanitizationErrorKind::ForbiddenProtocol);
/// ```
pub trait Sanitizer<T> {
    /// Sanitizes a tainted value, returning a verified value on success.
    ///
    /// # Errors
    ///
    /// Returns `SanitizationError` if the input fails the policy.
    fn sanitize(&self, input: Tainted<T>) -> Result<Verified<T>, SanitizationError>;
}

/// Unwraps a sanitizer result, logging and replacing rejections with `""`.
pub(crate) fn fail_closed(
    site: &'static str,
    result: Result<Verified<String>, SanitizationError>,
) -> String {
    match result {
        Ok(verified) => verified.into_inner(),
        Err(e) => {
            if e.kind() != SanitizationErrorKind::Empty {
                logging::policy_violation(site, &e);
            }
            String::new()
        }
    }
}

/// Strips tags and escapes entities; the synchronous text primitive.
///
/// Empty input yields an empty string. This is the lossy fallback used when
/// the DOM engine is unavailable.
///
/// # Examples
///
/// ```
/// use content_sanitize::sanitize_text;
///
/// assert_eq!(sanitize_text("<b>Hello</b> & welcome"), "Hello &amp; welcome");
/// assert_eq!(sanitize_text(""), "");
/// ```
pub fn sanitize_text(input: &str) -> String {
    fail_closed(
        "sanitize_text",
        TextSanitizer::new().sanitize(Tainted::new(input.to_owned())),
    )
}

/// Returns the trimmed URL if it passes the URL policy, otherwise `""`.
///
/// # Examples
///
/// ```
/// use content_sanitize::sanitize_url;
///
/// assert_eq!(sanitize_url(" https://example.com/x "), "https://example.com/x");
/// assert_eq!(sanitize_url("javascript:alert(1)"), "");
/// ```
pub fn sanitize_url(input: &str) -> String {
    fail_closed(
        "sanitize_url",
        UrlSanitizer::new().sanitize(Tainted::new(input.to_owned())),
    )
}

/// Returns the URL if it is a trusted image location, otherwise `""`.
///
/// # Examples
///
/// ```
/// use content_sanitize::sanitize_image_url;
///
/// assert_eq!(
///     sanitize_image_url("https://images.unsplash.com/photo.jpg"),
///     "https://images.unsplash.com/photo.jpg"
/// );
/// assert_eq!(sanitize_image_url("https://evil.example/x.png"), "");
/// ```
pub fn sanitize_image_url(input: &str) -> String {
    fail_closed(
        "sanitize_image_url",
        ImageUrlSanitizer::new().sanitize(Tainted::new(input.to_owned())),
    )
}
