use super::Sanitizer;
use crate::{SanitizationError, SanitizationErrorKind, SanitizationPolicy, Tainted, Verified};

/// URL sanitizer enforcing the protocol deny list and the allowed URI pattern.
///
/// Checks, in order:
/// 1. Trim; reject empty input and embedded control characters.
/// 2. Reject any denied protocol (`javascript:`, `data:`, `vbscript:`, `file:`, `blob:`).
/// 3. Accept only what matches the allowed URI pattern.
///
/// The deny list runs first so a loosely configured allow pattern cannot
/// let a dangerous scheme through.
///
/// # Examples
///
/// ```
/// use content_sanitize::{Sanitizer, Tainted, UrlSanitizer, SanitizationErrorKind};
///
/// let sanitizer = UrlSanitizer::new();
///
/// let ok = sanitizer.sanitize(Tainted::new("mailto:info@example.jp".to_string()));
/// assert_eq!(ok.unwrap().as_ref(), "mailto:info@example.jp");
///
/// let relative = sanitizer.sanitize(Tainted::new("about/us".to_string()));
/// assert_eq!(relative.unwrap_err().kind(), SanitizationErrorKind::DisallowedUri);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct UrlSanitizer<'p> {
    policy: &'p SanitizationPolicy,
}

impl UrlSanitizer<'static> {
    /// Creates a URL sanitizer bound to the process-wide policy.
    pub fn new() -> Self {
        Self::with_policy(SanitizationPolicy::global())
    }
}

impl Default for UrlSanitizer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p> UrlSanitizer<'p> {
    /// Creates a URL sanitizer bound to a specific policy.
    pub fn with_policy(policy: &'p SanitizationPolicy) -> Self {
        Self { policy }
    }

    /// Applies the checks to a borrowed URL, returning the trimmed slice.
    pub(crate) fn check<'a>(&self, raw: &'a str) -> Result<&'a str, SanitizationError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(SanitizationError::new(
                SanitizationErrorKind::Empty,
                "url is empty",
            ));
        }

        if trimmed.chars().any(char::is_control) {
            return Err(SanitizationError::new(
                SanitizationErrorKind::MalformedInput,
                "url contains control characters",
            ));
        }

        if let Some(protocol) = self.policy.denied_protocol(trimmed) {
            return Err(SanitizationError::new(
                SanitizationErrorKind::ForbiddenProtocol,
                format!("protocol '{}' is denied", protocol),
            ));
        }

        if !self.policy.is_allowed_uri(trimmed) {
            return Err(SanitizationError::new(
                SanitizationErrorKind::DisallowedUri,
                "url does not match the allowed uri pattern",
            ));
        }

        Ok(trimmed)
    }
}

impl Sanitizer<String> for UrlSanitizer<'_> {
    fn sanitize(&self, input: Tainted<String>) -> Result<Verified<String>, SanitizationError> {
        let raw = input.into_inner();
        let checked = self.check(&raw)?;
        Ok(Verified::new_unchecked(checked.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PolicyConfig;

    fn kind_of(input: &str) -> Option<SanitizationErrorKind> {
        UrlSanitizer::new()
            .sanitize(Tainted::new(input.to_string()))
            .err()
            .map(|e| e.kind())
    }

    #[test]
    fn accepts_web_schemes() {
        assert_eq!(kind_of("https://example.com/x"), None);
        assert_eq!(kind_of("http://example.com"), None);
        assert_eq!(kind_of("ftps://files.example.com/a.pdf"), None);
    }

    #[test]
    fn rejects_mixed_case_javascript() {
        assert_eq!(
            kind_of("  JaVaScRiPt:alert(1)"),
            Some(SanitizationErrorKind::ForbiddenProtocol)
        );
    }

    #[test]
    fn rejects_control_characters() {
        assert_eq!(
            kind_of("java\tscript:alert(1)"),
            Some(SanitizationErrorKind::MalformedInput)
        );
        assert_eq!(
            kind_of("/path\u{0000}"),
            Some(SanitizationErrorKind::MalformedInput)
        );
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        assert_eq!(kind_of(""), Some(SanitizationErrorKind::Empty));
        assert_eq!(kind_of("   "), Some(SanitizationErrorKind::Empty));
    }

    #[test]
    fn rejects_unknown_scheme() {
        assert_eq!(
            kind_of("gopher://example.com"),
            Some(SanitizationErrorKind::DisallowedUri)
        );
    }

    #[test]
    fn deny_list_wins_over_permissive_allow_pattern() {
        let config = PolicyConfig {
            allowed_uri_pattern: ".*".to_string(),
            ..PolicyConfig::default()
        };
        let policy = config.build().expect("valid policy");
        let sanitizer = UrlSanitizer::with_policy(&policy);

        let result = sanitizer.sanitize(Tainted::new("data:text/html,x".to_string()));
        assert_eq!(
            result.unwrap_err().kind(),
            SanitizationErrorKind::ForbiddenProtocol
        );
    }

    #[test]
    fn error_does_not_leak_input() {
        let error = UrlSanitizer::new()
            .sanitize(Tainted::new("javascript:stealCookies()".to_string()))
            .unwrap_err();
        assert!(!format!("{}", error).contains("stealCookies"));
    }

    mod proptests {
        use super::*;
        use crate::test_utils::{arb_denied_protocol, arb_https_url};
        use proptest::prelude::*;

        proptest! {
            /// Denied protocols are rejected whatever their case or payload.
            #[test]
            fn proptest_denied_protocols_rejected(
                scheme in arb_denied_protocol(),
                payload in "[ -~]{0,40}",
                padding in "[ \n]{0,3}",
            ) {
                let input = format!("{}{}{}", padding, scheme, payload);
                prop_assert_eq!(kind_of(&input), Some(SanitizationErrorKind::ForbiddenProtocol));
            }

            /// Allowed URLs come back as the trimmed input.
            #[test]
            fn proptest_https_urls_pass_unchanged(url in arb_https_url()) {
                let padded = format!("  {}\n", url);
                let verified = UrlSanitizer::new()
                    .sanitize(Tainted::new(padded))
                    .expect("https URL should pass");
                prop_assert_eq!(verified.as_ref(), &url);
            }
        }
    }
}
