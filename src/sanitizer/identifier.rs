use super::Sanitizer;
use crate::{SanitizationError, SanitizationErrorKind, SanitizationPolicy, Tainted, Verified};

/// Validates span mark identifiers (`strong`, `em`, or a mark-definition key).
///
/// Identifiers are passed through unchanged or rejected; nothing is rewritten.
#[derive(Debug, Clone, Copy)]
pub struct MarkSanitizer<'p> {
    policy: &'p SanitizationPolicy,
}

impl<'p> MarkSanitizer<'p> {
    /// Creates a mark sanitizer bound to a policy.
    pub fn with_policy(policy: &'p SanitizationPolicy) -> Self {
        Self { policy }
    }
}

impl Sanitizer<String> for MarkSanitizer<'_> {
    fn sanitize(&self, input: Tainted<String>) -> Result<Verified<String>, SanitizationError> {
        let mark = input.into_inner();
        if self.policy.is_valid_mark(&mark) {
            Ok(Verified::new_unchecked(mark))
        } else {
            Err(SanitizationError::new(
                SanitizationErrorKind::InvalidMark,
                "mark identifier has disallowed characters",
            ))
        }
    }
}

/// Validates keys of linked-data objects.
///
/// Rejects keys outside the key pattern and keys shaped like inline event
/// handlers.
///
/// # Examples
///
/// ```
/// use content_sanitize::{KeySanitizer, Sanitizer, SanitizationPolicy, Tainted};
///
/// let policy = SanitizationPolicy::default();
/// let keys = KeySanitizer::with_policy(&policy);
///
/// assert!(keys.sanitize(Tainted::new("@context".to_string())).is_ok());
/// assert!(keys.sanitize(Tainted::new("onload".to_string())).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct KeySanitizer<'p> {
    policy: &'p SanitizationPolicy,
}

impl<'p> KeySanitizer<'p> {
    /// Creates a key sanitizer bound to a policy.
    pub fn with_policy(policy: &'p SanitizationPolicy) -> Self {
        Self { policy }
    }
}

impl Sanitizer<String> for KeySanitizer<'_> {
    fn sanitize(&self, input: Tainted<String>) -> Result<Verified<String>, SanitizationError> {
        let key = input.into_inner();
        if self.policy.is_valid_key(&key) {
            Ok(Verified::new_unchecked(key))
        } else {
            Err(SanitizationError::new(
                SanitizationErrorKind::InvalidKey,
                "linked-data key is not allowed",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_accept_decorators_and_keys() {
        let policy = SanitizationPolicy::default();
        let marks = MarkSanitizer::with_policy(&policy);

        for mark in ["strong", "em", "underline", "a1b2c3", "link_key-1"] {
            assert!(marks.sanitize(Tainted::new(mark.to_string())).is_ok(), "{}", mark);
        }
    }

    #[test]
    fn marks_reject_injection() {
        let policy = SanitizationPolicy::default();
        let marks = MarkSanitizer::with_policy(&policy);

        for mark in ["", "bad mark", "x\"onclick", "<b>", "a.b"] {
            let error = marks.sanitize(Tainted::new(mark.to_string())).unwrap_err();
            assert_eq!(error.kind(), SanitizationErrorKind::InvalidMark);
        }
    }

    #[test]
    fn keys_reject_spaces_and_handlers() {
        let policy = SanitizationPolicy::default();
        let keys = KeySanitizer::with_policy(&policy);

        for key in ["bad key", "onerror", "ONMOUSEOVER", "</script>", ""] {
            let error = keys.sanitize(Tainted::new(key.to_string())).unwrap_err();
            assert_eq!(error.kind(), SanitizationErrorKind::InvalidKey);
        }
        assert!(keys.sanitize(Tainted::new("@type".to_string())).is_ok());
        assert!(keys.sanitize(Tainted::new("name".to_string())).is_ok());
    }
}
