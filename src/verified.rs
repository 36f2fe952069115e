/// A value that has passed a sanitizer and is safe to hand to the renderer.
///
/// `Verified<T>` has no public constructor. It is produced only by the
/// [`Sanitizer`](crate::Sanitizer) implementations in this crate, so holding
/// one proves the value went through a sanitization policy.
///
/// # Access
///
/// - [`AsRef::as_ref`]: borrow the sanitized value
/// - [`into_inner`](Self::into_inner): consume and extract the value
///
/// # Examples
///
/// External callers cannot create `Verified<T>` directly:
///
/// ```compile_fail
/// use content_sanitize::Verified;
///
/// let verified = Verified::new("data".to_string());
/// ```
///
/// ```
/// use content_sanitize::{Sanitizer, Tainted, UrlSanitizer};
///
/// let verified = UrlSanitizer::new()
///     .sanitize(Tainted::new(" /teachings ".to_string()))
///     .expect("root-relative paths are allowed");
/// assert_eq!(verified.as_ref(), "/teachings");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified<T> {
    inner: T,
}

impl<T> Verified<T> {
    /// Creates a `Verified<T>` without performing validation.
    ///
    /// Callers must have applied the relevant policy first.
    pub(crate) fn new_unchecked(value: T) -> Self {
        Self { inner: value }
    }

    /// Consumes the `Verified<T>` and returns the inner value.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> AsRef<T> for Verified<T> {
    fn as_ref(&self) -> &T {
        &self.inner
    }
}
