use std::fmt;

/// A wrapper for semi-trusted CMS content that must pass a sanitizer before rendering.
///
/// Editors can put anything into rich-text fields, titles, slugs and link
/// targets, so every value handed over by the CMS collaborator starts out as
/// `Tainted<T>`. The only way to read it back is through a
/// [`Sanitizer`](crate::Sanitizer), which yields a [`Verified<T>`](crate::Verified).
///
/// # Security Properties
///
/// - Does NOT implement `Deref` or any implicit conversion traits
/// - Inner value is inaccessible outside this crate
///
/// # Examples
///
/// ```
/// use content_sanitize::Tainted;
///
/// let title = Tainted::new("<script>alert(1)</script>Obon festival".to_string());
///
/// // Debug output shows it's tainted
/// println!("{:?}", title);
///
/// // But the value cannot be used directly:
/// // let html = format!("<h1>{}</h1>", title); // Won't compile!
/// ```
#[derive(Clone)]
pub struct Tainted<T> {
    // Must stay private: a public field bypasses every sanitizer.
    inner: T,
}

impl<T> Tainted<T> {
    /// Wraps an untrusted value in `Tainted`.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Extracts the inner value for sanitization.
    ///
    /// Only sanitizer implementations inside this crate may call this, and
    /// only to validate the value before wrapping it in `Verified<T>`.
    pub(crate) fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: fmt::Debug> fmt::Debug for Tainted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tainted")
            .field("inner", &self.inner)
            .finish()
    }
}
