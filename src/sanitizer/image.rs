use url::Url;

use super::{Sanitizer, UrlSanitizer};
use crate::{SanitizationError, SanitizationErrorKind, SanitizationPolicy, Tainted, Verified};

/// Image URL sanitizer: the URL policy plus a host and extension allowlist.
///
/// Trust tiers, first match wins:
/// 1. CMS CDN asset URLs matching the trusted CDN pattern.
/// 2. Absolute `https` URLs on a trusted host with a valid image extension.
/// 3. Root-relative `/images/...` paths with a valid image extension.
///
/// Anything that does not parse as an absolute URL is judged by tier 3.
#[derive(Debug, Clone, Copy)]
pub struct ImageUrlSanitizer<'p> {
    policy: &'p SanitizationPolicy,
}

impl ImageUrlSanitizer<'static> {
    /// Creates an image URL sanitizer bound to the process-wide policy.
    pub fn new() -> Self {
        Self::with_policy(SanitizationPolicy::global())
    }
}

impl Default for ImageUrlSanitizer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p> ImageUrlSanitizer<'p> {
    /// Creates an image URL sanitizer bound to a specific policy.
    pub fn with_policy(policy: &'p SanitizationPolicy) -> Self {
        Self { policy }
    }

    fn check_absolute(&self, parsed: &Url) -> Result<(), SanitizationError> {
        if parsed.scheme() != "https" {
            return Err(SanitizationError::new(
                SanitizationErrorKind::UntrustedImageHost,
                format!("image scheme '{}' is not https", parsed.scheme()),
            ));
        }

        let trusted = parsed
            .host_str()
            .map(|host| self.policy.is_trusted_image_host(host))
            .unwrap_or(false);
        if !trusted {
            return Err(SanitizationError::new(
                SanitizationErrorKind::UntrustedImageHost,
                "image host is not in the trusted allowlist",
            ));
        }

        if !self.policy.has_image_extension(parsed.path()) {
            return Err(SanitizationError::new(
                SanitizationErrorKind::InvalidImageExtension,
                "image path has no valid extension",
            ));
        }

        Ok(())
    }

    fn check_relative(&self, url: &str) -> Result<(), SanitizationError> {
        if url.starts_with('/') && self.policy.is_local_image(url) {
            return Ok(());
        }
        Err(SanitizationError::new(
            SanitizationErrorKind::UntrustedImageHost,
            "relative image url is not under /images/",
        ))
    }
}

impl Sanitizer<String> for ImageUrlSanitizer<'_> {
    fn sanitize(&self, input: Tainted<String>) -> Result<Verified<String>, SanitizationError> {
        let raw = input.into_inner();
        let url = UrlSanitizer::with_policy(self.policy).check(&raw)?;

        if self.policy.is_trusted_cdn_url(url) {
            return Ok(Verified::new_unchecked(url.to_string()));
        }

        match Url::parse(url) {
            Ok(parsed) => self.check_absolute(&parsed)?,
            Err(_) => self.check_relative(url)?,
        }

        Ok(Verified::new_unchecked(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(input: &str) -> Result<String, SanitizationErrorKind> {
        ImageUrlSanitizer::new()
            .sanitize(Tainted::new(input.to_string()))
            .map(Verified::into_inner)
            .map_err(|e| e.kind())
    }

    #[test]
    fn cdn_asset_url_is_trusted() {
        let url = "https://cdn.sanity.io/images/abc123/production/f00d-1200x800.jpg";
        assert_eq!(check(url), Ok(url.to_string()));
    }

    #[test]
    fn cdn_asset_url_with_transform_query_is_trusted() {
        let url = "https://cdn.sanity.io/images/abc123/production/f00d-1200x800.jpg?w=800&auto=format";
        assert_eq!(check(url), Ok(url.to_string()));
    }

    #[test]
    fn trusted_host_requires_extension() {
        assert_eq!(
            check("https://images.unsplash.com/photo-123"),
            Err(SanitizationErrorKind::InvalidImageExtension)
        );
        assert_eq!(
            check("https://images.unsplash.com/photo.exe"),
            Err(SanitizationErrorKind::InvalidImageExtension)
        );
    }

    #[test]
    fn untrusted_host_is_rejected() {
        assert_eq!(
            check("https://evil.example/x.png"),
            Err(SanitizationErrorKind::UntrustedImageHost)
        );
    }

    #[test]
    fn plain_http_is_rejected() {
        assert_eq!(
            check("http://images.unsplash.com/photo.jpg"),
            Err(SanitizationErrorKind::UntrustedImageHost)
        );
    }

    #[test]
    fn url_policy_runs_first() {
        assert_eq!(
            check("data:image/png;base64,AAAA"),
            Err(SanitizationErrorKind::ForbiddenProtocol)
        );
    }

    #[test]
    fn local_images_are_allowed() {
        assert_eq!(
            check("/images/hondo/interior.webp"),
            Ok("/images/hondo/interior.webp".to_string())
        );
    }

    #[test]
    fn protocol_relative_url_is_rejected() {
        assert_eq!(
            check("//evil.example/images/x.png"),
            Err(SanitizationErrorKind::UntrustedImageHost)
        );
    }

    #[test]
    fn fragment_is_not_an_image() {
        assert_eq!(check("#top"), Err(SanitizationErrorKind::UntrustedImageHost));
    }

    #[test]
    fn non_image_local_path_is_rejected() {
        assert_eq!(
            check("/admin/export.csv"),
            Err(SanitizationErrorKind::UntrustedImageHost)
        );
    }
}
