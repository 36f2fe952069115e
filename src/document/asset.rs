use serde::Deserialize;

use super::model::{AssetRef, ImageBlock};
use crate::sanitize_image_url;

/// Location of the CMS image CDN for one project and dataset.
///
/// # Examples
///
/// ```
/// use content_sanitize::document::{AssetRef, CdnConfig};
///
/// let cdn = CdnConfig::new("abc123", "production");
/// let asset = AssetRef {
///     reference: Some("image-f00d-1200x800-jpg".to_string()),
///     ..AssetRef::default()
/// };
///
/// assert_eq!(
///     asset.cdn_url(&cdn).as_deref(),
///     Some("https://cdn.sanity.io/images/abc123/production/f00d-1200x800.jpg")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdnConfig {
    /// CDN host name
    #[serde(default = "default_host")]
    pub host: String,
    /// CMS project identifier
    pub project_id: String,
    /// CMS dataset name
    pub dataset: String,
}

fn default_host() -> String {
    "cdn.sanity.io".to_string()
}

impl CdnConfig {
    /// Configures the default CDN host for a project and dataset.
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            project_id: project_id.into(),
            dataset: dataset.into(),
        }
    }
}

impl AssetRef {
    /// Builds the CDN URL for an `image-<id>-<WxH>-<ext>` reference.
    ///
    /// Returns `None` if there is no reference or it has another shape.
    pub fn cdn_url(&self, cdn: &CdnConfig) -> Option<String> {
        let rest = self.reference.as_deref()?.strip_prefix("image-")?;
        let (rest, extension) = rest.rsplit_once('-')?;
        let (id, dimensions) = rest.rsplit_once('-')?;

        let (width, height) = dimensions.split_once('x')?;
        let numeric = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        let alphanumeric = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric());
        if !numeric(width) || !numeric(height) || !alphanumeric(id) || !alphanumeric(extension) {
            return None;
        }

        Some(format!(
            "https://{}/images/{}/{}/{}-{}.{}",
            cdn.host, cdn.project_id, cdn.dataset, id, dimensions, extension
        ))
    }
}

impl ImageBlock {
    /// Resolves the image to a URL that passed the image-URL policy.
    ///
    /// The asset reference is preferred over a pre-resolved `url`. Returns
    /// `""` if neither resolves to a trusted image location.
    pub fn image_url(&self, cdn: &CdnConfig) -> String {
        self.asset
            .cdn_url(cdn)
            .or_else(|| self.asset.url.clone())
            .map(|url| sanitize_image_url(&url))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Block;
    use serde_json::json;

    fn asset(reference: &str) -> AssetRef {
        AssetRef {
            reference: Some(reference.to_string()),
            ..AssetRef::default()
        }
    }

    #[test]
    fn cdn_url_rejects_malformed_references() {
        let cdn = CdnConfig::new("abc123", "production");
        for reference in [
            "file-f00d-pdf",
            "image-f00d-jpg",
            "image-f00d-12x-jpg",
            "image-../x-10x10-jpg",
            "image--10x10-jpg",
        ] {
            assert_eq!(asset(reference).cdn_url(&cdn), None, "{}", reference);
        }
        assert_eq!(AssetRef::default().cdn_url(&cdn), None);
    }

    #[test]
    fn image_url_uses_trusted_cdn() {
        let cdn = CdnConfig::new("abc123", "production");
        let Block::Image(image) = Block::from_value(json!({
            "_type": "image",
            "asset": { "_ref": "image-f00d-1200x800-webp" }
        })) else {
            panic!("expected image block");
        };
        assert_eq!(
            image.image_url(&cdn),
            "https://cdn.sanity.io/images/abc123/production/f00d-1200x800.webp"
        );
    }

    #[test]
    fn image_url_rejects_untrusted_host() {
        let cdn = CdnConfig {
            host: "evil.example".to_string(),
            ..CdnConfig::new("abc123", "production")
        };
        let Block::Image(image) = Block::from_value(json!({
            "_type": "image",
            "asset": { "_ref": "image-f00d-1200x800-png" }
        })) else {
            panic!("expected image block");
        };
        assert_eq!(image.image_url(&cdn), "");
    }

    #[test]
    fn image_url_falls_back_to_resolved_url() {
        let cdn = CdnConfig::new("abc123", "production");
        let Block::Image(image) = Block::from_value(json!({
            "_type": "image",
            "asset": { "url": "https://images.unsplash.com/photo-1.jpg" }
        })) else {
            panic!("expected image block");
        };
        assert_eq!(image.image_url(&cdn), "https://images.unsplash.com/photo-1.jpg");
    }

    #[test]
    fn cdn_config_deserializes_with_default_host() {
        let cdn: CdnConfig =
            serde_json::from_value(json!({ "projectId": "abc123", "dataset": "staging" })).unwrap();
        assert_eq!(cdn, CdnConfig::new("abc123", "staging"));
    }
}
