//! Built-in sanitization policy.
//!
//! These tables are the default values of every
//! [`PolicyConfig`](super::PolicyConfig) field. They also bound what a
//! configuration can do: allowed tags and attributes must come from the
//! allow lists here, the forbidden lists and denied protocols are always
//! merged in, and the URI, mark and key patterns always apply on top of the
//! configured ones. Image hosts, extensions and asset patterns are
//! deployment data and are replaced outright.

/// Tags the rich-HTML profile may keep.
pub const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "strong", "b", "em", "i", "u", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol",
    "li", "blockquote", "a", "img", "figure", "figcaption",
];

/// Attributes the rich-HTML profile may keep, on any allowed tag.
pub const ALLOWED_ATTRIBUTES: &[&str] = &["href", "src", "alt", "title", "class", "id"];

/// Tags that must never be allowed, whatever the configuration says.
pub const FORBIDDEN_TAGS: &[&str] = &["script", "object", "embed", "form", "input", "button"];

/// Inline event-handler attributes that must never be allowed.
pub const FORBIDDEN_ATTRIBUTES: &[&str] = &[
    "onerror",
    "onload",
    "onclick",
    "onmouseover",
    "onfocus",
    "onblur",
];

/// Schemes and shapes an `href`/`src` may take: web and ftp schemes,
/// `mailto:`, `tel:`, a bare fragment or a root-relative path.
pub const ALLOWED_URI_PATTERN: &str = r"(?i)^(?:(?:https?|ftps?):|mailto:|tel:|#|/)";

/// Protocols rejected before the allow pattern is consulted.
pub const DENIED_PROTOCOLS: &[&str] = &["javascript:", "data:", "vbscript:", "file:", "blob:"];

/// Asset URLs served by the CMS image CDN: `/images/{project}/{dataset}/{asset}.{ext}`.
pub const TRUSTED_CDN_PATTERN: &str = r"^https://cdn\.sanity\.io/images/[a-zA-Z0-9]+/[a-zA-Z0-9_-]+/[a-zA-Z0-9_-]+\.(?i:jpg|jpeg|png|gif|webp|svg)(?:\?[^\s#]*)?$";

/// Hosts trusted to serve images referenced by absolute URL.
pub const TRUSTED_IMAGE_HOSTS: &[&str] = &["cdn.sanity.io", "images.unsplash.com"];

/// Extensions accepted for image URLs.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// Site-local images under `/images/`.
pub const LOCAL_IMAGE_PATTERN: &str = r"^/images/(?:[a-zA-Z0-9_-]+/)*[a-zA-Z0-9_-][a-zA-Z0-9_.-]*\.(?i:jpg|jpeg|png|gif|webp|svg)$";

/// Span mark identifiers (decorators and mark-definition keys).
pub const MARK_PATTERN: &str = r"^[a-zA-Z0-9_-]+$";

/// Keys allowed in linked-data objects.
pub const KEY_PATTERN: &str = r"^[@a-zA-Z0-9_-]+$";

/// Keys shaped like inline event handlers, dropped from linked data.
pub const EVENT_HANDLER_PATTERN: &str = r"(?i)^on[a-z]+$";
