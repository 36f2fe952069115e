//! Process-wide sanitization policy.
//!
//! The policy is described by a serde-deserialisable [`PolicyConfig`] and
//! compiled once into a [`SanitizationPolicy`]. After that it is read-only:
//! there is no API to mutate a built policy, and the process-wide instance
//! can be installed at most once.

pub mod defaults;

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::ConfigError;

static GLOBAL: OnceLock<SanitizationPolicy> = OnceLock::new();

/// Raw policy configuration as loaded from JSON.
///
/// Every field falls back to the built-in value from [`defaults`] when it is
/// missing, so a configuration file only needs to name what it changes.
///
/// # Examples
///
/// ```
/// use content_sanitize::PolicyConfig;
///
/// let config = PolicyConfig::from_json_str(r#"{ "trusted_image_hosts": ["cdn.sanity.io"] }"#)
///     .expect("valid config");
/// let policy = config.build().expect("valid policy");
///
/// assert!(policy.is_trusted_image_host("cdn.sanity.io"));
/// assert!(!policy.is_trusted_image_host("images.unsplash.com"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    /// Tags the rich-HTML profile may keep
    pub allowed_tags: Vec<String>,
    /// Attributes the rich-HTML profile may keep
    pub allowed_attributes: Vec<String>,
    /// Tags that may never be allowed
    pub forbidden_tags: Vec<String>,
    /// Attributes that may never be allowed
    pub forbidden_attributes: Vec<String>,
    /// Regex an `href`/`src` must match
    pub allowed_uri_pattern: String,
    /// Lowercase protocol prefixes rejected outright
    pub denied_protocols: Vec<String>,
    /// Regex for the highest-trust CDN image URLs
    pub trusted_cdn_pattern: String,
    /// Hosts trusted to serve images by absolute URL
    pub trusted_image_hosts: Vec<String>,
    /// Valid image file extensions, without the dot
    pub image_extensions: Vec<String>,
    /// Regex for root-relative site images
    pub local_image_pattern: String,
    /// Regex a span mark must match
    pub mark_pattern: String,
    /// Regex a linked-data key must match
    pub key_pattern: String,
    /// Regex for keys shaped like inline event handlers
    pub event_handler_pattern: String,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            allowed_tags: owned(defaults::ALLOWED_TAGS),
            allowed_attributes: owned(defaults::ALLOWED_ATTRIBUTES),
            forbidden_tags: owned(defaults::FORBIDDEN_TAGS),
            forbidden_attributes: owned(defaults::FORBIDDEN_ATTRIBUTES),
            allowed_uri_pattern: defaults::ALLOWED_URI_PATTERN.to_string(),
            denied_protocols: owned(defaults::DENIED_PROTOCOLS),
            trusted_cdn_pattern: defaults::TRUSTED_CDN_PATTERN.to_string(),
            trusted_image_hosts: owned(defaults::TRUSTED_IMAGE_HOSTS),
            image_extensions: owned(defaults::IMAGE_EXTENSIONS),
            local_image_pattern: defaults::LOCAL_IMAGE_PATTERN.to_string(),
            mark_pattern: defaults::MARK_PATTERN.to_string(),
            key_pattern: defaults::KEY_PATTERN.to_string(),
            event_handler_pattern: defaults::EVENT_HANDLER_PATTERN.to_string(),
        }
    }
}

impl PolicyConfig {
    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the JSON is malformed or names an unknown field.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, or
    /// `ConfigError::Parse` if its content is not a valid configuration.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Compiles and validates the configuration.
    ///
    /// A configuration can only tighten the built-in policy. The forbidden
    /// lists and denied protocols from [`defaults`] are always merged in,
    /// the built-in URI, mark and key patterns must match as well as the
    /// configured ones, and the built-in event-handler pattern always applies.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` if a regex does not compile,
    /// `ConfigError::Conflict` if an allowed tag or attribute is also forbidden
    /// or an allowed attribute is an event handler, or
    /// `ConfigError::OutsideCeiling` if an allowed tag or attribute is not in
    /// the built-in allow lists.
    pub fn build(&self) -> Result<SanitizationPolicy, ConfigError> {
        let allowed_tags = lowercase_set(&self.allowed_tags);
        let allowed_attributes = lowercase_set(&self.allowed_attributes);
        let forbidden_tags = floored(&self.forbidden_tags, defaults::FORBIDDEN_TAGS);
        let forbidden_attributes =
            floored(&self.forbidden_attributes, defaults::FORBIDDEN_ATTRIBUTES);

        let event_handler = Layered::compile(
            "event_handler_pattern",
            defaults::EVENT_HANDLER_PATTERN,
            &self.event_handler_pattern,
        )?;

        if let Some(tag) = allowed_tags.intersection(&forbidden_tags).next() {
            return Err(ConfigError::Conflict {
                field: "allowed_tags",
                entry: tag.clone(),
            });
        }
        if let Some(attr) = allowed_attributes
            .iter()
            .find(|a| forbidden_attributes.contains(*a) || event_handler.any_match(a))
        {
            return Err(ConfigError::Conflict {
                field: "allowed_attributes",
                entry: attr.clone(),
            });
        }
        outside_ceiling("allowed_tags", &allowed_tags, defaults::ALLOWED_TAGS)?;
        outside_ceiling("allowed_attributes", &allowed_attributes, defaults::ALLOWED_ATTRIBUTES)?;

        Ok(SanitizationPolicy {
            allowed_tags,
            allowed_attributes,
            forbidden_tags,
            forbidden_attributes,
            allowed_uri: Layered::compile(
                "allowed_uri_pattern",
                defaults::ALLOWED_URI_PATTERN,
                &self.allowed_uri_pattern,
            )?,
            denied_protocols: floored(&self.denied_protocols, defaults::DENIED_PROTOCOLS),
            trusted_cdn: compile("trusted_cdn_pattern", &self.trusted_cdn_pattern)?,
            trusted_image_hosts: lowercase_set(&self.trusted_image_hosts),
            image_extensions: self
                .image_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            local_image: compile("local_image_pattern", &self.local_image_pattern)?,
            mark: Layered::compile("mark_pattern", defaults::MARK_PATTERN, &self.mark_pattern)?,
            key: Layered::compile("key_pattern", defaults::KEY_PATTERN, &self.key_pattern)?,
            event_handler,
        })
    }
}

fn lowercase_set(items: &[String]) -> BTreeSet<String> {
    items
        .iter()
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Configured entries plus the built-in ones, which cannot be removed.
fn floored(items: &[String], built_in: &[&str]) -> BTreeSet<String> {
    let mut set = lowercase_set(items);
    set.extend(built_in.iter().map(|s| s.to_string()));
    set
}

fn outside_ceiling(
    field: &'static str,
    allowed: &BTreeSet<String>,
    ceiling: &[&str],
) -> Result<(), ConfigError> {
    match allowed.iter().find(|entry| !ceiling.contains(&entry.as_str())) {
        Some(entry) => Err(ConfigError::OutsideCeiling {
            field,
            entry: entry.clone(),
        }),
        None => Ok(()),
    }
}

fn compile(field: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
        field,
        message: e.to_string(),
    })
}

/// A configured pattern layered over its built-in counterpart.
#[derive(Debug, Clone)]
struct Layered {
    built_in: Regex,
    configured: Option<Regex>,
}

impl Layered {
    fn compile(
        field: &'static str,
        built_in: &str,
        configured: &str,
    ) -> Result<Self, ConfigError> {
        let configured = if configured == built_in {
            None
        } else {
            Some(compile(field, configured)?)
        };
        Ok(Self {
            built_in: compile(field, built_in)?,
            configured,
        })
    }

    /// Allow patterns: both layers must accept.
    fn all_match(&self, input: &str) -> bool {
        self.built_in.is_match(input) && self.configured.iter().all(|re| re.is_match(input))
    }

    /// Deny patterns: either layer may flag.
    fn any_match(&self, input: &str) -> bool {
        self.built_in.is_match(input) || self.configured.iter().any(|re| re.is_match(input))
    }
}

/// Compiled, immutable sanitization policy.
///
/// Obtain the process-wide instance with [`SanitizationPolicy::global`], or
/// build a private one from a [`PolicyConfig`] for tests and tools.
#[derive(Debug, Clone)]
pub struct SanitizationPolicy {
    allowed_tags: BTreeSet<String>,
    allowed_attributes: BTreeSet<String>,
    forbidden_tags: BTreeSet<String>,
    forbidden_attributes: BTreeSet<String>,
    allowed_uri: Layered,
    denied_protocols: BTreeSet<String>,
    trusted_cdn: Regex,
    trusted_image_hosts: BTreeSet<String>,
    image_extensions: BTreeSet<String>,
    local_image: Regex,
    mark: Layered,
    key: Layered,
    event_handler: Layered,
}

impl Default for SanitizationPolicy {
    fn default() -> Self {
        PolicyConfig::default()
            .build()
            .expect("built-in sanitization policy must compile")
    }
}

impl SanitizationPolicy {
    /// Returns the process-wide policy, building the default on first use.
    pub fn global() -> &'static SanitizationPolicy {
        GLOBAL.get_or_init(SanitizationPolicy::default)
    }

    /// Installs the process-wide policy.
    ///
    /// Must run before the first sanitization call; the policy is fixed from
    /// then on.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::AlreadyInstalled` if a policy was already
    /// installed or the default was already read.
    pub fn install(policy: SanitizationPolicy) -> Result<(), ConfigError> {
        GLOBAL.set(policy).map_err(|_| ConfigError::AlreadyInstalled)
    }

    /// Tags the rich-HTML profile may keep.
    pub fn allowed_tags(&self) -> &BTreeSet<String> {
        &self.allowed_tags
    }

    /// Attributes the rich-HTML profile may keep.
    pub fn allowed_attributes(&self) -> &BTreeSet<String> {
        &self.allowed_attributes
    }

    /// Tags that are never allowed.
    pub fn forbidden_tags(&self) -> &BTreeSet<String> {
        &self.forbidden_tags
    }

    /// Attributes that are never allowed.
    pub fn forbidden_attributes(&self) -> &BTreeSet<String> {
        &self.forbidden_attributes
    }

    /// Returns the denied protocol prefix `url` starts with, if any.
    ///
    /// `url` is compared case-insensitively.
    pub fn denied_protocol(&self, url: &str) -> Option<&str> {
        let lowered = url.to_ascii_lowercase();
        self.denied_protocols
            .iter()
            .find(|p| lowered.starts_with(p.as_str()))
            .map(String::as_str)
    }

    /// Whether `url` matches the allowed URI pattern.
    pub fn is_allowed_uri(&self, url: &str) -> bool {
        self.allowed_uri.all_match(url)
    }

    /// Whether `url` is a CDN asset URL in the highest trust tier.
    pub fn is_trusted_cdn_url(&self, url: &str) -> bool {
        self.trusted_cdn.is_match(url)
    }

    /// Whether `host` is in the trusted image-host allowlist.
    pub fn is_trusted_image_host(&self, host: &str) -> bool {
        self.trusted_image_hosts.contains(&host.to_ascii_lowercase())
    }

    /// Whether `path` ends in a valid image extension.
    pub fn has_image_extension(&self, path: &str) -> bool {
        path.rsplit_once('.')
            .map(|(_, ext)| self.image_extensions.contains(&ext.to_ascii_lowercase()))
            .unwrap_or(false)
    }

    /// Whether `path` is a root-relative site image.
    pub fn is_local_image(&self, path: &str) -> bool {
        self.local_image.is_match(path)
    }

    /// Whether `mark` is an acceptable span mark identifier.
    pub fn is_valid_mark(&self, mark: &str) -> bool {
        self.mark.all_match(mark)
    }

    /// Whether `key` may appear in linked data.
    pub fn is_valid_key(&self, key: &str) -> bool {
        self.key.all_match(key) && !self.event_handler.any_match(key)
    }

    /// Whether `name` is an inline event-handler attribute.
    pub fn is_event_handler(&self, name: &str) -> bool {
        self.forbidden_attributes.contains(&name.to_ascii_lowercase())
            || self.event_handler.any_match(name)
    }
}
