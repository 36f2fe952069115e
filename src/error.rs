use std::fmt;

/// Error returned when a value fails sanitization policy.
///
/// Sanitization errors are never surfaced to rendering code. The fail-closed
/// wrappers log them and drop the offending value instead. The message
/// describes the rule that failed and never echoes the rejected input.
///
/// # Examples
///
/// ```
/// use content_sanitize::{SanitizationError, SanitizationErrorKind};
///
/// let error = SanitizationError::new(SanitizationErrorKind::ForbiddenProtocol, "denied scheme");
/// assert_eq!(error.kind(), SanitizationErrorKind::ForbiddenProtocol);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizationError {
    kind: SanitizationErrorKind,
    message: String,
}

impl SanitizationError {
    /// Creates a new sanitization error.
    pub fn new(kind: SanitizationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> SanitizationErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SanitizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sanitization failed ({}): {}", self.kind, self.message)
    }
}

impl std::error::Error for SanitizationError {}

/// Kind of sanitization error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizationErrorKind {
    /// Input is empty or contains only whitespace.
    Empty,
    /// Input does not have the expected shape.
    MalformedInput,
    /// URL starts with a denied protocol (`javascript:`, `data:`, ...).
    ForbiddenProtocol,
    /// URL does not match the allowed URI pattern.
    DisallowedUri,
    /// Image URL points at a host outside the trusted allowlist.
    UntrustedImageHost,
    /// Image URL path does not end in a valid image extension.
    InvalidImageExtension,
    /// Linked-data key is not allowed.
    InvalidKey,
    /// Span mark identifier is not allowed.
    InvalidMark,
}

impl fmt::Display for SanitizationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty input"),
            Self::MalformedInput => write!(f, "malformed input"),
            Self::ForbiddenProtocol => write!(f, "forbidden protocol"),
            Self::DisallowedUri => write!(f, "disallowed uri"),
            Self::UntrustedImageHost => write!(f, "untrusted image host"),
            Self::InvalidImageExtension => write!(f, "invalid image extension"),
            Self::InvalidKey => write!(f, "invalid key"),
            Self::InvalidMark => write!(f, "invalid mark"),
        }
    }
}

/// Error raised by the rich-text engine adapter.
///
/// Every call site recovers from this locally with a primitive fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    kind: EngineErrorKind,
    message: String,
}

impl EngineError {
    /// Creates a new engine error.
    pub fn new(kind: EngineErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> EngineErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "html engine error ({}): {}", self.kind, self.message)
    }
}

impl std::error::Error for EngineError {}

/// Kind of engine error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineErrorKind {
    /// No DOM backend could be constructed.
    Unavailable,
    /// The backend failed while cleaning a fragment.
    Failed,
}

impl fmt::Display for EngineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "unavailable"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Error returned when a sanitization policy cannot be loaded or installed.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io(std::io::Error),
    /// The configuration is not valid JSON for a policy.
    Parse(serde_json::Error),
    /// A configured pattern is not a valid regular expression.
    InvalidPattern {
        /// Name of the offending policy field
        field: &'static str,
        /// Compiler message
        message: String,
    },
    /// An entry is both allowed and forbidden.
    Conflict {
        /// Name of the allow-list field
        field: &'static str,
        /// The conflicting entry
        entry: String,
    },
    /// An allowed entry is not in the built-in allow list.
    OutsideCeiling {
        /// Name of the allow-list field
        field: &'static str,
        /// The offending entry
        entry: String,
    },
    /// A process-wide policy has already been installed or read.
    AlreadyInstalled,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read policy: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse policy: {}", e),
            ConfigError::InvalidPattern { field, message } => {
                write!(f, "invalid pattern in '{}': {}", field, message)
            }
            ConfigError::Conflict { field, entry } => {
                write!(f, "'{}' in '{}' is also forbidden", entry, field)
            }
            ConfigError::OutsideCeiling { field, entry } => {
                write!(f, "'{}' in '{}' is outside the built-in ceiling", entry, field)
            }
            ConfigError::AlreadyInstalled => write!(f, "sanitization policy already installed"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitization_error_creation() {
        let error = SanitizationError::new(SanitizationErrorKind::DisallowedUri, "test message");

        assert_eq!(error.kind(), SanitizationErrorKind::DisallowedUri);
        assert_eq!(error.message(), "test message");
    }

    #[test]
    fn sanitization_error_display() {
        let error =
            SanitizationError::new(SanitizationErrorKind::ForbiddenProtocol, "denied scheme");

        let output = format!("{}", error);
        assert!(output.contains("sanitization failed"));
        assert!(output.contains("forbidden protocol"));
        assert!(output.contains("denied scheme"));
    }

    #[test]
    fn error_kinds_display() {
        assert_eq!(format!("{}", SanitizationErrorKind::Empty), "empty input");
        assert_eq!(
            format!("{}", SanitizationErrorKind::MalformedInput),
            "malformed input"
        );
        assert_eq!(
            format!("{}", SanitizationErrorKind::UntrustedImageHost),
            "untrusted image host"
        );
        assert_eq!(
            format!("{}", SanitizationErrorKind::InvalidImageExtension),
            "invalid image extension"
        );
        assert_eq!(format!("{}", SanitizationErrorKind::InvalidKey), "invalid key");
        assert_eq!(format!("{}", SanitizationErrorKind::InvalidMark), "invalid mark");
    }

    #[test]
    fn engine_error_display() {
        let error = EngineError::new(EngineErrorKind::Unavailable, "no backend");
        assert_eq!(error.kind(), EngineErrorKind::Unavailable);
        assert_eq!(
            format!("{}", error),
            "html engine error (unavailable): no backend"
        );
    }

    #[test]
    fn config_error_display() {
        let conflict = ConfigError::Conflict {
            field: "allowed_tags",
            entry: "script".to_string(),
        };
        assert_eq!(
            format!("{}", conflict),
            "'script' in 'allowed_tags' is also forbidden"
        );
        let widened = ConfigError::OutsideCeiling {
            field: "allowed_tags",
            entry: "iframe".to_string(),
        };
        assert_eq!(
            format!("{}", widened),
            "'iframe' in 'allowed_tags' is outside the built-in ceiling"
        );
        assert_eq!(
            format!("{}", ConfigError::AlreadyInstalled),
            "sanitization policy already installed"
        );
    }

    #[test]
    fn config_error_wraps_parse_error() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = ConfigError::from(parse);
        assert!(std::error::Error::source(&error).is_some());
    }
}
