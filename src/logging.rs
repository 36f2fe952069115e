//! Structured log events emitted by the sanitizers.
//!
//! Every event names the call site and the rule that fired. Raw input is
//! never passed to `tracing`: a rejected value may itself be the payload
//! of an injection attempt against the log viewer.

use crate::{EngineError, SanitizationError};

const TARGET: &str = "content_sanitize";

/// Records a policy violation that caused a fragment to be dropped.
pub(crate) fn policy_violation(site: &'static str, error: &SanitizationError) {
    tracing::warn!(
        target: TARGET,
        site,
        kind = %error.kind(),
        "dropped content: {}",
        error.message()
    );
}

/// Records that a call site fell back to a primitive sanitizer.
pub(crate) fn engine_fallback(site: &'static str, error: &EngineError) {
    tracing::warn!(
        target: TARGET,
        site,
        kind = %error.kind(),
        "html engine unusable, using primitive fallback: {}",
        error.message()
    );
}

/// Records which engine backend the capability probe selected.
pub(crate) fn engine_selected(backend: &'static str) {
    tracing::info!(target: TARGET, backend, "html engine initialised");
}

/// Records the outcome of one self-test check.
pub(crate) fn self_test_check(name: &'static str, passed: bool, detail: &str) {
    if passed {
        tracing::debug!(target: TARGET, check = name, "sanitizer self-test passed");
    } else {
        tracing::error!(
            target: TARGET,
            check = name,
            "sanitizer self-test FAILED: {}",
            detail
        );
    }
}
