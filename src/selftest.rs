//! Built-in adversarial checks for the sanitizers.
//!
//! [`run`] feeds a fixed battery of injection attempts through the rich-HTML
//! and URL sanitizers and records whether dangerous substrings were removed
//! and safe content survived. Failures are logged at `error` level and
//! returned in the report; nothing here panics or blocks rendering.

use std::fmt;

use crate::{logging, ContentSanitizer, HtmlOptions};

/// Which sanitizer surface a check exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckTarget {
    /// Rich HTML through [`ContentSanitizer::html`]
    Html,
    /// Link targets through [`ContentSanitizer::url`]
    Url,
}

impl fmt::Display for CheckTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckTarget::Html => write!(f, "html"),
            CheckTarget::Url => write!(f, "url"),
        }
    }
}

struct Case {
    name: &'static str,
    target: CheckTarget,
    input: &'static str,
    must_not_contain: &'static [&'static str],
    must_contain: &'static [&'static str],
}

const CASES: &[Case] = &[
    Case {
        name: "script_tag",
        target: CheckTarget::Html,
        input: "<p>Safe</p><script>alert('xss')</script>",
        must_not_contain: &["<script", "alert"],
        must_contain: &["Safe"],
    },
    Case {
        name: "onerror_attribute",
        target: CheckTarget::Html,
        input: "<img src=x onerror=alert(1)><p>Caption</p>",
        must_not_contain: &["onerror", "alert"],
        must_contain: &["Caption"],
    },
    Case {
        name: "javascript_href",
        target: CheckTarget::Html,
        input: "<a href=\"javascript:alert(1)\">Link</a>",
        must_not_contain: &["javascript:"],
        must_contain: &["Link"],
    },
    Case {
        name: "javascript_url",
        target: CheckTarget::Url,
        input: "javascript:alert(document.cookie)",
        must_not_contain: &["javascript:"],
        must_contain: &[],
    },
    Case {
        name: "safe_url",
        target: CheckTarget::Url,
        input: "https://example.com/teachings",
        must_not_contain: &[],
        must_contain: &["https://example.com/teachings"],
    },
];

/// Outcome of one adversarial check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    name: &'static str,
    target: CheckTarget,
    passed: bool,
    detail: String,
}

impl CheckResult {
    /// Short name of the check.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Sanitizer surface exercised.
    pub fn target(&self) -> CheckTarget {
        self.target
    }

    /// Whether the output met every expectation.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// What went wrong; empty when the check passed.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// Results of a self-test run, in check order.
#[derive(Debug, Clone, Default)]
pub struct SelfTestReport {
    results: Vec<CheckResult>,
}

impl SelfTestReport {
    /// All results.
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    /// Results of checks that failed.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    /// True if every check passed.
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Number of checks run.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True if no checks were run.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Runs every built-in check against `sanitizer`.
///
/// # Examples
///
/// ```
/// use content_sanitize::{selftest, ContentSanitizer};
/// use futures::executor::block_on;
///
/// let report = block_on(selftest::run(&ContentSanitizer::new()));
/// assert!(report.all_passed());
/// ```
pub async fn run(sanitizer: &ContentSanitizer) -> SelfTestReport {
    let options = HtmlOptions::default();
    let mut results = Vec::with_capacity(CASES.len());

    for case in CASES {
        let output = match case.target {
            CheckTarget::Html => sanitizer.html(case.input, &options).await,
            CheckTarget::Url => sanitizer.url(case.input).await,
        };
        let result = evaluate(case, &output);
        logging::self_test_check(result.name, result.passed, &result.detail);
        results.push(result);
    }

    SelfTestReport { results }
}

/// Runs the self-test in debug builds; does nothing in release builds.
///
/// Intended for process start. Returns the report when the checks ran.
pub fn run_at_startup(sanitizer: &ContentSanitizer) -> Option<SelfTestReport> {
    if !cfg!(debug_assertions) {
        return None;
    }
    Some(futures::executor::block_on(run(sanitizer)))
}

fn evaluate(case: &Case, output: &str) -> CheckResult {
    let mut problems = Vec::new();
    for needle in case.must_not_contain {
        if output.contains(needle) {
            problems.push(format!("'{}' survived", needle));
        }
    }
    for needle in case.must_contain {
        if !output.contains(needle) {
            problems.push(format!("'{}' was lost", needle));
        }
    }

    CheckResult {
        name: case.name,
        target: case.target,
        passed: problems.is_empty(),
        detail: problems.join("; "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn evaluate_reports_surviving_payload() {
        let result = evaluate(&CASES[0], "<p>Safe</p><script>alert('xss')</script>");
        assert!(!result.passed());
        assert!(result.detail().contains("'<script' survived"));
    }

    #[test]
    fn evaluate_reports_lost_content() {
        let result = evaluate(&CASES[0], "");
        assert!(!result.passed());
        assert_eq!(result.detail(), "'Safe' was lost");
    }

    #[test]
    fn fallback_path_passes_every_check() {
        let report = block_on(run(&ContentSanitizer::new().without_engine()));
        assert_eq!(report.len(), CASES.len());
        assert!(report.all_passed(), "{:?}", report.failures().collect::<Vec<_>>());
    }

    #[cfg(feature = "html-engine")]
    #[test]
    fn engine_path_passes_every_check() {
        let report = block_on(run(&ContentSanitizer::new()));
        assert!(report.all_passed(), "{:?}", report.failures().collect::<Vec<_>>());
    }

    #[test]
    fn startup_run_never_panics() {
        let report = run_at_startup(&ContentSanitizer::new());
        assert_eq!(report.is_some(), cfg!(debug_assertions));
    }
}
