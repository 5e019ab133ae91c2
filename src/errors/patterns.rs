use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::error_model::{ErrorCategory, Severity};

// ============================================================================
// Pattern catalog — process-wide, immutable, constructed once on first use
// ============================================================================

/// One catalog entry: a named error signature with a regex matcher,
/// severity, base confidence, and remediation suggestions.
pub struct ErrorPattern {
    pub name: &'static str,
    pub category: ErrorCategory,
    pub matcher: Regex,
    pub severity: Severity,
    pub confidence: f64,
    pub description: &'static str,
    pub suggestions: &'static [&'static str],
    pub tags: &'static [&'static str],
}

fn pattern(
    name: &'static str,
    category: ErrorCategory,
    matcher: &str,
    severity: Severity,
    confidence: f64,
    description: &'static str,
    suggestions: &'static [&'static str],
    tags: &'static [&'static str],
) -> ErrorPattern {
    ErrorPattern {
        name,
        category,
        matcher: Regex::new(matcher).unwrap(),
        severity,
        confidence,
        description,
        suggestions,
        tags,
    }
}

/// The fixed error-signature catalog. Read-only after construction; shared
/// across all classifier instances without locking.
pub static PATTERN_CATALOG: Lazy<Vec<ErrorPattern>> = Lazy::new(|| {
    vec![
        pattern(
            "NetworkTimeout",
            ErrorCategory::Network,
            r"(?i)\b(connection|network|request)\s+(timeout|timed\s?out)\b",
            Severity::High,
            0.9,
            "A network operation exceeded its time limit",
            &[
                "Check network connectivity to the application under test",
                "Increase the request timeout",
                "Verify the target host is reachable",
            ],
            &["network", "timeout"],
        ),
        pattern(
            "ConnectionRefused",
            ErrorCategory::Network,
            r"(?i)connection\s+refused",
            Severity::High,
            0.9,
            "The target host actively refused the connection",
            &[
                "Verify the service is running and listening",
                "Check firewall rules and port configuration",
            ],
            &["network", "connection"],
        ),
        pattern(
            "DnsResolutionFailure",
            ErrorCategory::Network,
            r"(?i)could\s+not\s+resolve\s+host|dns\s+(lookup|resolution)\s+fail",
            Severity::High,
            0.85,
            "Hostname could not be resolved",
            &[
                "Check the configured application URL",
                "Verify DNS configuration of the test environment",
            ],
            &["network", "dns"],
        ),
        pattern(
            "HttpServerError",
            ErrorCategory::Network,
            r"(?i)internal\s+server\s+error|\bstatus\s+5\d\d\b",
            Severity::High,
            0.8,
            "The server returned a 5xx response",
            &[
                "Inspect server logs for the failing endpoint",
                "Retry after confirming backend health",
            ],
            &["network", "http"],
        ),
        pattern(
            "ElementNotFound",
            ErrorCategory::Ui,
            r"(?i)(element|selector)\b.{0,40}\bnot\s+found|no\s+such\s+element",
            Severity::High,
            0.9,
            "A UI element lookup failed",
            &[
                "Verify the selector against the current page structure",
                "Add an explicit wait before locating the element",
                "Use vision-assisted element detection as a fallback",
            ],
            &["ui", "locator"],
        ),
        pattern(
            "ElementNotInteractable",
            ErrorCategory::Ui,
            r"(?i)not\s+(interactable|clickable)|element\s+is\s+(disabled|obscured)",
            Severity::Medium,
            0.8,
            "An element was found but could not be interacted with",
            &[
                "Wait for overlays or animations to settle",
                "Scroll the element into view before acting",
            ],
            &["ui", "interaction"],
        ),
        pattern(
            "StaleElementReference",
            ErrorCategory::Ui,
            r"(?i)stale\s+element",
            Severity::Medium,
            0.85,
            "A previously located element is no longer attached to the page",
            &[
                "Re-locate the element after page mutations",
                "Avoid caching element handles across navigations",
            ],
            &["ui", "locator"],
        ),
        pattern(
            "AuthenticationFailure",
            ErrorCategory::Authentication,
            r"(?i)(authentication|login|sign[- ]?in)\s+(failed|denied)|invalid\s+(credentials|password)",
            Severity::Critical,
            0.9,
            "A login or credential check failed",
            &[
                "Verify test-account credentials",
                "Check for expired or locked test accounts",
            ],
            &["auth", "login"],
        ),
        pattern(
            "SessionExpired",
            ErrorCategory::Authentication,
            r"(?i)session\s+(expired|timed\s?out)|token\s+expired",
            Severity::High,
            0.85,
            "The authenticated session is no longer valid",
            &[
                "Re-authenticate before continuing the flow",
                "Shorten test duration or refresh tokens mid-run",
            ],
            &["auth", "session"],
        ),
        pattern(
            "PermissionDenied",
            ErrorCategory::Authentication,
            r"(?i)(permission|access)\s+denied|\bforbidden\b|\bunauthorized\b",
            Severity::High,
            0.85,
            "The current identity lacks access to the resource",
            &[
                "Check role assignments for the test account",
                "Verify the resource requires the expected permission",
            ],
            &["auth", "authorization"],
        ),
        pattern(
            "ValidationFailure",
            ErrorCategory::Validation,
            r"(?i)validation\s+(failed|error)|(field|input)\s+is\s+(required|invalid)",
            Severity::Medium,
            0.8,
            "Form or input validation rejected a value",
            &[
                "Review the submitted values against field constraints",
                "Add boundary-value tests for the failing field",
            ],
            &["validation", "form"],
        ),
        pattern(
            "SlowResponse",
            ErrorCategory::Performance,
            r"(?i)response\s+time\s+exceeded|took\s+too\s+long|deadline\s+exceeded",
            Severity::Medium,
            0.75,
            "An operation completed but exceeded its expected duration",
            &[
                "Profile the slow endpoint or interaction",
                "Add adaptive waits around the slow step",
            ],
            &["performance", "latency"],
        ),
        pattern(
            "OutOfMemory",
            ErrorCategory::Performance,
            r"(?i)out\s+of\s+memory|memory\s+exhausted|\boom\b",
            Severity::Critical,
            0.9,
            "The system under test exhausted available memory",
            &[
                "Capture memory metrics around the failing step",
                "Check for leaks in long-running flows",
            ],
            &["performance", "memory"],
        ),
        pattern(
            "UncaughtScriptError",
            ErrorCategory::Javascript,
            r"(?i)uncaught\s+(typeerror|referenceerror|syntaxerror|exception)|script\s+error",
            Severity::High,
            0.85,
            "An uncaught exception surfaced in the page's scripts",
            &[
                "Inspect browser console logs for the stack trace",
                "File the script error against the frontend",
            ],
            &["javascript", "console"],
        ),
        pattern(
            "NullPropertyAccess",
            ErrorCategory::Javascript,
            r"(?i)cannot\s+read\s+propert(y|ies)\s+of\s+(undefined|null)|undefined\s+is\s+not\s+a\s+function",
            Severity::High,
            0.9,
            "Page script dereferenced an undefined or null value",
            &[
                "Check for race conditions in page initialization",
                "Verify data the page expects is present in this environment",
            ],
            &["javascript", "null"],
        ),
        pattern(
            "DatabaseError",
            ErrorCategory::Database,
            r"(?i)(database|sql|query)\s+(error|failed|failure)|\bdeadlock\b",
            Severity::Critical,
            0.85,
            "A backend database operation failed",
            &[
                "Inspect database logs for the failing query",
                "Check connection-pool saturation",
            ],
            &["database", "backend"],
        ),
        pattern(
            "FileNotFound",
            ErrorCategory::Filesystem,
            r"(?i)(file|path|directory)\s+not\s+found|no\s+such\s+file",
            Severity::Medium,
            0.8,
            "A filesystem lookup failed",
            &[
                "Verify the path exists in the test environment",
                "Check working-directory assumptions",
            ],
            &["filesystem", "path"],
        ),
        pattern(
            "DiskFull",
            ErrorCategory::Filesystem,
            r"(?i)disk\s+full|no\s+space\s+left\s+on\s+device",
            Severity::Critical,
            0.9,
            "The filesystem ran out of space",
            &[
                "Free disk space on the test host",
                "Rotate or prune recording artifacts",
            ],
            &["filesystem", "disk"],
        ),
    ]
});

// ============================================================================
// Generic error indicators — fallback detection and confidence boosting
// ============================================================================

/// Indicator words tested as case-insensitive substrings. A message matching
/// none of the catalog but containing one of these yields the single
/// "UnknownError" fallback; a pattern match in a message containing one gets
/// its confidence boosted.
pub static ERROR_INDICATORS: &[&str] = &[
    "error",
    "failed",
    "failure",
    "exception",
    "fault",
    "crash",
    "panic",
    "abort",
    "terminate",
    "unable",
    "cannot",
    "could not",
    "not possible",
    "invalid",
    "incorrect",
    "wrong",
    "bad",
    "malformed",
];

/// Case-insensitive substring test against the indicator list.
pub fn contains_error_indicator(message: &str) -> bool {
    let lower = message.to_lowercase();
    ERROR_INDICATORS.iter().any(|ind| lower.contains(ind))
}
