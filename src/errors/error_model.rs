use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Severity and category taxonomies
// ============================================================================

/// Ordinal severity tier. Ordering is significant: `Low < Medium < High <
/// Critical`, and the adaptive-priority phase compares against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// Closed error-category taxonomy. `General` is the fallback used when no
/// catalog pattern matched, so every `DetectedError` carries a known category
/// by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Network,
    Ui,
    Authentication,
    Validation,
    Performance,
    Javascript,
    Database,
    Filesystem,
    General,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Ui => "ui",
            ErrorCategory::Authentication => "authentication",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Performance => "performance",
            ErrorCategory::Javascript => "javascript",
            ErrorCategory::Database => "database",
            ErrorCategory::Filesystem => "filesystem",
            ErrorCategory::General => "general",
        }
    }
}

// ============================================================================
// Position — where on screen an error was observed
// ============================================================================

/// Location of an error in the UI, when one is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Position {
    /// A CSS-style selector locates the element
    Selector {
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        element: Option<String>,
    },

    /// Screen coordinates locate the element
    Coordinates {
        x: i32,
        y: i32,
        #[serde(skip_serializing_if = "Option::is_none")]
        element: Option<String>,
    },

    /// No positional information available
    Unknown,
}

// ============================================================================
// DetectedError — one classified match instance
// ============================================================================

/// A single classified error. Produced by the classifier (or synthesized
/// directly by the orchestrator's pre-flight validation) and never mutated
/// afterwards, except confidence adjustments the orchestrator applies to its
/// own copies during the adaptive-priority phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedError {
    /// Catalog pattern name, or "UnknownError" for the generic fallback
    pub name: String,

    /// Category of the matching pattern, or General for the fallback
    pub category: ErrorCategory,

    /// The raw message the match was found in
    pub message: String,

    pub severity: Severity,

    /// Heuristic strength in [0, 1] — pattern base confidence, optionally
    /// boosted when a generic indicator word also appears in the message
    pub confidence: f64,

    pub timestamp: DateTime<Utc>,

    /// Label describing where the message came from (e.g. "execution")
    pub source: String,

    pub position: Position,

    /// Remediation suggestions copied from the matching pattern
    pub suggestions: Vec<String>,

    pub tags: Vec<String>,

    /// Free-form context (action name, selector, ...)
    #[serde(default)]
    pub context: HashMap<String, String>,
}

// ============================================================================
// ErrorAnalysis — ephemeral aggregate over a batch of detections
// ============================================================================

/// Hourly trend bucket: detections whose timestamps truncate to the same hour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorTrend {
    /// Bucket start (timestamp truncated to the hour)
    pub timestamp: DateTime<Utc>,

    pub error_count: usize,

    /// Most frequent category in the bucket (first-seen max on ties)
    pub dominant_category: ErrorCategory,

    /// Most frequent severity in the bucket (first-seen max on ties)
    pub dominant_severity: Severity,
}

/// A remediation recommendation derived from the error distribution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorRecommendation {
    /// "fix" or "improve"
    pub action: String,

    /// "high" or "medium"
    pub priority: String,

    pub description: String,
}

/// Aggregate view over one batch of detected errors. Recomputed fresh on
/// every `analyze_errors` call; holds no persisted state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorAnalysis {
    /// Always equals the length of the input batch
    pub total_errors: usize,

    pub error_categories: HashMap<ErrorCategory, usize>,

    pub error_severities: HashMap<Severity, usize>,

    pub critical_errors: Vec<DetectedError>,

    pub high_severity_errors: Vec<DetectedError>,

    pub trends: Vec<ErrorTrend>,

    pub recommendations: Vec<ErrorRecommendation>,

    /// Test-coverage gaps implied by the categories present
    pub coverage_gaps: Vec<String>,

    /// Names of catalog patterns that actually triggered
    pub matched_patterns: Vec<String>,
}
