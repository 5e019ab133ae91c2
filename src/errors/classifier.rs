use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Timelike, Utc};

use crate::errors::error_model::{
    DetectedError, ErrorAnalysis, ErrorCategory, ErrorRecommendation, ErrorTrend, Position,
    Severity,
};
use crate::errors::patterns::{PATTERN_CATALOG, contains_error_indicator};

/// Confidence boost applied when a generic indicator word accompanies a
/// pattern match, capped at 1.0.
const INDICATOR_BOOST: f64 = 0.10;

/// Confidence assigned to the generic "UnknownError" fallback.
const FALLBACK_CONFIDENCE: f64 = 0.5;

// ============================================================================
// ErrorPatternClassifier — pattern matching over free-text messages
// ============================================================================

/// Turns free-text diagnostic messages into structured, severity-ranked
/// `DetectedError` records using the shared pattern catalog.
pub struct ErrorPatternClassifier {
    enabled: bool,
}

impl Default for ErrorPatternClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorPatternClassifier {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub fn with_enabled(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Classify a batch of messages against the full catalog.
    ///
    /// Every regex match of every pattern yields one `DetectedError`, so a
    /// single message can produce several records. When no pattern matched a
    /// message but it contains a generic error indicator, exactly one
    /// "UnknownError" fallback record is emitted for it. A disabled
    /// classifier returns an empty batch.
    pub fn detect_errors(&self, messages: &[String]) -> Vec<DetectedError> {
        if !self.enabled {
            return Vec::new();
        }

        let mut detections = Vec::new();

        for message in messages {
            let has_indicator = contains_error_indicator(message);
            let mut matched = false;

            for pattern in PATTERN_CATALOG.iter() {
                for _found in pattern.matcher.find_iter(message) {
                    matched = true;
                    let confidence = if has_indicator {
                        (pattern.confidence + INDICATOR_BOOST).min(1.0)
                    } else {
                        pattern.confidence
                    };

                    detections.push(DetectedError {
                        name: pattern.name.to_string(),
                        category: pattern.category,
                        message: message.clone(),
                        severity: pattern.severity,
                        confidence,
                        timestamp: Utc::now(),
                        source: "classifier".to_string(),
                        position: Position::Unknown,
                        suggestions: pattern.suggestions.iter().map(|s| s.to_string()).collect(),
                        tags: pattern.tags.iter().map(|t| t.to_string()).collect(),
                        context: HashMap::new(),
                    });
                }
            }

            // Fallback fires only when no real pattern matched this message
            if !matched && has_indicator {
                detections.push(DetectedError {
                    name: "UnknownError".to_string(),
                    category: ErrorCategory::General,
                    message: message.clone(),
                    severity: Severity::Medium,
                    confidence: FALLBACK_CONFIDENCE,
                    timestamp: Utc::now(),
                    source: "classifier".to_string(),
                    position: Position::Unknown,
                    suggestions: vec![
                        "Review the raw message for an unrecognized failure mode".to_string(),
                        "Consider adding a catalog pattern for this signature".to_string(),
                    ],
                    tags: vec!["general".to_string(), "fallback".to_string()],
                    context: HashMap::new(),
                });
            }
        }

        detections
    }

    /// Aggregate a batch of detections into counts, trends, recommendations,
    /// and coverage gaps. Recomputed fresh on every call.
    pub fn analyze_errors(&self, errors: &[DetectedError]) -> ErrorAnalysis {
        let mut categories: HashMap<ErrorCategory, usize> = HashMap::new();
        let mut severities: HashMap<Severity, usize> = HashMap::new();
        let mut critical = Vec::new();
        let mut high = Vec::new();

        for error in errors {
            *categories.entry(error.category).or_insert(0) += 1;
            *severities.entry(error.severity).or_insert(0) += 1;
            match error.severity {
                Severity::Critical => critical.push(error.clone()),
                Severity::High => high.push(error.clone()),
                _ => {}
            }
        }

        let trends = build_trends(errors);
        let recommendations = build_recommendations(&critical, &high, &categories);
        let coverage_gaps = derive_coverage_gaps(&categories);
        let matched_patterns = PATTERN_CATALOG
            .iter()
            .filter(|p| errors.iter().any(|e| e.name == p.name))
            .map(|p| p.name.to_string())
            .collect();

        ErrorAnalysis {
            total_errors: errors.len(),
            error_categories: categories,
            error_severities: severities,
            critical_errors: critical,
            high_severity_errors: high,
            trends,
            recommendations,
            coverage_gaps,
            matched_patterns,
        }
    }
}

// ============================================================================
// Trend analysis — hour-bucketed distribution
// ============================================================================

fn truncate_to_hour(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

/// Bucket detections by hour and pick the modal category and severity per
/// bucket. Ties keep the first-seen maximum during an unordered count scan.
fn build_trends(errors: &[DetectedError]) -> Vec<ErrorTrend> {
    let mut buckets: BTreeMap<DateTime<Utc>, Vec<&DetectedError>> = BTreeMap::new();
    for error in errors {
        buckets
            .entry(truncate_to_hour(error.timestamp))
            .or_default()
            .push(error);
    }

    buckets
        .into_iter()
        .map(|(hour, bucket)| {
            let mut category_counts: HashMap<ErrorCategory, usize> = HashMap::new();
            let mut severity_counts: HashMap<Severity, usize> = HashMap::new();
            for error in &bucket {
                *category_counts.entry(error.category).or_insert(0) += 1;
                *severity_counts.entry(error.severity).or_insert(0) += 1;
            }

            ErrorTrend {
                timestamp: hour,
                error_count: bucket.len(),
                dominant_category: modal_key(&category_counts).unwrap_or(ErrorCategory::General),
                dominant_severity: modal_key(&severity_counts).unwrap_or(Severity::Low),
            }
        })
        .collect()
}

/// First-seen maximum over an unordered count map.
fn modal_key<K: Copy>(counts: &HashMap<K, usize>) -> Option<K> {
    let mut best: Option<(K, usize)> = None;
    for (key, count) in counts {
        match best {
            Some((_, n)) if *count <= n => {}
            _ => best = Some((*key, *count)),
        }
    }
    best.map(|(k, _)| k)
}

// ============================================================================
// Recommendation synthesis — independent rules, all applicable rules fire
// ============================================================================

/// Per-category count above which an "improve" recommendation is emitted.
const CATEGORY_RECOMMENDATION_THRESHOLD: usize = 5;

fn build_recommendations(
    critical: &[DetectedError],
    high: &[DetectedError],
    categories: &HashMap<ErrorCategory, usize>,
) -> Vec<ErrorRecommendation> {
    let mut recs = Vec::new();

    if !critical.is_empty() {
        recs.push(ErrorRecommendation {
            action: "fix".to_string(),
            priority: "high".to_string(),
            description: format!(
                "Address {} critical error(s) before further test runs",
                critical.len()
            ),
        });
    }

    if !high.is_empty() {
        recs.push(ErrorRecommendation {
            action: "fix".to_string(),
            priority: "high".to_string(),
            description: format!(
                "Investigate {} high-severity error(s) affecting test reliability",
                high.len()
            ),
        });
    }

    // Deterministic order: scan categories in taxonomy order
    for category in [
        ErrorCategory::Network,
        ErrorCategory::Ui,
        ErrorCategory::Authentication,
        ErrorCategory::Validation,
        ErrorCategory::Performance,
        ErrorCategory::Javascript,
        ErrorCategory::Database,
        ErrorCategory::Filesystem,
        ErrorCategory::General,
    ] {
        if let Some(count) = categories.get(&category) {
            if *count > CATEGORY_RECOMMENDATION_THRESHOLD {
                recs.push(ErrorRecommendation {
                    action: "improve".to_string(),
                    priority: "medium".to_string(),
                    description: format!(
                        "Recurring {} errors ({} occurrences) — improve {} resilience",
                        category.as_str(),
                        count,
                        category.as_str()
                    ),
                });
            }
        }
    }

    recs
}

// ============================================================================
// Coverage gaps — presence checks per category
// ============================================================================

fn derive_coverage_gaps(categories: &HashMap<ErrorCategory, usize>) -> Vec<String> {
    let mut gaps = Vec::new();

    if categories.contains_key(&ErrorCategory::Ui) {
        gaps.push("UI automation tests".to_string());
        gaps.push("Element locator testing".to_string());
    }
    if categories.contains_key(&ErrorCategory::Network) {
        gaps.push("Network connectivity tests".to_string());
        gaps.push("API endpoint tests".to_string());
    }
    if categories.contains_key(&ErrorCategory::Authentication) {
        gaps.push("Authentication flow tests".to_string());
        gaps.push("Session management tests".to_string());
    }
    if categories.contains_key(&ErrorCategory::Validation) {
        gaps.push("Form validation tests".to_string());
        gaps.push("Input boundary testing".to_string());
    }
    if categories.contains_key(&ErrorCategory::Performance) {
        gaps.push("Performance tests".to_string());
        gaps.push("Load testing".to_string());
    }

    gaps
}
