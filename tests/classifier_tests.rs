use ai_test_harness::errors::classifier::ErrorPatternClassifier;
use ai_test_harness::errors::error_model::{ErrorCategory, Severity};

// ============================================================================
// Helper builders
// ============================================================================

fn messages(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

// ============================================================================
// 1. Canonical timeout message
// ============================================================================

#[test]
fn connection_timeout_yields_one_network_error() {
    let classifier = ErrorPatternClassifier::new();
    let errors = classifier.detect_errors(&messages(&["Connection timeout occurred"]));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].name, "NetworkTimeout");
    assert_eq!(errors[0].category, ErrorCategory::Network);
    assert_eq!(errors[0].severity, Severity::High);
}

// ============================================================================
// 2. Indicator boost
// ============================================================================

#[test]
fn indicator_word_boosts_confidence() {
    let classifier = ErrorPatternClassifier::new();

    // Base confidence without an indicator word in the message
    let plain = classifier.detect_errors(&messages(&["Connection timeout occurred"]));
    assert!((plain[0].confidence - 0.9).abs() < 1e-9);

    // "error" is an indicator word, so the boost applies
    let boosted = classifier.detect_errors(&messages(&["Error: connection timeout occurred"]));
    assert!((boosted[0].confidence - 1.0).abs() < 1e-9);
}

#[test]
fn boost_is_capped_at_one() {
    let classifier = ErrorPatternClassifier::new();
    let errors = classifier.detect_errors(&messages(&[
        "error: authentication failed for user admin",
    ]));

    let auth = errors
        .iter()
        .find(|e| e.name == "AuthenticationFailure")
        .unwrap();
    assert!(auth.confidence <= 1.0);
}

// ============================================================================
// 3. Fallback behavior
// ============================================================================

#[test]
fn unmatched_message_with_indicator_falls_back() {
    let classifier = ErrorPatternClassifier::new();
    let errors = classifier.detect_errors(&messages(&["something went wrong in the widget"]));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].name, "UnknownError");
    assert_eq!(errors[0].category, ErrorCategory::General);
    assert_eq!(errors[0].severity, Severity::Medium);
    assert!((errors[0].confidence - 0.5).abs() < 1e-9);
}

#[test]
fn benign_message_yields_nothing() {
    let classifier = ErrorPatternClassifier::new();
    let errors = classifier.detect_errors(&messages(&["Page loaded successfully"]));
    assert!(errors.is_empty());
}

#[test]
fn fallback_suppressed_when_pattern_matched() {
    let classifier = ErrorPatternClassifier::new();
    let errors = classifier.detect_errors(&messages(&["request timed out while loading"]));

    assert!(!errors.is_empty());
    assert!(errors.iter().all(|e| e.name != "UnknownError"));
}

// ============================================================================
// 4. Disabled classifier
// ============================================================================

#[test]
fn disabled_classifier_returns_empty() {
    let classifier = ErrorPatternClassifier::with_enabled(false);
    let errors = classifier.detect_errors(&messages(&["Connection timeout occurred"]));
    assert!(errors.is_empty());
}

// ============================================================================
// 5. Multiple matches per batch
// ============================================================================

#[test]
fn one_message_can_match_several_patterns() {
    let classifier = ErrorPatternClassifier::new();
    let errors = classifier.detect_errors(&messages(&[
        "element not found after connection timeout",
    ]));

    let names: Vec<&str> = errors.iter().map(|e| e.name.as_str()).collect();
    assert!(names.contains(&"NetworkTimeout"));
    assert!(names.contains(&"ElementNotFound"));
}

// ============================================================================
// 6. Analysis aggregates
// ============================================================================

#[test]
fn empty_batch_analysis_is_zeroed_but_allocated() {
    let classifier = ErrorPatternClassifier::new();
    let analysis = classifier.analyze_errors(&[]);

    assert_eq!(analysis.total_errors, 0);
    assert!(analysis.error_categories.is_empty());
    assert!(analysis.error_severities.is_empty());
    assert!(analysis.critical_errors.is_empty());
    assert!(analysis.high_severity_errors.is_empty());
    assert!(analysis.trends.is_empty());
    assert!(analysis.recommendations.is_empty());
    assert!(analysis.coverage_gaps.is_empty());
    assert!(analysis.matched_patterns.is_empty());
}

#[test]
fn category_counts_sum_to_total() {
    let classifier = ErrorPatternClassifier::new();
    let errors = classifier.detect_errors(&messages(&[
        "Connection timeout occurred",
        "element not found: #submit",
        "authentication failed for user",
        "something went wrong in the widget",
    ]));
    let analysis = classifier.analyze_errors(&errors);

    let category_sum: usize = analysis.error_categories.values().sum();
    let severity_sum: usize = analysis.error_severities.values().sum();
    assert_eq!(category_sum, analysis.total_errors);
    assert_eq!(severity_sum, analysis.total_errors);
    assert_eq!(analysis.total_errors, errors.len());
}

#[test]
fn high_and_critical_subsets_are_populated() {
    let classifier = ErrorPatternClassifier::new();
    let errors = classifier.detect_errors(&messages(&[
        "Connection timeout occurred",
        "authentication failed for user",
    ]));
    let analysis = classifier.analyze_errors(&errors);

    assert!(!analysis.high_severity_errors.is_empty());
    assert!(!analysis.critical_errors.is_empty());
    assert!(
        analysis
            .critical_errors
            .iter()
            .all(|e| e.severity == Severity::Critical)
    );
}

// ============================================================================
// 7. Trends
// ============================================================================

#[test]
fn same_hour_detections_share_one_trend_bucket() {
    let classifier = ErrorPatternClassifier::new();
    let errors = classifier.detect_errors(&messages(&[
        "Connection timeout occurred",
        "request timed out again",
        "element not found: #login",
    ]));
    let analysis = classifier.analyze_errors(&errors);

    // Detections are all timestamped "now", so one hourly bucket
    assert_eq!(analysis.trends.len(), 1);
    assert_eq!(analysis.trends[0].error_count, errors.len());
    assert_eq!(analysis.trends[0].dominant_category, ErrorCategory::Network);
}

// ============================================================================
// 8. Recommendations
// ============================================================================

#[test]
fn critical_errors_produce_fix_recommendation() {
    let classifier = ErrorPatternClassifier::new();
    let errors = classifier.detect_errors(&messages(&["authentication failed for user"]));
    let analysis = classifier.analyze_errors(&errors);

    assert!(
        analysis
            .recommendations
            .iter()
            .any(|r| r.action == "fix" && r.priority == "high")
    );
}

#[test]
fn recurring_category_produces_improve_recommendation() {
    let classifier = ErrorPatternClassifier::new();
    let lines: Vec<String> = (0..6)
        .map(|i| format!("Connection timeout occurred on attempt {}", i))
        .collect();
    let errors = classifier.detect_errors(&lines);
    let analysis = classifier.analyze_errors(&errors);

    assert!(
        analysis
            .recommendations
            .iter()
            .any(|r| r.action == "improve" && r.description.contains("network"))
    );
}

// ============================================================================
// 9. Coverage gaps
// ============================================================================

#[test]
fn coverage_gaps_follow_categories_present() {
    let classifier = ErrorPatternClassifier::new();
    let errors = classifier.detect_errors(&messages(&[
        "Connection timeout occurred",
        "element not found: #cart",
    ]));
    let analysis = classifier.analyze_errors(&errors);

    assert!(
        analysis
            .coverage_gaps
            .contains(&"Network connectivity tests".to_string())
    );
    assert!(
        analysis
            .coverage_gaps
            .contains(&"UI automation tests".to_string())
    );
    assert!(
        !analysis
            .coverage_gaps
            .contains(&"Authentication flow tests".to_string())
    );
}

// ============================================================================
// 10. Matched patterns
// ============================================================================

#[test]
fn matched_patterns_lists_only_triggered_names() {
    let classifier = ErrorPatternClassifier::new();
    let errors = classifier.detect_errors(&messages(&["Connection timeout occurred"]));
    let analysis = classifier.analyze_errors(&errors);

    assert_eq!(analysis.matched_patterns, vec!["NetworkTimeout".to_string()]);
}
