use ai_test_harness::cli::config::{ActionSpec, AiConfig, RunConfig};
use ai_test_harness::errors::classifier::ErrorPatternClassifier;
use ai_test_harness::generator::generator::TestGenerator;
use ai_test_harness::orchestrator::ai_model::AiResult;
use ai_test_harness::orchestrator::orchestrator::AiEnhancedTester;
use ai_test_harness::platform::detector::{ElementInfo, MockDetector};
use ai_test_harness::platform::platform::MockPlatform;
use ai_test_harness::report::markdown::{
    render_error_report, render_generation_report, render_testing_report,
};
use ai_test_harness::report::report_model::{ErrorReport, GenerationReport};
use ai_test_harness::report::writer::ReportWriter;

// ============================================================================
// Helper builders
// ============================================================================

fn error_report_from(lines: &[&str]) -> ErrorReport {
    let classifier = ErrorPatternClassifier::new();
    let messages: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
    let errors = classifier.detect_errors(&messages);
    let analysis = classifier.analyze_errors(&errors);
    ErrorReport::new(errors, analysis)
}

fn sample_elements() -> Vec<ElementInfo> {
    vec![
        ElementInfo::new("textfield", "Email", 0.9, 100, 100),
        ElementInfo::new("button", "Submit", 0.95, 100, 200),
    ]
}

fn generation_report() -> GenerationReport {
    let generator = TestGenerator::new();
    let elements = sample_elements();
    let analysis = generator.analyze_elements(&elements);
    let tests = generator
        .generate_tests_from_elements(&elements, "web")
        .unwrap();
    GenerationReport::new("web", analysis, tests)
}

fn sample_run_result() -> AiResult {
    let platform =
        MockPlatform::new().with_console_logs(vec!["Connection timeout occurred".to_string()]);
    let mut tester = AiEnhancedTester::new(
        Box::new(platform),
        Box::new(MockDetector::new(sample_elements())),
    );
    tester
        .run(&RunConfig {
            app_name: "Example App".to_string(),
            app_type: "web".to_string(),
            actions: vec![ActionSpec::Navigate {
                name: "open".to_string(),
                url: "https://app.example.com".to_string(),
            }],
            ai: AiConfig::default(),
        })
        .unwrap()
}

// ============================================================================
// 1. Report model invariants
// ============================================================================

#[test]
fn error_report_total_matches_error_count() {
    let report = error_report_from(&["Connection timeout occurred", "element not found: #x"]);
    assert_eq!(report.total_errors, report.errors.len());
    assert_eq!(report.total_errors, 2);
}

#[test]
fn error_report_json_round_trip() {
    let report = error_report_from(&["Connection timeout occurred"]);
    let json = serde_json::to_string(&report).unwrap();
    let back: ErrorReport = serde_json::from_str(&json).unwrap();

    assert_eq!(back.total_errors, report.total_errors);
    assert_eq!(back.errors.len(), report.errors.len());
    assert_eq!(back.errors[0].name, "NetworkTimeout");
    assert_eq!(back.analysis.matched_patterns, report.analysis.matched_patterns);
}

#[test]
fn testing_report_survives_yaml() {
    let result = sample_run_result();
    let yaml = serde_yaml::to_string(&result).unwrap();
    let back: AiResult = serde_yaml::from_str(&yaml).unwrap();

    assert_eq!(back.config.app_name, "Example App");
    assert_eq!(back.errors.len(), result.errors.len());
    assert_eq!(back.phase_trail.len(), result.phase_trail.len());
}

// ============================================================================
// 2. Markdown rendering
// ============================================================================

#[test]
fn error_markdown_has_category_sections() {
    let report = error_report_from(&["Connection timeout occurred", "element not found: #x"]);
    let markdown = render_error_report(&report);

    assert!(markdown.contains("# Smart Error Report"));
    assert!(markdown.contains("## network (1)"));
    assert!(markdown.contains("## ui (1)"));
    assert!(markdown.contains("NetworkTimeout"));
    assert!(markdown.contains("## Coverage gaps"));
}

#[test]
fn generation_markdown_lists_tests_with_steps() {
    let report = generation_report();
    let markdown = render_generation_report(&report);

    assert!(markdown.contains("# AI Test Generation Report"));
    assert!(markdown.contains("## Element analysis"));
    assert!(markdown.contains(&format!("## Generated tests ({})", report.tests.len())));
    // Numbered steps are present for the first test
    assert!(markdown.contains("1. "));
}

#[test]
fn testing_markdown_has_phase_trail_and_summary() {
    let result = sample_run_result();
    let markdown = render_testing_report(&result);

    assert!(markdown.contains("# AI Enhanced Testing Report"));
    assert!(markdown.contains("**Example App** (web)"));
    assert!(markdown.contains("## Phase trail"));
    assert!(markdown.contains("## Errors"));
}

// ============================================================================
// 3. Report writer
// ============================================================================

#[test]
fn writer_persists_error_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("reports");
    let writer = ReportWriter::new(out.to_str().unwrap());

    let report = error_report_from(&["Connection timeout occurred"]);
    let written = writer.write_error_reports(&report).unwrap();

    assert_eq!(written.len(), 2);
    assert!(out.join("smart_error_report.md").exists());
    assert!(out.join("error_report.json").exists());

    let json = std::fs::read_to_string(out.join("error_report.json")).unwrap();
    let parsed: ErrorReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.total_errors, 1);
}

#[test]
fn writer_persists_generation_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let writer = ReportWriter::new(dir.path().to_str().unwrap());

    let written = writer.write_generation_reports(&generation_report()).unwrap();
    assert_eq!(written.len(), 2);
    assert!(dir.path().join("ai_test_generation_report.md").exists());
    assert!(dir.path().join("generation_report.json").exists());
}

#[test]
fn writer_persists_all_testing_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let writer = ReportWriter::new(dir.path().to_str().unwrap());

    let written = writer.write_testing_reports(&sample_run_result()).unwrap();
    assert_eq!(written.len(), 3);
    assert!(dir.path().join("ai_enhanced_testing_report.md").exists());
    assert!(dir.path().join("testing_report.json").exists());
    assert!(dir.path().join("testing_report.yaml").exists());
}
