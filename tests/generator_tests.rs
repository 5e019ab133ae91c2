use ai_test_harness::generator::generator::{
    MALFORMED_INPUT, TestGenerator, filter_tests_by_confidence,
};
use ai_test_harness::generator::test_model::{ComplexityTier, TestType};
use ai_test_harness::orchestrator::error::PipelineError;
use ai_test_harness::platform::detector::ElementInfo;

// ============================================================================
// Helper builders
// ============================================================================

fn button(text: &str) -> ElementInfo {
    ElementInfo::new("button", text, 0.9, 100, 200)
}

fn textfield(text: &str) -> ElementInfo {
    ElementInfo::new("textfield", text, 0.85, 100, 100)
}

fn link(text: &str) -> ElementInfo {
    ElementInfo::new("link", text, 0.8, 50, 300)
}

fn login_form() -> Vec<ElementInfo> {
    vec![
        textfield("Email"),
        textfield("Password"),
        button("Sign in"),
        link("Forgot password?"),
    ]
}

// ============================================================================
// 1. Element analysis
// ============================================================================

#[test]
fn analysis_counts_and_complexity() {
    let generator = TestGenerator::new();
    let analysis = generator.analyze_elements(&login_form());

    assert_eq!(analysis.total_elements, 4);
    assert_eq!(analysis.element_counts["textfield"], 2);
    assert_eq!(analysis.element_counts["button"], 1);
    assert_eq!(analysis.complexity, ComplexityTier::Low);
    assert_eq!(analysis.risk, ComplexityTier::Low);
}

#[test]
fn analysis_complexity_tiers() {
    let generator = TestGenerator::new();

    let medium: Vec<ElementInfo> = (0..25).map(|i| button(&format!("b{}", i))).collect();
    assert_eq!(
        generator.analyze_elements(&medium).complexity,
        ComplexityTier::Medium
    );

    let high: Vec<ElementInfo> = (0..51).map(|i| button(&format!("b{}", i))).collect();
    assert_eq!(
        generator.analyze_elements(&high).complexity,
        ComplexityTier::High
    );
}

#[test]
fn analysis_coverage_areas_deduplicate() {
    let generator = TestGenerator::new();
    let analysis = generator.analyze_elements(&login_form());

    // "navigation" is implied by both buttons and links; appears once
    let navigation_count = analysis
        .coverage_areas
        .iter()
        .filter(|a| *a == "navigation")
        .count();
    assert_eq!(navigation_count, 1);
    assert!(analysis.coverage_areas.contains(&"form".to_string()));
    assert!(analysis.coverage_areas.contains(&"accessibility".to_string()));
}

// ============================================================================
// 2. Strategy-based generation
// ============================================================================

#[test]
fn disabled_generator_is_an_error() {
    let generator = TestGenerator::with_enabled(false);
    let result = generator.generate_tests_from_elements(&login_form(), "web");
    assert!(matches!(result, Err(PipelineError::GenerationDisabled)));
}

#[test]
fn button_and_textfield_produce_form_and_interaction_tests() {
    let generator = TestGenerator::new();
    let tests = generator
        .generate_tests_from_elements(&login_form(), "web")
        .unwrap();

    assert!(tests.iter().any(|t| t.test_type == TestType::Interaction));
    assert!(tests.iter().any(|t| t.test_type == TestType::Form));
    assert!(tests.iter().any(|t| t.test_type == TestType::Validation));
    assert!(tests.iter().any(|t| t.test_type == TestType::Navigation));
}

#[test]
fn accessibility_and_performance_always_emitted() {
    let generator = TestGenerator::new();
    let tests = generator.generate_tests_from_elements(&[], "web").unwrap();

    assert_eq!(tests.len(), 2);
    assert!(tests.iter().any(|t| t.test_type == TestType::Accessibility));
    assert!(tests.iter().any(|t| t.test_type == TestType::Performance));
}

#[test]
fn tests_are_sorted_by_priority_then_confidence() {
    let generator = TestGenerator::new();
    let tests = generator
        .generate_tests_from_elements(&login_form(), "web")
        .unwrap();

    for pair in tests.windows(2) {
        let ordered = pair[0].priority > pair[1].priority
            || (pair[0].priority == pair[1].priority
                && pair[0].confidence >= pair[1].confidence);
        assert!(ordered, "{} before {}", pair[0].name, pair[1].name);
    }
    // Form fill-and-submit has the single highest (priority, confidence)
    assert_eq!(tests[0].test_type, TestType::Form);
}

#[test]
fn form_test_submits_via_first_button() {
    let generator = TestGenerator::new();
    let tests = generator
        .generate_tests_from_elements(&login_form(), "web")
        .unwrap();

    let form = tests
        .iter()
        .find(|t| t.test_type == TestType::Form)
        .unwrap();
    let last = form.steps.last().unwrap();
    assert_eq!(last.action, "submit");
    assert_eq!(last.target, "Sign in");
}

#[test]
fn form_tests_require_both_fields_and_buttons() {
    let generator = TestGenerator::new();
    let only_fields = vec![textfield("Name")];
    let tests = generator
        .generate_tests_from_elements(&only_fields, "web")
        .unwrap();

    assert!(tests.iter().all(|t| t.test_type != TestType::Form));
    assert!(tests.iter().all(|t| t.test_type != TestType::Validation));
}

#[test]
fn error_handling_test_uses_malformed_input() {
    let generator = TestGenerator::new();
    let tests = generator
        .generate_tests_from_elements(&login_form(), "web")
        .unwrap();

    let eh = tests
        .iter()
        .find(|t| t.test_type == TestType::ErrorHandling)
        .unwrap();
    assert!(
        eh.steps
            .iter()
            .all(|s| s.value.as_deref() == Some(MALFORMED_INPUT))
    );
}

#[test]
fn fill_values_follow_field_labels() {
    let generator = TestGenerator::new();
    let tests = generator
        .generate_tests_from_elements(&login_form(), "web")
        .unwrap();

    let interaction = tests
        .iter()
        .find(|t| {
            t.test_type == TestType::Interaction
                && t.element_types == vec!["textfield".to_string()]
        })
        .unwrap();
    let values: Vec<&str> = interaction
        .steps
        .iter()
        .filter_map(|s| s.value.as_deref())
        .collect();
    assert_eq!(values, vec!["test@example.com", "Secret123!"]);
}

#[test]
fn performance_test_limits_buttons() {
    let generator = TestGenerator::new();
    let many: Vec<ElementInfo> = (0..8).map(|i| button(&format!("b{}", i))).collect();
    let tests = generator.generate_tests_from_elements(&many, "web").unwrap();

    let perf = tests
        .iter()
        .find(|t| t.test_type == TestType::Performance)
        .unwrap();
    assert_eq!(perf.steps.len(), 5);
    assert_eq!(perf.steps[0].parameters["mode"], "rapid");
    assert_eq!(perf.steps[0].parameters["repeat"], "10");
}

// ============================================================================
// 3. Random generation
// ============================================================================

#[test]
fn random_with_zero_count_is_empty() {
    let generator = TestGenerator::new();
    let tests = generator.generate_random_tests(&login_form(), 0).unwrap();
    assert!(tests.is_empty());
}

#[test]
fn random_with_no_elements_is_an_error() {
    let generator = TestGenerator::new();
    let result = generator.generate_random_tests(&[], 3);
    assert!(matches!(result, Err(PipelineError::NoElements)));
}

#[test]
fn random_tests_respect_bounds() {
    let generator = TestGenerator::new();
    let tests = generator.generate_random_tests(&login_form(), 10).unwrap();

    assert_eq!(tests.len(), 10);
    for test in &tests {
        assert_eq!(test.test_type, TestType::Random);
        assert!(test.steps.len() >= 2 && test.steps.len() <= 6);
        assert!(test.confidence >= 0.5 && test.confidence < 0.9);
        assert!(test.estimated_duration >= 5 && test.estimated_duration < 15);
        for step in &test.steps {
            assert!(
                ["vision_click", "fill", "wait", "navigate"].contains(&step.action.as_str())
            );
        }
    }
}

// ============================================================================
// 4. Confidence filtering
// ============================================================================

#[test]
fn confidence_filter_is_inclusive_and_order_preserving() {
    let generator = TestGenerator::new();
    let tests = generator
        .generate_tests_from_elements(&login_form(), "web")
        .unwrap();

    let kept = filter_tests_by_confidence(tests.clone(), 0.85);
    assert!(kept.iter().all(|t| t.confidence >= 0.85));

    // Order of survivors is unchanged
    let survivor_names: Vec<&String> = tests
        .iter()
        .filter(|t| t.confidence >= 0.85)
        .map(|t| &t.name)
        .collect();
    let kept_names: Vec<&String> = kept.iter().map(|t| &t.name).collect();
    assert_eq!(survivor_names, kept_names);
}

#[test]
fn confidence_filter_can_empty_the_list() {
    let generator = TestGenerator::new();
    let tests = generator
        .generate_tests_from_elements(&login_form(), "web")
        .unwrap();
    assert!(filter_tests_by_confidence(tests, 1.1).is_empty());
}
