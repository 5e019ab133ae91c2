use std::collections::HashMap;

use rand::Rng;

use crate::generator::test_model::{
    ComplexityTier, GeneratedTest, Priority, TestAnalysis, TestStep, TestType,
};
use crate::orchestrator::error::PipelineError;
use crate::platform::detector::ElementInfo;

/// Fixed malformed input injected by the error-handling strategy.
pub const MALFORMED_INPUT: &str = "@#$%^&*()_+!~`";

/// Per-instance interaction time constants, in seconds.
const BUTTON_STEP_SECS: u64 = 2;
const TEXTFIELD_STEP_SECS: u64 = 3;
const NAVIGATION_STEP_SECS: u64 = 2;
const ERROR_HANDLING_STEP_SECS: u64 = 4;
const ACCESSIBILITY_TEST_SECS: u64 = 10;
const PERFORMANCE_TEST_SECS: u64 = 15;

/// The rapid-click stress test exercises at most this many buttons.
const PERFORMANCE_BUTTON_LIMIT: usize = 5;

// ============================================================================
// TestGenerator — heuristic test synthesis from element snapshots
// ============================================================================

/// Turns a snapshot of detected UI elements into prioritized candidate
/// tests. Six independent strategies run over the same element set and their
/// output is concatenated; no strategy suppresses another.
pub struct TestGenerator {
    enabled: bool,
}

impl Default for TestGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TestGenerator {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub fn with_enabled(enabled: bool) -> Self {
        Self { enabled }
    }

    // ------------------------------------------------------------------
    // Element analysis
    // ------------------------------------------------------------------

    /// Summarize an element snapshot: counts by type, complexity tier
    /// (high >50, medium >20, else low), coverage areas implied by the
    /// types present, and a risk tier mirroring complexity.
    pub fn analyze_elements(&self, elements: &[ElementInfo]) -> TestAnalysis {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for el in elements {
            *counts.entry(el.element_type.clone()).or_insert(0) += 1;
        }

        let total = elements.len();
        let complexity = if total > 50 {
            ComplexityTier::High
        } else if total > 20 {
            ComplexityTier::Medium
        } else {
            ComplexityTier::Low
        };

        let mut areas = Vec::new();
        let area_table: [(&str, &[&str]); 4] = [
            ("button", &["interaction", "navigation"]),
            ("textfield", &["form", "input", "validation"]),
            ("link", &["navigation", "accessibility"]),
            ("image", &["media", "accessibility"]),
        ];
        for (element_type, implied) in area_table {
            if counts.contains_key(element_type) {
                for area in implied {
                    if !areas.iter().any(|a: &String| a == area) {
                        areas.push(area.to_string());
                    }
                }
            }
        }

        TestAnalysis {
            element_counts: counts,
            total_elements: total,
            complexity,
            coverage_areas: areas,
            risk: complexity,
        }
    }

    // ------------------------------------------------------------------
    // Strategy-based generation
    // ------------------------------------------------------------------

    /// Run all six generation strategies over the element snapshot and
    /// return the concatenated output, stably sorted by priority tier then
    /// confidence descending. Fails when generation is disabled.
    pub fn generate_tests_from_elements(
        &self,
        elements: &[ElementInfo],
        app_type: &str,
    ) -> Result<Vec<GeneratedTest>, PipelineError> {
        if !self.enabled {
            return Err(PipelineError::GenerationDisabled);
        }

        let mut tests = Vec::new();
        tests.extend(generate_interaction_tests(elements, app_type));
        tests.extend(generate_navigation_tests(elements, app_type));
        tests.extend(generate_form_tests(elements, app_type));
        tests.extend(generate_error_handling_tests(elements, app_type));
        tests.push(generate_accessibility_test(elements, app_type));
        tests.push(generate_performance_test(elements, app_type));

        // Stable: equal-priority, equal-confidence tests keep strategy order
        tests.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(b.confidence.partial_cmp(&a.confidence).unwrap_or(std::cmp::Ordering::Equal))
        });

        Ok(tests)
    }

    // ------------------------------------------------------------------
    // Random generation
    // ------------------------------------------------------------------

    /// Produce up to `count` randomized tests over the element snapshot.
    /// `count == 0` yields an empty list; an empty element set is an
    /// explicit error rather than the latent panic of indexing into it.
    pub fn generate_random_tests(
        &self,
        elements: &[ElementInfo],
        count: usize,
    ) -> Result<Vec<GeneratedTest>, PipelineError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        if elements.is_empty() {
            return Err(PipelineError::NoElements);
        }

        let mut types: Vec<String> = Vec::new();
        for el in elements {
            if !types.contains(&el.element_type) {
                types.push(el.element_type.clone());
            }
        }

        const ACTIONS: [&str; 4] = ["vision_click", "fill", "wait", "navigate"];
        const PRIORITIES: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

        let mut rng = rand::thread_rng();
        let mut tests = Vec::with_capacity(count);

        for i in 0..count {
            let step_count = rng.gen_range(2..=6);
            let mut steps = Vec::with_capacity(step_count);
            for _ in 0..step_count {
                let action = ACTIONS[rng.gen_range(0..ACTIONS.len())];
                let target = types[rng.gen_range(0..types.len())].clone();
                let step = match action {
                    "fill" => TestStep::new(action, &target).with_value("random input"),
                    "wait" => TestStep::new(action, &target)
                        .with_value(&rng.gen_range(1..=3u64).to_string()),
                    _ => TestStep::new(action, &target),
                };
                steps.push(step);
            }

            tests.push(GeneratedTest {
                name: format!("Random exploration {}", i + 1),
                test_type: TestType::Random,
                description: "Randomized action sequence over detected element types".to_string(),
                steps,
                priority: PRIORITIES[rng.gen_range(0..PRIORITIES.len())],
                confidence: rng.gen_range(0.5..0.9),
                element_types: types.clone(),
                estimated_duration: rng.gen_range(5..15),
            });
        }

        Ok(tests)
    }
}

/// Keep exactly the tests whose confidence meets the threshold,
/// order-preserved.
pub fn filter_tests_by_confidence(
    tests: Vec<GeneratedTest>,
    threshold: f64,
) -> Vec<GeneratedTest> {
    tests
        .into_iter()
        .filter(|t| t.confidence >= threshold)
        .collect()
}

// ============================================================================
// Individual strategies
// ============================================================================

fn elements_of<'a>(elements: &'a [ElementInfo], element_type: &str) -> Vec<&'a ElementInfo> {
    elements
        .iter()
        .filter(|e| e.element_type == element_type)
        .collect()
}

fn target_for(el: &ElementInfo, fallback: &str, index: usize) -> String {
    if el.text.trim().is_empty() {
        format!("{}_{}", fallback, index + 1)
    } else {
        el.text.trim().to_string()
    }
}

/// Suggest a plausible fill value from a field's label.
fn sample_value(label: &str) -> &'static str {
    let lower = label.to_lowercase();
    if lower.contains("email") {
        "test@example.com"
    } else if lower.contains("password") {
        "Secret123!"
    } else if lower.contains("phone") || lower.contains("tel") {
        "555-0100"
    } else {
        "test value"
    }
}

/// One aggregate test per present type among {button, textfield},
/// exercising every instance of that type.
fn generate_interaction_tests(elements: &[ElementInfo], app_type: &str) -> Vec<GeneratedTest> {
    let mut tests = Vec::new();

    let buttons = elements_of(elements, "button");
    if !buttons.is_empty() {
        let steps: Vec<TestStep> = buttons
            .iter()
            .enumerate()
            .map(|(i, el)| TestStep::new("click", &target_for(el, "button", i)))
            .collect();
        tests.push(GeneratedTest {
            name: format!("Interaction: all buttons ({})", app_type),
            test_type: TestType::Interaction,
            description: format!("Click every detected button ({} instances)", buttons.len()),
            steps,
            priority: Priority::High,
            confidence: 0.85,
            element_types: vec!["button".to_string()],
            estimated_duration: BUTTON_STEP_SECS * buttons.len() as u64,
        });
    }

    let fields = elements_of(elements, "textfield");
    if !fields.is_empty() {
        let steps: Vec<TestStep> = fields
            .iter()
            .enumerate()
            .map(|(i, el)| {
                TestStep::new("fill", &target_for(el, "textfield", i))
                    .with_value(sample_value(&el.text))
            })
            .collect();
        tests.push(GeneratedTest {
            name: format!("Interaction: all text fields ({})", app_type),
            test_type: TestType::Interaction,
            description: format!(
                "Fill every detected text field ({} instances)",
                fields.len()
            ),
            steps,
            priority: Priority::High,
            confidence: 0.85,
            element_types: vec!["textfield".to_string()],
            estimated_duration: TEXTFIELD_STEP_SECS * fields.len() as u64,
        });
    }

    tests
}

/// Separate aggregate tests for links and images.
fn generate_navigation_tests(elements: &[ElementInfo], app_type: &str) -> Vec<GeneratedTest> {
    let mut tests = Vec::new();

    for (element_type, label) in [("link", "links"), ("image", "images")] {
        let found = elements_of(elements, element_type);
        if found.is_empty() {
            continue;
        }
        let steps: Vec<TestStep> = found
            .iter()
            .enumerate()
            .map(|(i, el)| TestStep::new("click", &target_for(el, element_type, i)))
            .collect();
        tests.push(GeneratedTest {
            name: format!("Navigation: all {} ({})", label, app_type),
            test_type: TestType::Navigation,
            description: format!("Follow every detected {} ({} instances)", label, found.len()),
            steps,
            priority: Priority::Medium,
            confidence: 0.8,
            element_types: vec![element_type.to_string()],
            estimated_duration: NAVIGATION_STEP_SECS * found.len() as u64,
        });
    }

    tests
}

/// Fill-and-submit plus empty/invalid-value validation, only when both
/// textfields and buttons are present.
fn generate_form_tests(elements: &[ElementInfo], app_type: &str) -> Vec<GeneratedTest> {
    let fields = elements_of(elements, "textfield");
    let buttons = elements_of(elements, "button");
    if fields.is_empty() || buttons.is_empty() {
        return Vec::new();
    }

    let submit_target = target_for(buttons[0], "button", 0);
    let duration = TEXTFIELD_STEP_SECS * fields.len() as u64 + BUTTON_STEP_SECS;

    let mut fill_steps: Vec<TestStep> = fields
        .iter()
        .enumerate()
        .map(|(i, el)| {
            TestStep::new("fill", &target_for(el, "textfield", i))
                .with_value(sample_value(&el.text))
        })
        .collect();
    fill_steps.push(TestStep::new("submit", &submit_target));

    let mut invalid_steps: Vec<TestStep> = fields
        .iter()
        .enumerate()
        .map(|(i, el)| TestStep::new("fill", &target_for(el, "textfield", i)).with_value(""))
        .collect();
    invalid_steps.push(TestStep::new("submit", &submit_target));

    vec![
        GeneratedTest {
            name: format!("Form: fill and submit ({})", app_type),
            test_type: TestType::Form,
            description: "Fill every field with plausible values and submit".to_string(),
            steps: fill_steps,
            priority: Priority::High,
            confidence: 0.9,
            element_types: vec!["textfield".to_string(), "button".to_string()],
            estimated_duration: duration,
        },
        GeneratedTest {
            name: format!("Form: submit with empty values ({})", app_type),
            test_type: TestType::Validation,
            description: "Submit the form with empty values to exercise validation".to_string(),
            steps: invalid_steps,
            priority: Priority::High,
            confidence: 0.85,
            element_types: vec!["textfield".to_string(), "button".to_string()],
            estimated_duration: duration,
        },
    ]
}

/// Inject a fixed malformed string into every field, when fields exist.
fn generate_error_handling_tests(elements: &[ElementInfo], app_type: &str) -> Vec<GeneratedTest> {
    let fields = elements_of(elements, "textfield");
    if fields.is_empty() {
        return Vec::new();
    }

    let steps: Vec<TestStep> = fields
        .iter()
        .enumerate()
        .map(|(i, el)| {
            TestStep::new("fill", &target_for(el, "textfield", i)).with_value(MALFORMED_INPUT)
        })
        .collect();

    vec![GeneratedTest {
        name: format!("Error handling: malformed input ({})", app_type),
        test_type: TestType::ErrorHandling,
        description: "Inject malformed input into every field".to_string(),
        steps,
        priority: Priority::Medium,
        confidence: 0.8,
        element_types: vec!["textfield".to_string()],
        estimated_duration: ERROR_HANDLING_STEP_SECS * fields.len() as u64,
    }]
}

/// Keyboard-navigation pass with a fixed key sequence. Always emitted.
fn generate_accessibility_test(_elements: &[ElementInfo], app_type: &str) -> GeneratedTest {
    let steps = vec![
        TestStep::new("key", "page").with_value("Tab"),
        TestStep::new("key", "page").with_value("Enter"),
        TestStep::new("key", "page").with_value("Space"),
    ];

    GeneratedTest {
        name: format!("Accessibility: keyboard navigation ({})", app_type),
        test_type: TestType::Accessibility,
        description: "Traverse interactive elements with Tab/Enter/Space".to_string(),
        steps,
        priority: Priority::Medium,
        confidence: 0.75,
        element_types: vec![
            "button".to_string(),
            "textfield".to_string(),
            "link".to_string(),
        ],
        estimated_duration: ACCESSIBILITY_TEST_SECS,
    }
}

/// Rapid-click stress over the first few buttons. Always emitted.
fn generate_performance_test(elements: &[ElementInfo], app_type: &str) -> GeneratedTest {
    let steps: Vec<TestStep> = elements_of(elements, "button")
        .iter()
        .take(PERFORMANCE_BUTTON_LIMIT)
        .enumerate()
        .map(|(i, el)| {
            TestStep::new("click", &target_for(el, "button", i))
                .with_parameter("mode", "rapid")
                .with_parameter("repeat", "10")
        })
        .collect();

    GeneratedTest {
        name: format!("Performance: rapid click stress ({})", app_type),
        test_type: TestType::Performance,
        description: "Rapidly click the first detected buttons to stress the UI".to_string(),
        steps,
        priority: Priority::Low,
        confidence: 0.7,
        element_types: vec!["button".to_string()],
        estimated_duration: PERFORMANCE_TEST_SECS,
    }
}
