use std::collections::HashMap;

use chrono::Utc;

use crate::cli::config::{ActionSpec, RunConfig};
use crate::errors::classifier::ErrorPatternClassifier;
use crate::errors::error_model::{DetectedError, ErrorCategory, Position, Severity};
use crate::generator::generator::{TestGenerator, filter_tests_by_confidence};
use crate::generator::test_model::{GeneratedTest, Priority, TestType};
use crate::orchestrator::ai_model::{
    AiRecommendation, AiResult, ExecutionResult, Phase, PhaseRecord, PhaseStatus, TestEnhancement,
};
use crate::orchestrator::error::PipelineError;
use crate::platform::detector::{ElementDetector, ElementInfo};
use crate::platform::platform::Platform;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::PhaseEvent;

/// Screenshot path used by the vision phase.
const VISION_CAPTURE_PATH: &str = "ai_vision_capture.png";

/// Errors per category above which an enhancement is synthesized.
const ENHANCEMENT_THRESHOLD: usize = 2;

/// Visual-element count above which a coverage recommendation fires.
const COMPLEX_UI_THRESHOLD: usize = 20;

// ============================================================================
// AiEnhancedTester — the six-phase orchestration pipeline
// ============================================================================

/// Sequences vision capture, test generation, action execution, error
/// detection, enhancement synthesis, and adaptive re-prioritization into one
/// run, then produces a recommendation summary. Strictly sequential: each
/// phase completes before the next begins, and each run owns its `AiResult`.
pub struct AiEnhancedTester {
    platform: Box<dyn Platform>,
    detector: Box<dyn ElementDetector>,
    classifier: ErrorPatternClassifier,
    generator: TestGenerator,
    tracer: TraceLogger,
}

impl AiEnhancedTester {
    pub fn new(platform: Box<dyn Platform>, detector: Box<dyn ElementDetector>) -> Self {
        Self {
            platform,
            detector,
            classifier: ErrorPatternClassifier::new(),
            generator: TestGenerator::new(),
            tracer: TraceLogger::disabled(),
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    /// Return the detector, e.g. for release back into a pool.
    pub fn into_detector(self) -> Box<dyn ElementDetector> {
        self.detector
    }

    // ------------------------------------------------------------------
    // Outward entry points
    // ------------------------------------------------------------------

    /// Generate tests from an externally supplied element snapshot.
    /// An empty snapshot is rejected up front.
    pub fn generate_tests(
        &self,
        elements: &[ElementInfo],
        app_type: &str,
    ) -> Result<Vec<GeneratedTest>, PipelineError> {
        if elements.is_empty() {
            return Err(PipelineError::InvalidInput(
                "element snapshot is empty".to_string(),
            ));
        }
        self.generator.generate_tests_from_elements(elements, app_type)
    }

    /// Classify a batch of diagnostic messages.
    pub fn detect_errors(&self, messages: &[String]) -> Vec<DetectedError> {
        self.classifier.detect_errors(messages)
    }

    // ------------------------------------------------------------------
    // The pipeline
    // ------------------------------------------------------------------

    /// Run the full pipeline for one configuration.
    pub fn run(&mut self, config: &RunConfig) -> Result<AiResult, PipelineError> {
        if config.app_name.trim().is_empty() {
            return Err(PipelineError::InvalidInput(
                "run configuration has no app name".to_string(),
            ));
        }
        if config.actions.is_empty() {
            return Err(PipelineError::InvalidInput(
                "run configuration has no actions".to_string(),
            ));
        }

        let started_at = Utc::now();
        let mut trail = Vec::new();
        self.record(&mut trail, Phase::Idle, PhaseStatus::Completed, None);

        // ---- Phase 1: vision ----
        let visual_elements = self.vision_phase(config, &mut trail);

        // ---- Phase 2: generation ----
        let mut generated_tests = self.generation_phase(config, &visual_elements, &mut trail);

        // ---- Phase 3: execution (always runs) ----
        let (execution, mut errors) = self.execution_phase(config, &mut trail);

        // ---- Phase 4: detection ----
        self.detection_phase(config, &execution, &mut errors, &mut trail);

        // ---- Phase 5: enhancement ----
        let enhancements = self.enhancement_phase(config, &errors, &mut trail);

        // ---- Phase 6: adaptive priority ----
        self.priority_phase(config, &errors, &mut generated_tests, &mut trail);

        // ---- Final: recommendation synthesis ----
        let recommendations = build_recommendations(
            &errors,
            &generated_tests,
            &visual_elements,
            &enhancements,
        );
        self.record(
            &mut trail,
            Phase::Report,
            PhaseStatus::Completed,
            Some(recommendations.len()),
        );
        self.record(&mut trail, Phase::Done, PhaseStatus::Completed, None);

        Ok(AiResult {
            config: config.clone(),
            started_at,
            finished_at: Utc::now(),
            visual_elements,
            generated_tests,
            execution,
            errors,
            enhancements,
            recommendations,
            phase_trail: trail,
        })
    }

    fn record(
        &self,
        trail: &mut Vec<PhaseRecord>,
        phase: Phase,
        outcome: PhaseStatus,
        count: Option<usize>,
    ) {
        let mut event = PhaseEvent::now(phase, &outcome);
        if let Some(n) = count {
            event = event.with_count(n);
        }
        self.tracer.log(&event);
        trail.push(PhaseRecord { phase, outcome });
    }

    // ------------------------------------------------------------------
    // Phase 1: vision capture + element detection
    // ------------------------------------------------------------------

    fn vision_phase(&mut self, config: &RunConfig, trail: &mut Vec<PhaseRecord>) -> Vec<ElementInfo> {
        if !config.ai.enable_vision_analysis {
            self.record(
                trail,
                Phase::Vision,
                PhaseStatus::Skipped("vision analysis disabled".to_string()),
                None,
            );
            return Vec::new();
        }

        let captured = match self.platform.screenshot(VISION_CAPTURE_PATH) {
            Ok(()) => self.detector.detect_elements(VISION_CAPTURE_PATH),
            Err(e) => Err(e),
        };

        match captured {
            Ok(elements) => {
                let count = elements.len();
                self.record(trail, Phase::Vision, PhaseStatus::Completed, Some(count));
                elements
            }
            Err(e) => {
                eprintln!("Warning: vision phase failed: {}", e);
                self.record(trail, Phase::Vision, PhaseStatus::Failed(e.to_string()), None);
                Vec::new()
            }
        }
    }

    // ------------------------------------------------------------------
    // Phase 2: test generation (requires vision output)
    // ------------------------------------------------------------------

    fn generation_phase(
        &self,
        config: &RunConfig,
        elements: &[ElementInfo],
        trail: &mut Vec<PhaseRecord>,
    ) -> Vec<GeneratedTest> {
        if !config.ai.enable_test_generation {
            self.record(
                trail,
                Phase::Generate,
                PhaseStatus::Skipped("test generation disabled".to_string()),
                None,
            );
            return Vec::new();
        }
        if !config.ai.auto_generate_tests {
            self.record(
                trail,
                Phase::Generate,
                PhaseStatus::Skipped("auto test generation disabled".to_string()),
                None,
            );
            return Vec::new();
        }
        if elements.is_empty() {
            self.record(
                trail,
                Phase::Generate,
                PhaseStatus::Skipped("no detected elements".to_string()),
                None,
            );
            return Vec::new();
        }

        match self
            .generator
            .generate_tests_from_elements(elements, &config.app_type)
        {
            Ok(tests) => {
                let mut kept = filter_tests_by_confidence(tests, config.ai.confidence_threshold);
                kept.truncate(config.ai.max_generated_tests);
                self.record(trail, Phase::Generate, PhaseStatus::Completed, Some(kept.len()));
                kept
            }
            Err(e) => {
                eprintln!("Warning: generation phase failed: {}", e);
                self.record(trail, Phase::Generate, PhaseStatus::Failed(e.to_string()), None);
                Vec::new()
            }
        }
    }

    // ------------------------------------------------------------------
    // Phase 3: action execution (always runs)
    // ------------------------------------------------------------------

    fn execution_phase(
        &mut self,
        config: &RunConfig,
        trail: &mut Vec<PhaseRecord>,
    ) -> (ExecutionResult, Vec<DetectedError>) {
        let mut result = ExecutionResult::default();
        let mut errors = Vec::new();

        if let Err(e) = self.platform.start_recording() {
            result.messages.push(format!("Recording unavailable: {}", e));
        }

        for action in &config.actions {
            result.actions_attempted += 1;

            // Pre-flight validation: structural problems become data, not
            // classifier work
            if let Some(preflight) = validate_action(action) {
                result
                    .messages
                    .push(format!("Action '{}' rejected: {}", action.name(), preflight.message));
                result.actions_failed += 1;
                errors.push(preflight);
                continue;
            }

            match self.apply_action(action) {
                Ok(()) => {
                    result.actions_succeeded += 1;
                    result
                        .messages
                        .push(format!("Action '{}' completed", describe_action(action)));
                }
                Err(e) => {
                    result.actions_failed += 1;
                    result
                        .messages
                        .push(format!("Action '{}' failed: {}", describe_action(action), e));
                }
            }
        }

        if let Err(e) = self.platform.stop_recording() {
            result.messages.push(format!("Recording stop failed: {}", e));
        }
        if let Ok(metrics) = self.platform.get_metrics() {
            let mut names: Vec<&String> = metrics.keys().collect();
            names.sort();
            for name in names {
                result.messages.push(format!("metric {} = {}", name, metrics[name]));
            }
        }

        // Fold console output from the page snapshot into the message stream
        if let Ok(state) = self.platform.page_state() {
            result.messages.extend(state.console_logs);
        }

        self.record(
            trail,
            Phase::Execute,
            PhaseStatus::Completed,
            Some(result.actions_attempted),
        );
        (result, errors)
    }

    fn apply_action(&mut self, action: &ActionSpec) -> Result<(), PipelineError> {
        match action {
            ActionSpec::Navigate { url, .. } => self.platform.navigate(url),
            ActionSpec::Click { selector, .. } => self.platform.click(selector),
            ActionSpec::Fill { selector, value, .. } => self.platform.fill(selector, value),
            ActionSpec::Submit { selector, .. } => self.platform.submit(selector),
            ActionSpec::Screenshot { path, .. } => self.platform.screenshot(path),
            ActionSpec::Wait { seconds, .. } => {
                // The one point in the pipeline requiring wall-clock delay
                std::thread::sleep(std::time::Duration::from_secs(*seconds));
                Ok(())
            }
        }
    }

    // ------------------------------------------------------------------
    // Phase 4: error detection over execution output
    // ------------------------------------------------------------------

    fn detection_phase(
        &self,
        config: &RunConfig,
        execution: &ExecutionResult,
        errors: &mut Vec<DetectedError>,
        trail: &mut Vec<PhaseRecord>,
    ) {
        if !config.ai.enable_error_detection {
            self.record(
                trail,
                Phase::Detect,
                PhaseStatus::Skipped("error detection disabled".to_string()),
                None,
            );
            return;
        }

        let detected = self.classifier.detect_errors(&execution.messages);
        let count = detected.len();
        errors.extend(detected);
        self.record(trail, Phase::Detect, PhaseStatus::Completed, Some(count));
    }

    // ------------------------------------------------------------------
    // Phase 5: enhancement synthesis for recurring categories
    // ------------------------------------------------------------------

    fn enhancement_phase(
        &self,
        config: &RunConfig,
        errors: &[DetectedError],
        trail: &mut Vec<PhaseRecord>,
    ) -> Vec<TestEnhancement> {
        if !config.ai.smart_error_recovery {
            self.record(
                trail,
                Phase::Enhance,
                PhaseStatus::Skipped("smart error recovery disabled".to_string()),
                None,
            );
            return Vec::new();
        }
        if errors.is_empty() {
            self.record(
                trail,
                Phase::Enhance,
                PhaseStatus::Skipped("no errors to enhance against".to_string()),
                None,
            );
            return Vec::new();
        }

        let mut counts: HashMap<ErrorCategory, usize> = HashMap::new();
        for error in errors {
            *counts.entry(error.category).or_insert(0) += 1;
        }

        let mut enhancements = Vec::new();
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
            let Some(&count) = counts.get(&category) else {
                continue;
            };
            if count <= ENHANCEMENT_THRESHOLD {
                continue;
            }
            enhancements.push(build_enhancement(category, count));
        }

        self.record(
            trail,
            Phase::Enhance,
            PhaseStatus::Completed,
            Some(enhancements.len()),
        );
        enhancements
    }

    // ------------------------------------------------------------------
    // Phase 6: adaptive priority adjustment
    // ------------------------------------------------------------------

    fn priority_phase(
        &self,
        config: &RunConfig,
        errors: &[DetectedError],
        tests: &mut [GeneratedTest],
        trail: &mut Vec<PhaseRecord>,
    ) {
        if !config.ai.adaptive_test_priority {
            self.record(
                trail,
                Phase::Prioritize,
                PhaseStatus::Skipped("adaptive test priority disabled".to_string()),
                None,
            );
            return;
        }

        let has_high_severity = errors.iter().any(|e| e.severity == Severity::High);
        let has_validation = errors.iter().any(|e| e.category == ErrorCategory::Validation);
        let has_performance = errors.iter().any(|e| e.category == ErrorCategory::Performance);

        let mut adjusted = 0;
        for test in tests.iter_mut() {
            let boost = match test.test_type {
                TestType::ErrorHandling if has_high_severity => Some(0.10),
                TestType::Form if has_validation => Some(0.15),
                TestType::Performance if has_performance => Some(0.10),
                _ => None,
            };
            if let Some(increment) = boost {
                test.priority = test.priority.max(Priority::High);
                test.confidence = (test.confidence + increment).min(1.0);
                adjusted += 1;
            }
        }

        self.record(
            trail,
            Phase::Prioritize,
            PhaseStatus::Completed,
            Some(adjusted),
        );
    }
}

// ============================================================================
// Pre-flight action validation
// ============================================================================

/// Structurally invalid actions become `DetectedError`s directly; no text
/// classification is involved.
pub fn validate_action(action: &ActionSpec) -> Option<DetectedError> {
    let (name, category, message, position) = match action {
        ActionSpec::Click { name, selector } if selector.trim().is_empty() => (
            "MissingSelector",
            ErrorCategory::Validation,
            format!("click action '{}' has an empty selector", name),
            Position::Unknown,
        ),
        ActionSpec::Navigate { name, url } if url.trim().is_empty() => (
            "MissingUrl",
            ErrorCategory::Validation,
            format!("navigate action '{}' has an empty URL", name),
            Position::Unknown,
        ),
        _ => return None,
    };

    let mut context = HashMap::new();
    context.insert("action".to_string(), action.name().to_string());

    Some(DetectedError {
        name: name.to_string(),
        category,
        message,
        severity: Severity::Medium,
        confidence: 1.0,
        timestamp: Utc::now(),
        source: "preflight".to_string(),
        position,
        suggestions: vec!["Fix the action definition in the run configuration".to_string()],
        tags: vec!["preflight".to_string(), "configuration".to_string()],
        context,
    })
}

fn describe_action(action: &ActionSpec) -> String {
    if action.name().is_empty() {
        match action {
            ActionSpec::Navigate { .. } => "navigate".to_string(),
            ActionSpec::Click { .. } => "click".to_string(),
            ActionSpec::Fill { .. } => "fill".to_string(),
            ActionSpec::Submit { .. } => "submit".to_string(),
            ActionSpec::Wait { .. } => "wait".to_string(),
            ActionSpec::Screenshot { .. } => "screenshot".to_string(),
        }
    } else {
        action.name().to_string()
    }
}

// ============================================================================
// Enhancement parameterization
// ============================================================================

fn build_enhancement(category: ErrorCategory, count: usize) -> TestEnhancement {
    let (strategy, params): (&str, &[(&str, &str)]) = match category {
        ErrorCategory::Ui => (
            "vision-assisted retry",
            &[("locator_fallback", "vision"), ("timeout_ms", "10000")],
        ),
        ErrorCategory::Network => (
            "bounded retry with exponential backoff",
            &[
                ("max_retries", "3"),
                ("backoff_base_ms", "500"),
                ("fallback", "cached_response"),
            ],
        ),
        ErrorCategory::Performance => (
            "adaptive waits",
            &[("wait_strategy", "adaptive"), ("monitor", "resources")],
        ),
        _ => ("bounded retry", &[("max_retries", "2")]),
    };

    TestEnhancement {
        category,
        error_count: count,
        strategy: strategy.to_string(),
        parameters: params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

// ============================================================================
// End-of-run recommendation synthesis
// ============================================================================

fn build_recommendations(
    errors: &[DetectedError],
    tests: &[GeneratedTest],
    elements: &[ElementInfo],
    enhancements: &[TestEnhancement],
) -> Vec<AiRecommendation> {
    let mut recs = Vec::new();

    let critical_count = errors
        .iter()
        .filter(|e| e.severity == Severity::Critical)
        .count();
    if critical_count > 0 {
        recs.push(AiRecommendation {
            category: "reliability".to_string(),
            priority: "high".to_string(),
            title: "Address critical failures".to_string(),
            description: format!(
                "{} critical error(s) were detected during execution",
                critical_count
            ),
            action_items: vec![
                "Triage critical errors before the next run".to_string(),
                "Re-run the affected flows after fixes land".to_string(),
            ],
            benefit: "Stable, trustworthy test runs".to_string(),
            effort: "high".to_string(),
        });
    }

    if !tests.is_empty() {
        recs.push(AiRecommendation {
            category: "coverage".to_string(),
            priority: "medium".to_string(),
            title: "Adopt generated tests".to_string(),
            description: format!(
                "{} candidate test(s) were generated from detected elements",
                tests.len()
            ),
            action_items: vec![
                "Review generated tests for relevance".to_string(),
                "Promote high-priority candidates into the regression suite".to_string(),
            ],
            benefit: "Broader coverage with little authoring effort".to_string(),
            effort: "low".to_string(),
        });
    }

    if elements.len() > COMPLEX_UI_THRESHOLD {
        recs.push(AiRecommendation {
            category: "coverage".to_string(),
            priority: "medium".to_string(),
            title: "Expand coverage of a complex UI".to_string(),
            description: format!(
                "{} elements were detected; complex screens benefit from targeted tests",
                elements.len()
            ),
            action_items: vec![
                "Partition the screen into functional areas".to_string(),
                "Add focused tests per area rather than one broad pass".to_string(),
            ],
            benefit: "Failures localize to specific screen areas".to_string(),
            effort: "medium".to_string(),
        });
    }

    if !enhancements.is_empty() {
        recs.push(AiRecommendation {
            category: "resilience".to_string(),
            priority: "medium".to_string(),
            title: "Apply recovery enhancements".to_string(),
            description: format!(
                "{} recurring error categor(ies) have synthesized recovery strategies",
                enhancements.len()
            ),
            action_items: vec![
                "Enable the synthesized retry and fallback parameters".to_string(),
                "Monitor whether recurrence rates drop on subsequent runs".to_string(),
            ],
            benefit: "Fewer flaky failures from known error classes".to_string(),
            effort: "medium".to_string(),
        });
    }

    recs
}
