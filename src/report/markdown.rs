use crate::errors::error_model::{DetectedError, ErrorCategory};
use crate::orchestrator::ai_model::{AiResult, PhaseStatus};
use crate::report::report_model::{ErrorReport, GenerationReport};

// ============================================================================
// Markdown renderers — human-readable report bodies
// ============================================================================

const CATEGORY_ORDER: [ErrorCategory; 9] = [
    ErrorCategory::Network,
    ErrorCategory::Ui,
    ErrorCategory::Authentication,
    ErrorCategory::Validation,
    ErrorCategory::Performance,
    ErrorCategory::Javascript,
    ErrorCategory::Database,
    ErrorCategory::Filesystem,
    ErrorCategory::General,
];

/// Render the smart error report: a summary, then one section per category
/// that had errors, then trends, recommendations, and coverage gaps.
pub fn render_error_report(report: &ErrorReport) -> String {
    let mut out = String::new();

    out.push_str("# Smart Error Report\n\n");
    out.push_str(&format!(
        "Generated: {}\n\nTotal errors: **{}**\n\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.total_errors
    ));

    for category in CATEGORY_ORDER {
        let in_category: Vec<&DetectedError> = report
            .errors
            .iter()
            .filter(|e| e.category == category)
            .collect();
        if in_category.is_empty() {
            continue;
        }

        out.push_str(&format!(
            "## {} ({})\n\n",
            category.as_str(),
            in_category.len()
        ));
        for error in in_category {
            out.push_str(&format!(
                "- **{}** [{}] (confidence {:.2})\n  - message: {}\n",
                error.name,
                error.severity.as_str(),
                error.confidence,
                error.message
            ));
            for suggestion in &error.suggestions {
                out.push_str(&format!("  - suggestion: {}\n", suggestion));
            }
        }
        out.push('\n');
    }

    if !report.analysis.trends.is_empty() {
        out.push_str("## Trends\n\n");
        for trend in &report.analysis.trends {
            out.push_str(&format!(
                "- {}: {} error(s), dominant {} / {}\n",
                trend.timestamp.format("%Y-%m-%d %H:00"),
                trend.error_count,
                trend.dominant_category.as_str(),
                trend.dominant_severity.as_str()
            ));
        }
        out.push('\n');
    }

    if !report.analysis.recommendations.is_empty() {
        out.push_str("## Recommendations\n\n");
        for rec in &report.analysis.recommendations {
            out.push_str(&format!(
                "- [{}/{}] {}\n",
                rec.action, rec.priority, rec.description
            ));
        }
        out.push('\n');
    }

    if !report.analysis.coverage_gaps.is_empty() {
        out.push_str("## Coverage gaps\n\n");
        for gap in &report.analysis.coverage_gaps {
            out.push_str(&format!("- {}\n", gap));
        }
        out.push('\n');
    }

    out
}

/// Render the test-generation report: element analysis plus the prioritized
/// test list with steps.
pub fn render_generation_report(report: &GenerationReport) -> String {
    let mut out = String::new();

    out.push_str("# AI Test Generation Report\n\n");
    out.push_str(&format!(
        "Generated: {}\n\nApp type: {}\n\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.app_type
    ));

    out.push_str("## Element analysis\n\n");
    out.push_str(&format!(
        "- Total elements: {}\n- Complexity: {:?}\n- Risk: {:?}\n",
        report.analysis.total_elements, report.analysis.complexity, report.analysis.risk
    ));
    if !report.analysis.coverage_areas.is_empty() {
        out.push_str(&format!(
            "- Coverage areas: {}\n",
            report.analysis.coverage_areas.join(", ")
        ));
    }
    out.push('\n');

    out.push_str(&format!("## Generated tests ({})\n\n", report.tests.len()));
    for test in &report.tests {
        out.push_str(&format!(
            "### {}\n\n- type: {:?}\n- priority: {:?}\n- confidence: {:.2}\n- estimated duration: {}s\n- {}\n\n",
            test.name,
            test.test_type,
            test.priority,
            test.confidence,
            test.estimated_duration,
            test.description
        ));
        for (i, step) in test.steps.iter().enumerate() {
            match &step.value {
                Some(value) => out.push_str(&format!(
                    "{}. {} `{}` = `{}`\n",
                    i + 1,
                    step.action,
                    step.target,
                    value
                )),
                None => out.push_str(&format!("{}. {} `{}`\n", i + 1, step.action, step.target)),
            }
        }
        out.push('\n');
    }

    out
}

/// Render the orchestration report: run summary, phase trail, errors,
/// enhancements, and recommendations.
pub fn render_testing_report(result: &AiResult) -> String {
    let mut out = String::new();

    out.push_str("# AI Enhanced Testing Report\n\n");
    out.push_str(&format!(
        "App: **{}** ({})\n\nStarted: {}\nFinished: {}\n\n",
        result.config.app_name,
        result.config.app_type,
        result.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        result.finished_at.format("%Y-%m-%d %H:%M:%S UTC"),
    ));

    out.push_str("## Run summary\n\n");
    out.push_str(&format!(
        "- Actions: {} attempted, {} succeeded, {} failed\n- Visual elements: {}\n- Generated tests: {}\n- Errors: {}\n- Enhancements: {}\n\n",
        result.execution.actions_attempted,
        result.execution.actions_succeeded,
        result.execution.actions_failed,
        result.visual_elements.len(),
        result.generated_tests.len(),
        result.errors.len(),
        result.enhancements.len(),
    ));

    out.push_str("## Phase trail\n\n");
    for record in &result.phase_trail {
        let line = match &record.outcome {
            PhaseStatus::Completed => format!("- {:?}: completed\n", record.phase),
            PhaseStatus::Skipped(reason) => {
                format!("- {:?}: skipped ({})\n", record.phase, reason)
            }
            PhaseStatus::Failed(message) => {
                format!("- {:?}: failed ({})\n", record.phase, message)
            }
        };
        out.push_str(&line);
    }
    out.push('\n');

    if !result.errors.is_empty() {
        out.push_str(&format!("## Errors ({})\n\n", result.errors.len()));
        for error in &result.errors {
            out.push_str(&format!(
                "- **{}** [{}/{}] {}\n",
                error.name,
                error.category.as_str(),
                error.severity.as_str(),
                error.message
            ));
        }
        out.push('\n');
    }

    if !result.enhancements.is_empty() {
        out.push_str("## Enhancements\n\n");
        for enhancement in &result.enhancements {
            out.push_str(&format!(
                "- {} ({} errors): {}\n",
                enhancement.category.as_str(),
                enhancement.error_count,
                enhancement.strategy
            ));
        }
        out.push('\n');
    }

    if !result.recommendations.is_empty() {
        out.push_str("## Recommendations\n\n");
        for rec in &result.recommendations {
            out.push_str(&format!(
                "### {} [{}/{}]\n\n{}\n\n",
                rec.title, rec.category, rec.priority, rec.description
            ));
            for item in &rec.action_items {
                out.push_str(&format!("- {}\n", item));
            }
            out.push_str(&format!(
                "\nBenefit: {} — effort: {}\n\n",
                rec.benefit, rec.effort
            ));
        }
    }

    out
}
