use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::error_model::{DetectedError, ErrorAnalysis};
use crate::generator::test_model::{GeneratedTest, TestAnalysis};
use crate::orchestrator::ai_model::AiResult;

// ============================================================================
// Machine-readable report shapes
// ============================================================================

/// Error report for machine consumption. `total_errors` always equals the
/// length of `errors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub generated_at: DateTime<Utc>,

    pub total_errors: usize,

    pub errors: Vec<DetectedError>,

    pub analysis: ErrorAnalysis,
}

impl ErrorReport {
    pub fn new(errors: Vec<DetectedError>, analysis: ErrorAnalysis) -> Self {
        Self {
            generated_at: Utc::now(),
            total_errors: errors.len(),
            errors,
            analysis,
        }
    }
}

/// Test-generation report: the element analysis alongside the tests it
/// produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generated_at: DateTime<Utc>,

    pub app_type: String,

    pub analysis: TestAnalysis,

    pub tests: Vec<GeneratedTest>,
}

impl GenerationReport {
    pub fn new(app_type: &str, analysis: TestAnalysis, tests: Vec<GeneratedTest>) -> Self {
        Self {
            generated_at: Utc::now(),
            app_type: app_type.to_string(),
            analysis,
            tests,
        }
    }
}

/// Orchestration report: the full per-run aggregate, timestamped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestingReport {
    pub generated_at: DateTime<Utc>,

    pub result: AiResult,
}

impl TestingReport {
    pub fn new(result: AiResult) -> Self {
        Self {
            generated_at: Utc::now(),
            result,
        }
    }
}
