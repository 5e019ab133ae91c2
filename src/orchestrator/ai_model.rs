use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cli::config::RunConfig;
use crate::errors::error_model::{DetectedError, ErrorCategory};
use crate::generator::test_model::GeneratedTest;
use crate::platform::detector::ElementInfo;

// ============================================================================
// Pipeline phases — explicit state machine with an auditable skip trail
// ============================================================================

/// The orchestration states, in execution order. Every run advances through
/// all of them; disabled phases record a skip instead of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Vision,
    Generate,
    Execute,
    Detect,
    Enhance,
    Prioritize,
    Report,
    Done,
}

/// Outcome of one phase transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum PhaseStatus {
    Completed,
    Skipped(String),
    Failed(String),
}

/// One entry of the per-run phase trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub phase: Phase,
    #[serde(flatten)]
    pub outcome: PhaseStatus,
}

// ============================================================================
// Execution phase output
// ============================================================================

/// What the execution phase observed while replaying configured actions.
/// Failures here are data, not pipeline errors — they feed the detection
/// phase as classifier input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub actions_attempted: usize,

    pub actions_succeeded: usize,

    pub actions_failed: usize,

    /// Ordered output lines: action outcomes, console logs, metrics
    pub messages: Vec<String>,
}

// ============================================================================
// Enhancements and recommendations
// ============================================================================

/// A synthesized remediation strategy for a recurring error category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestEnhancement {
    pub category: ErrorCategory,

    /// How many errors in the category triggered this enhancement
    pub error_count: usize,

    pub strategy: String,

    pub parameters: HashMap<String, String>,
}

/// An end-of-run recommendation derived from the assembled result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiRecommendation {
    pub category: String,

    pub priority: String,

    pub title: String,

    pub description: String,

    pub action_items: Vec<String>,

    pub benefit: String,

    /// Rough effort label: "low", "medium", "high"
    pub effort: String,
}

// ============================================================================
// AiResult — the per-run aggregate
// ============================================================================

/// Everything one orchestration run produced. Owned by the run; persisted
/// or discarded by the caller after report generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResult {
    pub config: RunConfig,

    pub started_at: DateTime<Utc>,

    pub finished_at: DateTime<Utc>,

    pub visual_elements: Vec<ElementInfo>,

    pub generated_tests: Vec<GeneratedTest>,

    pub execution: ExecutionResult,

    /// Merged error list: pre-flight detections plus classifier output
    pub errors: Vec<DetectedError>,

    pub enhancements: Vec<TestEnhancement>,

    pub recommendations: Vec<AiRecommendation>,

    /// Auditable record of which phases ran, skipped, or failed
    pub phase_trail: Vec<PhaseRecord>,
}
