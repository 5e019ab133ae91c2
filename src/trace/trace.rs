use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::orchestrator::ai_model::{Phase, PhaseStatus};

/// One JSONL record in the pipeline trace: a phase transition with its
/// outcome and optional detail.
#[derive(Debug, Serialize)]
pub struct PhaseEvent {
    pub timestamp_ms: u128,

    pub phase: String,

    pub status: String,

    pub detail: Option<String>,

    /// Items the phase produced (elements, tests, errors, ...)
    pub count: Option<usize>,
}

impl PhaseEvent {
    pub fn now(phase: Phase, status: &PhaseStatus) -> Self {
        let (status_str, detail) = match status {
            PhaseStatus::Completed => ("completed".to_string(), None),
            PhaseStatus::Skipped(reason) => ("skipped".to_string(), Some(reason.clone())),
            PhaseStatus::Failed(message) => ("failed".to_string(), Some(message.clone())),
        };

        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            phase: format!("{:?}", phase),
            status: status_str,
            detail,
            count: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}
