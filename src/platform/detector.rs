use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::orchestrator::error::PipelineError;

// ============================================================================
// Detected visual elements
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// One UI element reported by the element-detection collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementInfo {
    /// Element kind: "button", "textfield", "link", "image", ...
    #[serde(rename = "type")]
    pub element_type: String,

    /// Visible text or label, possibly empty
    #[serde(default)]
    pub text: String,

    /// Detection strength in [0, 1]
    pub confidence: f64,

    pub position: Point,
}

impl ElementInfo {
    pub fn new(element_type: &str, text: &str, confidence: f64, x: i32, y: i32) -> Self {
        Self {
            element_type: element_type.to_string(),
            text: text.to_string(),
            confidence,
            position: Point { x, y },
        }
    }
}

// ============================================================================
// ElementDetector trait — seam for vision analysis
// ============================================================================

/// Detects UI elements in a captured screenshot.
pub trait ElementDetector {
    fn detect_elements(&mut self, image_path: &str) -> Result<Vec<ElementInfo>, PipelineError>;

    /// Clear any per-run scratch state. Pooled detectors are reset on
    /// release so no state leaks between runs.
    fn reset(&mut self);
}

// ============================================================================
// FixtureDetector — deterministic sidecar-file detection
// ============================================================================

/// Reads detected elements from a `<image>.elements.json` sidecar next to
/// the screenshot. A missing sidecar yields an empty detection, a malformed
/// one is an error. Deterministic given identical inputs.
#[derive(Default)]
pub struct FixtureDetector {
    last_detected: Vec<ElementInfo>,
}

impl FixtureDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_detected(&self) -> &[ElementInfo] {
        &self.last_detected
    }
}

impl ElementDetector for FixtureDetector {
    fn detect_elements(&mut self, image_path: &str) -> Result<Vec<ElementInfo>, PipelineError> {
        let sidecar = format!("{}.elements.json", image_path);
        if !Path::new(&sidecar).exists() {
            self.last_detected.clear();
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&sidecar).map_err(|e| PipelineError::ReportIo {
            path: sidecar.clone(),
            source: e,
        })?;
        let elements: Vec<ElementInfo> =
            serde_json::from_str(&content).map_err(|e| PipelineError::JsonCodec {
                context: format!("element sidecar {}", sidecar),
                source: e,
            })?;

        self.last_detected = elements.clone();
        Ok(elements)
    }

    fn reset(&mut self) {
        self.last_detected.clear();
    }
}

// ============================================================================
// MockDetector — preset elements, for tests and offline runs
// ============================================================================

pub struct MockDetector {
    elements: Vec<ElementInfo>,
    pub calls: Vec<String>,
}

impl MockDetector {
    pub fn new(elements: Vec<ElementInfo>) -> Self {
        Self {
            elements,
            calls: Vec::new(),
        }
    }
}

impl ElementDetector for MockDetector {
    fn detect_elements(&mut self, image_path: &str) -> Result<Vec<ElementInfo>, PipelineError> {
        self.calls.push(image_path.to_string());
        Ok(self.elements.clone())
    }

    fn reset(&mut self) {
        self.calls.clear();
    }
}

// ============================================================================
// DetectorPool — free-list of reusable detector instances
// ============================================================================

/// Free-list pool for heavy detector instances shared across batch runs.
/// `release` resets the instance before returning it to the pool, so a
/// reused detector never carries state from a previous run.
pub struct DetectorPool {
    free: Vec<Box<dyn ElementDetector>>,
    factory: Box<dyn Fn() -> Box<dyn ElementDetector>>,
}

impl DetectorPool {
    pub fn new(factory: Box<dyn Fn() -> Box<dyn ElementDetector>>) -> Self {
        Self {
            free: Vec::new(),
            factory,
        }
    }

    /// Take a detector from the free list, or build a fresh one.
    pub fn acquire(&mut self) -> Box<dyn ElementDetector> {
        self.free.pop().unwrap_or_else(|| (self.factory)())
    }

    /// Return a detector to the pool. Reset happens here, not at acquire
    /// time, so the pool never holds a contaminated instance.
    pub fn release(&mut self, mut detector: Box<dyn ElementDetector>) {
        detector.reset();
        self.free.push(detector);
    }

    pub fn idle_count(&self) -> usize {
        self.free.len()
    }
}
