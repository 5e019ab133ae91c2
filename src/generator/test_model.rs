use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Generated-test data model
// ============================================================================

/// Test priority tier. Ordering is significant: `Low < Medium < High`;
/// the adaptive-priority phase only ever raises a test's tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// What kind of behavior a generated test exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    Interaction,
    Navigation,
    Form,
    Validation,
    ErrorHandling,
    Accessibility,
    Performance,
    Random,
}

/// One step of a generated test: an action against a target, with an
/// optional value and free-form parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestStep {
    pub action: String,

    pub target: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub parameters: HashMap<String, String>,
}

impl TestStep {
    pub fn new(action: &str, target: &str) -> Self {
        Self {
            action: action.to_string(),
            target: target.to_string(),
            value: None,
            parameters: HashMap::new(),
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn with_parameter(mut self, key: &str, value: &str) -> Self {
        self.parameters.insert(key.to_string(), value.to_string());
        self
    }
}

/// A candidate test synthesized from observed UI elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedTest {
    pub name: String,

    #[serde(rename = "type")]
    pub test_type: TestType,

    pub description: String,

    pub steps: Vec<TestStep>,

    pub priority: Priority,

    /// Heuristic strength in [0, 1]
    pub confidence: f64,

    /// Element types this test exercises
    pub element_types: Vec<String>,

    /// Estimated execution time in seconds
    pub estimated_duration: u64,
}

// ============================================================================
// Element-snapshot analysis
// ============================================================================

/// Complexity tier of a detected-element snapshot; risk mirrors it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityTier {
    Low,
    Medium,
    High,
}

/// Ephemeral summary of one element snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestAnalysis {
    pub element_counts: HashMap<String, usize>,

    pub total_elements: usize,

    /// high if >50 elements, medium if >20, else low
    pub complexity: ComplexityTier,

    /// Coverage areas implied by the element types present
    pub coverage_areas: Vec<String>,

    /// Mirrors complexity
    pub risk: ComplexityTier,
}
