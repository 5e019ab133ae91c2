use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "ai-test-harness",
    version,
    about = "AI-enhanced test automation pipeline"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a JSONL phase-trace destination
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full AI-enhanced pipeline from a YAML run configuration
    Run {
        /// Path to the run configuration YAML (or a directory of them)
        #[arg(long)]
        config: String,

        /// Directory for generated reports
        #[arg(short, long, default_value = "reports")]
        output_dir: String,

        /// Platform backend: "mock", or a driver script path
        #[arg(long, default_value = "mock")]
        platform: String,
    },

    /// Classify free-text diagnostic lines and write error reports
    Analyze {
        /// Path to a log file, one message per line
        #[arg(long)]
        input: String,

        /// Directory for generated reports
        #[arg(short, long, default_value = "reports")]
        output_dir: String,
    },

    /// Generate candidate tests from a detected-element snapshot JSON
    Generate {
        /// Path to a JSON array of detected elements
        #[arg(long)]
        elements: String,

        /// Application type label used in generated test names
        #[arg(long, default_value = "web")]
        app_type: String,

        /// Directory for generated reports
        #[arg(short, long, default_value = "reports")]
        output_dir: String,
    },
}

// ============================================================================
// Run configuration (YAML)
// ============================================================================

/// One configured action to replay against the application under test.
/// Closed variants per action type give compile-time shape checking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionSpec {
    Navigate {
        #[serde(default)]
        name: String,
        url: String,
    },

    Click {
        #[serde(default)]
        name: String,
        selector: String,
    },

    Fill {
        #[serde(default)]
        name: String,
        selector: String,
        value: String,
    },

    Submit {
        #[serde(default)]
        name: String,
        selector: String,
    },

    /// Sleeps inline during execution for the configured duration
    Wait {
        #[serde(default)]
        name: String,
        seconds: u64,
    },

    Screenshot {
        #[serde(default)]
        name: String,
        path: String,
    },
}

impl ActionSpec {
    pub fn name(&self) -> &str {
        match self {
            ActionSpec::Navigate { name, .. }
            | ActionSpec::Click { name, .. }
            | ActionSpec::Fill { name, .. }
            | ActionSpec::Submit { name, .. }
            | ActionSpec::Wait { name, .. }
            | ActionSpec::Screenshot { name, .. } => name,
        }
    }
}

/// AI-pipeline configuration: per-phase toggles and generation limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_true")]
    pub enable_error_detection: bool,

    #[serde(default = "default_true")]
    pub enable_test_generation: bool,

    #[serde(default = "default_true")]
    pub enable_vision_analysis: bool,

    #[serde(default = "default_true")]
    pub auto_generate_tests: bool,

    #[serde(default = "default_true")]
    pub smart_error_recovery: bool,

    #[serde(default = "default_true")]
    pub adaptive_test_priority: bool,

    /// Generated tests below this confidence are filtered out
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Generated-test list is truncated to this many entries
    #[serde(default = "default_max_generated_tests")]
    pub max_generated_tests: usize,

    /// Reserved for a future learning mode; recognized but never acted on
    #[serde(default)]
    pub enable_learning: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enable_error_detection: true,
            enable_test_generation: true,
            enable_vision_analysis: true,
            auto_generate_tests: true,
            smart_error_recovery: true,
            adaptive_test_priority: true,
            confidence_threshold: 0.7,
            max_generated_tests: 20,
            enable_learning: false,
        }
    }
}

/// A complete run configuration, deserialized from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub app_name: String,

    #[serde(default = "default_app_type")]
    pub app_type: String,

    #[serde(default)]
    pub actions: Vec<ActionSpec>,

    #[serde(default)]
    pub ai: AiConfig,
}

// Serde default helpers
fn default_true() -> bool {
    true
}
fn default_confidence_threshold() -> f64 {
    0.7
}
fn default_max_generated_tests() -> usize {
    20
}
fn default_app_type() -> String {
    "web".to_string()
}

// ============================================================================
// Config file loading
// ============================================================================

/// Load a run configuration from a YAML file.
pub fn load_run_config(path: &str) -> Result<RunConfig, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let config: RunConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load run configurations from a single YAML file or a directory of them,
/// sorted by app name for deterministic order.
pub fn load_run_configs(path: &str) -> Result<Vec<RunConfig>, Box<dyn std::error::Error>> {
    let metadata = std::fs::metadata(path)?;
    if metadata.is_dir() {
        let mut configs = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let p = entry.path();
            if p.extension().map_or(false, |e| e == "yaml" || e == "yml") {
                let content = std::fs::read_to_string(&p)?;
                let config: RunConfig = serde_yaml::from_str(&content)?;
                configs.push(config);
            }
        }
        configs.sort_by(|a, b| a.app_name.cmp(&b.app_name));
        Ok(configs)
    } else {
        Ok(vec![load_run_config(path)?])
    }
}
