use std::fmt;

#[derive(Debug)]
pub enum PipelineError {
    /// Malformed or missing input to a public entry point
    InvalidInput(String),

    /// Test generation was invoked on a disabled generator
    GenerationDisabled,

    /// Random test generation was asked to work from an empty element set
    NoElements,

    /// Platform helper process failed to spawn
    SubprocessSpawn { script: String, source: std::io::Error },

    /// Reading from / writing to the platform helper process failed
    SessionIo(String),

    /// The platform reported a failed action
    PlatformAction { action: String, error: String },

    /// JSON (de)serialization failed
    JsonCodec { context: String, source: serde_json::Error },

    /// YAML (de)serialization failed
    YamlCodec { context: String, source: serde_yaml::Error },

    /// Creating or writing a report artifact failed
    ReportIo { path: String, source: std::io::Error },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::InvalidInput(msg) => {
                write!(f, "invalid input format: {}", msg)
            }
            PipelineError::GenerationDisabled => {
                write!(f, "test generation is disabled")
            }
            PipelineError::NoElements => {
                write!(f, "no elements to base random tests on")
            }
            PipelineError::SubprocessSpawn { script, source } => {
                write!(f, "Failed to spawn {}: {}", script, source)
            }
            PipelineError::SessionIo(msg) => {
                write!(f, "Platform session I/O failed: {}", msg)
            }
            PipelineError::PlatformAction { action, error } => {
                write!(f, "Platform action '{}' failed: {}", action, error)
            }
            PipelineError::JsonCodec { context, source } => {
                write!(f, "JSON error ({}): {}", context, source)
            }
            PipelineError::YamlCodec { context, source } => {
                write!(f, "YAML error ({}): {}", context, source)
            }
            PipelineError::ReportIo { path, source } => {
                write!(f, "Failed to write report '{}': {}", path, source)
            }
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::SubprocessSpawn { source, .. } => Some(source),
            PipelineError::JsonCodec { source, .. } => Some(source),
            PipelineError::YamlCodec { source, .. } => Some(source),
            PipelineError::ReportIo { source, .. } => Some(source),
            _ => None,
        }
    }
}
