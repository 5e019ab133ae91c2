use std::path::{Path, PathBuf};

use crate::orchestrator::ai_model::AiResult;
use crate::orchestrator::error::PipelineError;
use crate::report::markdown::{
    render_error_report, render_generation_report, render_testing_report,
};
use crate::report::report_model::{ErrorReport, GenerationReport, TestingReport};

// ============================================================================
// ReportWriter — persisted artifacts in a caller-supplied directory
// ============================================================================

/// Writes report artifacts. Creating the output directory is this writer's
/// responsibility; any create or write failure is a hard error.
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: &str) -> Self {
        Self {
            output_dir: PathBuf::from(output_dir),
        }
    }

    fn ensure_dir(&self) -> Result<(), PipelineError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| PipelineError::ReportIo {
            path: self.output_dir.display().to_string(),
            source: e,
        })
    }

    fn write_file(&self, name: &str, content: &str) -> Result<PathBuf, PipelineError> {
        let path = self.output_dir.join(name);
        std::fs::write(&path, content).map_err(|e| PipelineError::ReportIo {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(path)
    }

    /// Write `smart_error_report.md` and `error_report.json`.
    pub fn write_error_reports(&self, report: &ErrorReport) -> Result<Vec<PathBuf>, PipelineError> {
        self.ensure_dir()?;

        let markdown = render_error_report(report);
        let json = serde_json::to_string_pretty(report).map_err(|e| PipelineError::JsonCodec {
            context: "error report".to_string(),
            source: e,
        })?;

        Ok(vec![
            self.write_file("smart_error_report.md", &markdown)?,
            self.write_file("error_report.json", &json)?,
        ])
    }

    /// Write `ai_test_generation_report.md` and `generation_report.json`.
    pub fn write_generation_reports(
        &self,
        report: &GenerationReport,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        self.ensure_dir()?;

        let markdown = render_generation_report(report);
        let json = serde_json::to_string_pretty(report).map_err(|e| PipelineError::JsonCodec {
            context: "generation report".to_string(),
            source: e,
        })?;

        Ok(vec![
            self.write_file("ai_test_generation_report.md", &markdown)?,
            self.write_file("generation_report.json", &json)?,
        ])
    }

    /// Write `ai_enhanced_testing_report.md`, `testing_report.json`, and
    /// `testing_report.yaml`.
    pub fn write_testing_reports(&self, result: &AiResult) -> Result<Vec<PathBuf>, PipelineError> {
        self.ensure_dir()?;

        let report = TestingReport::new(result.clone());
        let markdown = render_testing_report(result);
        let json = serde_json::to_string_pretty(&report).map_err(|e| PipelineError::JsonCodec {
            context: "testing report".to_string(),
            source: e,
        })?;
        let yaml = serde_yaml::to_string(&report).map_err(|e| PipelineError::YamlCodec {
            context: "testing report".to_string(),
            source: e,
        })?;

        Ok(vec![
            self.write_file("ai_enhanced_testing_report.md", &markdown)?,
            self.write_file("testing_report.json", &json)?,
            self.write_file("testing_report.yaml", &yaml)?,
        ])
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
