use crate::{
    cli::config::RunConfig,
    orchestrator::{ai_model::AiResult, error::PipelineError, orchestrator::AiEnhancedTester},
    platform::{
        detector::FixtureDetector,
        platform::{MockPlatform, ProcessPlatform},
    },
    trace::logger::TraceLogger,
};

pub mod cli;
pub mod errors;
pub mod generator;
pub mod orchestrator;
pub mod platform;
pub mod report;
pub mod trace;

/// Run the full AI-enhanced pipeline once against the mock platform.
/// Convenience entry point for embedding; the CLI composes the same
/// pieces itself with its own platform and detector choices.
pub fn run_pipeline(config: &RunConfig) -> Result<AiResult, PipelineError> {
    let mut tester = AiEnhancedTester::new(
        Box::new(MockPlatform::new()),
        Box::new(FixtureDetector::new()),
    );
    tester.run(config)
}

/// Run the pipeline against an external driver script, tracing phases to
/// the given JSONL path.
pub fn run_pipeline_with_driver(
    config: &RunConfig,
    script: &str,
    trace_path: &str,
) -> Result<AiResult, PipelineError> {
    let platform = ProcessPlatform::launch(script)?;
    let mut tester = AiEnhancedTester::new(Box::new(platform), Box::new(FixtureDetector::new()))
        .with_tracer(TraceLogger::new(trace_path));
    tester.run(config)
}
