use crate::cli::config::load_run_configs;
use crate::errors::classifier::ErrorPatternClassifier;
use crate::errors::error_model::Severity;
use crate::generator::generator::TestGenerator;
use crate::orchestrator::orchestrator::AiEnhancedTester;
use crate::platform::detector::{DetectorPool, ElementDetector, ElementInfo, FixtureDetector};
use crate::platform::platform::{MockPlatform, Platform, ProcessPlatform};
use crate::report::report_model::{ErrorReport, GenerationReport};
use crate::report::writer::ReportWriter;
use crate::trace::logger::TraceLogger;

// ============================================================================
// run subcommand
// ============================================================================

/// Run the pipeline for every configuration found at `config_path`.
/// Returns whether no run detected a critical error.
pub fn cmd_run(
    config_path: &str,
    output_dir: &str,
    platform_name: &str,
    verbose: u8,
    trace_path: Option<&str>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let configs = load_run_configs(config_path)?;
    if configs.is_empty() {
        eprintln!("No run configurations found at: {}", config_path);
        return Ok(true);
    }

    // Detector instances are heavy enough to reuse across batch runs
    let mut pool = DetectorPool::new(Box::new(|| {
        Box::new(FixtureDetector::new()) as Box<dyn ElementDetector>
    }));

    let writer = ReportWriter::new(output_dir);
    let classifier = ErrorPatternClassifier::new();
    let mut all_clean = true;

    for config in &configs {
        if verbose > 0 {
            eprintln!("Running pipeline for: {}", config.app_name);
        }

        let platform = build_platform(platform_name)?;
        let detector = pool.acquire();
        let tracer = match trace_path {
            Some(path) => TraceLogger::new(path),
            None => TraceLogger::disabled(),
        };

        let mut tester = AiEnhancedTester::new(platform, detector).with_tracer(tracer);
        let result = tester.run(config)?;
        pool.release(tester.into_detector());

        let has_critical = result
            .errors
            .iter()
            .any(|e| e.severity == Severity::Critical);
        if has_critical {
            all_clean = false;
        }

        let analysis = classifier.analyze_errors(&result.errors);
        let error_report = ErrorReport::new(result.errors.clone(), analysis);

        let mut written = writer.write_testing_reports(&result)?;
        written.extend(writer.write_error_reports(&error_report)?);

        println!(
            "{}: {} action(s), {} generated test(s), {} error(s), {} recommendation(s)",
            config.app_name,
            result.execution.actions_attempted,
            result.generated_tests.len(),
            result.errors.len(),
            result.recommendations.len(),
        );
        if verbose > 0 {
            for path in &written {
                eprintln!("  Wrote: {}", path.display());
            }
        }
    }

    Ok(all_clean)
}

/// Build the platform backend: "mock" or a driver script path.
fn build_platform(name: &str) -> Result<Box<dyn Platform>, Box<dyn std::error::Error>> {
    match name {
        "mock" => Ok(Box::new(MockPlatform::new())),
        script => Ok(Box::new(ProcessPlatform::launch(script)?)),
    }
}

// ============================================================================
// analyze subcommand
// ============================================================================

/// Classify free-text diagnostic lines from a log file and write error
/// reports. Returns whether no critical error was found.
pub fn cmd_analyze(
    input: &str,
    output_dir: &str,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(input)?;
    let messages: Vec<String> = content
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();

    if verbose > 0 {
        eprintln!("Classifying {} message(s) from {}", messages.len(), input);
    }

    let classifier = ErrorPatternClassifier::new();
    let errors = classifier.detect_errors(&messages);
    let analysis = classifier.analyze_errors(&errors);
    let has_critical = !analysis.critical_errors.is_empty();
    let report = ErrorReport::new(errors, analysis);

    let written = ReportWriter::new(output_dir).write_error_reports(&report)?;

    println!(
        "Detected {} error(s) in {} message(s)",
        report.total_errors,
        messages.len()
    );
    if verbose > 0 {
        for path in &written {
            eprintln!("  Wrote: {}", path.display());
        }
    }

    Ok(!has_critical)
}

// ============================================================================
// generate subcommand
// ============================================================================

/// Generate candidate tests from a detected-element snapshot JSON and write
/// the generation report.
pub fn cmd_generate(
    elements_path: &str,
    app_type: &str,
    output_dir: &str,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(elements_path)?;
    let elements: Vec<ElementInfo> = serde_json::from_str(&content)?;

    let generator = TestGenerator::new();
    let analysis = generator.analyze_elements(&elements);
    let tests = generator.generate_tests_from_elements(&elements, app_type)?;

    if verbose > 0 {
        eprintln!(
            "Generated {} test(s) from {} element(s)",
            tests.len(),
            elements.len()
        );
    }

    let report = GenerationReport::new(app_type, analysis, tests);
    let written = ReportWriter::new(output_dir).write_generation_reports(&report)?;

    println!(
        "Generated {} test(s) in {}/",
        report.tests.len(),
        output_dir
    );
    if verbose > 0 {
        for path in &written {
            eprintln!("  Wrote: {}", path.display());
        }
    }

    Ok(())
}
