use ai_test_harness::cli::commands::{cmd_analyze, cmd_generate, cmd_run};
use ai_test_harness::cli::config::{ActionSpec, RunConfig, load_run_config, load_run_configs};
use ai_test_harness::platform::detector::ElementInfo;

// ============================================================================
// Helper builders
// ============================================================================

fn write_config(dir: &std::path::Path, file: &str, app_name: &str) -> std::path::PathBuf {
    let yaml = format!(
        r##"
app_name: {}
actions:
  - type: navigate
    name: open
    url: https://app.example.com
  - type: click
    name: sign-in
    selector: "#signin"
"##,
        app_name
    );
    let path = dir.join(file);
    std::fs::write(&path, yaml).unwrap();
    path
}

// ============================================================================
// 1. Config parsing
// ============================================================================

#[test]
fn run_config_parses_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "app.yaml", "Example App");

    let config = load_run_config(path.to_str().unwrap()).unwrap();
    assert_eq!(config.app_name, "Example App");
    assert_eq!(config.app_type, "web");
    assert_eq!(config.actions.len(), 2);

    // AI toggles default on, learning stays off
    assert!(config.ai.enable_vision_analysis);
    assert!(config.ai.enable_test_generation);
    assert!(config.ai.smart_error_recovery);
    assert!(!config.ai.enable_learning);
    assert!((config.ai.confidence_threshold - 0.7).abs() < 1e-9);
    assert_eq!(config.ai.max_generated_tests, 20);
}

#[test]
fn action_specs_deserialize_by_type_tag() {
    let yaml = r##"
app_name: Tagged
actions:
  - type: fill
    selector: "#email"
    value: user@example.com
  - type: wait
    seconds: 2
  - type: screenshot
    path: out.png
"##;
    let config: RunConfig = serde_yaml::from_str(yaml).unwrap();

    assert!(matches!(&config.actions[0], ActionSpec::Fill { selector, value, .. }
        if selector == "#email" && value == "user@example.com"));
    assert!(matches!(&config.actions[1], ActionSpec::Wait { seconds: 2, .. }));
    assert!(matches!(&config.actions[2], ActionSpec::Screenshot { path, .. }
        if path == "out.png"));
}

#[test]
fn unknown_action_type_is_rejected() {
    let yaml = r#"
app_name: Bad
actions:
  - type: teleport
    destination: nowhere
"#;
    assert!(serde_yaml::from_str::<RunConfig>(yaml).is_err());
}

#[test]
fn config_directory_loads_sorted_by_app_name() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "z.yaml", "Zeta App");
    write_config(dir.path(), "a.yml", "Alpha App");
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let configs = load_run_configs(dir.path().to_str().unwrap()).unwrap();
    assert_eq!(configs.len(), 2);
    assert_eq!(configs[0].app_name, "Alpha App");
    assert_eq!(configs[1].app_name, "Zeta App");
}

// ============================================================================
// 2. analyze subcommand
// ============================================================================

#[test]
fn analyze_writes_error_reports() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("run.log");
    std::fs::write(
        &log,
        "Connection timeout occurred\n\nPage loaded successfully\n",
    )
    .unwrap();
    let out = dir.path().join("reports");

    let no_critical = cmd_analyze(log.to_str().unwrap(), out.to_str().unwrap(), 0).unwrap();
    assert!(no_critical);
    assert!(out.join("smart_error_report.md").exists());
    assert!(out.join("error_report.json").exists());
}

#[test]
fn analyze_signals_critical_errors() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("run.log");
    std::fs::write(&log, "authentication failed for test user\n").unwrap();
    let out = dir.path().join("reports");

    let no_critical = cmd_analyze(log.to_str().unwrap(), out.to_str().unwrap(), 0).unwrap();
    assert!(!no_critical);
}

// ============================================================================
// 3. generate subcommand
// ============================================================================

#[test]
fn generate_writes_generation_reports() {
    let dir = tempfile::tempdir().unwrap();
    let elements = vec![
        ElementInfo::new("textfield", "Email", 0.9, 100, 100),
        ElementInfo::new("button", "Submit", 0.95, 100, 200),
    ];
    let snapshot = dir.path().join("elements.json");
    std::fs::write(&snapshot, serde_json::to_string(&elements).unwrap()).unwrap();
    let out = dir.path().join("reports");

    cmd_generate(snapshot.to_str().unwrap(), "web", out.to_str().unwrap(), 0).unwrap();
    assert!(out.join("ai_test_generation_report.md").exists());
    assert!(out.join("generation_report.json").exists());
}

// ============================================================================
// 4. run subcommand
// ============================================================================

#[test]
fn run_with_mock_platform_writes_testing_reports() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "app.yaml", "Example App");
    let out = dir.path().join("reports");

    let all_clean = cmd_run(
        config.to_str().unwrap(),
        out.to_str().unwrap(),
        "mock",
        0,
        None,
    )
    .unwrap();

    assert!(all_clean);
    assert!(out.join("ai_enhanced_testing_report.md").exists());
    assert!(out.join("testing_report.json").exists());
    assert!(out.join("testing_report.yaml").exists());
    assert!(out.join("error_report.json").exists());
}
