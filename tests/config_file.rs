//! Integration tests for configuration files
//!
//! Covers the `flashai config` template and the error context attached to
//! each phase of `Config::from_file`.

use flashai::cli::generate_config_template;
use flashai::config::Config;
use flashai::error::AppError;
use std::fs;
use tempfile::TempDir;

fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

// ─────────────────────────────────────────────────────────────────────────────
// Template
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_generated_template_creates_valid_config_file() {
    let temp_dir = create_temp_dir();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, generate_config_template()).expect("Failed to write template");

    let config =
        Config::from_file(&config_path).expect("Generated template should load as valid Config");

    assert_eq!(config.provider.model, "gpt-4o-mini");
    assert_eq!(config.provider.api_key_env, "OPENAI_API_KEY");
    assert_eq!(config.provider.max_tokens, 800);
    assert_eq!(config.provider.timeout_ms, 15_000);
    assert_eq!(config.limits.min_chars, 50);
    assert_eq!(config.limits.max_chars, 8000);
    assert_eq!(config.client.debounce_ms, 800);
}

#[test]
fn test_template_has_all_sections() {
    let template = generate_config_template();
    for section in [
        "[server]",
        "[provider]",
        "[limits]",
        "[client]",
        "[observability]",
    ] {
        assert!(template.contains(section), "Missing {}", section);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Error context
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_missing_file_reports_path() {
    let temp_dir = create_temp_dir();
    let config_path = temp_dir.path().join("absent.toml");

    let err = Config::from_file(&config_path).unwrap_err();

    assert!(matches!(err, AppError::ConfigFileRead { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_invalid_toml_reports_parse_failure() {
    let temp_dir = create_temp_dir();
    let config_path = temp_dir.path().join("broken.toml");
    fs::write(&config_path, "[server\nhost = ").unwrap();

    let err = Config::from_file(&config_path).unwrap_err();

    assert!(matches!(err, AppError::ConfigParseFailed { .. }));
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn test_semantic_error_reports_validation_failure() {
    let temp_dir = create_temp_dir();
    let config_path = temp_dir.path().join("inverted.toml");
    fs::write(
        &config_path,
        r#"
[server]
host = "127.0.0.1"
port = 3000

[limits]
min_chars = 500
max_chars = 100
"#,
    )
    .unwrap();

    let err = Config::from_file(&config_path).unwrap_err();

    match err {
        AppError::ConfigValidationFailed { path, reason } => {
            assert!(path.contains("inverted.toml"));
            assert!(reason.contains("min_chars"));
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}
