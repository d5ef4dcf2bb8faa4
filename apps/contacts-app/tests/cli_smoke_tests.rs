//! CLI smoke tests for the contacts-app binary.
//!
//! None of these reach the contact services: they cover argument parsing,
//! configuration loading and the `check` command.

use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn run_contacts_app(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_contacts-app"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute contacts-app")
}

/// Write a config whose home dir (and therefore log files) live in `dir`.
fn write_config(dir: &Path, modules: &str) -> String {
    let path = dir.join("config.yaml");
    let yaml = format!(
        r#"
app:
  home_dir: "{home}"

logging:
  default:
    console_level: "off"
    file: "logs/contacts.log"
    file_level: debug

{modules}
"#,
        home = dir.join("home").to_string_lossy().replace('\\', "/"),
    );
    std::fs::write(&path, yaml).expect("Failed to write config file");
    path.to_string_lossy().to_string()
}

#[test]
fn test_cli_help_command() {
    let output = run_contacts_app(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("list"), "Should contain 'list' subcommand");
    assert!(stdout.contains("add"), "Should contain 'add' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
}

#[test]
fn test_cli_add_help_lists_form_fields() {
    let output = run_contacts_app(&["add", "--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--first-name", "--last-name", "--phone", "--image"] {
        assert!(stdout.contains(flag), "missing {flag} in: {stdout}");
    }
}

#[test]
fn test_cli_version_command() {
    let output = run_contacts_app(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("contacts-app"), "Should contain binary name");
    assert!(stdout.chars().any(|c| c.is_ascii_digit()));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_contacts_app(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "unexpected stderr: {stderr}");
}

#[test]
fn test_cli_missing_config_file() {
    let output = run_contacts_app(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success(), "Should fail with missing config");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config file not found"), "stderr: {stderr}");
}

#[test]
fn test_cli_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed").unwrap();

    let output = run_contacts_app(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");
}

#[test]
fn test_cli_check_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(
        temp_dir.path(),
        r#"modules:
  contacts:
    list_url: "http://127.0.0.1:9/contacts"
    upload_url: "http://127.0.0.1:9/contacts/upload"
    timeout_ms: 500"#,
    );

    let output = run_contacts_app(&["--config", &config, "check"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "check failed: {stderr}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration check passed"));
    assert!(stdout.contains("http://127.0.0.1:9/contacts/upload"));
}

#[test]
fn test_cli_check_rejects_non_http_endpoint() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(
        temp_dir.path(),
        r#"modules:
  contacts:
    list_url: "ftp://127.0.0.1/contacts""#,
    );

    let output = run_contacts_app(&["--config", &config, "check"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported scheme"), "stderr: {stderr}");
}

#[test]
fn test_cli_check_rejects_unknown_module_key() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(
        temp_dir.path(),
        r#"modules:
  contacts:
    listurl: "http://127.0.0.1/contacts""#,
    );

    let output = run_contacts_app(&["--config", &config, "check"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid contacts config"), "stderr: {stderr}");
}

#[test]
fn test_cli_print_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(
        temp_dir.path(),
        r#"modules:
  contacts:
    timeout_ms: 1234"#,
    );

    let output = run_contacts_app(&["--config", &config, "--print-config"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("home_dir"));
    assert!(stdout.contains("timeout_ms: 1234"));
}
