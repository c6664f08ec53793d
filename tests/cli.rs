use assert_cmd::Command;
use std::fs;

fn pgtables() -> Command {
    Command::cargo_bin("pgtables").unwrap()
}

#[test]
fn test_help_lists_commands() {
    let output = pgtables().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["list", "show", "columns", "dump", "export", "create", "drop"] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
}

#[test]
fn test_missing_url_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "[defaults]\nschema = \"public\"\n").unwrap();

    let output = pgtables()
        .args(["--config", config.to_str().unwrap(), "list"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no connection URL"));
}

#[test]
fn test_bad_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "[connection\n").unwrap();

    let output = pgtables()
        .args(["--config", config.to_str().unwrap(), "list"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Configuration error"));
}

#[test]
fn test_unknown_command_fails() {
    pgtables().arg("frobnicate").assert().failure();
}
