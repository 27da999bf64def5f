//! Integration tests for CLI commands
//!
//! Tests for init, clean, and config file handling.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a command for the chartsmith CLI
fn chartsmith_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_chartsmith"))
}

/// Writes a one-chart project rooted at `dir`.
fn write_project(dir: &std::path::Path) {
    fs::create_dir_all(dir.join("charts")).unwrap();
    fs::write(
        dir.join("charts/main.yml"),
        "charts:\n  - name: trend\n    type: scatter_trend\n    data: trend.csv\n    output: out/trend.html\n    params: { x: x, y: y }\n",
    )
    .unwrap();
    fs::write(dir.join("trend.csv"), "x,y\n1,2\n2,4\n3,7\n").unwrap();
}

mod init_command {
    use super::*;

    #[test]
    fn creates_new_config_file() {
        let temp_dir = TempDir::new().unwrap();

        chartsmith_cmd()
            .current_dir(temp_dir.path())
            .arg("init")
            .assert()
            .success()
            .stderr(predicate::str::contains("Created .chartsmith.jsonc"));

        let config_path = temp_dir.path().join(".chartsmith.jsonc");
        assert!(config_path.exists());

        let content = fs::read_to_string(config_path).unwrap();
        assert!(content.contains("specs"));
        assert!(content.contains("cache_dir"));
        assert!(content.contains("theme"));
    }

    #[test]
    fn fails_when_config_exists_without_force() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(".chartsmith.jsonc");

        fs::write(&config_path, "{}").unwrap();

        chartsmith_cmd()
            .current_dir(temp_dir.path())
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn overwrites_config_with_force() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(".chartsmith.jsonc");

        fs::write(&config_path, r#"{"custom": "data"}"#).unwrap();

        chartsmith_cmd()
            .current_dir(temp_dir.path())
            .arg("init")
            .arg("--force")
            .assert()
            .success();

        let content = fs::read_to_string(config_path).unwrap();
        assert!(!content.contains("custom"));
        assert!(content.contains("specs"));
    }
}

mod clean_command {
    use super::*;

    #[test]
    fn removes_cache_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = temp_dir.path().join(".cache/charts.json");
        fs::create_dir_all(store.parent().unwrap()).unwrap();
        fs::write(&store, "{}").unwrap();

        chartsmith_cmd()
            .current_dir(temp_dir.path())
            .arg("clean")
            .assert()
            .success()
            .stderr(predicate::str::contains("Removed"));

        assert!(!store.exists());
    }

    #[test]
    fn succeeds_without_cache_store() {
        let temp_dir = TempDir::new().unwrap();

        chartsmith_cmd()
            .current_dir(temp_dir.path())
            .arg("clean")
            .assert()
            .success()
            .stderr(predicate::str::contains("No cache store"));
    }

    #[test]
    fn next_build_renders_everything() {
        let temp_dir = TempDir::new().unwrap();
        write_project(temp_dir.path());
        fs::write(
            temp_dir.path().join(".chartsmith.json"),
            r#"{ "specs": ["charts/*.yml"] }"#,
        )
        .unwrap();

        chartsmith_cmd()
            .current_dir(temp_dir.path())
            .arg("build")
            .assert()
            .success();
        chartsmith_cmd()
            .current_dir(temp_dir.path())
            .arg("clean")
            .assert()
            .success();

        chartsmith_cmd()
            .current_dir(temp_dir.path())
            .arg("build")
            .assert()
            .success()
            .stdout(predicate::str::contains("Built/updated: 1"));
    }
}

mod config_file_handling {
    use super::*;

    #[test]
    fn discovers_config_in_working_directory() {
        let temp_dir = TempDir::new().unwrap();
        write_project(temp_dir.path());
        fs::write(
            temp_dir.path().join(".chartsmith.jsonc"),
            r#"{
                // glob over every spec file
                "specs": ["charts/*.yml"],
                "cache_dir": "build-cache"
            }"#,
        )
        .unwrap();

        chartsmith_cmd()
            .current_dir(temp_dir.path())
            .arg("build")
            .assert()
            .success()
            .stderr(predicate::str::contains("Using config"))
            .stdout(predicate::str::contains("Built/updated: 1"));

        assert!(temp_dir.path().join("build-cache/charts.json").exists());
        assert!(temp_dir.path().join("out/trend.html").exists());
    }

    #[test]
    fn loads_config_from_flag_relative_to_its_directory() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("project");
        write_project(&project);
        let config_file = project.join("custom.json");
        fs::write(&config_file, r#"{ "specs": ["charts/main.yml"] }"#).unwrap();

        chartsmith_cmd()
            .current_dir(temp_dir.path())
            .arg("--config")
            .arg(&config_file)
            .arg("build")
            .assert()
            .success();

        assert!(project.join("out/trend.html").exists());
        assert!(project.join(".cache/charts.json").exists());
    }

    #[test]
    fn fails_on_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("invalid.json");

        fs::write(&config_file, "invalid json").unwrap();

        chartsmith_cmd()
            .arg("--config")
            .arg(&config_file)
            .arg("build")
            .assert()
            .code(2);
    }

    #[test]
    fn rejects_unknown_config_keys() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("typo.json");

        fs::write(&config_file, r#"{ "spec": ["charts.yml"] }"#).unwrap();

        chartsmith_cmd()
            .arg("--config")
            .arg(&config_file)
            .arg("build")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("validation failed"));
    }

    #[test]
    fn reports_zero_charts_for_missing_spec_file() {
        let temp_dir = TempDir::new().unwrap();

        chartsmith_cmd()
            .current_dir(temp_dir.path())
            .arg("build")
            .assert()
            .success()
            .stdout(predicate::str::contains("Total charts: 0"))
            .stderr(predicate::str::contains("Spec file not found"));
    }
}

mod verbose_output {
    use super::*;

    #[test]
    fn logs_fingerprints_when_verbose() {
        let temp_dir = TempDir::new().unwrap();
        write_project(temp_dir.path());

        chartsmith_cmd()
            .current_dir(temp_dir.path())
            .args(["--verbose", "build"])
            .assert()
            .success()
            .stderr(predicate::str::contains("Fingerprint for"));
    }
}
