//! Integration tests for CLI behavior
//!
//! These tests verify the external behavior of the CLI tool against a small
//! chart project laid out in a temporary directory.

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;

const CHARTS_YML: &str = r#"
charts:
  - name: revenue
    type: line_multi
    data: data/revenue.csv
    output: site/charts/revenue.html
    params:
      x: year
      ys: [north, south]
      title: Revenue
  - name: orders
    type: bar_grouped
    data: data/orders.csv
    output: site/charts/orders.html
    params:
      x: quarter
      y: orders
      color: region
"#;

/// Helper to create a command for the chartsmith CLI
fn chartsmith_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_chartsmith"));
    cmd.current_dir(dir.path());
    cmd
}

/// Lays out a project with two charts and no config file.
fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    dir.child("docs/_data/charts.yml")
        .write_str(CHARTS_YML)
        .unwrap();
    dir.child("data/revenue.csv")
        .write_str("year,north,south\n2023,10,12\n2024,11,15\n")
        .unwrap();
    dir.child("data/orders.csv")
        .write_str("quarter,orders,region\nQ1,4,north\nQ1,6,south\nQ2,5,north\n")
        .unwrap();
    dir
}

mod help_command {
    use super::*;

    #[test]
    fn shows_help_with_flag() {
        chartsmith_cmd(&TempDir::new().unwrap())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"));
    }

    #[test]
    fn shows_version_with_flag() {
        chartsmith_cmd(&TempDir::new().unwrap())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}

mod build_command {
    use super::*;

    #[test]
    fn builds_all_charts_on_first_run() {
        let dir = project();

        chartsmith_cmd(&dir)
            .arg("build")
            .assert()
            .success()
            .stdout(predicate::str::contains("Built/updated: 2"))
            .stderr(predicate::str::contains("No config file found, using defaults"));

        dir.child("site/charts/revenue.html")
            .assert(predicate::str::contains("cdn.plot.ly"));
        dir.child("site/charts/orders.html")
            .assert(predicate::path::exists());
        dir.child(".cache/charts.json")
            .assert(predicate::str::contains("site/charts/revenue.html"));
    }

    #[test]
    fn skips_unchanged_charts_on_second_run() {
        let dir = project();
        chartsmith_cmd(&dir).arg("build").assert().success();

        chartsmith_cmd(&dir)
            .arg("build")
            .assert()
            .success()
            .stdout(predicate::str::contains("Cached (skipped): 2"))
            .stdout(predicate::str::contains("Built/updated: 0"));
    }

    #[test]
    fn rebuilds_deleted_artifact() {
        let dir = project();
        chartsmith_cmd(&dir).arg("build").assert().success();
        std::fs::remove_file(dir.path().join("site/charts/orders.html")).unwrap();

        chartsmith_cmd(&dir)
            .arg("build")
            .assert()
            .success()
            .stdout(predicate::str::contains("Built/updated: 1"))
            .stdout(predicate::str::contains("orders"));
    }

    #[test]
    fn force_rebuilds_everything() {
        let dir = project();
        chartsmith_cmd(&dir).arg("build").assert().success();

        chartsmith_cmd(&dir)
            .args(["build", "--force"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Built/updated: 2"));
    }

    #[test]
    fn no_cache_writes_no_store() {
        let dir = project();

        chartsmith_cmd(&dir)
            .args(["--no-cache", "build"])
            .assert()
            .success();

        dir.child(".cache/charts.json")
            .assert(predicate::path::missing());
    }

    #[test]
    fn corrupt_store_is_rebuilt() {
        let dir = project();
        dir.child(".cache/charts.json")
            .write_str("{ not json")
            .unwrap();

        chartsmith_cmd(&dir)
            .arg("build")
            .assert()
            .success()
            .stdout(predicate::str::contains("Built/updated: 2"))
            .stderr(predicate::str::contains("corrupted"));
    }

    #[test]
    fn failing_chart_does_not_stop_others() {
        let dir = project();
        dir.child("docs/_data/charts.yml")
            .write_str(&format!(
                "{}  - name: broken\n    type: pie\n    data: data/orders.csv\n    output: site/charts/broken.html\n",
                CHARTS_YML
            ))
            .unwrap();

        chartsmith_cmd(&dir)
            .arg("build")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Unknown chart type: pie"))
            .stdout(predicate::str::contains("Built/updated: 2"))
            .stdout(predicate::str::contains("Failed: 1"));

        dir.child("site/charts/broken.html")
            .assert(predicate::path::missing());
    }

    #[test]
    fn unparsable_spec_file_does_not_block_others() {
        let dir = project();
        dir.child(".chartsmith.json")
            .write_str(r#"{ "specs": ["docs/_data/*.yml"] }"#)
            .unwrap();
        dir.child("docs/_data/broken.yml")
            .write_str("charts: [\n")
            .unwrap();

        chartsmith_cmd(&dir)
            .arg("build")
            .assert()
            .success()
            .stdout(predicate::str::contains("Built/updated: 2"))
            .stderr(predicate::str::contains("Skipping spec file"));
    }

    #[test]
    fn missing_data_is_reported_as_warning_and_failure() {
        let dir = project();
        std::fs::remove_file(dir.path().join("data/orders.csv")).unwrap();

        chartsmith_cmd(&dir)
            .arg("build")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("warning: missing input data/orders.csv"))
            .stderr(predicate::str::contains("input not found"));
    }

    #[test]
    fn outputs_json_format() {
        let dir = project();

        let output = chartsmith_cmd(&dir)
            .args(["build", "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["summary"]["built"], 2);
        assert_eq!(report["results"][0]["name"], "revenue");
        assert_eq!(report["results"][0]["status"], "built");
        assert_eq!(report["results"][0]["reason"], "not cached");
        assert_eq!(report["interrupted"], false);
    }

    #[test]
    fn shows_performance_timings_when_requested() {
        let dir = project();

        chartsmith_cmd(&dir)
            .args(["build", "--timings"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Performance Timings"))
            .stdout(predicate::str::contains("revenue"));
    }
}

mod status_command {
    use super::*;

    #[test]
    fn reports_everything_stale_before_first_build() {
        let dir = project();

        chartsmith_cmd(&dir)
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("2 of 2 charts would be built"))
            .stdout(predicate::str::contains("not cached"));

        dir.child("site/charts/revenue.html")
            .assert(predicate::path::missing());
    }

    #[test]
    fn reports_changed_input_after_build() {
        let dir = project();
        chartsmith_cmd(&dir).arg("build").assert().success();

        let csv = dir.path().join("data/revenue.csv");
        let file = std::fs::File::options().write(true).open(&csv).unwrap();
        file.set_modified(std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(42))
            .unwrap();

        chartsmith_cmd(&dir)
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("1 of 2 charts would be built"))
            .stdout(predicate::str::contains("revenue (inputs changed)"));
    }
}

mod exit_codes {
    use super::*;

    #[test]
    fn exits_with_zero_on_success() {
        chartsmith_cmd(&project()).arg("build").assert().code(0);
    }

    #[test]
    fn exits_with_two_on_invalid_spec() {
        let dir = project();
        dir.child("docs/_data/charts.yml")
            .write_str("charts:\n  - name: a\n    type: line_multi\n")
            .unwrap();

        chartsmith_cmd(&dir)
            .arg("build")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("'output'"));
    }

    #[test]
    fn exits_with_two_on_duplicate_outputs() {
        let dir = project();
        dir.child("docs/_data/charts.yml")
            .write_str(
                "charts:\n  - name: a\n    type: line_multi\n    output: o.html\n  - name: b\n    type: line_multi\n    output: o.html\n",
            )
            .unwrap();

        chartsmith_cmd(&dir)
            .arg("build")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("o.html"));
    }
}
