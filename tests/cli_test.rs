// Command-line tests for the gopages binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixtures_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn gopages() -> Command {
    Command::cargo_bin("gopages").unwrap()
}

#[test]
fn test_help() {
    gopages()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"));
}

#[test]
fn test_version_flag() {
    gopages()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_generate_from_flags() {
    let out = TempDir::new().unwrap();
    let site = out.path().join("site");

    gopages()
        .args(["generate", "--import-path", "github.com/acme/demo", "--input"])
        .arg(fixtures_path("demo_module"))
        .arg("--output")
        .arg(&site)
        .args(["--repository", "https://github.com/acme/demo", "--doc-version", "v1.4.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 2 package pages"));

    assert!(site.join("index.html").exists());
    assert!(site.join("style.css").exists());
    assert!(site.join("sub/index.html").exists());
}

#[test]
fn test_generate_from_json_config() {
    let dir = TempDir::new().unwrap();
    let site = dir.path().join("site");
    let config = dir.path().join("gopages.json");
    let json = serde_json::json!({
        "import_path": "github.com/acme/demo",
        "input": fixtures_path("demo_module"),
        "output": site,
        "repository": "https://github.com/acme/demo",
        "version": "v1.4.0",
    });
    fs::write(&config, json.to_string()).unwrap();

    gopages()
        .arg("generate")
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    assert!(site.join("index.html").exists());
}

#[test]
fn test_output_directory_is_replaced() {
    let dir = TempDir::new().unwrap();
    let site = dir.path().join("site");
    fs::create_dir_all(site.join("stale")).unwrap();
    fs::write(site.join("stale/index.html"), "old").unwrap();

    gopages()
        .args(["generate", "--import-path", "github.com/acme/demo", "--input"])
        .arg(fixtures_path("demo_module"))
        .arg("--output")
        .arg(&site)
        .args(["--repository", "https://github.com/acme/demo", "--doc-version", "v1"])
        .assert()
        .success();

    assert!(!site.join("stale").exists());
    assert!(site.join("index.html").exists());
}

#[test]
fn test_missing_field_is_reported() {
    let out = TempDir::new().unwrap();

    gopages()
        .args(["generate", "--import-path", "github.com/acme/demo", "--input"])
        .arg(fixtures_path("demo_module"))
        .arg("--output")
        .arg(out.path().join("site"))
        .args(["--repository", "https://github.com/acme/demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required field 'version'"));
}

#[test]
fn test_missing_config_file() {
    gopages()
        .args(["generate", "--config", "/nonexistent/gopages.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path not found"));
}

#[test]
fn test_nonexistent_input() {
    let out = TempDir::new().unwrap();

    gopages()
        .args([
            "generate",
            "--import-path", "github.com/acme/demo",
            "--input", "/nonexistent/gopages/src",
            "--repository", "https://github.com/acme/demo",
            "--doc-version", "v1",
            "--output",
        ])
        .arg(out.path().join("site"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
