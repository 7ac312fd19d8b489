//! Integration tests for the stackwatch binary.
//!
//! These tests run the compiled CLI against throwaway project trees and
//! check stdout, stderr, exit status and the resulting files.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Test Fixtures
// =============================================================================

const LOCALES_CONFIG: &str = "# Locales for the screenshot job\nlocales:\n      - en\n      - fr\n      - pt\n\nscheme: Focus\n";

const MANIFEST: &str = "---\nformat_version: '11'\ndefault_step_lib_source: https://github.com/bitrise-io/bitrise-steplib.git\nmeta:\n  bitrise.io:\n    stack: osx-xcode-13.2.x\n    machine_type_id: g2-m1.8core\nworkflows:\n  primary: {}\n";

fn stackwatch() -> Command {
    let mut cmd = Command::cargo_bin("stackwatch").unwrap();
    cmd.env_remove("STACKWATCH_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// Project with `en`, `es`, `fr` bundles and a config declaring `en`, `fr`, `pt`.
fn locale_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    for locale in ["en", "es", "fr"] {
        dir.child(format!("Blockzilla/{}.lproj", locale))
            .create_dir_all()
            .unwrap();
    }
    dir.child("Blockzilla/Info.plist").touch().unwrap();
    dir.child("l10n-screenshots-config.yml")
        .write_str(LOCALES_CONFIG)
        .unwrap();
    dir
}

async fn stack_server(stacks: &[&str]) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/all_stack_info"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "available_stacks": stacks })),
        )
        .mount(&server)
        .await;
    server
}

fn endpoint(server: &MockServer) -> String {
    format!("{}/all_stack_info", server.uri())
}

// =============================================================================
// General
// =============================================================================

#[test]
fn version_flag_works() {
    stackwatch()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stackwatch"));
}

#[test]
fn help_lists_commands() {
    stackwatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("stack"))
        .stdout(predicate::str::contains("locales"))
        .stdout(predicate::str::contains("list-locales"));
}

#[test]
fn completion_generates_script() {
    stackwatch()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stackwatch"));
}

// =============================================================================
// locales
// =============================================================================

#[test]
fn locales_reconciles_config() {
    let dir = locale_project();

    stackwatch()
        .arg("--cwd")
        .arg(dir.path())
        .arg("locales")
        .assert()
        .success()
        .stdout(predicate::str::contains("added es"))
        .stdout(predicate::str::contains("removed pt"));

    dir.child("l10n-screenshots-config.yml").assert(
        "# Locales for the screenshot job\nlocales:\n      - en\n      - es\n      - fr\n\nscheme: Focus\n",
    );
}

#[test]
fn locales_second_run_is_unchanged() {
    let dir = locale_project();

    stackwatch()
        .arg("--cwd")
        .arg(dir.path())
        .arg("locales")
        .assert()
        .success();
    let after_first = std::fs::read_to_string(dir.child("l10n-screenshots-config.yml").path())
        .unwrap();

    stackwatch()
        .arg("--cwd")
        .arg(dir.path())
        .args(["locales", "--detailed-exitcode"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("no change needed"));

    dir.child("l10n-screenshots-config.yml").assert(after_first.as_str());
}

#[test]
fn locales_detailed_exitcode_reports_update() {
    let dir = locale_project();

    stackwatch()
        .arg("--cwd")
        .arg(dir.path())
        .args(["locales", "--detailed-exitcode"])
        .assert()
        .code(2);
}

#[test]
fn locales_dry_run_writes_nothing() {
    let dir = locale_project();

    stackwatch()
        .arg("--cwd")
        .arg(dir.path())
        .args(["locales", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("would update"));

    dir.child("l10n-screenshots-config.yml").assert(LOCALES_CONFIG);
}

#[test]
fn locales_quiet_prints_nothing() {
    let dir = locale_project();

    stackwatch()
        .arg("--cwd")
        .arg(dir.path())
        .args(["-q", "locales"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn locales_missing_config_fails() {
    let dir = locale_project();
    std::fs::remove_file(dir.child("l10n-screenshots-config.yml").path()).unwrap();

    stackwatch()
        .arg("--cwd")
        .arg(dir.path())
        .arg("locales")
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("error:"))
        .stderr(predicate::str::contains("l10n-screenshots-config.yml"));
}

#[test]
fn locales_missing_key_fails_without_writing() {
    let dir = locale_project();
    let config = dir.child("l10n-screenshots-config.yml");
    config.write_str("languages:\n  - en\n").unwrap();

    stackwatch()
        .arg("--cwd")
        .arg(dir.path())
        .arg("locales")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("key 'locales' not found"));

    config.assert("languages:\n  - en\n");
}

#[test]
fn locales_flags_override_defaults() {
    let dir = TempDir::new().unwrap();
    dir.child("Resources/de.lproj").create_dir_all().unwrap();
    dir.child("Resources/it.lproj").create_dir_all().unwrap();
    dir.child("shots.yml").write_str("languages: []\n").unwrap();

    stackwatch()
        .arg("--cwd")
        .arg(dir.path())
        .args([
            "locales",
            "--root",
            "Resources",
            "--file",
            "shots.yml",
            "--key",
            "languages",
        ])
        .assert()
        .success();

    dir.child("shots.yml")
        .assert("languages:\n      - de\n      - it\n");
}

#[test]
fn locales_reads_tool_config() {
    let dir = TempDir::new().unwrap();
    dir.child("App/nl.lproj").create_dir_all().unwrap();
    dir.child("screens.yml").write_str("langs:\n  - fr\n").unwrap();
    dir.child(".stackwatch.toml")
        .write_str(
            "[locales]\nroot = \"App\"\nfile = \"screens.yml\"\nkey = \"langs\"\n\n[locales.indent]\nsequence = 4\noffset = 2\n",
        )
        .unwrap();

    stackwatch()
        .arg("--cwd")
        .arg(dir.path())
        .arg("locales")
        .assert()
        .success();

    dir.child("screens.yml").assert("langs:\n  - nl\n");
}

#[test]
fn invalid_tool_config_fails() {
    let dir = locale_project();
    dir.child(".stackwatch.toml")
        .write_str("[locales]\nunknown = true\n")
        .unwrap();

    stackwatch()
        .arg("--cwd")
        .arg(dir.path())
        .arg("locales")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(".stackwatch.toml"));

    dir.child("l10n-screenshots-config.yml").assert(LOCALES_CONFIG);
}

// =============================================================================
// list-locales
// =============================================================================

#[test]
fn list_locales_prints_sorted_lines() {
    let dir = locale_project();

    stackwatch()
        .arg("--cwd")
        .arg(dir.path())
        .arg("list-locales")
        .assert()
        .success()
        .stdout("en\nes\nfr\n");
}

#[test]
fn list_locales_json() {
    let dir = locale_project();

    stackwatch()
        .arg("--cwd")
        .arg(dir.path())
        .args(["list-locales", "--json"])
        .assert()
        .success()
        .stdout("[\"en\",\"es\",\"fr\"]\n");
}

#[test]
fn list_locales_missing_root_fails() {
    let dir = TempDir::new().unwrap();

    stackwatch()
        .arg("--cwd")
        .arg(dir.path())
        .arg("list-locales")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Blockzilla"));
}

// =============================================================================
// stack
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn stack_updates_manifest_and_artifact() {
    let server = stack_server(&["osx-xcode-14.1.x", "osx-xcode-13.2.x", "osx-xcode-14.0.1"]).await;
    let dir = TempDir::new().unwrap();
    dir.child("bitrise.yml").write_str(MANIFEST).unwrap();

    stackwatch()
        .arg("--cwd")
        .arg(dir.path())
        .args(["stack", "--endpoint", &endpoint(&server)])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "updated osx-xcode-13.2.x → osx-xcode-14.1.x",
        ));

    dir.child("bitrise.yml")
        .assert(MANIFEST.replace("osx-xcode-13.2.x", "osx-xcode-14.1.x").as_str());
    dir.child("github-actions-scripts/newest_xcode.txt")
        .assert("osx-xcode-14.1.x\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn stack_unchanged_writes_nothing() {
    let server = stack_server(&["osx-xcode-13.2.x", "osx-xcode-13.1.x"]).await;
    let dir = TempDir::new().unwrap();
    dir.child("bitrise.yml").write_str(MANIFEST).unwrap();

    stackwatch()
        .arg("--cwd")
        .arg(dir.path())
        .args(["stack", "--detailed-exitcode", "--endpoint", &endpoint(&server)])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("no change needed"));

    dir.child("bitrise.yml").assert(MANIFEST);
    dir.child("github-actions-scripts/newest_xcode.txt")
        .assert(predicate::path::missing());
}

#[tokio::test(flavor = "multi_thread")]
async fn stack_detailed_exitcode_reports_update() {
    let server = stack_server(&["osx-xcode-14.1.x"]).await;
    let dir = TempDir::new().unwrap();
    dir.child("bitrise.yml").write_str(MANIFEST).unwrap();

    stackwatch()
        .arg("--cwd")
        .arg(dir.path())
        .args(["stack", "--detailed-exitcode", "--endpoint", &endpoint(&server)])
        .assert()
        .code(2);
}

#[tokio::test(flavor = "multi_thread")]
async fn stack_dry_run_writes_nothing() {
    let server = stack_server(&["osx-xcode-14.1.x"]).await;
    let dir = TempDir::new().unwrap();
    dir.child("bitrise.yml").write_str(MANIFEST).unwrap();

    stackwatch()
        .arg("--cwd")
        .arg(dir.path())
        .args(["stack", "--dry-run", "--endpoint", &endpoint(&server)])
        .assert()
        .success()
        .stdout(predicate::str::contains("would update"));

    dir.child("bitrise.yml").assert(MANIFEST);
    dir.child("github-actions-scripts/newest_xcode.txt")
        .assert(predicate::path::missing());
}

#[tokio::test(flavor = "multi_thread")]
async fn stack_without_candidates_fails() {
    let server = stack_server(&["linux-docker-android-20.04", "osx-xcode-14.0.1"]).await;
    let dir = TempDir::new().unwrap();
    dir.child("bitrise.yml").write_str(MANIFEST).unwrap();

    stackwatch()
        .arg("--cwd")
        .arg(dir.path())
        .args(["stack", "--endpoint", &endpoint(&server)])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no stack matching"));

    dir.child("bitrise.yml").assert(MANIFEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn stack_server_error_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    dir.child("bitrise.yml").write_str(MANIFEST).unwrap();

    stackwatch()
        .arg("--cwd")
        .arg(dir.path())
        .args(["stack", "--endpoint", &endpoint(&server)])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("source unavailable"));

    dir.child("bitrise.yml").assert(MANIFEST);
}

#[test]
fn stack_rejects_non_http_endpoint() {
    let dir = TempDir::new().unwrap();
    dir.child("bitrise.yml").write_str(MANIFEST).unwrap();

    stackwatch()
        .arg("--cwd")
        .arg(dir.path())
        .args(["stack", "--endpoint", "ftp://example.com/stacks"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("error:"));
}
