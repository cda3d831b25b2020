//! Smoke tests for the cmslayout binary.
//!
//! Each test writes a config that points logging at a temp file, then runs one
//! subcommand against the fixture site.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

const SITE_FIXTURE: &str = "tests/fixtures/site.toml";

/// Config file routing logs under the temp dir; unique per test name.
fn temp_config(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cmslayout_cli_{name}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let config = dir.join("config.toml");
    let log = dir.join("cmslayout.log");
    fs::write(
        &config,
        format!("log_file_path = {:?}\n", log.to_string_lossy()),
    )
    .expect("write config");
    config
}

fn run(name: &str, args: &[&str]) -> Output {
    let config = temp_config(name);
    Command::new(env!("CARGO_BIN_EXE_cmslayout"))
        .arg("--site")
        .arg(SITE_FIXTURE)
        .arg("--config")
        .arg(&config)
        .args(args)
        .output()
        .expect("Failed to execute binary")
}

#[test]
fn content_prints_merged_chain() {
    let output = run("content", &["content", "blog_post"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim_end(),
        "<html><body><main><article>{{ cms:page:content:text }}</article></main></body></html>"
    );
}

#[test]
fn tree_prints_indented_labels() {
    let output = run("tree", &["tree", "--exclude", "blog"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim_end(),
        "Default\n. . Landing Page\nPlain"
    );
}

#[test]
fn unknown_layout_exits_with_error() {
    let output = run("unknown", &["head", "missing"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown layout 'missing'"));
}

#[test]
fn missing_site_file_exits_with_error() {
    let config = temp_config("missing_site");
    let output = Command::new(env!("CARGO_BIN_EXE_cmslayout"))
        .args(["--site", "/nonexistent/site.toml", "--config"])
        .arg(&config)
        .arg("tree")
        .output()
        .expect("Failed to execute binary");
    assert!(!output.status.success());
}
