//! End-to-end tests for the sizemap binary.

use std::fs;
use std::path::Path;
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

fn run_sizemap(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = env!("CARGO_BIN_EXE_sizemap");
    let output = Command::new(binary)
        .args(args)
        .current_dir(dir)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to run sizemap");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// root: a (100), .hidden (50), b/c (200)
fn scenario() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("root");
    fs::create_dir_all(root.join("b")).unwrap();
    fs::write(root.join("a"), vec![0u8; 100]).unwrap();
    fs::write(root.join(".hidden"), vec![0u8; 50]).unwrap();
    fs::write(root.join("b/c"), vec![0u8; 200]).unwrap();
    #[cfg(unix)]
    std::os::unix::fs::symlink(temp.path(), root.join("b/d")).unwrap();
    temp
}

#[test]
fn test_writes_report() {
    let temp = scenario();
    let (stdout, _stderr, success) = run_sizemap(
        temp.path(),
        &["--path", "root", "--output", "report.json", "--estimator", "walk"],
    );
    assert!(success, "sizemap should succeed");
    assert!(stdout.contains("Max depth: 3"));
    assert!(stdout.contains("Report written to: report.json"));
    assert!(stdout.contains("Done!"));

    let report: Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("report.json")).unwrap())
            .unwrap();
    assert_eq!(report["name"], "root");
    assert_eq!(report["type"], "dir");
    assert_eq!(report["size"], 300);

    let children = report["children"].as_array().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0]["name"], "b");
    assert_eq!(children[0]["size"], 200);
    assert_eq!(children[0]["children"].as_array().unwrap().len(), 1);
    assert_eq!(children[1]["name"], "a");
    assert!(children[1].get("children").is_none());
}

#[test]
fn test_depth_zero_reports_estimate_only() {
    let temp = scenario();
    let (_stdout, _stderr, success) = run_sizemap(
        temp.path(),
        &["--path", "root", "--depth", "0", "--estimator", "walk"],
    );
    assert!(success);

    let report: Value = serde_json::from_str(
        &fs::read_to_string(temp.path().join("disk-report.json")).unwrap(),
    )
    .unwrap();
    // The manual walk counts hidden files too.
    assert_eq!(report["size"], 350);
    assert_eq!(report["children"], serde_json::json!([]));
}

#[test]
fn test_missing_path_fails_without_report() {
    let temp = TempDir::new().unwrap();
    let (_stdout, stderr, success) = run_sizemap(
        temp.path(),
        &["--path", "does-not-exist", "--output", "report.json"],
    );
    assert!(!success, "missing root must fail");
    assert!(stderr.contains("Path does not exist"), "stderr: {stderr}");
    assert!(!temp.path().join("report.json").exists());
}

#[test]
fn test_shortcuts_generated() {
    let temp = scenario();
    let (stdout, _stderr, success) = run_sizemap(
        temp.path(),
        &[
            "--path",
            "root",
            "--estimator",
            "walk",
            "--shortcuts",
            "2",
            "--shortcuts-dir",
            "links",
            "--shortcut-format",
            "desktop",
        ],
    );
    assert!(success);
    assert!(stdout.contains("Created 2 shortcuts in links/"));

    let names = |sub: &str| -> Vec<String> {
        fs::read_dir(temp.path().join("links").join(sub))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    };
    let mut folders = names("folders");
    folders.sort();
    // b and b/c tie at 200 bytes; b comes first in pre-order.
    assert_eq!(folders, vec!["001_0MB_root.desktop", "002_0MB_b.desktop"]);
    assert!(names("files").is_empty());
}
