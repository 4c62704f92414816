//! Integration Test: Core Crate Boundaries
//!
//! **Policy**: `a2ui/core` is a headless library. It performs no I/O of its
//! own, never blocks a thread, reports through `tracing` only, and depends
//! on no UI framework or network client.
//! **Exceptions**: code after `#[cfg(test)]` in a file, and comments.

use std::fs;
use std::path::{Path, PathBuf};

use architectural_enforcement::workspace_root;

/// Crates the core must never depend on
const FORBIDDEN_DEPENDENCIES: &[&str] = &[
    "ratatui",
    "crossterm",
    "reqwest",
    "hyper",
    "axum",
    "tokio-tungstenite",
    "tungstenite",
];

fn core_src() -> PathBuf {
    workspace_root().join("a2ui").join("core").join("src")
}

/// Scan production lines of every `.rs` file under `dir`
///
/// Stops at the first `#[cfg(test)]` in each file and ignores comments.
fn find_violations(dir: &Path, is_violation: impl Fn(&str) -> bool) -> Vec<String> {
    let mut violations = Vec::new();

    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("rs") {
            continue;
        }
        let Ok(content) = fs::read_to_string(entry.path()) else {
            continue;
        };

        for (idx, line) in content.lines().enumerate() {
            if line.trim_start().starts_with("#[cfg(test)]") {
                break;
            }
            let code_part = line.split("//").next().unwrap_or(line);
            if is_violation(code_part) {
                violations.push(format!(
                    "{}:{}: {}",
                    entry.path().display(),
                    idx + 1,
                    line.trim()
                ));
            }
        }
    }

    violations
}

fn report(kind: &str, violations: &[String]) {
    if violations.is_empty() {
        return;
    }
    eprintln!("\n❌ {kind} found in a2ui/core production code:\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    panic!(
        "\nFound {} {kind} violation(s).\nFix these before merging!",
        violations.len()
    );
}

#[test]
fn test_core_source_present() {
    assert!(
        core_src().join("lib.rs").exists(),
        "expected core sources at {}",
        core_src().display()
    );
}

#[test]
fn test_no_sleep_in_core() {
    let violations = find_violations(&core_src(), |code| {
        code.contains("::sleep(") || code.contains(".sleep(")
    });
    report("Sleep calls", &violations);
}

#[test]
fn test_no_direct_output_in_core() {
    let violations = find_violations(&core_src(), |code| {
        ["println!", "eprintln!", "print!(", "eprint!(", "dbg!("]
            .iter()
            .any(|pattern| code.contains(pattern))
    });
    report("Direct stdout/stderr writes", &violations);
}

#[test]
fn test_no_unwrap_in_core() {
    let violations = find_violations(&core_src(), |code| {
        code.contains(".unwrap()") || code.contains(".expect(")
    });
    report("unwrap()/expect() calls", &violations);
}

#[test]
fn test_no_blocking_fs_in_core() {
    let violations = find_violations(&core_src(), |code| code.contains("std::fs::"));
    // config.rs reads its file once, before the engine starts
    let violations: Vec<String> = violations
        .into_iter()
        .filter(|v| !v.contains("config.rs"))
        .collect();
    report("Blocking filesystem calls", &violations);
}

#[test]
fn test_core_has_no_ui_or_network_dependencies() {
    let manifest = workspace_root().join("a2ui").join("core").join("Cargo.toml");
    let content = fs::read_to_string(&manifest).expect("core manifest should be readable");

    let violations: Vec<String> = content
        .lines()
        .map(|line| line.split('#').next().unwrap_or(line).trim())
        .filter_map(|line| {
            let name = line.split('=').next()?.trim();
            FORBIDDEN_DEPENDENCIES
                .contains(&name)
                .then(|| format!("{}: {name}", manifest.display()))
        })
        .collect();
    report("UI/network dependencies", &violations);
}
