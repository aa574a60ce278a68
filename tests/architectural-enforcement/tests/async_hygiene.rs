//! Integration Test: Async Hygiene
//!
//! **Policy**: Production code in the TUI and the conductor MUST NOT sleep a
//! thread or use blocking I/O. Provider calls run on the tokio runtime and
//! surfaces poll them once per frame.

use architectural_enforcement::{find_violations, SourceLine};

const PRODUCTION_DIRS: &[&str] = &["conductor/core/src", "tui/src"];

fn scan(needles: &[&str]) -> Vec<SourceLine> {
    PRODUCTION_DIRS
        .iter()
        .flat_map(|dir| find_violations(dir, needles))
        .collect()
}

fn report(title: &str, violations: &[SourceLine]) {
    if violations.is_empty() {
        return;
    }
    eprintln!("\n{title}");
    for violation in violations {
        eprintln!("  {violation}");
    }
    panic!("Found {} violation(s) in production code", violations.len());
}

#[test]
fn test_no_thread_sleep() {
    let violations = scan(&["std::thread::sleep", "thread::sleep("]);
    report("Thread sleep found (use tokio::time::sleep):", &violations);
}

#[test]
fn test_no_blocking_io() {
    let violations = scan(&["std::fs::", "use std::fs", "std::net::", "reqwest::blocking"]);
    report("Blocking I/O found:", &violations);
}

#[test]
fn test_no_block_on() {
    let violations = scan(&["block_on(", "block_in_place("]);
    report("Blocking executor calls found:", &violations);
}
