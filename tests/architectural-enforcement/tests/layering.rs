//! Integration Test: Layering
//!
//! **Policy**: The conductor core is headless. Terminal and image crates
//! belong to the TUI surface only.

use std::fs;

use architectural_enforcement::{find_violations, workspace_root};

const SURFACE_CRATES: &[&str] = &["ratatui", "crossterm", "image"];

#[test]
fn test_core_manifest_has_no_surface_crates() {
    let manifest = fs::read_to_string(workspace_root().join("conductor/core/Cargo.toml"))
        .expect("core manifest");

    let offenders: Vec<&str> = SURFACE_CRATES
        .iter()
        .copied()
        .filter(|name| {
            manifest
                .lines()
                .any(|line| line.trim_start().starts_with(&format!("{name} =")))
        })
        .collect();

    assert!(
        offenders.is_empty(),
        "conductor/core depends on surface crates: {offenders:?}"
    );
}

#[test]
fn test_core_sources_do_not_use_surface_crates() {
    let violations = find_violations("conductor/core/src", &["ratatui::", "crossterm::"]);

    for violation in &violations {
        eprintln!("  {violation}");
    }
    assert!(violations.is_empty(), "terminal code found in conductor/core");
}

#[test]
fn test_tui_talks_to_core_through_client() {
    // Provider traffic is the Conductor's job
    let violations = find_violations("tui/src", &["reqwest", "PoetryDbSource::new", "GeminiBackend::new"]);

    for violation in &violations {
        eprintln!("  {violation}");
    }
    assert!(violations.is_empty(), "TUI bypasses the Conductor");
}
