//! Integration Test: Configuration Surface
//!
//! **Policy**: The application reads exactly one environment variable, the
//! API key, in exactly one place. No CLI parsing, no config files.

use architectural_enforcement::{find_violations, production_code};

#[test]
fn test_single_env_read() {
    let reads: Vec<_> = ["conductor/core/src", "tui/src"]
        .iter()
        .flat_map(|dir| find_violations(dir, &["env::var("]))
        .collect();

    assert_eq!(reads.len(), 1, "unexpected environment reads: {reads:#?}");
    assert!(
        reads[0].code.contains("API_KEY_ENV"),
        "environment read is not the API key: {}",
        reads[0]
    );
    assert!(reads[0].path.ends_with("conductor/core/src/config.rs"));
}

#[test]
fn test_no_cli_parsing() {
    let offenders: Vec<_> = production_code("tui/src")
        .into_iter()
        .chain(production_code("conductor/core/src"))
        .filter(|line| line.code.contains("env::args") || line.code.contains("clap::"))
        .collect();

    assert!(offenders.is_empty(), "CLI parsing found: {offenders:#?}");
}
