//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - The conductor core stays headless (no terminal crates)
//! - No sleeping or blocking I/O in production code
//! - The only environment input is the API key
//!
//! The helpers here walk the workspace sources and hand back production
//! lines only: comments are stripped and everything from a `#[cfg(test)]`
//! attribute to the end of the file is skipped.

use std::fs;
use std::path::{Path, PathBuf};

/// A production source line
#[derive(Debug, Clone)]
pub struct SourceLine {
    pub path: PathBuf,
    pub number: usize,
    pub code: String,
}

impl std::fmt::Display for SourceLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.number, self.code.trim())
    }
}

/// Workspace root, resolved from this crate's manifest directory
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// Every `.rs` file under `dir` (relative to the workspace root)
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let root = workspace_root().join(dir);
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.into_path())
        .collect()
}

/// Production lines of one file
pub fn production_lines(path: &Path) -> Vec<SourceLine> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };

    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .filter_map(|(idx, line)| {
            let code = strip_comment(line);
            (!code.trim().is_empty()).then(|| SourceLine {
                path: path.to_path_buf(),
                number: idx + 1,
                code: code.to_string(),
            })
        })
        .collect()
}

/// Production lines of every file under `dir`
pub fn production_code(dir: &str) -> Vec<SourceLine> {
    rust_files(dir)
        .iter()
        .flat_map(|p| production_lines(p))
        .collect()
}

/// Production lines under `dir` containing any of `needles`
pub fn find_violations(dir: &str, needles: &[&str]) -> Vec<SourceLine> {
    production_code(dir)
        .into_iter()
        .filter(|line| needles.iter().any(|n| line.code.contains(n)))
        .collect()
}

fn strip_comment(line: &str) -> &str {
    let trimmed = line.trim_start();
    if trimmed.starts_with("//") {
        return "";
    }
    // Good enough for this codebase: no "//" inside string literals in production code
    match line.find("//") {
        Some(idx) if !line[..idx].contains('"') => &line[..idx],
        _ => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("    // only a comment"), "");
        assert_eq!(strip_comment("let x = 1; // trailing"), "let x = 1; ");
        assert_eq!(
            strip_comment(r#"let url = "https://poetrydb.org";"#),
            r#"let url = "https://poetrydb.org";"#
        );
    }

    #[test]
    fn test_workspace_root_has_members() {
        let root = workspace_root();
        assert!(root.join("conductor/core/Cargo.toml").exists());
        assert!(root.join("tui/Cargo.toml").exists());
    }
}
