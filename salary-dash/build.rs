//! Build script for salary-dash
//!
//! Exports the build identification logged at startup. Packagers building
//! outside a git checkout can pin the hash with `SALARY_DASH_GIT_HASH`.

use std::process::Command;

const GIT_HASH_OVERRIDE: &str = "SALARY_DASH_GIT_HASH";

/// Run git and return its trimmed stdout on success
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}

fn git_hash() -> String {
    if let Ok(pinned) = std::env::var(GIT_HASH_OVERRIDE) {
        if !pinned.trim().is_empty() {
            return pinned.trim().to_string();
        }
    }

    let Some(hash) = git(&["rev-parse", "--short=8", "HEAD"]) else {
        return "unknown".to_string();
    };
    match git(&["status", "--porcelain", "--untracked-files=no"]) {
        Some(changes) if !changes.is_empty() => format!("{}-dirty", hash),
        _ => hash,
    }
}

fn main() {
    let build_timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=GIT_HASH={}", git_hash());
    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", build_timestamp);
    println!("cargo:rustc-env=BUILD_PROFILE={}", profile);
}
