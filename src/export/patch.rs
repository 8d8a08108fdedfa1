//! Patch synthesis through an ephemeral git repository.
//!
//! The diff itself comes from git, not from an in-process algorithm: the
//! selected files are copied into a throwaway directory, staged in a fresh
//! repository there, and `git diff --cached` against the empty index state
//! is the patch content.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{AppError, Result};

/// Run a git subcommand inside `dir`, returning captured stdout.
///
/// A non-zero exit on any step aborts the patch operation with the step's
/// stderr attached.
fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let out = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| AppError::tool_spawn("git", &e))?;
    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        return Err(AppError::Tool {
            tool: "git",
            message: format!("`git {}` exited with {}: {}", args.join(" "), out.status, stderr.trim()),
        });
    }
    Ok(String::from_utf8_lossy(&out.stdout).into_owned())
}

/// Generate a patch for `files` (relative to `base_dir`) at `output`.
///
/// The staging directory is a `TempDir`, so it is removed on every exit
/// path: success, tool failure, or an early `?` return during the copy.
pub fn create_patch(files: &[PathBuf], base_dir: &Path, output: &Path) -> Result<()> {
    let staging = tempfile::Builder::new().prefix("arpick-patch-").tempdir()?;

    // Copy the selection into the staging dir, preserving relative layout.
    // fs::copy carries permission bits along with the contents.
    for rel in files {
        let src = base_dir.join(rel);
        if !src.is_file() {
            tracing::warn!(path = %src.display(), "skipping non-file selection entry");
            continue;
        }
        let dest = staging.path().join(rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&src, &dest)?;
    }

    run_git(staging.path(), &["init", "--quiet"])?;
    run_git(staging.path(), &["add", "."])?;
    let diff = run_git(staging.path(), &["diff", "--cached", "--no-color"])?;

    fs::write(output, diff)?;
    Ok(())
}
