//! Archive creation by invoking the external `tar` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{AppError, Result};
use crate::export::ExportFormat;

/// Check if a command-line tool is installed and available.
pub fn tool_available(tool: &str) -> bool {
    Command::new(tool)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn tar_args(format: ExportFormat) -> &'static [&'static str] {
    match format {
        ExportFormat::Tar => &["-cf"],
        ExportFormat::TarGz => &["-czf"],
        ExportFormat::TarZst => &["--zstd", "-cf"],
        // Patch is not an archiver format; the caller dispatches it elsewhere.
        ExportFormat::Patch => &[],
    }
}

/// Create an archive of `files` at `output`.
///
/// `tar` runs with `base_dir` as its working directory and the selected
/// paths as relative member names. Output is captured; a non-zero exit code
/// is reported as a `Tool` error carrying the tool's stderr.
pub fn create_archive(
    format: ExportFormat,
    output: &Path,
    files: &[PathBuf],
    base_dir: &Path,
) -> Result<()> {
    let mut cmd = Command::new("tar");
    cmd.args(tar_args(format))
        .arg(output)
        .args(files)
        .current_dir(base_dir)
        .stdin(Stdio::null());

    let out = cmd.output().map_err(|e| AppError::tool_spawn("tar", &e))?;
    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        return Err(AppError::Tool {
            tool: "tar",
            message: format!(
                "exited with {}: {}",
                out.status,
                stderr.trim().lines().last().unwrap_or("no output")
            ),
        });
    }
    Ok(())
}
