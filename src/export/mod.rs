//! Export pipeline: turn the current selection into an archive or a patch.
//!
//! The interactive side drives this as a small state machine: Idle →
//! collecting the selection → prompting for a filename → running the
//! external tool → back to Idle with a status message. Collection and
//! prompting live in `App`; the Running step is here and executes while the
//! terminal is suspended.

pub mod archive;
pub mod patch;

use std::path::PathBuf;

use crate::error::Result;

/// Output format for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Tar,
    TarGz,
    TarZst,
    Patch,
}

impl ExportFormat {
    /// Filename extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Tar => "tar",
            ExportFormat::TarGz => "tar.gz",
            ExportFormat::TarZst => "tar.zst",
            ExportFormat::Patch => "patch",
        }
    }

    /// Human-readable format name for status messages and dialog titles.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Tar => "tar",
            ExportFormat::TarGz => "gzip",
            ExportFormat::TarZst => "zstd",
            ExportFormat::Patch => "patch",
        }
    }

    /// Default output filename for this format.
    pub fn default_filename(&self, base_name: &str) -> String {
        format!("{}.{}", base_name, self.extension())
    }
}

/// Everything needed to run one export: resolved before the terminal is
/// suspended, consumed while it is.
#[derive(Debug)]
pub struct ExportJob {
    pub format: ExportFormat,
    /// Selected file paths relative to `base_dir`, in tree order.
    pub files: Vec<PathBuf>,
    /// The browsed root; archiver working directory, so member names stay
    /// relative.
    pub base_dir: PathBuf,
    /// Absolute output path, resolved against the invocation directory.
    pub output: PathBuf,
}

/// Run an export job to completion, blocking until the external tool exits.
pub fn run(job: &ExportJob) -> Result<()> {
    tracing::info!(
        format = job.format.label(),
        files = job.files.len(),
        output = %job.output.display(),
        "starting export"
    );
    match job.format {
        ExportFormat::Patch => patch::create_patch(&job.files, &job.base_dir, &job.output),
        _ => archive::create_archive(job.format, &job.output, &job.files, &job.base_dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filenames_per_format() {
        assert_eq!(ExportFormat::Tar.default_filename("archive"), "archive.tar");
        assert_eq!(
            ExportFormat::TarGz.default_filename("archive"),
            "archive.tar.gz"
        );
        assert_eq!(
            ExportFormat::TarZst.default_filename("snapshot"),
            "snapshot.tar.zst"
        );
        assert_eq!(
            ExportFormat::Patch.default_filename("changes"),
            "changes.patch"
        );
    }
}
