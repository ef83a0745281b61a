use crate::errors::{DemultiplexError, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};

pub const SAMPLE_SHEET: &str = "SampleSheet.csv";
pub const RUN_INFO: &str = "RunInfo.xml";

/// Installed location of this package.
pub fn package_location() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Directory holding the bundled test run (`<package>/sequana/data`).
pub fn sharedir() -> PathBuf {
    package_location().join("sequana").join("data")
}

pub fn validate_bcl_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(DemultiplexError::MissingBclDirectory(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(DemultiplexError::NotADirectory(path.to_path_buf()));
    }

    if !path.join(RUN_INFO).exists() {
        warn!(
            "No {} found in {}. bcl2fastq will most likely fail on this directory",
            RUN_INFO,
            path.display()
        );
    }

    Ok(())
}

/// Resolves the sample sheet for a run.
///
/// An explicit sheet must exist. Without one, `SampleSheet.csv` inside the BCL
/// directory is used when present; otherwise `None` is returned and bcl2fastq
/// falls back to its own lookup.
pub fn resolve_sample_sheet(bcl_directory: &Path, explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    match explicit {
        Some(sheet) if sheet.is_file() => Ok(Some(sheet.to_path_buf())),
        Some(sheet) => Err(DemultiplexError::MissingSampleSheet(sheet.to_path_buf())),
        None => {
            let default = bcl_directory.join(SAMPLE_SHEET);
            if default.is_file() {
                debug!("Using sample sheet found in BCL directory: {}", default.display());
                Ok(Some(default))
            } else {
                warn!(
                    "No sample sheet given and none found in {}",
                    bcl_directory.display()
                );
                Ok(None)
            }
        }
    }
}

/// Returns true when `tool` can be launched from `PATH`.
pub fn tool_on_path(tool: &str) -> bool {
    match std::process::Command::new(tool).arg("--version").output() {
        Ok(_) => {
            debug!("{} found in PATH", tool);
            true
        }
        Err(_) => false,
    }
}

pub fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| DemultiplexError::io(path, e))
}
