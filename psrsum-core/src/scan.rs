//! Directory walk plus the fold of per-file metadata into a [`RunSummary`].

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::domain::RunSummary;
use crate::error::{Result, SumError};
use crate::header::extract::{FormatKind, extract};

/// Scans larger than this many candidate files require confirmation, as a
/// guard against trawling an entire storage volume by accident.
pub const CONFIRM_THRESHOLD: usize = 1000;

/// Every file under `root` whose extension names a known data format, at
/// any depth. Symlinked candidates are kept in the list (they count toward
/// the confirmation threshold) and skipped later by [`scan`]; symlinked
/// directories are never followed.
pub fn collect_candidates(root: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| SumError::Io(e.into()))?;
        if entry.file_type().is_dir() {
            continue;
        }
        let is_candidate = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(FormatKind::from_ext)
            .is_some();
        if is_candidate {
            out.push(entry.path().to_path_buf());
        }
    }
    Ok(out)
}

/// Folds every non-symlink candidate into `summary`, one file at a time in
/// enumeration order. `confirm` is consulted once when the candidate count
/// exceeds [`CONFIRM_THRESHOLD`]; a false return aborts before any file is
/// opened. An extraction error aborts the whole run with the summary
/// discarded; there is no per-file recovery.
pub fn scan(
    candidates: &[PathBuf],
    summary: &mut RunSummary,
    confirm: impl FnOnce(usize) -> bool,
) -> Result<()> {
    if candidates.len() > CONFIRM_THRESHOLD && !confirm(candidates.len()) {
        return Err(SumError::Declined);
    }

    for path in candidates {
        if path.symlink_metadata()?.file_type().is_symlink() {
            debug!("{} is a symlink and will not be read", path.display());
            continue;
        }
        debug!("reading header of {}", path.display());
        let rec = extract(path)?;
        summary.fold(&rec);
    }
    Ok(())
}
