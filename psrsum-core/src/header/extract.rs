use std::fs;
use std::path::Path;

use crate::domain::FileRecord;
use crate::error::{Result, SumError};
use crate::header::{filterbank, psrfits};

/// The two header format families the scanner understands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormatKind {
    /// PSRFITS: `.fits`, `.sf`, `.rf`.
    Psrfits,
    /// SIGPROC filterbank: `.fil`.
    Filterbank,
}

impl FormatKind {
    /// Maps a bare extension (no dot) to a format family. Anything else is
    /// not a candidate and is filtered out before extraction.
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext {
            "fits" | "sf" | "rf" => Some(Self::Psrfits),
            "fil" => Some(Self::Filterbank),
            _ => None,
        }
    }
}

/// Fields every format-specific reader produces. The placeholder value for
/// fields a format does not carry is the literal "Unknown".
#[derive(Clone, Debug)]
pub struct HeaderFields {
    pub telescope: String,
    pub observer: String,
    pub project_id: String,
    pub source: String,
    pub mode: String,
    pub mjd: f64,
    pub center_freq_mhz: f64,
}

/// Reads the header of one data file and returns its normalized metadata.
///
/// A malformed or truncated header is an error; callers do not catch it,
/// so one bad file aborts the whole run.
pub fn extract(path: &Path) -> Result<FileRecord> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_string();
    let kind = FormatKind::from_ext(&ext).ok_or_else(|| SumError::Header {
        path: path.to_path_buf(),
        reason: format!("unsupported extension .{ext}"),
    })?;

    let size_bytes = fs::metadata(path)?.len();
    let dir = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let fields = match kind {
        FormatKind::Psrfits => psrfits::read_header(path)?,
        FormatKind::Filterbank => filterbank::read_header(path)?,
    };

    Ok(FileRecord {
        dir,
        file_name,
        ext: format!(".{ext}"),
        size_bytes,
        telescope: fields.telescope,
        observer: fields.observer,
        project_id: fields.project_id,
        source: fields.source,
        mode: fields.mode,
        mjd: fields.mjd,
        center_freq_mhz: fields.center_freq_mhz,
    })
}
