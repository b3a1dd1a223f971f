// psrsum_core/src/domain.rs
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Metadata read from one data file's header. Transient: folded into a
/// [`RunSummary`] and dropped, never persisted.
#[derive(Clone, Debug)]
pub struct FileRecord {
    /// Directory part of the file path.
    pub dir: PathBuf,
    pub file_name: String,
    /// Extension including the leading dot, e.g. ".fil".
    pub ext: String,
    pub size_bytes: u64,
    pub telescope: String,
    pub observer: String,
    pub project_id: String,
    pub source: String,
    pub mode: String,
    /// Observation epoch as a Modified Julian Date.
    pub mjd: f64,
    /// Center of the observed frequency band, MHz.
    pub center_freq_mhz: f64,
}

/// Running totals and distinct-value sets accumulated over one scan.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub n_files: u64,
    pub total_bytes: u64,
    pub exts: BTreeSet<String>,
    pub telescopes: BTreeSet<String>,
    pub observers: BTreeSet<String>,
    pub project_ids: BTreeSet<String>,
    pub sources: BTreeSet<String>,
    pub modes: BTreeSet<String>,
    /// Center frequencies as display labels; the report lists them in
    /// lexicographic order of the label, not numeric order.
    pub center_freqs: BTreeSet<String>,
    /// Collected but intentionally absent from the report.
    pub mjds: Vec<f64>,
}

impl RunSummary {
    /// Folds one record into the totals. Inserting an already-seen value
    /// into any of the distinct sets is a no-op.
    pub fn fold(&mut self, rec: &FileRecord) {
        self.n_files += 1;
        self.total_bytes += rec.size_bytes;
        self.exts.insert(rec.ext.clone());
        self.telescopes.insert(rec.telescope.clone());
        self.observers.insert(rec.observer.clone());
        self.project_ids.insert(rec.project_id.clone());
        self.sources.insert(rec.source.clone());
        self.modes.insert(rec.mode.clone());
        self.center_freqs.insert(freq_label(rec.center_freq_mhz));
        // MJDs are compared by exact equality; no tolerance or bucketing.
        if !self.mjds.contains(&rec.mjd) {
            self.mjds.push(rec.mjd);
        }
    }
}

/// Text form of a frequency as listed in the report: integral values keep
/// one decimal place ("1400.0"), everything else prints exact ("1450.5").
pub fn freq_label(mhz: f64) -> String {
    if mhz.fract() == 0.0 {
        format!("{mhz:.1}")
    } else {
        format!("{mhz}")
    }
}
