#![forbid(unsafe_code)]

pub mod config;
pub mod domain;
pub mod error;

pub mod header {
    pub mod extract;
    pub mod filterbank;
    pub mod psrfits;
}

pub mod report;
pub mod scan;

// Re-exports: stable API surface
pub use config::Config;
pub use domain::{FileRecord, RunSummary};
pub use header::extract::{FormatKind, extract};
pub use report::write_report;
pub use scan::{CONFIRM_THRESHOLD, collect_candidates, scan};
