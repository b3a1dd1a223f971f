//! Renders the accumulated [`RunSummary`] into the README text file.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write as _;
use std::path::PathBuf;

use time::OffsetDateTime;
use time::macros::format_description;
use tracing::info;

use crate::config::Config;
use crate::domain::RunSummary;
use crate::error::Result;

/// Decimal gigabyte, as used for the reported total size.
const GB: f64 = 1e9;

/// Current UTC wall clock, second resolution, as printed in the report.
/// Start and end are captured separately because files can move or change
/// under a long scan.
pub fn timestamp_now() -> Result<String> {
    let fmt = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    Ok(OffsetDateTime::now_utc().format(&fmt)?)
}

/// The full report text. Every distinct-value list is sorted and joined
/// with ", "; center frequencies sort as text, not numerically. MJDs are
/// collected by the scan but deliberately not listed here. The trailing
/// "Notes:" field is left for manual annotation.
pub fn render(config: &Config, summary: &RunSummary, started: &str, finished: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "README file for {} generated by psrsum.",
        config.data_dir.display()
    );
    let _ = writeln!(out, "Owner: {}", config.owner);
    let _ = writeln!(out, "Generated by: {}", config.generator);
    let _ = writeln!(out, "Started at {started}; completed at {finished}.");
    let _ = writeln!(out, "Number of files: {}", summary.n_files);
    let _ = writeln!(out, "Total size (GB): {:.2}", summary.total_bytes as f64 / GB);
    let _ = writeln!(out, "File types: {}", joined(&summary.exts));
    let _ = writeln!(out, "Telescope: {}", joined(&summary.telescopes));
    let _ = writeln!(out, "Observers: {}", joined(&summary.observers));
    let _ = writeln!(out, "Project IDs: {}", joined(&summary.project_ids));
    let _ = writeln!(out, "Sources: {}", joined(&summary.sources));
    let _ = writeln!(out, "Modes: {}", joined(&summary.modes));
    let _ = writeln!(out, "Center frequencies (MHz): {}", joined(&summary.center_freqs));
    out.push('\n');
    out.push_str("Notes:");
    out
}

/// Writes the report to `output_dir/output_name`. `create_new` keeps the
/// no-overwrite guarantee even if a file appeared after validation.
pub fn write_report(
    config: &Config,
    summary: &RunSummary,
    started: &str,
    finished: &str,
) -> Result<PathBuf> {
    let out_path = config.output_path();
    let mut f = File::create_new(&out_path)?;
    f.write_all(render(config, summary, started, finished).as_bytes())?;
    info!("wrote {}", out_path.display());
    Ok(out_path)
}

fn joined(set: &BTreeSet<String>) -> String {
    set.iter().cloned().collect::<Vec<_>>().join(", ")
}
