//! End-to-end scan tests against a real temporary filesystem.
//!
//! These exercise the full pipeline — candidate collection, header
//! extraction for both formats, aggregation, and report writing — with
//! synthetic PSRFITS and filterbank files built by the helpers below.

use std::fs;
use std::path::{Path, PathBuf};

use psrsum_core::error::SumError;
use psrsum_core::{CONFIRM_THRESHOLD, Config, RunSummary, collect_candidates, report, scan};
use tempfile::TempDir;

// ── PSRFITS fixture ─────────────────────────────────────────────────────

const FITS_BLOCK: usize = 2880;
const FITS_CARD: usize = 80;

struct FitsFixture<'a> {
    telescope: &'a str,
    observer: &'a str,
    project_id: &'a str,
    source: &'a str,
    mode: &'a str,
    stt_imjd: i64,
    stt_smjd: i64,
    obsfreq: f64,
}

impl Default for FitsFixture<'_> {
    fn default() -> Self {
        Self {
            telescope: "GBT",
            observer: "Smith",
            project_id: "P001",
            source: "J0000+00",
            mode: "SEARCH",
            stt_imjd: 59000,
            stt_smjd: 0,
            obsfreq: 1400.0,
        }
    }
}

fn write_fits(path: &Path, fx: &FitsFixture<'_>) {
    let cards = [
        "SIMPLE  =                    T".to_string(),
        format!("TELESCOP= '{:<8}'", fx.telescope),
        format!("OBSERVER= '{:<8}'", fx.observer),
        format!("PROJID  = '{:<8}'", fx.project_id),
        format!("SRC_NAME= '{:<8}'", fx.source),
        format!("OBS_MODE= '{:<8}'", fx.mode),
        format!("STT_IMJD= {:>20}", fx.stt_imjd),
        format!("STT_SMJD= {:>20}", fx.stt_smjd),
        format!("OBSFREQ = {:>20}", fx.obsfreq),
    ];
    let mut buf = Vec::new();
    for text in &cards {
        let mut card = text.as_bytes().to_vec();
        card.resize(FITS_CARD, b' ');
        buf.extend_from_slice(&card);
    }
    let mut end = b"END".to_vec();
    end.resize(FITS_CARD, b' ');
    buf.extend_from_slice(&end);
    while buf.len() % FITS_BLOCK != 0 {
        buf.push(b' ');
    }
    fs::write(path, buf).unwrap();
}

// ── Filterbank fixture ──────────────────────────────────────────────────

fn put_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

fn write_fil(path: &Path, telescope_id: i32, source: &str, fch1: f64, foff: f64, nchans: i32) {
    let mut buf = Vec::new();
    put_str(&mut buf, "HEADER_START");
    put_str(&mut buf, "telescope_id");
    buf.extend_from_slice(&telescope_id.to_le_bytes());
    put_str(&mut buf, "source_name");
    put_str(&mut buf, source);
    put_str(&mut buf, "tstart");
    buf.extend_from_slice(&59000.5f64.to_le_bytes());
    put_str(&mut buf, "fch1");
    buf.extend_from_slice(&fch1.to_le_bytes());
    put_str(&mut buf, "foff");
    buf.extend_from_slice(&foff.to_le_bytes());
    put_str(&mut buf, "nchans");
    buf.extend_from_slice(&nchans.to_le_bytes());
    put_str(&mut buf, "HEADER_END");
    fs::write(path, buf).unwrap();
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn run_scan(root: &Path) -> RunSummary {
    let candidates = collect_candidates(root).unwrap();
    let mut summary = RunSummary::default();
    scan(&candidates, &mut summary, |_| true).unwrap();
    summary
}

fn config_for(tmp: &TempDir, data_dir: PathBuf) -> Config {
    Config {
        data_dir,
        output_name: "README.txt".to_string(),
        output_dir: tmp.path().to_path_buf(),
        owner: "Unknown".to_string(),
        generator: "tester".to_string(),
        verbose: false,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────

/// The two-file scenario: one PSRFITS and one filterbank observation of
/// the same source with the same telescope.
#[test]
fn mixed_format_directory_aggregates_correctly() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir(&data).unwrap();
    write_fits(&data.join("obs1.fits"), &FitsFixture::default());
    write_fil(&data.join("obs2.fil"), 6, "J0000+00", 1500.0, -1.0, 100);

    let summary = run_scan(&data);
    assert_eq!(summary.n_files, 2);
    assert_eq!(
        summary.telescopes.iter().collect::<Vec<_>>(),
        ["GBT"]
    );
    assert_eq!(
        summary.sources.iter().collect::<Vec<_>>(),
        ["J0000+00"]
    );
    assert_eq!(
        summary.modes.iter().collect::<Vec<_>>(),
        ["SEARCH", "Unknown"]
    );
    assert_eq!(
        summary.center_freqs.iter().collect::<Vec<_>>(),
        ["1400.0", "1450.5"]
    );
    assert_eq!(
        summary.exts.iter().collect::<Vec<_>>(),
        [".fil", ".fits"]
    );
    // Observer and project fall back to "Unknown" for filterbank files.
    assert_eq!(
        summary.observers.iter().collect::<Vec<_>>(),
        ["Smith", "Unknown"]
    );
}

/// M distinct telescopes out of N files show up exactly M times, sorted.
#[test]
fn telescope_list_is_distinct_and_sorted() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().to_path_buf();
    for (i, id) in [4, 6, 4, 1, 6].iter().enumerate() {
        write_fil(&data.join(format!("obs{i}.fil")), *id, "J0000+00", 1500.0, -1.0, 64);
    }

    let summary = run_scan(&data);
    assert_eq!(summary.n_files, 5);
    assert_eq!(
        summary.telescopes.iter().collect::<Vec<_>>(),
        ["Arecibo", "GBT", "Parkes"]
    );
}

/// Reported total size is the byte sum of non-symlink candidates in
/// decimal gigabytes, two decimal places.
#[test]
fn total_size_sums_on_disk_bytes() {
    let tmp = TempDir::new().unwrap();
    write_fil(&tmp.path().join("a.fil"), 6, "A", 1500.0, -1.0, 64);
    write_fil(&tmp.path().join("b.fil"), 6, "B", 1500.0, -1.0, 64);

    let on_disk: u64 = ["a.fil", "b.fil"]
        .iter()
        .map(|n| fs::metadata(tmp.path().join(n)).unwrap().len())
        .sum();

    let summary = run_scan(tmp.path());
    assert_eq!(summary.total_bytes, on_disk);

    let config = config_for(&tmp, tmp.path().to_path_buf());
    let text = report::render(&config, &summary, "t0", "t1");
    let expected = format!("Total size (GB): {:.2}", on_disk as f64 / 1e9);
    assert!(text.contains(&expected));
}

/// A directory holding only symlinks to valid data files counts zero.
#[cfg(unix)]
#[test]
fn symlink_only_directory_counts_nothing() {
    use std::os::unix::fs::symlink;

    let tmp = TempDir::new().unwrap();
    let real = tmp.path().join("real");
    let linked = tmp.path().join("linked");
    fs::create_dir_all(&real).unwrap();
    fs::create_dir_all(&linked).unwrap();
    write_fits(&real.join("obs.fits"), &FitsFixture::default());
    symlink(real.join("obs.fits"), linked.join("obs.fits")).unwrap();
    write_fil(&real.join("obs.fil"), 6, "J0000+00", 1500.0, -1.0, 64);
    symlink(real.join("obs.fil"), linked.join("obs.fil")).unwrap();

    let summary = run_scan(&linked);
    assert_eq!(summary.n_files, 0);
    assert_eq!(summary.total_bytes, 0);
    assert!(summary.telescopes.is_empty());
}

/// Running twice against the same output path fails the second time with
/// the first report untouched.
#[test]
fn second_run_refuses_existing_output() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir(&data).unwrap();
    write_fits(&data.join("obs.fits"), &FitsFixture::default());
    let config = config_for(&tmp, data.clone());

    config.validate().unwrap();
    let summary = run_scan(&data);
    let written = report::write_report(&config, &summary, "t0", "t1").unwrap();
    let first = fs::read_to_string(&written).unwrap();

    assert!(matches!(config.validate(), Err(SumError::OutputExists(_))));
    assert_eq!(fs::read_to_string(&written).unwrap(), first);
}

/// One malformed file aborts the whole run; no partial result survives.
#[test]
fn malformed_header_aborts_the_run() {
    let tmp = TempDir::new().unwrap();
    write_fil(&tmp.path().join("good.fil"), 6, "J0000+00", 1500.0, -1.0, 64);
    fs::write(tmp.path().join("zz_bad.fits"), b"this is not FITS data").unwrap();

    let mut candidates = collect_candidates(tmp.path()).unwrap();
    candidates.sort();
    let mut summary = RunSummary::default();
    assert!(scan(&candidates, &mut summary, |_| true).is_err());
}

/// Above the threshold, a declined confirmation leaves no side effects.
#[test]
fn declined_large_scan_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir(&data).unwrap();
    for i in 0..=CONFIRM_THRESHOLD {
        fs::write(data.join(format!("f{i}.fil")), b"").unwrap();
    }

    let config = config_for(&tmp, data.clone());
    config.validate().unwrap();

    let candidates = collect_candidates(&data).unwrap();
    assert!(candidates.len() > CONFIRM_THRESHOLD);

    let mut summary = RunSummary::default();
    let err = scan(&candidates, &mut summary, |_| false).unwrap_err();
    assert!(matches!(err, SumError::Declined));
    assert!(!config.output_path().exists());
}

/// The written README matches the rendered text byte for byte.
#[test]
fn report_round_trips_to_disk() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir(&data).unwrap();
    write_fits(&data.join("obs.fits"), &FitsFixture::default());

    let config = config_for(&tmp, data.clone());
    let summary = run_scan(&data);
    let started = report::timestamp_now().unwrap();
    let finished = report::timestamp_now().unwrap();

    let path = report::write_report(&config, &summary, &started, &finished).unwrap();
    let on_disk = fs::read_to_string(path).unwrap();
    assert_eq!(on_disk, report::render(&config, &summary, &started, &finished));
    assert!(on_disk.ends_with("Notes:"));
}
