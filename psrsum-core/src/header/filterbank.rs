//! Header reader for SIGPROC filterbank files (`.fil`).
//!
//! The format opens with the length-prefixed string `HEADER_START`,
//! followed by keyword/value pairs (strings are length-prefixed, numeric
//! values are little-endian), and closes with `HEADER_END`. The raw
//! spectral data after the header is never read. The header carries no
//! observer, project or mode fields, so those come back as "Unknown",
//! and the center frequency has to be computed from the channel grid.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Result, SumError};
use crate::header::extract::HeaderFields;

/// Sanity limit for length-prefixed strings; anything longer means the
/// file is not a filterbank header.
const MAX_STRING_LEN: usize = 1024;

pub fn read_header(path: &Path) -> Result<HeaderFields> {
    let file = File::open(path)?;
    let mut r = BufReader::new(file);

    let magic = read_string(&mut r, path)?;
    if magic != "HEADER_START" {
        return Err(header_err(path, "file does not start with HEADER_START"));
    }

    let mut telescope_id: Option<i32> = None;
    let mut source = String::new();
    let mut tstart: Option<f64> = None;
    let mut fch1: Option<f64> = None;
    let mut foff: Option<f64> = None;
    let mut nchans: Option<i32> = None;

    loop {
        let keyword = read_string(&mut r, path)?;
        match keyword.as_str() {
            "HEADER_END" => break,
            "telescope_id" => telescope_id = Some(read_i32(&mut r, path)?),
            "source_name" => source = read_string(&mut r, path)?,
            "tstart" => tstart = Some(read_f64(&mut r, path)?),
            "fch1" => fch1 = Some(read_f64(&mut r, path)?),
            "foff" => foff = Some(read_f64(&mut r, path)?),
            "nchans" => nchans = Some(read_i32(&mut r, path)?),
            // Remaining standard keywords are skipped by their value type.
            "machine_id" | "data_type" | "barycentric" | "pulsarcentric" | "nbits"
            | "nsamples" | "nifs" | "nbeams" | "ibeam" => {
                read_i32(&mut r, path)?;
            }
            "tsamp" | "az_start" | "za_start" | "src_raj" | "src_dej" | "refdm"
            | "period" | "fchannel" | "foff_orig" => {
                read_f64(&mut r, path)?;
            }
            "rawdatafile" => {
                read_string(&mut r, path)?;
            }
            "signed" => {
                read_u8(&mut r, path)?;
            }
            other => {
                return Err(header_err(path, &format!("unknown header keyword {other:?}")));
            }
        }
    }

    let fch1 = fch1.ok_or_else(|| header_err(path, "missing fch1"))?;
    let foff = foff.ok_or_else(|| header_err(path, "missing foff"))?;
    let nchans = nchans.ok_or_else(|| header_err(path, "missing nchans"))?;
    if nchans <= 0 {
        return Err(header_err(path, "nchans must be positive"));
    }

    Ok(HeaderFields {
        telescope: telescope_name(telescope_id),
        observer: "Unknown".to_string(),
        project_id: "Unknown".to_string(),
        source: source.trim().to_string(),
        mode: "Unknown".to_string(),
        mjd: tstart.ok_or_else(|| header_err(path, "missing tstart"))?,
        // foff is signed, so this centers the band whether channels run
        // ascending or descending in frequency.
        center_freq_mhz: fch1 + foff * f64::from(nchans - 1) / 2.0,
    })
}

/// SIGPROC telescope identifier table.
fn telescope_name(id: Option<i32>) -> String {
    let name = match id {
        Some(0) => "Fake",
        Some(1) => "Arecibo",
        Some(2) => "Ooty",
        Some(3) => "Nancay",
        Some(4) => "Parkes",
        Some(5) => "Jodrell",
        Some(6) => "GBT",
        Some(7) => "GMRT",
        Some(8) => "Effelsberg",
        _ => "Unknown",
    };
    name.to_string()
}

fn read_string(r: &mut BufReader<File>, path: &Path) -> Result<String> {
    let mut len_buf = [0u8; 4];
    r.read_exact(&mut len_buf)
        .map_err(|_| header_err(path, "truncated filterbank header"))?;
    let len = u32::from_le_bytes(len_buf) as usize;
    if len > MAX_STRING_LEN {
        return Err(header_err(path, &format!("string length {len} exceeds sanity limit")));
    }
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)
        .map_err(|_| header_err(path, "truncated filterbank header"))?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn read_f64(r: &mut BufReader<File>, path: &Path) -> Result<f64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)
        .map_err(|_| header_err(path, "truncated filterbank header"))?;
    Ok(f64::from_le_bytes(buf))
}

fn read_i32(r: &mut BufReader<File>, path: &Path) -> Result<i32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)
        .map_err(|_| header_err(path, "truncated filterbank header"))?;
    Ok(i32::from_le_bytes(buf))
}

fn read_u8(r: &mut BufReader<File>, path: &Path) -> Result<u8> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)
        .map_err(|_| header_err(path, "truncated filterbank header"))?;
    Ok(buf[0])
}

fn header_err(path: &Path, reason: &str) -> SumError {
    SumError::Header {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
