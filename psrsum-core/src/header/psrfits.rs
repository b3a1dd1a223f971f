//! Primary-header reader for PSRFITS files (`.fits`, `.sf`, `.rf`).
//!
//! A FITS header is a sequence of 2880-byte blocks, each holding 36 cards
//! of 80 ASCII characters in the form `KEYWORD = value / comment`, closed
//! by an `END` card. PSRFITS keeps the observation metadata this tool
//! needs in the primary HDU, so only that header is read; binary tables
//! and data are never touched. A FITS file that is not PSRFITS (no
//! `STT_IMJD` etc.) fails here and aborts the run.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Result, SumError};
use crate::header::extract::HeaderFields;

const BLOCK_LEN: usize = 2880;
const CARD_LEN: usize = 80;
const SECONDS_PER_DAY: f64 = 86_400.0;

pub fn read_header(path: &Path) -> Result<HeaderFields> {
    let cards = read_cards(path)?;

    let telescope = string_card(&cards, path, "TELESCOP")?;
    let observer = string_card(&cards, path, "OBSERVER")?;
    let project_id = string_card(&cards, path, "PROJID")?;
    let source = string_card(&cards, path, "SRC_NAME")?;
    let mode = string_card(&cards, path, "OBS_MODE")?;
    let stt_imjd = int_card(&cards, path, "STT_IMJD")?;
    let stt_smjd = int_card(&cards, path, "STT_SMJD")?;
    let obsfreq = float_card(&cards, path, "OBSFREQ")?;

    Ok(HeaderFields {
        telescope,
        observer,
        project_id,
        source,
        mode,
        mjd: stt_imjd as f64 + stt_smjd as f64 / SECONDS_PER_DAY,
        center_freq_mhz: obsfreq,
    })
}

/// Reads header blocks up to the END card into a keyword -> value map.
/// String values are unquoted and trimmed; comments are stripped.
fn read_cards(path: &Path) -> Result<HashMap<String, String>> {
    let mut f = File::open(path)?;
    let mut cards = HashMap::new();
    let mut block = [0u8; BLOCK_LEN];
    let mut first = true;

    loop {
        f.read_exact(&mut block).map_err(|_| header_err(path, "truncated FITS header"))?;
        for card in block.chunks_exact(CARD_LEN) {
            let keyword = std::str::from_utf8(&card[..8])
                .map_err(|_| header_err(path, "non-ASCII keyword in header card"))?
                .trim()
                .to_string();
            if keyword == "END" {
                return Ok(cards);
            }
            if first {
                if keyword != "SIMPLE" {
                    return Err(header_err(path, "not a FITS file (missing SIMPLE card)"));
                }
                first = false;
            }
            // Only "KEYWORD = value" cards carry data; COMMENT, HISTORY
            // and blank cards are skipped.
            if &card[8..10] != b"= " {
                continue;
            }
            let raw = std::str::from_utf8(&card[10..])
                .map_err(|_| header_err(path, "non-ASCII value in header card"))?;
            cards.insert(keyword, parse_value(raw));
        }
    }
}

/// Strips FITS quoting and trailing comments from a card value.
fn parse_value(raw: &str) -> String {
    let raw = raw.trim_start();
    if let Some(quoted) = raw.strip_prefix('\'') {
        // String value: everything up to the closing quote, trimmed.
        match quoted.find('\'') {
            Some(end) => quoted[..end].trim().to_string(),
            None => quoted.trim().to_string(),
        }
    } else {
        raw.split('/').next().unwrap_or_default().trim().to_string()
    }
}

fn string_card(cards: &HashMap<String, String>, path: &Path, key: &str) -> Result<String> {
    cards
        .get(key)
        .cloned()
        .ok_or_else(|| header_err(path, &format!("missing {key} card")))
}

fn int_card(cards: &HashMap<String, String>, path: &Path, key: &str) -> Result<i64> {
    let raw = string_card(cards, path, key)?;
    raw.parse::<i64>()
        .map_err(|_| header_err(path, &format!("{key} is not an integer: {raw:?}")))
}

fn float_card(cards: &HashMap<String, String>, path: &Path, key: &str) -> Result<f64> {
    let raw = string_card(cards, path, key)?;
    raw.parse::<f64>()
        .map_err(|_| header_err(path, &format!("{key} is not a number: {raw:?}")))
}

fn header_err(path: &Path, reason: &str) -> SumError {
    SumError::Header {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
