//! Field extraction for plain text lines (no coordinates).
//!
//! A line is read left to right: coil id at the start, then a batch id
//! somewhere in the remainder, then the grade code right after the batch,
//! and everything after the grade is defect text. Recognition errors seen on
//! ticket scans are recovered along the way:
//!
//! * a leading coil letter misread as `0` is replaced by `Q`;
//! * a batch id fused with the following digits is cut after ten digits;
//! * a batch id with one digit misread as a letter is still accepted.

use super::patterns::{
    find_span, is_strict_batch, is_tolerant_batch, normalize_defect, truncate_chars,
    MAX_DEFECT_CHARS,
};
use crate::record::Record;
use once_cell::sync::Lazy;
use regex::Regex;

/// Letter restored in place of a leading `0` on coil ids.
const COIL_SUBSTITUTE: char = 'Q';

const BATCH_MAX_SPAN: usize = 4;
const BATCH_TOLERANT_MAX_SPAN: usize = 6;

static RE_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[，、；;|,:]+").unwrap());

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Coil id at line start: letter plus ten alphanumerics.
static RE_COIL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]{10}").unwrap());

/// Leading-zero recoveries, in priority order.
static RE_COIL_RECOVERY: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"^0[0-9]{10}[A-Za-z]").unwrap(),
        Regex::new(r"^0[0-9]{10}").unwrap(),
        Regex::new(r"^0[0-9]{9}[A-Za-z]").unwrap(),
    ]
});

/// Letter, digit, symbol and CJK runs.
static RE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z]+|[0-9]+|[+\-/]+|[\x{4e00}-\x{9fa5}]+").unwrap());

fn halfwidth_punct(c: char) -> char {
    match c {
        '\u{3000}' => ' ',
        '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0)
            .filter(char::is_ascii_punctuation)
            .unwrap_or(c),
        _ => c,
    }
}

/// Map full-width punctuation to ASCII, turn separator runs into a single
/// space, collapse whitespace and trim.
pub fn normalize_line(line: &str) -> String {
    let s: String = line.chars().map(halfwidth_punct).collect();
    let s = RE_SEPARATORS.replace_all(&s, " ");
    RE_WHITESPACE.replace_all(&s, " ").trim().to_string()
}

/// Split the coil id off the start of `line`.
///
/// Returns the (possibly repaired) coil id and the untouched remainder; an
/// empty id when nothing matched.
fn take_coil(line: &str) -> (String, &str) {
    if let Some(m) = RE_COIL_PREFIX.find(line) {
        return (m.as_str().to_string(), &line[m.end()..]);
    }
    for re in RE_COIL_RECOVERY.iter() {
        if let Some(m) = re.find(line) {
            let coil = format!("{}{}", COIL_SUBSTITUTE, &m.as_str()[1..]);
            return (coil, &line[m.end()..]);
        }
    }
    (String::new(), line)
}

/// Locate the batch id among the runs of `rest`.
///
/// Returns the batch id and the byte offset in `rest` where it ends.
fn find_batch(rest: &str) -> Option<(String, usize)> {
    let runs: Vec<regex::Match<'_>> = RE_RUNS.find_iter(rest).collect();
    let texts: Vec<&str> = runs.iter().map(|m| m.as_str()).collect();

    if let Some(hit) = find_span(&texts, 1, BATCH_MAX_SPAN, is_strict_batch) {
        return Some((hit.text, runs[hit.end - 1].end()));
    }
    if let Some(run) = runs
        .iter()
        .find(|m| m.len() > 10 && m.as_str().bytes().all(|b| b.is_ascii_digit()))
    {
        // The digits after the tenth stay in the remainder for the grade.
        return Some((run.as_str()[..10].to_string(), run.start() + 10));
    }
    find_span(&texts, 2, BATCH_TOLERANT_MAX_SPAN, is_tolerant_batch)
        .map(|hit| (hit.text, runs[hit.end - 1].end()))
}

/// Extract the record for one raw line.
///
/// Returns `None` for lines that are empty after normalisation.
pub fn record_from_line(raw: &str) -> Option<Record> {
    let line = normalize_line(raw);
    if line.is_empty() {
        return None;
    }

    let (coil_id, rest) = take_coil(&line);
    let rest = rest.trim();

    let (batch_id, boundary) = match find_batch(rest) {
        Some(found) => found,
        // A coil without a batch still leaves the grade in front of the remainder.
        None if !coil_id.is_empty() => (String::new(), 0),
        // Neither coil nor batch: the normalised line is the defect text as is.
        None => {
            return Some(Record {
                defect_text: truncate_chars(rest, MAX_DEFECT_CHARS),
                ..Record::default()
            });
        }
    };

    let after = rest[boundary..].trim_start();
    let grade_end = after
        .find(|c: char| !c.is_ascii() || c.is_whitespace())
        .unwrap_or(after.len());

    Some(Record {
        coil_id,
        batch_id,
        grade_code: after[..grade_end].to_string(),
        defect_text: normalize_defect(after[grade_end..].trim()),
    })
}
