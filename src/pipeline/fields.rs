//! Field extraction for one spatial row.
//!
//! Columns are visited left to right. Inside a column the extractor keeps
//! pulling fields out of a shrinking working list, always in the order
//! coil → batch → grade, until nothing more matches; whatever is left over
//! becomes defect text. A field assigned once in a row is never replaced.

use super::patterns::{
    clean_grade, find_span, is_coil, is_grade, is_strict_batch, is_tolerant_batch,
    normalize_defect,
};
use crate::record::Record;
use tracing::debug;

const COIL_MAX_SPAN: usize = 6;
const BATCH_MAX_SPAN: usize = 4;
const BATCH_TOLERANT_MAX_SPAN: usize = 6;
const GRADE_MAX_SPAN: usize = 8;

/// Remove and return the first run of tokens that satisfies `accept`.
fn take(
    working: &mut Vec<String>,
    min_span: usize,
    max_span: usize,
    accept: impl Fn(&str) -> bool,
) -> Option<String> {
    let hit = find_span(working, min_span, max_span, accept)?;
    working.drain(hit.start..hit.end);
    Some(hit.text)
}

/// Split the first all-digit token longer than ten characters: its first
/// ten digits are returned and the rest stays in place for later fields.
fn split_oversized_digits(working: &mut [String]) -> Option<String> {
    let idx = working
        .iter()
        .position(|t| t.len() > 10 && t.bytes().all(|b| b.is_ascii_digit()))?;
    let tail = working[idx].split_off(10);
    Some(std::mem::replace(&mut working[idx], tail))
}

/// Batch id: strict ten digits, then an oversized digit run, then a
/// ten-character run with one misread digit.
fn take_batch(working: &mut Vec<String>, trace: bool) -> Option<String> {
    if let Some(batch) = take(working, 1, BATCH_MAX_SPAN, is_strict_batch) {
        return Some(batch);
    }
    if let Some(batch) = split_oversized_digits(working) {
        return Some(batch);
    }
    let batch = take(working, 2, BATCH_TOLERANT_MAX_SPAN, is_tolerant_batch)?;
    if trace {
        debug!("batch_fallback: {}", batch);
    }
    Some(batch)
}

/// Build the record for one row from its columns.
///
/// Returns `None` when the row yields neither a field nor defect text.
pub fn record_from_columns(cols: &[Vec<String>], trace: bool) -> Option<Record> {
    let mut record = Record::default();
    let mut defect_parts: Vec<String> = Vec::new();

    for col in cols {
        let mut working = col.clone();
        while !working.is_empty() {
            if record.coil_id.is_empty() {
                if let Some(coil) = take(&mut working, 1, COIL_MAX_SPAN, is_coil) {
                    record.coil_id = coil;
                    continue;
                }
            }
            if record.batch_id.is_empty() {
                if let Some(batch) = take_batch(&mut working, trace) {
                    record.batch_id = batch;
                    continue;
                }
            }
            if record.grade_code.is_empty() {
                if let Some(grade) = take(&mut working, 1, GRADE_MAX_SPAN, is_grade) {
                    record.grade_code = grade;
                    continue;
                }
            }
            break;
        }

        if !working.is_empty() {
            let segment = normalize_defect(&working.join(" "));
            if !segment.is_empty() {
                defect_parts.push(segment);
            }
        }
    }

    record.defect_text = defect_parts.join(" ").trim().to_string();
    record.grade_code = clean_grade(&record.grade_code);
    (!record.is_empty()).then_some(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn extract(cols: &[&[&str]]) -> Record {
        let cols: Vec<Vec<String>> = cols.iter().map(|c| col(c)).collect();
        record_from_columns(&cols, false).expect("record")
    }

    #[test]
    fn test_single_column_all_fields() {
        let r = extract(&[&["Q1234567890A", "SPHC-S", "边部", "裂纹", "3mm"]]);
        assert_eq!(r.coil_id, "Q1234567890A");
        assert_eq!(r.batch_id, "");
        assert_eq!(r.grade_code, "SPHC-S");
        assert_eq!(r.defect_text, "边部 裂纹 3mm");
    }

    #[test]
    fn test_fields_across_columns() {
        let r = extract(&[
            &["Q1234567890A"],
            &["2024031501"],
            &["DC53D+Z"],
            &["边部裂纹3mm"],
        ]);
        assert_eq!(r.coil_id, "Q1234567890A");
        assert_eq!(r.batch_id, "2024031501");
        assert_eq!(r.grade_code, "DC53D+Z");
        assert_eq!(r.defect_text, "边部裂纹 3mm");
    }

    #[test]
    fn test_split_coil_tokens_are_joined() {
        let r = extract(&[&["Q12345", "67890A", "2024031501"]]);
        assert_eq!(r.coil_id, "Q1234567890A");
        assert_eq!(r.batch_id, "2024031501");
        assert_eq!(r.defect_text, "");
    }

    #[test]
    fn test_oversized_digit_run_splits_batch() {
        let r = extract(&[&["202403150177"]]);
        assert_eq!(r.batch_id, "2024031501");
        // "77" has no letter, so it is neither a grade nor dropped.
        assert_eq!(r.grade_code, "");
        assert_eq!(r.defect_text, "77");
    }

    #[test]
    fn test_tolerant_batch_from_adjacent_tokens() {
        let r = extract(&[&["20240", "O1501"]]);
        assert_eq!(r.batch_id, "20240O1501");
    }

    #[test]
    fn test_tolerant_batch_needs_two_tokens() {
        let r = extract(&[&["20240O1501"]]);
        assert_eq!(r.batch_id, "");
        assert_eq!(r.grade_code, "20240O1501");
    }

    #[test]
    fn test_grade_joined_from_adjacent_tokens() {
        let r = extract(&[&["Q", "2", "边部"]]);
        assert_eq!(r.grade_code, "Q2");
        assert_eq!(r.defect_text, "边部");
    }

    #[test]
    fn test_single_token_grade_beats_longer_join() {
        let r = extract(&[&["DC", "53D+Z"]]);
        assert_eq!(r.grade_code, "DC");
        assert_eq!(r.defect_text, "53D+Z");
    }

    #[test]
    fn test_coil_join_limited_to_six_tokens() {
        let r = extract(&[&["Q1", "23", "4", "5", "6", "789A"]]);
        assert_eq!(r.coil_id, "Q123456789A");

        let r = extract(&[&["Q1", "2", "3", "4", "5", "6", "789A"]]);
        assert_eq!(r.coil_id, "");
    }

    #[test]
    fn test_grade_join_limited_to_eight_tokens() {
        let letters = |n: usize| -> Vec<String> {
            ('A'..='Z').take(n).map(|c| c.to_string()).collect()
        };

        let mut nine = letters(9);
        assert_eq!(take(&mut nine, 1, GRADE_MAX_SPAN, |s| s == "ABCDEFGHI"), None);
        assert_eq!(nine.len(), 9);

        let mut eight = letters(8);
        assert_eq!(
            take(&mut eight, 1, GRADE_MAX_SPAN, |s| s == "ABCDEFGH"),
            Some("ABCDEFGH".to_string())
        );
        assert!(eight.is_empty());
    }

    #[test]
    fn test_first_match_wins_across_columns() {
        let r = extract(&[&["DC01"], &["SPHC"]]);
        assert_eq!(r.grade_code, "DC01");
        assert_eq!(r.defect_text, "SPHC");
    }

    #[test]
    fn test_cjk_never_becomes_grade() {
        let r = extract(&[&["边部", "裂纹"]]);
        assert_eq!(r.grade_code, "");
        assert_eq!(r.defect_text, "边部 裂纹");
    }

    #[test]
    fn test_defect_segment_capped_per_column() {
        let long = "裂".repeat(60);
        let r = extract(&[&[long.as_str()]]);
        assert_eq!(r.defect_text.chars().count(), 40);
    }

    #[test]
    fn test_empty_row_yields_none() {
        assert!(record_from_columns(&[], false).is_none());
    }
}
