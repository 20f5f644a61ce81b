//! Extracted ticket records and their tab-separated text form.

use crate::pipeline::patterns::GRADE_PAD_WIDTH;
use serde::{Deserialize, Serialize};

/// Output when an extraction yields no record at all ("no valid records found").
pub const NO_RECORDS: &str = "没有找到有效记录";

/// One inspection ticket line. An empty field means "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub coil_id: String,
    pub batch_id: String,
    pub grade_code: String,
    pub defect_text: String,
}

impl Record {
    /// True when no field carries any text.
    pub fn is_empty(&self) -> bool {
        self.coil_id.is_empty()
            && self.batch_id.is_empty()
            && self.grade_code.is_empty()
            && self.defect_text.is_empty()
    }

    /// Render as `coil \t batch \t grade \t defect`.
    pub fn to_line(&self, layout: RecordLayout) -> String {
        match layout {
            // Defect-only lines keep the plain join: there is no grade column to line up.
            RecordLayout::Aligned if self.coil_id.is_empty() && self.batch_id.is_empty() => {
                self.to_line(RecordLayout::Tabbed)
            }
            RecordLayout::Tabbed => [
                self.coil_id.as_str(),
                self.batch_id.as_str(),
                self.grade_code.as_str(),
                self.defect_text.as_str(),
            ]
            .join("\t"),
            RecordLayout::Aligned => {
                let grade = format!("{:<width$}", self.grade_code, width = GRADE_PAD_WIDTH);
                [
                    self.coil_id.as_str(),
                    self.batch_id.as_str(),
                    grade.as_str(),
                    self.defect_text.as_str(),
                ]
                .join("\t")
                .trim_end()
                .to_string()
            }
        }
    }
}

/// How records are laid out as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordLayout {
    /// Fields joined by tabs exactly as extracted. (default)
    #[default]
    Tabbed,
    /// Grade code left-justified to a fixed width so the defect column lines
    /// up in monospaced output; trailing whitespace removed. Records with
    /// neither coil nor batch id are joined as in `Tabbed`.
    Aligned,
}

/// Join records one per line, or return [`NO_RECORDS`] when there are none.
pub fn format_records(records: &[Record], layout: RecordLayout) -> String {
    if records.is_empty() {
        return NO_RECORDS.to_string();
    }
    records
        .iter()
        .map(|r| r.to_line(layout))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(coil: &str, batch: &str, grade: &str, defect: &str) -> Record {
        Record {
            coil_id: coil.into(),
            batch_id: batch.into(),
            grade_code: grade.into(),
            defect_text: defect.into(),
        }
    }

    #[test]
    fn test_empty_records_yield_sentinel() {
        assert_eq!(format_records(&[], RecordLayout::Tabbed), NO_RECORDS);
        assert_eq!(format_records(&[], RecordLayout::Aligned), NO_RECORDS);
    }

    #[test]
    fn test_tabbed_keeps_all_columns() {
        let r = rec("Q1234567890A", "", "SPHC-S", "");
        assert_eq!(r.to_line(RecordLayout::Tabbed), "Q1234567890A\t\tSPHC-S\t");
    }

    #[test]
    fn test_aligned_pads_grade() {
        let r = rec("Q1234567890", "2024031501", "DC01", "边部 裂纹");
        assert_eq!(
            r.to_line(RecordLayout::Aligned),
            "Q1234567890\t2024031501\tDC01            \t边部 裂纹"
        );
    }

    #[test]
    fn test_aligned_trims_trailing_padding() {
        let r = rec("", "2024031501", "DC01", "");
        assert_eq!(r.to_line(RecordLayout::Aligned), "\t2024031501\tDC01");
    }

    #[test]
    fn test_aligned_defect_only_is_not_padded() {
        let r = rec("", "", "", "边部裂纹");
        assert_eq!(r.to_line(RecordLayout::Aligned), "\t\t\t边部裂纹");
        let r = rec("", "", "DC01", "边部");
        assert_eq!(r.to_line(RecordLayout::Aligned), "\t\tDC01\t边部");
    }

    #[test]
    fn test_records_joined_by_newline() {
        let out = format_records(
            &[rec("A", "", "", ""), rec("", "", "", "边部")],
            RecordLayout::Tabbed,
        );
        assert_eq!(out, "A\t\t\t\n\t\t\t边部");
    }

    #[test]
    fn test_is_empty() {
        assert!(Record::default().is_empty());
        assert!(!rec("", "", "", "x").is_empty());
    }
}
