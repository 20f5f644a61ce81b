//! Extraction entry points.
//!
//! The input is inspected once: if the first fragment carries a box the
//! spatial path runs (rows → tokens → columns → fields), otherwise every
//! fragment is treated as one plain text line. Both paths end in the same
//! [`Record`] list and the same text formatter.

use crate::config::ExtractionConfig;
use crate::fragment::{fragments_from_lines, TextFragment};
use crate::pipeline::{columns, fields, plain, rows, tokens};
use crate::record::{format_records, Record, RecordLayout};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which extraction path produced a set of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputPath {
    /// Fragments with bounding boxes, clustered into rows and columns.
    Spatial,
    /// Plain text lines, read left to right.
    Flat,
}

impl InputPath {
    /// Pick the path from the first input element.
    pub fn detect(items: &[TextFragment]) -> Self {
        match items.first() {
            Some(f) if f.bbox.is_some() => InputPath::Spatial,
            _ => InputPath::Flat,
        }
    }

    /// Text layout for records of this path: only flat lines pad the grade.
    pub fn layout(self) -> RecordLayout {
        match self {
            InputPath::Spatial => RecordLayout::Tabbed,
            InputPath::Flat => RecordLayout::Aligned,
        }
    }
}

/// Records extracted from one input, in row/line order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub path: InputPath,
    pub records: Vec<Record>,
}

impl Extraction {
    /// Format as newline-separated, tab-separated lines, or the
    /// "no records" sentinel.
    pub fn to_text(&self) -> String {
        format_records(&self.records, self.path.layout())
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Extract ticket records and format them as text.
///
/// Never fails: garbled input degrades to empty fields and defect text, and
/// an input without any usable row yields [`crate::record::NO_RECORDS`].
///
/// # Example
/// ```rust
/// use coilscan::{extract, ExtractionConfig, Quad, TextFragment};
///
/// let fragments = vec![
///     TextFragment::new("Q1234567890A", Quad::from_coords(0.0, 0.0, 120.0, 20.0)),
///     TextFragment::new("SPHC-S", Quad::from_coords(200.0, 0.0, 260.0, 20.0)),
/// ];
/// let text = extract(&fragments, &ExtractionConfig::default());
/// assert_eq!(text, "Q1234567890A\t\tSPHC-S\t");
/// ```
pub fn extract(items: &[TextFragment], config: &ExtractionConfig) -> String {
    extract_records(items, config).to_text()
}

/// Extract from plain text lines (always the flat path).
pub fn extract_lines<S: AsRef<str>>(lines: &[S], config: &ExtractionConfig) -> String {
    extract_records(&fragments_from_lines(lines), config).to_text()
}

/// Extract ticket records without formatting them.
pub fn extract_records(items: &[TextFragment], config: &ExtractionConfig) -> Extraction {
    let path = InputPath::detect(items);
    let records = match path {
        InputPath::Spatial => extract_spatial(items, config),
        InputPath::Flat => extract_flat(items, config),
    };
    debug!(
        "Extracted {} records from {} fragments ({:?} path)",
        records.len(),
        items.len(),
        path
    );
    Extraction { path, records }
}

fn extract_spatial(items: &[TextFragment], config: &ExtractionConfig) -> Vec<Record> {
    let trace = config.debug;
    let mut records = Vec::new();

    for row in rows::cluster_rows(rows::place(items), f64::from(config.y_threshold)) {
        let toks = tokens::row_tokens(&row);
        if trace {
            let shown: Vec<(&str, f64)> = toks
                .iter()
                .map(|(t, x)| (t.as_str(), (x * 100.0).round() / 100.0))
                .collect();
            debug!("row_tokens: {:?}", shown);
        }

        let cols = columns::cluster_columns(&toks, config.x_gap);
        if trace {
            let shown: Vec<String> = cols.iter().map(|c| c.join(" ")).collect();
            debug!("cols: {:?}", shown);
        }

        if let Some(record) = fields::record_from_columns(&cols, trace) {
            if trace {
                trace_hit(&record);
            }
            records.push(record);
        }
    }
    records
}

fn extract_flat(items: &[TextFragment], config: &ExtractionConfig) -> Vec<Record> {
    items
        .iter()
        .filter_map(|item| plain::record_from_line(&item.text))
        .inspect(|record| {
            if config.debug {
                trace_hit(record);
            }
        })
        .collect()
}

fn trace_hit(record: &Record) {
    debug!(
        "hit: {} {} {} {}",
        record.coil_id, record.batch_id, record.grade_code, record.defect_text
    );
}
