//! # coilscan
//!
//! Extract structured steel-coil inspection records from OCR output.
//!
//! ## Why this crate?
//!
//! Quality tickets on a steel line are photographed and run through OCR.
//! What comes back is a heap of text fragments: coil ids split in two, batch
//! numbers fused with the grade next to them, a `Q` read as `0`, Chinese
//! defect notes glued to measurements. This crate turns that heap into one
//! clean record per ticket row: coil id, batch id, grade code and defect
//! text.
//!
//! ## Pipeline Overview
//!
//! ```text
//! fragments
//!  │
//!  ├─ boxed?  yes ─▶ 1. Rows     cluster by vertical centre
//!  │                 2. Tokens   split text, order by x
//!  │                 3. Columns  cut at large horizontal gaps
//!  │                 4. Fields   coil → batch → grade, rest is defect
//!  │
//!  └─ boxed?  no ──▶ 5. Plain    one line at a time, left to right
//!  │
//!  └─ Output  tab-separated lines, or "没有找到有效记录"
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use coilscan::{extract_lines, ExtractionConfig};
//!
//! let config = ExtractionConfig::default();
//! let text = extract_lines(&["Q1234567890 2024031501 SPHC-S 边部裂纹3mm"], &config);
//! assert_eq!(text, "Q1234567890\t2024031501\tSPHC-S          \t边部裂纹 3mm");
//! ```
//!
//! Records can also be taken unformatted through [`extract_records`], and
//! formats can be chosen by name through [`FormatRegistry`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `coilscan` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! coilscan = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod fragment;
pub mod pipeline;
pub mod record;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConfigSource, ExtractionConfig, ExtractionConfigBuilder, JsonConfigFile};
pub use error::CoilScanError;
pub use extract::{extract, extract_lines, extract_records, Extraction, InputPath};
pub use format::{FormatRegistry, GenericTextFormat, RecordFormat, SteelQualityFormat};
pub use fragment::{parse_input, read_input_file, Point, Quad, TextFragment};
pub use record::{format_records, Record, RecordLayout, NO_RECORDS};
