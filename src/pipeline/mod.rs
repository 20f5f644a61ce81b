//! Pipeline stages for ticket field extraction.
//!
//! Each submodule implements exactly one transformation step, so every step
//! can be tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//! spatial: fragments ──▶ rows ──▶ tokens ──▶ columns ──▶ fields ──▶ Record
//!                       (y)      (split)    (x gap)     (per row)
//!
//! flat:    lines ───────────────────────────────────────▶ plain ──▶ Record
//! ```
//!
//! 1. [`rows`]   : cluster fragments by vertical centre
//! 2. [`tokens`] : split each row's fragments into ordered `(token, x)` pairs
//! 3. [`columns`]: cut a row at large horizontal gaps
//! 4. [`fields`] : coil/batch/grade extraction per column, defect remainder
//! 5. [`plain`]  : sequential extraction for lines without coordinates
//!
//! [`patterns`] holds the compiled field patterns both paths share.

pub mod columns;
pub mod fields;
pub mod patterns;
pub mod plain;
pub mod rows;
pub mod tokens;
