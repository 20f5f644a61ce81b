//! Configuration for ticket extraction.
//!
//! The engine consumes three knobs, read once per call: the row-clustering
//! tolerance, the column-gap threshold and the debug-trace flag. They live in
//! [`ExtractionConfig`], built via [`ExtractionConfigBuilder`] or taken from
//! [`ExtractionConfig::default()`].
//!
//! Where the values come from is someone else's business. A
//! [`ConfigSource`] is the capability the caller hands in;
//! [`ExtractionConfig::from_source`] turns any failure of that source into
//! the hardcoded defaults so extraction itself never fails on configuration.
//! [`JsonConfigFile`] reads the desktop application's `engine_config.json`.

use crate::error::CoilScanError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default vertical tolerance for grouping fragments into one row.
pub const DEFAULT_Y_THRESHOLD: u32 = 10;

/// Default horizontal gap that splits a row into columns.
pub const DEFAULT_X_GAP: f64 = 40.0;

/// Location of the application config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/engine_config.json";

/// Configuration for one extraction call.
///
/// # Example
/// ```rust
/// use coilscan::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .y_threshold(12)
///     .x_gap(55.0)
///     .debug(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.y_threshold, 12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum distance between a fragment's vertical centre and the running
    /// row reference for the fragment to join that row. Default: 10.
    pub y_threshold: u32,

    /// Maximum horizontal distance between neighbouring tokens of one
    /// column. Default: 40.0.
    ///
    /// Ticket scans put the coil, batch and grade columns well apart while
    /// the pieces of one defect description sit close together, so a single
    /// threshold separates them.
    pub x_gap: f64,

    /// Emit per-row and per-column traces at `DEBUG` level. Default: false.
    /// Never affects the returned output.
    pub debug: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            y_threshold: DEFAULT_Y_THRESHOLD,
            x_gap: DEFAULT_X_GAP,
            debug: false,
        }
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Read the configuration from `source`, falling back to
    /// [`ExtractionConfig::default()`] on any failure.
    pub fn from_source(source: &dyn ConfigSource) -> Self {
        match source.load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Using default extraction config: {}", e);
                Self::default()
            }
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn y_threshold(mut self, threshold: u32) -> Self {
        self.config.y_threshold = threshold;
        self
    }

    pub fn x_gap(mut self, gap: f64) -> Self {
        self.config.x_gap = gap;
        self
    }

    pub fn debug(mut self, v: bool) -> Self {
        self.config.debug = v;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, CoilScanError> {
        let c = &self.config;
        if !c.x_gap.is_finite() || c.x_gap < 0.0 {
            return Err(CoilScanError::InvalidConfig(format!(
                "x_gap must be a finite, non-negative number, got {}",
                c.x_gap
            )));
        }
        Ok(self.config)
    }
}

// ── Sources ──────────────────────────────────────────────────────────────

/// Anything that can supply an [`ExtractionConfig`].
///
/// Injected at call time so tests and embedders control exactly what the
/// engine sees instead of the engine reaching for global state.
pub trait ConfigSource {
    fn load(&self) -> Result<ExtractionConfig, CoilScanError>;
}

impl ConfigSource for ExtractionConfig {
    fn load(&self) -> Result<ExtractionConfig, CoilScanError> {
        Ok(self.clone())
    }
}

/// The desktop application's JSON config file.
///
/// Recognised keys (all optional, each falling back to its own default):
///
/// ```json
/// {
///   "ocr":   { "y_threshold": 10, "x_col_gap": 40, "debug_format": false },
///   "debug": { "steel_quality": false }
/// }
/// ```
///
/// Debug tracing is on when either flag is truthy.
#[derive(Debug, Clone)]
pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonConfigFile {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }
}

impl ConfigSource for JsonConfigFile {
    fn load(&self) -> Result<ExtractionConfig, CoilScanError> {
        let path = &self.path;
        if !path.exists() {
            return Err(CoilScanError::ConfigNotFound { path: path.clone() });
        }
        let raw = std::fs::read_to_string(path).map_err(|source| CoilScanError::ConfigRead {
            path: path.clone(),
            source,
        })?;
        let value: Value =
            serde_json::from_str(&raw).map_err(|source| CoilScanError::ConfigParse {
                path: path.clone(),
                source,
            })?;
        debug!("Loaded config file: {}", path.display());
        Ok(config_from_value(&value))
    }
}

/// Map the application config document onto [`ExtractionConfig`].
///
/// Missing or mistyped keys keep their defaults individually.
pub fn config_from_value(value: &Value) -> ExtractionConfig {
    let ocr = value.get("ocr");
    let key = |section: Option<&Value>, name: &str| section.and_then(|s| s.get(name)).cloned();

    let y_threshold = key(ocr, "y_threshold")
        .as_ref()
        .and_then(as_threshold)
        .unwrap_or(DEFAULT_Y_THRESHOLD);
    let x_gap = key(ocr, "x_col_gap")
        .as_ref()
        .and_then(as_gap)
        .unwrap_or(DEFAULT_X_GAP);
    let debug = key(ocr, "debug_format").as_ref().is_some_and(is_truthy)
        || key(value.get("debug"), "steel_quality")
            .as_ref()
            .is_some_and(is_truthy);

    ExtractionConfig {
        y_threshold,
        x_gap,
        debug,
    }
}

fn as_threshold(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => match n.as_u64() {
            Some(u) => u32::try_from(u).ok(),
            None => n
                .as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && *f <= u32::MAX as f64)
                .map(|f| f.trunc() as u32),
        },
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_gap(v: &Value) -> Option<f64> {
    let gap = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    (gap.is_finite() && gap >= 0.0).then_some(gap)
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
