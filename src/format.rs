//! Output formats and the registry that names them.
//!
//! The surrounding application lets operators pick a format by name from a
//! drop-down. [`FormatRegistry`] is that lookup table: built once, passed by
//! reference, and free of global state.

use crate::config::ExtractionConfig;
use crate::extract::extract;
use crate::fragment::TextFragment;
use tracing::warn;

/// Name of the steel-quality ticket format; also the registry fallback.
pub const STEEL_QUALITY_V1: &str = "steel_quality_v1";

/// Name of the generic line-wrapping text format.
pub const GENERIC_V1: &str = "generic_v1";

/// Turns recognised fragments into display text.
pub trait RecordFormat: Send + Sync {
    /// Registry name, e.g. `"steel_quality_v1"`.
    fn name(&self) -> &'static str;

    fn process(&self, input: &[TextFragment], config: &ExtractionConfig) -> String;
}

/// Coil / batch / grade / defect records from inspection tickets.
#[derive(Debug, Clone, Copy, Default)]
pub struct SteelQualityFormat;

impl RecordFormat for SteelQualityFormat {
    fn name(&self) -> &'static str {
        STEEL_QUALITY_V1
    }

    fn process(&self, input: &[TextFragment], config: &ExtractionConfig) -> String {
        extract(input, config)
    }
}

/// Recognised text as-is, hard-wrapped every `wrap_width` characters.
#[derive(Debug, Clone, Copy)]
pub struct GenericTextFormat {
    pub wrap_width: usize,
}

impl Default for GenericTextFormat {
    fn default() -> Self {
        Self { wrap_width: 30 }
    }
}

impl RecordFormat for GenericTextFormat {
    fn name(&self) -> &'static str {
        GENERIC_V1
    }

    fn process(&self, input: &[TextFragment], _config: &ExtractionConfig) -> String {
        let width = self.wrap_width.max(1);
        let mut lines = Vec::new();
        for fragment in input {
            let chars: Vec<char> = fragment.text.chars().collect();
            if chars.is_empty() {
                lines.push(String::new());
                continue;
            }
            lines.extend(chars.chunks(width).map(|c| c.iter().collect::<String>()));
        }
        lines.join("\n")
    }
}

/// Name → format lookup table.
pub struct FormatRegistry {
    formats: Vec<Box<dyn RecordFormat>>,
}

impl Default for FormatRegistry {
    /// Registry holding [`SteelQualityFormat`] and [`GenericTextFormat`].
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(SteelQualityFormat));
        registry.register(Box::new(GenericTextFormat::default()));
        registry
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.names())
            .finish()
    }
}

impl FormatRegistry {
    /// A registry with no formats.
    pub fn empty() -> Self {
        Self {
            formats: Vec::new(),
        }
    }

    /// Add a format, replacing any format registered under the same name.
    pub fn register(&mut self, format: Box<dyn RecordFormat>) {
        match self.formats.iter().position(|f| f.name() == format.name()) {
            Some(idx) => self.formats[idx] = format,
            None => self.formats.push(format),
        }
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.formats.iter().map(|f| f.name()).collect()
    }

    /// Exact (case-insensitive) lookup.
    pub fn get_strict(&self, name: &str) -> Option<&dyn RecordFormat> {
        let key = name.trim().to_lowercase();
        self.formats
            .iter()
            .find(|f| f.name() == key)
            .map(|f| f.as_ref())
    }

    /// Lookup falling back to `steel_quality_v1` for empty or unknown names.
    ///
    /// Falls back to the built-in [`SteelQualityFormat`] if even that name
    /// has been left out of the registry.
    pub fn get(&self, name: &str) -> &dyn RecordFormat {
        if let Some(format) = self.get_strict(name) {
            return format;
        }
        if !name.trim().is_empty() {
            warn!("Unknown format '{}', using {}", name, STEEL_QUALITY_V1);
        }
        self.get_strict(STEEL_QUALITY_V1)
            .unwrap_or(&SteelQualityFormat)
    }
}
