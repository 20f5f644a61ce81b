//! Field patterns and defect-text normalisation shared by both paths.
//!
//! Every pattern is compiled once into a `Lazy` static and matched against
//! the whole candidate string (each regex is anchored at both ends).

use once_cell::sync::Lazy;
use regex::Regex;

/// Defect text segments are cut to this many characters.
pub const MAX_DEFECT_CHARS: usize = 40;

/// Grade codes on the flat path are padded to this width for alignment.
pub const GRADE_PAD_WIDTH: usize = 16;

// ── Field patterns ───────────────────────────────────────────────────────────

/// Coil id: letter, 8–10 alphanumerics, letter.
pub static RE_COIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]{8,10}[A-Za-z]$").unwrap());

/// Batch id, strict form: exactly ten digits.
pub static RE_BATCH_STRICT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").unwrap());

/// Batch id, tolerant form: ten uppercase letters or digits.
static RE_BATCH_LEN10: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9]{10}$").unwrap());

/// Grade code character class and length.
static RE_GRADE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9+\-/\s]{2,16}$").unwrap());

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static RE_ASCII_THEN_CJK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z0-9+\-/])([\x{4e00}-\x{9fa5}])").unwrap());

static RE_CJK_THEN_ASCII: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\x{4e00}-\x{9fa5}])([A-Za-z0-9+\-/])").unwrap());

/// Whether `c` is a CJK unified ideograph in the range the tickets use.
pub fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&c)
}

pub fn contains_cjk(s: &str) -> bool {
    s.chars().any(is_cjk)
}

pub fn is_coil(s: &str) -> bool {
    RE_COIL.is_match(s)
}

pub fn is_strict_batch(s: &str) -> bool {
    RE_BATCH_STRICT.is_match(s)
}

/// Ten characters of `[A-Z0-9]` with at least nine digits and at most one
/// letter: a batch id with a single misread digit.
pub fn is_tolerant_batch(s: &str) -> bool {
    if !RE_BATCH_LEN10.is_match(s) {
        return false;
    }
    let digits = s.chars().filter(char::is_ascii_digit).count();
    let letters = s.chars().filter(char::is_ascii_uppercase).count();
    digits >= 9 && letters <= 1
}

/// Grade candidate: `[A-Z0-9+-/ ]{2,16}` with at least one letter and no CJK.
pub fn is_grade(s: &str) -> bool {
    !contains_cjk(s) && RE_GRADE.is_match(s) && s.chars().any(|c| c.is_ascii_uppercase())
}

/// Strip internal whitespace from a selected grade code.
///
/// Strings carrying CJK are returned trimmed but otherwise untouched, as is
/// anything without a letter.
pub fn clean_grade(grade: &str) -> String {
    let trimmed = grade.trim();
    if trimmed.is_empty() || contains_cjk(trimmed) {
        return trimmed.to_string();
    }
    let cleaned = RE_WHITESPACE.replace_all(trimmed, "").into_owned();
    if !cleaned.chars().any(|c| c.is_ascii_alphabetic()) {
        return grade.to_string();
    }
    cleaned
}

// ── Span search ──────────────────────────────────────────────────────────────

/// A run of adjacent tokens whose concatenation satisfied a field pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanMatch {
    /// Index of the first consumed token.
    pub start: usize,
    /// One past the last consumed token.
    pub end: usize,
    /// The tokens joined without separator.
    pub text: String,
}

/// Find the first run of adjacent tokens whose concatenation satisfies
/// `accept`.
///
/// Shorter runs win over longer ones and, for equal length, the leftmost
/// run wins. Runs are `min_span..=max_span` tokens long.
pub fn find_span<S, F>(tokens: &[S], min_span: usize, max_span: usize, accept: F) -> Option<SpanMatch>
where
    S: AsRef<str>,
    F: Fn(&str) -> bool,
{
    let n = tokens.len();
    for span in min_span.max(1)..=max_span.min(n) {
        for start in 0..=n - span {
            let mut text = String::new();
            for t in &tokens[start..start + span] {
                text.push_str(t.as_ref());
            }
            if accept(&text) {
                return Some(SpanMatch {
                    start,
                    end: start + span,
                    text,
                });
            }
        }
    }
    None
}

// ── Defect text ──────────────────────────────────────────────────────────────

/// Insert a space at every ASCII/CJK transition, collapse whitespace, trim.
pub fn insert_boundaries(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let s = RE_ASCII_THEN_CJK.replace_all(text, "$1 $2");
    let s = RE_CJK_THEN_ASCII.replace_all(&s, "$1 $2");
    RE_WHITESPACE.replace_all(&s, " ").trim().to_string()
}

/// Keep at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Boundary-normalise and cap a defect segment.
pub fn normalize_defect(text: &str) -> String {
    truncate_chars(&insert_boundaries(text), MAX_DEFECT_CHARS)
}
