//! Token splitting: turn a row of fragments into ordered `(token, x)` pairs.

use super::rows::Placed;

/// Horizontal offset between sibling pieces of one fragment.
const SIBLING_STEP: f64 = 0.0001;

/// Characters that never carry field content on a ticket.
const NOISE_CHARS: &[char] = &[
    '、', '】', '〔', '〕', '[', ']', '{', '}', '(', ')', '<', '>', '“', '”', '‘', '’', '`', '~',
    '!', '@', '#', '$', '%', '^', '&', '*', '_', '=', '?', '\\', '|', ',', ':', ';', '…',
];

/// A token and its approximate horizontal position.
pub type Token = (String, f64);

fn is_noise(piece: &str) -> bool {
    piece.chars().all(|c| NOISE_CHARS.contains(&c))
}

/// Split one fragment's text into whitespace-delimited pieces, dropping
/// pieces made only of noise characters.
pub fn split_fragment_text(text: &str) -> Vec<String> {
    let s = text
        .trim()
        .replace('：', ":")
        .replace('，', ",")
        .replace('；', ";");
    s.split_whitespace()
        .filter(|p| !is_noise(p))
        .map(str::to_string)
        .collect()
}

/// Produce the row's tokens left to right.
///
/// Fragments are ordered by horizontal centre. The pieces of one fragment
/// share its centre, spread by a tiny step so they keep their original
/// left-to-right order through column clustering.
pub fn row_tokens(row: &[Placed<'_>]) -> Vec<Token> {
    let mut sorted: Vec<&Placed<'_>> = row.iter().collect();
    sorted.sort_by(|a, b| a.cx.total_cmp(&b.cx));

    let mut tokens = Vec::new();
    for placed in sorted {
        let parts = split_fragment_text(&placed.fragment.text);
        if parts.is_empty() {
            continue;
        }
        let base = placed.cx - (parts.len() - 1) as f64 * SIBLING_STEP / 2.0;
        tokens.extend(
            parts
                .into_iter()
                .enumerate()
                .map(|(i, p)| (p, base + i as f64 * SIBLING_STEP)),
        );
    }
    tokens
}
