//! Column clustering: split a row's tokens at large horizontal gaps.

use super::tokens::Token;

/// Group tokens into columns, left to right.
///
/// A token continues the current column when its distance from the previous
/// token's position is at most `x_gap`; otherwise it opens a new column.
pub fn cluster_columns(tokens: &[Token], x_gap: f64) -> Vec<Vec<String>> {
    let mut sorted: Vec<&Token> = tokens.iter().collect();
    sorted.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut cols = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut last_x: Option<f64> = None;

    for (tok, x) in sorted {
        if last_x.is_some_and(|lx| (x - lx).abs() > x_gap) {
            cols.push(std::mem::take(&mut current));
        }
        current.push(tok.clone());
        last_x = Some(*x);
    }
    if !current.is_empty() {
        cols.push(current);
    }
    cols
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(items: &[(&str, f64)]) -> Vec<Token> {
        items.iter().map(|(t, x)| (t.to_string(), *x)).collect()
    }

    #[test]
    fn test_split_on_gap() {
        let t = toks(&[("A", 0.0), ("B", 30.0), ("C", 100.0), ("D", 139.0)]);
        assert_eq!(
            cluster_columns(&t, 40.0),
            vec![vec!["A", "B"], vec!["C", "D"]]
        );
    }

    #[test]
    fn test_gap_measured_from_previous_token() {
        // Chained small steps stay in one column even though A..D spans 90.
        let t = toks(&[("A", 0.0), ("B", 30.0), ("C", 60.0), ("D", 90.0)]);
        assert_eq!(cluster_columns(&t, 40.0).len(), 1);
    }

    #[test]
    fn test_exact_gap_continues_column() {
        let t = toks(&[("A", 0.0), ("B", 40.0)]);
        assert_eq!(cluster_columns(&t, 40.0).len(), 1);
    }

    #[test]
    fn test_unsorted_input_is_ordered() {
        let t = toks(&[("C", 200.0), ("A", 0.0)]);
        assert_eq!(cluster_columns(&t, 40.0), vec![vec!["A"], vec!["C"]]);
    }

    #[test]
    fn test_empty() {
        assert!(cluster_columns(&[], 40.0).is_empty());
    }
}
