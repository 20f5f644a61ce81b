//! Row clustering: group positioned fragments by vertical centre.

use crate::fragment::TextFragment;

/// A fragment paired with the centre of its quadrilateral.
#[derive(Debug, Clone, Copy)]
pub struct Placed<'a> {
    pub fragment: &'a TextFragment,
    pub cx: f64,
    pub cy: f64,
}

/// Attach centres to every fragment.
///
/// Fragments without a box take the centre of the nearest preceding boxed
/// fragment so they land next to it; a box-less prefix (never produced by
/// the spatial path) sits at the origin.
pub fn place(fragments: &[TextFragment]) -> Vec<Placed<'_>> {
    let mut last = (0.0, 0.0);
    fragments
        .iter()
        .map(|fragment| {
            if let Some(q) = &fragment.bbox {
                last = (q.center_x(), q.center_y());
            }
            Placed {
                fragment,
                cx: last.0,
                cy: last.1,
            }
        })
        .collect()
}

/// Group fragments into rows, top to bottom.
///
/// Fragments are visited in order of vertical centre. A fragment joins the
/// current row when its centre is within `y_threshold` of the row's running
/// reference, which then moves to the midpoint of the two; otherwise it
/// opens a new row. Every input fragment ends up in exactly one row.
pub fn cluster_rows(placed: Vec<Placed<'_>>, y_threshold: f64) -> Vec<Vec<Placed<'_>>> {
    let mut sorted = placed;
    sorted.sort_by(|a, b| a.cy.total_cmp(&b.cy));

    let mut rows = Vec::new();
    let mut current: Vec<Placed<'_>> = Vec::new();
    let mut reference: Option<f64> = None;

    for item in sorted {
        match reference {
            Some(r) if (item.cy - r).abs() > y_threshold => {
                rows.push(std::mem::take(&mut current));
                reference = Some(item.cy);
            }
            Some(r) => reference = Some((r + item.cy) / 2.0),
            None => reference = Some(item.cy),
        }
        current.push(item);
    }
    if !current.is_empty() {
        rows.push(current);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::Quad;

    fn frag(text: &str, x: f64, y: f64) -> TextFragment {
        TextFragment::new(text, Quad::from_coords(x, y, x + 20.0, y + 10.0))
    }

    fn texts(row: &[Placed<'_>]) -> Vec<String> {
        row.iter().map(|p| p.fragment.text.clone()).collect()
    }

    #[test]
    fn test_two_rows() {
        let frags = vec![
            frag("b1", 0.0, 50.0),
            frag("a1", 0.0, 0.0),
            frag("a2", 40.0, 4.0),
            frag("b2", 40.0, 55.0),
        ];
        let rows = cluster_rows(place(&frags), 10.0);
        assert_eq!(rows.len(), 2);
        assert_eq!(texts(&rows[0]), vec!["a1", "a2"]);
        assert_eq!(texts(&rows[1]), vec!["b1", "b2"]);
    }

    #[test]
    fn test_running_midpoint_reference() {
        // Centres 5, 15, 21: 15 joins and moves the reference to 10; 21 is 11 away.
        let frags = vec![frag("a", 0.0, 0.0), frag("b", 0.0, 10.0), frag("c", 0.0, 16.0)];
        let rows = cluster_rows(place(&frags), 10.0);
        assert_eq!(rows.len(), 2);
        assert_eq!(texts(&rows[1]), vec!["c"]);
    }

    #[test]
    fn test_no_fragment_dropped() {
        let frags: Vec<_> = (0..25)
            .map(|i| frag(&i.to_string(), (i % 3) as f64 * 50.0, (i * 7) as f64))
            .collect();
        let rows = cluster_rows(place(&frags), 10.0);
        assert_eq!(rows.iter().map(Vec::len).sum::<usize>(), 25);
    }

    #[test]
    fn test_boxless_fragment_inherits_previous_center() {
        let frags = vec![
            frag("a", 0.0, 0.0),
            TextFragment::line("tail"),
            frag("b", 0.0, 100.0),
        ];
        let placed = place(&frags);
        assert_eq!(placed[1].cy, placed[0].cy);
        let rows = cluster_rows(placed, 10.0);
        assert_eq!(texts(&rows[0]), vec!["a", "tail"]);
    }

    #[test]
    fn test_empty() {
        assert!(cluster_rows(Vec::new(), 10.0).is_empty());
    }
}
