use trellis_core::{ArgMap, Value};

use crate::widget_spec::{TemplateRows, WidgetSpec};

/// Lays a flat sequence out in rows of given lengths.
///
/// The last length repeats for as many extra rows as needed, so
/// `Autogrid::new([2])` arranges any number of items two per row.
///
/// ```rust
/// use trellis_ui::Autogrid;
///
/// let grid = Autogrid::new([1, 3]);
/// assert_eq!(grid.coordinates(6), [(0, 0), (1, 0), (1, 1), (1, 2), (2, 0), (2, 1)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Autogrid {
    row_lengths: Vec<usize>,
}

/// Extra positioning options for [`Autogrid::arrange`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrangeArgs {
    /// Options for the item at the same index.
    pub per_item: Vec<ArgMap>,
    /// Options for items past the end of `per_item`.
    pub fill: ArgMap,
    /// Options for every item; these win over everything else.
    pub all: ArgMap,
}

impl Autogrid {
    /// Zero lengths are ignored; with no positive length every row holds one item.
    pub fn new(row_lengths: impl IntoIterator<Item = usize>) -> Self {
        let mut row_lengths: Vec<usize> = row_lengths.into_iter().filter(|&n| n > 0).collect();
        if row_lengths.is_empty() {
            row_lengths.push(1);
        }
        Self { row_lengths }
    }

    pub fn row_lengths(&self) -> &[usize] {
        &self.row_lengths
    }

    /// `(row, column)` of the item at `index`.
    pub fn position(&self, index: usize) -> (usize, usize) {
        let mut start = 0;
        for (row, &len) in self.row_lengths.iter().enumerate() {
            if index < start + len {
                return (row, index - start);
            }
            start += len;
        }
        let last = self.row_lengths[self.row_lengths.len() - 1];
        let extra = index - start;
        (self.row_lengths.len() + extra / last, extra % last)
    }

    pub fn coordinates(&self, count: usize) -> Vec<(usize, usize)> {
        (0..count).map(|i| self.position(i)).collect()
    }

    /// Pairs each item with its positioning options.
    ///
    /// Each map holds `row` and `column`, overlaid by the item's entry in
    /// `per_item` (or `fill`), overlaid by `all`.
    pub fn arrange<T>(
        &self,
        items: impl IntoIterator<Item = T>,
        args: &ArrangeArgs,
    ) -> Vec<(T, ArgMap)> {
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let (row, column) = self.position(i);
                let mut map = ArgMap::new();
                map.insert("row".into(), Value::from(row));
                map.insert("column".into(), Value::from(column));
                let own = args.per_item.get(i).unwrap_or(&args.fill);
                map.extend(own.iter().map(|(k, v)| (k.clone(), v.clone())));
                map.extend(args.all.iter().map(|(k, v)| (k.clone(), v.clone())));
                (item, map)
            })
            .collect()
    }

    /// Reshapes a flat list of cells into template rows.
    pub fn rows(&self, cells: impl IntoIterator<Item = Option<WidgetSpec>>) -> TemplateRows {
        let mut rows = TemplateRows::new();
        for (i, cell) in cells.into_iter().enumerate() {
            let (row, _) = self.position(i);
            if rows.len() <= row {
                rows.resize_with(row + 1, Vec::new);
            }
            rows[row].push(cell);
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_length_repeats() {
        let grid = Autogrid::new([2]);
        assert_eq!(grid.coordinates(5), [(0, 0), (0, 1), (1, 0), (1, 1), (2, 0)]);
    }

    #[test]
    fn last_length_repeats_after_explicit_rows() {
        let grid = Autogrid::new([3, 1, 2]);
        assert_eq!(grid.position(3), (1, 0));
        assert_eq!(grid.position(4), (2, 0));
        assert_eq!(grid.position(6), (3, 0));
        assert_eq!(grid.position(9), (4, 1));
    }

    #[test]
    fn zero_lengths_are_ignored() {
        assert_eq!(Autogrid::new([0, 2]).row_lengths(), [2]);
        assert_eq!(Autogrid::new([]).row_lengths(), [1]);
    }

    #[test]
    fn arrange_layers_options() {
        let grid = Autogrid::new([2]);
        let mut first = ArgMap::new();
        first.insert("sticky".into(), "w".into());
        first.insert("column".into(), 5.into());
        let mut fill = ArgMap::new();
        fill.insert("sticky".into(), "e".into());
        let mut all = ArgMap::new();
        all.insert("padx".into(), 2.into());
        let args = ArrangeArgs { per_item: vec![first], fill, all };

        let out = grid.arrange(["a", "b", "c"], &args);
        assert_eq!(out[0].1.get("column"), Some(&Value::Int(5)));
        assert_eq!(out[0].1.get("sticky"), Some(&Value::from("w")));
        assert_eq!(out[1].1.get("sticky"), Some(&Value::from("e")));
        assert_eq!(out[2].1.get("row"), Some(&Value::Int(1)));
        assert!(out.iter().all(|(_, m)| m.get("padx") == Some(&Value::Int(2))));
    }

    #[test]
    fn rows_reshapes_cells() {
        let cell = Some(WidgetSpec::new("Label"));
        let rows = Autogrid::new([1, 2]).rows(vec![cell.clone(), None, cell.clone(), cell]);
        let widths: Vec<_> = rows.iter().map(Vec::len).collect();
        assert_eq!(widths, [1, 2, 1]);
        assert!(rows[1][0].is_none());
    }
}
