use std::collections::BTreeMap;

use trellis_core::{ArgMap, ObjectId};

/// What occupies one grid cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedWidget {
    /// A deliberate gap in the layout.
    Empty,
    /// A realized object and the positioning arguments it was placed with
    /// (global defaults already merged in; `row`/`column` excluded).
    Placed { widget: ObjectId, grid_args: ArgMap },
}

impl CachedWidget {
    pub fn widget(&self) -> Option<ObjectId> {
        match self {
            CachedWidget::Placed { widget, .. } => Some(*widget),
            CachedWidget::Empty => None,
        }
    }

    pub fn grid_args(&self) -> Option<&ArgMap> {
        match self {
            CachedWidget::Placed { grid_args, .. } => Some(grid_args),
            CachedWidget::Empty => None,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, CachedWidget::Empty)
    }
}

/// Coordinate-keyed record of everything the engine has placed.
///
/// Iteration is row-major: `(0,0), (0,1), ..., (1,0), ...`. Row indices are
/// expected to stay contiguous from 0 to [`max_row`](Self::max_row); gaps
/// within a row are stored as [`CachedWidget::Empty`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridCache {
    cells: BTreeMap<(usize, usize), CachedWidget>,
}

impl GridCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&CachedWidget> {
        self.cells.get(&(row, column))
    }

    /// Overwrites whatever was recorded at `(row, column)`.
    pub fn set(&mut self, row: usize, column: usize, entry: CachedWidget) {
        self.cells.insert((row, column), entry);
    }

    pub fn remove(&mut self, row: usize, column: usize) -> Option<CachedWidget> {
        self.cells.remove(&(row, column))
    }

    /// Highest row with any entry, `None` when empty.
    pub fn max_row(&self) -> Option<usize> {
        self.cells.keys().next_back().map(|&(row, _)| row)
    }

    /// The index a newly appended row gets.
    pub fn next_row(&self) -> usize {
        self.max_row().map_or(0, |r| r + 1)
    }

    /// Number of rows, counting from 0 through `max_row`.
    pub fn row_count(&self) -> usize {
        self.next_row()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &CachedWidget)> {
        self.cells.iter().map(|(&k, v)| (k, v))
    }

    /// Entries of one row, in column order.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, &CachedWidget)> {
        self.cells.range((row, 0)..=(row, usize::MAX)).map(|(&(_, c), v)| (c, v))
    }

    /// Coordinate currently holding `widget`.
    pub fn position_of(&self, widget: ObjectId) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .find(|(_, entry)| entry.widget() == Some(widget))
            .map(|(&k, _)| k)
    }

    /// Owned copy of every entry, row-major.
    pub fn snapshot(&self) -> Vec<((usize, usize), CachedWidget)> {
        self.cells.iter().map(|(&k, v)| (k, v.clone())).collect()
    }

    /// First row index below `max_row` with no entries at all.
    pub fn first_gap(&self) -> Option<usize> {
        let mut expected = 0;
        for &(row, _) in self.cells.keys() {
            if row > expected {
                return Some(expected);
            }
            expected = row + 1;
        }
        None
    }

    pub(crate) fn clear(&mut self) {
        self.cells.clear();
    }
}
