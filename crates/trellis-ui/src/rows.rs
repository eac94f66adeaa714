//! Structural row mutation of a realized [`Skeleton`].
//!
//! Every operation reads and rewrites the [`GridCache`](crate::GridCache)
//! only; the toolkit is never asked for the current layout. Rows are expected
//! to be contiguous from 0 to `max_row`, which `insert_row_at` and
//! `destroy_row` check before changing anything.
//!
//! A failure part-way through leaves the cells handled before it in place.
//! Entries only ever move into free slots, so every live object keeps a cache
//! position whatever toolkit call fails.

use crate::cache::CachedWidget;
use crate::error::{Phase, Result, SkelError};
use crate::skeleton::Skeleton;
use crate::widget_spec::WidgetSpec;

impl Skeleton {
    /// Realizes `row` below the last existing row and returns its index.
    pub fn append_row(&mut self, row: &[Option<WidgetSpec>]) -> Result<usize> {
        self.ensure_alive()?;
        let new_row = self.cache.next_row();
        log::debug!("rows: appending {} cells at row {new_row}", row.len());
        for (column, cell) in row.iter().enumerate() {
            self.realize_cell(new_row, column, cell.as_ref())?;
        }
        Ok(new_row)
    }

    /// Realizes `row` at `index`, moving every row at or after `index` down
    /// by one. Inserting at the next free index is the same as appending.
    ///
    /// Rows of different widths are reconciled with empty markers: a column
    /// missing from either the new row or the displaced row is recorded as
    /// [`CachedWidget::Empty`].
    pub fn insert_row_at(&mut self, index: usize, row: &[Option<WidgetSpec>]) -> Result<usize> {
        self.ensure_alive()?;
        let rows = self.cache.next_row();
        if index > rows {
            return Err(SkelError::RowOutOfRange { index, rows });
        }
        self.ensure_contiguous()?;
        if index == rows {
            return self.append_row(row);
        }
        log::debug!("rows: inserting {} cells at row {index}", row.len());

        // Bottom row first, so each entry moves into a slot already vacated.
        let below: Vec<_> =
            self.cache.snapshot().into_iter().filter(|((r, _), _)| *r > index).rev().collect();
        for ((r, column), entry) in below {
            self.move_entry(entry, (r, column), r + 1)?;
        }

        let displaced_width = self.cache.row(index).map(|(c, _)| c + 1).max().unwrap_or(0);
        for column in 0..displaced_width.max(row.len()) {
            let displaced = self.cache.get(index, column).cloned().unwrap_or(CachedWidget::Empty);
            self.move_entry(displaced, (index, column), index + 1)?;
            self.realize_cell(index, column, row.get(column).and_then(Option::as_ref))?;
        }
        Ok(index)
    }

    /// Disposes every object in row `index` and moves later rows up by one.
    ///
    /// Labels pointing at a disposed object are removed from the registry.
    /// Each surviving object whose row changed is positioned again with its
    /// stored options.
    pub fn destroy_row(&mut self, index: usize) -> Result<()> {
        self.ensure_alive()?;
        let rows = self.cache.row_count();
        if index >= rows {
            return Err(SkelError::RowOutOfRange { index, rows });
        }
        self.ensure_contiguous()?;
        log::debug!("rows: destroying row {index}");

        let doomed: Vec<_> = self.cache.row(index).map(|(c, e)| (c, e.clone())).collect();
        for (column, entry) in doomed {
            if let Some(widget) = entry.widget() {
                self.created.retain(|label, realized| {
                    let keep = realized.widget() != widget;
                    if !keep {
                        log::trace!("rows: dropping label '{label}'");
                    }
                    keep
                });
                self.toolkit
                    .dispose(widget)
                    .map_err(|e| SkelError::cell(index, column, Phase::Destroying, e))?;
            }
            self.cache.remove(index, column);
        }

        let moved: Vec<_> =
            self.cache.snapshot().into_iter().filter(|((r, _), _)| *r > index).collect();
        for ((r, column), _) in &moved {
            self.cache.remove(*r, *column);
        }
        for ((r, column), entry) in &moved {
            self.cache.set(r - 1, *column, entry.clone());
        }
        for ((r, column), entry) in moved {
            if let CachedWidget::Placed { widget, grid_args } = entry {
                self.toolkit
                    .position(widget, r - 1, column, &grid_args)
                    .map_err(|e| SkelError::cell(r - 1, column, Phase::Gridding, e))?;
            }
        }
        Ok(())
    }

    /// Row of the widget registered under `label`.
    pub fn find_row_of(&self, label: &str) -> Option<usize> {
        let widget = self.created.get(label)?.widget();
        self.cache.position_of(widget).map(|(row, _)| row)
    }

    /// Moves `entry` from `from` down to row `to` of the same column,
    /// positioning placed objects before the cache changes.
    fn move_entry(&mut self, entry: CachedWidget, from: (usize, usize), to: usize) -> Result<()> {
        let column = from.1;
        if let CachedWidget::Placed { widget, grid_args } = &entry {
            self.toolkit
                .position(*widget, to, column, grid_args)
                .map_err(|e| SkelError::cell(to, column, Phase::Gridding, e))?;
        }
        self.cache.remove(from.0, column);
        self.cache.set(to, column, entry);
        Ok(())
    }

    fn ensure_contiguous(&self) -> Result<()> {
        match self.cache.first_gap() {
            Some(row) => Err(SkelError::NonContiguous(row)),
            None => Ok(()),
        }
    }
}
