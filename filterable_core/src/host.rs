use crate::{ColumnUid, RowIdx};
use std::borrow::Cow;

/// Grid that rows are filtered in. Implemented by whatever owns the cells, the engine only reads
/// display values and writes row visibility.
pub trait FilterHost {
    /// Returns total row count, including the template row if there is one.
    fn row_count(&self) -> usize;

    /// Trailing insertion placeholder, never filtered.
    fn template_row(&self) -> Option<RowIdx> {
        None
    }

    /// Map column name to its uid. `None` means the column does not exist in this grid.
    fn column_uid(&self, name: &str) -> Option<ColumnUid>;

    /// Display value of a cell, `None` for null cells.
    fn cell_text(&self, row: RowIdx, col_uid: ColumnUid) -> Option<Cow<'_, str>>;

    fn is_row_visible(&self, row: RowIdx) -> bool;
    fn set_row_visible(&mut self, row: RowIdx, visible: bool);

    /// Called before each evaluation pass, so that a row about to be hidden is not left as the
    /// active selection.
    fn clear_current_cell(&mut self) {}

    /// Called after every evaluation pass, also when it stopped early on an error.
    fn on_filtered(&mut self) {}
}
