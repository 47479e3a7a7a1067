use crate::host::FilterHost;
use crate::{CellCoord, ColumnUid, RowIdx};
use indexmap::IndexSet;
use log::warn;
use std::borrow::Cow;

/// Rows of nullable string cells kept in memory, with an optional trailing template row.
#[derive(Debug)]
pub struct MemoryGrid {
    /// Column uid is the index in this set.
    columns: IndexSet<String>,
    rows: Vec<GridRow>,
    has_template_row: bool,
    template_row_visible: bool,
    current_cell: Option<CellCoord>,
    one_shot_flags: OneShotFlags,
}

#[derive(Debug)]
struct GridRow {
    cells: Vec<Option<String>>,
    visible: bool,
}

/// One shot flags: reset to false by [`MemoryGrid::take_one_shot_flags`]
#[derive(Default, Copy, Clone, Debug, PartialEq)]
pub struct OneShotFlags {
    /// Set once rows were added or removed
    pub row_set_updated: bool,
    /// Set once when visible row set was recomputed by filtering
    pub visible_rows_updated: bool,
}

impl MemoryGrid {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        let mut grid = MemoryGrid {
            columns: IndexSet::new(),
            rows: vec![],
            has_template_row: false,
            template_row_visible: true,
            current_cell: None,
            one_shot_flags: OneShotFlags::default(),
        };
        for name in columns {
            grid.insert_column(name);
        }
        grid
    }

    /// Append a column, returns existing uid if a column with this name is already present.
    pub fn insert_column(&mut self, name: impl Into<String>) -> ColumnUid {
        let (idx, inserted) = self.columns.insert_full(name.into());
        if !inserted {
            warn!("MemoryGrid: duplicate column name {:?}", self.columns[idx]);
        }
        ColumnUid(idx as u32)
    }

    pub fn columns(&self) -> impl Iterator<Item = (ColumnUid, &str)> + '_ {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, name)| (ColumnUid(idx as u32), name.as_str()))
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_name(&self, col_uid: ColumnUid) -> Option<&str> {
        self.columns.get_index(col_uid.0 as usize).map(|s| s.as_str())
    }

    /// Append a row, values are assigned to columns in order. Missing values are null, extra
    /// values are ignored.
    pub fn push_row<S: Into<String>>(&mut self, values: impl IntoIterator<Item = Option<S>>) -> RowIdx {
        let mut cells: Vec<Option<String>> = values
            .into_iter()
            .take(self.columns.len())
            .map(|v| v.map(Into::into))
            .collect();
        cells.resize(self.columns.len(), None);
        self.rows.push(GridRow {
            cells,
            visible: true,
        });
        self.one_shot_flags.row_set_updated = true;
        RowIdx(self.rows.len() - 1)
    }

    pub fn remove_row(&mut self, row: RowIdx) -> bool {
        if row.0 >= self.rows.len() {
            return false;
        }
        self.rows.remove(row.0);
        self.current_cell = match self.current_cell {
            Some(c) if c.row == row => None,
            // Rows after the removed one shift up by one.
            Some(c) if c.row > row => Some(CellCoord {
                row: RowIdx(c.row.0 - 1),
                ..c
            }),
            c => c,
        };
        self.one_shot_flags.row_set_updated = true;
        true
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.current_cell = None;
        self.one_shot_flags.row_set_updated = true;
    }

    /// Number of rows holding data, template row excluded.
    pub fn data_row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn set_template_row(&mut self, enabled: bool) {
        self.has_template_row = enabled;
    }

    pub fn cell(&self, row: RowIdx, col_uid: ColumnUid) -> Option<&str> {
        self.rows
            .get(row.0)?
            .cells
            .get(col_uid.0 as usize)?
            .as_deref()
    }

    /// Returns false if the cell does not exist. Filtering is not redone, call
    /// [`FilterEngine::filter`](crate::FilterEngine::filter) when done editing.
    pub fn set_cell(&mut self, row: RowIdx, col_uid: ColumnUid, value: Option<String>) -> bool {
        let Some(cell) = self
            .rows
            .get_mut(row.0)
            .and_then(|r| r.cells.get_mut(col_uid.0 as usize))
        else {
            return false;
        };
        *cell = value;
        true
    }

    /// Rows that passed the last filtering, in order.
    pub fn visible_rows(&self) -> impl Iterator<Item = RowIdx> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.visible)
            .map(|(idx, _)| RowIdx(idx))
    }

    pub fn current_cell(&self) -> Option<CellCoord> {
        self.current_cell
    }

    pub fn set_current_cell(&mut self, coord: Option<CellCoord>) {
        self.current_cell = coord;
    }

    pub fn take_one_shot_flags(&mut self) -> OneShotFlags {
        core::mem::take(&mut self.one_shot_flags)
    }
}

impl FilterHost for MemoryGrid {
    fn row_count(&self) -> usize {
        self.rows.len() + usize::from(self.has_template_row)
    }

    fn template_row(&self) -> Option<RowIdx> {
        self.has_template_row.then_some(RowIdx(self.rows.len()))
    }

    fn column_uid(&self, name: &str) -> Option<ColumnUid> {
        self.columns
            .get_index_of(name)
            .map(|idx| ColumnUid(idx as u32))
    }

    fn cell_text(&self, row: RowIdx, col_uid: ColumnUid) -> Option<Cow<'_, str>> {
        self.cell(row, col_uid).map(Cow::Borrowed)
    }

    fn is_row_visible(&self, row: RowIdx) -> bool {
        match self.rows.get(row.0) {
            Some(r) => r.visible,
            None => self.template_row() == Some(row) && self.template_row_visible,
        }
    }

    fn set_row_visible(&mut self, row: RowIdx, visible: bool) {
        if let Some(r) = self.rows.get_mut(row.0) {
            r.visible = visible;
        } else if self.template_row() == Some(row) {
            self.template_row_visible = visible;
        }
    }

    fn clear_current_cell(&mut self) {
        self.current_cell = None;
    }

    fn on_filtered(&mut self) {
        self.one_shot_flags.visible_rows_updated = true;
    }
}
