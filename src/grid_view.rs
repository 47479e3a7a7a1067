mod config;

pub use config::GridViewConfig;

use egui::{Response, ScrollArea, Sense, Ui};
use egui_extras::{Column, TableBuilder};
use filterable_core::{CellCoord, ColumnUid, MemoryGrid, RowIdx};

/// Shows rows of a [`MemoryGrid`] that are currently visible. Clicking a cell makes it the grid's
/// current cell, which filtering clears again.
pub struct GridView {
    config: GridViewConfig,
}

impl Default for GridView {
    fn default() -> Self {
        Self::new()
    }
}

impl GridView {
    pub fn new() -> Self {
        GridView {
            config: GridViewConfig::default(),
        }
    }

    pub fn with_config(config: GridViewConfig) -> Self {
        GridView { config }
    }

    pub fn show(&mut self, grid: &mut MemoryGrid, ui: &mut Ui) -> Response {
        let rows: Vec<RowIdx> = grid.visible_rows().collect();
        let columns: Vec<(ColumnUid, String)> = grid
            .columns()
            .map(|(col_uid, name)| (col_uid, name.to_owned()))
            .collect();
        let current = grid.current_cell();
        let mut clicked = None::<CellCoord>;

        let rect = ScrollArea::horizontal()
            .show(ui, |ui| {
                let mut builder = TableBuilder::new(ui)
                    .striped(self.config.striped)
                    .resizable(true)
                    .sense(Sense::click())
                    .max_scroll_height(f32::MAX);
                for _ in &columns {
                    builder =
                        builder.column(Column::auto().at_least(self.config.minimum_column_width));
                }
                builder
                    .header(20., |mut h| {
                        for (_, name) in &columns {
                            h.col(|ui| {
                                ui.strong(name.as_str());
                            });
                        }
                    })
                    .body(|body| {
                        body.rows(self.config.row_height, rows.len(), |mut row| {
                            let row_idx = rows[row.index()];
                            row.set_selected(current.map(|c| c.row) == Some(row_idx));
                            for (col_uid, _) in &columns {
                                let (_, resp) = row.col(|ui| {
                                    ui.label(grid.cell(row_idx, *col_uid).unwrap_or_default());
                                });
                                if resp.clicked() {
                                    clicked = Some((row_idx, *col_uid).into());
                                }
                            }
                        });
                    });
            })
            .inner_rect;

        if let Some(coord) = clicked {
            grid.set_current_cell(Some(coord));
        }
        ui.interact(rect, ui.id().with("grid_view"), Sense::hover())
    }
}
