use egui::{Response, TextEdit, Ui, Widget};
use filterable_core::{FilterEngine, FilterError, FilterHost, FilterTerm};
use itertools::Itertools;

/// Editor for the terms of a [`FilterEngine`]: one line per term plus a line for a new one.
///
/// Errors from filtering are kept and shown until the next successful change.
pub struct FilterBar {
    new_text: String,
    new_columns: String,
    last_error: Option<FilterError>,
}

enum Action {
    SetText(usize, String),
    SetColumns(usize, String),
    Remove(usize),
    Add(FilterTerm),
    Clear,
    BeginUpdate,
    EndUpdate,
}

impl Default for FilterBar {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterBar {
    pub fn new() -> Self {
        FilterBar {
            new_text: String::new(),
            new_columns: String::new(),
            last_error: None,
        }
    }

    pub fn last_error(&self) -> Option<&FilterError> {
        self.last_error.as_ref()
    }

    pub fn show<H: FilterHost + ?Sized>(
        &mut self,
        engine: &mut FilterEngine,
        host: &mut H,
        ui: &mut Ui,
    ) -> Response {
        let mut actions = vec![];
        let resp = ui
            .vertical(|ui| {
                for (idx, term) in engine.terms().enumerate() {
                    ui.horizontal(|ui| {
                        let mut text = term.text().to_owned();
                        let mut columns = term.columns().to_owned();
                        ui.label("Contains");
                        if TextEdit::singleline(&mut text)
                            .desired_width(160.)
                            .ui(ui)
                            .changed()
                        {
                            actions.push(Action::SetText(idx, text));
                        }
                        ui.label("in");
                        if TextEdit::singleline(&mut columns)
                            .desired_width(160.)
                            .ui(ui)
                            .changed()
                        {
                            actions.push(Action::SetColumns(idx, columns));
                        }
                        if ui.small_button("✖").on_hover_text("Remove filter").clicked() {
                            actions.push(Action::Remove(idx));
                        }
                    });
                }

                ui.horizontal(|ui| {
                    ui.label("Contains");
                    TextEdit::singleline(&mut self.new_text)
                        .hint_text("text|other text")
                        .desired_width(160.)
                        .ui(ui);
                    ui.label("in");
                    TextEdit::singleline(&mut self.new_columns)
                        .hint_text("Column|Other column")
                        .desired_width(160.)
                        .ui(ui);
                    if ui.button("Add filter").clicked() {
                        actions.push(Action::Add(FilterTerm::new(
                            std::mem::take(&mut self.new_text),
                            std::mem::take(&mut self.new_columns),
                        )));
                    }
                });

                ui.horizontal(|ui| {
                    let mut batch_edit = engine.is_updating();
                    if ui.checkbox(&mut batch_edit, "Batch edit").changed() {
                        actions.push(if batch_edit {
                            Action::BeginUpdate
                        } else {
                            Action::EndUpdate
                        });
                    }
                    if ui
                        .add_enabled(!engine.is_empty(), egui::Button::new("Clear"))
                        .clicked()
                    {
                        actions.push(Action::Clear);
                    }
                    if engine.is_dirty() {
                        ui.weak("changes pending");
                    } else if !engine.is_empty() {
                        let summary = engine.terms().map(|t| t.to_string()).join(" and ");
                        ui.weak(summary);
                    }
                });

                if let Some(e) = &self.last_error {
                    ui.colored_label(ui.visuals().error_fg_color, e.to_string());
                }
            })
            .response;

        self.apply_all(actions, engine, host);
        resp
    }

    /// Edits refer to term indices as shown this frame, so removals go last, highest index first.
    fn apply_all<H: FilterHost + ?Sized>(
        &mut self,
        mut actions: Vec<Action>,
        engine: &mut FilterEngine,
        host: &mut H,
    ) {
        actions.sort_by_key(|action| match action {
            Action::Remove(idx) => (1, usize::MAX - idx),
            Action::Clear => (2, 0),
            _ => (0, 0),
        });
        for action in actions {
            self.apply(action, engine, host);
        }
    }

    fn apply<H: FilterHost + ?Sized>(
        &mut self,
        action: Action,
        engine: &mut FilterEngine,
        host: &mut H,
    ) {
        let result = match action {
            Action::SetText(idx, text) => match engine.term_mut(host, idx) {
                Some(mut term) => term.set_text(text),
                None => Ok(()),
            },
            Action::SetColumns(idx, columns) => match engine.term_mut(host, idx) {
                Some(mut term) => term.set_columns(columns),
                None => Ok(()),
            },
            Action::Remove(idx) => engine.remove_term_at(host, idx).map(|_| ()),
            Action::Add(term) => engine.add_term(host, term).map(|_| ()),
            Action::Clear => engine.clear_terms(host).map(|_| ()),
            Action::BeginUpdate => {
                engine.begin_update();
                Ok(())
            }
            Action::EndUpdate => engine.end_update(host),
        };
        self.last_error = result.err();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filterable_core::{MemoryGrid, RowIdx};

    fn grid() -> MemoryGrid {
        let mut grid = MemoryGrid::new(["Name", "City"]);
        grid.push_row([Some("Alice"), Some("Rome")]);
        grid.push_row([Some("Bob"), Some("Milan")]);
        grid
    }

    #[test]
    fn removing_a_term_after_an_edit_in_the_same_frame() {
        let mut grid = grid();
        let mut engine = FilterEngine::new();
        let mut bar = FilterBar::new();
        bar.apply(Action::Add(FilterTerm::new("bob", "Name")), &mut engine, &mut grid);
        bar.apply(Action::SetText(0, "ali".into()), &mut engine, &mut grid);
        assert_eq!(grid.visible_rows().collect::<Vec<_>>(), vec![RowIdx(0)]);
        bar.apply(Action::Remove(0), &mut engine, &mut grid);
        bar.apply(Action::SetColumns(0, "City".into()), &mut engine, &mut grid);
        assert!(engine.is_empty());
        assert_eq!(grid.visible_rows().count(), 2);
        assert!(bar.last_error().is_none());
    }

    #[test]
    fn removal_and_later_edit_in_one_frame_touch_the_right_terms() {
        let mut grid = grid();
        let mut engine = FilterEngine::new();
        let mut bar = FilterBar::new();
        bar.apply(Action::Add(FilterTerm::new("a", "Name")), &mut engine, &mut grid);
        bar.apply(Action::Add(FilterTerm::new("o", "Name")), &mut engine, &mut grid);
        bar.apply(Action::Add(FilterTerm::new("i", "Name")), &mut engine, &mut grid);

        bar.apply_all(
            vec![
                Action::Remove(0),
                Action::SetText(2, "b".into()),
                Action::Remove(1),
            ],
            &mut engine,
            &mut grid,
        );
        let terms: Vec<FilterTerm> = engine.terms().cloned().collect();
        assert_eq!(terms, vec![FilterTerm::new("b", "Name")]);
        assert_eq!(grid.visible_rows().collect::<Vec<_>>(), vec![RowIdx(1)]);
    }

    #[test]
    fn batch_state_follows_engine() {
        let mut grid = grid();
        let mut engine = FilterEngine::new();
        let mut bar = FilterBar::new();
        engine.begin_update();
        bar.apply(Action::Add(FilterTerm::new("bob", "Name")), &mut engine, &mut grid);
        // Host ended the batch itself, the bar does not keep a copy of the flag.
        engine.end_update(&mut grid).unwrap();
        assert!(!engine.is_updating());
        assert_eq!(grid.visible_rows().collect::<Vec<_>>(), vec![RowIdx(1)]);
    }

    #[test]
    fn error_is_kept_until_fixed() {
        let mut grid = grid();
        let mut engine = FilterEngine::new();
        let mut bar = FilterBar::new();
        bar.apply(Action::Add(FilterTerm::new("a", "Nmae")), &mut engine, &mut grid);
        assert!(matches!(
            bar.last_error(),
            Some(FilterError::UnknownColumn { .. })
        ));
        bar.apply(Action::SetColumns(0, "Name".into()), &mut engine, &mut grid);
        assert!(bar.last_error().is_none());
    }

    #[test]
    fn batch_toggle() {
        let mut grid = grid();
        let mut engine = FilterEngine::new();
        let mut bar = FilterBar::new();
        bar.apply(Action::BeginUpdate, &mut engine, &mut grid);
        bar.apply(Action::Add(FilterTerm::new("bob", "Name")), &mut engine, &mut grid);
        assert_eq!(grid.visible_rows().count(), 2);
        bar.apply(Action::EndUpdate, &mut engine, &mut grid);
        assert_eq!(grid.visible_rows().collect::<Vec<_>>(), vec![RowIdx(1)]);
        bar.apply(Action::Clear, &mut engine, &mut grid);
        assert_eq!(grid.visible_rows().count(), 2);
    }
}
