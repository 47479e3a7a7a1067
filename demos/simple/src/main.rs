use egui_filterable::filterable_core::{
    CsvImporterConfig, FilterEngine, FilterTerm, MemoryGrid, Separator,
};
use egui_filterable::{FilterBar, GridView};
use strum::IntoEnumIterator;

struct SimpleApp {
    grid: MemoryGrid,
    engine: FilterEngine,
    filter_bar: FilterBar,
    viewer: GridView,
    csv_config: CsvImporterConfig,
    status: Option<String>,
}

impl Default for SimpleApp {
    fn default() -> Self {
        let mut grid = MemoryGrid::new(["Name", "City", "Country"]);
        for (name, city, country) in [
            ("Alice", "Rome", "Italy"),
            ("Bob", "Milan", "Italy"),
            ("Carol", "Lyon", "France"),
            ("Dave", "Paris", "France"),
            ("Erin", "Porto", "Portugal"),
        ] {
            grid.push_row([Some(name), Some(city), Some(country)]);
        }
        grid.push_row([Some("Frank"), None, None]);
        grid.set_template_row(true);

        let mut engine = FilterEngine::new();
        let status = engine
            .add_term(&mut grid, FilterTerm::new("ita|fra", "Country"))
            .err()
            .map(|e| e.to_string());
        Self {
            grid,
            engine,
            filter_bar: FilterBar::new(),
            viewer: GridView::new(),
            csv_config: Default::default(),
            status,
        }
    }
}

impl SimpleApp {
    #[cfg(target_arch = "wasm32")]
    fn open_csv_button(&mut self, _ui: &mut egui::Ui) {}

    #[cfg(not(target_arch = "wasm32"))]
    fn open_csv_button(&mut self, ui: &mut egui::Ui) {
        if ui.button("Open CSV…").clicked() {
            self.open_csv();
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn open_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv", "tsv", "txt"])
            .pick_file()
        else {
            return;
        };
        let loaded = std::fs::File::open(&path)
            .map_err(egui_filterable::importers::ImportError::from)
            .and_then(|file| egui_filterable::importers::load_csv(file, &self.csv_config));
        match loaded {
            Ok(grid) => {
                self.grid = grid;
                // Terms may name columns of the previous file.
                self.status = self
                    .engine
                    .filter(&mut self.grid)
                    .err()
                    .map(|e| e.to_string());
            }
            Err(e) => {
                log::warn!("Failed to load {path:?}: {e}");
                self.status = Some(e.to_string());
            }
        }
    }
}

impl eframe::App for SimpleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("MenuBar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                egui::widgets::global_theme_preference_buttons(ui);

                ui.separator();

                egui::ComboBox::from_label("Separator")
                    .selected_text(self.csv_config.separator.to_string())
                    .show_ui(ui, |ui| {
                        for separator in Separator::iter() {
                            ui.selectable_value(
                                &mut self.csv_config.separator,
                                separator,
                                separator.to_string(),
                            );
                        }
                    });
                ui.checkbox(&mut self.csv_config.has_headers, "Headers");

                self.open_csv_button(ui);
            })
        });

        egui::TopBottomPanel::top("Filters").show(ctx, |ui| {
            self.filter_bar.show(&mut self.engine, &mut self.grid, ui);
            if let Some(status) = &self.status {
                ui.colored_label(ui.visuals().warn_fg_color, status);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.viewer.show(&mut self.grid, ui);
        });
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use eframe::App;

    env_logger::init();

    eframe::run_simple_native(
        "Filterable Grid Demo",
        eframe::NativeOptions {
            centered: true,
            ..Default::default()
        },
        {
            let mut app = SimpleApp::default();
            move |ctx, frame| {
                app.update(ctx, frame);
            }
        },
    )
    .unwrap();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Redirect `log` message to `console.log` and friends:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let start_result = eframe::WebRunner::new()
            .start(
                "the_canvas_id",
                web_options,
                Box::new(|_cc| Ok(Box::new(SimpleApp::default()))),
            )
            .await;

        // Remove the loading text and spinner:
        let loading_text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("loading_text"));
        if let Some(loading_text) = loading_text {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p> The app has crashed. See the developer console for details. </p>",
                    );
                    panic!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}
