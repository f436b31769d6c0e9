#![warn(clippy::all)]

//! Schnar Map - daily ski conditions on a map of the United States.
//!
//! The app loads a state boundary file and a daily resort conditions feed,
//! draws the states with the Albers USA layout, marks each resort, and lists
//! the same resorts in a conditions table below the map.

#[cfg(not(target_arch = "wasm32"))]
mod cli;
mod data;
mod error;
mod geo;
mod loader;
mod state;
mod ui;

use eframe::egui;
use geo::MapView;
use loader::{LoadChannel, LoadResult};
use state::{AppState, FeedState, SourceConfig};
use std::time::Duration;

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();

    let cli = cli::Cli::parse();
    if let Some(command) = cli.command.clone() {
        return cli::run(command);
    }
    let sources = cli.sources();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Schnar Map")
            .with_inner_size([1100.0, 900.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Schnar Map",
        native_options,
        Box::new(move |cc| Ok(Box::new(SchnarMapApp::new(cc, sources)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start Schnar Map: {e}"))
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();
    let sources = SourceConfig::from_url();

    wasm_bindgen_futures::spawn_local(async move {
        let document = web_sys::window()
            .expect("No window")
            .document()
            .expect("No document");

        let canvas = document
            .get_element_by_id("app_canvas")
            .expect("Failed to find app_canvas")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("app_canvas was not a HtmlCanvasElement");

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(move |cc| Ok(Box::new(SchnarMapApp::new(cc, sources)))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    panic!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Main application state and logic.
pub struct SchnarMapApp {
    /// Application state containing all sub-states
    state: AppState,

    /// Channel for the async feed and boundary loads
    loader: LoadChannel,

    /// Map surface, boundaries and markers
    map_view: MapView,
}

impl SchnarMapApp {
    /// Creates the app and starts both loads.
    pub fn new(cc: &eframe::CreationContext<'_>, sources: SourceConfig) -> Self {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let state = AppState::new(sources);
        ui::apply_theme(&cc.egui_ctx, state.theme.dark_mode);

        log::info!(
            "Loading feed from {} and boundaries from {}",
            state.sources.feed,
            state.sources.geography
        );

        let loader = LoadChannel::new();
        loader.load_geography(cc.egui_ctx.clone(), state.sources.geography.clone());
        loader.load_feed(cc.egui_ctx.clone(), state.sources.feed.clone());

        Self {
            state,
            loader,
            map_view: MapView::new(),
        }
    }

    fn handle_load_result(&mut self, result: LoadResult) {
        apply_load_result(&mut self.state, &mut self.map_view, result);
    }
}

/// Folds a completed load into the app state and the map.
fn apply_load_result(state: &mut AppState, map_view: &mut MapView, result: LoadResult) {
    match result {
        LoadResult::Geography(Ok(layer)) => {
            log::info!("Loaded {} state boundaries", layer.features.len());
            map_view.set_boundaries(layer);
        }
        LoadResult::Geography(Err(e)) => {
            log::error!("Failed to load state boundaries: {}", e);
            state.notifications.error(e.to_string());
        }
        LoadResult::Feed(Ok(records)) => {
            log::info!("Loaded {} resort records", records.len());
            map_view.set_records(&records);

            let loaded_at = chrono::Local::now().format("%H:%M");
            if records.is_empty() {
                state.status_message = format!("No resorts reporting ({})", loaded_at);
                state.notifications.info("No resorts are reporting today");
            } else {
                state.status_message =
                    format!("{} resorts reporting, updated {}", records.len(), loaded_at);
                state
                    .notifications
                    .success(format!("Loaded {} resorts", records.len()));
            }
            state.feed = FeedState::Ready(records);
        }
        LoadResult::Feed(Err(e)) => {
            log::error!("Failed to load resort feed: {}", e);
            state.status_message = format!("Could not load conditions: {}", e);
            state.notifications.error(e.to_string());
            map_view.set_records(&[]);
            state.feed = FeedState::Failed(e.to_string());
        }
    }
}

impl eframe::App for SchnarMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Some(result) = self.loader.try_recv() {
            self.handle_load_result(result);
        }
        self.state.notifications.prune(web_time::Instant::now());

        // Top/bottom panels must be rendered before CentralPanel
        ui::render_top_bar(ctx, &mut self.state);
        ui::render_footer(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui::render_map(ui, &mut self.map_view, self.state.feed.records());
                    ui.add_space(16.0);
                    ui::render_resort_table(ui, self.state.feed.records());
                });
        });

        ui::render_toasts(ctx, &mut self.state.notifications);

        // Keep repainting so toasts expire on time
        if !self.state.notifications.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_feed;
    use crate::error::LoadError;
    use crate::state::notifications::ToastLevel;

    fn app_state() -> AppState {
        AppState::new(SourceConfig::default())
    }

    fn mounted_view() -> MapView {
        let mut view = MapView::new();
        view.mount(800.0);
        view
    }

    #[test]
    fn test_feed_failure_clears_markers() {
        let mut state = app_state();
        let mut view = mounted_view();
        let records = parse_feed(
            "Resort Name,state,72 Hour Snowfall,Base Depth,Trails open,lon,lat\n\
             Alta,UT,4in,80in,116,-111.8,40.6\n",
        )
        .unwrap();
        apply_load_result(&mut state, &mut view, LoadResult::Feed(Ok(records)));
        assert_eq!(view.surface().unwrap().markers.len(), 1);
        assert_eq!(state.feed.records().len(), 1);

        let err = LoadError::fetch("./feed.csv", "connection refused");
        apply_load_result(&mut state, &mut view, LoadResult::Feed(Err(err)));

        assert!(matches!(state.feed, FeedState::Failed(_)));
        assert!(state.feed.records().is_empty());
        assert!(view.surface().unwrap().markers.is_empty());
        assert!(state.status_message.starts_with("Could not load conditions"));
        let last = state.notifications.toasts().last().unwrap();
        assert_eq!(last.level, ToastLevel::Error);
    }

    #[test]
    fn test_empty_feed_is_ready() {
        let mut state = app_state();
        let mut view = mounted_view();

        apply_load_result(&mut state, &mut view, LoadResult::Feed(Ok(Vec::new())));

        assert!(matches!(&state.feed, FeedState::Ready(records) if records.is_empty()));
        assert!(!state.feed.is_loading());
        assert!(view.surface().unwrap().markers.is_empty());
        assert!(state.status_message.starts_with("No resorts reporting"));
        let last = state.notifications.toasts().last().unwrap();
        assert_eq!(last.level, ToastLevel::Info);
    }

    #[test]
    fn test_geography_failure_keeps_feed() {
        let mut state = app_state();
        let mut view = mounted_view();

        let err = LoadError::Geography("not a FeatureCollection".to_string());
        apply_load_result(&mut state, &mut view, LoadResult::Geography(Err(err)));

        assert!(state.feed.is_loading());
        assert!(view.surface().unwrap().shapes.is_empty());
        let last = state.notifications.toasts().last().unwrap();
        assert_eq!(last.level, ToastLevel::Error);
    }
}
