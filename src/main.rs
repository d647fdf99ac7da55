// Timepane
// Main entry point

use std::sync::Arc;

use timepane::services::command::{CommandParser, UnconfiguredParser};
use timepane::services::prefs::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
use timepane::services::store::{HttpEventStore, MemoryEventStore, SharedStore, StoreError};
use timepane::ui_egui::TimepaneApp;

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting Timepane");

    let store: SharedStore = match build_store() {
        Ok(store) => store,
        Err(err) => {
            log::error!("Could not set up the remote store ({err}); using in-memory demo data");
            Arc::new(MemoryEventStore::sample_week())
        }
    };
    let parser: Arc<dyn CommandParser> = Arc::new(UnconfiguredParser);
    let prefs = build_prefs();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(egui::vec2(1200.0, 800.0))
            .with_min_inner_size(egui::vec2(800.0, 600.0)),
        ..Default::default()
    };

    eframe::run_native(
        "Timepane",
        options,
        Box::new(move |cc| Ok(Box::new(TimepaneApp::new(cc, store, parser, prefs)))),
    )
}

/// HTTP store when a token is configured, demo data otherwise.
///
/// Token acquisition and refresh belong to an external setup flow; the
/// app only consumes a ready bearer token.
fn build_store() -> Result<SharedStore, StoreError> {
    match std::env::var("TIMEPANE_API_TOKEN") {
        Ok(token) if !token.is_empty() => {
            let mut store = HttpEventStore::new(token)?;
            if let Ok(base_url) = std::env::var("TIMEPANE_API_BASE") {
                store = store.with_base_url(base_url);
            }
            if let Ok(calendar_id) = std::env::var("TIMEPANE_CALENDAR_ID") {
                store = store.with_calendar_id(calendar_id);
            }
            Ok(Arc::new(store))
        }
        _ => {
            log::warn!("TIMEPANE_API_TOKEN not set; running against in-memory demo data");
            Ok(Arc::new(MemoryEventStore::sample_week()))
        }
    }
}

fn build_prefs() -> Box<dyn PreferenceStore> {
    match FilePreferenceStore::default_path() {
        Some(path) => {
            log::info!("Preferences at {}", path.display());
            Box::new(FilePreferenceStore::open(path))
        }
        None => {
            log::warn!("No config directory available; preferences will not persist");
            Box::new(MemoryPreferenceStore::new())
        }
    }
}
