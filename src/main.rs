// Rust Day Schedule Application
// Main entry point

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use rust_day_schedule::services::settings::SettingsService;
use rust_day_schedule::services::store::AppointmentStore;
use rust_day_schedule::ui_egui::ScheduleApp;

fn resolve_appointments_path() -> PathBuf {
    if let Some(path) = std::env::args_os().nth(1) {
        return PathBuf::from(path);
    }
    match ProjectDirs::from("com", "RustDaySchedule", "DaySchedule") {
        Some(dirs) => dirs.data_dir().join("appointments.json"),
        None => {
            log::warn!("Unable to resolve project directory; using current dir for appointments");
            PathBuf::from("appointments.json")
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    log::info!("Starting Rust Day Schedule");

    let path = resolve_appointments_path();
    let store = AppointmentStore::load(&path)
        .with_context(|| format!("Failed to load appointments from {}", path.display()))?;
    let settings_service = SettingsService::with_default_path();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 800.0])
            .with_min_inner_size([420.0, 480.0])
            .with_title("Day Schedule"),
        ..Default::default()
    };

    eframe::run_native(
        "Day Schedule",
        options,
        Box::new(move |cc| {
            let app = ScheduleApp::new(cc, store, settings_service)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow!("eframe error: {e}"))
}
