// Integration tests for settings and appointment persistence

mod fixtures;

use fixtures::{appointment, day};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use rust_day_schedule::models::appointment::AppointmentStatus;
use rust_day_schedule::models::settings::{CalendarSettings, ColumnWidthPolicy, TimeFormat};
use rust_day_schedule::services::interaction::AppointmentHandler;
use rust_day_schedule::services::settings::SettingsService;
use rust_day_schedule::services::store::AppointmentStore;
use rust_day_schedule::services::time_grid::TimeGrid;

#[test]
fn test_settings_drive_the_time_grid() {
    let dir = TempDir::new().unwrap();
    let service = SettingsService::new(dir.path().join("settings.toml"));

    let mut settings = service.load().unwrap();
    assert_eq!(settings, CalendarSettings::default());
    assert_eq!(TimeGrid::from_settings(&settings).unwrap().slots().len(), 96);

    settings.slot_duration_minutes = 30;
    settings.window_start_hour = 7;
    settings.window_end_hour = 19;
    settings.time_format = TimeFormat::TwentyFourHour;
    settings.column_width_policy = ColumnWidthPolicy::Cluster;
    service.save(&settings).unwrap();

    let loaded = service.load().unwrap();
    assert_eq!(loaded, settings);

    let grid = TimeGrid::from_settings(&loaded).unwrap();
    assert_eq!(grid.slots().len(), 24);
    assert_eq!(grid.slots()[0].label(loaded.time_format), "07:00");
    assert_eq!(grid.window_hours(), 7..19);
}

#[test]
fn test_store_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("appointments.json");

    {
        let mut store = AppointmentStore::load(&path).unwrap();
        store.insert(appointment("review", (9, 0), (10, 0)));
        store.on_create_appointment(day(), 14, 15);
        let review = store.appointments()[0].clone();
        store.on_appointment_drop(&review, day(), 11);
    }

    let reopened = AppointmentStore::load(&path).unwrap();
    let summary: Vec<(String, String, AppointmentStatus)> = reopened
        .appointments()
        .iter()
        .map(|a| (a.id.to_string(), a.start.format("%H:%M").to_string(), a.status))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("review".to_string(), "11:00".to_string(), AppointmentStatus::Scheduled),
            ("apt-1".to_string(), "14:00".to_string(), AppointmentStatus::Scheduled),
        ]
    );
}

#[test]
fn test_appointment_file_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("appointments.json");
    std::fs::write(
        &path,
        r##"{
            "appointments": [
                {
                    "id": "therapy",
                    "start": "2025-06-02T09:00:00+00:00",
                    "end": "2025-06-02T09:45:00+00:00",
                    "status": "in-progress",
                    "label": "Therapy session",
                    "color": "#10b981"
                },
                {
                    "id": "conference",
                    "start": "2025-06-02T00:00:00+00:00",
                    "end": "2025-06-02T00:00:00+00:00",
                    "isAllDay": true
                }
            ]
        }"##,
    )
    .unwrap();

    let store = AppointmentStore::load(&path).unwrap();
    let therapy = &store.appointments()[0];
    assert_eq!(therapy.status, AppointmentStatus::InProgress);
    assert_eq!(therapy.display_label(), "Therapy session");
    assert_eq!(therapy.duration_minutes(), 45);

    let conference = &store.appointments()[1];
    assert!(conference.is_all_day);
    assert_eq!(conference.display_label(), "Appointment");
}
