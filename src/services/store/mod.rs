// Appointment store
// In-memory appointment list backed by a JSON file, applying day view intents

use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::appointment::{Appointment, AppointmentId, AppointmentStatus};
use crate::services::interaction::AppointmentHandler;
use crate::utils::date::{local_at_hour, local_at_hour_boundary};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access appointments at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read appointments from {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize appointments: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AppointmentFile {
    #[serde(default)]
    appointments: Vec<Appointment>,
}

#[derive(Debug, Default)]
pub struct AppointmentStore {
    appointments: Vec<Appointment>,
    path: Option<PathBuf>,
    selected: Option<AppointmentId>,
    next_id: u64,
}

impl AppointmentStore {
    pub fn new(appointments: Vec<Appointment>) -> Self {
        Self {
            appointments,
            ..Self::default()
        }
    }

    /// Load from `path`; a missing file gives an empty store that will be
    /// written to `path` on the first change.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mut store = if path.exists() {
            let data = fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            let file: AppointmentFile =
                serde_json::from_str(&data).map_err(|source| StoreError::Json {
                    path: path.clone(),
                    source,
                })?;

            let mut appointments = Vec::with_capacity(file.appointments.len());
            for appointment in file.appointments {
                match appointment.validate() {
                    Ok(()) => appointments.push(appointment),
                    Err(e) => log::warn!("Skipping appointment {}: {}", appointment.id, e),
                }
            }
            log::info!("Loaded {} appointments from {}", appointments.len(), path.display());
            Self::new(appointments)
        } else {
            log::info!("No appointment file at {}, starting empty", path.display());
            Self::default()
        };

        store.path = Some(path);
        Ok(store)
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = AppointmentFile {
            appointments: self.appointments.clone(),
        };
        let data = serde_json::to_string_pretty(&file)?;
        fs::write(path, data).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        Ok(())
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn get(&self, id: &AppointmentId) -> Option<&Appointment> {
        self.appointments.iter().find(|a| &a.id == id)
    }

    pub fn selected(&self) -> Option<&Appointment> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn insert(&mut self, appointment: Appointment) {
        self.appointments.push(appointment);
    }

    fn get_mut(&mut self, id: &AppointmentId) -> Option<&mut Appointment> {
        self.appointments.iter_mut().find(|a| &a.id == id)
    }

    fn generate_id(&mut self) -> AppointmentId {
        loop {
            self.next_id += 1;
            let candidate = AppointmentId::new(format!("apt-{}", self.next_id));
            if self.get(&candidate).is_none() {
                return candidate;
            }
        }
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            log::error!("Failed to save appointments: {}", e);
        }
    }

    fn set_range(&mut self, id: &AppointmentId, start: DateTime<Local>, end: DateTime<Local>) {
        if end <= start {
            log::warn!("Ignoring empty range for appointment {}", id);
            return;
        }
        let Some(appointment) = self.get_mut(id) else {
            log::warn!("Appointment {} is no longer in the store", id);
            return;
        };
        appointment.start = start;
        appointment.end = end;
        self.persist();
    }
}

impl AppointmentHandler for AppointmentStore {
    fn on_appointment_click(&mut self, appointment: &Appointment) {
        self.selected = Some(appointment.id.clone());
    }

    fn on_appointment_drop(&mut self, appointment: &Appointment, new_date: NaiveDate, new_hour: u32) {
        let Some(start) = local_at_hour(new_date, new_hour) else {
            log::warn!("Cannot move {} to {} {:02}:00", appointment.id, new_date, new_hour);
            return;
        };
        let duration = self
            .get(&appointment.id)
            .map_or_else(|| appointment.duration(), Appointment::duration);
        self.set_range(&appointment.id, start, start + duration);
    }

    fn on_create_appointment(&mut self, date: NaiveDate, start_hour: u32, end_hour: u32) {
        let (Some(start), Some(end)) = (
            local_at_hour(date, start_hour),
            local_at_hour_boundary(date, end_hour),
        ) else {
            log::warn!("Cannot create appointment on {} {}-{}", date, start_hour, end_hour);
            return;
        };

        let id = self.generate_id();
        match Appointment::builder()
            .id(id.as_str())
            .start(start)
            .end(end)
            .status(AppointmentStatus::Scheduled)
            .build()
        {
            Ok(appointment) => {
                log::info!("Created appointment {}", appointment.id);
                self.selected = Some(appointment.id.clone());
                self.insert(appointment);
                self.persist();
            }
            Err(e) => log::warn!("Rejected new appointment: {}", e),
        }
    }

    fn on_appointment_resize(
        &mut self,
        appointment: &Appointment,
        new_start: DateTime<Local>,
        new_end: DateTime<Local>,
    ) {
        self.set_range(&appointment.id, new_start, new_end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 2, hour, minute, 0).unwrap()
    }

    fn store_with_one() -> AppointmentStore {
        AppointmentStore::new(vec![Appointment::new("a", at(9, 15), at(10, 45)).unwrap()])
    }

    #[test]
    fn test_drop_keeps_duration() {
        let mut store = store_with_one();
        let original = store.appointments()[0].clone();

        store.on_appointment_drop(&original, day(), 14);

        let moved = &store.appointments()[0];
        assert_eq!(moved.start, at(14, 0));
        assert_eq!(moved.end, at(15, 30));
    }

    #[test]
    fn test_resize_sets_bounds() {
        let mut store = store_with_one();
        let original = store.appointments()[0].clone();

        store.on_appointment_resize(&original, at(9, 0), at(11, 0));
        assert_eq!(store.appointments()[0].start, at(9, 0));
        assert_eq!(store.appointments()[0].end, at(11, 0));

        store.on_appointment_resize(&original, at(11, 0), at(11, 0));
        assert_eq!(store.appointments()[0].end, at(11, 0));
        assert_eq!(store.appointments()[0].start, at(9, 0));
    }

    #[test]
    fn test_create_adds_scheduled_and_selects_it() {
        let mut store = AppointmentStore::default();

        store.on_create_appointment(day(), 23, 24);

        let created = store.selected().unwrap();
        assert_eq!(created.status, AppointmentStatus::Scheduled);
        assert_eq!(created.start.hour(), 23);
        assert_eq!(created.end.date_naive(), day().succ_opt().unwrap());
        assert_eq!(created.duration_minutes(), 60);
    }

    #[test]
    fn test_generated_ids_skip_existing() {
        let mut store = AppointmentStore::new(vec![Appointment::new("apt-1", at(8, 0), at(9, 0)).unwrap()]);

        store.on_create_appointment(day(), 10, 11);

        let ids: Vec<&str> = store.appointments().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["apt-1", "apt-2"]);
    }

    #[test]
    fn test_click_selects() {
        let mut store = store_with_one();
        let original = store.appointments()[0].clone();

        store.on_appointment_click(&original);
        assert_eq!(store.selected().map(|a| a.id.as_str()), Some("a"));

        store.clear_selection();
        assert!(store.selected().is_none());
    }

    #[test]
    fn test_changes_are_written_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("appointments.json");

        let mut store = AppointmentStore::load(&path).unwrap();
        assert!(store.appointments().is_empty());
        store.on_create_appointment(day(), 9, 11);
        assert!(path.exists());

        let reloaded = AppointmentStore::load(&path).unwrap();
        assert_eq!(reloaded.appointments(), store.appointments());
    }

    #[test]
    fn test_invalid_entries_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("appointments.json");
        fs::write(
            &path,
            r#"{"appointments": [
                {"id": "ok", "start": "2025-06-02T09:00:00+00:00", "end": "2025-06-02T10:00:00+00:00"},
                {"id": "backwards", "start": "2025-06-02T10:00:00+00:00", "end": "2025-06-02T09:00:00+00:00"}
            ]}"#,
        )
        .unwrap();

        let store = AppointmentStore::load(&path).unwrap();
        let ids: Vec<&str> = store.appointments().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["ok"]);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("appointments.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(AppointmentStore::load(&path), Err(StoreError::Json { .. })));
    }
}
