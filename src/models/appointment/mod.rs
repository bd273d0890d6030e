// Appointment module
// Time-stamped appointment records rendered on the day grid

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label shown when an appointment carries no display label of its own.
pub const DEFAULT_LABEL: &str = "Appointment";

/// Opaque appointment identifier supplied by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(pub String);

impl AppointmentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AppointmentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Lifecycle status of an appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
    Rescheduled,
    Waitlist,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 7] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
        AppointmentStatus::Rescheduled,
        AppointmentStatus::Waitlist,
    ];

    /// Human readable name used in headers and tooltips
    pub fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::InProgress => "In Progress",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::NoShow => "No Show",
            AppointmentStatus::Rescheduled => "Rescheduled",
            AppointmentStatus::Waitlist => "Waitlist",
        }
    }
}

/// A single appointment as loaded for the displayed day.
///
/// Timed appointments satisfy `start < end`. All-day appointments carry
/// `start == end` and never take part in the time-grid layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Appointment {
    /// Create a timed appointment
    ///
    /// # Examples
    /// ```
    /// use rust_day_schedule::models::appointment::Appointment;
    /// use chrono::{Duration, Local};
    ///
    /// let start = Local::now();
    /// let appointment = Appointment::new("apt-1", start, start + Duration::minutes(30)).unwrap();
    /// assert_eq!(appointment.duration_minutes(), 30);
    /// ```
    pub fn new(
        id: impl Into<String>,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<Self, String> {
        let appointment = Self {
            id: AppointmentId::new(id),
            start,
            end,
            is_all_day: false,
            status: AppointmentStatus::Scheduled,
            label: None,
            color: None,
        };
        appointment.validate()?;
        Ok(appointment)
    }

    /// Create a builder for appointments with optional fields
    pub fn builder() -> AppointmentBuilder {
        AppointmentBuilder::new()
    }

    /// Validate the time range invariant
    pub fn validate(&self) -> Result<(), String> {
        if self.id.as_str().trim().is_empty() {
            return Err("Appointment id cannot be empty".to_string());
        }

        if self.is_all_day {
            if self.start != self.end {
                return Err("All-day appointment must have equal start and end".to_string());
            }
        } else if self.end <= self.start {
            return Err("Appointment end time must be after start time".to_string());
        }

        Ok(())
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Half-open interval overlap; touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Appointment) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .unwrap_or(DEFAULT_LABEL)
    }
}

/// Builder for creating appointments with optional fields
pub struct AppointmentBuilder {
    id: Option<String>,
    start: Option<DateTime<Local>>,
    end: Option<DateTime<Local>>,
    is_all_day: bool,
    status: AppointmentStatus,
    label: Option<String>,
    color: Option<String>,
}

impl AppointmentBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            start: None,
            end: None,
            is_all_day: false,
            status: AppointmentStatus::Scheduled,
            label: None,
            color: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn start(mut self, start: DateTime<Local>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: DateTime<Local>) -> Self {
        self.end = Some(end);
        self
    }

    /// Mark as all-day; the end is forced to the start.
    pub fn all_day(mut self, all_day: bool) -> Self {
        self.is_all_day = all_day;
        self
    }

    pub fn status(mut self, status: AppointmentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the color tag (hex format, passed through to rendering)
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn build(self) -> Result<Appointment, String> {
        let id = self.id.ok_or("Appointment id is required")?;
        let start = self.start.ok_or("Appointment start time is required")?;
        let end = if self.is_all_day {
            start
        } else {
            self.end.ok_or("Appointment end time is required")?
        };

        let appointment = Appointment {
            id: AppointmentId::new(id),
            start,
            end,
            is_all_day: self.is_all_day,
            status: self.status,
            label: self.label,
            color: self.color,
        };

        appointment.validate()?;
        Ok(appointment)
    }
}

impl Default for AppointmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 10, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_new_appointment_success() {
        let appointment = Appointment::new("a", at(9, 0), at(10, 0)).unwrap();
        assert_eq!(appointment.id, AppointmentId::from("a"));
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert!(!appointment.is_all_day);
        assert_eq!(appointment.duration_minutes(), 60);
    }

    #[test]
    fn test_new_appointment_rejects_inverted_range() {
        let result = Appointment::new("a", at(10, 0), at(9, 0));
        assert_eq!(
            result.unwrap_err(),
            "Appointment end time must be after start time"
        );
    }

    #[test]
    fn test_new_appointment_rejects_empty_range() {
        assert!(Appointment::new("a", at(10, 0), at(10, 0)).is_err());
    }

    #[test]
    fn test_builder_all_day_forces_equal_bounds() {
        let appointment = Appointment::builder()
            .id("holiday")
            .start(at(0, 0))
            .end(at(23, 0))
            .all_day(true)
            .build()
            .unwrap();

        assert!(appointment.is_all_day);
        assert_eq!(appointment.start, appointment.end);
    }

    #[test]
    fn test_builder_missing_id() {
        let result = Appointment::builder().start(at(9, 0)).end(at(10, 0)).build();
        assert_eq!(result.unwrap_err(), "Appointment id is required");
    }

    #[test]
    fn test_builder_missing_end() {
        let result = Appointment::builder().id("a").start(at(9, 0)).build();
        assert_eq!(result.unwrap_err(), "Appointment end time is required");
    }

    #[test]
    fn test_overlap_is_half_open() {
        let a = Appointment::new("a", at(9, 0), at(10, 0)).unwrap();
        let b = Appointment::new("b", at(10, 0), at(11, 0)).unwrap();
        let c = Appointment::new("c", at(9, 30), at(10, 30)).unwrap();

        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_display_label_falls_back() {
        let mut appointment = Appointment::new("a", at(9, 0), at(10, 0)).unwrap();
        assert_eq!(appointment.display_label(), DEFAULT_LABEL);

        appointment.label = Some("   ".to_string());
        assert_eq!(appointment.display_label(), DEFAULT_LABEL);

        appointment.label = Some("Jane Doe".to_string());
        assert_eq!(appointment.display_label(), "Jane Doe");
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        let json = serde_json::to_string(&AppointmentStatus::NoShow).unwrap();
        assert_eq!(json, "\"no-show\"");

        let parsed: AppointmentStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(parsed, AppointmentStatus::InProgress);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "id": "apt-7",
            "start": "2025-03-10T09:00:00Z",
            "end": "2025-03-10T09:45:00Z"
        }"#;
        let appointment: Appointment = serde_json::from_str(json).unwrap();

        assert_eq!(appointment.id.as_str(), "apt-7");
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert!(!appointment.is_all_day);
        assert!(appointment.label.is_none());
        assert_eq!(appointment.duration_minutes(), 45);
    }
}
