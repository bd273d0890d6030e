// Settings module
// Day grid configuration supplied by the settings provider

use serde::{Deserialize, Serialize};

/// Slot durations offered by the settings dialog (minutes)
pub const ALLOWED_SLOT_DURATIONS: [u32; 6] = [5, 10, 15, 20, 30, 60];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "12h")]
    TwelveHour,
    #[serde(rename = "24h")]
    TwentyFourHour,
}

/// How `totalColumns` is derived once columns have been assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnWidthPolicy {
    /// Width from the appointment's direct overlap neighbours only.
    #[default]
    Direct,
    /// Width shared by every member of a transitive overlap cluster.
    Cluster,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    pub slot_duration_minutes: u32,
    pub window_start_hour: u32,
    pub window_end_hour: u32,
    pub time_format: TimeFormat,
    pub column_width_policy: ColumnWidthPolicy,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            slot_duration_minutes: 15,
            window_start_hour: 0,
            window_end_hour: 24,
            time_format: TimeFormat::TwelveHour,
            column_width_policy: ColumnWidthPolicy::Direct,
        }
    }
}

impl CalendarSettings {
    pub fn validate(&self) -> Result<(), String> {
        if !ALLOWED_SLOT_DURATIONS.contains(&self.slot_duration_minutes) {
            return Err(format!(
                "Slot duration must be one of {:?} minutes, got {}",
                ALLOWED_SLOT_DURATIONS, self.slot_duration_minutes
            ));
        }

        if self.window_end_hour > 24 {
            return Err("Window end hour cannot be later than 24".to_string());
        }

        if self.window_start_hour >= self.window_end_hour {
            return Err("Window start hour must be before window end hour".to_string());
        }

        Ok(())
    }
}
