// Test fixtures - reusable test data
// Provides consistent appointments across the integration tests

#![allow(dead_code)]

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use rust_day_schedule::models::appointment::Appointment;

/// Monday June 2, 2025, a date without DST transitions in common zones
pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

pub fn at(hour: u32, minute: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2025, 6, 2, hour, minute, 0).unwrap()
}

/// Timed appointment on [`day`] from `start` to `end` given as `(hour, minute)`.
pub fn appointment(id: &str, start: (u32, u32), end: (u32, u32)) -> Appointment {
    Appointment::new(id, at(start.0, start.1), at(end.0, end.1)).unwrap()
}

/// Appointment starting `start_minute` past midnight, `duration` minutes long.
pub fn from_minutes(id: &str, start_minute: u32, duration: u32) -> Appointment {
    let start = at(start_minute / 60, start_minute % 60);
    Appointment::new(id, start, start + chrono::Duration::minutes(duration as i64)).unwrap()
}

pub mod scenarios {
    use super::*;

    /// A 09:00-10:00, B 09:30-10:30, C 10:15-11:00
    pub fn overlap_chain() -> Vec<Appointment> {
        vec![
            appointment("A", (9, 0), (10, 0)),
            appointment("B", (9, 30), (10, 30)),
            appointment("C", (10, 15), (11, 0)),
        ]
    }

    /// Back-to-back hour blocks through the morning
    pub fn back_to_back() -> Vec<Appointment> {
        (8..12)
            .map(|hour| appointment(&format!("slot-{hour}"), (hour, 0), (hour + 1, 0)))
            .collect()
    }
}
