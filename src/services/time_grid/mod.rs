//! Time grid model for the day view.
//!
//! Generates the ordered slot list for a window of the day and owns the
//! pixel/minute conversions. Geometry, the interaction controller and the
//! now-marker all go through [`PIXELS_PER_HOUR`] so drawn positions and
//! pointer-derived times never disagree.

use thiserror::Error;

use crate::models::settings::{CalendarSettings, TimeFormat};
use crate::utils::date::MINUTES_PER_DAY;

/// Vertical scale of the grid.
pub const PIXELS_PER_HOUR: f32 = 80.0;

/// Granularity of pointer-driven time values.
pub const SNAP_MINUTES: u32 = 15;

/// Largest snapped minute value that still lies inside the day.
pub const LAST_SNAPPED_MINUTE: u32 = MINUTES_PER_DAY - SNAP_MINUTES;

/// Total grid height for a full day.
pub const DAY_HEIGHT: f32 = PIXELS_PER_HOUR * 24.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeGridError {
    #[error("slot duration must be between 1 and 1440 minutes, got {0}")]
    InvalidSlotDuration(u32),
    #[error("window {start}:00-{end}:00 is empty or extends past midnight")]
    InvalidWindow { start: u32, end: u32 },
}

/// A labelled row of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot {
    pub hour: u32,
    pub minute: u32,
}

impl TimeSlot {
    pub fn minutes_from_midnight(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    pub fn is_hour_start(&self) -> bool {
        self.minute == 0
    }

    pub fn label(&self, format: TimeFormat) -> String {
        format_clock_label(self.hour, self.minute, format)
    }
}

/// Produce the ascending, non-overlapping slots covering
/// `[window_start_hour, window_end_hour)` at `slot_duration_minutes` steps.
pub fn generate_slots(
    window_start_hour: u32,
    window_end_hour: u32,
    slot_duration_minutes: u32,
) -> Result<Vec<TimeSlot>, TimeGridError> {
    if slot_duration_minutes == 0 || slot_duration_minutes > MINUTES_PER_DAY {
        return Err(TimeGridError::InvalidSlotDuration(slot_duration_minutes));
    }
    if window_start_hour >= window_end_hour || window_end_hour > 24 {
        return Err(TimeGridError::InvalidWindow {
            start: window_start_hour,
            end: window_end_hour,
        });
    }

    let window_end = window_end_hour * 60;
    let slots = (window_start_hour * 60..window_end)
        .step_by(slot_duration_minutes as usize)
        .map(|minutes| TimeSlot {
            hour: minutes / 60,
            minute: minutes % 60,
        })
        .collect();

    Ok(slots)
}

/// Slots for the configured window, regenerated whenever settings change.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    slots: Vec<TimeSlot>,
    slot_duration_minutes: u32,
    window_start_hour: u32,
    window_end_hour: u32,
}

impl TimeGrid {
    pub fn new(
        window_start_hour: u32,
        window_end_hour: u32,
        slot_duration_minutes: u32,
    ) -> Result<Self, TimeGridError> {
        let slots = generate_slots(window_start_hour, window_end_hour, slot_duration_minutes)?;
        Ok(Self {
            slots,
            slot_duration_minutes,
            window_start_hour,
            window_end_hour,
        })
    }

    pub fn from_settings(settings: &CalendarSettings) -> Result<Self, TimeGridError> {
        Self::new(
            settings.window_start_hour,
            settings.window_end_hour,
            settings.slot_duration_minutes,
        )
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn slot_duration_minutes(&self) -> u32 {
        self.slot_duration_minutes
    }

    pub fn slot_height(&self) -> f32 {
        minutes_to_pixels(self.slot_duration_minutes as f32)
    }

    /// Pixel offset of a slot's top edge from midnight.
    pub fn slot_top(&self, slot: &TimeSlot) -> f32 {
        minutes_to_pixels(slot.minutes_from_midnight() as f32)
    }

    pub fn window_hours(&self) -> std::ops::Range<u32> {
        self.window_start_hour..self.window_end_hour
    }
}

pub fn minutes_to_pixels(minutes: f32) -> f32 {
    minutes * PIXELS_PER_HOUR / 60.0
}

pub fn pixels_to_minutes(pixels: f32) -> f32 {
    pixels * 60.0 / PIXELS_PER_HOUR
}

/// Round to the nearest multiple of [`SNAP_MINUTES`], kept inside `[0, 1440)`.
///
/// Values that would round up to midnight land on the last slot of the day.
pub fn snap_minutes(raw_minutes: f32) -> u32 {
    if !raw_minutes.is_finite() || raw_minutes <= 0.0 {
        return 0;
    }
    let clamped = raw_minutes.min(MINUTES_PER_DAY as f32);
    let step = SNAP_MINUTES as f32;
    let snapped = ((clamped / step).round() * step) as u32;
    snapped.min(LAST_SNAPPED_MINUTE)
}

/// Map a pointer Y offset (relative to the grid's top) to snapped minutes.
pub fn pointer_y_to_minutes(relative_y: f32) -> u32 {
    snap_minutes(pixels_to_minutes(relative_y))
}

/// Hour bucket under a pointer Y offset, clamped to `0..=23`.
pub fn hour_at_y(relative_y: f32) -> u32 {
    if !relative_y.is_finite() || relative_y <= 0.0 {
        return 0;
    }
    ((relative_y / PIXELS_PER_HOUR).floor() as u32).min(23)
}

pub fn format_clock_label(hour: u32, minute: u32, format: TimeFormat) -> String {
    match format {
        TimeFormat::TwentyFourHour => format!("{:02}:{:02}", hour, minute),
        TimeFormat::TwelveHour => {
            let suffix = if hour < 12 { "AM" } else { "PM" };
            let display_hour = match hour % 12 {
                0 => 12,
                h => h,
            };
            format!("{}:{:02} {}", display_hour, minute, suffix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn test_full_day_quarter_hours() {
        let slots = generate_slots(0, 24, 15).unwrap();
        assert_eq!(slots.len(), 96);
        assert_eq!(slots[0], TimeSlot { hour: 0, minute: 0 });
        assert_eq!(slots[95], TimeSlot { hour: 23, minute: 45 });
    }

    #[test]
    fn test_window_is_exact() {
        let slots = generate_slots(8, 17, 30).unwrap();
        assert_eq!(slots.len(), 18);
        assert_eq!(slots.first().unwrap().hour, 8);
        assert_eq!(*slots.last().unwrap(), TimeSlot { hour: 16, minute: 30 });
    }

    #[test]
    fn test_uneven_duration_stops_inside_window() {
        let slots = generate_slots(9, 10, 20).unwrap();
        let minutes: Vec<u32> = slots.iter().map(TimeSlot::minutes_from_midnight).collect();
        assert_eq!(minutes, vec![540, 560, 580]);
    }

    #[test]
    fn test_generation_is_restartable() {
        assert_eq!(generate_slots(0, 24, 10), generate_slots(0, 24, 10));
    }

    #[test]
    fn test_rejects_zero_duration() {
        assert_eq!(
            generate_slots(0, 24, 0),
            Err(TimeGridError::InvalidSlotDuration(0))
        );
    }

    #[test_case(10, 10 ; "empty window")]
    #[test_case(12, 8 ; "inverted window")]
    #[test_case(0, 25 ; "past midnight")]
    fn test_rejects_bad_window(start: u32, end: u32) {
        assert_eq!(
            generate_slots(start, end, 15),
            Err(TimeGridError::InvalidWindow { start, end })
        );
    }

    #[test]
    fn test_time_grid_slot_height_tracks_duration() {
        let grid = TimeGrid::new(0, 24, 30).unwrap();
        assert_eq!(grid.slot_height(), 40.0);
        assert_eq!(grid.slot_top(&TimeSlot { hour: 2, minute: 30 }), 200.0);
    }

    #[test_case(0.0, 0)]
    #[test_case(7.0, 0)]
    #[test_case(7.5, 15)]
    #[test_case(22.0, 15)]
    #[test_case(52.6, 60)]
    #[test_case(1432.0, 1425)]
    #[test_case(1439.0, 1425)]
    #[test_case(5000.0, 1425)]
    #[test_case(-30.0, 0)]
    fn test_snap_minutes(raw: f32, expected: u32) {
        assert_eq!(snap_minutes(raw), expected);
    }

    #[test]
    fn test_pointer_y_uses_grid_scale() {
        // 80 px per hour: 10:00 sits at 800 px.
        assert_eq!(pointer_y_to_minutes(800.0), 600);
        assert_eq!(pointer_y_to_minutes(805.0), 600);
        assert_eq!(pointer_y_to_minutes(815.0), 615);
        assert_eq!(pointer_y_to_minutes(-40.0), 0);
        assert_eq!(pointer_y_to_minutes(DAY_HEIGHT + 100.0), LAST_SNAPPED_MINUTE);
    }

    #[test]
    fn test_hour_at_y() {
        assert_eq!(hour_at_y(0.0), 0);
        assert_eq!(hour_at_y(79.9), 0);
        assert_eq!(hour_at_y(80.0), 1);
        assert_eq!(hour_at_y(DAY_HEIGHT + 10.0), 23);
    }

    #[test_case(0, 0, TimeFormat::TwelveHour, "12:00 AM")]
    #[test_case(9, 5, TimeFormat::TwelveHour, "9:05 AM")]
    #[test_case(12, 30, TimeFormat::TwelveHour, "12:30 PM")]
    #[test_case(13, 15, TimeFormat::TwelveHour, "1:15 PM")]
    #[test_case(13, 15, TimeFormat::TwentyFourHour, "13:15")]
    fn test_format_clock_label(hour: u32, minute: u32, format: TimeFormat, expected: &str) {
        assert_eq!(format_clock_label(hour, minute, format), expected);
    }

    proptest! {
        #[test]
        fn prop_snapped_minutes_are_nearest_multiple_in_day(raw in -100.0f32..2000.0f32) {
            let snapped = snap_minutes(raw);
            prop_assert!(snapped < MINUTES_PER_DAY);
            prop_assert_eq!(snapped % SNAP_MINUTES, 0);

            let clamped = raw.clamp(0.0, LAST_SNAPPED_MINUTE as f32);
            prop_assert!((snapped as f32 - clamped).abs() <= SNAP_MINUTES as f32 / 2.0 + 0.001);
        }

        #[test]
        fn prop_slots_ascending_and_cover_window(
            start in 0u32..23,
            span in 1u32..24,
            duration in prop::sample::select(vec![5u32, 10, 15, 20, 30, 60]),
        ) {
            let end = (start + span).min(24);
            let slots = generate_slots(start, end, duration).unwrap();
            prop_assert_eq!(slots[0].minutes_from_midnight(), start * 60);
            for pair in slots.windows(2) {
                prop_assert_eq!(
                    pair[1].minutes_from_midnight() - pair[0].minutes_from_midnight(),
                    duration
                );
            }
            prop_assert!(slots.last().unwrap().minutes_from_midnight() < end * 60);
        }
    }
}
