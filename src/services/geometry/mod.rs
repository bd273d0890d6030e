//! Positioning calculator: appointment times and layout columns to pixels.

use chrono::{DateTime, Local};

use crate::models::appointment::Appointment;
use crate::services::layout::LayoutAssignment;
use crate::utils::date::minutes_from_midnight;

/// Short appointments are never drawn shorter than this.
pub const MIN_VISIBLE_HEIGHT: f32 = 60.0;
/// Horizontal inset on each side of a full-width appointment.
pub const SINGLE_INSET: f32 = 8.0;
/// Horizontal inset on each side of a column inside a shared row.
pub const COLUMN_INSET: f32 = 4.0;
/// The top resize handle is only offered on blocks at least this tall.
pub const TOP_HANDLE_MIN_HEIGHT: f32 = 80.0;

/// Horizontal placement relative to the day column.
///
/// `left = offset_fraction * width + inset`,
/// `width = width_fraction * width - 2 * inset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalSpan {
    pub offset_fraction: f32,
    pub width_fraction: f32,
    pub inset: f32,
}

impl HorizontalSpan {
    pub fn full_width() -> Self {
        Self {
            offset_fraction: 0.0,
            width_fraction: 1.0,
            inset: SINGLE_INSET,
        }
    }

    /// Resolve against a concrete column width, returning `(left, width)`.
    pub fn resolve(&self, column_width: f32) -> (f32, f32) {
        let left = self.offset_fraction * column_width + self.inset;
        let width = (self.width_fraction * column_width - 2.0 * self.inset).max(0.0);
        (left, width)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppointmentGeometry {
    pub top: f32,
    pub height: f32,
    pub span: HorizontalSpan,
}

impl AppointmentGeometry {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn shows_top_handle(&self) -> bool {
        self.height >= TOP_HANDLE_MIN_HEIGHT
    }
}

pub fn compute_geometry(
    appointment: &Appointment,
    layout: Option<&LayoutAssignment>,
    pixels_per_hour: f32,
) -> AppointmentGeometry {
    geometry_for_range(appointment.start, appointment.end, layout, pixels_per_hour)
}

/// Geometry for an arbitrary range, used for resize previews.
pub fn geometry_for_range(
    start: DateTime<Local>,
    end: DateTime<Local>,
    layout: Option<&LayoutAssignment>,
    pixels_per_hour: f32,
) -> AppointmentGeometry {
    let to_pixels = |minutes: f32| minutes * pixels_per_hour / 60.0;
    let top = to_pixels(minutes_from_midnight(start) as f32);
    let duration_minutes = (end - start).num_minutes().max(0) as f32;
    let height = to_pixels(duration_minutes).max(MIN_VISIBLE_HEIGHT);

    AppointmentGeometry {
        top,
        height,
        span: horizontal_span(layout),
    }
}

pub fn horizontal_span(layout: Option<&LayoutAssignment>) -> HorizontalSpan {
    match layout {
        Some(assignment) if !assignment.is_single() => {
            let total = assignment.total_columns as f32;
            HorizontalSpan {
                offset_fraction: assignment.column as f32 / total,
                width_fraction: 1.0 / total,
                inset: COLUMN_INSET,
            }
        }
        _ => HorizontalSpan::full_width(),
    }
}
