// Day schedule
// Everything the day view needs for one date, derived from the full appointment list

use chrono::{DateTime, Local, NaiveDate};

use crate::models::appointment::{Appointment, AppointmentStatus};
use crate::models::settings::ColumnWidthPolicy;
use crate::services::geometry::{compute_geometry, geometry_for_range, AppointmentGeometry};
use crate::services::interaction::InteractionController;
use crate::services::layout::{compute_layout_with_policy, DayLayout};
use crate::utils::date::fractional_minutes_from_midnight;

/// Upper bound on how far above the now-line the initial scroll stops.
pub const MAX_SCROLL_LEAD: f32 = 200.0;

/// Timed appointments that start on `date`.
pub fn appointments_for_day(appointments: &[Appointment], date: NaiveDate) -> Vec<Appointment> {
    appointments
        .iter()
        .filter(|a| !a.is_all_day && a.start.date_naive() == date)
        .cloned()
        .collect()
}

/// All-day appointments on `date`, for the band above the grid.
pub fn all_day_appointments(appointments: &[Appointment], date: NaiveDate) -> Vec<Appointment> {
    appointments
        .iter()
        .filter(|a| a.is_all_day && a.start.date_naive() == date)
        .cloned()
        .collect()
}

/// Header counts for the displayed day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayStats {
    pub scheduled: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub total: usize,
}

impl DayStats {
    pub fn from_appointments<'a>(appointments: impl IntoIterator<Item = &'a Appointment>) -> Self {
        appointments
            .into_iter()
            .fold(DayStats::default(), |mut stats, appointment| {
                match appointment.status {
                    AppointmentStatus::Scheduled => stats.scheduled += 1,
                    AppointmentStatus::InProgress => stats.in_progress += 1,
                    AppointmentStatus::Completed => stats.completed += 1,
                    _ => {}
                }
                stats.total += 1;
                stats
            })
    }
}

/// Where to scroll the grid when it first shows `displayed_date`.
///
/// Only today scrolls; the now-line lands at most [`MAX_SCROLL_LEAD`] (or a
/// third of the viewport) below the top edge.
pub fn initial_scroll_offset(
    displayed_date: NaiveDate,
    now: DateTime<Local>,
    viewport_height: f32,
    pixels_per_hour: f32,
) -> Option<f32> {
    if now.date_naive() != displayed_date {
        return None;
    }
    let now_pixel = fractional_minutes_from_midnight(now) * pixels_per_hour / 60.0;
    let lead = MAX_SCROLL_LEAD.min(viewport_height / 3.0);
    Some((now_pixel - lead).max(0.0))
}

/// An appointment with the geometry it should be drawn at this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedAppointment<'a> {
    pub appointment: &'a Appointment,
    pub geometry: AppointmentGeometry,
    pub is_dragging: bool,
    pub is_resizing: bool,
}

/// One date's worth of appointments with its overlap layout.
#[derive(Debug, Clone)]
pub struct DaySchedule {
    date: NaiveDate,
    timed: Vec<Appointment>,
    all_day: Vec<Appointment>,
    layout: DayLayout,
}

impl DaySchedule {
    pub fn build(appointments: &[Appointment], date: NaiveDate, policy: ColumnWidthPolicy) -> Self {
        let timed = appointments_for_day(appointments, date);
        let all_day = all_day_appointments(appointments, date);
        let layout = compute_layout_with_policy(&timed, policy);
        log::debug!(
            "Day {} has {} timed and {} all-day appointments",
            date,
            timed.len(),
            all_day.len()
        );

        Self {
            date,
            timed,
            all_day,
            layout,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn timed(&self) -> &[Appointment] {
        &self.timed
    }

    pub fn all_day(&self) -> &[Appointment] {
        &self.all_day
    }

    pub fn layout(&self) -> &DayLayout {
        &self.layout
    }

    /// Counts cover the timed grid only; the all-day band is not included.
    pub fn stats(&self) -> DayStats {
        DayStats::from_appointments(&self.timed)
    }

    /// Geometry for every timed appointment, with an active resize drawn at
    /// its proposed range.
    pub fn placements(
        &self,
        controller: &InteractionController,
        pixels_per_hour: f32,
    ) -> Vec<PlacedAppointment<'_>> {
        let dragged = controller.dragged_appointment();
        let resizing = controller.resizing_appointment();

        self.timed
            .iter()
            .map(|appointment| {
                let assignment = self.layout.get(&appointment.id);
                let geometry = match controller.preview_range(&appointment.id) {
                    Some((start, end)) => geometry_for_range(start, end, assignment, pixels_per_hour),
                    None => compute_geometry(appointment, assignment, pixels_per_hour),
                };
                PlacedAppointment {
                    appointment,
                    geometry,
                    is_dragging: dragged == Some(&appointment.id),
                    is_resizing: resizing == Some(&appointment.id),
                }
            })
            .collect()
    }
}
