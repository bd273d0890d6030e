//! Intents emitted when a gesture completes, and the callback surface that
//! receives them.

use chrono::{DateTime, Local, NaiveDate};

use crate::models::appointment::Appointment;

#[derive(Clone, Debug, PartialEq)]
pub enum DayViewIntent {
    Click(Appointment),
    Moved {
        appointment: Appointment,
        date: NaiveDate,
        hour: u32,
    },
    Resized {
        appointment: Appointment,
        start: DateTime<Local>,
        end: DateTime<Local>,
    },
    Created {
        date: NaiveDate,
        start_hour: u32,
        end_hour: u32,
    },
}

impl DayViewIntent {
    /// Forward to the matching callback.
    pub fn dispatch(&self, handler: &mut dyn AppointmentHandler) {
        match self {
            DayViewIntent::Click(appointment) => handler.on_appointment_click(appointment),
            DayViewIntent::Moved {
                appointment,
                date,
                hour,
            } => handler.on_appointment_drop(appointment, *date, *hour),
            DayViewIntent::Resized {
                appointment,
                start,
                end,
            } => handler.on_appointment_resize(appointment, *start, *end),
            DayViewIntent::Created {
                date,
                start_hour,
                end_hour,
            } => handler.on_create_appointment(*date, *start_hour, *end_hour),
        }
    }
}

/// Receiver for day-view intents (selection, move, create, resize).
///
/// Implementations own persistence; the day view fires and forgets.
#[cfg_attr(test, mockall::automock)]
pub trait AppointmentHandler {
    fn on_appointment_click(&mut self, appointment: &Appointment);
    fn on_appointment_drop(&mut self, appointment: &Appointment, new_date: NaiveDate, new_hour: u32);
    fn on_create_appointment(&mut self, date: NaiveDate, start_hour: u32, end_hour: u32);
    fn on_appointment_resize(
        &mut self,
        appointment: &Appointment,
        new_start: DateTime<Local>,
        new_end: DateTime<Local>,
    );
}
