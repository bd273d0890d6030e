//! Interaction controller for the day grid.
//!
//! One state machine drives all three direct-manipulation gestures. A single
//! optional [`DragSession`] holds the gesture in progress, so at most one
//! gesture can be active at a time. Completing a gesture yields a
//! [`DayViewIntent`]; the controller itself never changes appointment data.
//!
//! ```text
//!             begin_move                     drop_on / end_move / cancel
//!   Idle ───────────────────▶ DraggingMove ─────────────────────────────▶ Idle
//!   Idle ── pointer_down(handle) ─▶ DraggingResize{Top,Bottom} ── pointer_up / cancel ─▶ Idle
//!   Idle ── pointer_down(empty) ──▶ DraggingCreate ── pointer_up / pointer_leave / cancel ─▶ Idle
//! ```

mod capture;
mod intent;

use chrono::{DateTime, Duration, Local, NaiveDate};

pub use capture::{FlagPointerTracker, PointerCapture, PointerTracker};
pub use intent::{AppointmentHandler, DayViewIntent};

#[cfg(test)]
pub use intent::MockAppointmentHandler;

use crate::models::appointment::{Appointment, AppointmentId};
use crate::services::time_grid::{pointer_y_to_minutes, SNAP_MINUTES};
use crate::utils::date::{local_at_hour, local_at_hour_boundary, local_at_minutes};

/// Shortest range a resize may produce.
pub fn minimum_duration() -> Duration {
    Duration::minutes(SNAP_MINUTES as i64)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeEdge {
    Top,
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragKind {
    Move,
    ResizeTop,
    ResizeBottom,
    Create,
}

impl From<ResizeEdge> for DragKind {
    fn from(edge: ResizeEdge) -> Self {
        match edge {
            ResizeEdge::Top => DragKind::ResizeTop,
            ResizeEdge::Bottom => DragKind::ResizeBottom,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    DraggingMove,
    DraggingResizeTop,
    DraggingResizeBottom,
    DraggingCreate,
}

/// What the pointer was pressed on.
#[derive(Clone, Copy, Debug)]
pub enum PointerTarget<'a> {
    ResizeHandle(&'a Appointment, ResizeEdge),
    AppointmentBody(&'a Appointment),
    EmptyGrid { hour: u32 },
}

/// The gesture in progress.
#[derive(Debug)]
pub struct DragSession {
    kind: DragKind,
    subject: Option<Appointment>,
    proposed_start: Option<DateTime<Local>>,
    proposed_end: Option<DateTime<Local>>,
    anchor_hour: Option<u32>,
    hover_hour: Option<u32>,
    capture: Option<PointerCapture>,
}

impl DragSession {
    fn new(kind: DragKind, subject: Option<Appointment>) -> Self {
        Self {
            kind,
            subject,
            proposed_start: None,
            proposed_end: None,
            anchor_hour: None,
            hover_hour: None,
            capture: None,
        }
    }

    pub fn kind(&self) -> DragKind {
        self.kind
    }

    pub fn subject(&self) -> Option<&Appointment> {
        self.subject.as_ref()
    }

    pub fn proposed_start(&self) -> Option<DateTime<Local>> {
        self.proposed_start
    }

    pub fn proposed_end(&self) -> Option<DateTime<Local>> {
        self.proposed_end
    }

    pub fn holds_pointer_capture(&self) -> bool {
        self.capture.is_some()
    }

    /// Inclusive `(first, last)` hour buckets of a create gesture.
    fn create_buckets(&self) -> Option<(u32, u32)> {
        let anchor = self.anchor_hour?;
        let current = self.hover_hour.unwrap_or(anchor);
        Some((anchor.min(current), anchor.max(current)))
    }
}

pub struct InteractionController {
    displayed_date: NaiveDate,
    session: Option<DragSession>,
    tracker: Box<dyn PointerTracker>,
}

impl InteractionController {
    pub fn new(displayed_date: NaiveDate, tracker: impl PointerTracker + 'static) -> Self {
        Self {
            displayed_date,
            session: None,
            tracker: Box::new(tracker),
        }
    }

    pub fn displayed_date(&self) -> NaiveDate {
        self.displayed_date
    }

    /// Switch days. Any gesture in progress is abandoned.
    pub fn set_displayed_date(&mut self, date: NaiveDate) {
        if date != self.displayed_date {
            self.cancel();
            self.displayed_date = date;
        }
    }

    pub fn state(&self) -> InteractionState {
        match self.session.as_ref().map(DragSession::kind) {
            None => InteractionState::Idle,
            Some(DragKind::Move) => InteractionState::DraggingMove,
            Some(DragKind::ResizeTop) => InteractionState::DraggingResizeTop,
            Some(DragKind::ResizeBottom) => InteractionState::DraggingResizeBottom,
            Some(DragKind::Create) => InteractionState::DraggingCreate,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Press on a resize handle or on empty grid space.
    ///
    /// Returns `true` when a session started. Presses are ignored while a
    /// gesture is active, and presses on an appointment body are left to the
    /// click / move handling.
    pub fn pointer_down(&mut self, target: PointerTarget<'_>) -> bool {
        if let Some(active) = &self.session {
            log::debug!("Ignoring pointer down during {:?} gesture", active.kind);
            return false;
        }

        match target {
            PointerTarget::ResizeHandle(appointment, edge) => {
                let mut session = DragSession::new(edge.into(), Some(appointment.clone()));
                session.capture = Some(self.tracker.install());
                log::debug!("Resize {:?} started for appointment {}", edge, appointment.id);
                self.session = Some(session);
                true
            }
            PointerTarget::EmptyGrid { hour } => {
                let hour = hour.min(23);
                let mut session = DragSession::new(DragKind::Create, None);
                session.anchor_hour = Some(hour);
                session.hover_hour = Some(hour);
                self.session = Some(session);
                self.refresh_create_preview();
                true
            }
            PointerTarget::AppointmentBody(_) => false,
        }
    }

    /// Pointer moved; `relative_y` is measured from the grid's top edge.
    ///
    /// Only resize sessions track continuous pointer motion. Returns `true`
    /// when the preview changed.
    pub fn pointer_move(&mut self, relative_y: f32) -> bool {
        let date = self.displayed_date;
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some(subject) = session.subject.as_ref() else {
            return false;
        };

        let minutes = pointer_y_to_minutes(relative_y);
        let Some(candidate) = local_at_minutes(date, minutes) else {
            log::debug!("No local instant for {} minutes on {}", minutes, date);
            return false;
        };

        match session.kind {
            DragKind::ResizeTop => {
                let current_end = session.proposed_end.unwrap_or(subject.end);
                if candidate > current_end - minimum_duration() {
                    log::debug!("Rejected start {} (end {})", candidate, current_end);
                    return false;
                }
                let changed = session.proposed_start != Some(candidate);
                session.proposed_start = Some(candidate);
                session.proposed_end = Some(current_end);
                changed
            }
            DragKind::ResizeBottom => {
                let current_start = session.proposed_start.unwrap_or(subject.start);
                if candidate < current_start + minimum_duration() {
                    log::debug!("Rejected end {} (start {})", candidate, current_start);
                    return false;
                }
                let changed = session.proposed_end != Some(candidate);
                session.proposed_start = Some(current_start);
                session.proposed_end = Some(candidate);
                changed
            }
            DragKind::Move | DragKind::Create => false,
        }
    }

    /// Pointer entered hour bucket `hour` during a create gesture.
    pub fn pointer_enter_hour(&mut self, hour: u32) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.kind == DragKind::Create && session.hover_hour != Some(hour) {
            session.hover_hour = Some(hour.min(23));
            self.refresh_create_preview();
        }
    }

    /// Primary button released anywhere.
    pub fn pointer_up(&mut self) -> Option<DayViewIntent> {
        match self.session.as_ref().map(DragSession::kind)? {
            DragKind::ResizeTop | DragKind::ResizeBottom => self.finish_resize(),
            DragKind::Create => self.finish_create(),
            DragKind::Move => None,
        }
    }

    /// Pointer left the grid. A create gesture finalizes with the last
    /// tracked range; resize keeps following the captured pointer.
    pub fn pointer_leave(&mut self) -> Option<DayViewIntent> {
        match self.session.as_ref().map(DragSession::kind)? {
            DragKind::Create => self.finish_create(),
            _ => None,
        }
    }

    pub fn begin_move(&mut self, appointment: &Appointment) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.session = Some(DragSession::new(DragKind::Move, Some(appointment.clone())));
        log::debug!("Move started for appointment {}", appointment.id);
        true
    }

    /// The dragged appointment is over hour bucket `hour`.
    pub fn drag_over(&mut self, hour: u32) {
        let date = self.displayed_date;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(subject) = session.subject.as_ref() else {
            return;
        };
        if session.kind != DragKind::Move {
            return;
        }

        let hour = hour.min(23);
        let duration = subject.duration();
        session.hover_hour = Some(hour);
        session.proposed_start = local_at_hour(date, hour);
        session.proposed_end = session.proposed_start.map(|start| start + duration);
    }

    /// Dropped on hour bucket `hour` of the displayed day.
    pub fn drop_on(&mut self, hour: u32) -> Option<DayViewIntent> {
        if self.session.as_ref().map(DragSession::kind) != Some(DragKind::Move) {
            return None;
        }
        let session = self.session.take()?;
        let appointment = session.subject?;
        let hour = hour.min(23);

        log::info!(
            "Appointment {} dropped on {} {:02}:00",
            appointment.id,
            self.displayed_date,
            hour
        );
        Some(DayViewIntent::Moved {
            appointment,
            date: self.displayed_date,
            hour,
        })
    }

    /// Drag ended without a valid drop target.
    pub fn end_move(&mut self) {
        if self.session.as_ref().map(DragSession::kind) == Some(DragKind::Move) {
            self.session = None;
        }
    }

    /// Plain click on an appointment body.
    pub fn click(&mut self, appointment: &Appointment) -> Option<DayViewIntent> {
        if self.session.is_some() {
            return None;
        }
        Some(DayViewIntent::Click(appointment.clone()))
    }

    /// Abandon the active gesture without emitting anything.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.take() {
            log::debug!("Cancelled {:?} gesture", session.kind);
        }
    }

    /// Start/end to draw for `id`, taking an active resize or move into account.
    pub fn preview_range(&self, id: &AppointmentId) -> Option<(DateTime<Local>, DateTime<Local>)> {
        let session = self.session.as_ref()?;
        let subject = session.subject.as_ref().filter(|s| &s.id == id)?;
        match session.kind {
            DragKind::ResizeTop | DragKind::ResizeBottom => Some((
                session.proposed_start.unwrap_or(subject.start),
                session.proposed_end.unwrap_or(subject.end),
            )),
            _ => None,
        }
    }

    pub fn dragged_appointment(&self) -> Option<&AppointmentId> {
        let session = self.session.as_ref()?;
        match session.kind {
            DragKind::Move => session.subject.as_ref().map(|s| &s.id),
            _ => None,
        }
    }

    pub fn resizing_appointment(&self) -> Option<&AppointmentId> {
        let session = self.session.as_ref()?;
        match session.kind {
            DragKind::ResizeTop | DragKind::ResizeBottom => session.subject.as_ref().map(|s| &s.id),
            _ => None,
        }
    }

    /// Hour bucket currently under a move drag.
    pub fn drag_over_hour(&self) -> Option<u32> {
        let session = self.session.as_ref()?;
        (session.kind == DragKind::Move)
            .then_some(session.hover_hour)
            .flatten()
    }

    pub fn is_in_create_range(&self, hour: u32) -> bool {
        self.session
            .as_ref()
            .filter(|s| s.kind == DragKind::Create)
            .and_then(DragSession::create_buckets)
            .map_or(false, |(first, last)| (first..=last).contains(&hour))
    }

    fn refresh_create_preview(&mut self) {
        let date = self.displayed_date;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some((first, last)) = session.create_buckets() else {
            return;
        };
        session.proposed_start = local_at_hour(date, first);
        session.proposed_end = local_at_hour_boundary(date, last + 1);
    }

    fn finish_resize(&mut self) -> Option<DayViewIntent> {
        let session = self.session.take()?;
        let appointment = session.subject?;

        if session.proposed_start.is_none() && session.proposed_end.is_none() {
            return None;
        }
        let start = session.proposed_start.unwrap_or(appointment.start);
        let end = session.proposed_end.unwrap_or(appointment.end);
        if start == appointment.start && end == appointment.end {
            log::debug!("Resize of {} ended without change", appointment.id);
            return None;
        }

        log::info!(
            "Appointment {} resized to {} - {}",
            appointment.id,
            start.format("%H:%M"),
            end.format("%H:%M")
        );
        Some(DayViewIntent::Resized {
            appointment,
            start,
            end,
        })
    }

    fn finish_create(&mut self) -> Option<DayViewIntent> {
        let session = self.session.take()?;
        let (first, last) = session.create_buckets()?;
        let start_hour = first;
        let end_hour = last + 1;

        log::info!(
            "Create requested on {} from {:02}:00 to {:02}:00",
            self.displayed_date,
            start_hour,
            end_hour
        );
        Some(DayViewIntent::Created {
            date: self.displayed_date,
            start_hour,
            end_hour,
        })
    }
}
