use chrono::{DateTime, Local, NaiveDate, Timelike};
use egui::{Align2, Color32, CursorIcon, FontId, Margin, Pos2, Rect, Sense, Stroke, Vec2};

use super::handles::{draw_handles, HandleRects};
use super::palette::{appointment_color, status_color, with_alpha, DayGridPalette};
use crate::models::appointment::Appointment;
use crate::models::settings::{CalendarSettings, TimeFormat};
use crate::services::clock::now_marker;
use crate::services::day_schedule::{initial_scroll_offset, DaySchedule, DayStats};
use crate::services::geometry::{geometry_for_range, AppointmentGeometry};
use crate::services::interaction::{
    DayViewIntent, FlagPointerTracker, InteractionController, InteractionState, PointerTarget,
};
use crate::services::time_grid::{
    format_clock_label, hour_at_y, TimeGrid, DAY_HEIGHT, PIXELS_PER_HOUR,
};

/// Width of the hour label column left of the grid.
const TIME_GUTTER: f32 = 64.0;

/// Per-view state that survives between frames.
pub struct DayViewState {
    controller: InteractionController,
    tracker: FlagPointerTracker,
    scroll_pending: bool,
}

impl DayViewState {
    pub fn new(date: NaiveDate) -> Self {
        let tracker = FlagPointerTracker::default();
        Self {
            controller: InteractionController::new(date, tracker.clone()),
            tracker,
            scroll_pending: true,
        }
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        if date != self.controller.displayed_date() {
            self.controller.set_displayed_date(date);
            self.scroll_pending = true;
        }
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }
}

pub struct DayView;

impl DayView {
    /// Draw one day and route pointer input. Returns the intents completed
    /// this frame.
    pub fn show(
        ui: &mut egui::Ui,
        state: &mut DayViewState,
        schedule: &DaySchedule,
        grid: &TimeGrid,
        settings: &CalendarSettings,
        now: DateTime<Local>,
    ) -> Vec<DayViewIntent> {
        let palette = DayGridPalette::from_ui(ui);
        let mut intents = Vec::new();

        Self::render_header(ui, schedule.date(), schedule.stats(), now, &palette);
        ui.add_space(6.0);
        if let Some(appointment) = Self::render_all_day_band(ui, schedule.all_day(), &palette) {
            intents.extend(state.controller.click(appointment));
        }
        ui.add_space(6.0);

        let mut scroll = egui::ScrollArea::vertical()
            .id_source("day_grid_scroll")
            .auto_shrink([false, false]);
        if state.scroll_pending {
            let viewport = ui.available_height();
            let offset = initial_scroll_offset(schedule.date(), now, viewport, PIXELS_PER_HOUR)
                .unwrap_or_else(|| grid.window_hours().start as f32 * PIXELS_PER_HOUR);
            scroll = scroll.vertical_scroll_offset(offset);
            state.scroll_pending = false;
        }

        scroll.show(ui, |ui| {
            Self::render_grid(ui, state, schedule, grid, settings, now, &palette, &mut intents);
        });

        if ui.input(|i| i.key_pressed(egui::Key::Escape)) && !state.controller.is_idle() {
            state.controller.cancel();
        }

        intents
    }

    fn render_header(
        ui: &mut egui::Ui,
        date: NaiveDate,
        stats: DayStats,
        now: DateTime<Local>,
        palette: &DayGridPalette,
    ) {
        let is_today = date == now.date_naive();
        let frame = egui::Frame::none()
            .rounding(egui::Rounding::same(10.0))
            .stroke(Stroke::new(1.0, palette.header_border))
            .inner_margin(Margin::symmetric(16.0, 10.0));

        frame.show(ui, |strip_ui| {
            strip_ui.horizontal(|row_ui| {
                row_ui.vertical(|text_ui| {
                    text_ui.label(
                        egui::RichText::new(date.format("%A").to_string())
                            .size(22.0)
                            .strong(),
                    );
                    text_ui.label(egui::RichText::new(date.format("%B %d, %Y").to_string()).size(13.0));
                });

                row_ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |right_ui| {
                    right_ui.label(format!(
                        "{} total · {} scheduled · {} in progress · {} completed",
                        stats.total, stats.scheduled, stats.in_progress, stats.completed
                    ));
                    if is_today {
                        egui::Frame::none()
                            .fill(palette.badge_bg)
                            .rounding(egui::Rounding::same(8.0))
                            .inner_margin(Margin::symmetric(10.0, 4.0))
                            .show(right_ui, |badge_ui| {
                                badge_ui.label(egui::RichText::new("Today").size(12.0).strong());
                            });
                    }
                });
            });
        });
    }

    /// Returns the all-day appointment clicked this frame, if any.
    fn render_all_day_band<'a>(
        ui: &mut egui::Ui,
        all_day: &'a [Appointment],
        palette: &DayGridPalette,
    ) -> Option<&'a Appointment> {
        if all_day.is_empty() {
            return None;
        }

        let mut clicked = None;
        egui::Frame::none()
            .fill(palette.band_bg)
            .rounding(egui::Rounding::same(6.0))
            .inner_margin(Margin::symmetric(8.0, 4.0))
            .show(ui, |band_ui| {
                band_ui.horizontal_wrapped(|row_ui| {
                    row_ui.label(egui::RichText::new("All day").color(palette.label_text));
                    for appointment in all_day {
                        let chip = egui::Button::new(
                            egui::RichText::new(appointment.display_label()).color(Color32::WHITE),
                        )
                        .fill(appointment_color(appointment));
                        if row_ui.add(chip).clicked() {
                            clicked = Some(appointment);
                        }
                    }
                });
            });
        clicked
    }

    #[allow(clippy::too_many_arguments)]
    fn render_grid(
        ui: &mut egui::Ui,
        state: &mut DayViewState,
        schedule: &DaySchedule,
        grid: &TimeGrid,
        settings: &CalendarSettings,
        now: DateTime<Local>,
        palette: &DayGridPalette,
        intents: &mut Vec<DayViewIntent>,
    ) {
        let width = ui.available_width();
        let (rect, grid_response) =
            ui.allocate_exact_size(Vec2::new(width, DAY_HEIGHT), Sense::click_and_drag());
        let column = Rect::from_min_max(Pos2::new(rect.left() + TIME_GUTTER, rect.top()), rect.max);
        let visible = ui.clip_rect().intersect(rect);
        let painter = ui.painter_at(rect);
        let hour_rect = |hour: u32| {
            Rect::from_min_size(
                Pos2::new(column.left(), rect.top() + hour as f32 * PIXELS_PER_HOUR),
                Vec2::new(column.width(), PIXELS_PER_HOUR),
            )
        };

        painter.rect_filled(column, 0.0, palette.background);
        for hour in 0..24 {
            if state.controller.is_in_create_range(hour) {
                painter.rect_filled(hour_rect(hour), 0.0, palette.create_highlight);
            }
        }
        if let Some(hour) = state.controller.drag_over_hour() {
            painter.rect_filled(hour_rect(hour), 0.0, palette.drop_highlight);
        }
        Self::paint_slots(&painter, rect, column, grid, settings, palette);

        let press_origin = ui.input(|i| i.pointer.press_origin());
        if grid_response.drag_started() {
            if let Some(origin) = press_origin {
                let hour = hour_at_y(origin.y - rect.top());
                state.controller.pointer_down(PointerTarget::EmptyGrid { hour });
            }
        } else if grid_response.clicked() && state.controller.is_idle() {
            if let Some(pos) = grid_response.interact_pointer_pos() {
                let hour = hour_at_y(pos.y - rect.top());
                if state.controller.pointer_down(PointerTarget::EmptyGrid { hour }) {
                    intents.extend(state.controller.pointer_up());
                }
            }
        }

        for placed in schedule.placements(&state.controller, PIXELS_PER_HOUR) {
            let appointment = placed.appointment;
            let block = block_rect(column, &placed.geometry);
            let id = ui.id().with(("appointment", appointment.id.as_str()));
            let response = ui.interact(block, id, Sense::click_and_drag());
            let handles = HandleRects::for_block(block, placed.geometry.shows_top_handle());

            if response.drag_started() {
                match press_origin.and_then(|origin| handles.hit_test(origin)) {
                    Some(edge) => {
                        state
                            .controller
                            .pointer_down(PointerTarget::ResizeHandle(appointment, edge));
                    }
                    None => {
                        state.controller.begin_move(appointment);
                    }
                }
            } else if response.clicked() {
                intents.extend(state.controller.click(appointment));
            }

            let color = appointment_color(appointment);
            let fill = if placed.is_dragging {
                with_alpha(color, 90)
            } else {
                color
            };
            let range = state
                .controller
                .preview_range(&appointment.id)
                .unwrap_or((appointment.start, appointment.end));
            paint_block(&painter, block, appointment, range, fill, settings.time_format);

            if response.hovered() && state.controller.is_idle() {
                let hovered_edge = response.hover_pos().and_then(|pos| handles.hit_test(pos));
                if hovered_edge.is_some() {
                    ui.ctx().set_cursor_icon(CursorIcon::ResizeVertical);
                }
                draw_handles(&painter, &handles, hovered_edge, color);
            } else if placed.is_resizing {
                draw_handles(&painter, &handles, None, color);
            }
        }

        // Ghost of the appointment being moved, at the hovered hour
        if let Some(session) = state.controller.session() {
            if let (InteractionState::DraggingMove, Some(subject), Some(start), Some(end)) = (
                state.controller.state(),
                session.subject(),
                session.proposed_start(),
                session.proposed_end(),
            ) {
                let geometry = geometry_for_range(start, end, None, PIXELS_PER_HOUR);
                let ghost = block_rect(column, &geometry);
                painter.rect_stroke(ghost, 4.0, Stroke::new(2.0, appointment_color(subject)));
            }
        }

        if let Some(marker) = now_marker(schedule.date(), now, PIXELS_PER_HOUR, settings.time_format) {
            let y = rect.top() + marker.offset;
            painter.hline(column.x_range(), y, Stroke::new(2.0, palette.now_line));
            painter.circle_filled(Pos2::new(column.left(), y), 4.0, palette.now_line);
            painter.text(
                Pos2::new(column.left() - 6.0, y),
                Align2::RIGHT_CENTER,
                marker.label,
                FontId::proportional(11.0),
                palette.now_line,
            );
        }

        Self::route_session_input(ui, state, rect, column, visible, intents);
    }

    fn paint_slots(
        painter: &egui::Painter,
        rect: Rect,
        column: Rect,
        grid: &TimeGrid,
        settings: &CalendarSettings,
        palette: &DayGridPalette,
    ) {
        for slot in grid.slots() {
            let y = rect.top() + grid.slot_top(slot);
            if slot.is_hour_start() {
                painter.hline(column.x_range(), y, Stroke::new(1.0, palette.hour_line));
                painter.text(
                    Pos2::new(column.left() - 6.0, y + 2.0),
                    Align2::RIGHT_TOP,
                    slot.label(settings.time_format),
                    FontId::proportional(11.0),
                    palette.label_text,
                );
            } else {
                painter.hline(column.x_range(), y, Stroke::new(0.5, palette.slot_line));
            }
        }
    }

    /// Feed pointer motion and release into the active gesture.
    fn route_session_input(
        ui: &egui::Ui,
        state: &mut DayViewState,
        rect: Rect,
        column: Rect,
        visible: Rect,
        intents: &mut Vec<DayViewIntent>,
    ) {
        let (pointer, released) =
            ui.input(|i| (i.pointer.latest_pos(), i.pointer.primary_released()));
        let relative_y = |pos: Pos2| pos.y - rect.top();

        match state.controller.state() {
            InteractionState::Idle => {}
            InteractionState::DraggingResizeTop | InteractionState::DraggingResizeBottom => {
                if state.tracker.is_active() {
                    if let Some(pos) = pointer {
                        state.controller.pointer_move(relative_y(pos));
                    }
                    ui.ctx().set_cursor_icon(CursorIcon::ResizeVertical);
                }
                if released {
                    intents.extend(state.controller.pointer_up());
                }
            }
            InteractionState::DraggingCreate => {
                match pointer.filter(|pos| visible.contains(*pos)) {
                    Some(pos) => state.controller.pointer_enter_hour(hour_at_y(relative_y(pos))),
                    None => intents.extend(state.controller.pointer_leave()),
                }
                if released {
                    intents.extend(state.controller.pointer_up());
                }
            }
            InteractionState::DraggingMove => {
                let target = pointer
                    .filter(|pos| visible.contains(*pos) && column.x_range().contains(pos.x))
                    .map(|pos| hour_at_y(relative_y(pos)));
                if let Some(hour) = target {
                    state.controller.drag_over(hour);
                }
                ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
                if released {
                    match target {
                        Some(hour) => intents.extend(state.controller.drop_on(hour)),
                        None => state.controller.end_move(),
                    }
                }
            }
        }

        if !state.controller.is_idle() {
            ui.ctx().request_repaint();
        }
    }
}

fn block_rect(column: Rect, geometry: &AppointmentGeometry) -> Rect {
    let (left, width) = geometry.span.resolve(column.width());
    Rect::from_min_size(
        Pos2::new(column.left() + left, column.top() + geometry.top),
        Vec2::new(width, geometry.height),
    )
}

fn paint_block(
    painter: &egui::Painter,
    block: Rect,
    appointment: &Appointment,
    (start, end): (DateTime<Local>, DateTime<Local>),
    fill: Color32,
    format: TimeFormat,
) {
    painter.rect_filled(block, 4.0, fill);
    let bar = Rect::from_min_size(block.min, Vec2::new(4.0, block.height()));
    painter.rect_filled(bar, 2.0, fill.linear_multiply(0.7));
    painter.circle_filled(
        Pos2::new(block.right() - 8.0, block.top() + 8.0),
        3.5,
        status_color(appointment.status),
    );

    let text_left = bar.right() + 6.0;
    let text_clip = Rect::from_min_max(
        Pos2::new(text_left, block.top()),
        Pos2::new(block.right() - 14.0, block.bottom()),
    );
    let text_painter = painter.with_clip_rect(text_clip.intersect(painter.clip_rect()));
    text_painter.text(
        Pos2::new(text_left, block.top() + 4.0),
        Align2::LEFT_TOP,
        appointment.display_label(),
        FontId::proportional(13.0),
        Color32::WHITE,
    );

    let time_range = format!(
        "{} - {}",
        format_clock_label(start.hour(), start.minute(), format),
        format_clock_label(end.hour(), end.minute(), format),
    );
    text_painter.text(
        Pos2::new(text_left, block.top() + 22.0),
        Align2::LEFT_TOP,
        time_range,
        FontId::proportional(11.0),
        with_alpha(Color32::WHITE, 200),
    );
}
