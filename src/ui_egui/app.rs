use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate};

use super::day_view::{DayView, DayViewState};
use crate::models::settings::{
    CalendarSettings, ColumnWidthPolicy, TimeFormat, ALLOWED_SLOT_DURATIONS,
};
use crate::services::clock::ClockTicker;
use crate::services::day_schedule::DaySchedule;
use crate::services::settings::SettingsService;
use crate::services::store::AppointmentStore;
use crate::services::time_grid::TimeGrid;

const MIN_ROOT_WIDTH: f32 = 320.0;
const MIN_ROOT_HEIGHT: f32 = 220.0;

pub struct ScheduleApp {
    settings: CalendarSettings,
    settings_service: SettingsService,
    time_grid: TimeGrid,
    store: AppointmentStore,
    current_date: NaiveDate,
    day_view: DayViewState,
    /// Latest instant published by the clock ticker
    now: Arc<Mutex<DateTime<Local>>>,
    ticker: ClockTicker,
    /// Owns the worker thread the ticker runs on; dropped after the ticker
    _runtime: tokio::runtime::Runtime,
}

impl ScheduleApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        store: AppointmentStore,
        settings_service: SettingsService,
    ) -> Result<Self> {
        let settings = settings_service.load_or_default();
        let time_grid = TimeGrid::from_settings(&settings)
            .or_else(|e| {
                log::warn!("Invalid grid settings ({}), using defaults", e);
                TimeGrid::from_settings(&CalendarSettings::default())
            })
            .context("Failed to build the time grid")?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("day-schedule-clock")
            .enable_time()
            .build()
            .context("Failed to start the clock runtime")?;

        let now = Arc::new(Mutex::new(Local::now()));
        let ticker = {
            let now = Arc::clone(&now);
            let ctx = cc.egui_ctx.clone();
            ClockTicker::start(runtime.handle(), move |instant| {
                if let Ok(mut guard) = now.lock() {
                    *guard = instant;
                }
                ctx.request_repaint();
            })
        };

        let current_date = Local::now().date_naive();
        log::info!(
            "Day schedule ready with {} appointments ({} min slots)",
            store.appointments().len(),
            time_grid.slot_duration_minutes()
        );

        Ok(Self {
            settings,
            settings_service,
            time_grid,
            store,
            current_date,
            day_view: DayViewState::new(current_date),
            now,
            ticker,
            _runtime: runtime,
        })
    }

    fn now(&self) -> DateTime<Local> {
        self.now
            .lock()
            .map(|guard| *guard)
            .unwrap_or_else(|_| Local::now())
    }

    fn navigate_previous(&mut self) {
        self.set_date(self.current_date - chrono::Duration::days(1));
    }

    fn navigate_next(&mut self) {
        self.set_date(self.current_date + chrono::Duration::days(1));
    }

    fn jump_to_today(&mut self) {
        self.set_date(self.now().date_naive());
    }

    fn set_date(&mut self, date: NaiveDate) {
        self.current_date = date;
        self.day_view.set_date(date);
        self.store.clear_selection();
    }

    fn apply_settings(&mut self, settings: CalendarSettings) {
        match TimeGrid::from_settings(&settings) {
            Ok(grid) => self.time_grid = grid,
            Err(e) => {
                log::warn!("Rejected grid settings: {}", e);
                return;
            }
        }
        self.settings = settings;
        if let Err(e) = self.settings_service.save(&self.settings) {
            log::error!("Failed to save settings: {}", e);
        }
    }

    fn render_settings_menu(&mut self, ui: &mut egui::Ui) {
        let mut draft = self.settings.clone();

        ui.menu_button("Settings", |ui| {
            ui.label("Time format");
            ui.radio_value(&mut draft.time_format, TimeFormat::TwelveHour, "12-hour");
            ui.radio_value(&mut draft.time_format, TimeFormat::TwentyFourHour, "24-hour");
            ui.separator();

            ui.label("Slot length");
            for minutes in ALLOWED_SLOT_DURATIONS {
                ui.radio_value(
                    &mut draft.slot_duration_minutes,
                    minutes,
                    format!("{minutes} min"),
                );
            }
            ui.separator();

            ui.label("Overlap widths");
            ui.radio_value(
                &mut draft.column_width_policy,
                ColumnWidthPolicy::Direct,
                "Per appointment",
            );
            ui.radio_value(
                &mut draft.column_width_policy,
                ColumnWidthPolicy::Cluster,
                "Shared by group",
            );
        });

        if draft != self.settings {
            self.apply_settings(draft);
        }
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("◀").on_hover_text("Previous day").clicked() {
                self.navigate_previous();
            }
            if ui.button("Today").clicked() {
                self.jump_to_today();
            }
            if ui.button("▶").on_hover_text("Next day").clicked() {
                self.navigate_next();
            }
            ui.separator();
            self.render_settings_menu(ui);

            if let Some(selected) = self.store.selected() {
                ui.separator();
                ui.label(format!(
                    "Selected: {} ({})",
                    selected.display_label(),
                    selected.status.label()
                ));
            }
        });
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if !self.day_view.controller().is_idle() {
            return;
        }
        let (prev, next, today) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowRight),
                i.key_pressed(egui::Key::T),
            )
        });
        if prev {
            self.navigate_previous();
        } else if next {
            self.navigate_next();
        } else if today {
            self.jump_to_today();
        }
    }
}

impl eframe::App for ScheduleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);
        let now = self.now();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.render_toolbar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.set_min_size(egui::vec2(MIN_ROOT_WIDTH, MIN_ROOT_HEIGHT));
            let schedule = DaySchedule::build(
                self.store.appointments(),
                self.current_date,
                self.settings.column_width_policy,
            );
            let intents = DayView::show(
                ui,
                &mut self.day_view,
                &schedule,
                &self.time_grid,
                &self.settings,
                now,
            );
            for intent in intents {
                intent.dispatch(&mut self.store);
            }
        });

        // Minute ticks repaint through the ticker; this covers a stalled runtime
        ctx.request_repaint_after(Duration::from_secs(60));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.ticker.stop();
        if let Err(e) = self.store.save() {
            log::error!("Failed to save appointments on exit: {}", e);
        }
    }
}
