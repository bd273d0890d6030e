//! Live clock for the "now" marker.
//!
//! [`ClockTicker`] is owned by the view showing the grid. It calls back once
//! a minute on the shared tokio runtime and is aborted by [`ClockTicker::stop`]
//! or when dropped, so repeated mounts never leave timers behind.

use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, Timelike};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::models::settings::TimeFormat;
use crate::services::time_grid::format_clock_label;
use crate::utils::date::fractional_minutes_from_midnight;

pub const TICK_INTERVAL: Duration = Duration::from_secs(60);

pub struct ClockTicker {
    task: Option<JoinHandle<()>>,
}

impl ClockTicker {
    /// Start ticking on `runtime`. The first tick fires immediately.
    pub fn start<F>(runtime: &Handle, on_tick: F) -> Self
    where
        F: FnMut(DateTime<Local>) + Send + 'static,
    {
        Self::start_with_interval(runtime, TICK_INTERVAL, on_tick)
    }

    pub fn start_with_interval<F>(runtime: &Handle, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(DateTime<Local>) + Send + 'static,
    {
        let task = runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                on_tick(Local::now());
            }
        });
        log::debug!("Clock ticker started ({:?} period)", period);

        Self { task: Some(task) }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map_or(false, |task| !task.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            log::debug!("Clock ticker stopped");
        }
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Position and caption of the current-time line.
#[derive(Debug, Clone, PartialEq)]
pub struct NowMarker {
    pub offset: f32,
    pub label: String,
}

/// The marker for `displayed_date`, or `None` when that day is not today.
pub fn now_marker(
    displayed_date: NaiveDate,
    now: DateTime<Local>,
    pixels_per_hour: f32,
    format: TimeFormat,
) -> Option<NowMarker> {
    if now.date_naive() != displayed_date {
        return None;
    }

    let offset = fractional_minutes_from_midnight(now) * pixels_per_hour / 60.0;
    let label = format_clock_label(now.hour(), now.minute(), format);
    Some(NowMarker { offset, label })
}
