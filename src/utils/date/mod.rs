// Wall-clock helpers shared by the grid, the controller and the clock

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Timelike};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Whole minutes elapsed since local midnight.
pub fn minutes_from_midnight(instant: DateTime<Local>) -> u32 {
    let time = instant.time();
    time.hour() * 60 + time.minute()
}

/// Fractional minutes since local midnight, including seconds.
pub fn fractional_minutes_from_midnight(instant: DateTime<Local>) -> f32 {
    instant.time().num_seconds_from_midnight() as f32 / 60.0
}

/// Local instant at `minutes` past midnight on `date`.
///
/// Returns `None` for minutes outside the day or wall-clock times that do not
/// map to a single instant (DST transitions).
pub fn local_at_minutes(date: NaiveDate, minutes: u32) -> Option<DateTime<Local>> {
    if minutes >= MINUTES_PER_DAY {
        return None;
    }
    let time = NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)?;
    date.and_time(time).and_local_timezone(Local).single()
}

/// Local instant at the top of `hour` on `date`.
pub fn local_at_hour(date: NaiveDate, hour: u32) -> Option<DateTime<Local>> {
    local_at_minutes(date, hour.checked_mul(60)?)
}

/// Like [`local_at_hour`], but hour 24 is the following midnight.
pub fn local_at_hour_boundary(date: NaiveDate, hour: u32) -> Option<DateTime<Local>> {
    match hour {
        24 => local_at_hour(date.succ_opt()?, 0),
        _ => local_at_hour(date, hour),
    }
}
