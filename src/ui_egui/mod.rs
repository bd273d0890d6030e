mod app;
pub mod day_view;
pub mod handles;
pub mod palette;

pub use app::ScheduleApp;
