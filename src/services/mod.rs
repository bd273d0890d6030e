// Service module exports

pub mod clock;
pub mod day_schedule;
pub mod geometry;
pub mod interaction;
pub mod layout;
pub mod settings;
pub mod store;
pub mod time_grid;
