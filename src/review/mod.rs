mod algorithm;
mod scheduler;

pub use algorithm::{is_due, next_interval_days, MAX_INTERVAL_DAYS};
