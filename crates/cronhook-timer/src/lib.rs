//! # cronhook Timer
//!
//! Tokio-driven [`TimerEngine`](cronhook_protocols::TimerEngine) built on
//! the `cron` crate.
//!
//! Expressions use the 6-field format with seconds:
//! `second minute hour day_of_month month day_of_week`
//! (an optional seventh field selects the year).
//!
//! Examples:
//! - `"0 0 * * * *"` - Every hour at minute 0
//! - `"0 */5 * * * *"` - Every 5 minutes
//! - `"0 0 9 * * MON-FRI"` - 9 AM on weekdays

mod cron_timer;
mod engine;

pub use cron_timer::CronTimer;
pub use engine::CronTimerEngine;
