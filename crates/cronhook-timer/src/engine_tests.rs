//! Tests for the cron timer engine.
//!
//! Tick tests run on paused tokio time. The timer still reads the wall clock
//! to pick slots, so every virtual sleep lands on a fresh slot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::FutureExt;

use super::*;

const EVERY_SECOND: &str = "* * * * * *";
const EVERY_MINUTE: &str = "0 * * * * *";

fn counting_job() -> (TimerJob, Arc<AtomicU64>) {
    let counter = Arc::new(AtomicU64::new(0));
    let c = counter.clone();
    let job: TimerJob = Arc::new(move || {
        let c = c.clone();
        async move {
            c.fetch_add(1, Ordering::SeqCst);
        }
        .boxed()
    });
    (job, counter)
}

#[tokio::test]
async fn test_invalid_expression() {
    let engine = CronTimerEngine::new();
    let (job, _) = counting_job();

    let err = engine.add_job("invalid cron expression", job).err().unwrap();
    assert!(matches!(err, TimerError::InvalidExpression { .. }));
    assert_eq!(engine.active_timers(), 0);
}

#[test]
fn test_validate() {
    assert!(CronTimerEngine::validate(EVERY_MINUTE).is_ok());
    assert!(CronTimerEngine::validate("0 */5 * * * *").is_ok());
    assert!(CronTimerEngine::validate("0 0 9 * * MON-FRI").is_ok());
    assert!(CronTimerEngine::validate("").is_err());
    assert!(CronTimerEngine::validate("61 * * * * *").is_err());
}

#[test]
fn test_upcoming() {
    let times = CronTimerEngine::upcoming(EVERY_MINUTE, 3).unwrap();
    assert_eq!(times.len(), 3);
    assert!(times[0] > Utc::now());
    assert_eq!(times[1] - times[0], chrono::Duration::minutes(1));
}

#[tokio::test]
async fn test_entry_accessors() {
    let engine = CronTimerEngine::new();
    let (job, _) = counting_job();

    let entry = engine.add_job(EVERY_MINUTE, job).unwrap();

    assert_eq!(entry.expression(), EVERY_MINUTE);
    assert!(entry.is_active());
    assert_eq!(entry.fire_count(), 0);
    assert!(entry.next_fire_time().unwrap() > Utc::now());
    assert_eq!(engine.active_timers(), 1);

    entry.stop();
    assert!(!entry.is_active());
    assert!(entry.next_fire_time().is_none());
    assert_eq!(engine.active_timers(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_no_ticks_before_start() {
    let engine = CronTimerEngine::new();
    let (job, counter) = counting_job();
    let _entry = engine.add_job(EVERY_SECOND, job).unwrap();

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(counter.load(Ordering::SeqCst), 0);
    assert!(!engine.is_started());

    engine.start();
    tokio::time::sleep(Duration::from_millis(2200)).await;
    assert!(counter.load(Ordering::SeqCst) >= 1);
}

#[tokio::test(start_paused = true)]
async fn test_stop_halts_ticks() {
    let engine = CronTimerEngine::new();
    engine.start();
    let (job, counter) = counting_job();
    let entry = engine.add_job(EVERY_SECOND, job).unwrap();

    tokio::time::sleep(Duration::from_millis(2200)).await;
    assert!(entry.fire_count() >= 1);

    entry.stop();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let after_stop = counter.load(Ordering::SeqCst);

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(counter.load(Ordering::SeqCst), after_stop);
}

#[tokio::test]
async fn test_shutdown_stops_timers_and_rejects_new_jobs() {
    let engine = CronTimerEngine::new();
    engine.start();
    let (job, _) = counting_job();
    let entry = engine.add_job(EVERY_MINUTE, job.clone()).unwrap();

    engine.shutdown();

    assert!(!entry.is_active());
    assert!(matches!(engine.add_job(EVERY_MINUTE, job), Err(TimerError::ShutDown)));
}

#[tokio::test]
async fn test_start_is_idempotent() {
    let engine = CronTimerEngine::new();
    engine.start();
    engine.start();
    assert!(engine.is_started());
}

#[tokio::test]
async fn test_stalled_timer_skips_missed_ticks() {
    let engine = CronTimerEngine::new();
    engine.start();
    let (job, _) = counting_job();
    let entry = engine.add_job(EVERY_SECOND, job).unwrap();

    tokio::time::sleep(Duration::from_millis(1200)).await;
    let before_stall = entry.fire_count();

    // Blocks the only runtime thread, so the timer task misses four slots.
    std::thread::sleep(Duration::from_millis(4000));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(entry.fire_count() - before_stall <= 2);
}
