//! The `check` command.

use cronhook_timer::CronTimerEngine;

pub(crate) fn check(expression: &str, count: usize) -> Result<(), Box<dyn std::error::Error>> {
    let times = CronTimerEngine::upcoming(expression, count)?;

    println!("Expression '{}' is valid.", expression);
    if times.is_empty() {
        println!("It never fires.");
        return Ok(());
    }
    println!("Next {} fire times (UTC):", times.len());
    for time in times {
        println!("  {}", time.format("%Y-%m-%d %H:%M:%S"));
    }
    Ok(())
}
