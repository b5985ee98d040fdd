//! Wall-clock timing for pipeline stages.
//!
//! Durations are explicit per-call return values rather than shared
//! counters, so the sweep loop carries no implicit timing state. The
//! measurement wraps exactly the provider call; filtering and statistics
//! run outside it to keep duration columns comparable across
//! configurations.

use std::time::Instant;

/// A stage result together with the seconds the provider call took.
#[derive(Debug)]
pub struct Timed<T> {
    pub value: T,
    pub seconds: f64,
}

/// Runs a fallible provider call and measures its wall-clock duration.
pub fn run_timed<T, E>(f: impl FnOnce() -> Result<T, E>) -> Result<Timed<T>, E> {
    let start = Instant::now();
    let value = f()?;
    let seconds = start.elapsed().as_secs_f64();
    Ok(Timed { value, seconds })
}

#[cfg(test)]
mod tests {
    use super::run_timed;

    #[test]
    fn reports_elapsed_time() {
        let timed = run_timed(|| -> Result<u32, ()> {
            std::thread::sleep(std::time::Duration::from_millis(5));
            Ok(42)
        })
        .unwrap();
        assert_eq!(timed.value, 42);
        assert!(timed.seconds >= 0.004);
    }

    #[test]
    fn propagates_errors() {
        let result = run_timed(|| -> Result<(), &str> { Err("boom") });
        assert_eq!(result.unwrap_err(), "boom");
    }
}
