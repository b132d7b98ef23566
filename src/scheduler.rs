use crate::config::{AppConfig, MAX_INTERVAL_SECS};
use crate::engine::{CleanerEngine, RunReport};
use crate::error::Error;
use crate::progress::RunReporter;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Fixed-interval trigger. Runs never overlap: a run always finishes before the
/// next poll, and missed slots are skipped rather than replayed.
#[derive(Debug)]
pub struct Scheduler {
    interval: Duration,
    poll_interval: Duration,
    next_run: Instant,
}

impl Scheduler {
    /// `interval` is capped at one year so slot arithmetic on `Instant` cannot overflow.
    pub fn new(interval: Duration, poll_interval: Duration, run_on_start: bool) -> Self {
        let interval = interval.min(Duration::from_secs(MAX_INTERVAL_SECS));
        let now = Instant::now();
        let next_run = if run_on_start { now } else { now + interval };
        Self {
            interval,
            poll_interval,
            next_run,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Duration::from_secs(config.interval_secs),
            Duration::from_millis(config.poll_interval_ms),
            config.run_on_start,
        )
    }

    pub fn next_run(&self) -> Instant {
        self.next_run
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_run
    }

    fn advance(&mut self, now: Instant) {
        self.next_run += self.interval;
        if self.next_run <= now {
            self.next_run = now + self.interval;
        }
    }

    /// Runs the engine if a slot is due. `None` when nothing was due.
    pub fn run_pending(
        &mut self,
        engine: &CleanerEngine,
        reporter: &dyn RunReporter,
    ) -> Option<Result<RunReport, Error>> {
        let now = Instant::now();
        if !self.is_due(now) {
            return None;
        }
        self.advance(now);

        let result = engine.run_once(reporter);
        if let Err(err) = &result {
            error!("Run failed: {}", err);
            reporter.on_run_failed(err);
        }
        debug!("Next run in {:?}", self.next_run.saturating_duration_since(Instant::now()));
        Some(result)
    }

    /// Polls forever. A failed run is reported and the next slot is still honored.
    pub fn run_forever(mut self, engine: &CleanerEngine, reporter: &dyn RunReporter) -> ! {
        loop {
            let _ = self.run_pending(engine, reporter);
            thread::sleep(self.poll_interval);
        }
    }
}
