use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

use crate::game::Scheduler;

/// Scheduler backed by a tokio interval.
///
/// `start` must be called from inside a tokio runtime.
#[derive(Debug, Default)]
pub struct IntervalScheduler {
    interval: Option<Interval>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves at the next tick; never resolves while cancelled
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl Scheduler for IntervalScheduler {
    fn start(&mut self, period: Duration) {
        // first tick one period after start, not immediately
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    fn cancel(&mut self) {
        self.interval = None;
    }

    fn is_active(&self) -> bool {
        self.interval.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_after_one_period() {
        let mut scheduler = IntervalScheduler::new();
        scheduler.start(Duration::from_millis(100));
        assert!(scheduler.is_active());

        let before = Instant::now();
        scheduler.tick().await;
        assert!(before.elapsed() >= Duration::from_millis(100));

        scheduler.tick().await;
        assert!(before.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_never_ticks() {
        let mut scheduler = IntervalScheduler::new();
        scheduler.start(Duration::from_millis(10));
        scheduler.cancel();
        assert!(!scheduler.is_active());

        let waited =
            tokio::time::timeout(Duration::from_secs(1), scheduler.tick()).await;
        assert!(waited.is_err());
    }
}
