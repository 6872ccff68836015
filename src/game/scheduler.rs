//! Periodic tick source seam.
//!
//! A session starts its scheduler when a game begins and cancels it when the
//! game ends or is closed. The host decides how ticks are actually produced:
//! a real timer for the terminal, or direct calls from a test.

use std::time::Duration;

pub trait Scheduler {
    /// Begin (or restart) delivering ticks every `period`
    fn start(&mut self, period: Duration);

    /// Stop delivering ticks
    fn cancel(&mut self);

    fn is_active(&self) -> bool;
}

/// Scheduler for step-by-step driving; records what the session asked for.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ManualScheduler {
    period: Option<Duration>,
    pub starts: u32,
    pub cancels: u32,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }
}

impl Scheduler for ManualScheduler {
    fn start(&mut self, period: Duration) {
        self.period = Some(period);
        self.starts += 1;
    }

    fn cancel(&mut self) {
        if self.period.take().is_some() {
            self.cancels += 1;
        }
    }

    fn is_active(&self) -> bool {
        self.period.is_some()
    }
}
