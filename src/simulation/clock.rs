//! Tick scheduling.
//!
//! A fixed-period schedule owned by the engine and polled from the event
//! loop. Starting returns a [`TickHandle`]; cancelling with that handle
//! stops the schedule before the next poll.

use std::time::{Duration, Instant};

use log::debug;

/// Default wall-clock period between periodic ticks
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Upper bound on ticks replayed by a single poll after a stall
pub const MAX_CATCH_UP: u32 = 10;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Token identifying one active schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

#[derive(Debug, Clone)]
struct Schedule {
    handle: TickHandle,
    next_due: Instant,
}

#[derive(Debug, Clone)]
pub struct TickScheduler {
    period: Duration,
    active: Option<Schedule>,
    issued: u64,
}

impl TickScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
            active: None,
            issued: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start a new schedule whose first tick is due one period after `now`.
    /// Replaces any previous schedule.
    pub fn schedule(&mut self, now: Instant) -> TickHandle {
        self.issued += 1;
        let handle = TickHandle(self.issued);
        self.active = Some(Schedule { handle, next_due: now + self.period });
        debug!("Tick schedule {:?} started ({:?} period)", handle, self.period);
        handle
    }

    /// Cancel the schedule identified by `handle`. Stale handles are ignored.
    pub fn cancel(&mut self, handle: TickHandle) -> bool {
        match &self.active {
            Some(schedule) if schedule.handle == handle => {
                self.active = None;
                debug!("Tick schedule {:?} cancelled", handle);
                true
            }
            _ => false,
        }
    }

    pub fn handle(&self) -> Option<TickHandle> {
        self.active.as_ref().map(|s| s.handle)
    }

    pub fn is_scheduled(&self) -> bool {
        self.active.is_some()
    }

    /// Number of ticks due at `now`, consuming them from the schedule.
    pub fn take_due(&mut self, now: Instant) -> u32 {
        let period = self.period;
        let Some(schedule) = self.active.as_mut() else {
            return 0;
        };

        let mut due = 0;
        while schedule.next_due <= now && due < MAX_CATCH_UP {
            schedule.next_due += period;
            due += 1;
        }
        if schedule.next_due <= now {
            debug!("Tick schedule fell behind; skipping missed ticks");
            schedule.next_due = now + period;
        }
        due
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_due_per_period() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::default();
        assert_eq!(scheduler.take_due(start + Duration::from_secs(1)), 0);

        scheduler.schedule(start);
        assert_eq!(scheduler.take_due(start + Duration::from_millis(50)), 0);
        assert_eq!(scheduler.take_due(start + Duration::from_millis(100)), 1);
        assert_eq!(scheduler.take_due(start + Duration::from_millis(350)), 2);
        assert_eq!(scheduler.take_due(start + Duration::from_millis(350)), 0);
    }

    #[test]
    fn test_catch_up_is_bounded() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::default();
        scheduler.schedule(start);
        assert_eq!(scheduler.take_due(start + Duration::from_secs(60)), MAX_CATCH_UP);
        assert_eq!(scheduler.take_due(start + Duration::from_secs(60)), 0);
    }

    #[test]
    fn test_cancel_stops_ticks() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::default();
        let stale = scheduler.schedule(start);
        let handle = scheduler.schedule(start);

        assert!(!scheduler.cancel(stale));
        assert!(scheduler.is_scheduled());
        assert!(scheduler.cancel(handle));
        assert!(!scheduler.is_scheduled());
        assert_eq!(scheduler.take_due(start + Duration::from_secs(1)), 0);
    }

    #[test]
    fn test_zero_period_is_raised() {
        let scheduler = TickScheduler::new(Duration::ZERO);
        assert!(scheduler.period() > Duration::ZERO);
    }
}
