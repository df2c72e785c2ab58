use std::time::{Duration, Instant};

/// Fixed-interval timer driven by the host loop's clock. Missed periods are
/// not replayed: a late check fires once and re-arms from `now`.
#[derive(Clone, Debug)]
pub struct PollTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl PollTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        if let Some(due) = self.next_due.as_mut() {
            // Pull the next firing in when the interval shrinks.
            let shift = self.interval.saturating_sub(interval);
            *due = due.checked_sub(shift).unwrap_or(*due);
        }
        self.interval = interval;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Arms the timer so the first check at or after `now` fires.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn due(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        let next = due + self.interval;
        self.next_due = Some(if next <= now { now + self.interval } else { next });
        true
    }
}
