use chrono::{DateTime, Utc};

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Expired,
    Stopped,
}

/// What a single tick observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { remaining_seconds: u64 },
    /// Returned by exactly one tick: the first one at or past the deadline.
    Expired,
    Inactive,
}

/// Countdown against an absolute deadline. Scheduling of ticks belongs to the
/// caller; this type only answers "where are we at `now`".
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    state: TimerState,
    total_seconds: u64,
    deadline: Option<DateTime<Utc>>,
    remaining_at_stop: u64,
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            total_seconds: 0,
            deadline: None,
            remaining_at_stop: 0,
        }
    }

    pub fn start(&mut self, total_seconds: u64, now: DateTime<Utc>) -> AppResult<()> {
        if self.state != TimerState::Idle {
            return Err(AppError::InternalError(format!(
                "Timer cannot be started from state {:?}",
                self.state
            )));
        }

        self.total_seconds = total_seconds;
        self.deadline = Some(now + chrono::Duration::seconds(total_seconds as i64));
        self.state = TimerState::Running;
        Ok(())
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> TimerEvent {
        let Some(deadline) = self.deadline else {
            return TimerEvent::Inactive;
        };
        if self.state != TimerState::Running {
            return TimerEvent::Inactive;
        }

        if now >= deadline {
            self.state = TimerState::Expired;
            return TimerEvent::Expired;
        }

        TimerEvent::Tick {
            remaining_seconds: Self::seconds_until(deadline, now),
        }
    }

    /// Running to stopped. Calling it in any other state does nothing.
    pub fn cancel(&mut self, now: DateTime<Utc>) {
        if self.state != TimerState::Running {
            return;
        }
        self.remaining_at_stop = self.remaining_seconds(now);
        self.state = TimerState::Stopped;
    }

    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> u64 {
        match (self.state, self.deadline) {
            (TimerState::Running, Some(deadline)) => Self::seconds_until(deadline, now),
            (TimerState::Stopped, _) => self.remaining_at_stop,
            (TimerState::Expired, _) => 0,
            _ => self.total_seconds,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    // Rounded up, so 0 is only reported once the deadline itself is reached.
    fn seconds_until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
        let millis = (deadline - now).num_milliseconds();
        if millis <= 0 {
            return 0;
        }
        (millis as u64).div_ceil(1000)
    }
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn started(total_seconds: u64) -> (CountdownTimer, DateTime<Utc>) {
        let now = Utc::now();
        let mut timer = CountdownTimer::new();
        timer.start(total_seconds, now).expect("idle timer should start");
        (timer, now)
    }

    #[test]
    fn new_timer_is_idle_and_inactive() {
        let mut timer = CountdownTimer::new();

        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.tick(Utc::now()), TimerEvent::Inactive);
    }

    #[test]
    fn tick_reports_time_left_until_deadline() {
        let (mut timer, start) = started(60);

        assert_eq!(
            timer.tick(start),
            TimerEvent::Tick { remaining_seconds: 60 }
        );
        assert_eq!(
            timer.tick(start + Duration::seconds(15)),
            TimerEvent::Tick { remaining_seconds: 45 }
        );
        assert_eq!(
            timer.tick(start + Duration::milliseconds(59_500)),
            TimerEvent::Tick { remaining_seconds: 1 }
        );
    }

    #[test]
    fn remaining_follows_deadline_even_with_irregular_ticks() {
        let (mut timer, start) = started(120);

        // Late and skipped ticks must not make the countdown drift.
        for offset in [1_000, 2_300, 2_310, 7_900, 64_000] {
            timer.tick(start + Duration::milliseconds(offset));
        }

        assert_eq!(
            timer.tick(start + Duration::seconds(100)),
            TimerEvent::Tick { remaining_seconds: 20 }
        );
    }

    #[test]
    fn expiry_fires_exactly_once() {
        let (mut timer, start) = started(60);

        assert_eq!(timer.tick(start + Duration::seconds(60)), TimerEvent::Expired);
        assert_eq!(timer.state(), TimerState::Expired);
        assert_eq!(timer.tick(start + Duration::seconds(61)), TimerEvent::Inactive);
        assert_eq!(timer.tick(start + Duration::seconds(500)), TimerEvent::Inactive);
        assert_eq!(timer.remaining_seconds(start + Duration::seconds(61)), 0);
    }

    #[test]
    fn late_first_tick_still_expires() {
        let (mut timer, start) = started(60);

        assert_eq!(timer.tick(start + Duration::seconds(3600)), TimerEvent::Expired);
    }

    #[test]
    fn cancel_stops_and_freezes_remaining() {
        let (mut timer, start) = started(60);

        timer.cancel(start + Duration::seconds(20));

        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.tick(start + Duration::seconds(60)), TimerEvent::Inactive);
        assert_eq!(timer.remaining_seconds(start + Duration::seconds(90)), 40);
    }

    #[test]
    fn cancel_is_idempotent() {
        let (mut timer, start) = started(60);

        timer.cancel(start + Duration::seconds(10));
        timer.cancel(start + Duration::seconds(30));

        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.remaining_seconds(start), 50);
    }

    #[test]
    fn cancel_after_expiry_is_a_no_op() {
        let (mut timer, start) = started(60);
        timer.tick(start + Duration::seconds(60));

        timer.cancel(start + Duration::seconds(61));

        assert_eq!(timer.state(), TimerState::Expired);
    }

    #[test]
    fn starting_twice_is_rejected() {
        let (mut timer, start) = started(60);

        let err = timer.start(30, start).unwrap_err();

        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert_eq!(timer.deadline(), Some(start + Duration::seconds(60)));
    }
}
