use std::time::{Duration, Instant};

/// Time between ticks at speed 1.0.
pub const BASE_PERIOD: Duration = Duration::from_millis(3000);

pub const MIN_SPEED: f64 = 0.5;
pub const MAX_SPEED: f64 = 5.0;
pub const SPEED_STEP: f64 = 0.2;
pub const DEFAULT_SPEED: f64 = 2.0;

pub fn clamp_speed(speed: f64) -> f64 {
    if speed.is_nan() {
        return DEFAULT_SPEED;
    }
    speed.clamp(MIN_SPEED, MAX_SPEED)
}

/// Tick period for a speed multiplier: `3000ms / speed`.
pub fn tick_period(speed: f64) -> Duration {
    BASE_PERIOD.div_f64(clamp_speed(speed))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub active_index: usize,
    pub speed: f64,
    pub focus_mode: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            active_index: 0,
            speed: DEFAULT_SPEED,
            focus_mode: false,
        }
    }
}

/// Identifies one scheduled tick. Tokens are never reused, so a deadline
/// that was cancelled or replaced cannot be fired later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickToken(u64);

#[derive(Clone, Copy, Debug)]
struct PendingTick {
    token: TickToken,
    due: Instant,
    period: Duration,
}

/// Recurring single-timer scheduler.
///
/// At most one tick is pending. `schedule` always replaces (cancels) the
/// previous one, which is how pause, reset and speed changes tear down
/// the old period before a new one starts.
#[derive(Debug, Default)]
pub struct PlaybackClock {
    pending: Option<PendingTick>,
    next_token: u64,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, period: Duration) -> TickToken {
        self.next_token = self.next_token.wrapping_add(1);
        let token = TickToken(self.next_token);
        self.pending = Some(PendingTick {
            token,
            due: now + period,
            period,
        });
        token
    }

    /// Drop the pending tick. Returns whether one was live.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_live(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|pending| pending.due)
    }

    /// Token of the pending tick if its deadline has passed.
    pub fn due(&self, now: Instant) -> Option<TickToken> {
        self.pending
            .filter(|pending| pending.due <= now)
            .map(|pending| pending.token)
    }

    /// Consume a tick and re-arm for the next period.
    ///
    /// Returns `false` for a stale token or when nothing is pending. After a
    /// stall the next deadline is measured from `now` instead of bursting
    /// through the missed ones.
    pub fn fire(&mut self, token: TickToken, now: Instant) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        if pending.token != token {
            return false;
        }
        let next = pending.due + pending.period;
        pending.due = if next <= now { now + pending.period } else { next };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn period_is_base_divided_by_speed() {
        assert_eq!(tick_period(2.0), ms(1500));
        assert_eq!(tick_period(0.5), ms(6000));
        assert_eq!(tick_period(1.0), BASE_PERIOD);

        let mut speed = MIN_SPEED;
        while speed <= MAX_SPEED {
            let expected = 3.0 / speed;
            assert!((tick_period(speed).as_secs_f64() - expected).abs() < 1e-6);
            speed += SPEED_STEP;
        }
    }

    #[test]
    fn speed_is_clamped_into_domain() {
        assert_eq!(clamp_speed(0.1), MIN_SPEED);
        assert_eq!(clamp_speed(9.0), MAX_SPEED);
        assert_eq!(clamp_speed(f64::NAN), DEFAULT_SPEED);
        assert_eq!(tick_period(100.0), tick_period(MAX_SPEED));
        assert_eq!(tick_period(0.0), tick_period(MIN_SPEED));
    }

    #[test]
    fn nothing_is_due_before_the_deadline() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::new();
        let token = clock.schedule(t0, ms(1500));

        assert_eq!(clock.deadline(), Some(t0 + ms(1500)));
        assert_eq!(clock.due(t0 + ms(1499)), None);
        assert_eq!(clock.due(t0 + ms(1500)), Some(token));
    }

    #[test]
    fn firing_rearms_for_the_next_period() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::new();
        let token = clock.schedule(t0, ms(1500));

        assert!(clock.fire(token, t0 + ms(1510)));
        assert_eq!(clock.deadline(), Some(t0 + ms(3000)));
        assert_eq!(clock.due(t0 + ms(3000)), Some(token));
    }

    #[test]
    fn stalled_loop_does_not_burst() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::new();
        let token = clock.schedule(t0, ms(1000));

        assert!(clock.fire(token, t0 + ms(5200)));
        assert_eq!(clock.deadline(), Some(t0 + ms(6200)));
    }

    #[test]
    fn rescheduling_invalidates_the_old_token() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::new();
        let old = clock.schedule(t0, ms(1500));
        let new = clock.schedule(t0 + ms(700), ms(600));

        assert_ne!(old, new);
        assert!(!clock.fire(old, t0 + ms(1500)));
        assert_eq!(clock.deadline(), Some(t0 + ms(1300)));
        assert!(clock.fire(new, t0 + ms(1300)));
        assert_eq!(clock.deadline(), Some(t0 + ms(1900)));
    }

    #[test]
    fn cancelled_tick_never_fires() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::new();
        let token = clock.schedule(t0, ms(1500));

        assert!(clock.cancel());
        assert!(!clock.cancel());
        assert!(!clock.is_live());
        assert_eq!(clock.due(t0 + ms(10_000)), None);
        assert!(!clock.fire(token, t0 + ms(10_000)));
    }
}
