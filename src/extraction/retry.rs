use std::fmt;
use std::time::Duration;

/// Delay used when a rate-limited response carries no usable `retry-after`.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Linear backoff: the server hint scaled by the 1-based attempt number.
///
/// `attempt_index` is the 0-based index of the attempt that was rate limited.
/// The linear scaling is deliberate and still needs confirming against real
/// rate-limit behaviour.
pub fn backoff_delay(retry_after: Option<Duration>, attempt_index: u32) -> Duration {
    retry_after
        .unwrap_or(DEFAULT_RETRY_AFTER)
        .saturating_mul(attempt_index.saturating_add(1))
}

/// How a single Transport + Validator round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    /// HTTP 429, with the advertised `retry-after` if there was one.
    RateLimited { retry_after: Option<Duration> },
    /// Anything else: never retried.
    Fatal,
}

/// Why the scheduler stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Success,
    Fatal,
    Exhausted,
}

/// The three states of the retry scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Attempting { attempt: u32 },
    Backoff { attempt: u32, delay: Duration },
    Terminated(Termination),
}

impl fmt::Display for RetryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryState::Attempting { attempt } => write!(f, "ATTEMPTING({})", attempt + 1),
            RetryState::Backoff { attempt, delay } => {
                write!(f, "BACKOFF({}, {}ms)", attempt + 1, delay.as_millis())
            }
            RetryState::Terminated(t) => write!(f, "TERMINATED({t:?})"),
        }
    }
}

/// The result of feeding an outcome to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Sleep for `delay`, then call [`RetryScheduler::resume`].
    Backoff { delay: Duration },
    /// No further attempts.
    Terminated(Termination),
}

/// Explicit state machine for the rate-limit-aware retry loop.
///
/// Starts in `Attempting { attempt: 0 }`. Each call to [`record`] consumes
/// the outcome of the current attempt:
///
/// - `Success` terminates with success.
/// - `Fatal` terminates immediately, whatever attempts remain.
/// - `RateLimited` moves to `Backoff` if another attempt is allowed,
///   otherwise terminates as exhausted.
///
/// [`record`]: RetryScheduler::record
#[derive(Debug, Clone)]
pub struct RetryScheduler {
    max_attempts: u32,
    state: RetryState,
    attempts: u32,
}

impl RetryScheduler {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            state: RetryState::Attempting { attempt: 0 },
            attempts: 1,
        }
    }

    pub fn state(&self) -> RetryState {
        self.state
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Number of attempts issued so far (including the current one).
    pub fn attempts_made(&self) -> u32 {
        self.attempts
    }

    /// Feed the outcome of the current attempt.
    ///
    /// Calling this outside `Attempting` leaves the state unchanged and
    /// reports where the scheduler already is.
    pub fn record(&mut self, outcome: AttemptOutcome) -> Transition {
        let attempt = match self.state {
            RetryState::Attempting { attempt } => attempt,
            RetryState::Backoff { delay, .. } => return Transition::Backoff { delay },
            RetryState::Terminated(t) => return Transition::Terminated(t),
        };

        let transition = match outcome {
            AttemptOutcome::Success => Transition::Terminated(Termination::Success),
            AttemptOutcome::Fatal => Transition::Terminated(Termination::Fatal),
            AttemptOutcome::RateLimited { retry_after } => {
                if attempt + 1 < self.max_attempts {
                    Transition::Backoff {
                        delay: backoff_delay(retry_after, attempt),
                    }
                } else {
                    Transition::Terminated(Termination::Exhausted)
                }
            }
        };

        self.state = match transition {
            Transition::Backoff { delay, .. } => RetryState::Backoff { attempt, delay },
            Transition::Terminated(t) => RetryState::Terminated(t),
        };
        transition
    }

    /// Leave `Backoff` once the delay has elapsed.
    pub fn resume(&mut self) {
        if let RetryState::Backoff { attempt, .. } = self.state {
            self.attempts += 1;
            self.state = RetryState::Attempting {
                attempt: attempt + 1,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limited(secs: u64) -> AttemptOutcome {
        AttemptOutcome::RateLimited {
            retry_after: Some(Duration::from_secs(secs)),
        }
    }

    #[test]
    fn backoff_scales_linearly_with_attempt() {
        let hint = Some(Duration::from_secs(2));
        assert_eq!(backoff_delay(hint, 0), Duration::from_secs(2));
        assert_eq!(backoff_delay(hint, 1), Duration::from_secs(4));
        assert_eq!(backoff_delay(hint, 2), Duration::from_secs(6));
    }

    #[test]
    fn backoff_defaults_to_one_second_hint() {
        assert_eq!(backoff_delay(None, 0), Duration::from_secs(1));
        assert_eq!(backoff_delay(None, 3), Duration::from_secs(4));
        assert_eq!(
            backoff_delay(Some(Duration::ZERO), 4),
            Duration::ZERO
        );
    }

    #[test]
    fn success_terminates_immediately() {
        let mut s = RetryScheduler::new(5);
        assert_eq!(s.state(), RetryState::Attempting { attempt: 0 });
        let t = s.record(AttemptOutcome::Success);
        assert_eq!(t, Transition::Terminated(Termination::Success));
        assert_eq!(s.state(), RetryState::Terminated(Termination::Success));
        assert_eq!(s.attempts_made(), 1);
    }

    #[test]
    fn fatal_terminates_regardless_of_remaining_attempts() {
        let mut s = RetryScheduler::new(5);
        assert_eq!(
            s.record(AttemptOutcome::Fatal),
            Transition::Terminated(Termination::Fatal)
        );
        assert_eq!(s.attempts_made(), 1);
    }

    #[test]
    fn rate_limit_backs_off_then_resumes() {
        let mut s = RetryScheduler::new(5);
        let t = s.record(limited(2));
        assert_eq!(
            t,
            Transition::Backoff {
                delay: Duration::from_secs(2)
            }
        );
        assert_eq!(
            s.state(),
            RetryState::Backoff {
                attempt: 0,
                delay: Duration::from_secs(2)
            }
        );

        s.resume();
        assert_eq!(s.state(), RetryState::Attempting { attempt: 1 });

        let t = s.record(limited(2));
        assert_eq!(
            t,
            Transition::Backoff {
                delay: Duration::from_secs(4)
            }
        );
        s.resume();

        assert_eq!(
            s.record(AttemptOutcome::Success),
            Transition::Terminated(Termination::Success)
        );
        assert_eq!(s.attempts_made(), 3);
    }

    #[test]
    fn always_rate_limited_exhausts_after_max_attempts() {
        let mut s = RetryScheduler::new(3);
        let mut issued = 0;
        loop {
            issued += 1;
            match s.record(limited(1)) {
                Transition::Backoff { .. } => s.resume(),
                Transition::Terminated(t) => {
                    assert_eq!(t, Termination::Exhausted);
                    break;
                }
            }
        }
        assert_eq!(issued, 3);
        assert_eq!(s.attempts_made(), 3);
    }

    #[test]
    fn single_attempt_bound_never_backs_off() {
        let mut s = RetryScheduler::new(1);
        assert_eq!(
            s.record(limited(1)),
            Transition::Terminated(Termination::Exhausted)
        );
    }

    #[test]
    fn record_outside_attempting_is_a_no_op() {
        let mut s = RetryScheduler::new(2);
        s.record(AttemptOutcome::Fatal);
        assert_eq!(
            s.record(AttemptOutcome::Success),
            Transition::Terminated(Termination::Fatal)
        );
        s.resume();
        assert_eq!(s.state(), RetryState::Terminated(Termination::Fatal));
    }

    #[test]
    fn attempts_made_counts_resumed_attempts() {
        let mut s = RetryScheduler::new(3);
        assert_eq!(s.max_attempts(), 3);
        assert_eq!(s.attempts_made(), 1);
        s.record(limited(1));
        assert_eq!(s.attempts_made(), 1);
        s.resume();
        assert_eq!(s.attempts_made(), 2);
        s.record(AttemptOutcome::Fatal);
        assert_eq!(s.attempts_made(), 2);
    }

    #[test]
    fn state_display() {
        assert_eq!(RetryState::Attempting { attempt: 0 }.to_string(), "ATTEMPTING(1)");
        assert_eq!(
            RetryState::Backoff {
                attempt: 1,
                delay: Duration::from_millis(2500)
            }
            .to_string(),
            "BACKOFF(2, 2500ms)"
        );
        assert_eq!(
            RetryState::Terminated(Termination::Exhausted).to_string(),
            "TERMINATED(Exhausted)"
        );
    }
}
