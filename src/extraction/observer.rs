//! Injectable observability hook for the extraction pipeline.
//!
//! The pipeline never logs directly: it emits [`ExtractionEvent`]s to an
//! [`ExtractionObserver`]. [`TracingObserver`] forwards them to `tracing`;
//! [`RecordingObserver`] keeps them in memory so callers and tests can
//! inspect what happened.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::FailureKind;

/// Something that happened during one `extract` call. Attempt numbers are
/// 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionEvent {
    AttemptStarted {
        attempt: u32,
        max_attempts: u32,
    },
    AttemptFailed {
        attempt: u32,
        kind: FailureKind,
        message: String,
    },
    BackoffScheduled {
        attempt: u32,
        delay: Duration,
    },
    Succeeded {
        attempt: u32,
    },
    GaveUp {
        attempts: u32,
        kind: FailureKind,
    },
}

pub trait ExtractionObserver: Send + Sync {
    fn on_event(&self, event: &ExtractionEvent);
}

impl<O: ExtractionObserver + ?Sized> ExtractionObserver for &O {
    fn on_event(&self, event: &ExtractionEvent) {
        (**self).on_event(event)
    }
}

impl<O: ExtractionObserver + ?Sized> ExtractionObserver for std::sync::Arc<O> {
    fn on_event(&self, event: &ExtractionEvent) {
        (**self).on_event(event)
    }
}

/// Default observer: structured `tracing` events under the `jobparse` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ExtractionObserver for TracingObserver {
    fn on_event(&self, event: &ExtractionEvent) {
        match event {
            ExtractionEvent::AttemptStarted {
                attempt,
                max_attempts,
            } => {
                debug!(target: "jobparse", attempt, max_attempts, "extraction attempt started");
            }
            ExtractionEvent::AttemptFailed {
                attempt,
                kind,
                message,
            } => {
                warn!(target: "jobparse", attempt, kind = %kind, error = %message, "extraction attempt failed");
            }
            ExtractionEvent::BackoffScheduled { attempt, delay } => {
                warn!(
                    target: "jobparse",
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "rate limit hit, backing off"
                );
            }
            ExtractionEvent::Succeeded { attempt } => {
                info!(target: "jobparse", attempt, "job posting extracted");
            }
            ExtractionEvent::GaveUp { attempts, kind } => {
                warn!(target: "jobparse", attempts, kind = %kind, "extraction failed");
            }
        }
    }
}

/// Keeps every event in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ExtractionEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ExtractionEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Delays of every scheduled backoff, in order.
    pub fn backoff_delays(&self) -> Vec<Duration> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ExtractionEvent::BackoffScheduled { delay, .. } => Some(delay),
                _ => None,
            })
            .collect()
    }

    /// Attempt numbers of every failed attempt, in order.
    pub fn failed_attempts(&self) -> Vec<u32> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ExtractionEvent::AttemptFailed { attempt, .. } => Some(attempt),
                _ => None,
            })
            .collect()
    }
}

impl ExtractionObserver for RecordingObserver {
    fn on_event(&self, event: &ExtractionEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
