//! The job-posting extraction pipeline.
//!
//! `extract` builds the prompt for a link, sends it through a
//! [`CompletionSender`], validates the model's JSON and retries only when the
//! upstream answers HTTP 429. Attempts are strictly sequential and every call
//! owns its own [`RetryScheduler`].

pub mod observer;
pub mod prompt;
pub mod record;
pub mod retry;

use std::fmt;

use tokio::time::sleep;

use crate::config::JobparseConfig;
use crate::error::{ExtractError, FailureKind};
use crate::openai::{ChatRequest, CompletionSender, OpenAiClient, OpenAiError};
use observer::{ExtractionEvent, ExtractionObserver, TracingObserver};
use prompt::{DEFAULT_MODEL, build_request};
use record::{ExtractedJobRecord, ValidationError};
use retry::{AttemptOutcome, RetryScheduler, Transition};

pub const DEFAULT_RETRIES: u32 = 5;

/// Extract a job record from `job_link` with the default client and observer.
pub async fn extract(
    job_link: &str,
    api_key: &str,
    retries: u32,
) -> Result<ExtractedJobRecord, ExtractError> {
    Extractor::new().extract(job_link, api_key, retries).await
}

/// Runs the extraction pipeline against a [`CompletionSender`].
///
/// Holds no per-call state: the same extractor can serve any number of
/// independent calls.
pub struct Extractor<S = OpenAiClient, O = TracingObserver> {
    sender: S,
    observer: O,
    model: String,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self::with_sender(OpenAiClient::new())
    }

    pub fn from_config(config: &JobparseConfig) -> Self {
        Self::with_sender(OpenAiClient::with_endpoint(config.endpoint.clone()))
            .with_model(config.model.clone())
    }
}

impl<S> Extractor<S> {
    pub fn with_sender(sender: S) -> Self {
        Self {
            sender,
            observer: TracingObserver,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl<S, O> Extractor<S, O> {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_observer<P>(self, observer: P) -> Extractor<S, P> {
        Extractor {
            sender: self.sender,
            observer,
            model: self.model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The request that `extract` would send for `job_link`.
    pub fn request_for(&self, job_link: &str) -> ChatRequest {
        build_request(&self.model, job_link)
    }
}

impl<S, O> Extractor<S, O>
where
    S: CompletionSender,
    O: ExtractionObserver,
{
    /// Extract a record, allowing at most `retries` attempts in total.
    ///
    /// Preconditions are checked before any request is issued. Only rate-limit
    /// responses are retried; every other failure ends the call on the attempt
    /// that produced it.
    pub async fn extract(
        &self,
        job_link: &str,
        api_key: &str,
        retries: u32,
    ) -> Result<ExtractedJobRecord, ExtractError> {
        if job_link.trim().is_empty() {
            return Err(ExtractError::InvalidJobLink);
        }
        if api_key.trim().is_empty() {
            return Err(ExtractError::MissingApiKey);
        }
        if retries == 0 {
            return Err(ExtractError::NoAttemptsAllowed);
        }

        let request = self.request_for(job_link);
        let mut scheduler = RetryScheduler::new(retries);

        loop {
            let attempt = scheduler.attempts_made();
            self.observer.on_event(&ExtractionEvent::AttemptStarted {
                attempt,
                max_attempts: scheduler.max_attempts(),
            });

            let failure = match self.attempt(api_key, &request).await {
                Ok(record) => {
                    scheduler.record(AttemptOutcome::Success);
                    self.observer
                        .on_event(&ExtractionEvent::Succeeded { attempt });
                    return Ok(record);
                }
                Err(failure) => failure,
            };

            self.observer.on_event(&ExtractionEvent::AttemptFailed {
                attempt,
                kind: failure.kind(),
                message: failure.to_string(),
            });

            match scheduler.record(failure.outcome()) {
                Transition::Backoff { delay } => {
                    self.observer
                        .on_event(&ExtractionEvent::BackoffScheduled { attempt, delay });
                    sleep(delay).await;
                    scheduler.resume();
                }
                Transition::Terminated(_) => {
                    let err = failure.into_error(attempt);
                    self.observer.on_event(&ExtractionEvent::GaveUp {
                        attempts: attempt,
                        kind: err.kind(),
                    });
                    return Err(err);
                }
            }
        }
    }

    async fn attempt(
        &self,
        api_key: &str,
        request: &ChatRequest,
    ) -> Result<ExtractedJobRecord, AttemptFailure> {
        let completion = self
            .sender
            .send_completion(api_key, request)
            .await
            .map_err(AttemptFailure::Transport)?;
        ExtractedJobRecord::from_model_output(&completion.content)
            .map_err(AttemptFailure::Validation)
    }
}

/// Failure of a single Transport + Validator round, before classification.
#[derive(Debug)]
enum AttemptFailure {
    Transport(OpenAiError),
    Validation(ValidationError),
}

impl AttemptFailure {
    fn kind(&self) -> FailureKind {
        match self {
            AttemptFailure::Transport(OpenAiError::RateLimited { .. }) => FailureKind::RateLimit,
            AttemptFailure::Transport(OpenAiError::InvalidResponse(_)) => {
                FailureKind::UpstreamShape
            }
            AttemptFailure::Transport(_) => FailureKind::Transport,
            AttemptFailure::Validation(ValidationError::Parse(_)) => FailureKind::Parse,
            AttemptFailure::Validation(ValidationError::Schema(_)) => FailureKind::Schema,
        }
    }

    fn outcome(&self) -> AttemptOutcome {
        match self {
            AttemptFailure::Transport(OpenAiError::RateLimited { retry_after, .. }) => {
                AttemptOutcome::RateLimited {
                    retry_after: *retry_after,
                }
            }
            _ => AttemptOutcome::Fatal,
        }
    }

    /// A rate-limit failure only terminates the scheduler once the bound is
    /// hit, so it always maps to `RetriesExhausted`.
    fn into_error(self, attempt: u32) -> ExtractError {
        match self {
            AttemptFailure::Transport(source @ OpenAiError::RateLimited { .. }) => {
                ExtractError::RetriesExhausted {
                    attempts: attempt,
                    source,
                }
            }
            AttemptFailure::Transport(OpenAiError::InvalidResponse(reason)) => {
                ExtractError::UpstreamShape { attempt, reason }
            }
            AttemptFailure::Transport(source) => ExtractError::Transport { attempt, source },
            AttemptFailure::Validation(ValidationError::Parse(source)) => {
                ExtractError::Parse { attempt, source }
            }
            AttemptFailure::Validation(ValidationError::Schema(source)) => {
                ExtractError::Schema { attempt, source }
            }
        }
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::Transport(e) => write!(f, "{e}"),
            AttemptFailure::Validation(e) => write!(f, "{e}"),
        }
    }
}
