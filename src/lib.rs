//! Turns a job posting link into a validated, structured job record by asking
//! a chat-completion API to read the posting.
//!
//! ```rust,ignore
//! let record = jobparse::extract(
//!     "https://jobs.example.com/postings/42",
//!     &api_key,
//!     jobparse::DEFAULT_RETRIES,
//! )
//! .await?;
//! println!("{} at {}", record.position, record.company);
//! ```

pub mod application;
pub mod config;
pub mod error;
pub mod extraction;
pub mod openai;

pub use error::{ExtractError, FailureKind};
pub use extraction::record::{ExtractedJobRecord, SchemaError, Sponsorship};
pub use extraction::{DEFAULT_RETRIES, Extractor, extract};
