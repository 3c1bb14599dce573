//! Job application documents built from extracted records.
//!
//! This is the caller's side of the pipeline: the record returned by
//! `extract` is merged with the posting link, a `Planned` status and an empty
//! applied date before it is stored.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::extraction::record::{ExtractedJobRecord, Sponsorship};

/// Workflow status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Planned,
    Applied,
    Interviewed,
    Rejected,
    Accepted,
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationStatus::Planned => write!(f, "Planned"),
            ApplicationStatus::Applied => write!(f, "Applied"),
            ApplicationStatus::Interviewed => write!(f, "Interviewed"),
            ApplicationStatus::Rejected => write!(f, "Rejected"),
            ApplicationStatus::Accepted => write!(f, "Accepted"),
        }
    }
}

/// A tracked job application, serialized in the stored document layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub company: String,
    pub position: String,
    pub salary: Option<String>,
    pub h1b_sponsorship: Sponsorship,
    pub more_info: String,
    pub skills: String,
    pub job_link: String,
    pub status: ApplicationStatus,
    pub applied_on: Option<NaiveDate>,
}

impl JobApplication {
    pub fn from_extraction(record: ExtractedJobRecord, job_link: impl Into<String>) -> Self {
        Self {
            company: record.company,
            position: record.position,
            salary: record.salary,
            h1b_sponsorship: record.h1b_sponsorship,
            more_info: record.more_info,
            skills: record.skills,
            job_link: job_link.into(),
            status: ApplicationStatus::Planned,
            applied_on: None,
        }
    }
}
