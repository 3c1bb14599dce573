//! The extracted job record and the validator that builds it from untrusted
//! model output.
//!
//! Fields are checked in a fixed order (company, position, salary,
//! h1bSponsorship, moreInfo, skills) and the first violation is reported.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Field names exactly as they appear in the model's JSON.
pub const FIELD_COMPANY: &str = "company";
pub const FIELD_POSITION: &str = "position";
pub const FIELD_SALARY: &str = "salary";
pub const FIELD_SPONSORSHIP: &str = "h1bSponsorship";
pub const FIELD_MORE_INFO: &str = "moreInfo";
pub const FIELD_SKILLS: &str = "skills";

const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₹', '₩', '₽', '₪', '₺', '₫', '¢'];

/// Tri-state H1B sponsorship status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sponsorship {
    #[serde(rename = "true")]
    Offered,
    #[serde(rename = "false")]
    NotOffered,
    #[serde(rename = "not found")]
    NotFound,
}

impl Sponsorship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sponsorship::Offered => "true",
            Sponsorship::NotOffered => "false",
            Sponsorship::NotFound => "not found",
        }
    }

    fn from_literal(value: &str) -> Option<Self> {
        match value {
            "true" => Some(Sponsorship::Offered),
            "false" => Some(Sponsorship::NotOffered),
            "not found" => Some(Sponsorship::NotFound),
            _ => None,
        }
    }
}

impl fmt::Display for Sponsorship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured fields extracted from one job posting.
///
/// Only ever produced by [`ExtractedJobRecord::from_model_output`] (or
/// deserialized by the caller from its own storage), never mutated by the
/// pipeline after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedJobRecord {
    pub company: String,
    pub position: String,
    /// Integer midpoint as digits and commas, without a currency symbol.
    pub salary: Option<String>,
    pub h1b_sponsorship: Sponsorship,
    pub more_info: String,
    /// Comma-separated flat list.
    pub skills: String,
}

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Missing,
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    Empty,
    NotFoundSentinel,
    CurrencySymbol(char),
    NotDigitsAndCommas(String),
    NotAllowed(String),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Missing => write!(f, "field is missing"),
            Violation::WrongType { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Violation::Empty => write!(f, "must not be empty"),
            Violation::NotFoundSentinel => {
                write!(f, "\"not found\" is not allowed, null must be used instead")
            }
            Violation::CurrencySymbol(symbol) => {
                write!(f, "must not contain the currency symbol '{symbol}'")
            }
            Violation::NotDigitsAndCommas(value) => {
                write!(f, "{value:?} is not an integer written with digits and commas")
            }
            Violation::NotAllowed(value) => write!(
                f,
                "{value} is not one of \"true\", \"false\", \"not found\""
            ),
        }
    }
}

/// The first schema violation found in the model output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("invalid {field} field: {violation}")]
    InvalidField {
        field: &'static str,
        violation: Violation,
    },
}

impl SchemaError {
    /// Name of the offending field, if the failure is field-specific.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            SchemaError::NotAnObject { .. } => None,
            SchemaError::InvalidField { field, .. } => Some(*field),
        }
    }

    fn field_error(field: &'static str, violation: Violation) -> Self {
        SchemaError::InvalidField { field, violation }
    }
}

/// Failure to turn the model's text into a record.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("upstream returned non-JSON content: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid response format: {0}")]
    Schema(#[from] SchemaError),
}

impl ExtractedJobRecord {
    /// Parses the message content as JSON and validates every field.
    pub fn from_model_output(content: &str) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_str(content)?;
        Ok(Self::from_value(&value)?)
    }

    /// Validates an already-parsed JSON value.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let object = value.as_object().ok_or(SchemaError::NotAnObject {
            found: type_name(value),
        })?;

        let company = required_text(object, FIELD_COMPANY)?;
        let position = required_text(object, FIELD_POSITION)?;
        let salary = salary(object)?;
        let h1b_sponsorship = sponsorship(object)?;
        let more_info = required_text(object, FIELD_MORE_INFO)?;
        let skills = required_text(object, FIELD_SKILLS)?;

        Ok(Self {
            company,
            position,
            salary,
            h1b_sponsorship,
            more_info,
            skills,
        })
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn string_field<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, SchemaError> {
    match object.get(field) {
        None => Err(SchemaError::field_error(field, Violation::Missing)),
        Some(Value::String(text)) => Ok(text),
        Some(other) => Err(SchemaError::field_error(
            field,
            Violation::WrongType {
                expected: "string",
                found: type_name(other),
            },
        )),
    }
}

fn required_text(object: &Map<String, Value>, field: &'static str) -> Result<String, SchemaError> {
    let text = string_field(object, field)?;
    if text.trim().is_empty() {
        return Err(SchemaError::field_error(field, Violation::Empty));
    }
    Ok(text.to_string())
}

fn salary(object: &Map<String, Value>) -> Result<Option<String>, SchemaError> {
    let text = match object.get(FIELD_SALARY) {
        None => return Err(SchemaError::field_error(FIELD_SALARY, Violation::Missing)),
        Some(Value::Null) => return Ok(None),
        Some(Value::String(text)) => text,
        Some(other) => {
            return Err(SchemaError::field_error(
                FIELD_SALARY,
                Violation::WrongType {
                    expected: "string or null",
                    found: type_name(other),
                },
            ));
        }
    };

    if text.trim().eq_ignore_ascii_case("not found") {
        return Err(SchemaError::field_error(
            FIELD_SALARY,
            Violation::NotFoundSentinel,
        ));
    }
    if let Some(symbol) = text.chars().find(|c| CURRENCY_SYMBOLS.contains(c)) {
        return Err(SchemaError::field_error(
            FIELD_SALARY,
            Violation::CurrencySymbol(symbol),
        ));
    }
    let well_formed = text.chars().any(|c| c.is_ascii_digit())
        && text.chars().all(|c| c.is_ascii_digit() || c == ',');
    if !well_formed {
        return Err(SchemaError::field_error(
            FIELD_SALARY,
            Violation::NotDigitsAndCommas(text.clone()),
        ));
    }
    Ok(Some(text.clone()))
}

fn sponsorship(object: &Map<String, Value>) -> Result<Sponsorship, SchemaError> {
    match object.get(FIELD_SPONSORSHIP) {
        None => Err(SchemaError::field_error(FIELD_SPONSORSHIP, Violation::Missing)),
        Some(Value::String(text)) => Sponsorship::from_literal(text).ok_or_else(|| {
            SchemaError::field_error(FIELD_SPONSORSHIP, Violation::NotAllowed(format!("{text:?}")))
        }),
        Some(other) => Err(SchemaError::field_error(
            FIELD_SPONSORSHIP,
            Violation::NotAllowed(other.to_string()),
        )),
    }
}
