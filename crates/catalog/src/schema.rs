//! Validation schema shared by the create and edit paths.
//!
//! The edit path runs the exact same field rules as the create path (plus an
//! id requirement), so a payload rejected by one is rejected identically by
//! the other. Both the server's write endpoints and client-side form
//! validation call into this module.

use serde_json::Value;

use crate::models::{BookPayload, BookUpdate};

/// Rule a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    MissingOrEmpty,
    NotANumber,
    OutOfRange,
    MissingId,
}

/// A single field that failed validation, with the rule it violated and a
/// message suitable for inline display next to the originating input.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FieldError {
    pub field: String,
    pub rule: Rule,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            rule,
            message: message.into(),
        }
    }
}

/// Every field that failed validation, in schema field order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed for {} field(s)", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    /// The failures as loose JSON values for an error response body.
    pub fn details(&self) -> Vec<Value> {
        self.0
            .iter()
            .map(|error| serde_json::to_value(error).unwrap_or(Value::Null))
            .collect()
    }

    /// Names of the offending fields, in schema order.
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|error| error.field.as_str()).collect()
    }
}

/// Validate a creation payload, normalizing the year to an integer.
pub fn parse_payload(value: &Value) -> Result<BookPayload, ValidationErrors> {
    let mut errors = Vec::new();

    let title = text_field(value, "title", "Title", &mut errors);
    let author = text_field(value, "author", "Author", &mut errors);
    let genre = text_field(value, "genre", "Genre", &mut errors);
    let published_year = year_field(value, &mut errors);
    let status = text_field(value, "status", "Status", &mut errors);
    let image = text_field(value, "image", "Image URL", &mut errors);

    match (title, author, genre, published_year, status, image) {
        (Some(title), Some(author), Some(genre), Some(published_year), Some(status), Some(image)) => {
            Ok(BookPayload {
                title,
                author,
                genre,
                published_year,
                status,
                image,
            })
        }
        _ => Err(ValidationErrors(errors)),
    }
}

/// Validate an edit payload: a valid integer id plus the same field rules as
/// [`parse_payload`].
pub fn parse_update(value: &Value) -> Result<BookUpdate, ValidationErrors> {
    let id = value.get("id").and_then(Value::as_i64);
    let payload = parse_payload(value);

    match (id, payload) {
        (Some(id), Ok(fields)) => Ok(BookUpdate { id, fields }),
        (id, payload) => {
            let mut errors = Vec::new();
            if id.is_none() {
                errors.push(FieldError::new("id", Rule::MissingId, "Book id is required"));
            }
            if let Err(field_errors) = payload {
                errors.extend(field_errors.0);
            }
            Err(ValidationErrors(errors))
        }
    }
}

fn text_field(
    value: &Value,
    field: &'static str,
    label: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value.get(field).and_then(Value::as_str) {
        Some(text) if !text.trim().is_empty() => Some(text.to_string()),
        _ => {
            errors.push(FieldError::new(
                field,
                Rule::MissingOrEmpty,
                format!("{label} is required"),
            ));
            None
        }
    }
}

fn year_field(value: &Value, errors: &mut Vec<FieldError>) -> Option<i64> {
    // Coercion mirrors the form inputs: a bare integer, an integral float,
    // or an integer-looking string all pass; anything else does not.
    let coerced = match value.get("publishedYear") {
        Some(Value::Number(number)) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0)
                .map(|float| float as i64)
        }),
        Some(Value::String(text)) => text.trim().parse::<i64>().ok(),
        _ => None,
    };

    match coerced {
        None => {
            errors.push(FieldError::new(
                "publishedYear",
                Rule::NotANumber,
                "Published year must be a number",
            ));
            None
        }
        Some(year) if year < 0 => {
            errors.push(FieldError::new(
                "publishedYear",
                Rule::OutOfRange,
                "Published year must be 0 or greater",
            ));
            None
        }
        Some(year) => Some(year),
    }
}
