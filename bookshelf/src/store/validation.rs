//! Field-level rules applied before any write.

use std::fmt::Display;

use super::BookChanges;

/// A refused field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The name of the form field.
    pub field: &'static str,

    /// The message to show next to the field.
    pub message: String,
}

/// Every refused field of a submission, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Check whether no field was refused.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the refused fields.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Get the message for a given field, if it was refused.
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }

            write!(f, "{}: {}", error.field, error.message)?;
        }

        Ok(())
    }
}

/// Values that passed validation and can be written as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidBook {
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub year: Option<i64>,
}

fn required(
    errors: &mut ValidationErrors,
    field: &'static str,
    label: &str,
    value: &str,
) -> String {
    if value.trim().is_empty() {
        errors.push(field, format!(r#"Please provide a value for "{label}""#));
    }

    value.to_owned()
}

/// Only an empty field is absent: anything else is kept as submitted.
fn optional(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

/// Validate submitted values.
pub(crate) fn validate(changes: &BookChanges) -> Result<ValidBook, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let title = required(&mut errors, "title", "Title", &changes.title);
    let author = required(&mut errors, "author", "Author", &changes.author);
    let genre = optional(&changes.genre);
    let year = match optional(&changes.year) {
        Some(year) => match year.trim().parse::<i64>() {
            Ok(year) => Some(year),
            Err(_) => {
                errors.push("year", r#""Year" must be a whole number"#);
                None
            }
        },
        None => None,
    };

    if errors.is_empty() {
        Ok(ValidBook {
            title,
            author,
            genre,
            year,
        })
    } else {
        Err(errors)
    }
}
