//! Field-level validation.
//!
//! Individual checks never fail a request on their own: they register their
//! failures in a [`FieldErrors`] accumulator, and the handler turns the whole
//! set into a single 400 response before touching the repository.

use serde::Serialize;

use crate::error::Error;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Accumulator for per-field validation failures.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a failure for the given field.
    pub fn push(&mut self, field: &str, message: &str) {
        self.0.push(FieldError::new(field, message));
    }

    /// Register a "required" failure if the value is empty or whitespace.
    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, &format!("{field} is required"));
        }
    }

    /// The aggregation point: succeed iff no check registered a failure.
    pub fn into_result(self) -> Result<(), Error> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_accumulator_passes() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn all_failures_are_aggregated() {
        let mut errors = FieldErrors::new();
        errors.require("titleSurvey", "");
        errors.require("description", "   ");
        errors.require("active", "true"); // non-empty, no failure
        errors.push("question[0].typeQuestion", "typeQuestion is required");

        match errors.into_result() {
            Err(Error::Validation(errors)) => {
                assert_eq!(errors.len(), 3);
                assert_eq!(errors[0].field, "titleSurvey");
                assert_eq!(errors[0].message, "titleSurvey is required");
                assert_eq!(errors[2].field, "question[0].typeQuestion");
            }
            other => panic!("Unexpected result: {other:?}"),
        }
    }
}
