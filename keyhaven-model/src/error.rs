//! Model error types.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur building entities and collections.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("duplicate id {0} in collection")]
    DuplicateId(String),
}

/// Accumulated per-field validation problems.
///
/// Every check appends instead of short-circuiting, so one failed
/// construction carries the complete list of broken fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a problem with `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_default().push(message.into());
    }

    /// Merges another set of errors, prefixing each field with `prefix`.
    /// Used for nested/associated entities.
    pub fn merge_nested(&mut self, prefix: &str, other: FieldErrors) {
        for (field, messages) in other.errors {
            self.errors
                .entry(format!("{prefix}.{field}"))
                .or_default()
                .extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages recorded for one field, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    /// Fields that have at least one problem.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// Returns `Ok(())` when no problem was recorded, otherwise the full set
    /// wrapped as a [`ModelError::Validation`].
    pub fn into_result(self) -> ModelResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ModelError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.errors {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}
