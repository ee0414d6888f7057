//! # Validation Errors
//!
//! Raised when input fails the domain's business rules. The API layer maps
//! every variant to a 422 response.

use thiserror::Error;

/// A domain value was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field was empty or whitespace only.
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    /// A text field exceeded its maximum length in characters.
    #[error("{field} must be at most {max} characters, got {actual}")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_names_field() {
        let err = ValidationError::Empty { field: "title" };
        assert_eq!(err.to_string(), "title must not be empty");
    }

    #[test]
    fn too_long_message_carries_lengths() {
        let err = ValidationError::TooLong {
            field: "title",
            max: 255,
            actual: 300,
        };
        let msg = err.to_string();
        assert!(msg.contains("255"), "got: {msg}");
        assert!(msg.contains("300"), "got: {msg}");
    }
}
