//! Parsing error types for catalog page extraction
//!
//! Every variant carries the offending input or location so that a wrapped
//! error is enough to diagnose a markup change on the site.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Required field '{field}' not found in HTML")]
    RequiredFieldMissing {
        field: String,
        context: Option<String>,
    },

    #[error("Invalid count format: '{input}'")]
    InvalidCount { input: String },

    #[error("Invalid time format: '{input}'")]
    InvalidTime { input: String },

    #[error("Unexpected category format: '{text}'")]
    InvalidCategory { text: String },

    #[error("Row {row} has no cell for column '{column}'")]
    MissingCell { row: usize, column: String },

    #[error("Result table not found: {url}")]
    TableNotFound { url: String },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },
}

impl ParsingError {
    /// Create a required field missing error with context
    pub fn required_field_missing(field: &str, context: Option<&str>) -> Self {
        Self::RequiredFieldMissing {
            field: field.to_string(),
            context: context.map(ToString::to_string),
        }
    }

    pub fn invalid_count(input: &str) -> Self {
        Self::InvalidCount {
            input: input.to_string(),
        }
    }

    pub fn invalid_time(input: &str) -> Self {
        Self::InvalidTime {
            input: input.to_string(),
        }
    }

    pub fn missing_cell(row: usize, column: &str) -> Self {
        Self::MissingCell {
            row,
            column: column.to_string(),
        }
    }

    /// A field was present but its text could not be normalized
    pub const fn is_format_error(&self) -> bool {
        matches!(self, Self::InvalidCount { .. } | Self::InvalidTime { .. })
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_classification() {
        assert!(ParsingError::invalid_count("abc").is_format_error());
        assert!(ParsingError::invalid_time("yesterday").is_format_error());
        assert!(!ParsingError::missing_cell(0, "字数").is_format_error());
        assert!(!ParsingError::required_field_missing("title", None).is_format_error());
    }

    #[test]
    fn test_messages_name_the_input() {
        let err = ParsingError::missing_cell(2, "字数");
        assert_eq!(err.to_string(), "Row 2 has no cell for column '字数'");
    }
}
