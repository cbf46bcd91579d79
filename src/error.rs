// ⚠️ Record Errors - closed taxonomy shared by every repository and parser
//
// All four kinds are recoverable: callers match on them, print a message
// and keep going. File and serialization failures are NOT part of this
// enum; they travel as anyhow::Error with context attached.

use thiserror::Error;

pub type RecordResult<T> = Result<T, RecordError>;

// ============================================================================
// RECORD ERROR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Insert with a key that is already stored
    #[error("Item with ID {key} already exists.")]
    DuplicateKey { key: String },

    /// Lookup, removal or update on a key that is not stored
    #[error("Item with ID {key} not found.")]
    NotFound { key: String },

    /// A value outside its allowed range (negative quantity, overdraft, ...)
    #[error("Invalid {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    /// Text input that could not be parsed into a record
    #[error("Line {line}: {defect}")]
    MalformedInput { line: usize, defect: InputDefect },
}

impl RecordError {
    pub fn duplicate(key: impl ToString) -> Self {
        RecordError::DuplicateKey { key: key.to_string() }
    }

    pub fn not_found(key: impl ToString) -> Self {
        RecordError::NotFound { key: key.to_string() }
    }

    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        RecordError::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn malformed(line: usize, defect: InputDefect) -> Self {
        RecordError::MalformedInput { line, defect }
    }

    /// Short label used when reporting to the console
    pub fn kind(&self) -> &'static str {
        match self {
            RecordError::DuplicateKey { .. } => "Duplicate Error",
            RecordError::NotFound { .. } => "Not Found",
            RecordError::InvalidValue { .. } => "Invalid Value",
            RecordError::MalformedInput { .. } => "Malformed Input",
        }
    }
}

/// What exactly was wrong with a line of text input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputDefect {
    #[error("expected {expected} fields, found {found}: \"{raw}\"")]
    FieldCount {
        expected: usize,
        found: usize,
        raw: String,
    },

    #[error("invalid {field} format: \"{value}\"")]
    NotANumber { field: String, value: String },
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            RecordError::duplicate(1).to_string(),
            "Item with ID 1 already exists."
        );
        assert_eq!(
            RecordError::not_found(999).to_string(),
            "Item with ID 999 not found."
        );
        assert_eq!(
            RecordError::invalid("quantity", "cannot be negative").to_string(),
            "Invalid quantity: cannot be negative"
        );
    }

    #[test]
    fn test_malformed_message_carries_line() {
        let err = RecordError::malformed(
            3,
            InputDefect::NotANumber {
                field: "score".to_string(),
                value: "abc".to_string(),
            },
        );
        assert_eq!(err.to_string(), "Line 3: invalid score format: \"abc\"");
        assert_eq!(err.kind(), "Malformed Input");
    }
}
