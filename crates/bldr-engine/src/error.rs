use thiserror::Error;

/// Failures raised at synthesis time.
///
/// Shape violations indicate a bug in the upstream model extractor, not a
/// recoverable condition; callers are expected to surface them, never retry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid model: expected {expected}, found {found}")]
    InvalidModel { expected: String, found: String },

    #[error("property `{property}` has no {what} configured")]
    MissingInit { property: String, what: &'static str },
}

impl EngineError {
    pub fn invalid_model(expected: impl Into<String>, found: impl ToString) -> Self {
        EngineError::InvalidModel {
            expected: expected.into(),
            found: found.to_string(),
        }
    }

    pub fn missing_init(property: impl Into<String>, what: &'static str) -> Self {
        EngineError::MissingInit {
            property: property.into(),
            what,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
