//! Error taxonomy for the engine.
//!
//! Only two things can go wrong, and both are caller mistakes:
//! - a grid configuration the rules cannot be played on
//! - a move value that is not one of the four directions
//!
//! Neither error mutates engine state.

/// Errors reported by the engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The requested configuration cannot be played (e.g. size < 2).
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// A move value outside `Up`, `Down`, `Left`, `Right`.
    #[error("invalid direction: {value:?}")]
    InvalidDirection { value: String },
}

impl EngineError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        EngineError::InvalidConfiguration { reason: reason.into() }
    }

    pub(crate) fn direction(value: impl ToString) -> Self {
        EngineError::InvalidDirection { value: value.to_string() }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::config("size must be at least 2, got 1");
        assert_eq!(err.to_string(), "invalid configuration: size must be at least 2, got 1");

        let err = EngineError::direction("Diagonal");
        assert_eq!(err.to_string(), "invalid direction: \"Diagonal\"");

        let err = EngineError::direction(7u8);
        assert_eq!(err, EngineError::InvalidDirection { value: "7".to_string() });
    }
}
