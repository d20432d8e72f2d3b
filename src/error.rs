//! Error type shared by the model and the search engine.

use std::fmt;

/// Errors raised while building or searching an allocation problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeesError {
    /// The problem instance or the search parameters are inconsistent.
    ///
    /// Raised eagerly, before any search work starts.
    Configuration(String),

    /// A constructed or mutated solution broke a structural invariant.
    ///
    /// This signals a defect in the generator or mutation logic and is not
    /// recoverable by the caller.
    InvariantViolation(String),

    /// A module-transfer move found no rocket to take units from, or no rocket
    /// with free capacity to put them in.
    MutationInfeasible {
        /// Module type that was drawn for the move.
        module_type: usize,
    },
}

/// Result alias used throughout the crate.
pub type BeesResult<T> = Result<T, BeesError>;

impl BeesError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}

impl fmt::Display for BeesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "invalid configuration: {msg}"),
            Self::InvariantViolation(msg) => write!(f, "solution invariant violated: {msg}"),
            Self::MutationInfeasible { module_type } => {
                write!(f, "no eligible transfer for module type {module_type}")
            }
        }
    }
}

impl std::error::Error for BeesError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = BeesError::config("population_size must be at least 1");
        assert_eq!(
            err.to_string(),
            "invalid configuration: population_size must be at least 1"
        );

        let err = BeesError::MutationInfeasible { module_type: 3 };
        assert_eq!(err.to_string(), "no eligible transfer for module type 3");
    }

    #[test]
    fn test_boxed_error() {
        let err: Box<dyn std::error::Error> = Box::new(BeesError::invariant("row 0 overloaded"));
        assert!(err.to_string().contains("row 0 overloaded"));
    }
}
