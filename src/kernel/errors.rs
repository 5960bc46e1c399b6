use core::fmt;

/// Validation errors raised when a kernel is constructed or a buffer adapter
/// is bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required input collection has no elements.
    EmptyInput {
        /// Name of the empty argument.
        arg: &'static str,
    },
    /// A configuration value is outside its allowed range.
    InvalidArgument {
        /// Name of the argument.
        arg: &'static str,
        /// Why the value is rejected.
        reason: &'static str,
    },
    /// A contiguous 1D slice view could not be obtained from the adapter.
    NonContiguous {
        /// Name of the non-contiguous argument.
        arg: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyInput { arg } => write!(f, "Input `{arg}` has no elements."),
            ConfigError::InvalidArgument { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
            ConfigError::NonContiguous { arg } => {
                write!(f, "Argument `{arg}` is not contiguous in memory.")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Run-time invariant violations raised by kernel entrypoints.
///
/// A kernel that returns one of these has not touched any caller-visible
/// state: in-place weight buffers keep their prior contents and no partially
/// built output escapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecInvariantViolation {
    /// An execution precondition was violated.
    InvalidState {
        /// Why execution could not proceed.
        reason: &'static str,
    },
    /// A paired buffer did not match the required runtime shape.
    LengthMismatch {
        /// Name of the argument.
        arg: &'static str,
        /// Required length.
        expected: usize,
        /// Received length.
        got: usize,
    },
    /// Adapter binding or configuration failure.
    Config(ConfigError),
}

impl From<ConfigError> for ExecInvariantViolation {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl fmt::Display for ExecInvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecInvariantViolation::InvalidState { reason } => {
                write!(f, "Execution invariant violation: {reason}")
            }
            ExecInvariantViolation::LengthMismatch { arg, expected, got } => {
                write!(
                    f,
                    "Length mismatch on `{arg}`. Expected {expected}, got {got}."
                )
            }
            ExecInvariantViolation::Config(err) => write!(f, "{err}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ExecInvariantViolation {}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ExecInvariantViolation};

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidArgument {
            arg: "block_size",
            reason: "must be at least 1",
        };
        assert_eq!(
            format!("{err}"),
            "Invalid argument `block_size`: must be at least 1"
        );
    }

    #[test]
    fn config_error_converts_to_exec_violation() {
        let err: ExecInvariantViolation = ConfigError::EmptyInput { arg: "records" }.into();
        assert!(matches!(
            err,
            ExecInvariantViolation::Config(ConfigError::EmptyInput { arg: "records" })
        ));
    }

    #[test]
    fn length_mismatch_display_names_both_sides() {
        let err = ExecInvariantViolation::LengthMismatch {
            arg: "weights",
            expected: 4,
            got: 3,
        };
        assert_eq!(
            format!("{err}"),
            "Length mismatch on `weights`. Expected 4, got 3."
        );
    }
}
