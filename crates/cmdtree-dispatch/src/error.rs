//! Errors raised by the dispatcher itself.
//!
//! Handler errors never pass through this type: they are returned to the
//! caller exactly as the handler produced them.

/// Errors produced while walking a command tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// A subcommand entry does not hold a handler or a nested tree.
    ///
    /// This points at a mistake in how the tree was built, not at user input,
    /// so retrying with other arguments will not help.
    #[error("invalid handler {value:?} for: [{}]", .args.join(" "))]
    InvalidHandler {
        /// The argument list active when the entry was reached.
        args: Vec<String>,
        /// Description of the offending entry.
        value: String,
    },
}

impl DispatchError {
    /// Create an invalid handler error.
    pub fn invalid_handler(args: Vec<String>, value: impl Into<String>) -> Self {
        Self::InvalidHandler {
            args,
            value: value.into(),
        }
    }

    /// The argument list that was active when the error was raised.
    pub fn args(&self) -> &[String] {
        match self {
            DispatchError::InvalidHandler { args, .. } => args,
        }
    }
}
