//! Construction errors for type handlers.
//!
//! These are programmer errors (a misconfigured handler or options bag) and
//! are always raised immediately, never aggregated with per-field data
//! failures.

use thiserror::Error;

/// Errors raised while building or binding a type handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// The handler was given a call shape it does not understand
    /// (e.g., an empty valid list for `bool`, or `conditions` without an
    /// evaluator).
    #[error("Invalid setup for \"{0}\" type")]
    InvalidSetup(&'static str),

    /// A numeric option (`min`, `max`, `minDigits`, `maxDigits`) holds a
    /// non-numeric value.
    #[error("{handler}: Invalid \"{option}\" option value for {key}, it should be in numeric type!")]
    InvalidNumericOption {
        /// Handler type name (e.g., `"Float"`).
        handler: &'static str,
        /// Offending option name.
        option: &'static str,
        /// Schema key the handler is bound to.
        key: String,
    },
}

/// Convenience alias for results with [`SetupError`].
pub type Result<T> = std::result::Result<T, SetupError>;
