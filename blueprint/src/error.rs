//! Error types for blueprint operations.
//!
//! Setup problems and misuse (array input expected) are always errors. Field
//! failures only become errors when the blueprint's policy escalates them.

use std::sync::Arc;

use podeng_core::SetupError;
use thiserror::Error;

use crate::outcome::ErrorDetails;

/// Boxed error returned by `on_error` callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while compiling or running a blueprint.
#[derive(Debug, Error)]
pub enum BlueprintError {
    /// A handler is misconfigured.
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// Two serialized fields would be written under the same output name.
    #[error("Duplicate serialized name \"{0}\"")]
    DuplicateOutputName(String),

    /// An array blueprint was given something other than an array.
    #[error("Wrong value type, you must supply array values!")]
    WrongValueType,

    /// Field failures escalated by `throw_on_error: true`.
    #[error("failed to normalize {} field(s)", .0.error_count())]
    Rejected(ErrorDetails),

    /// The caller-supplied error configured through `throw_on_error`.
    #[error("{0}")]
    Custom(Arc<dyn std::error::Error + Send + Sync>),

    /// An `on_key` or `on_all` callback returned an error.
    #[error("{0}")]
    Callback(BoxError),

    /// The operation is not available.
    #[error("{0} is not supported")]
    Unsupported(&'static str),

    /// Config file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`BlueprintError`].
pub type Result<T> = std::result::Result<T, BlueprintError>;
