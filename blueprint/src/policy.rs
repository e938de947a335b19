//! Engine-level error policy.
//!
//! By default a blueprint never fails on bad data: it returns its best-effort
//! output and the error details. [`BlueprintOptions`] can escalate instead.
//! When field errors exist the policy runs in this order, stopping at the
//! first error raised:
//!
//! 1. `on_error.on_key` once per failing field, in schema (and input) order
//! 2. `on_error.on_all` once with the full details
//! 3. `throw_on_error`
//!
//! # Examples
//!
//! ```
//! use podeng::{BlueprintError, BlueprintOptions, Schema, types};
//! use serde_json::json;
//!
//! let strict = podeng::object_with(
//!     Schema::new().field("value", types::float()),
//!     BlueprintOptions::new().throw_on_error(true),
//! )
//! .unwrap();
//!
//! let err = strict.call(&json!({ "value": "abc" })).unwrap_err();
//! assert!(matches!(err, BlueprintError::Rejected(_)));
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::error::{BlueprintError, BoxError, Result};
use crate::outcome::ErrorDetails;

/// Called with the key path and message of each failing field.
pub type KeyCallback = Arc<dyn Fn(&str, &str) -> std::result::Result<(), BoxError> + Send + Sync>;

/// Called once with all field errors of a run.
pub type AllCallback = Arc<dyn Fn(&ErrorDetails) -> std::result::Result<(), BoxError> + Send + Sync>;

/// Whether field errors are raised as an error.
#[derive(Clone, Default)]
pub enum ThrowOnError {
    #[default]
    Disabled,
    /// Raise [`BlueprintError::Rejected`] carrying the details.
    Default,
    /// Raise this error as [`BlueprintError::Custom`].
    Custom(Arc<dyn std::error::Error + Send + Sync>),
}

impl From<bool> for ThrowOnError {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Default } else { Self::Disabled }
    }
}

impl fmt::Debug for ThrowOnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("Disabled"),
            Self::Default => f.write_str("Default"),
            Self::Custom(err) => f.debug_tuple("Custom").field(&err.to_string()).finish(),
        }
    }
}

/// Error callbacks.
#[derive(Clone, Default)]
pub struct OnError {
    pub on_key: Option<KeyCallback>,
    pub on_all: Option<AllCallback>,
}

impl OnError {
    pub fn is_empty(&self) -> bool {
        self.on_key.is_none() && self.on_all.is_none()
    }
}

impl fmt::Debug for OnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnError")
            .field("on_key", &self.on_key.is_some())
            .field("on_all", &self.on_all.is_some())
            .finish()
    }
}

/// Engine-level configuration of a blueprint.
#[derive(Debug, Clone, Default)]
pub struct BlueprintOptions {
    pub throw_on_error: ThrowOnError,
    pub on_error: OnError,
    /// [`Blueprint::call`](crate::Blueprint::call) returns serialized rather
    /// than normalized output.
    pub serialize: bool,
    /// Array elements are processed on the rayon pool.
    pub parallel: bool,
}

impl BlueprintOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn throw_on_error(mut self, enabled: bool) -> Self {
        self.throw_on_error = enabled.into();
        self
    }

    /// Raises `err` whenever a run has field errors.
    pub fn throw_error<E>(mut self, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.throw_on_error = ThrowOnError::Custom(Arc::new(err));
        self
    }

    pub fn on_key<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, &str) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        self.on_error.on_key = Some(Arc::new(callback));
        self
    }

    pub fn on_all<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ErrorDetails) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        self.on_error.on_all = Some(Arc::new(callback));
        self
    }

    pub fn serialize(mut self, enabled: bool) -> Self {
        self.serialize = enabled;
        self
    }

    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }
}

/// Applies the policy to the details of a finished run.
pub(crate) fn apply(options: &BlueprintOptions, errors: &ErrorDetails) -> Result<()> {
    if errors.is_empty() {
        return Ok(());
    }

    if let Some(on_key) = &options.on_error.on_key {
        for (path, message) in errors.entries() {
            on_key(&path, message.as_str()).map_err(BlueprintError::Callback)?;
        }
    }

    if let Some(on_all) = &options.on_error.on_all {
        on_all(errors).map_err(BlueprintError::Callback)?;
    }

    match &options.throw_on_error {
        ThrowOnError::Disabled => Ok(()),
        ThrowOnError::Default => {
            warn!(fields = errors.error_count(), "Rejecting input with field errors");
            Err(BlueprintError::Rejected(errors.clone()))
        }
        ThrowOnError::Custom(err) => {
            warn!(fields = errors.error_count(), error = %err, "Raising configured error");
            Err(BlueprintError::Custom(Arc::clone(err)))
        }
    }
}
