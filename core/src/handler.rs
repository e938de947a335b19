//! The type-handler contract.
//!
//! A [`TypeHandler`] coerces one field's raw value ([`parse`]) and can
//! re-check a value against its configuration ([`validate`]). Handlers are
//! stateless with respect to input, so one instance can be shared across
//! keys, calls and threads.
//!
//! Schemas refer to handlers through [`HandlerRef`]: either an instance that
//! is ready to use, or a factory that builds one when the schema is compiled.
//!
//! [`parse`]: TypeHandler::parse
//! [`validate`]: TypeHandler::validate

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::options::Options;

/// Result of [`TypeHandler::parse`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parsed {
    /// `true` when the raw value could not be coerced or failed validation.
    pub failed: bool,
    /// The coerced value; `null` or the configured default on failure.
    pub value: Value,
}

impl Parsed {
    pub fn ok(value: Value) -> Self {
        Self {
            failed: false,
            value,
        }
    }

    pub fn failed(value: Value) -> Self {
        Self {
            failed: true,
            value,
        }
    }
}

/// Result of [`TypeHandler::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub errors: Vec<String>,
    pub valid: bool,
}

impl Validation {
    pub fn valid() -> Self {
        Self {
            errors: Vec::new(),
            valid: true,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
            valid: false,
        }
    }
}

/// Message recorded when a field fails to parse.
pub fn parse_failure_message(key: &str, type_name: &str) -> String {
    format!("failed to parse {key} as a {type_name} type")
}

/// Coercion and validation for one field.
pub trait TypeHandler: Send + Sync {
    /// Handler name used in messages (e.g., `"Float"`).
    fn type_name(&self) -> &'static str;

    /// Checks the handler's configuration once it is bound to `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`SetupError`](crate::SetupError) for misconfigured options.
    fn verify(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    /// Coerces a raw value. `None` means the key was absent.
    ///
    /// # Errors
    ///
    /// Only configuration problems are errors; data problems are reported
    /// through [`Parsed::failed`].
    fn parse(&self, key: &str, value: Option<&Value>) -> Result<Parsed>;

    /// Re-checks a value, with `options` overriding the handler's own
    /// configuration.
    ///
    /// The default implementation accepts whatever [`parse`](Self::parse)
    /// accepts.
    ///
    /// # Errors
    ///
    /// Only configuration problems are errors.
    fn validate(&self, key: &str, value: Option<&Value>, _options: &Options) -> Result<Validation> {
        let parsed = self.parse(key, value)?;
        if parsed.failed {
            return Ok(Validation::invalid(parse_failure_message(key, self.type_name())));
        }
        Ok(Validation::valid())
    }

    fn is_hide_on_fail(&self) -> bool {
        false
    }

    fn is_hide_on_serialization(&self) -> bool {
        false
    }

    /// Output key used by serialization instead of the schema key.
    fn serialize_name(&self) -> Option<&str> {
        None
    }
}

type HandlerFactory = dyn Fn() -> Result<Arc<dyn TypeHandler>> + Send + Sync;

/// A schema entry: a ready handler or a factory producing one.
#[derive(Clone)]
pub enum HandlerRef {
    Ready(Arc<dyn TypeHandler>),
    Factory(Arc<HandlerFactory>),
}

impl HandlerRef {
    /// Wraps a zero-argument constructor, such as [`crate::types::float`].
    ///
    /// # Examples
    ///
    /// ```
    /// use podeng_core::{HandlerRef, types};
    ///
    /// let handler = HandlerRef::factory(types::float).resolve().unwrap();
    /// assert_eq!(handler.type_name(), "Float");
    /// ```
    pub fn factory<H, F>(make: F) -> Self
    where
        H: TypeHandler + 'static,
        F: Fn() -> H + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(move || Ok(Arc::new(make()) as Arc<dyn TypeHandler>)))
    }

    /// Wraps a fallible constructor, invoked when the schema is compiled.
    pub fn try_factory<H, F>(make: F) -> Self
    where
        H: TypeHandler + 'static,
        F: Fn() -> Result<H> + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(move || Ok(Arc::new(make()?) as Arc<dyn TypeHandler>)))
    }

    /// Returns the handler, invoking the factory if needed.
    ///
    /// # Errors
    ///
    /// Propagates the factory's setup error.
    pub fn resolve(&self) -> Result<Arc<dyn TypeHandler>> {
        match self {
            Self::Ready(handler) => Ok(Arc::clone(handler)),
            Self::Factory(make) => make(),
        }
    }
}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(handler) => f.debug_tuple("Ready").field(&handler.type_name()).finish(),
            Self::Factory(_) => f.write_str("Factory"),
        }
    }
}

impl<H: TypeHandler + 'static> From<H> for HandlerRef {
    fn from(handler: H) -> Self {
        Self::Ready(Arc::new(handler))
    }
}

impl From<Arc<dyn TypeHandler>> for HandlerRef {
    fn from(handler: Arc<dyn TypeHandler>) -> Self {
        Self::Ready(handler)
    }
}
