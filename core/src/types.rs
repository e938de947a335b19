//! The type catalog: constructors used when writing schemas.
//!
//! Each constructor returns a ready handler. Pass the bare function to
//! [`HandlerRef::factory`](crate::HandlerRef::factory) to let the schema
//! build it instead.
//!
//! # Examples
//!
//! ```
//! use podeng_core::types;
//! use serde_json::{Value, json};
//!
//! let price = types::float().min(0.0).hide_on_fail();
//! let active = types::boolean(&[json!(["yes", "y"]), json!({ "caseSensitive": false })]).unwrap();
//! let tier = types::conditions(|v: &Value| v.as_f64().is_some_and(|n| n > 100.0), "gold", "basic");
//! # let _ = (price, active, tier);
//! ```

use serde_json::Value;

use crate::error::Result;
use crate::{Boolean, Branch, Conditions, ConditionsSetup, Float};

/// Float handler with default options.
pub fn float() -> Float {
    Float::new()
}

/// Boolean handler from positional parameters (see [`Boolean::from_params`]).
///
/// # Errors
///
/// Returns [`SetupError::InvalidSetup`](crate::SetupError::InvalidSetup) for
/// unsupported call shapes.
pub fn boolean(params: &[Value]) -> Result<Boolean> {
    Boolean::from_params(params)
}

/// Conditions handler, positional form.
pub fn conditions<F>(evaluates: F, on_ok: impl Into<Branch>, on_fail: impl Into<Branch>) -> Conditions
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Conditions::new(evaluates, on_ok, on_fail)
}

/// Conditions handler, keyword form.
///
/// # Errors
///
/// Returns [`SetupError::InvalidSetup`](crate::SetupError::InvalidSetup) when
/// no evaluator is given.
pub fn conditions_with(setup: ConditionsSetup) -> Result<Conditions> {
    Conditions::from_setup(setup)
}
