//! Schema-driven normalization for loosely-typed JSON input.
//!
//! A [`Schema`] maps field keys to type handlers from [`types`]. Compiling it
//! gives a [`Blueprint`], which coerces each field independently, collects
//! per-field failures instead of stopping at the first one, and can rename
//! or hide fields for output.
//!
//! - [`object`] / [`array`] compile blueprints for one object or a list of
//!   objects.
//! - [`Blueprint::normalize`], [`Blueprint::serialize`] and
//!   [`Blueprint::validate`] return the full [`Outcome`] or
//!   [`ValidationReport`].
//! - [`Blueprint::call`] returns just the value and applies the
//!   [`BlueprintOptions`] error policy.
//! - [`EngineConfig`] loads the data-shaped part of that policy from YAML.
//!
//! # Example
//!
//! ```
//! use podeng::{Schema, types};
//! use serde_json::json;
//!
//! let people = podeng::array(
//!     Schema::new()
//!         .field("height", types::float().min(0.0))
//!         .field("member", types::boolean(&[json!(["yes", "y"])]).unwrap()),
//! )
//! .unwrap();
//!
//! let outcome = people
//!     .normalize(&json!([
//!         { "height": "180.5", "member": "yes" },
//!         { "height": -3, "member": "no" },
//!     ]))
//!     .unwrap();
//!
//! assert_eq!(
//!     outcome.value,
//!     json!([
//!         { "height": 180.5, "member": true },
//!         { "height": null, "member": false },
//!     ])
//! );
//! assert!(outcome.errors.as_array().unwrap()[1].contains_key("height"));
//! ```

mod config;
mod engine;
mod error;
mod outcome;
mod policy;
mod schema;

pub use config::EngineConfig;
pub use engine::Blueprint;
pub use error::{BlueprintError, BoxError, Result};
pub use outcome::{
    Details, ErrorDetails, FieldErrors, FieldMap, Outcome, ValidationDetails, ValidationReport,
};
pub use policy::{AllCallback, BlueprintOptions, KeyCallback, OnError, ThrowOnError};
pub use schema::Schema;

pub use podeng_core::{
    Boolean, Branch, Conditions, ConditionsSetup, DefaultValue, Evaluator, Float, HandlerRef,
    Options, Parsed, SetupError, TypeHandler, Validation, ValueKind, detector, options, types,
};

/// Compiles a single-object blueprint. See [`Blueprint::object`].
///
/// # Errors
///
/// Returns [`BlueprintError::Setup`] for misconfigured handlers.
pub fn object(schema: impl Into<Schema>) -> Result<Blueprint> {
    Blueprint::object(schema)
}

/// Compiles a single-object blueprint with engine options.
///
/// # Errors
///
/// Returns [`BlueprintError::Setup`] for misconfigured handlers.
pub fn object_with(schema: impl Into<Schema>, options: BlueprintOptions) -> Result<Blueprint> {
    Blueprint::object_with(schema, options)
}

/// Compiles an array-of-objects blueprint. Passing an existing blueprint
/// reuses its schema.
///
/// # Errors
///
/// Returns [`BlueprintError::Setup`] for misconfigured handlers.
pub fn array(schema: impl Into<Schema>) -> Result<Blueprint> {
    Blueprint::array(schema)
}

/// Compiles an array-of-objects blueprint with engine options.
///
/// # Errors
///
/// Returns [`BlueprintError::Setup`] for misconfigured handlers.
pub fn array_with(schema: impl Into<Schema>, options: BlueprintOptions) -> Result<Blueprint> {
    Blueprint::array_with(schema, options)
}
