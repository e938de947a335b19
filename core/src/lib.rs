//! Type handlers and their supporting machinery for podeng schemas.
//!
//! This crate defines what a single schema field knows how to do:
//!
//! - [`detector`] classifies raw JSON values ([`ValueKind`]).
//! - [`options`] merges handler options bags with their defaults and
//!   resolves legacy positional call shapes.
//! - [`TypeHandler`] is the parse/validate contract every handler implements.
//!   [`HandlerRef`] is the ready-or-factory form schemas store.
//! - Handlers: [`Float`], [`Boolean`] and the composite [`Conditions`].
//! - [`types`] is the catalog of constructors used in schema definitions.
//!
//! Misconfiguration surfaces as [`SetupError`]; data problems never do.
//!
//! # Example
//!
//! ```
//! use podeng_core::{TypeHandler, types};
//! use serde_json::json;
//!
//! let handler = types::float().min(5.5);
//! let parsed = handler.parse("num", Some(&json!("20.2"))).unwrap();
//! assert!(!parsed.failed);
//! assert_eq!(parsed.value, json!(20.2));
//!
//! let parsed = handler.parse("num", Some(&json!("invalid"))).unwrap();
//! assert!(parsed.failed);
//! assert!(parsed.value.is_null());
//! ```

mod boolean;
mod conditions;
pub mod detector;
mod error;
mod float;
mod handler;
pub mod options;
pub mod types;

pub use boolean::Boolean;
pub use conditions::{Branch, Conditions, ConditionsSetup, Evaluator};
pub use detector::ValueKind;
pub use error::{Result, SetupError};
pub use float::{DefaultValue, Float};
pub use handler::{HandlerRef, Parsed, TypeHandler, Validation, parse_failure_message};
pub use options::Options;
