//! The schema engine.
//!
//! A [`Blueprint`] is a compiled [`Schema`] plus its mode (single object or
//! array of objects) and its [`BlueprintOptions`]. Every run parses each
//! schema key independently, so one bad field never stops the others.
//!
//! In object mode a failing field still appears in the output with its
//! fallback value (`null` or the handler default) unless the handler hides
//! it on failure. Array mode applies the object algorithm to every element
//! and keeps output in input order.

use rayon::prelude::*;
use serde_json::{Map, Value};
use tracing::debug;

use podeng_core::{Options, parse_failure_message};

use crate::error::{BlueprintError, Result};
use crate::outcome::{Details, FieldErrors, FieldMap, Outcome, ValidationReport};
use crate::policy::{self, BlueprintOptions};
use crate::schema::{Field, Schema};

/// A compiled schema ready to normalize input.
///
/// # Examples
///
/// ```
/// use podeng::{Blueprint, Schema, types};
/// use serde_json::json;
///
/// let blueprint = Blueprint::object(
///     Schema::new()
///         .field("num", types::float().hide_on_fail())
///         .field("num2", types::float()),
/// )
/// .unwrap();
///
/// let outcome = blueprint.normalize(&json!({ "num": {}, "num2": "30.059" })).unwrap();
/// assert!(outcome.has_error);
/// assert_eq!(outcome.value, json!({ "num2": 30.059 }));
/// ```
#[derive(Clone)]
pub struct Blueprint {
    schema: Schema,
    fields: Vec<Field>,
    is_array: bool,
    options: BlueprintOptions,
}

impl Blueprint {
    fn compile(schema: Schema, is_array: bool, options: BlueprintOptions) -> Result<Self> {
        let fields = schema.compile()?;
        Ok(Self {
            schema,
            fields,
            is_array,
            options,
        })
    }

    /// Compiles a single-object blueprint.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::Setup`] for misconfigured handlers.
    pub fn object(schema: impl Into<Schema>) -> Result<Self> {
        Self::compile(schema.into(), false, BlueprintOptions::default())
    }

    /// Compiles a single-object blueprint with engine options.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::Setup`] for misconfigured handlers.
    pub fn object_with(schema: impl Into<Schema>, options: BlueprintOptions) -> Result<Self> {
        Self::compile(schema.into(), false, options)
    }

    /// Compiles an array-of-objects blueprint.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::Setup`] for misconfigured handlers.
    pub fn array(schema: impl Into<Schema>) -> Result<Self> {
        Self::compile(schema.into(), true, BlueprintOptions::default())
    }

    /// Compiles an array-of-objects blueprint with engine options.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::Setup`] for misconfigured handlers.
    pub fn array_with(schema: impl Into<Schema>, options: BlueprintOptions) -> Result<Self> {
        Self::compile(schema.into(), true, options)
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &BlueprintOptions {
        &self.options
    }

    /// Coerces and validates every schema key.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::WrongValueType`] when an array blueprint gets
    /// non-array input. Field failures are reported in the outcome, not as
    /// errors.
    pub fn normalize(&self, input: &Value) -> Result<Outcome> {
        if !self.is_array {
            let (errors, normalized) = self.normalize_object(input)?;
            return Ok(Outcome {
                has_error: !errors.is_empty(),
                errors: Details::Object(errors),
                value: Value::Object(normalized),
            });
        }

        let items = self.items(input)?;
        let results = self.map_items(items, |item| self.normalize_object(item))?;

        let (errors, values): (Vec<_>, Vec<_>) = results
            .into_iter()
            .map(|(errors, normalized)| (errors, Value::Object(normalized)))
            .unzip();
        let errors = Details::from_elements(errors);
        Ok(Outcome {
            has_error: !errors.is_empty(),
            errors,
            value: Value::Array(values),
        })
    }

    /// Normalizes, then renames keys for output: fields hidden on
    /// serialization are dropped and fields with a serialize name use it.
    ///
    /// # Errors
    ///
    /// Same as [`normalize`](Self::normalize).
    pub fn serialize(&self, input: &Value) -> Result<Outcome> {
        let outcome = self.normalize(input)?;
        let value = match outcome.value {
            Value::Object(normalized) => Value::Object(self.rename(normalized)),
            Value::Array(values) => Value::Array(
                values
                    .into_iter()
                    .map(|value| match value {
                        Value::Object(normalized) => Value::Object(self.rename(normalized)),
                        other => other,
                    })
                    .collect(),
            ),
            other => other,
        };
        Ok(Outcome { value, ..outcome })
    }

    /// Wire-to-object mapping is not implemented.
    ///
    /// # Errors
    ///
    /// Always returns [`BlueprintError::Unsupported`].
    pub fn deserialize(&self, _input: &Value) -> Result<Outcome> {
        Err(BlueprintError::Unsupported("deserialize"))
    }

    /// Runs every handler's `validate` entry point against the raw input.
    ///
    /// # Errors
    ///
    /// Same as [`normalize`](Self::normalize).
    pub fn validate(&self, input: &Value) -> Result<ValidationReport> {
        let errors = if self.is_array {
            let items = self.items(input)?;
            Details::from_elements(self.map_items(items, |item| self.validate_object(item))?)
        } else {
            Details::Object(self.validate_object(input)?)
        };
        Ok(ValidationReport {
            valid: errors.is_empty(),
            errors,
        })
    }

    /// Runs the blueprint and applies its error policy, returning only the
    /// output value (serialized when the options ask for it).
    ///
    /// # Errors
    ///
    /// Returns whatever [`normalize`](Self::normalize) returns, plus the
    /// errors the policy raises for field failures.
    pub fn call(&self, input: &Value) -> Result<Value> {
        let outcome = self.run(input)?;
        Ok(outcome.value)
    }

    /// Like [`call`](Self::call), but keeps the whole outcome.
    ///
    /// # Errors
    ///
    /// Same as [`call`](Self::call).
    pub fn run(&self, input: &Value) -> Result<Outcome> {
        let outcome = if self.options.serialize {
            self.serialize(input)?
        } else {
            self.normalize(input)?
        };
        policy::apply(&self.options, &outcome.errors)?;
        Ok(outcome)
    }

    fn items<'a>(&self, input: &'a Value) -> Result<&'a [Value]> {
        match input {
            Value::Array(items) => Ok(items),
            _ => Err(BlueprintError::WrongValueType),
        }
    }

    fn map_items<T, F>(&self, items: &[Value], run: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(&Value) -> Result<T> + Send + Sync,
    {
        debug!(elements = items.len(), parallel = self.options.parallel, "Processing array input");
        if self.options.parallel {
            items.par_iter().map(run).collect()
        } else {
            items.iter().map(run).collect()
        }
    }

    fn normalize_object(&self, input: &Value) -> Result<(FieldErrors, Map<String, Value>)> {
        let mut errors = FieldErrors::new();
        let mut normalized = Map::new();

        for field in &self.fields {
            let key = field.key.as_str();
            let parsed = field.handler.parse(key, input.get(key))?;
            if parsed.failed {
                debug!(key, handler = field.handler.type_name(), "Field failed to parse");
                errors.insert(key, parse_failure_message(key, field.handler.type_name()));
                if field.handler.is_hide_on_fail() {
                    continue;
                }
            }
            normalized.insert(field.key.clone(), parsed.value);
        }

        Ok((errors, normalized))
    }

    fn validate_object(&self, input: &Value) -> Result<FieldMap<Vec<String>>> {
        let mut errors = FieldMap::new();
        let overrides = Options::new();
        for field in &self.fields {
            let key = field.key.as_str();
            let validation = field.handler.validate(key, input.get(key), &overrides)?;
            if !validation.valid {
                errors.insert(key, validation.errors);
            }
        }
        Ok(errors)
    }

    fn rename(&self, mut normalized: Map<String, Value>) -> Map<String, Value> {
        let mut serialized = Map::new();
        for field in &self.fields {
            if field.handler.is_hide_on_serialization() {
                continue;
            }
            let Some(value) = normalized.remove(&field.key) else {
                continue;
            };
            serialized.insert(field.output_name().to_string(), value);
        }
        serialized
    }
}

impl From<&Blueprint> for Schema {
    fn from(blueprint: &Blueprint) -> Self {
        blueprint.schema.clone()
    }
}

impl std::fmt::Debug for Blueprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blueprint")
            .field("schema", &self.schema)
            .field("is_array", &self.is_array)
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use podeng_core::{Float, types};
    use serde_json::json;

    use super::*;

    fn floats() -> Schema {
        Schema::new()
            .field("value1", types::float())
            .field("value2", types::float().min(10.18))
    }

    #[test]
    fn test_object_mode_reports_failed_keys() {
        let blueprint = Blueprint::object(floats()).unwrap();
        let outcome = blueprint.normalize(&json!({ "value1": "x", "value2": 11 })).unwrap();
        assert!(outcome.has_error);
        assert_eq!(outcome.value, json!({ "value1": null, "value2": 11 }));
        let errors = outcome.errors.as_object().unwrap();
        assert_eq!(
            errors.get("value1").map(String::as_str),
            Some("failed to parse value1 as a Float type")
        );
        assert!(!errors.contains_key("value2"));
    }

    #[test]
    fn test_non_object_input_reads_as_missing_keys() {
        let blueprint = Blueprint::object(floats()).unwrap();
        let outcome = blueprint.normalize(&json!(42)).unwrap();
        assert!(!outcome.has_error);
        assert_eq!(outcome.value, json!({ "value1": null, "value2": null }));
    }

    #[test]
    fn test_array_mode_requires_array() {
        let blueprint = Blueprint::array(floats()).unwrap();
        let err = blueprint.normalize(&json!({ "value1": 1 })).unwrap_err();
        assert!(matches!(err, BlueprintError::WrongValueType));
        assert_eq!(err.to_string(), "Wrong value type, you must supply array values!");
    }

    #[test]
    fn test_array_mode_parallel_matches_sequential() {
        let input = json!([
            { "value1": 33.2, "value2": "33" },
            { "value1": "10.19", "value2": 10.19 },
            { "value1": 11, "value2": 5 },
            { "value1": "4.12", "value2": "88.18" },
        ]);
        let sequential = Blueprint::array(floats()).unwrap().normalize(&input).unwrap();
        let parallel = Blueprint::array_with(floats(), BlueprintOptions::new().parallel(true))
            .unwrap()
            .normalize(&input)
            .unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(sequential.errors.as_array().map(<[_]>::len), Some(4));
    }

    #[test]
    fn test_rename_skips_hidden_and_absent_fields() {
        let blueprint = Blueprint::object(
            Schema::new()
                .field("a", Float::new().serialize_to("alpha"))
                .field("b", Float::new().hide_on_serialization())
                .field("c", Float::new().hide_on_fail()),
        )
        .unwrap();
        let outcome = blueprint.serialize(&json!({ "a": 1, "b": 2, "c": "bad" })).unwrap();
        assert_eq!(outcome.value, json!({ "alpha": 1 }));
        assert!(outcome.has_error);
    }

    #[test]
    fn test_deserialize_is_unsupported() {
        let blueprint = Blueprint::object(floats()).unwrap();
        let err = blueprint.deserialize(&json!({})).unwrap_err();
        assert_eq!(err.to_string(), "deserialize is not supported");
    }

    #[test]
    fn test_array_of_existing_blueprint() {
        let object = Blueprint::object(floats()).unwrap();
        let array = Blueprint::array(&object).unwrap();
        assert!(array.is_array());
        assert_eq!(array.schema().len(), 2);
    }
}
