//! Option resolution for type handlers.
//!
//! Every handler carries an options bag (a JSON object). [`combine`] overlays
//! user-supplied options onto the handler's defaults; keys the defaults do not
//! know are dropped, so newer callers can pass options older handlers ignore.
//!
//! List-style handlers (such as `bool`) also accept several legacy call
//! shapes. [`ListArgs`] names those shapes and [`ListArgs::from_params`]
//! recovers one from a positional parameter list, so the shapes only exist at
//! the public boundary and are turned into a canonical bag right away.
//!
//! # Example
//!
//! ```
//! use podeng_core::options::{combine, Options};
//! use serde_json::json;
//!
//! let defaults: Options = json!({ "min": null, "hideOnFail": false })
//!     .as_object()
//!     .cloned()
//!     .unwrap();
//! let provided: Options = json!({ "min": 5.5, "colour": "blue" })
//!     .as_object()
//!     .cloned()
//!     .unwrap();
//!
//! let merged = combine(&defaults, &provided);
//! assert_eq!(merged["min"], json!(5.5));
//! assert_eq!(merged["hideOnFail"], json!(false));
//! assert!(!merged.contains_key("colour"));
//! ```

use serde_json::{Map, Value, json};

use crate::error::{Result, SetupError};

/// A handler's options bag.
pub type Options = Map<String, Value>;

/// Overlays `provided` onto `defaults`.
///
/// Only keys present in `defaults` are taken from `provided`; everything else
/// in `provided` is ignored.
pub fn combine(defaults: &Options, provided: &Options) -> Options {
    let mut merged = defaults.clone();
    for (key, slot) in merged.iter_mut() {
        if let Some(value) = provided.get(key) {
            *slot = value.clone();
        }
    }
    merged
}

/// Same merge as [`combine`], for validators that may receive no overrides.
pub fn fetch_provided_options(defaults: &Options, provided: Option<&Options>) -> Options {
    match provided {
        Some(provided) => combine(defaults, provided),
        None => defaults.clone(),
    }
}

/// Defaults shared by every handler.
///
/// `hideOnFail` drops the key from normalized output when parsing fails;
/// `serialize.to` renames the key on serialization and `serialize.display:
/// false` drops it from serialized output.
pub fn common_defaults() -> Options {
    let mut defaults = Options::new();
    defaults.insert("hideOnFail".into(), json!(false));
    defaults.insert("serialize".into(), json!({ "to": null, "display": true }));
    defaults
}

/// Resolved view of [`common_defaults`] keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonOptions {
    pub hide_on_fail: bool,
    pub serialize_to: Option<String>,
    pub hide_on_serialization: bool,
}

impl CommonOptions {
    pub fn from_options(options: &Options) -> Self {
        let serialize = options.get("serialize");
        Self {
            hide_on_fail: bool_option(options, "hideOnFail", false),
            serialize_to: serialize
                .and_then(|s| s.get("to"))
                .and_then(Value::as_str)
                .map(String::from),
            hide_on_serialization: !serialize
                .and_then(|s| s.get("display"))
                .and_then(Value::as_bool)
                .unwrap_or(true),
        }
    }
}

/// Reads a boolean option, falling back when it is absent or not a boolean.
pub fn bool_option(options: &Options, name: &str, fallback: bool) -> bool {
    options.get(name).and_then(Value::as_bool).unwrap_or(fallback)
}

/// Reads a numeric option.
///
/// Absent and `null` options yield `None`. Anything other than a JSON number
/// is a setup error naming the option and the schema key.
///
/// # Errors
///
/// Returns [`SetupError::InvalidNumericOption`] for non-numeric values.
pub fn numeric_option(
    options: &Options,
    name: &'static str,
    handler: &'static str,
    key: &str,
) -> Result<Option<f64>> {
    match options.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(_) => Err(SetupError::InvalidNumericOption {
            handler,
            option: name,
            key: key.to_string(),
        }),
    }
}

/// Reads a list option; absent or non-array values yield an empty list.
pub fn list_option(options: &Options, name: &str) -> Vec<Value> {
    options
        .get(name)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// The accepted call shapes of a list-membership handler.
#[derive(Debug, Clone, PartialEq)]
pub enum ListArgs {
    /// No arguments; handler defaults apply.
    Empty,
    /// `(validList)`
    Valid(Vec<Value>),
    /// `(validList, invalidList)`
    ValidInvalid(Vec<Value>, Vec<Value>),
    /// `(validList, options)`
    ValidWithOptions(Vec<Value>, Options),
    /// `(options)` holding any of the handler's option keys.
    Options(Options),
}

impl ListArgs {
    /// Recovers a call shape from positional parameters.
    ///
    /// `known` is the handler's defaults bag: a lone options object must name
    /// at least one of its keys.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidSetup`] for any other shape (empty lists,
    /// unknown objects, more than two parameters).
    pub fn from_params(params: &[Value], type_name: &'static str, known: &Options) -> Result<Self> {
        let invalid = || SetupError::InvalidSetup(type_name);
        match params {
            [] => Ok(Self::Empty),
            [Value::Array(valid)] if !valid.is_empty() => Ok(Self::Valid(valid.clone())),
            [Value::Object(options)] if options.keys().any(|k| known.contains_key(k)) => {
                Ok(Self::Options(options.clone()))
            }
            [Value::Array(valid), Value::Array(invalid_list)]
                if !valid.is_empty() && !invalid_list.is_empty() =>
            {
                Ok(Self::ValidInvalid(valid.clone(), invalid_list.clone()))
            }
            [Value::Array(valid), Value::Object(options)] if !valid.is_empty() => {
                Ok(Self::ValidWithOptions(valid.clone(), options.clone()))
            }
            _ => Err(invalid()),
        }
    }

    /// Translates the call shape into a canonical options bag.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidSetup`] when a typed shape breaks the same
    /// rules [`from_params`](Self::from_params) enforces.
    pub fn into_options(self, type_name: &'static str, defaults: &Options) -> Result<Options> {
        let invalid = || SetupError::InvalidSetup(type_name);
        let mut merged = match self {
            Self::Empty => defaults.clone(),
            Self::Valid(valid) => {
                if valid.is_empty() {
                    return Err(invalid());
                }
                let mut merged = defaults.clone();
                merged.insert("validList".into(), Value::Array(valid));
                merged
            }
            Self::ValidInvalid(valid, invalid_list) => {
                if valid.is_empty() || invalid_list.is_empty() {
                    return Err(invalid());
                }
                let mut merged = defaults.clone();
                merged.insert("validList".into(), Value::Array(valid));
                merged.insert("invalidList".into(), Value::Array(invalid_list));
                merged
            }
            Self::ValidWithOptions(valid, options) => {
                if valid.is_empty() {
                    return Err(invalid());
                }
                // the positional list wins over any list keys in the object
                let mut merged = combine(defaults, &options);
                merged.insert("validList".into(), Value::Array(valid));
                merged.insert("invalidList".into(), Value::Null);
                merged
            }
            Self::Options(options) => {
                if !options.keys().any(|k| defaults.contains_key(k)) {
                    return Err(invalid());
                }
                combine(defaults, &options)
            }
        };
        merged.retain(|key, _| defaults.contains_key(key));
        Ok(merged)
    }
}
