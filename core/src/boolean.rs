//! Boolean handler: list membership with optional case folding and nil
//! coercion.
//!
//! Resolution order for a non-boolean raw value:
//!
//! 1. a non-empty `validList` → `true` when the value is in it
//! 2. a non-empty `invalidList` → `true` when the value is not in it
//! 3. no lists and `normalizeNil` → `false` for `null`/absent (reported as a
//!    failure), `true` otherwise
//! 4. otherwise the value cannot be decided and parsing fails
//!
//! Actual booleans always pass through unchanged.
//!
//! With `caseSensitive: false`, lower-cased copies of the string list members
//! are added to the comparison set; the raw value itself is not folded.
//!
//! # Examples
//!
//! ```
//! use podeng_core::{Boolean, TypeHandler};
//! use serde_json::json;
//!
//! let handler = Boolean::valid(["Yes"]).unwrap().case_sensitive(false);
//! assert_eq!(handler.parse("ok", Some(&json!("yes"))).unwrap().value, json!(true));
//! assert_eq!(handler.parse("ok", Some(&json!("No"))).unwrap().value, json!(false));
//! assert_eq!(handler.parse("ok", Some(&json!(false))).unwrap().value, json!(false));
//! ```

use serde_json::{Value, json};

use crate::detector::{self, same_value};
use crate::error::Result;
use crate::handler::{Parsed, TypeHandler, Validation};
use crate::options::{self, CommonOptions, ListArgs, Options};

const TYPE_NAME: &str = "bool";

#[derive(Debug, Clone, Default, PartialEq)]
struct Lists {
    valid: Vec<Value>,
    invalid: Vec<Value>,
    case_sensitive: bool,
    normalize_nil: bool,
}

impl Lists {
    fn from_options(options: &Options) -> Self {
        Self {
            valid: options::list_option(options, "validList"),
            invalid: options::list_option(options, "invalidList"),
            case_sensitive: options::bool_option(options, "caseSensitive", true),
            normalize_nil: options::bool_option(options, "normalizeNil", false),
        }
    }

    fn is_empty(&self) -> bool {
        self.valid.is_empty() && self.invalid.is_empty()
    }

    fn contains(&self, list: &[Value], value: Option<&Value>) -> bool {
        let Some(value) = value else {
            return false;
        };
        list.iter().any(|item| {
            same_value(item, value)
                || (!self.case_sensitive
                    && matches!(item, Value::String(s) if *value == Value::String(s.to_lowercase())))
        })
    }

    /// `None` when no rule decides the value.
    fn evaluate(&self, value: Option<&Value>) -> Option<bool> {
        if let Some(Value::Bool(b)) = value {
            return Some(*b);
        }
        if !self.valid.is_empty() {
            return Some(self.contains(&self.valid, value));
        }
        if !self.invalid.is_empty() {
            return Some(!self.contains(&self.invalid, value));
        }
        None
    }
}

/// Boolean type handler.
#[derive(Debug, Clone)]
pub struct Boolean {
    options: Options,
    common: CommonOptions,
    lists: Lists,
}

impl Boolean {
    /// Default options bag.
    pub fn defaults() -> Options {
        let mut defaults = options::common_defaults();
        defaults.insert("validList".into(), Value::Null);
        defaults.insert("invalidList".into(), Value::Null);
        defaults.insert("caseSensitive".into(), json!(true));
        defaults.insert("normalizeNil".into(), json!(false));
        defaults
    }

    /// A handler with no lists: only actual booleans parse.
    pub fn new() -> Self {
        Self::with_bag(Self::defaults())
    }

    /// Builds a handler from one of the accepted call shapes.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidSetup`](crate::SetupError::InvalidSetup)
    /// for empty lists or an options object with no recognized key.
    pub fn from_args(args: ListArgs) -> Result<Self> {
        Ok(Self::with_bag(args.into_options(TYPE_NAME, &Self::defaults())?))
    }

    /// Builds a handler from positional parameters, e.g. `[["Yes"], {"caseSensitive": false}]`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidSetup`](crate::SetupError::InvalidSetup)
    /// for unsupported shapes.
    ///
    /// # Examples
    ///
    /// ```
    /// use podeng_core::Boolean;
    /// use serde_json::json;
    ///
    /// assert!(Boolean::from_params(&[json!(["Yes"]), json!(["No"])]).is_ok());
    /// let err = Boolean::from_params(&[json!([])]).unwrap_err();
    /// assert_eq!(err.to_string(), "Invalid setup for \"bool\" type");
    /// ```
    pub fn from_params(params: &[Value]) -> Result<Self> {
        Self::from_args(ListArgs::from_params(params, TYPE_NAME, &Self::defaults())?)
    }

    /// `(validList)` shape.
    ///
    /// # Errors
    ///
    /// Fails when `valid` is empty.
    pub fn valid<I, V>(valid: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::from_args(ListArgs::Valid(valid.into_iter().map(Into::into).collect()))
    }

    /// `(validList, invalidList)` shape.
    ///
    /// # Errors
    ///
    /// Fails when either list is empty.
    pub fn valid_invalid<I, J, V, W>(valid: I, invalid: J) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        J: IntoIterator<Item = W>,
        V: Into<Value>,
        W: Into<Value>,
    {
        Self::from_args(ListArgs::ValidInvalid(
            valid.into_iter().map(Into::into).collect(),
            invalid.into_iter().map(Into::into).collect(),
        ))
    }

    /// `(options)` shape, from a bag with any of `validList`, `invalidList`,
    /// `caseSensitive`, `normalizeNil`.
    ///
    /// # Errors
    ///
    /// Fails when the bag names none of the handler's options.
    pub fn from_options(provided: &Options) -> Result<Self> {
        Self::from_args(ListArgs::Options(provided.clone()))
    }

    fn with_bag(options: Options) -> Self {
        Self {
            common: CommonOptions::from_options(&options),
            lists: Lists::from_options(&options),
            options,
        }
    }

    fn set(mut self, name: &str, value: Value) -> Self {
        self.options.insert(name.into(), value);
        Self::with_bag(self.options)
    }

    pub fn case_sensitive(self, case_sensitive: bool) -> Self {
        self.set("caseSensitive", json!(case_sensitive))
    }

    pub fn normalize_nil(self, normalize_nil: bool) -> Self {
        self.set("normalizeNil", json!(normalize_nil))
    }

    pub fn hide_on_fail(self) -> Self {
        self.set("hideOnFail", json!(true))
    }

    pub fn serialize_to(self, name: &str) -> Self {
        let display = !self.common.hide_on_serialization;
        self.set("serialize", json!({ "to": name, "display": display }))
    }

    pub fn hide_on_serialization(self) -> Self {
        let to = self.common.serialize_to.clone();
        self.set("serialize", json!({ "to": to, "display": false }))
    }
}

impl Default for Boolean {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeHandler for Boolean {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn parse(&self, _key: &str, value: Option<&Value>) -> Result<Parsed> {
        if let Some(Value::Bool(b)) = value {
            return Ok(Parsed::ok(Value::Bool(*b)));
        }
        if self.lists.is_empty() && self.lists.normalize_nil {
            let nil = detector::is_nil(value);
            return Ok(Parsed {
                failed: nil,
                value: Value::Bool(!nil),
            });
        }

        match self.lists.evaluate(value) {
            Some(b) => Ok(Parsed::ok(Value::Bool(b))),
            None => Ok(Parsed::failed(Value::Null)),
        }
    }

    /// Checks `value` against the lists, with `options` overriding the
    /// handler's own bag. An actual boolean is always valid.
    fn validate(&self, key: &str, value: Option<&Value>, options: &Options) -> Result<Validation> {
        let lists = Lists::from_options(&options::fetch_provided_options(
            &self.options,
            Some(options),
        ));
        let mut errors = Vec::new();
        let mut valid = true;

        if lists.is_empty() && lists.normalize_nil && detector::is_nil(value) {
            valid = false;
            errors.push(format!("Nil value identified for \"{key}\""));
        }

        let listed = if !lists.valid.is_empty() {
            lists.contains(&lists.valid, value)
        } else if !lists.invalid.is_empty() {
            !lists.contains(&lists.invalid, value)
        } else {
            true
        };

        if detector::is_boolean(value) {
            return Ok(Validation::valid());
        }
        if !listed {
            valid = false;
            errors.push(format!("Value of \"{key}\" is not an accepted value"));
        }
        Ok(Validation { errors, valid })
    }

    fn is_hide_on_fail(&self) -> bool {
        self.common.hide_on_fail
    }

    fn is_hide_on_serialization(&self) -> bool {
        self.common.hide_on_serialization
    }

    fn serialize_name(&self) -> Option<&str> {
        self.common.serialize_to.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SetupError;

    fn parse(handler: &Boolean, value: Value) -> Parsed {
        handler.parse("flag", Some(&value)).unwrap()
    }

    #[test]
    fn test_without_lists_only_booleans_parse() {
        let handler = Boolean::new();
        assert_eq!(parse(&handler, json!(true)), Parsed::ok(json!(true)));
        assert_eq!(parse(&handler, json!(false)), Parsed::ok(json!(false)));
        assert_eq!(parse(&handler, json!("true")), Parsed::failed(Value::Null));
        assert_eq!(handler.parse("flag", None).unwrap(), Parsed::failed(Value::Null));
    }

    #[test]
    fn test_valid_list_membership() {
        let handler = Boolean::valid(["Yes", "Y"]).unwrap();
        assert_eq!(parse(&handler, json!("Yes")), Parsed::ok(json!(true)));
        assert_eq!(parse(&handler, json!("yes")), Parsed::ok(json!(false)));
        assert_eq!(parse(&handler, json!("No")), Parsed::ok(json!(false)));
        assert_eq!(handler.parse("flag", None).unwrap(), Parsed::ok(json!(false)));
    }

    #[test]
    fn test_case_insensitive_adds_lowercase_variants_only() {
        let handler = Boolean::valid(["Yes"]).unwrap().case_sensitive(false);
        assert_eq!(parse(&handler, json!("Yes")).value, json!(true));
        assert_eq!(parse(&handler, json!("yes")).value, json!(true));
        assert_eq!(parse(&handler, json!("YES")).value, json!(false));
    }

    #[test]
    fn test_invalid_list_is_non_membership() {
        let handler = Boolean::from_params(&[json!({ "invalidList": ["No", 0] })]).unwrap();
        assert_eq!(parse(&handler, json!("No")).value, json!(false));
        assert_eq!(parse(&handler, json!(0.0)).value, json!(false));
        assert_eq!(parse(&handler, json!("anything")).value, json!(true));
    }

    #[test]
    fn test_valid_list_takes_precedence_over_invalid_list() {
        let handler = Boolean::valid_invalid(["Yes"], ["Yes"]).unwrap();
        assert_eq!(parse(&handler, json!("Yes")).value, json!(true));
    }

    #[test]
    fn test_boolean_input_overrides_lists() {
        let handler = Boolean::valid(["Yes"]).unwrap();
        assert_eq!(parse(&handler, json!(false)), Parsed::ok(json!(false)));
        let validation = handler
            .validate("flag", Some(&json!(false)), &Options::new())
            .unwrap();
        assert!(validation.valid);
    }

    #[test]
    fn test_normalize_nil() {
        let handler = Boolean::new().normalize_nil(true);
        assert_eq!(parse(&handler, json!("x")), Parsed::ok(json!(true)));
        assert_eq!(parse(&handler, json!(0)), Parsed::ok(json!(true)));
        assert_eq!(parse(&handler, json!(false)), Parsed::ok(json!(false)));
        assert_eq!(parse(&handler, json!(true)), Parsed::ok(json!(true)));
        assert_eq!(parse(&handler, Value::Null), Parsed::failed(json!(false)));
        assert_eq!(handler.parse("flag", None).unwrap(), Parsed::failed(json!(false)));
    }

    #[test]
    fn test_normalize_nil_ignored_when_lists_present() {
        let handler = Boolean::from_params(&[json!(["Yes"]), json!({ "normalizeNil": true })]).unwrap();
        assert_eq!(parse(&handler, Value::Null), Parsed::ok(json!(false)));
    }

    #[test]
    fn test_invalid_setups() {
        let err = Err(SetupError::InvalidSetup("bool"));
        assert_eq!(Boolean::valid(Vec::<Value>::new()).map(|_| ()), err);
        assert_eq!(Boolean::valid_invalid(["a"], Vec::<&str>::new()).map(|_| ()), err);
        assert_eq!(Boolean::from_options(&Options::new()).map(|_| ()), err);
        assert_eq!(Boolean::from_params(&[json!(1), json!(2), json!(3)]).map(|_| ()), err);
    }

    #[test]
    fn test_validate_nil_policy() {
        let handler = Boolean::new().normalize_nil(true);
        let validation = handler.validate("flag", None, &Options::new()).unwrap();
        assert!(!validation.valid);
        assert_eq!(validation.errors, vec!["Nil value identified for \"flag\""]);
        assert!(handler.validate("flag", Some(&json!("x")), &Options::new()).unwrap().valid);
    }

    #[test]
    fn test_validate_with_override_options() {
        let handler = Boolean::new();
        let overrides = json!({ "validList": ["Yes"], "caseSensitive": false });
        let overrides = overrides.as_object().unwrap();
        assert!(handler.validate("flag", Some(&json!("yes")), overrides).unwrap().valid);

        let validation = handler.validate("flag", Some(&json!("no")), overrides).unwrap();
        assert!(!validation.valid);
        assert_eq!(validation.errors, vec!["Value of \"flag\" is not an accepted value"]);
    }
}
