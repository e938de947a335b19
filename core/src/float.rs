//! Float handler: tolerant numeric coercion with range, digit-count and
//! custom checks.
//!
//! Numbers pass through and numeric strings are parsed (`"30.05"` → `30.05`).
//! Anything else fails coercion. `null` (or an absent key) is not a failure:
//! it yields the configured default, or stays `null`.
//!
//! A coerced value is then checked in a fixed order, stopping at the first
//! failing step:
//!
//! 1. range: `min <= value <= max`
//! 2. digit count: the integer part of the value has between `minDigits` and
//!    `maxDigits` digits
//! 3. the custom `validate` predicate
//!
//! A failed coercion or check yields `null`, or the default when one is
//! configured. The default may be a literal or a producer called per failure.
//!
//! # Examples
//!
//! ```
//! use podeng_core::{Float, TypeHandler};
//! use serde_json::json;
//!
//! let handler = Float::new().min(5.045).max(17.5).default_value(18.3);
//!
//! let parsed = handler.parse("num", Some(&json!("17.5"))).unwrap();
//! assert_eq!(parsed.value, json!(17.5));
//!
//! let parsed = handler.parse("num", Some(&json!(20))).unwrap();
//! assert!(parsed.failed);
//! assert_eq!(parsed.value, json!(18.3));
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::{Value, json};

use crate::detector::{self, number_value};
use crate::error::Result;
use crate::handler::{Parsed, TypeHandler, Validation, parse_failure_message};
use crate::options::{self, CommonOptions, Options};

const TYPE_NAME: &str = "Float";

/// Replacement for a failed or missing value.
#[derive(Clone)]
pub enum DefaultValue {
    Literal(Value),
    /// Called every time a default is needed.
    Producer(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    pub fn resolve(&self) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Producer(produce) => produce(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Producer(_) => f.write_str("Producer"),
        }
    }
}

type Predicate = Arc<dyn Fn(f64) -> bool + Send + Sync>;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Limits {
    min: Option<f64>,
    max: Option<f64>,
    min_digits: Option<f64>,
    max_digits: Option<f64>,
}

/// Float type handler.
#[derive(Clone)]
pub struct Float {
    options: Options,
    common: CommonOptions,
    default: Option<DefaultValue>,
    validator: Option<Predicate>,
}

impl Float {
    /// Default options bag.
    pub fn defaults() -> Options {
        let mut defaults = options::common_defaults();
        for name in ["min", "max", "minDigits", "maxDigits", "default"] {
            defaults.insert(name.into(), Value::Null);
        }
        defaults
    }

    pub fn new() -> Self {
        Self::with_bag(Self::defaults())
    }

    /// Builds a handler from an options bag.
    ///
    /// Numeric options are checked when the handler is bound to a key
    /// ([`TypeHandler::verify`]) because the error names the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use podeng_core::{Float, TypeHandler};
    /// use serde_json::json;
    ///
    /// let options = json!({ "min": "abc" }).as_object().cloned().unwrap();
    /// let err = Float::from_options(&options).verify("someKey").unwrap_err();
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Float: Invalid \"min\" option value for someKey, it should be in numeric type!"
    /// );
    /// ```
    pub fn from_options(provided: &Options) -> Self {
        Self::with_bag(options::combine(&Self::defaults(), provided))
    }

    fn with_bag(options: Options) -> Self {
        let default = options
            .get("default")
            .filter(|value| !value.is_null())
            .cloned()
            .map(DefaultValue::Literal);
        Self {
            common: CommonOptions::from_options(&options),
            options,
            default,
            validator: None,
        }
    }

    fn set(mut self, name: &str, value: Value) -> Self {
        self.options.insert(name.into(), value);
        self.common = CommonOptions::from_options(&self.options);
        self
    }

    pub fn min(self, min: f64) -> Self {
        self.set("min", json!(min))
    }

    pub fn max(self, max: f64) -> Self {
        self.set("max", json!(max))
    }

    pub fn min_digits(self, digits: u32) -> Self {
        self.set("minDigits", json!(digits))
    }

    pub fn max_digits(self, digits: u32) -> Self {
        self.set("maxDigits", json!(digits))
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.default = Some(DefaultValue::Literal(value.clone()));
        self.set("default", value)
    }

    /// Uses `produce` to build the default each time one is needed.
    pub fn default_with<F>(mut self, produce: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Producer(Arc::new(produce)));
        self
    }

    /// Adds a custom predicate, run after the range and digit checks.
    pub fn validate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(f64) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(predicate));
        self
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

    fn limits(options: &Options, key: &str) -> Result<Limits> {
        let read = |name: &'static str| options::numeric_option(options, name, TYPE_NAME, key);
        Ok(Limits {
            min: read("min")?,
            max: read("max")?,
            min_digits: read("minDigits")?,
            max_digits: read("maxDigits")?,
        })
    }

    fn coerce(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => detector::parse_numeric_str(s),
            _ => None,
        }
    }

    /// Runs the checks in order and returns the first failure message.
    fn check(&self, key: &str, n: f64, limits: &Limits) -> std::result::Result<(), String> {
        if let Some(min) = limits.min.filter(|min| n < *min) {
            return Err(format!("{key} must be greater than or equal to {min}"));
        }
        if let Some(max) = limits.max.filter(|max| n > *max) {
            return Err(format!("{key} must be less than or equal to {max}"));
        }

        let digits = digit_count(n) as f64;
        if let Some(min_digits) = limits.min_digits.filter(|min| digits < *min) {
            return Err(format!("{key} must have at least {min_digits} digits"));
        }
        if let Some(max_digits) = limits.max_digits.filter(|max| digits > *max) {
            return Err(format!("{key} must have at most {max_digits} digits"));
        }

        if let Some(predicate) = &self.validator {
            if !predicate(n) {
                return Err(format!("{key} failed custom validation"));
            }
        }
        Ok(())
    }

    fn fallback(&self) -> Value {
        self.default
            .as_ref()
            .map(DefaultValue::resolve)
            .unwrap_or(Value::Null)
    }
}

impl Default for Float {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Float")
            .field("options", &self.options)
            .field("default", &self.default)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Number of digits in the integer part of `n`, sign excluded.
fn digit_count(n: f64) -> usize {
    format!("{}", n.abs().trunc()).len()
}

impl TypeHandler for Float {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn verify(&self, key: &str) -> Result<()> {
        Self::limits(&self.options, key).map(|_| ())
    }

    fn parse(&self, key: &str, value: Option<&Value>) -> Result<Parsed> {
        let limits = Self::limits(&self.options, key)?;

        let Some(value) = value.filter(|v| !v.is_null()) else {
            return Ok(Parsed::ok(self.fallback()));
        };
        let Some(n) = Self::coerce(value) else {
            return Ok(Parsed::failed(self.fallback()));
        };
        if self.check(key, n, &limits).is_err() {
            return Ok(Parsed::failed(self.fallback()));
        }
        Ok(Parsed::ok(number_value(n)))
    }

    fn validate(&self, key: &str, value: Option<&Value>, options: &Options) -> Result<Validation> {
        let merged = options::combine(&self.options, options);
        let limits = Self::limits(&merged, key)?;

        let Some(value) = value.filter(|v| !v.is_null()) else {
            return Ok(Validation::valid());
        };
        let Some(n) = Self::coerce(value) else {
            return Ok(Validation::invalid(parse_failure_message(key, TYPE_NAME)));
        };
        match self.check(key, n, &limits) {
            Ok(()) => Ok(Validation::valid()),
            Err(message) => Ok(Validation::invalid(message)),
        }
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

    fn parse(handler: &Float, value: Value) -> Parsed {
        handler.parse("num", Some(&value)).unwrap()
    }

    #[test]
    fn test_coerces_numbers_and_numeric_strings() {
        let handler = Float::new();
        assert_eq!(parse(&handler, json!("30.059")), Parsed::ok(json!(30.059)));
        assert_eq!(parse(&handler, json!("30.000")), Parsed::ok(json!(30)));
        assert_eq!(parse(&handler, json!(30.0)), Parsed::ok(json!(30)));
        assert_eq!(parse(&handler, json!(0)), Parsed::ok(json!(0)));
    }

    #[test]
    fn test_rejects_non_numeric_values() {
        let handler = Float::new();
        for raw in [json!({}), json!([1]), json!("invalid"), json!(true), json!("")] {
            assert_eq!(parse(&handler, raw), Parsed::failed(Value::Null));
        }
    }

    #[test]
    fn test_null_and_missing_pass_through() {
        let handler = Float::new();
        assert_eq!(parse(&handler, Value::Null), Parsed::ok(Value::Null));
        assert_eq!(handler.parse("num", None).unwrap(), Parsed::ok(Value::Null));

        let handler = Float::new().default_value(1.5);
        assert_eq!(parse(&handler, Value::Null), Parsed::ok(json!(1.5)));
    }

    #[test]
    fn test_range_is_inclusive() {
        let handler = Float::new().min(5.045).max(17.5);
        assert_eq!(parse(&handler, json!("5.045")).value, json!(5.045));
        assert_eq!(parse(&handler, json!("17.5")).value, json!(17.5));
        assert!(parse(&handler, json!(5)).failed);
        assert!(parse(&handler, json!(20)).failed);
    }

    #[test]
    fn test_digit_count_uses_integer_part() {
        let handler = Float::new().min_digits(2).max_digits(3);
        assert_eq!(parse(&handler, json!("27")), Parsed::ok(json!(27)));
        assert_eq!(parse(&handler, json!("100.04")), Parsed::ok(json!(100.04)));
        assert!(parse(&handler, json!("9")).failed);
        assert!(parse(&handler, json!("9.5")).failed);
        assert!(parse(&handler, json!("1000")).failed);
        assert_eq!(digit_count(-12.75), 2);
        assert_eq!(digit_count(0.5), 1);
    }

    #[test]
    fn test_range_failure_short_circuits_custom_validator() {
        let handler = Float::new()
            .min(10.0)
            .validate(|_| panic!("validator must not run"))
            .default_value(42);
        assert_eq!(parse(&handler, json!(1)), Parsed::failed(json!(42)));
    }

    #[test]
    fn test_default_producer_runs_per_failure() {
        let handler = Float::new()
            .validate(|n| n != 1818.0)
            .default_with(|| json!(9999));
        assert_eq!(parse(&handler, json!("abc")), Parsed::failed(json!(9999)));
        assert_eq!(parse(&handler, json!(1818)), Parsed::failed(json!(9999)));
        assert_eq!(parse(&handler, json!(1)), Parsed::ok(json!(1)));
    }

    #[test]
    fn test_invalid_numeric_options_fail_on_parse_and_verify() {
        for name in ["min", "max", "minDigits", "maxDigits"] {
            let mut bag = Options::new();
            bag.insert(name.into(), json!("abc"));
            let handler = Float::from_options(&bag);
            let expected = SetupError::InvalidNumericOption {
                handler: "Float",
                option: name,
                key: "someKey".into(),
            };
            assert_eq!(handler.verify("someKey"), Err(expected.clone()));
            assert_eq!(handler.parse("someKey", Some(&json!("123.23"))), Err(expected));
        }
    }

    #[test]
    fn test_from_options_reads_default_and_common_keys() {
        let bag = json!({
            "max": 100.05,
            "default": 7,
            "hideOnFail": true,
            "serialize": { "to": "amount" },
        });
        let handler = Float::from_options(bag.as_object().unwrap());
        assert!(handler.is_hide_on_fail());
        assert_eq!(handler.serialize_name(), Some("amount"));
        assert!(!handler.is_hide_on_serialization());
        assert_eq!(parse(&handler, json!("180.23")), Parsed::failed(json!(7)));
    }

    #[test]
    fn test_serialize_builders_compose() {
        let handler = Float::new().serialize_to("total").hide_on_serialization();
        assert_eq!(handler.serialize_name(), Some("total"));
        assert!(handler.is_hide_on_serialization());
    }

    #[test]
    fn test_validate_reports_first_failure() {
        let handler = Float::new().min(5.5);
        let validation = TypeHandler::validate(&handler, "num", Some(&json!(2)), &Options::new()).unwrap();
        assert_eq!(
            validation,
            Validation::invalid("num must be greater than or equal to 5.5")
        );

        let overrides = json!({ "min": 1 });
        let validation = TypeHandler::validate(&handler, "num", Some(&json!(2)), overrides.as_object().unwrap())
            .unwrap();
        assert!(validation.valid);

        let validation = TypeHandler::validate(&handler, "num", Some(&json!("x")), &Options::new()).unwrap();
        assert_eq!(validation.errors, vec!["failed to parse num as a Float type"]);
    }
}
