//! Conditions handler: a decision tree over the raw value.
//!
//! The evaluator picks `on_ok` or `on_fail`. A branch is either a literal
//! returned as-is, or another [`Conditions`] that re-examines the *same* raw
//! value. Trees can nest to any depth. Parsing never fails.
//!
//! # Examples
//!
//! ```
//! use podeng_core::{Conditions, TypeHandler};
//! use serde_json::{Value, json};
//!
//! let at_least = |n: f64| move |v: &Value| v.as_f64().is_some_and(|age| age >= n);
//! let handler = Conditions::new(
//!     at_least(17.0),
//!     Conditions::new(at_least(30.0), "love", "fun"),
//!     "child",
//! );
//!
//! assert_eq!(handler.parse("age", Some(&json!(35))).unwrap().value, json!("love"));
//! assert_eq!(handler.parse("age", Some(&json!(20))).unwrap().value, json!("fun"));
//! assert_eq!(handler.parse("age", Some(&json!(15))).unwrap().value, json!("child"));
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Result, SetupError};
use crate::handler::{Parsed, TypeHandler};
use crate::options::{self, CommonOptions, Options};

const TYPE_NAME: &str = "conditions";

/// Predicate over the raw value. An absent key is seen as `null`.
pub type Evaluator = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Outcome of one side of a condition.
#[derive(Debug, Clone)]
pub enum Branch {
    Literal(Value),
    Nested(Box<Conditions>),
}

impl From<Value> for Branch {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<&str> for Branch {
    fn from(value: &str) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<String> for Branch {
    fn from(value: String) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<bool> for Branch {
    fn from(value: bool) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<i64> for Branch {
    fn from(value: i64) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<f64> for Branch {
    fn from(value: f64) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<Conditions> for Branch {
    fn from(conditions: Conditions) -> Self {
        Self::Nested(Box::new(conditions))
    }
}

/// Keyword form of the constructor; `evaluates` is required.
#[derive(Default)]
pub struct ConditionsSetup {
    pub evaluates: Option<Evaluator>,
    pub on_ok: Option<Branch>,
    pub on_fail: Option<Branch>,
}

/// Conditions type handler.
#[derive(Clone)]
pub struct Conditions {
    evaluates: Evaluator,
    on_ok: Branch,
    on_fail: Branch,
    common: CommonOptions,
}

impl Conditions {
    /// Positional form: `(evaluates, on_ok, on_fail)`.
    pub fn new<F>(evaluates: F, on_ok: impl Into<Branch>, on_fail: impl Into<Branch>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            evaluates: Arc::new(evaluates),
            on_ok: on_ok.into(),
            on_fail: on_fail.into(),
            common: CommonOptions::default(),
        }
    }

    /// Keyword form. Missing branches resolve to `null`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidSetup`] when `evaluates` is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use podeng_core::{Conditions, ConditionsSetup};
    ///
    /// let err = Conditions::from_setup(ConditionsSetup::default()).unwrap_err();
    /// assert_eq!(err.to_string(), "Invalid setup for \"conditions\" type");
    /// ```
    pub fn from_setup(setup: ConditionsSetup) -> Result<Self> {
        let evaluates = setup.evaluates.ok_or(SetupError::InvalidSetup(TYPE_NAME))?;
        Ok(Self {
            evaluates,
            on_ok: setup.on_ok.unwrap_or(Branch::Literal(Value::Null)),
            on_fail: setup.on_fail.unwrap_or(Branch::Literal(Value::Null)),
            common: CommonOptions::default(),
        })
    }

    /// Applies the common `serialize` options from a bag.
    pub fn with_options(mut self, provided: &Options) -> Self {
        let merged = options::combine(&options::common_defaults(), provided);
        self.common = CommonOptions::from_options(&merged);
        self
    }

    pub fn serialize_to(mut self, name: &str) -> Self {
        self.common.serialize_to = Some(name.to_string());
        self
    }

    pub fn hide_on_serialization(mut self) -> Self {
        self.common.hide_on_serialization = true;
        self
    }

    /// Walks the tree for `value`.
    pub fn resolve(&self, value: &Value) -> Value {
        let branch = if (self.evaluates)(value) {
            &self.on_ok
        } else {
            &self.on_fail
        };
        match branch {
            Branch::Literal(literal) => literal.clone(),
            Branch::Nested(nested) => nested.resolve(value),
        }
    }
}

impl fmt::Debug for Conditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conditions")
            .field("on_ok", &self.on_ok)
            .field("on_fail", &self.on_fail)
            .finish_non_exhaustive()
    }
}

impl TypeHandler for Conditions {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn parse(&self, _key: &str, value: Option<&Value>) -> Result<Parsed> {
        Ok(Parsed::ok(self.resolve(value.unwrap_or(&Value::Null))))
    }

    fn is_hide_on_serialization(&self) -> bool {
        self.common.hide_on_serialization
    }

    fn serialize_name(&self) -> Option<&str> {
        self.common.serialize_to.as_deref()
    }
}
