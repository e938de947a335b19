//! Schema definitions: an ordered mapping of field key to type handler.
//!
//! Keys are unique; redefining a key replaces its handler in place. Order is
//! preserved and drives output and error ordering.
//!
//! # Examples
//!
//! ```
//! use podeng::{HandlerRef, Schema, types};
//!
//! let schema = Schema::new()
//!     .field("num", HandlerRef::factory(types::float))
//!     .field("price", types::float().min(0.0));
//!
//! assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["num", "price"]);
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use podeng_core::{HandlerRef, TypeHandler};

use crate::error::{BlueprintError, Result};

/// Declarative field → handler mapping.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, HandlerRef)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a field.
    pub fn field(mut self, key: impl Into<String>, handler: impl Into<HandlerRef>) -> Self {
        self.insert(key, handler);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, handler: impl Into<HandlerRef>) {
        let key = key.into();
        let handler = handler.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = handler,
            None => self.fields.push((key, handler)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&HandlerRef> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, h)| h)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Resolves every handler and checks it against its key.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::Setup`] for a factory that fails or a
    /// misconfigured handler, and [`BlueprintError::DuplicateOutputName`]
    /// when two serialized fields share an output name.
    pub(crate) fn compile(&self) -> Result<Vec<Field>> {
        let fields = self
            .fields
            .iter()
            .map(|(key, handler)| -> Result<Field> {
                let handler = handler.resolve()?;
                handler.verify(key)?;
                Ok(Field {
                    key: key.clone(),
                    handler,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut names = HashSet::new();
        for field in fields.iter().filter(|f| !f.handler.is_hide_on_serialization()) {
            let name = field.output_name();
            if !names.insert(name) {
                return Err(BlueprintError::DuplicateOutputName(name.to_string()));
            }
        }
        Ok(fields)
    }
}

impl<K, H> FromIterator<(K, H)> for Schema
where
    K: Into<String>,
    H: Into<HandlerRef>,
{
    fn from_iter<I: IntoIterator<Item = (K, H)>>(iter: I) -> Self {
        let mut schema = Self::new();
        for (key, handler) in iter {
            schema.insert(key, handler);
        }
        schema
    }
}

/// A field with its handler resolved.
#[derive(Clone)]
pub(crate) struct Field {
    pub(crate) key: String,
    pub(crate) handler: Arc<dyn TypeHandler>,
}

impl Field {
    /// Key used in serialized output.
    pub(crate) fn output_name(&self) -> &str {
        self.handler.serialize_name().unwrap_or(self.key.as_str())
    }
}
