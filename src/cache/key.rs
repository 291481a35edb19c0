//! Cache keys for cache-aside calls
//!
//! A key is the operation name plus its arguments, encoded by value with
//! serde_json. Positional order matters; keyword arguments are sorted by name,
//! so `kwarg("a", 1).kwarg("b", 2)` and `kwarg("b", 2).kwarg("a", 1)` collide
//! on purpose.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Builder for the deterministic key of one operation call.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheKey {
    operation: String,
    cache_type: Option<String>,
    args: Vec<Value>,
    kwargs: BTreeMap<String, Value>,
    invalid: Option<String>,
}

impl CacheKey {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            cache_type: None,
            args: Vec::new(),
            kwargs: BTreeMap::new(),
            invalid: None,
        }
    }

    /// Routes the call to a named cache store instead of one named after the
    /// operation.
    pub fn cache_type(mut self, cache_type: impl Into<String>) -> Self {
        self.cache_type = Some(cache_type.into());
        self
    }

    /// Appends a positional argument.
    pub fn arg<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => self.args.push(value),
            Err(e) => self.mark_invalid(e),
        }
        self
    }

    /// Sets a keyword argument.
    pub fn kwarg<T: Serialize + ?Sized>(mut self, name: impl Into<String>, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.kwargs.insert(name.into(), value);
            }
            Err(e) => self.mark_invalid(e),
        }
        self
    }

    fn mark_invalid(&mut self, error: serde_json::Error) {
        self.invalid.get_or_insert_with(|| error.to_string());
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Cache type the call is accounted under.
    pub fn label(&self) -> &str {
        self.cache_type.as_deref().unwrap_or(&self.operation)
    }

    /// Encoded key, or None if an argument could not be serialized.
    ///
    /// The key is the JSON array `[operation, args, kwargs]`, so no operation
    /// name or argument can run into the next field.
    pub fn encode(&self) -> Option<String> {
        if self.invalid.is_some() {
            return None;
        }
        let kwargs: serde_json::Map<String, Value> = self.kwargs.clone().into_iter().collect();
        let key = Value::Array(vec![
            Value::String(self.operation.clone()),
            Value::Array(self.args.clone()),
            Value::Object(kwargs),
        ]);
        Some(key.to_string())
    }

    /// Why [`CacheKey::encode`] returned None.
    pub fn invalid_reason(&self) -> Option<&str> {
        self.invalid.as_deref()
    }
}
