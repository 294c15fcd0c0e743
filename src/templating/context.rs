//! Render context assembly.
//!
//! A [`RenderContext`] is an immutable-by-convention map of template
//! variables. Layers are combined with [`RenderContext::merged`], which
//! returns a new context and leaves both inputs untouched; the argument wins
//! on key conflicts, and nested objects are merged key by key.
//!
//! Precedence used by the pipeline, lowest first:
//!
//! 1. content-derived fields (`title`, `body`, `author`, timestamps, `read_time`)
//! 2. common site and theme fields (`site`, `theme`, `assets`, `favicon_url`, ...)
//! 3. caller-supplied overrides

use serde::Serialize;
use serde_json::{Map, Value};

use super::utils::deep_merge_json;

/// Template variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext {
    values: Map<String, Value>,
}

impl RenderContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object; any other value yields an empty context.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(values) => Self {
                values,
            },
            _ => Self::default(),
        }
    }

    /// Build from any serializable struct or map.
    ///
    /// # Errors
    ///
    /// Returns the serialization error for values that are not JSON-representable.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::from_value(serde_json::to_value(value)?))
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Insert only when `key` is absent, so existing values win.
    pub fn insert_default(&mut self, key: &str, value: impl Into<Value>) {
        self.values.entry(key.to_string()).or_insert_with(|| value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String value at a dotted path such as `site.name`.
    #[must_use]
    pub fn get_str(&self, path: &str) -> Option<&str> {
        let mut segments = path.split('.');
        let first = self.values.get(segments.next()?)?;
        segments.try_fold(first, |value, segment| value.get(segment))?.as_str()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// New context with `other` layered on top.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let merged = deep_merge_json(
            Value::Object(self.values.clone()),
            &Value::Object(other.values.clone()),
        );
        Self::from_value(merged)
    }

    #[must_use]
    pub fn to_tera(&self) -> tera::Context {
        let mut context = tera::Context::new();
        for (key, value) in &self.values {
            context.insert(key.as_str(), value);
        }
        context
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Map<String, Value>> for RenderContext {
    fn from(values: Map<String, Value>) -> Self {
        Self {
            values,
        }
    }
}
