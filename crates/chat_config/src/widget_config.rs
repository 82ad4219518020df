use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::keys;

/// Option map for one widget.
///
/// Values are kept as JSON so unknown options from the config service pass
/// through untouched. Typed accessors cover the options the core reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetConfig(Map<String, Value>);

impl WidgetConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value. Returns `None` unless it is an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// True when the key exists, including an explicit `null`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub(crate) fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    /// Overwrites every key present in `patch`. Nested objects are replaced,
    /// not merged.
    pub fn merge_shallow(&mut self, patch: &WidgetConfig) {
        for (key, value) in patch.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Returns the value as a string when it is a non-empty JSON string.
    #[must_use]
    pub fn str_value(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }

    #[must_use]
    pub fn bool_value(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    /// Loose truthiness: `null`, `false`, `0` and `""` are false.
    #[must_use]
    pub fn is_truthy(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(is_truthy)
    }

    #[must_use]
    pub fn workspace_id(&self) -> Option<&str> {
        self.str_value(keys::WORKSPACE_ID)
    }

    #[must_use]
    pub fn agent_id(&self) -> Option<&str> {
        self.str_value(keys::AGENT_ID)
    }

    #[must_use]
    pub fn connect_url(&self) -> Option<&str> {
        self.str_value(keys::CONNECT_URL)
    }

    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.str_value(keys::BASE_URL)
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.str_value(keys::ACCESS_TOKEN)
    }

    /// Streaming flag. Defaults to `true` when unset or not a boolean.
    #[must_use]
    pub fn streaming(&self) -> bool {
        self.bool_value(keys::STREAM).unwrap_or(true)
    }

    #[must_use]
    pub fn websocket(&self) -> bool {
        self.bool_value(keys::WEBSOCKET).unwrap_or(false)
    }
}

impl From<Map<String, Value>> for WidgetConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<WidgetConfig> for Value {
    fn from(config: WidgetConfig) -> Self {
        Value::Object(config.0)
    }
}

impl FromIterator<(String, Value)> for WidgetConfig {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|value| value != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
