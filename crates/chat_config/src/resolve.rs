//! Three-level configuration resolution.
//!
//! Precedence is `defaults < remote < overrides`. The remote layer merges
//! nested objects one level deep and cannot change a protected key that is
//! already present; the override layer is a plain shallow merge.

use serde_json::Value;

use crate::keys::PROTECTED_KEYS;
use crate::WidgetConfig;

/// Merges server-fetched options into a copy of `base`.
///
/// `base` is never mutated. With `remote == None` the copy is returned as is.
pub fn apply_remote_config(base: &WidgetConfig, remote: Option<&WidgetConfig>) -> WidgetConfig {
    let mut merged = base.clone();
    let Some(remote) = remote else {
        return merged;
    };

    let preserved: Vec<(&str, Value)> = PROTECTED_KEYS
        .iter()
        .filter_map(|key| merged.get(key).map(|value| (*key, value.clone())))
        .collect();

    let target = merged.as_map_mut();
    for (key, incoming) in remote.iter() {
        match (target.get_mut(key), incoming) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                for (nested_key, nested_value) in incoming {
                    existing.insert(nested_key.clone(), nested_value.clone());
                }
            }
            _ => {
                target.insert(key.clone(), incoming.clone());
            }
        }
    }

    for (key, value) in preserved {
        target.insert(key.to_owned(), value);
    }

    merged
}

/// Resolves the effective configuration.
pub fn resolve(
    defaults: &WidgetConfig,
    remote: Option<&WidgetConfig>,
    overrides: &WidgetConfig,
) -> WidgetConfig {
    let mut resolved = apply_remote_config(defaults, remote);
    resolved.merge_shallow(overrides);
    resolved
}
