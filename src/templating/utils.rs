//! Small helpers shared by the context, fallback and menu code.

use serde_json::Value;

/// Layer `overrides` on top of `base`.
///
/// Objects merge key by key at every depth; anything else in `overrides`
/// (arrays, strings, numbers, null) replaces what `base` had.
///
/// ```rust
/// use serde_json::json;
/// use stagehand_cli::templating::deep_merge_json;
///
/// let base = json!({ "site": { "name": "Stagehand", "locale": "en" } });
/// let overrides = json!({ "site": { "name": "Field Notes" } });
///
/// assert_eq!(
///     deep_merge_json(base, &overrides),
///     json!({ "site": { "name": "Field Notes", "locale": "en" } })
/// );
/// ```
#[must_use]
pub fn deep_merge_json(mut base: Value, overrides: &Value) -> Value {
    let (Some(target), Some(layer)) = (base.as_object_mut(), overrides.as_object()) else {
        return overrides.clone();
    };

    for (key, value) in layer {
        match target.get_mut(key) {
            Some(existing) if existing.is_object() && value.is_object() => {
                *existing = deep_merge_json(existing.take(), value);
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
    base
}

/// Escape a value placed inside a double-quoted HTML attribute.
///
/// Unlike [`tera::escape_html`], slashes are kept so URLs stay readable.
#[must_use]
pub fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Whether a logical template name is safe to turn into a file path.
///
/// Rejects empty names, `..` segments, backslashes, and absolute paths.
#[must_use]
pub fn is_safe_logical_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('/')
        && !name.contains('\\')
        && !name.contains(':')
        && name.split('/').all(|segment| !segment.is_empty() && segment != ".." && segment != ".")
}
