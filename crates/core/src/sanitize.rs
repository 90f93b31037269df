//! Request payload hygiene.
//!
//! [`sanitize_input`] removes the obvious script-injection vectors from every
//! string in a JSON document. It is a second line of defence in front of the
//! schemas, not an HTML sanitizer: markup other than `<script>` is left alone.
//!
//! [`clean_form_data`] normalizes form submissions so that blank optional
//! fields read as absent instead of failing length or format checks.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("script block pattern is valid")
});

static SCRIPT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?script\b[^>]*>").expect("script tag pattern is valid"));

static JS_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript\s*:").expect("scheme pattern is valid"));

static EVENT_HANDLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bon[a-z]+\s*=").expect("handler pattern is valid"));

/// Strip script blocks, `javascript:` schemes and inline `on*=` handlers.
pub fn sanitize_str(input: &str) -> String {
    let without_blocks = SCRIPT_BLOCK.replace_all(input, "");
    let without_tags = SCRIPT_TAG.replace_all(&without_blocks, "");
    let without_scheme = JS_SCHEME.replace_all(&without_tags, "");
    EVENT_HANDLER.replace_all(&without_scheme, "").into_owned()
}

/// Apply [`sanitize_str`] to every string in an arbitrarily nested value.
pub fn sanitize_input(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_str(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_input).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, v)| (key, sanitize_input(v)))
                .collect(),
        ),
        other => other,
    }
}

/// Trim every string and drop the ones that end up empty.
///
/// Blank object members are removed so the field reads as absent; blank array
/// entries are dropped. An explicit `null` is preserved.
pub fn clean_form_data(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.trim().to_string()),
        Value::Array(items) => Value::Array(items.into_iter().filter_map(clean_entry).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter_map(|(key, v)| clean_entry(v).map(|v| (key, v)))
                .collect(),
        ),
        other => other,
    }
}

fn clean_entry(value: Value) -> Option<Value> {
    match clean_form_data(value) {
        Value::String(s) if s.is_empty() => None,
        cleaned => Some(cleaned),
    }
}

/// Full hygiene pass applied to every incoming JSON body.
pub fn prepare_payload(value: Value) -> Value {
    clean_form_data(sanitize_input(value))
}
