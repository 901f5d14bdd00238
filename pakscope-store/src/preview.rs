//! Bounded-size payload previews
//!
//! Every stored packet is announced to the inspector with a preview of its
//! payload. Two limits keep previews small:
//!
//! - a field whose JSON form is longer than [`FIELD_LIMIT`] characters is
//!   replaced: numbers are rounded to two decimals, everything else becomes
//!   [`ELLIPSIS`];
//! - the serialized preview is cut to at most [`PREVIEW_LIMIT`] characters,
//!   even if that leaves it syntactically incomplete.
//!
//! The input payload is only borrowed; the stored record is never touched.

use pakscope_core::PacketData;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::debug;

/// Longest serialized field kept verbatim
pub const FIELD_LIMIT: usize = 15;

/// Hard cap on the whole preview string
pub const PREVIEW_LIMIT: usize = 750;

/// Replacement for long non-numeric fields
pub const ELLIPSIS: &str = "...";

/// Result of trimming one payload
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    /// The preview string sent to the inspector
    pub text: String,
    /// Fields that were rounded or replaced
    pub trimmed_fields: usize,
    /// Fields left out because they could not be serialized
    pub skipped_fields: usize,
    /// Whether the string was cut at the preview limit
    pub truncated: bool,
}

/// Turns packet payloads into previews
#[derive(Debug, Clone, Copy)]
pub struct PreviewTrimmer {
    field_limit: usize,
    preview_limit: usize,
}

impl PreviewTrimmer {
    pub fn new() -> Self {
        Self {
            field_limit: FIELD_LIMIT,
            preview_limit: PREVIEW_LIMIT,
        }
    }

    /// Use custom limits
    pub fn with_limits(field_limit: usize, preview_limit: usize) -> Self {
        Self {
            field_limit,
            preview_limit,
        }
    }

    /// Preview a decoded payload
    pub fn trim(&self, data: &PacketData) -> Preview {
        self.trim_fields(data.iter())
    }

    /// Preview any sequence of named serializable fields
    ///
    /// A field that fails to serialize is counted in `skipped_fields` and
    /// left out of the preview, since there is no JSON form to show
    /// unmodified. The remaining fields are still previewed.
    pub fn trim_fields<K, V, I>(&self, fields: I) -> Preview
    where
        K: AsRef<str>,
        V: Serialize,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut trimmed = Map::new();
        let mut trimmed_fields = 0;
        let mut skipped_fields = 0;

        for (key, value) in fields {
            let key = key.as_ref();
            let value = match serde_json::to_value(&value) {
                Ok(value) => value,
                Err(e) => {
                    skipped_fields += 1;
                    debug!(field = key, error = %e, "Skipping unserializable field in preview");
                    continue;
                }
            };

            let value = if json_len(&value) > self.field_limit {
                trimmed_fields += 1;
                shorten(value)
            } else {
                value
            };
            trimmed.insert(key.to_string(), value);
        }

        let full = Value::Object(trimmed).to_string();
        let (text, truncated) = truncate_chars(full, self.preview_limit);

        Preview {
            text,
            trimmed_fields,
            skipped_fields,
            truncated,
        }
    }
}

impl Default for PreviewTrimmer {
    fn default() -> Self {
        Self::new()
    }
}

/// Length of the compact JSON form, in characters
fn json_len(value: &Value) -> usize {
    value.to_string().chars().count()
}

fn shorten(value: Value) -> Value {
    match value {
        Value::Number(n) => round_number(n),
        _ => Value::String(ELLIPSIS.to_string()),
    }
}

/// Round to two decimals the way `Math.round((x + EPSILON) * 100) / 100` does
///
/// Integers already have no fractional part and are returned as they are.
/// Whole results are emitted as integers so `12.0` prints as `12`.
fn round_number(n: Number) -> Value {
    if n.is_i64() || n.is_u64() {
        return Value::Number(n);
    }
    let x = match n.as_f64() {
        Some(x) => x,
        None => return Value::String(ELLIPSIS.to_string()),
    };

    let rounded = ((x + f64::EPSILON) * 100.0 + 0.5).floor() / 100.0;

    if rounded.fract() == 0.0 && rounded.abs() < i64::MAX as f64 {
        return Value::from(rounded as i64);
    }
    Number::from_f64(rounded)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(ELLIPSIS.to_string()))
}

fn truncate_chars(s: String, limit: usize) -> (String, bool) {
    match s.char_indices().nth(limit) {
        Some((byte_idx, _)) => (s[..byte_idx].to_string(), true),
        None => (s, false),
    }
}
