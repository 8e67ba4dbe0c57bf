// ==============================================================================
// Injector -- template + values -> concrete path
// ==============================================================================
//
// Works on the raw template, segment by segment, with the same segment
// vocabulary as the compiler. Values go through `serde_json::Value` so that
// any serializable map or struct can be used.
//
// Missing values:
//   - optional parameter or wildcard -> `/:name?` is dropped, an extension
//                                       after it is kept
//   - required parameter             -> the placeholder is kept verbatim

use std::num::FpCategory;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    error::Error,
    parse::WILDCARD_KEY,
    segment::Segment,
};

/// Substitutes `values` into `template`.
///
/// `values` may be anything that serializes to a map: a
/// `serde_json::json!({...})` literal, a `HashMap`, or a struct deriving
/// [`Serialize`]. The wildcard's value is looked up under
/// [`WILDCARD_KEY`](crate::WILDCARD_KEY).
///
/// A value counts as missing when it is absent, `null`, `false`, `0` or an
/// empty string. Missing optional parameters and wildcards drop their
/// `/`-prefixed marker; a fixed extension such as the `.json` in
/// `/:file?.json` stays behind. A missing required parameter leaves its
/// placeholder in the output untouched; the result is not checked against
/// the template.
///
/// ```rust
/// use axum_pathpattern::inject;
/// use serde_json::json;
///
/// assert_eq!(inject("/foo/:id", &json!({ "id": 123 }))?, "/foo/123");
/// assert_eq!(inject("/foo/:id/:bar?", &json!({ "id": 123 }))?, "/foo/123");
/// assert_eq!(inject("/foo/:id/:bar", &json!({ "id": 123 }))?, "/foo/123/:bar");
/// # Ok::<(), axum_pathpattern::Error>(())
/// ```
///
/// # Errors
///
/// Returns [`Error::Values`] if `values` fails to serialize and
/// [`Error::ValuesNotAMap`] if it serializes to anything but a map or
/// `null`.
pub fn inject<V>(template: &str, values: &V) -> Result<String, Error>
where
    V: Serialize + ?Sized,
{
    let values = match serde_json::to_value(values)? {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(Error::ValuesNotAMap {
                found: kind(&other),
            });
        }
    };

    let mut out = String::with_capacity(template.len() + 16);

    for (index, text) in template.split('/').enumerate() {
        match Segment::parse(text) {
            Segment::Empty | Segment::Static(_) => {
                if index > 0 {
                    out.push('/');
                }
                out.push_str(text);
            }
            Segment::Wildcard { .. } => {
                if let Some(value) = lookup(&values, WILDCARD_KEY) {
                    out.push('/');
                    out.push_str(&value);
                }
            }
            Segment::Param(param) => match lookup(&values, param.name) {
                Some(value) => {
                    out.push('/');
                    out.push_str(&value);
                    out.push_str(param.suffix.unwrap_or_default());
                }
                // The extension stays; only `/:name?` goes.
                None if param.optional => out.push_str(param.suffix.unwrap_or_default()),
                None => {
                    out.push('/');
                    out.push_str(text);
                }
            },
        }
    }

    Ok(out)
}

/// The value for `key` as path text, or `None` if it is missing or falsy.
fn lookup(values: &Map<String, Value>, key: &str) -> Option<String> {
    match values.get(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_owned()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f.classify() == FpCategory::Zero) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other @ (Value::Array(_) | Value::Object(_)) => Some(other.to_string()),
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
