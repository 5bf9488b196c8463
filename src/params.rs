//! Typed parameter bags and their query/JSON encodings.
//!
//! A [`ParamBag`] captures any [`serde::Serialize`] value as a JSON tree at
//! construction time. Both the JSON body encoding and the query-string
//! encoding are derived from that one tree, so the two can never disagree
//! on field presence.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::Value;

/// Characters that survive percent-encoding in query strings.
///
/// Everything outside ASCII alphanumerics and `- . _ ~ / ?` is escaped.
/// This is the URL-query-safe set minus the reserved characters
/// `:#[]@!$&'()*+,;=`, which are escaped even though a query component
/// would tolerate them, keeping structural delimiters unambiguous.
const QUERY_ESCAPED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/')
    .remove(b'?');

/// A single flat value: the leaf of a query or form encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamScalar {
    /// JSON `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// Any JSON number.
    Number(serde_json::Number),
    /// A string, used verbatim.
    Text(String),
}

impl fmt::Display for ParamScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamScalar::Null => f.write_str("null"),
            ParamScalar::Bool(value) => value.fmt(f),
            ParamScalar::Number(value) => value.fmt(f),
            ParamScalar::Text(value) => f.write_str(value),
        }
    }
}

/// An encodable value attached to a parameter key.
///
/// Query and form encoders pattern-match this closed sum instead of
/// inspecting runtime value shapes. A nested object is unencodable and its
/// key/value pair is skipped as a whole; unencodable list elements are
/// dropped individually.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// A single scalar, encoded as `key=value`.
    Scalar(ParamScalar),
    /// A flat list, encoded as one `key[]=element` pair per element.
    List(Vec<ParamScalar>),
}

impl ParamValue {
    fn from_tree(tree: &Value) -> Option<Self> {
        match tree {
            Value::Object(_) => None,
            // Elements that cannot be represented flat are dropped one by
            // one; the list itself survives.
            Value::Array(items) => Some(ParamValue::List(
                items.iter().filter_map(scalar_from_tree).collect(),
            )),
            other => scalar_from_tree(other).map(ParamValue::Scalar),
        }
    }
}

fn scalar_from_tree(tree: &Value) -> Option<ParamScalar> {
    match tree {
        Value::Null => Some(ParamScalar::Null),
        Value::Bool(value) => Some(ParamScalar::Bool(*value)),
        Value::Number(value) => Some(ParamScalar::Number(value.clone())),
        Value::String(value) => Some(ParamScalar::Text(value.clone())),
        Value::Array(_) | Value::Object(_) => None,
    }
}

impl fmt::Display for ParamValue {
    /// The default textual form used by form-data field parts: scalars
    /// render bare, lists render as their JSON text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Scalar(scalar) => scalar.fmt(f),
            ParamValue::List(items) => {
                let rendered: Vec<Value> = items.iter().map(scalar_to_tree).collect();
                f.write_str(&Value::Array(rendered).to_string())
            }
        }
    }
}

fn scalar_to_tree(scalar: &ParamScalar) -> Value {
    match scalar {
        ParamScalar::Null => Value::Null,
        ParamScalar::Bool(value) => Value::Bool(*value),
        ParamScalar::Number(value) => Value::Number(value.clone()),
        ParamScalar::Text(value) => Value::String(value.clone()),
    }
}

/// A parameter bag captured from a serializable value.
///
/// Construction serializes the value once into a [`serde_json::Value`];
/// every encoding offered by the bag reads from that tree. Keys iterate in
/// lexicographic order, so produced query strings and form bodies are
/// deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamBag {
    tree: Value,
}

impl ParamBag {
    /// Captures `params` as a bag.
    ///
    /// Returns `None` when serialization fails; the failure is logged and
    /// the caller proceeds as if no parameters were supplied.
    pub fn new<P: Serialize + ?Sized>(params: &P) -> Option<Self> {
        match serde_json::to_value(params) {
            Ok(tree) => Some(Self { tree }),
            Err(err) => {
                log::warn!("parameter bag dropped, serialization failed: {err}");
                None
            }
        }
    }

    /// Wraps an already-built JSON tree.
    pub fn from_tree(tree: Value) -> Self {
        Self { tree }
    }

    /// The captured JSON tree.
    pub fn tree(&self) -> &Value {
        &self.tree
    }

    /// Serializes the bag to JSON bytes for use as a request body.
    pub fn json_bytes(&self) -> Option<Vec<u8>> {
        match serde_json::to_vec(&self.tree) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                log::warn!("JSON body dropped: {err}");
                None
            }
        }
    }

    /// The bag flattened to encodable key/value pairs.
    ///
    /// Only a top-level JSON object yields pairs. Entries whose value does
    /// not fit [`ParamValue`] are skipped silently.
    pub fn form_pairs(&self) -> Vec<(String, ParamValue)> {
        let Value::Object(entries) = &self.tree else {
            return Vec::new();
        };
        entries
            .iter()
            .filter_map(|(key, tree)| match ParamValue::from_tree(tree) {
                Some(value) => Some((key.clone(), value)),
                None => {
                    log::warn!("parameter {key:?} skipped: value shape not encodable");
                    None
                }
            })
            .collect()
    }

    /// Builds a percent-encoded query string from the bag.
    ///
    /// Returns `None` when the bag produces no encodable pairs, which is
    /// observably the same as supplying no parameters at all.
    pub fn query_string(&self) -> Option<String> {
        let mut items = Vec::new();
        for (key, value) in self.form_pairs() {
            let key = encode_component(&key);
            match value {
                ParamValue::Scalar(scalar) => {
                    items.push(format!("{key}={}", encode_component(&scalar.to_string())));
                }
                ParamValue::List(elements) => {
                    // The [] suffix marking repeated keys is escaped like
                    // any other reserved character.
                    for element in elements {
                        items.push(format!(
                            "{key}%5B%5D={}",
                            encode_component(&element.to_string())
                        ));
                    }
                }
            }
        }
        if items.is_empty() {
            None
        } else {
            Some(items.join("&"))
        }
    }
}

fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, QUERY_ESCAPED).to_string()
}
