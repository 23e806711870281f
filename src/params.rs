// Builders for the key/value structures the API expects in request bodies:
// annotation and parameter lists (`[{key, value, init?}]`) and the plain
// mapping used as an activation argument.

use crate::cli::ParamArgs;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Value given on the command line: JSON when it parses as JSON, the raw
/// string otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Json(Value),
    Str(String),
}

impl ParamValue {
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(value) => ParamValue::Json(value),
            Err(_) => ParamValue::Str(raw.to_string()),
        }
    }
}

impl From<ParamValue> for Value {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Json(v) => v,
            ParamValue::Str(s) => Value::String(s),
        }
    }
}

/// One `{key, value}` entry. `init` is present on action parameters only:
/// `true` marks an initialization-time environment variable, `false` an
/// invocation parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: ParamValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init: Option<bool>,
}

/// `{key, value}` with the value coerced through `ParamValue::parse`.
pub fn get_param(key: &str, value: &str) -> KeyValue {
    KeyValue {
        key: key.to_string(),
        value: ParamValue::parse(value),
        init: None,
    }
}

/// Entries for every pair, each tagged with `init = as_env_var`.
pub fn get_parameters<K, V>(pairs: &[(K, V)], as_env_var: bool) -> Vec<KeyValue>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .iter()
        .map(|(k, v)| KeyValue {
            init: Some(as_env_var),
            ..get_param(k.as_ref(), v.as_ref())
        })
        .collect()
}

/// Annotation entries (no `init` flag).
pub fn get_annotations(args: &ParamArgs) -> Vec<KeyValue> {
    args.annotations()
        .iter()
        .map(|(k, v)| get_param(k, v))
        .collect()
}

/// Invocation parameters (`init = false`).
pub fn get_params(args: &ParamArgs) -> Vec<KeyValue> {
    get_parameters(&args.params(), false)
}

/// Init-time environment variables (`init = true`).
pub fn get_env_vars(args: &ParamArgs) -> Vec<KeyValue> {
    get_parameters(&args.env_vars(), true)
}

/// Parameters as a single `key -> value` object, for activation bodies.
/// Later duplicates of a key win.
pub fn get_activation_argument(args: &ParamArgs) -> Map<String, Value> {
    args.params()
        .into_iter()
        .map(|(k, v)| (k.to_string(), ParamValue::parse(v).into()))
        .collect()
}

/// Value of the last `description` annotation, or an empty string.
pub fn get_description_from_annotations(annotations: &[KeyValue]) -> String {
    annotations
        .iter()
        .filter(|a| a.key == "description")
        .last()
        .map(|a| match &a.value {
            ParamValue::Json(Value::String(s)) | ParamValue::Str(s) => s.clone(),
            ParamValue::Json(other) => other.to_string(),
        })
        .unwrap_or_default()
}

/// Names declared by `parameters` annotations, whose values are arrays of
/// `{"name": ...}` objects. Entries without a string `name` are skipped.
pub fn get_parameter_names_from_annotations(annotations: &[KeyValue]) -> Vec<String> {
    annotations
        .iter()
        .filter(|a| a.key == "parameters")
        .filter_map(|a| match &a.value {
            ParamValue::Json(Value::Array(items)) => Some(items),
            _ => None,
        })
        .flatten()
        .filter_map(|p| p.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}
