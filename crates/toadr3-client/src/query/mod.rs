//! Query parameter validation and projection
//!
//! Endpoint arguments arrive in a [`QueryArgs`] bag. Each endpoint owns a
//! [`ParameterBuilder`] listing the [`QueryParameter`] modules it accepts;
//! the builder first checks every module and reports all problems at once,
//! then projects the arguments onto wire parameter names.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use toadr3_core::{ObjectType, TargetType};

use crate::error::{Result, ToadrClientError};

pub mod builder;
mod client_name;
mod object_id;
mod objects;
mod skip_and_limit;
mod targets;

pub use builder::ParameterBuilder;
pub use client_name::{ClientName, CLIENT_NAME};
pub use object_id::{ObjectId, EVENT_ID, PROGRAM_ID, PROGRAM_ID_REQUIRED, SUBSCRIPTION_ID};
pub use objects::{Objects, OBJECTS};
pub use skip_and_limit::{SkipAndLimit, SKIP_AND_LIMIT};
pub use targets::{Targets, TARGETS};

/// One module of query parameters
pub trait QueryParameter: Send + Sync {
    /// Append a message for every invalid argument this module owns
    fn check(&self, errors: &mut Vec<String>, args: &QueryArgs);

    /// Write this module's arguments to `params` under their wire names
    fn create(&self, params: &mut QueryParams, args: &QueryArgs);
}

/// Value of one query parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    /// Sent as the same key repeated once per item
    List(Vec<String>),
}

impl ParamValue {
    /// Convert a loosely typed argument into a parameter value
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(text) => ParamValue::Text(text.clone()),
            Value::Number(number) => match number.as_i64() {
                Some(n) => ParamValue::Integer(n),
                None => ParamValue::Text(number.to_string()),
            },
            Value::Array(items) => ParamValue::List(items.iter().map(json_text).collect()),
            other => ParamValue::Text(other.to_string()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::List(value)
    }
}

/// Text of a JSON value without quotes around strings
fn json_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Query parameters keyed by wire name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, ParamValue>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flatten into `(key, value)` pairs, repeating the key for list items
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.0.len());
        for (name, value) in &self.0 {
            match value {
                ParamValue::Text(text) => pairs.push((name.clone(), text.clone())),
                ParamValue::Integer(n) => pairs.push((name.clone(), n.to_string())),
                ParamValue::List(items) => {
                    pairs.extend(items.iter().map(|item| (name.clone(), item.clone())))
                }
            }
        }
        pairs
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

/// Arguments accepted by the endpoint functions
///
/// Values are kept as JSON so arguments read from untyped sources get the
/// same checks as typed ones. `null` counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryArgs {
    pub program_id: Option<Value>,
    pub event_id: Option<Value>,
    pub subscription_id: Option<Value>,
    pub client_name: Option<Value>,
    pub target_type: Option<Value>,
    pub target_values: Option<Value>,
    pub objects: Option<Value>,
    pub skip: Option<Value>,
    pub limit: Option<Value>,
}

impl QueryArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read arguments from a JSON object; unknown keys are rejected
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| ToadrClientError::Validation(format!("Invalid query arguments: {}", e)))
    }

    /// Look up an argument by its name
    pub fn get(&self, argument: &str) -> Option<&Value> {
        match argument {
            "program_id" => self.program_id.as_ref(),
            "event_id" => self.event_id.as_ref(),
            "subscription_id" => self.subscription_id.as_ref(),
            "client_name" => self.client_name.as_ref(),
            "target_type" => self.target_type.as_ref(),
            "target_values" => self.target_values.as_ref(),
            "objects" => self.objects.as_ref(),
            "skip" => self.skip.as_ref(),
            "limit" => self.limit.as_ref(),
            _ => None,
        }
        .filter(|value| !value.is_null())
    }

    pub fn program_id(mut self, program_id: impl Into<String>) -> Self {
        self.program_id = Some(Value::String(program_id.into()));
        self
    }

    pub fn event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(Value::String(event_id.into()));
        self
    }

    pub fn subscription_id(mut self, subscription_id: impl Into<String>) -> Self {
        self.subscription_id = Some(Value::String(subscription_id.into()));
        self
    }

    pub fn client_name(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = Some(Value::String(client_name.into()));
        self
    }

    pub fn target_type(mut self, target_type: impl Into<TargetType>) -> Self {
        self.target_type = Some(Value::String(target_type.into().to_string()));
        self
    }

    pub fn target_values<I, S>(mut self, target_values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_values = Some(Value::Array(
            target_values
                .into_iter()
                .map(|value| Value::String(value.into()))
                .collect(),
        ));
        self
    }

    pub fn objects<I>(mut self, objects: I) -> Self
    where
        I: IntoIterator<Item = ObjectType>,
    {
        self.objects = Some(Value::Array(
            objects
                .into_iter()
                .map(|object| Value::String(object.as_str().to_string()))
                .collect(),
        ));
        self
    }

    pub fn skip(mut self, skip: i64) -> Self {
        self.skip = Some(Value::from(skip));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(Value::from(limit));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_query_args_from_value() {
        let args = QueryArgs::from_value(json!({
            "program_id": "42",
            "skip": 5,
            "limit": null
        }))
        .unwrap();

        assert_eq!(args.get("program_id"), Some(&json!("42")));
        assert_eq!(args.get("skip"), Some(&json!(5)));
        assert_eq!(args.get("limit"), None);
        assert_eq!(args.get("unknown"), None);

        let err = QueryArgs::from_value(json!({"program": "42"})).unwrap_err();
        assert!(err.to_string().contains("unknown field `program`"), "{}", err);
    }

    #[test]
    fn test_typed_setters() {
        let args = QueryArgs::new()
            .target_type(TargetType::ResourceName)
            .target_values(["a", "b"])
            .objects([ObjectType::Event, ObjectType::Ven]);

        assert_eq!(args.target_type, Some(json!("RESOURCE_NAME")));
        assert_eq!(args.target_values, Some(json!(["a", "b"])));
        assert_eq!(args.objects, Some(json!(["EVENT", "VEN"])));
    }

    #[test]
    fn test_params_to_pairs() {
        let params = QueryParams::new()
            .with("skip", 1i64)
            .with("targetValues", vec!["a".to_string(), "b".to_string()])
            .with("targetType", "GROUP");

        assert_eq!(
            params.to_pairs(),
            vec![
                ("skip".to_string(), "1".to_string()),
                ("targetType".to_string(), "GROUP".to_string()),
                ("targetValues".to_string(), "a".to_string()),
                ("targetValues".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_param_value_from_json() {
        assert_eq!(ParamValue::from_json(&json!("x")), ParamValue::Text("x".into()));
        assert_eq!(ParamValue::from_json(&json!(7)), ParamValue::Integer(7));
        assert_eq!(
            ParamValue::from_json(&json!(["a", 1])),
            ParamValue::List(vec!["a".into(), "1".into()])
        );
        assert_eq!(ParamValue::from_json(&json!(true)), ParamValue::Text("true".into()));
    }
}
