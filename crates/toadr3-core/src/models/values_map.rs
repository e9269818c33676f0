use serde::{Deserialize, Serialize};
use validator::Validate;

/// A pair of floats, typically a point on a two dimensional grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// One entry of a [`ValuesMap`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Boolean(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    Point(Point),
}

impl From<bool> for PayloadValue {
    fn from(value: bool) -> Self {
        PayloadValue::Boolean(value)
    }
}

impl From<i64> for PayloadValue {
    fn from(value: i64) -> Self {
        PayloadValue::Integer(value)
    }
}

impl From<f64> for PayloadValue {
    fn from(value: f64) -> Self {
        PayloadValue::Number(value)
    }
}

impl From<&str> for PayloadValue {
    fn from(value: &str) -> Self {
        PayloadValue::Text(value.to_string())
    }
}

impl From<String> for PayloadValue {
    fn from(value: String) -> Self {
        PayloadValue::Text(value)
    }
}

impl From<Point> for PayloadValue {
    fn from(value: Point) -> Self {
        PayloadValue::Point(value)
    }
}

impl std::fmt::Display for PayloadValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadValue::Boolean(v) => write!(f, "{}", v),
            PayloadValue::Integer(v) => write!(f, "{}", v),
            PayloadValue::Number(v) => write!(f, "{}", v),
            PayloadValue::Text(v) => f.write_str(v),
            PayloadValue::Point(p) => write!(f, "({}, {})", p.x, p.y),
        }
    }
}

/// Values associated with a type, e.g. a price or a list of resource names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ValuesMap {
    /// Enumerated or private string signifying the nature of values
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 128))]
    pub value_type: String,

    pub values: Vec<PayloadValue>,
}

impl ValuesMap {
    pub fn new(value_type: impl Into<String>, values: Vec<PayloadValue>) -> Self {
        Self {
            value_type: value_type.into(),
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mixed_values() {
        let map: ValuesMap = serde_json::from_value(json!({
            "type": "MIXED",
            "values": [1211, 0.5, "1337", true, {"x": 1.0, "y": 2.0}]
        }))
        .unwrap();

        assert_eq!(map.value_type, "MIXED");
        assert_eq!(
            map.values,
            vec![
                PayloadValue::Integer(1211),
                PayloadValue::Number(0.5),
                PayloadValue::Text("1337".to_string()),
                PayloadValue::Boolean(true),
                PayloadValue::Point(Point { x: 1.0, y: 2.0 }),
            ]
        );
        assert_eq!(map.values[0].to_string(), "1211");
    }

    #[test]
    fn test_type_length() {
        let map = ValuesMap::new("", vec![]);
        assert!(map.validate().is_err());
        assert!(ValuesMap::new("PRICE", vec![0.17f64.into()]).validate().is_ok());
    }
}
