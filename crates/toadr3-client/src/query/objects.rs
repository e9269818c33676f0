use serde_json::Value;
use toadr3_core::ObjectType;

use super::{ParamValue, QueryArgs, QueryParameter, QueryParams};

/// Object types a subscription listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Objects;

pub const OBJECTS: Objects = Objects;

fn known_object_types() -> String {
    let names: Vec<&str> = ObjectType::ALL.iter().map(ObjectType::as_str).collect();
    format!("[{}]", names.join(", "))
}

fn display(item: &Value) -> String {
    match item {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl QueryParameter for Objects {
    fn check(&self, errors: &mut Vec<String>, args: &QueryArgs) {
        let Some(objects) = args.get("objects") else {
            return;
        };

        let Some(items) = objects.as_array() else {
            errors.push("objects must be a list of strings or ObjectType".to_string());
            return;
        };

        for item in items {
            match item.as_str() {
                None => errors.push(format!(
                    "object type '{}' must be of type string or ObjectType",
                    display(item)
                )),
                Some(name) if name.parse::<ObjectType>().is_err() => errors.push(format!(
                    "object type '{}' must be one of {}",
                    name,
                    known_object_types()
                )),
                Some(_) => {}
            }
        }
    }

    fn create(&self, params: &mut QueryParams, args: &QueryArgs) {
        if let Some(objects) = args.get("objects") {
            params.insert("objects", ParamValue::from_json(objects));
        }
    }
}
