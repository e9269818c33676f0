use super::{ParamValue, QueryArgs, QueryParameter, QueryParams};

/// `target_type` and `target_values`, which only make sense together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Targets;

pub const TARGETS: Targets = Targets;

impl QueryParameter for Targets {
    fn check(&self, errors: &mut Vec<String>, args: &QueryArgs) {
        let target_type = args.get("target_type");
        let target_values = args.get("target_values");

        if target_type.is_some() && target_values.is_none() {
            errors.push("target_values are required when target_type is provided".to_string());
        }

        if target_values.is_some() && target_type.is_none() {
            errors.push("target_type is required when target_values are provided".to_string());
        }

        if let Some(values) = target_values {
            let all_strings = values
                .as_array()
                .is_some_and(|items| items.iter().all(|item| item.is_string()));
            if !all_strings {
                errors.push("target_values must be a list of strings".to_string());
            }
        }

        if target_type.is_some_and(|target_type| !target_type.is_string()) {
            errors.push("target_type must be TargetType or str".to_string());
        }
    }

    fn create(&self, params: &mut QueryParams, args: &QueryArgs) {
        if let (Some(target_type), Some(target_values)) =
            (args.get("target_type"), args.get("target_values"))
        {
            params.insert("targetType", ParamValue::from_json(target_type));
            params.insert("targetValues", ParamValue::from_json(target_values));
        }
    }
}
