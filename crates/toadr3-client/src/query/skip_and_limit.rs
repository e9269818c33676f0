use serde_json::Value;

use super::{ParamValue, QueryArgs, QueryParameter, QueryParams};

/// Pagination arguments `skip` and `limit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipAndLimit;

pub const SKIP_AND_LIMIT: SkipAndLimit = SkipAndLimit;

fn check_count(errors: &mut Vec<String>, name: &str, value: Option<&Value>) {
    let Some(value) = value else {
        return;
    };

    if value.is_u64() {
        return;
    }
    match value.as_i64() {
        Some(_) => errors.push(format!("{} must be a positive integer", name)),
        None => errors.push(format!("{} must be an integer", name)),
    }
}

impl QueryParameter for SkipAndLimit {
    fn check(&self, errors: &mut Vec<String>, args: &QueryArgs) {
        check_count(errors, "skip", args.get("skip"));
        check_count(errors, "limit", args.get("limit"));
    }

    fn create(&self, params: &mut QueryParams, args: &QueryArgs) {
        for name in ["skip", "limit"] {
            if let Some(value) = args.get(name) {
                params.insert(name, ParamValue::from_json(value));
            }
        }
    }
}
