use toadr3_core::validate::{
    is_object_id_charset, OBJECT_ID_MAX_LEN, OBJECT_ID_MIN_LEN, OBJECT_ID_PATTERN,
};

use super::{ParamValue, QueryArgs, QueryParameter, QueryParams};

/// An object identifier argument, e.g. `program_id` sent as `programID`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectId {
    /// Argument name in [`QueryArgs`]
    pub argument: &'static str,
    /// Query parameter name on the wire
    pub parameter: &'static str,
    /// Whether the argument may be left out
    pub nullable: bool,
}

pub const PROGRAM_ID: ObjectId = ObjectId {
    argument: "program_id",
    parameter: "programID",
    nullable: true,
};

pub const EVENT_ID: ObjectId = ObjectId {
    argument: "event_id",
    parameter: "eventID",
    nullable: true,
};

pub const SUBSCRIPTION_ID: ObjectId = ObjectId {
    argument: "subscription_id",
    parameter: "subscriptionID",
    nullable: false,
};

/// Program id of the by-id program endpoints, which cannot do without one
pub const PROGRAM_ID_REQUIRED: ObjectId = ObjectId {
    nullable: false,
    ..PROGRAM_ID
};

impl QueryParameter for ObjectId {
    fn check(&self, errors: &mut Vec<String>, args: &QueryArgs) {
        let Some(value) = args.get(self.argument) else {
            if !self.nullable {
                errors.push(format!("{} cannot be None", self.argument));
            }
            return;
        };

        let Some(id) = value.as_str() else {
            errors.push(format!("{} must be a string", self.argument));
            return;
        };

        if !(OBJECT_ID_MIN_LEN..=OBJECT_ID_MAX_LEN).contains(&id.chars().count()) {
            errors.push(format!(
                "{} must be between {} and {} characters long",
                self.argument, OBJECT_ID_MIN_LEN, OBJECT_ID_MAX_LEN
            ));
        }

        if !is_object_id_charset(id) {
            errors.push(format!(
                "{} '{}' does not match regex '{}'",
                self.argument, id, OBJECT_ID_PATTERN
            ));
        }
    }

    fn create(&self, params: &mut QueryParams, args: &QueryArgs) {
        if let Some(value) = args.get(self.argument) {
            params.insert(self.parameter, ParamValue::from_json(value));
        }
    }
}
