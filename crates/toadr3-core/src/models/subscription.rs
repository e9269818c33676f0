use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{ObjectType, OperationType, ValuesMap};

object_type_tag!(
    /// `objectType` discriminator of [`Subscription`]
    SubscriptionObjectType => "SUBSCRIPTION"
);

/// Objects and operations a subscription listens to, and where to call back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ObjectOperation {
    pub objects: Vec<ObjectType>,

    pub operations: Vec<OperationType>,

    /// User provided webhook URL
    pub callback_url: String,

    /// Token the VTN presents when calling `callback_url`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
}

/// Request from a client to be notified of operations on objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        length(min = 1, max = 128),
        custom(function = "crate::validate::object_id")
    )]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modification_date_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub object_type: SubscriptionObjectType,

    #[validate(length(min = 1, max = 128))]
    pub client_name: String,

    #[serde(rename = "programID")]
    #[validate(
        length(min = 1, max = 128),
        custom(function = "crate::validate::object_id")
    )]
    pub program_id: String,

    #[validate(nested)]
    pub object_operations: Vec<ObjectOperation>,

    /// Used by the VTN to filter callbacks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub targets: Option<Vec<ValuesMap>>,
}

impl Subscription {
    pub fn new(
        client_name: impl Into<String>,
        program_id: impl Into<String>,
        object_operations: Vec<ObjectOperation>,
    ) -> Self {
        Self {
            id: None,
            created_date_time: None,
            modification_date_time: None,
            object_type: SubscriptionObjectType::Tag,
            client_name: client_name.into(),
            program_id: program_id.into(),
            object_operations,
            targets: None,
        }
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_date_time
    }

    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.modification_date_time
    }
}
