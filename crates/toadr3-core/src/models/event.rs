use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Interval, IntervalPeriod, ReportDescriptor, ValuesMap};

object_type_tag!(
    /// `objectType` discriminator of [`Event`]
    EventObjectType => "EVENT"
);

object_type_tag!(
    /// `objectType` discriminator of [`EventPayloadDescriptor`]
    EventPayloadDescriptorType => "EVENT_PAYLOAD_DESCRIPTOR"
);

/// Contextual information used to interpret event payload values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventPayloadDescriptor {
    #[serde(default)]
    pub object_type: EventPayloadDescriptorType,

    /// Enumerated or private string signifying the nature of values
    #[validate(length(min = 1, max = 128))]
    pub payload_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl EventPayloadDescriptor {
    pub fn new(payload_type: impl Into<String>) -> Self {
        Self {
            object_type: EventPayloadDescriptorType::Tag,
            payload_type: payload_type.into(),
            units: None,
            currency: None,
        }
    }
}

/// Demand response request from a VTN to a VEN
///
/// If `interval_period` is present it sets the default start time and
/// duration of every interval that does not carry its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// VTN provisioned on object creation
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
    pub object_type: EventObjectType,

    #[serde(rename = "programID")]
    #[validate(
        length(min = 1, max = 128),
        custom(function = "crate::validate::object_id")
    )]
    pub program_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,

    /// Relative priority, a lower number is a higher priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub targets: Option<Vec<ValuesMap>>,

    /// Reports the VTN requests from the VEN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub report_descriptors: Option<Vec<ReportDescriptor>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub payload_descriptors: Option<Vec<EventPayloadDescriptor>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub interval_period: Option<IntervalPeriod>,

    #[validate(nested)]
    pub intervals: Vec<Interval>,
}

impl Event {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_date_time
    }

    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.modification_date_time
    }

    /// First target of the given type, if any
    pub fn target(&self, target_type: &str) -> Option<&ValuesMap> {
        self.targets
            .as_deref()?
            .iter()
            .find(|target| target.value_type == target_type)
    }

    /// Report descriptor requesting the given payload type, if any
    pub fn report_descriptor(&self, payload_type: &str) -> Option<&ReportDescriptor> {
        self.report_descriptors
            .as_deref()?
            .iter()
            .find(|descriptor| descriptor.payload_type == payload_type)
    }
}
