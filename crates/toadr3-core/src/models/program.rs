use std::borrow::Cow;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::duration::iso8601;

use super::{EventPayloadDescriptor, IntervalPeriod, ReportPayloadDescriptor, ValuesMap};

object_type_tag!(
    /// `objectType` discriminator of [`Program`]
    ProgramObjectType => "PROGRAM"
);

/// Payload descriptor listed by a program
///
/// Told apart by the descriptor's `objectType`; descriptors without one are
/// read as event payload descriptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadDescriptor {
    Event(EventPayloadDescriptor),
    Report(ReportPayloadDescriptor),
}

impl PayloadDescriptor {
    pub fn payload_type(&self) -> &str {
        match self {
            PayloadDescriptor::Event(descriptor) => &descriptor.payload_type,
            PayloadDescriptor::Report(descriptor) => &descriptor.payload_type,
        }
    }
}

impl Validate for PayloadDescriptor {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            PayloadDescriptor::Event(descriptor) => descriptor.validate(),
            PayloadDescriptor::Report(descriptor) => descriptor.validate(),
        }
    }
}

fn validate_payload_descriptors(descriptors: &[PayloadDescriptor]) -> Result<(), ValidationError> {
    for (index, descriptor) in descriptors.iter().enumerate() {
        if let Err(errors) = descriptor.validate() {
            let mut error = ValidationError::new("payload_descriptor");
            error.message = Some(Cow::Owned(format!("[{}] {}", index, errors)));
            return Err(error);
        }
    }
    Ok(())
}

/// Program specific metadata from VTN to VEN
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Program {
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
    pub object_type: ProgramObjectType,

    /// Short name to uniquely identify the program
    #[validate(length(min = 1, max = 128))]
    pub program_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_long_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retailer_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retailer_long_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_type: Option<String>,

    /// Alpha-2 code per ISO 3166-1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Coding per ISO 3166-2, e.g. a state in the US
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal_subdivision: Option<String>,

    /// Offset from UTC of the program's standard time
    #[serde(default, with = "iso8601")]
    pub time_zone_offset: TimeDelta,

    /// Temporal span of the program, could be years long
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub interval_period: Option<IntervalPeriod>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_descriptions: Option<Vec<String>>,

    /// True if events are fixed once transmitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding_events: Option<bool>,

    /// True if events have been adapted from a grid event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_price: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_payload_descriptors"))]
    pub payload_descriptors: Option<Vec<PayloadDescriptor>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub targets: Option<Vec<ValuesMap>>,
}

impl Program {
    /// A program with only a name, everything else unset
    pub fn new(program_name: impl Into<String>) -> Self {
        Self {
            id: None,
            created_date_time: None,
            modification_date_time: None,
            object_type: ProgramObjectType::Tag,
            program_name: program_name.into(),
            program_long_name: None,
            retailer_name: None,
            retailer_long_name: None,
            program_type: None,
            country: None,
            principal_subdivision: None,
            time_zone_offset: TimeDelta::zero(),
            interval_period: None,
            program_descriptions: None,
            binding_events: None,
            local_price: None,
            payload_descriptors: None,
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_program_defaults() {
        let program = Program::new("Test Program");

        assert!(program.id.is_none());
        assert_eq!(program.object_type.as_str(), "PROGRAM");
        assert_eq!(program.time_zone_offset, TimeDelta::zero());
        assert!(program.payload_descriptors.is_none());
        assert!(program.validate().is_ok());

        let value = serde_json::to_value(&program).unwrap();
        assert_eq!(
            value,
            json!({
                "objectType": "PROGRAM",
                "programName": "Test Program",
                "timeZoneOffset": "PT0S"
            })
        );
    }

    #[test]
    fn test_program_sample() {
        let program: Program = serde_json::from_value(json!({
            "id": "0",
            "createdDateTime": "2025-08-21T07:13:00Z",
            "modificationDateTime": "2025-08-23T08:10:00Z",
            "objectType": "PROGRAM",
            "programName": "HB",
            "programLongName": "Heartbeat",
            "timeZoneOffset": "PT1H",
            "programDescriptions": ["https://example.com/heartbeat"],
            "bindingEvents": true,
            "payloadDescriptors": [
                {"objectType": "EVENT_PAYLOAD_DESCRIPTOR", "payloadType": "SIMPLE"},
                {"objectType": "REPORT_PAYLOAD_DESCRIPTOR", "payloadType": "USAGE", "confidence": 90}
            ],
            "targets": [{"type": "GROUP", "values": ["north"]}]
        }))
        .unwrap();

        assert!(program.validate().is_ok());
        assert_eq!(program.id.as_deref(), Some("0"));
        assert_eq!(program.program_long_name.as_deref(), Some("Heartbeat"));
        assert_eq!(
            program.created(),
            Some(Utc.with_ymd_and_hms(2025, 8, 21, 7, 13, 0).unwrap())
        );
        assert_eq!(
            program.modified(),
            Some(Utc.with_ymd_and_hms(2025, 8, 23, 8, 10, 0).unwrap())
        );
        assert_eq!(program.time_zone_offset, TimeDelta::hours(1));
        assert_eq!(program.binding_events, Some(true));

        let descriptors = program.payload_descriptors.as_ref().unwrap();
        assert!(matches!(descriptors[0], PayloadDescriptor::Event(_)));
        assert!(matches!(descriptors[1], PayloadDescriptor::Report(_)));
        assert_eq!(descriptors[1].payload_type(), "USAGE");
    }

    #[test]
    fn test_program_nested_validation() {
        let mut program = Program::new("HB");
        program.payload_descriptors = Some(vec![PayloadDescriptor::Report(
            ReportPayloadDescriptor {
                confidence: Some(101),
                ..ReportPayloadDescriptor::new("USAGE")
            },
        )]);
        assert!(program.validate().is_err());

        let program = Program::new("");
        assert!(program.validate().is_err());
    }
}
