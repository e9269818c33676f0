use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::error::{ModelError, ModelResult};

use super::{Event, Interval, IntervalPeriod, PayloadValue, ValuesMap};

/// Target type [`Report::create_report`] takes the resource name from
pub const DEFAULT_REPORT_TARGET_TYPE: &str = "RESOURCE_NAME";

object_type_tag!(
    /// `objectType` discriminator of [`Report`]
    ReportObjectType => "REPORT"
);

object_type_tag!(
    /// `objectType` discriminator of [`ReportPayloadDescriptor`]
    ReportPayloadDescriptorType => "REPORT_PAYLOAD_DESCRIPTOR"
);

fn default_false() -> bool {
    false
}

fn default_true() -> bool {
    true
}

fn default_minus_one() -> i64 {
    -1
}

fn default_one() -> i64 {
    1
}

/// Report request attached to an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReportDescriptor {
    #[validate(length(min = 1, max = 128))]
    pub payload_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub targets: Option<Vec<ValuesMap>>,

    /// Aggregate results from all targeted resources instead of one per resource
    #[serde(default = "default_false")]
    pub aggregate: bool,

    /// Interval at which to generate the report, -1 means end of last
    #[serde(default = "default_minus_one")]
    pub start_interval: i64,

    /// Number of intervals to include, -1 means all
    #[serde(default = "default_minus_one")]
    pub num_intervals: i64,

    /// Report on intervals preceding `start_interval` rather than following it
    #[serde(default = "default_true")]
    pub historical: bool,

    /// Intervals that elapse between reports, -1 means same as `num_intervals`
    #[serde(default = "default_minus_one")]
    pub frequency: i64,

    /// Times to repeat the report, -1 means indefinitely
    #[serde(default = "default_one")]
    pub repeat: i64,
}

impl ReportDescriptor {
    pub fn new(payload_type: impl Into<String>) -> Self {
        Self {
            payload_type: payload_type.into(),
            reading_type: None,
            units: None,
            targets: None,
            aggregate: default_false(),
            start_interval: default_minus_one(),
            num_intervals: default_minus_one(),
            historical: default_true(),
            frequency: default_minus_one(),
            repeat: default_one(),
        }
    }
}

/// Contextual information used to interpret report payload values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayloadDescriptor {
    #[serde(default)]
    pub object_type: ReportPayloadDescriptorType,

    #[validate(length(min = 1, max = 128))]
    pub payload_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 100))]
    pub confidence: Option<i64>,
}

impl ReportPayloadDescriptor {
    pub fn new(payload_type: impl Into<String>) -> Self {
        Self {
            object_type: ReportPayloadDescriptorType::Tag,
            payload_type: payload_type.into(),
            reading_type: None,
            units: None,
            accuracy: None,
            confidence: None,
        }
    }

    /// Describe the payload answering a report request
    pub fn from_report_descriptor(descriptor: &ReportDescriptor) -> Self {
        Self {
            reading_type: descriptor.reading_type.clone(),
            units: descriptor.units.clone(),
            ..Self::new(descriptor.payload_type.clone())
        }
    }
}

/// Report values of a single resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    /// `AGGREGATED_REPORT` marks an aggregation of several resources
    #[validate(length(min = 1, max = 128))]
    pub resource_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub interval_period: Option<IntervalPeriod>,

    #[validate(nested)]
    pub intervals: Vec<Interval>,
}

/// Report sent from a VEN to a VTN in answer to an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Report {
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
    pub object_type: ReportObjectType,

    #[serde(rename = "programID")]
    #[validate(
        length(min = 1, max = 128),
        custom(function = "crate::validate::object_id")
    )]
    pub program_id: String,

    #[serde(rename = "eventID")]
    #[validate(
        length(min = 1, max = 128),
        custom(function = "crate::validate::object_id")
    )]
    pub event_id: String,

    /// May be the VEN ID provisioned during program enrollment
    #[validate(
        length(min = 1, max = 128),
        custom(function = "crate::validate::object_id")
    )]
    pub client_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub payload_descriptors: Option<Vec<ReportPayloadDescriptor>>,

    #[validate(nested)]
    pub resources: Vec<ReportData>,
}

impl Report {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_date_time
    }

    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.modification_date_time
    }

    /// Build a single-resource, single-interval report answering `event`.
    ///
    /// The resource is named after the first value of the event's target of
    /// `target_type` (default [`DEFAULT_REPORT_TARGET_TYPE`]) and the payload
    /// is described by the event's report descriptor for `report_type`. The
    /// report inherits the event's interval period.
    pub fn create_report(
        event: &Event,
        client_name: &str,
        report_type: &str,
        report_values: Vec<PayloadValue>,
        report_name: Option<&str>,
        target_type: Option<&str>,
    ) -> ModelResult<Report> {
        let target_type = target_type.unwrap_or(DEFAULT_REPORT_TARGET_TYPE);

        if report_type.is_empty() {
            return Err(invalid("report_type is required."));
        }
        if report_values.is_empty() {
            return Err(invalid("report_values is required."));
        }

        if event.targets.as_deref().map_or(true, <[_]>::is_empty) {
            return Err(invalid("event does not have any targets."));
        }
        let target = event.target(target_type).ok_or_else(|| {
            invalid(format!("event does not have a target for type {}.", target_type))
        })?;
        let resource_name = target.values.first().map(ToString::to_string).ok_or_else(|| {
            invalid(format!("event does not have a target for type {}.", target_type))
        })?;

        if event
            .report_descriptors
            .as_deref()
            .map_or(true, <[_]>::is_empty)
        {
            return Err(invalid("event does not have any report_descriptors."));
        }
        let descriptor = event.report_descriptor(report_type).ok_or_else(|| {
            invalid(format!(
                "event does not have a report_descriptor for {}.",
                report_type
            ))
        })?;

        let event_id = event
            .id
            .clone()
            .ok_or_else(|| invalid("event does not have an id."))?;

        debug!(
            event_id = %event_id,
            report_type,
            resource_name = %resource_name,
            "Creating report"
        );

        let report = Report {
            id: None,
            created_date_time: None,
            modification_date_time: None,
            object_type: ReportObjectType::Tag,
            program_id: event.program_id.clone(),
            event_id,
            client_name: client_name.to_string(),
            report_name: report_name.map(str::to_string),
            payload_descriptors: Some(vec![ReportPayloadDescriptor::from_report_descriptor(
                descriptor,
            )]),
            resources: vec![ReportData {
                resource_name,
                interval_period: event.interval_period.clone(),
                intervals: vec![Interval {
                    id: 0,
                    interval_period: None,
                    payloads: vec![ValuesMap::new(report_type, report_values)],
                }],
            }],
        };

        report.validate()?;
        Ok(report)
    }
}

fn invalid(message: impl Into<String>) -> ModelError {
    ModelError::InvalidArgument(message.into())
}
