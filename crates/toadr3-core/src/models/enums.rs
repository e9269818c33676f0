//! Enumerations shared across records and query parameters

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Types of objects addressable through the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectType {
    Event,
    Program,
    Report,
    Resource,
    Subscription,
    Ven,
}

impl ObjectType {
    /// Every object type, in wire order
    pub const ALL: [ObjectType; 6] = [
        ObjectType::Event,
        ObjectType::Program,
        ObjectType::Report,
        ObjectType::Resource,
        ObjectType::Subscription,
        ObjectType::Ven,
    ];

    /// Wire representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Event => "EVENT",
            ObjectType::Program => "PROGRAM",
            ObjectType::Report => "REPORT",
            ObjectType::Resource => "RESOURCE",
            ObjectType::Subscription => "SUBSCRIPTION",
            ObjectType::Ven => "VEN",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectType::ALL
            .into_iter()
            .find(|object_type| object_type.as_str() == s)
            .ok_or_else(|| format!("Unknown object type: {}", s))
    }
}

/// Object operation to subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationType {
    Get,
    Post,
    Put,
    Delete,
}

/// Kind of target a [`ValuesMap`](crate::ValuesMap) or query filter refers to
///
/// The protocol allows private target types, which are kept verbatim in
/// [`TargetType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TargetType {
    /// Utility named point of service, usually a customer site
    PowerServiceLocation,
    /// Utility named geographic region
    ServiceArea,
    Group,
    ResourceName,
    VenName,
    EventName,
    ProgramName,
    /// Private target type
    Other(String),
}

impl TargetType {
    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            TargetType::PowerServiceLocation => "POWER_SERVICE_LOCATION",
            TargetType::ServiceArea => "SERVICE_AREA",
            TargetType::Group => "GROUP",
            TargetType::ResourceName => "RESOURCE_NAME",
            TargetType::VenName => "VEN_NAME",
            TargetType::EventName => "EVENT_NAME",
            TargetType::ProgramName => "PROGRAM_NAME",
            TargetType::Other(value) => value,
        }
    }
}

impl From<String> for TargetType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "POWER_SERVICE_LOCATION" => TargetType::PowerServiceLocation,
            "SERVICE_AREA" => TargetType::ServiceArea,
            "GROUP" => TargetType::Group,
            "RESOURCE_NAME" => TargetType::ResourceName,
            "VEN_NAME" => TargetType::VenName,
            "EVENT_NAME" => TargetType::EventName,
            "PROGRAM_NAME" => TargetType::ProgramName,
            _ => TargetType::Other(value),
        }
    }
}

impl From<&str> for TargetType {
    fn from(value: &str) -> Self {
        TargetType::from(value.to_string())
    }
}

impl From<TargetType> for String {
    fn from(value: TargetType) -> Self {
        match value {
            TargetType::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
