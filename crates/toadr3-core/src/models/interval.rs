use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::duration::{format_iso8601_duration, iso8601};

use super::ValuesMap;

/// Start, duration and randomization window of an interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IntervalPeriod {
    pub start: DateTime<Utc>,

    #[serde(default, with = "iso8601")]
    pub duration: TimeDelta,

    #[serde(
        default,
        with = "iso8601",
        skip_serializing_if = "iso8601::is_zero"
    )]
    pub randomize_start: TimeDelta,
}

impl IntervalPeriod {
    pub fn new(start: DateTime<Utc>, duration: TimeDelta) -> Self {
        Self {
            start,
            duration,
            randomize_start: TimeDelta::zero(),
        }
    }

    /// End of the period, ignoring randomization
    ///
    /// `None` when the end falls outside the representable time range.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.start.checked_add_signed(self.duration)
    }
}

impl std::fmt::Display for IntervalPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let end = match self.end() {
            Some(end) => end.to_rfc3339(),
            None => "out of range".to_string(),
        };
        write!(
            f,
            "{} - {} (± {})",
            self.start.to_rfc3339(),
            end,
            format_iso8601_duration(&self.randomize_start)
        )
    }
}

/// A payload for one interval
///
/// The period is either carried by the interval itself or inherited from
/// the parent event or report data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Interval {
    pub id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub interval_period: Option<IntervalPeriod>,

    #[validate(nested)]
    pub payloads: Vec<ValuesMap>,
}

impl Interval {
    pub fn has_interval_period(&self) -> bool {
        self.interval_period.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_interval_period_durations() {
        let period: IntervalPeriod = serde_json::from_value(json!({
            "start": "2024-08-15T10:00:00.000Z",
            "duration": "PT15M",
            "randomizeStart": null
        }))
        .unwrap();

        assert_eq!(
            period.start,
            Utc.with_ymd_and_hms(2024, 8, 15, 10, 0, 0).unwrap()
        );
        assert_eq!(period.duration, TimeDelta::minutes(15));
        assert_eq!(period.randomize_start, TimeDelta::zero());
        assert_eq!(
            period.to_string(),
            "2024-08-15T10:00:00+00:00 - 2024-08-15T10:15:00+00:00 (± PT0S)"
        );

        // a zero randomization window is left out on the wire
        let value = serde_json::to_value(&period).unwrap();
        assert_eq!(value["duration"], "PT15M");
        assert!(value.get("randomizeStart").is_none());
    }

    #[test]
    fn test_end_out_of_range() {
        let period: IntervalPeriod = serde_json::from_value(json!({
            "start": "2024-08-15T10:00:00Z",
            "duration": "P15250000W"
        }))
        .unwrap();

        assert!(period.validate().is_ok());
        assert_eq!(period.end(), None);
        assert_eq!(
            period.to_string(),
            "2024-08-15T10:00:00+00:00 - out of range (± PT0S)"
        );

        let period = IntervalPeriod::new(period.start, TimeDelta::hours(1));
        assert_eq!(
            period.end(),
            Some(Utc.with_ymd_and_hms(2024, 8, 15, 11, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_invalid_duration_is_rejected() {
        let result = serde_json::from_value::<IntervalPeriod>(json!({
            "start": "2024-08-15T10:00:00Z",
            "duration": "P1M"
        }));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Invalid ISO 8601 duration: P1M"), "{}", err);
    }

    #[test]
    fn test_interval_without_period() {
        let interval: Interval = serde_json::from_value(json!({
            "id": 0,
            "payloads": [{"type": "CONSUMPTION_POWER_LIMIT", "values": [1000]}]
        }))
        .unwrap();

        assert!(!interval.has_interval_period());
        assert_eq!(interval.payloads[0].value_type, "CONSUMPTION_POWER_LIMIT");
        assert!(interval.validate().is_ok());
    }
}
