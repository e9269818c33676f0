//! ISO 8601 duration codec
//!
//! OpenADR3 carries interval lengths, randomization windows and time zone
//! offsets as ISO 8601 durations. Only fixed-length units are supported:
//! weeks, days, hours, minutes and seconds. Years and months have no fixed
//! length without a reference date and are rejected.
//!
//! ```text
//! ["-"] "P" (n"W")? (n"D")? ("T" (n"H")? (n"M")? (n["."f]"S")?)?
//! ```
//!
//! Every component may carry its own sign, which combines with the sign in
//! front of the `P`: `-P-1W1D` is six days. Weeks are folded into days and
//! only seconds may have a fraction.

use chrono::TimeDelta;

use crate::error::DurationError;

const MICROS_PER_SECOND: i128 = 1_000_000;
const MICROS_PER_MINUTE: i128 = 60 * MICROS_PER_SECOND;
const MICROS_PER_HOUR: i128 = 60 * MICROS_PER_MINUTE;
const MICROS_PER_DAY: i128 = 24 * MICROS_PER_HOUR;
const MICROS_PER_WEEK: i128 = 7 * MICROS_PER_DAY;

/// Digits of sub-second precision kept on the wire
const FRACTION_DIGITS: usize = 6;

/// Date designators in the order they may appear
const DATE_UNITS: [(char, i128); 2] = [('W', MICROS_PER_WEEK), ('D', MICROS_PER_DAY)];

/// Time designators in the order they may appear
const TIME_UNITS: [(char, i128); 3] = [
    ('H', MICROS_PER_HOUR),
    ('M', MICROS_PER_MINUTE),
    ('S', MICROS_PER_SECOND),
];

/// Parse an ISO 8601 duration such as `P1W6DT12H30M5.758S`
///
/// # Errors
/// Returns [`DurationError::InvalidDuration`] when the text does not follow
/// the grammar described in the module documentation or overflows.
pub fn parse_iso8601_duration(text: &str) -> Result<TimeDelta, DurationError> {
    let invalid = || DurationError::InvalidDuration(text.to_string());

    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let rest = rest.strip_prefix('P').ok_or_else(invalid)?;
    if rest.is_empty() {
        return Err(invalid());
    }

    let (date, time) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut total = parse_components(date, &DATE_UNITS).ok_or_else(invalid)?;

    if let Some(time) = time {
        // A T must introduce at least one time component
        if time.is_empty() {
            return Err(invalid());
        }
        let time_total = parse_components(time, &TIME_UNITS).ok_or_else(invalid)?;
        total = total.checked_add(time_total).ok_or_else(invalid)?;
    }

    if negative {
        total = -total;
    }

    let micros = i64::try_from(total).map_err(|_| invalid())?;
    Ok(TimeDelta::microseconds(micros))
}

/// Parse a run of `[-]digits[.digits]<unit>` components.
///
/// Units must appear in the order given by `units`, each at most once.
/// Returns the signed sum in microseconds.
fn parse_components(part: &str, units: &[(char, i128)]) -> Option<i128> {
    let mut total: i128 = 0;
    let mut next_unit = 0;
    let mut rest = part;

    while !rest.is_empty() {
        let (negative, body) = match rest.strip_prefix('-') {
            Some(body) => (true, body),
            None => (false, rest),
        };

        let int_len = leading_digits(body);
        if int_len == 0 {
            return None;
        }
        let (int_digits, body) = body.split_at(int_len);

        let (fraction, body) = match body.strip_prefix('.') {
            Some(after_dot) => {
                let frac_len = leading_digits(after_dot);
                if frac_len == 0 {
                    return None;
                }
                let (fraction, body) = after_dot.split_at(frac_len);
                (Some(fraction), body)
            }
            None => (None, body),
        };

        let designator = body.chars().next()?;
        let offset = units[next_unit..]
            .iter()
            .position(|(unit, _)| *unit == designator)?;
        let (unit, scale) = units[next_unit + offset];
        next_unit += offset + 1;

        if fraction.is_some() && unit != 'S' {
            return None;
        }

        let whole: i128 = int_digits.parse().ok()?;
        let mut value = whole.checked_mul(scale)?;
        if let Some(fraction) = fraction {
            value = value.checked_add(fraction_micros(fraction))?;
        }

        total = total.checked_add(if negative { -value } else { value })?;
        rest = &body[designator.len_utf8()..];
    }

    Some(total)
}

fn leading_digits(text: &str) -> usize {
    text.bytes().take_while(u8::is_ascii_digit).count()
}

/// Convert fractional second digits to microseconds, rounding half up.
fn fraction_micros(digits: &str) -> i128 {
    let bytes = digits.as_bytes();
    let mut micros: i128 = 0;
    for index in 0..FRACTION_DIGITS {
        let digit = bytes.get(index).map_or(0, |b| i128::from(b - b'0'));
        micros = micros * 10 + digit;
    }
    if bytes.get(FRACTION_DIGITS).is_some_and(|b| *b >= b'5') {
        micros += 1;
    }
    micros
}

/// Format a duration as ISO 8601, e.g. `-PT58M59S`
///
/// Zero renders as `PT0S`. Sub-microsecond precision is truncated.
pub fn format_iso8601_duration(delta: &TimeDelta) -> String {
    let total = i128::from(delta.num_seconds()) * MICROS_PER_SECOND
        + i128::from(delta.subsec_nanos() / 1_000);

    if total == 0 {
        return "PT0S".to_string();
    }

    let mut out = String::new();
    if total < 0 {
        out.push('-');
    }
    out.push('P');

    let mut rest = total.abs();
    let weeks = rest / MICROS_PER_WEEK;
    rest %= MICROS_PER_WEEK;
    let days = rest / MICROS_PER_DAY;
    rest %= MICROS_PER_DAY;
    let hours = rest / MICROS_PER_HOUR;
    rest %= MICROS_PER_HOUR;
    let minutes = rest / MICROS_PER_MINUTE;
    rest %= MICROS_PER_MINUTE;
    let seconds = rest / MICROS_PER_SECOND;
    let micros = rest % MICROS_PER_SECOND;

    if weeks != 0 {
        out.push_str(&format!("{}W", weeks));
    }
    if days != 0 {
        out.push_str(&format!("{}D", days));
    }
    if hours != 0 || minutes != 0 || rest != 0 {
        out.push('T');
    }
    if hours != 0 {
        out.push_str(&format!("{}H", hours));
    }
    if minutes != 0 {
        out.push_str(&format!("{}M", minutes));
    }
    if micros != 0 {
        let fraction = format!("{:06}", micros);
        out.push_str(&format!("{}.{}S", seconds, fraction.trim_end_matches('0')));
    } else if seconds != 0 {
        out.push_str(&format!("{}S", seconds));
    }

    out
}

/// Serde adapter for `TimeDelta` fields carried as ISO 8601 text.
///
/// A JSON `null` deserializes to a zero duration.
pub mod iso8601 {
    use chrono::TimeDelta;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(delta: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_iso8601_duration(delta))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<TimeDelta, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => super::parse_iso8601_duration(&text).map_err(de::Error::custom),
            None => Ok(TimeDelta::zero()),
        }
    }

    /// `skip_serializing_if` predicate for zero durations
    pub fn is_zero(delta: &TimeDelta) -> bool {
        delta.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn td(days: i64, hours: i64, minutes: i64, seconds: i64, millis: i64) -> TimeDelta {
        TimeDelta::days(days)
            + TimeDelta::hours(hours)
            + TimeDelta::minutes(minutes)
            + TimeDelta::seconds(seconds)
            + TimeDelta::milliseconds(millis)
    }

    fn parse(text: &str) -> TimeDelta {
        parse_iso8601_duration(text).unwrap()
    }

    #[test]
    fn test_parse_errors() {
        let invalid = [
            "P1Y",
            "P1M",
            "P3Y6M4DT12H30M5S",
            "PT1.5M",
            "PT1.5H",
            "PT1W",
            "PT1D",
            "P",
            "PT",
            "P1DT",
            "P1",
            "PT1",
            "PT.5S",
            "PT5.S",
            "PT.S",
            "P1D1W",
            "P1D1D",
            "1D",
            "--P1D",
            "P-D",
            "",
            "P99999999999999999999999999999999999999999W",
        ];

        for text in invalid {
            let err = parse_iso8601_duration(text).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("Invalid ISO 8601 duration: {}", text),
                "expected {:?} to be rejected",
                text
            );
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse("P1W"), td(7, 0, 0, 0, 0));
        assert_eq!(parse("P1D"), td(1, 0, 0, 0, 0));
        assert_eq!(parse("PT1H"), td(0, 1, 0, 0, 0));
        assert_eq!(parse("PT1M"), td(0, 0, 1, 0, 0));
        assert_eq!(parse("PT1S"), td(0, 0, 0, 1, 0));
        assert_eq!(parse("PT0.5S"), td(0, 0, 0, 0, 500));
        assert_eq!(parse("P6DT12H30M5.758S"), td(6, 12, 30, 5, 758));
        assert_eq!(parse("P1W6DT12H30M5.758S"), td(13, 12, 30, 5, 758));
        assert_eq!(parse("PT1H1M1S"), td(0, 1, 1, 1, 0));
        assert_eq!(parse("PT1H1S"), td(0, 1, 0, 1, 0));
        assert_eq!(parse("PT0S"), TimeDelta::zero());
        assert_eq!(parse("PT0.000001S"), TimeDelta::microseconds(1));
    }

    #[test]
    fn test_parse_rounds_to_microseconds() {
        assert_eq!(parse("PT0.0000014S"), TimeDelta::microseconds(1));
        assert_eq!(parse("PT0.0000015S"), TimeDelta::microseconds(2));
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(parse("P-1D"), td(-1, 0, 0, 0, 0));
        assert_eq!(parse("-P1D"), td(-1, 0, 0, 0, 0));
        assert_eq!(parse("-P-1D"), td(1, 0, 0, 0, 0));

        assert_eq!(parse("P-1W1D"), td(-6, 0, 0, 0, 0));
        assert_eq!(parse("-P-1W1D"), td(6, 0, 0, 0, 0));
        assert_eq!(parse("P1W-1D"), td(6, 0, 0, 0, 0));
        assert_eq!(parse("-P1W-1D"), td(-6, 0, 0, 0, 0));

        assert_eq!(parse("PT-0.5S"), td(0, 0, 0, 0, -500));
        assert_eq!(parse("-PT-0.5S"), td(0, 0, 0, 0, 500));
        assert_eq!(parse("PT1M-1S"), td(0, 0, 1, -1, 0));
        assert_eq!(parse("-PT-1M1S"), td(0, 0, 1, -1, 0));
        assert_eq!(parse("PT-1M0.5S"), td(0, 0, -1, 0, 500));

        assert_eq!(parse("P-1W-1DT-1H-1M-1S"), td(-8, -1, -1, -1, 0));
        assert_eq!(parse("-P-1W-1DT-1H-1M-1S"), td(8, 1, 1, 1, 0));
    }

    #[test]
    fn test_format() {
        assert_eq!(format_iso8601_duration(&td(7, 0, 0, 0, 0)), "P1W");
        assert_eq!(format_iso8601_duration(&td(-7, 0, 0, 0, 0)), "-P1W");
        assert_eq!(format_iso8601_duration(&td(1, 0, 0, 0, 0)), "P1D");
        assert_eq!(format_iso8601_duration(&td(0, -1, 0, 0, 0)), "-PT1H");
        assert_eq!(format_iso8601_duration(&td(0, 0, 0, 0, 500)), "PT0.5S");
        assert_eq!(format_iso8601_duration(&td(0, 0, 0, 0, -500)), "-PT0.5S");
        assert_eq!(
            format_iso8601_duration(&TimeDelta::microseconds(1)),
            "PT0.000001S"
        );
        assert_eq!(
            format_iso8601_duration(&TimeDelta::microseconds(-1)),
            "-PT0.000001S"
        );
        assert_eq!(format_iso8601_duration(&TimeDelta::zero()), "PT0S");
        assert_eq!(
            format_iso8601_duration(&td(6, 12, 30, 5, 758)),
            "P6DT12H30M5.758S"
        );
        assert_eq!(
            format_iso8601_duration(&td(-6, -12, -30, -5, -758)),
            "-P6DT12H30M5.758S"
        );
        assert_eq!(format_iso8601_duration(&td(0, -1, 1, 1, 0)), "-PT58M59S");
        assert_eq!(format_iso8601_duration(&td(15, 0, 0, 1, 0)), "P2W1DT1S");
    }

    #[test]
    fn test_round_trip_on_value() {
        let accepted = [
            "P1W6DT12H30M5.758S",
            "-P-1W1D",
            "PT-1M0.5S",
            "PT90M",
            "P10D",
            "PT3600S",
            "PT0.1234567S",
            "-PT0.000001S",
        ];

        for text in accepted {
            let value = parse(text);
            let formatted = format_iso8601_duration(&value);
            assert_eq!(parse(&formatted), value, "{} -> {}", text, formatted);
        }
    }

    /// One signed `[-]n[.f]<unit>` component; only seconds carry a fraction
    #[derive(Debug, Clone)]
    struct Component {
        unit: char,
        value: i64,
        fraction: Option<String>,
    }

    impl Component {
        fn text(&self) -> String {
            match &self.fraction {
                Some(fraction) => format!("{}.{}{}", self.value, fraction, self.unit),
                None => format!("{}{}", self.value, self.unit),
            }
        }

        fn micros(&self) -> i128 {
            let scale = match self.unit {
                'W' => MICROS_PER_WEEK,
                'D' => MICROS_PER_DAY,
                'H' => MICROS_PER_HOUR,
                'M' => MICROS_PER_MINUTE,
                _ => MICROS_PER_SECOND,
            };
            let fraction = self.fraction.as_ref().map_or(0, |digits| {
                format!("{:0<6}", digits).parse::<i128>().unwrap()
            });
            let magnitude = i128::from(self.value.abs()) * scale + fraction;
            if self.value < 0 {
                -magnitude
            } else {
                magnitude
            }
        }
    }

    fn component(unit: char, max: i64) -> impl Strategy<Value = Option<Component>> {
        proptest::option::of((-max..=max).prop_map(move |value| Component {
            unit,
            value,
            fraction: None,
        }))
    }

    fn seconds() -> impl Strategy<Value = Option<Component>> {
        proptest::option::of(
            (-100_000i64..=100_000, proptest::option::of("[0-9]{1,6}")).prop_map(
                |(value, fraction)| Component {
                    unit: 'S',
                    value,
                    fraction,
                },
            ),
        )
    }

    /// Duration text from the grammar with its expected value in microseconds
    fn duration_text() -> impl Strategy<Value = (String, i128)> {
        (
            any::<bool>(),
            component('W', 10_000),
            component('D', 100_000),
            component('H', 1_000_000),
            component('M', 1_000_000),
            seconds(),
        )
            .prop_filter("at least one component", |(_, w, d, h, m, s)| {
                w.is_some() || d.is_some() || h.is_some() || m.is_some() || s.is_some()
            })
            .prop_map(|(negative, weeks, days, hours, minutes, seconds)| {
                let date = [weeks, days];
                let time = [hours, minutes, seconds];

                let mut text = String::from(if negative { "-P" } else { "P" });
                let mut total = 0;
                for part in date.iter().flatten() {
                    text.push_str(&part.text());
                    total += part.micros();
                }
                if time.iter().any(Option::is_some) {
                    text.push('T');
                }
                for part in time.iter().flatten() {
                    text.push_str(&part.text());
                    total += part.micros();
                }

                (text, if negative { -total } else { total })
            })
    }

    proptest! {
        #[test]
        fn test_format_then_parse_is_identity(micros in any::<i64>()) {
            let value = TimeDelta::microseconds(micros);
            let formatted = format_iso8601_duration(&value);
            prop_assert_eq!(parse_iso8601_duration(&formatted), Ok(value), "{}", formatted);
        }

        #[test]
        fn test_parse_then_format_keeps_value((text, expected) in duration_text()) {
            let value = parse_iso8601_duration(&text).unwrap();
            prop_assert_eq!(i128::from(value.num_microseconds().unwrap()), expected, "{}", text);

            let formatted = format_iso8601_duration(&value);
            prop_assert_eq!(parse(&formatted), value, "{} -> {}", text, formatted);
        }
    }
}
