//! Datetime, date, time and duration fields.
//!
//! ISO 8601 input is always understood. Custom strftime-style input formats
//! can be configured per parameter; the special format name `iso-8601` stands
//! for the built-in ISO parser.

use crate::field::FieldKind;
use crate::patterns;
use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone, Utc,
};
use regex::Captures;
use serde_json::Value as JsonValue;
use typed_views_core::{ErrorDetail, ParamSettings, Value};

/// Name of the built-in ISO 8601 input format.
pub const ISO_8601: &str = "iso-8601";

const ISO_DATETIME_HUMAN: &str = "YYYY-MM-DDThh:mm[:ss[.uuuuuu]][+HH:MM|-HH:MM|Z]";
const ISO_DATE_HUMAN: &str = "YYYY-MM-DD";
const ISO_TIME_HUMAN: &str = "hh:mm[:ss[.uuuuuu]]";
const DURATION_HUMAN: &str = "[DD] [HH:[MM:]]ss[.uuuuuu]";

fn humanize(formats: &[String], iso: &str) -> String {
    formats
        .iter()
        .map(|format| {
            if format.eq_ignore_ascii_case(ISO_8601) {
                iso.to_string()
            } else {
                format
                    .replace("%Y", "YYYY")
                    .replace("%y", "YY")
                    .replace("%m", "MM")
                    .replace("%b", "[Jan-Dec]")
                    .replace("%B", "[January-December]")
                    .replace("%d", "DD")
                    .replace("%H", "hh")
                    .replace("%I", "hh")
                    .replace("%p", "[AM|PM]")
                    .replace("%M", "mm")
                    .replace("%S", "ss")
                    .replace("%f", "uuuuuu")
                    .replace("%z", "[+HHMM|-HHMM]")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn wrong_format(kind: &str, formats: &[String], iso: &str) -> ErrorDetail {
    ErrorDetail::message(format!(
        "{kind} has wrong format. Use one of these formats instead: {}.",
        humanize(formats, iso)
    ))
}

fn input_formats(settings: &ParamSettings) -> Vec<String> {
    if settings.input_formats().is_empty() {
        vec![ISO_8601.to_string()]
    } else {
        settings.input_formats().to_vec()
    }
}

fn number(caps: &Captures<'_>, name: &str) -> Option<u32> {
    caps.name(name).and_then(|m| m.as_str().parse().ok())
}

fn micros(caps: &Captures<'_>, name: &str) -> Option<u32> {
    caps.name(name)
        .map_or(Some(0), |m| format!("{:0<6}", m.as_str()).parse().ok())
}

fn parse_offset(text: &str) -> Option<FixedOffset> {
    if text == "Z" {
        return Some(Utc.fix());
    }
    let sign = if text.starts_with('-') { -1 } else { 1 };
    let digits: String = text[1..].chars().filter(char::is_ascii_digit).collect();
    let hours: i32 = digits.get(0..2)?.parse().ok()?;
    let minutes: i32 = digits.get(2..4).map_or(Some(0), |m| m.parse().ok())?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn parse_iso_time(caps: &Captures<'_>) -> Option<NaiveTime> {
    NaiveTime::from_hms_micro_opt(
        number(caps, "hour")?,
        number(caps, "minute")?,
        caps.name("second").map_or(Some(0), |m| m.as_str().parse().ok())?,
        micros(caps, "micro")?,
    )
}

fn parse_iso_date(caps: &Captures<'_>) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(
        i32::try_from(number(caps, "year")?).ok()?,
        number(caps, "month")?,
        number(caps, "day")?,
    )
}

/// A timezone-aware datetime field.
///
/// Naive input is interpreted in the configured default timezone, or UTC.
#[derive(Debug, Clone)]
pub struct DateTimeKind {
    formats: Vec<String>,
    timezone: FixedOffset,
}

impl DateTimeKind {
    /// Builds a datetime kind from settings.
    #[must_use]
    pub fn new(settings: &ParamSettings) -> Self {
        Self {
            formats: input_formats(settings),
            timezone: settings.default_timezone().unwrap_or_else(|| Utc.fix()),
        }
    }

    fn parse_iso(&self, text: &str) -> Option<DateTime<FixedOffset>> {
        let caps = patterns::iso_datetime().captures(text)?;
        let naive = NaiveDateTime::new(parse_iso_date(&caps)?, parse_iso_time(&caps)?);
        let offset = match caps.name("tz") {
            Some(tz) => parse_offset(tz.as_str())?,
            None => self.timezone,
        };
        offset.from_local_datetime(&naive).single()
    }

    fn parse_with(&self, text: &str, format: &str) -> Option<DateTime<FixedOffset>> {
        if format.eq_ignore_ascii_case(ISO_8601) {
            return self.parse_iso(text);
        }
        DateTime::parse_from_str(text, format).ok().or_else(|| {
            NaiveDateTime::parse_from_str(text, format)
                .ok()
                .and_then(|naive| self.timezone.from_local_datetime(&naive).single())
        })
    }
}

impl FieldKind for DateTimeKind {
    fn to_internal_value(&self, data: &JsonValue) -> Result<Value, ErrorDetail> {
        let parsed = match data {
            JsonValue::String(text) => self
                .formats
                .iter()
                .find_map(|format| self.parse_with(text.trim(), format)),
            _ => None,
        };
        parsed
            .map(Value::DateTime)
            .ok_or_else(|| wrong_format("Datetime", &self.formats, ISO_DATETIME_HUMAN))
    }
}

/// A calendar date field.
#[derive(Debug, Clone)]
pub struct DateKind {
    formats: Vec<String>,
}

impl DateKind {
    /// Builds a date kind from settings.
    #[must_use]
    pub fn new(settings: &ParamSettings) -> Self {
        Self {
            formats: input_formats(settings),
        }
    }

    fn parse_with(text: &str, format: &str) -> Option<NaiveDate> {
        if format.eq_ignore_ascii_case(ISO_8601) {
            let caps = patterns::iso_date().captures(text)?;
            return parse_iso_date(&caps);
        }
        NaiveDate::parse_from_str(text, format).ok()
    }
}

impl FieldKind for DateKind {
    fn to_internal_value(&self, data: &JsonValue) -> Result<Value, ErrorDetail> {
        let parsed = match data {
            JsonValue::String(text) => self
                .formats
                .iter()
                .find_map(|format| Self::parse_with(text.trim(), format)),
            _ => None,
        };
        parsed
            .map(Value::Date)
            .ok_or_else(|| wrong_format("Date", &self.formats, ISO_DATE_HUMAN))
    }
}

/// A time-of-day field.
#[derive(Debug, Clone)]
pub struct TimeKind {
    formats: Vec<String>,
}

impl TimeKind {
    /// Builds a time kind from settings.
    #[must_use]
    pub fn new(settings: &ParamSettings) -> Self {
        Self {
            formats: input_formats(settings),
        }
    }

    fn parse_with(text: &str, format: &str) -> Option<NaiveTime> {
        if format.eq_ignore_ascii_case(ISO_8601) {
            let caps = patterns::iso_time().captures(text)?;
            return parse_iso_time(&caps);
        }
        NaiveTime::parse_from_str(text, format).ok()
    }
}

impl FieldKind for TimeKind {
    fn to_internal_value(&self, data: &JsonValue) -> Result<Value, ErrorDetail> {
        let parsed = match data {
            JsonValue::String(text) => self
                .formats
                .iter()
                .find_map(|format| Self::parse_with(text.trim(), format)),
            _ => None,
        };
        parsed
            .map(Value::Time)
            .ok_or_else(|| wrong_format("Time", &self.formats, ISO_TIME_HUMAN))
    }
}

/// A duration field accepting `[DD] [HH:[MM:]]ss[.uuuuuu]` or ISO 8601
/// `PnDTnHnMnS`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationKind;

fn parse_fraction(text: &str) -> Option<f64> {
    text.replace(',', ".").parse().ok()
}

#[allow(clippy::cast_possible_truncation)]
fn micros_delta(micros: f64) -> TimeDelta {
    TimeDelta::microseconds(micros.round() as i64)
}

/// Parses a duration in the standard `[DD] [HH:[MM:]]ss[.uuuuuu]` form or
/// ISO 8601.
#[must_use]
pub fn parse_duration(text: &str) -> Option<TimeDelta> {
    if let Some(caps) = patterns::standard_duration().captures(text) {
        let days: f64 = caps.name("days").map_or(Some(0.0), |m| m.as_str().parse().ok())?;
        let field = |name: &str| -> Option<f64> {
            caps.name(name).map_or(Some(0.0), |m| m.as_str().parse().ok())
        };
        let hours = field("hours")?;
        let minutes = field("hminutes")? + field("minutes")?;
        let seconds = field("seconds")?;
        let fraction = caps
            .name("micro")
            .map_or(Some(0.0), |m| format!("{:0<6}", m.as_str()).parse().ok())?;
        let sign = if caps.name("sign").is_some_and(|m| m.as_str() == "-") {
            -1.0
        } else {
            1.0
        };

        let clock = ((hours * 60.0 + minutes) * 60.0 + seconds) * 1_000_000.0 + fraction;
        return Some(micros_delta(days * 86_400_000_000.0) + micros_delta(sign * clock));
    }

    if let Some(caps) = patterns::iso_duration().captures(text) {
        if !["days", "hours", "minutes", "seconds"]
            .iter()
            .any(|name| caps.name(name).is_some())
        {
            return None;
        }
        let field = |name: &str| -> Option<f64> {
            caps.name(name).map_or(Some(0.0), |m| parse_fraction(m.as_str()))
        };
        let total = ((field("days")? * 24.0 + field("hours")?) * 60.0 + field("minutes")?)
            * 60.0
            + field("seconds")?;
        let sign = if caps.name("sign").is_some_and(|m| m.as_str() == "-") {
            -1.0
        } else {
            1.0
        };
        return Some(micros_delta(sign * total * 1_000_000.0));
    }

    None
}

impl FieldKind for DurationKind {
    fn to_internal_value(&self, data: &JsonValue) -> Result<Value, ErrorDetail> {
        let parsed = match data {
            JsonValue::String(text) => parse_duration(text.trim()),
            _ => None,
        };
        parsed.map(Value::Duration).ok_or_else(|| {
            ErrorDetail::message(format!(
                "Duration has wrong format. Use one of these formats instead: {DURATION_HUMAN}."
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn settings() -> ParamSettings {
        ParamSettings::param().build().unwrap()
    }

    #[test]
    fn test_iso_datetime_naive_is_utc() {
        let kind = DateTimeKind::new(&settings());
        let Ok(Value::DateTime(dt)) = kind.to_internal_value(&json!("2019-04-03T10:10")) else {
            panic!("expected datetime");
        };
        assert_eq!(dt.offset().local_minus_utc(), 0);
        assert_eq!((dt.hour(), dt.minute()), (10, 10));
    }

    #[test]
    fn test_iso_datetime_with_offset_and_micros() {
        let kind = DateTimeKind::new(&settings());
        let Ok(Value::DateTime(dt)) =
            kind.to_internal_value(&json!("2019-04-03 10:10:05.5+02:00"))
        else {
            panic!("expected datetime");
        };
        assert_eq!(dt.offset().local_minus_utc(), 7200);
        assert_eq!(dt.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_default_timezone_applies_to_naive() {
        let settings = ParamSettings::param()
            .default_timezone_str("-05:00")
            .build()
            .unwrap();
        let kind = DateTimeKind::new(&settings);
        let Ok(Value::DateTime(dt)) = kind.to_internal_value(&json!("2020-01-01T00:00:00")) else {
            panic!("expected datetime");
        };
        assert_eq!(dt.offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_datetime_wrong_format() {
        let kind = DateTimeKind::new(&settings());
        assert_eq!(
            kind.to_internal_value(&json!("yesterday")),
            Err(ErrorDetail::message(
                "Datetime has wrong format. Use one of these formats instead: YYYY-MM-DDThh:mm[:ss[.uuuuuu]][+HH:MM|-HH:MM|Z]."
            ))
        );
    }

    #[test]
    fn test_custom_date_format() {
        let settings = ParamSettings::param()
            .input_format("%d/%m/%Y")
            .build()
            .unwrap();
        let kind = DateKind::new(&settings);
        let Ok(Value::Date(date)) = kind.to_internal_value(&json!("25/12/2020")) else {
            panic!("expected date");
        };
        assert_eq!((date.year(), date.month(), date.day()), (2020, 12, 25));
        assert_eq!(
            kind.to_internal_value(&json!("2020-12-25")),
            Err(ErrorDetail::message(
                "Date has wrong format. Use one of these formats instead: DD/MM/YYYY."
            ))
        );
    }

    #[test]
    fn test_iso_date_and_time() {
        let date = DateKind::new(&settings());
        assert!(date.to_internal_value(&json!("2020-2-3")).is_ok());
        assert_eq!(
            date.to_internal_value(&json!(20200203)),
            Err(ErrorDetail::message(
                "Date has wrong format. Use one of these formats instead: YYYY-MM-DD."
            ))
        );

        let time = TimeKind::new(&settings());
        assert_eq!(
            time.to_internal_value(&json!("09:30")),
            Ok(Value::Time(NaiveTime::from_hms_opt(9, 30, 0).unwrap()))
        );
        assert!(time.to_internal_value(&json!("25:00")).is_err());
    }

    #[test]
    fn test_duration_standard() {
        assert_eq!(parse_duration("30"), Some(TimeDelta::seconds(30)));
        assert_eq!(parse_duration("15:30"), Some(TimeDelta::seconds(15 * 60 + 30)));
        assert_eq!(
            parse_duration("10:15:30"),
            Some(TimeDelta::seconds(10 * 3600 + 15 * 60 + 30))
        );
        assert_eq!(
            parse_duration("3 10:15:30.5"),
            Some(
                TimeDelta::days(3)
                    + TimeDelta::seconds(10 * 3600 + 15 * 60 + 30)
                    + TimeDelta::milliseconds(500)
            )
        );
        assert_eq!(parse_duration("-1 00:00:00"), Some(TimeDelta::days(-1)));
    }

    #[test]
    fn test_duration_iso() {
        assert_eq!(
            parse_duration("P3DT4H"),
            Some(TimeDelta::days(3) + TimeDelta::hours(4))
        );
        assert_eq!(parse_duration("PT0.5S"), Some(TimeDelta::milliseconds(500)));
        assert_eq!(parse_duration("P"), None);
    }

    #[test]
    fn test_duration_invalid() {
        assert_eq!(
            DurationKind.to_internal_value(&json!("soon")),
            Err(ErrorDetail::message(
                "Duration has wrong format. Use one of these formats instead: [DD] [HH:[MM:]]ss[.uuuuuu]."
            ))
        );
    }
}
