//! Kind-specific conversion from raw property values to display strings.

use crate::error::ConversionError;
use crate::properties::ValueKind;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

/// ISO-8601 duration: `PnYnMnWnDTnHnMnS`, every component optional.
static DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^P(?:(\d+)Y)?(?:(\d+)M)?(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:[.,]\d+)?)S)?)?$",
    )
    .unwrap()
});

const MINUTES_PER_YEAR: u64 = 525_600;
const MINUTES_PER_MONTH: u64 = 43_200;
const MINUTES_PER_WEEK: u64 = 10_080;
const MINUTES_PER_DAY: u64 = 1_440;

/// Display format for dates, rendered in UTC.
const DATE_DISPLAY_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT+0000";

/// A parsed ISO-8601 duration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Iso8601Duration {
    pub years: u64,
    pub months: u64,
    pub weeks: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: f64,
}

impl Iso8601Duration {
    /// Whole minutes, with months of 30 days and years of 365 days.
    ///
    /// Returns `None` when the total does not fit in a `u64`.
    pub fn total_minutes(&self) -> Option<u64> {
        [
            self.years.checked_mul(MINUTES_PER_YEAR)?,
            self.months.checked_mul(MINUTES_PER_MONTH)?,
            self.weeks.checked_mul(MINUTES_PER_WEEK)?,
            self.days.checked_mul(MINUTES_PER_DAY)?,
            self.hours.checked_mul(60)?,
            self.minutes,
            (self.seconds / 60.0).floor() as u64,
        ]
        .into_iter()
        .try_fold(0u64, u64::checked_add)
    }
}

impl FromStr for Iso8601Duration {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ConversionError::MalformedDuration {
            value: s.to_string(),
        };

        let caps = DURATION_REGEX.captures(s.trim()).ok_or_else(malformed)?;
        let int = |idx: usize| -> Result<u64, ConversionError> {
            caps.get(idx)
                .map(|m| m.as_str().parse::<u64>().map_err(|_| malformed()))
                .unwrap_or(Ok(0))
        };

        let seconds = match caps.get(7) {
            Some(m) => m
                .as_str()
                .replace(',', ".")
                .parse::<f64>()
                .map_err(|_| malformed())?,
            None => 0.0,
        };

        Ok(Self {
            years: int(1)?,
            months: int(2)?,
            weeks: int(3)?,
            days: int(4)?,
            hours: int(5)?,
            minutes: int(6)?,
            seconds,
        })
    }
}

/// Render a minute count as `1 minute` / `N minutes`.
pub fn pluralize_minutes(minutes: u64) -> String {
    if minutes == 1 {
        "1 minute".to_string()
    } else {
        format!("{} minutes", minutes)
    }
}

impl ValueKind {
    /// Convert a raw value to its display form.
    pub fn convert(&self, raw: &str) -> Result<String, ConversionError> {
        match self {
            Self::String | Self::Integer | Self::Float => Ok(raw.to_string()),
            Self::Date => convert_date(raw),
            Self::DocSecurityEnum => convert_doc_security(raw),
            Self::Boolean => match raw {
                "false" => Ok("No".to_string()),
                "true" => Ok("Yes".to_string()),
                _ => Err(ConversionError::UnrecognizedEnumValue {
                    kind: *self,
                    value: raw.to_string(),
                }),
            },
            Self::Iso8601Duration => {
                let duration: Iso8601Duration = raw.parse()?;
                duration
                    .total_minutes()
                    .map(pluralize_minutes)
                    .ok_or_else(|| ConversionError::MalformedDuration {
                        value: raw.to_string(),
                    })
            }
            Self::IntMinutes => raw
                .trim()
                .parse::<u64>()
                .map(pluralize_minutes)
                .map_err(|_| ConversionError::MalformedDuration {
                    value: raw.to_string(),
                }),
        }
    }

    /// Convert a raw value, degrading to the documented fallback on failure.
    pub fn display_value(&self, raw: &str) -> String {
        match self.convert(raw) {
            Ok(display) => display,
            Err(e) => {
                log::debug!("{}", e);
                e.fallback_display().to_string()
            }
        }
    }
}

fn convert_doc_security(raw: &str) -> Result<String, ConversionError> {
    let message = match raw.trim().parse::<i64>() {
        Ok(0) => "None",
        Ok(1) => "Document is password protected.",
        Ok(2) => "Document is recommended to be opened as read-only.",
        Ok(4) => "Document is enforced to be opened as read-only.",
        Ok(8) => "Document is locked for annotation.",
        _ => {
            return Err(ConversionError::UnrecognizedEnumValue {
                kind: ValueKind::DocSecurityEnum,
                value: raw.to_string(),
            })
        }
    };
    Ok(message.to_string())
}

fn convert_date(raw: &str) -> Result<String, ConversionError> {
    parse_timestamp(raw.trim())
        .map(|dt| dt.format(DATE_DISPLAY_FORMAT).to_string())
        .ok_or_else(|| ConversionError::InvalidDate {
            value: raw.to_string(),
        })
}

/// Parse the timestamp shapes found in metadata parts.
///
/// Zone-less timestamps are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
