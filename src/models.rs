use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ParseError, Result, TrainLogError};

/// Lowest and highest value accepted for subjective 1-10 ratings
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// Kind of logged day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Workout,
    Easy,
    Rest,
}

impl EntryType {
    pub fn is_run(&self) -> bool {
        !matches!(self, EntryType::Rest)
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryType::Workout => write!(f, "workout"),
            EntryType::Easy => write!(f, "easy"),
            EntryType::Rest => write!(f, "rest"),
        }
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "workout" => Ok(EntryType::Workout),
            "easy" => Ok(EntryType::Easy),
            "rest" => Ok(EntryType::Rest),
            _ => Err(format!("Invalid entry type: {} (expected workout, easy or rest)", s)),
        }
    }
}

/// Running pace in seconds per mile, written as `M:SS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pace {
    seconds_per_mile: u32,
}

impl Pace {
    pub fn from_seconds(seconds_per_mile: u32) -> Self {
        Pace { seconds_per_mile }
    }

    /// Mean of a set of paces, averaged in seconds and floored to whole seconds.
    ///
    /// Returns `None` for an empty set.
    pub fn average<'a, I>(paces: I) -> Option<Pace>
    where
        I: IntoIterator<Item = &'a Pace>,
    {
        let (total, count) = paces
            .into_iter()
            .fold((0u64, 0u64), |(total, count), pace| {
                (total + u64::from(pace.seconds_per_mile), count + 1)
            });

        if count == 0 {
            return None;
        }

        Some(Pace::from_seconds((total / count) as u32))
    }

    /// Pace for a run of `miles` completed in `duration_seconds`.
    ///
    /// Returns `None` when the distance is not positive.
    pub fn from_run(miles: Decimal, duration_seconds: u32) -> Option<Pace> {
        if miles <= Decimal::ZERO {
            return None;
        }

        let per_mile = (Decimal::from(duration_seconds) / miles).floor();
        per_mile.to_u32().map(Pace::from_seconds)
    }

    /// Pace for a run of `miles` finished in `finish_time` (`H:MM:SS`)
    pub fn for_run(miles: Decimal, finish_time: &str) -> std::result::Result<Pace, ParseError> {
        let seconds = parse_duration(finish_time)?;
        if miles <= Decimal::ZERO {
            return Err(ParseError::InvalidRun {
                reason: "distance must be greater than zero".to_string(),
            });
        }

        Pace::from_run(miles, seconds).ok_or_else(|| ParseError::InvalidRun {
            reason: format!("{} over {} miles does not fit a per-mile pace", finish_time, miles),
        })
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.seconds_per_mile / 60, self.seconds_per_mile % 60)
    }
}

impl FromStr for Pace {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = |reason: &str| ParseError::InvalidPace {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() != 2 {
            return Err(invalid("expected minutes:seconds (M:SS)"));
        }

        let minutes = parse_component(parts[0]).ok_or_else(|| invalid("minutes must be a number"))?;
        let seconds = parse_component(parts[1]).ok_or_else(|| invalid("seconds must be a number"))?;
        if seconds >= 60 {
            return Err(invalid("seconds must be below 60"));
        }

        let total = minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .ok_or_else(|| invalid("pace out of range"))?;

        Ok(Pace::from_seconds(total))
    }
}

impl TryFrom<String> for Pace {
    type Error = ParseError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Pace> for String {
    fn from(pace: Pace) -> Self {
        pace.to_string()
    }
}

fn parse_component(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Parse a strict `YYYY-MM-DD` calendar date
pub fn parse_date(input: &str) -> std::result::Result<NaiveDate, ParseError> {
    let invalid = || ParseError::InvalidDate {
        input: input.to_string(),
    };

    // Fixed width keeps lexicographic and calendar order identical
    if input.len() != 10 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| invalid())
}

/// Parse an `H:MM:SS` finish time into total seconds
pub fn parse_duration(input: &str) -> std::result::Result<u32, ParseError> {
    let invalid = || ParseError::InvalidDuration {
        input: input.to_string(),
    };

    let parts: Vec<&str> = input.trim().split(':').collect();
    if parts.len() != 3 {
        return Err(invalid());
    }

    let hours = parse_component(parts[0]).ok_or_else(invalid)?;
    let minutes = parse_component(parts[1]).ok_or_else(invalid)?;
    let seconds = parse_component(parts[2]).ok_or_else(invalid)?;
    if minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }

    hours
        .checked_mul(3600)
        .and_then(|h| h.checked_add(minutes * 60 + seconds))
        .ok_or_else(invalid)
}

/// Binary lifestyle factors recorded per entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Factor {
    Alcohol,
    Nicotine,
    Travel,
    Stretch,
    Music,
}

impl Factor {
    pub const ALL: [Factor; 5] = [
        Factor::Alcohol,
        Factor::Nicotine,
        Factor::Travel,
        Factor::Stretch,
        Factor::Music,
    ];

    /// Storage key of the factor
    pub fn key(&self) -> &'static str {
        match self {
            Factor::Alcohol => "alcohol",
            Factor::Nicotine => "nicotine",
            Factor::Travel => "travel",
            Factor::Stretch => "stretch",
            Factor::Music => "music",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Factor::Alcohol => "Alcohol",
            Factor::Nicotine => "Nicotine",
            Factor::Travel => "Travel",
            Factor::Stretch => "Stretching",
            Factor::Music => "Music",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Numeric performance/physiology metrics that factors are compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Rpe,
    Rhr,
    Hrv,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Rpe, Metric::Rhr, Metric::Hrv];

    pub fn key(&self) -> &'static str {
        match self {
            Metric::Rpe => "rpe",
            Metric::Rhr => "rhr",
            Metric::Hrv => "hrv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Rpe => "RPE",
            Metric::Rhr => "RHR",
            Metric::Hrv => "HRV",
        }
    }

    /// Whether a larger value of this metric means a worse state.
    ///
    /// Effort and resting heart rate go up under strain, HRV goes down.
    pub fn higher_is_worse(&self) -> bool {
        match self {
            Metric::Rpe | Metric::Rhr => true,
            Metric::Hrv => false,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One logged day of training and lifestyle data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Calendar day the entry describes; the only grouping and sort key
    #[serde(with = "date_format")]
    pub date: NaiveDate,

    /// Free-form time of day label (morning, evening, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,

    /// Workout, easy run or rest day
    #[serde(rename = "type")]
    pub entry_type: EntryType,

    /// Distance in miles, zero for rest days
    #[serde(default, with = "rust_decimal::serde::float")]
    pub miles: Decimal,

    /// Average pace of the run
    #[serde(default)]
    pub pace: Option<Pace>,

    /// Average heart rate during the run
    #[serde(default)]
    pub hr: Option<u16>,

    /// Device-measured resting heart rate (bpm)
    #[serde(default)]
    pub rhr: Option<u16>,

    /// Device-measured heart rate variability (ms)
    #[serde(default)]
    pub hrv: Option<u16>,

    /// Rate of perceived exertion, 1-10
    #[serde(default)]
    pub rpe: Option<u8>,

    /// Subjective sleep quality, 1-10
    #[serde(default)]
    pub sleep_quality: Option<u8>,

    /// Subjective stress, 1-10
    #[serde(default)]
    pub stress: Option<u8>,

    /// Cups of caffeine; unset counts as none
    #[serde(default)]
    pub caffeine: Option<u16>,

    // Lifestyle factors: `None` is "unknown", distinct from an explicit `false`
    #[serde(default)]
    pub alcohol: Option<bool>,
    #[serde(default)]
    pub nicotine: Option<bool>,
    #[serde(default)]
    pub travel: Option<bool>,
    #[serde(default)]
    pub stretch: Option<bool>,
    #[serde(default)]
    pub music: Option<bool>,

    /// When the entry was recorded; display only
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Entry {
    /// Create an entry with every optional field unset
    pub fn new(date: NaiveDate, entry_type: EntryType) -> Self {
        Entry {
            date,
            time_of_day: None,
            entry_type,
            miles: Decimal::ZERO,
            pace: None,
            hr: None,
            rhr: None,
            hrv: None,
            rpe: None,
            sleep_quality: None,
            stress: None,
            caffeine: None,
            alcohol: None,
            nicotine: None,
            travel: None,
            stretch: None,
            music: None,
            created_at: None,
        }
    }

    pub fn is_rest(&self) -> bool {
        self.entry_type == EntryType::Rest
    }

    /// Value of a lifestyle factor, `None` when not recorded
    pub fn factor(&self, factor: Factor) -> Option<bool> {
        match factor {
            Factor::Alcohol => self.alcohol,
            Factor::Nicotine => self.nicotine,
            Factor::Travel => self.travel,
            Factor::Stretch => self.stretch,
            Factor::Music => self.music,
        }
    }

    /// Value of a compared metric, `None` when not recorded
    pub fn metric(&self, metric: Metric) -> Option<Decimal> {
        match metric {
            Metric::Rpe => self.rpe.map(Decimal::from),
            Metric::Rhr => self.rhr.map(Decimal::from),
            Metric::Hrv => self.hrv.map(Decimal::from),
        }
    }

    /// Apply the rest-day rule: no distance, pace or run heart rate
    pub fn normalize(mut self) -> Self {
        if self.is_rest() {
            self.miles = Decimal::ZERO;
            self.pace = None;
            self.hr = None;
        }
        self
    }

    /// Check the data model invariants
    pub fn validate(&self) -> Result<()> {
        if self.miles < Decimal::ZERO {
            return Err(TrainLogError::Validation(format!(
                "miles must be non-negative, got {}",
                self.miles
            )));
        }

        if self.is_rest() && (self.miles != Decimal::ZERO || self.pace.is_some() || self.hr.is_some()) {
            return Err(TrainLogError::Validation(
                "rest days cannot have miles, pace or heart rate".to_string(),
            ));
        }

        if self.hr == Some(0) {
            return Err(TrainLogError::Validation(
                "heart rate must be positive".to_string(),
            ));
        }

        for (name, value) in [
            ("rpe", self.rpe),
            ("sleep_quality", self.sleep_quality),
            ("stress", self.stress),
        ] {
            if let Some(v) = value {
                if !RATING_RANGE.contains(&v) {
                    return Err(TrainLogError::Validation(format!(
                        "{} must be between 1 and 10, got {}",
                        name, v
                    )));
                }
            }
        }

        Ok(())
    }
}

// Strict YYYY-MM-DD (de)serialization for entry dates
mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(serde::de::Error::custom)
    }
}
