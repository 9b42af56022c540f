use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of columns in a row of the event log.
pub const EVENT_COLUMNS: usize = 6;

/// Canonical identifier for a mailbox or individual.
///
/// Only constructed through [`crate::normalize::normalize`] (or
/// [`Person::parse`]), so two values compare equal exactly when their raw
/// spellings normalize to the same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Person(String);

impl Person {
    /// Normalize `raw` into a person key.
    pub fn parse(raw: &str) -> Self {
        crate::normalize::normalize(raw)
    }

    pub(crate) fn from_key(key: String) -> Self {
        Self(key)
    }

    /// The normalized key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Person {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single row of the email event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Milliseconds since the Unix epoch.
    pub time: i64,
    /// Message identifier as found in the log.
    pub message_id: String,
    /// Normalized sender.
    pub sender: Person,
    /// Raw `|`-joined recipient list, not yet split or normalized.
    pub recipients: String,
    /// Always empty in the source data.
    #[serde(default)]
    pub topic: String,
    /// Always `"email"` in the source data.
    #[serde(default)]
    pub mode: String,
    /// 1-based line in the source file.
    #[serde(default)]
    pub line: u64,
}

/// Sent and received totals for one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonCounts {
    pub person: Person,
    pub sent: u64,
    pub received: u64,
}

/// What the loader does with a row it cannot interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRowPolicy {
    /// Abort the load with an error.
    #[default]
    Fail,
    /// Log a warning, drop the row and keep going.
    Skip,
}

impl std::str::FromStr for MalformedRowPolicy {
    type Err = crate::error::MailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "skip" => Ok(Self::Skip),
            other => Err(crate::error::MailError::Config(format!(
                "unknown malformed-row policy: {}",
                other
            ))),
        }
    }
}

/// One person's cumulative values aligned with a [`TimeSeriesSet`] axis.
///
/// `None` marks axis points before the person's first event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonSeries {
    pub person: Person,
    pub values: Vec<Option<u64>>,
}

impl PersonSeries {
    /// The last value of the series, i.e. the final cumulative total.
    pub fn last_value(&self) -> Option<u64> {
        self.values.iter().rev().find_map(|v| *v)
    }

    /// `(time, value)` pairs for axis points where the series is defined.
    pub fn defined_points<'a>(&'a self, axis: &'a [i64]) -> impl Iterator<Item = (i64, u64)> + 'a {
        axis.iter()
            .zip(self.values.iter())
            .filter_map(|(t, v)| v.map(|v| (*t, v)))
    }
}

/// Several per-person cumulative series sharing one ascending time axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeSeriesSet {
    /// Distinct timestamps in ascending order.
    pub axis: Vec<i64>,
    pub series: Vec<PersonSeries>,
}

impl TimeSeriesSet {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Look up the series for `person`.
    pub fn get(&self, person: &Person) -> Option<&PersonSeries> {
        self.series.iter().find(|s| &s.person == person)
    }

    /// Value of `person`'s series at exactly `time`, if `time` is on the axis.
    pub fn value_at(&self, person: &Person, time: i64) -> Option<u64> {
        let idx = self.axis.binary_search(&time).ok()?;
        self.get(person)?.values.get(idx).copied().flatten()
    }

    /// Largest defined value across all series (0 when empty).
    pub fn max_value(&self) -> u64 {
        self.series
            .iter()
            .filter_map(PersonSeries::last_value)
            .max()
            .unwrap_or(0)
    }

    /// First and last timestamps of the axis.
    pub fn time_range(&self) -> Option<(i64, i64)> {
        Some((*self.axis.first()?, *self.axis.last()?))
    }
}
