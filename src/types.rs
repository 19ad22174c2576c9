//! Shared types used across the store, scheduler, and export writer.
//!
//! Dates travel through the whole tool in the frame's `dd.mm.yyyy` notation:
//! it is what the user types, what `backup.json` stores, and what appears in
//! every exported file name. [`FrameDate`] keeps that notation at the edges
//! while comparing and stepping as a real calendar date internally.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The one date notation the frame understands.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid date '{0}': expected dd.mm.yyyy")]
pub struct DateParseError(pub String);

/// A calendar day, formatted as `dd.mm.yyyy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameDate(NaiveDate);

impl FrameDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build from day, month, year. `None` for impossible dates.
    pub fn from_dmy(day: u32, month: u32, year: i32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn as_naive(self) -> NaiveDate {
        self.0
    }

    /// The following calendar day. Saturates at the end of chrono's range.
    pub fn next_day(self) -> Self {
        Self(self.0.checked_add_days(Days::new(1)).unwrap_or(self.0))
    }
}

impl fmt::Display for FrameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for FrameDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map(Self)
            .map_err(|_| DateParseError(s.to_string()))
    }
}

impl Serialize for FrameDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FrameDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
