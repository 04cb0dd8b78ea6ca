// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Offset-free timestamps used by manifests and time-dependent tables.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use time::macros::format_description;
use time::{Date, Duration, Month, PrimitiveDateTime};

use crate::error::SchemaError;

/// Wall-clock timestamp without UTC offset.
///
/// Rendered as `YYYY-MM-DD HH:MM:SS`. Parsing also accepts a `T` separator
/// and bare dates (midnight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(PrimitiveDateTime);

impl Timestamp {
    /// Wraps a `time` datetime, truncated to whole seconds.
    pub fn new(inner: PrimitiveDateTime) -> Self {
        Self(inner - Duration::nanoseconds(i64::from(inner.nanosecond())))
    }

    /// Midnight of the given calendar date.
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Result<Self, SchemaError> {
        let invalid = || SchemaError::InvalidTimestamp(format!("{year:04}-{month:02}-{day:02}"));
        let month = Month::try_from(month).map_err(|_| invalid())?;
        let date = Date::from_calendar_date(year, month, day).map_err(|_| invalid())?;
        Ok(Self(date.midnight()))
    }

    /// Returns the inner `time` datetime.
    pub fn into_inner(self) -> PrimitiveDateTime {
        self.0
    }
}

impl FromStr for Timestamp {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let spaced = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
        let iso = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
        let date_only = format_description!("[year]-[month]-[day]");

        if let Ok(dt) = PrimitiveDateTime::parse(s, spaced) {
            return Ok(Self(dt));
        }
        if let Ok(dt) = PrimitiveDateTime::parse(s, iso) {
            return Ok(Self(dt));
        }
        Date::parse(s, date_only)
            .map(|d| Self(d.midnight()))
            .map_err(|_| SchemaError::InvalidTimestamp(s.to_owned()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spaced = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
        let text = self.0.format(spaced).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn accepts_all_three_layouts() {
        let a: Timestamp = "2020-01-01 00:00:00".parse().unwrap();
        let b: Timestamp = "2020-01-01T00:00:00".parse().unwrap();
        let c: Timestamp = "2020-01-01".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(c, Timestamp::from_ymd(2020, 1, 1).unwrap());
    }

    #[test]
    fn display_is_space_separated() {
        let t: Timestamp = "2021-03-04T05:06:07".parse().unwrap();
        assert_eq!(t.to_string(), "2021-03-04 05:06:07");
    }

    #[test]
    fn sub_second_precision_is_dropped() {
        let precise = time::macros::datetime!(2021-03-04 05:06:07.891);
        let t = Timestamp::new(precise);
        assert_eq!(t, "2021-03-04 05:06:07".parse().unwrap());
        assert_eq!(t.to_string().parse::<Timestamp>().unwrap(), t);
    }

    #[test]
    fn rejects_garbage_and_bad_dates() {
        assert!("yesterday".parse::<Timestamp>().is_err());
        assert!(Timestamp::from_ymd(2020, 13, 1).is_err());
        assert!(Timestamp::from_ymd(2021, 2, 29).is_err());
    }
}
