//! Business-day and timezone handling
//!
//! A station's business day is a calendar date in the station's local
//! timezone (Asia/Kolkata for the domestic fleet). All closure decisions --
//! "is this date in the future", "which UTC instants bound this day" -- go
//! through these helpers so that a day never closes early or late because a
//! server happens to run in UTC.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Timezone wrapper for station localities
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Tz::from_str(&s)
            .map(Timezone)
            .map_err(|_| serde::de::Error::custom(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Indian Standard Time, the default station locality
    pub fn ist() -> Self {
        Self(chrono_tz::Asia::Kolkata)
    }

    /// Converts a UTC datetime to the local timezone
    pub fn to_local(&self, utc: DateTime<Utc>) -> DateTime<Tz> {
        utc.with_timezone(&self.0)
    }

    /// The local calendar date of a UTC instant
    pub fn local_date(&self, utc: DateTime<Utc>) -> NaiveDate {
        utc.with_timezone(&self.0).date_naive()
    }

    /// Gets the start of day (00:00:00) in this timezone as UTC
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        date.and_hms_opt(0, 0, 0)
            .unwrap()
            .and_local_timezone(self.0)
            .single()
            .expect("Invalid timezone conversion")
            .with_timezone(&Utc)
    }

    /// Gets the end of day (23:59:59.999999999) in this timezone as UTC
    pub fn end_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        date.and_hms_nano_opt(23, 59, 59, 999_999_999)
            .unwrap()
            .and_local_timezone(self.0)
            .single()
            .expect("Invalid timezone conversion")
            .with_timezone(&Utc)
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self::ist()
    }
}

/// A station business day: one calendar date in one locality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDay {
    pub date: NaiveDate,
    pub timezone: Timezone,
}

impl BusinessDay {
    pub fn new(date: NaiveDate, timezone: Timezone) -> Self {
        Self { date, timezone }
    }

    /// A business day in Indian Standard Time
    pub fn ist(date: NaiveDate) -> Self {
        Self::new(date, Timezone::ist())
    }

    /// True if this day has not yet begun anywhere in its locality
    pub fn is_future(&self, now: DateTime<Utc>) -> bool {
        self.date > self.timezone.local_date(now)
    }

    /// UTC bounds of this day, [start, end]
    pub fn utc_bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            self.timezone.start_of_day(self.date),
            self.timezone.end_of_day(self.date),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ist_day_bounds() {
        let day = BusinessDay::ist(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        let (start, end) = day.utc_bounds();

        // IST is UTC+5:30, so the local midnight is 18:30 UTC the day before
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 14, 18, 30, 0).unwrap());
        assert!(end > start);
    }

    #[test]
    fn test_future_day_detection() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();

        let today = BusinessDay::ist(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert!(!today.is_future(now));

        let tomorrow = BusinessDay::ist(NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
        assert!(tomorrow.is_future(now));
    }

    #[test]
    fn test_local_date_rolls_over_before_utc() {
        // 19:00 UTC on the 14th is already the 15th in IST
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 19, 0, 0).unwrap();
        assert_eq!(
            Timezone::ist().local_date(now),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }

    #[test]
    fn test_timezone_serde_roundtrip() {
        let tz = Timezone::ist();
        let json = serde_json::to_string(&tz).unwrap();
        assert_eq!(json, "\"Asia/Kolkata\"");
        let back: Timezone = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tz);
    }
}
