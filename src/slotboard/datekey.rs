//! # Date Keys
//!
//! The schedule is keyed by calendar day. A [`DateKey`] is a local-calendar date that
//! always renders as `YYYY-MM-DD`, and only parses back from that exact form, so two
//! spellings of the same day can never become two schedule entries.
//!
//! "Today" is taken from the local clock, not UTC: a card dropped late in the evening
//! belongs to the day the user is looking at.

use crate::error::{BoardError, Result};
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const KEY_FORMAT: &str = "%Y-%m-%d";
const MONTH_FORMAT: &str = "%Y-%m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Moves the key by `days` (negative goes back). `None` only at the ends of the
    /// representable calendar.
    pub fn shift(&self, days: i64) -> Option<Self> {
        self.0.checked_add_signed(Duration::days(days)).map(Self)
    }

    /// `count` consecutive days starting at (and including) this one.
    pub fn days(self, count: usize) -> impl Iterator<Item = DateKey> {
        self.0.iter_days().take(count).map(Self)
    }

    pub fn month_start(&self) -> Self {
        Self(self.0.with_day(1).unwrap_or(self.0))
    }

    /// Short weekday name, e.g. `Mon`.
    pub fn weekday_name(&self) -> String {
        self.0.format("%a").to_string()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let date = NaiveDate::parse_from_str(trimmed, KEY_FORMAT)
            .map_err(|_| BoardError::InvalidDate(s.to_string()))?;
        let key = Self(date);
        // chrono accepts unpadded fields; only the canonical spelling is a key
        if key.to_string() != trimmed {
            return Err(BoardError::InvalidDate(s.to_string()));
        }
        Ok(key)
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Number of days in `month` of `year`, or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// Parses a `YYYY-MM` month reference.
pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let trimmed = s.trim();
    let date = NaiveDate::parse_from_str(&format!("{}-01", trimmed), KEY_FORMAT)
        .map_err(|_| BoardError::InvalidDate(s.to_string()))?;
    if date.format(MONTH_FORMAT).to_string() != trimmed {
        return Err(BoardError::InvalidDate(s.to_string()));
    }
    Ok((date.year(), date.month()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_zero_padding() {
        let key = DateKey::from_ymd(2024, 6, 3).unwrap();
        assert_eq!(key.to_string(), "2024-06-03");
    }

    #[test]
    fn parses_canonical_keys_only() {
        assert_eq!(
            "2024-06-03".parse::<DateKey>().unwrap(),
            DateKey::from_ymd(2024, 6, 3).unwrap()
        );
        assert!("2024-6-3".parse::<DateKey>().is_err());
        assert!("2024-02-30".parse::<DateKey>().is_err());
        assert!("not a date".parse::<DateKey>().is_err());
    }

    #[test]
    fn days_iterates_consecutively_across_month_end() {
        let start = DateKey::from_ymd(2024, 1, 30).unwrap();
        let keys: Vec<String> = start.days(4).map(|k| k.to_string()).collect();
        assert_eq!(
            keys,
            vec!["2024-01-30", "2024-01-31", "2024-02-01", "2024-02-02"]
        );
    }

    #[test]
    fn shift_moves_backwards() {
        let key = DateKey::from_ymd(2024, 3, 1).unwrap();
        assert_eq!(key.shift(-1).unwrap().to_string(), "2024-02-29");
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 13), None);
    }

    #[test]
    fn parse_month_reference() {
        assert_eq!(parse_month("2024-06").unwrap(), (2024, 6));
        assert!(parse_month("2024-6").is_err());
        assert!(parse_month("2024-13").is_err());
    }

    #[test]
    fn serde_uses_string_form() {
        let key = DateKey::from_ymd(2024, 6, 3).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2024-06-03\"");
        let back: DateKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
