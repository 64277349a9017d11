//! Wall-clock timestamp recorded on a ticket when a vehicle enters.
//!
//! Stored as milliseconds since the Unix epoch (UTC). The text form is the
//! `YYYY-MM-DDTHH:MM:SS.sssZ` shape produced by JavaScript's
//! `Date.toISOString()`, so occupancy blobs written by the browser version of
//! the tracker decode unchanged. Years past 9999 use the expanded form
//! `+YYYYYY-MM-DDTHH:MM:SS.sssZ`, as `toISOString()` does, so every `u64`
//! instant formats to text that parses back to the same instant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: u64 = 24 * MILLIS_PER_HOUR;

/// Last year written with four digits and no sign.
const LAST_PLAIN_YEAR: u64 = 9999;

/// Milliseconds since 1970-01-01T00:00:00Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EntryTime(u64);

impl EntryTime {
    pub const fn from_unix_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub const fn unix_millis(self) -> u64 {
        self.0
    }

    /// Current wall-clock time. Clocks set before the epoch read as zero.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn now() -> Self {
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self(millis)
    }

    /// Current wall-clock time from the browser.
    #[cfg(target_arch = "wasm32")]
    pub fn now() -> Self {
        Self(js_sys::Date::now().max(0.0) as u64)
    }
}

impl fmt::Display for EntryTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day) = days_to_ymd(self.0 / MILLIS_PER_DAY);
        let time_of_day = self.0 % MILLIS_PER_DAY;
        if year > LAST_PLAIN_YEAR {
            write!(f, "+{year:06}")?;
        } else {
            write!(f, "{year:04}")?;
        }
        write!(
            f,
            "-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
            month,
            day,
            time_of_day / MILLIS_PER_HOUR,
            (time_of_day % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE,
            (time_of_day % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND,
            time_of_day % MILLIS_PER_SECOND,
        )
    }
}

impl FromStr for EntryTime {
    type Err = String;

    /// Parse `YYYY-MM-DDTHH:MM:SS[.fraction]Z`, or `+YYYYYY-…` for years past
    /// 9999. Fractions longer than milliseconds are truncated.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid ISO-8601 timestamp: {s:?}");

        let body = s.strip_suffix('Z').ok_or_else(invalid)?;
        let (date, time) = body.split_once('T').ok_or_else(invalid)?;

        let (year, date) = match date.strip_prefix('+') {
            Some(expanded) => {
                let (year, rest) = expanded.split_once('-').ok_or_else(invalid)?;
                (parse_expanded_year(year).ok_or_else(invalid)?, rest)
            }
            None => {
                let (year, rest) = date.split_once('-').ok_or_else(invalid)?;
                (parse_digits(Some(year), 4).ok_or_else(invalid)?, rest)
            }
        };
        let mut date_parts = date.split('-');
        let month = parse_digits(date_parts.next(), 2).ok_or_else(invalid)?;
        let day = parse_digits(date_parts.next(), 2).ok_or_else(invalid)?;
        if date_parts.next().is_some() {
            return Err(invalid());
        }

        let (clock, fraction) = match time.split_once('.') {
            Some((clock, fraction)) => (clock, Some(fraction)),
            None => (time, None),
        };
        let mut clock_parts = clock.split(':');
        let hour = parse_digits(clock_parts.next(), 2).ok_or_else(invalid)?;
        let minute = parse_digits(clock_parts.next(), 2).ok_or_else(invalid)?;
        let second = parse_digits(clock_parts.next(), 2).ok_or_else(invalid)?;
        if clock_parts.next().is_some() {
            return Err(invalid());
        }

        let millis = match fraction {
            None => 0,
            Some(fraction) => parse_fraction_millis(fraction).ok_or_else(invalid)?,
        };

        if year < 1970
            || !(1..=12).contains(&month)
            || day == 0
            || day > days_in_month(year, month)
            || hour > 23
            || minute > 59
            || second > 59
        {
            return Err(invalid());
        }

        let time_of_day =
            hour * MILLIS_PER_HOUR + minute * MILLIS_PER_MINUTE + second * MILLIS_PER_SECOND + millis;
        days_from_ymd(year, month, day)
            .checked_mul(MILLIS_PER_DAY)
            .and_then(|m| m.checked_add(time_of_day))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl Serialize for EntryTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntryTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Exactly `width` ASCII digits.
fn parse_digits(part: Option<&str>, width: usize) -> Option<u64> {
    let part = part?;
    if part.len() != width || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Six to nine digits. Nine covers every year a `u64` of milliseconds
/// reaches.
fn parse_expanded_year(part: &str) -> Option<u64> {
    if !(6..=9).contains(&part.len()) || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn parse_fraction_millis(fraction: &str) -> Option<u64> {
    if fraction.is_empty() || fraction.len() > 9 || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let padded: String = fraction.chars().chain("00".chars()).take(3).collect();
    padded.parse().ok()
}

fn is_leap_year(year: u64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u64, month: u64) -> u64 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Convert days since Unix epoch to (year, month, day).
fn days_to_ymd(days: u64) -> (u64, u64, u64) {
    // Howard Hinnant's civil_from_days, restricted to dates after the epoch.
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}

/// Inverse of `days_to_ymd`. Callers guarantee `year >= 1970`.
fn days_from_ymd(year: u64, month: u64, day: u64) -> u64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y / 400;
    let yoe = y - era * 400;
    let mp = if month > 2 { month - 3 } else { month + 9 };
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}
