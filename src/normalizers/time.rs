//! Generalized Time and UTC Time
//!
//! Time values are canonicalized to the fixed-width UTC form
//! `yyyyMMddHHmmss.fff`, so byte order equals chronological order.

use crate::bytes::ByteString;
use crate::error::{DecodeError, Error, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use std::fmt;

/// Length of the canonical form `yyyyMMddHHmmss.fff`
pub const NORMALIZED_TIME_LENGTH: usize = 18;

const NORMALIZED_FORMAT: &str = "%Y%m%d%H%M%S%.3f";

/// A point in time with millisecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeneralizedTime {
    instant: DateTime<Utc>,
}

fn time_error(value: &[u8], reason: impl Into<String>) -> Error {
    Error::Decode(
        DecodeError::new("invalid generalized time")
            .with_value(value)
            .with_reason(reason),
    )
}

// Reads fixed-width decimal fields from the front of a string
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn peek_digits(&self, n: usize) -> bool {
        self.remaining() >= n && self.bytes[self.pos..self.pos + n].iter().all(u8::is_ascii_digit)
    }

    fn digits(&mut self, n: usize) -> Option<u32> {
        if !self.peek_digits(n) {
            return None;
        }
        let value = self.bytes[self.pos..self.pos + n]
            .iter()
            .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
        self.pos += n;
        Some(value)
    }
}

fn check_range(value: &[u8], field: &str, n: u32, min: u32, max: u32) -> Result<u32> {
    if n < min || n > max {
        Err(time_error(value, format!("{} {} out of range {}..={}", field, n, min, max)))
    } else {
        Ok(n)
    }
}

// Time zone suffix: Z or +hh[mm] / -hh[mm]; returns the offset in minutes east of UTC
fn parse_time_zone(cursor: &mut Cursor<'_>, value: &[u8], minutes_required: bool) -> Result<i64> {
    match cursor.peek() {
        Some(b'Z') => {
            cursor.pos += 1;
            Ok(0)
        }
        Some(sign @ (b'+' | b'-')) => {
            cursor.pos += 1;
            let hours = cursor
                .digits(2)
                .ok_or_else(|| time_error(value, "invalid time zone offset"))?;
            check_range(value, "offset hour", hours, 0, 23)?;
            let minutes = if minutes_required || cursor.remaining() > 0 {
                let m = cursor
                    .digits(2)
                    .ok_or_else(|| time_error(value, "invalid time zone offset"))?;
                check_range(value, "offset minute", m, 0, 59)?
            } else {
                0
            };
            let offset = i64::from(hours * 60 + minutes);
            Ok(if sign == b'-' { -offset } else { offset })
        }
        _ => Err(time_error(value, "missing time zone")),
    }
}

fn build_instant(
    value: &[u8],
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Result<NaiveDateTime> {
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| time_error(value, format!("invalid date {:04}-{:02}-{:02}", year, month, day)))?;
    // Leap second 60 rolls over into the next minute
    let (second, carry) = if second == 60 { (59, 1) } else { (second, 0) };
    date.and_hms_opt(hour, minute, second)
        .map(|dt| dt + Duration::seconds(carry))
        .ok_or_else(|| time_error(value, "invalid time of day"))
}

// Rounds digits/10^len of `unit_ms` milliseconds to the nearest millisecond
fn fraction_millis(digits: &[u8], unit_ms: u64) -> u64 {
    let digits = &digits[..digits.len().min(18)];
    let numerator = digits.iter().fold(0u128, |acc, b| acc * 10 + u128::from(b - b'0'));
    let denominator = 10u128.pow(digits.len() as u32);
    let scaled = numerator * u128::from(unit_ms);
    ((scaled * 2 + denominator) / (denominator * 2)) as u64
}

impl GeneralizedTime {
    /// Wrap an instant, truncating to milliseconds
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        let millis = instant.timestamp_millis();
        let instant = Utc.timestamp_millis_opt(millis).single().unwrap_or(instant);
        Self { instant }
    }

    /// The current time
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// The instant in UTC
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// Parse `YYYYMMDDHH[MM[SS]][(.|,)fraction](Z|(+|-)hh[mm])`
    pub fn parse(value: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(value);
        let year = cursor
            .digits(4)
            .ok_or_else(|| time_error(value, "expected a four digit year"))?;
        let month = cursor
            .digits(2)
            .ok_or_else(|| time_error(value, "expected a two digit month"))?;
        let day = cursor
            .digits(2)
            .ok_or_else(|| time_error(value, "expected a two digit day"))?;
        let hour = cursor
            .digits(2)
            .ok_or_else(|| time_error(value, "expected a two digit hour"))?;
        check_range(value, "month", month, 1, 12)?;
        check_range(value, "day", day, 1, 31)?;
        check_range(value, "hour", hour, 0, 23)?;

        // The fraction applies to the least significant field present
        let mut minute = 0;
        let mut second = 0;
        let mut unit_ms: u64 = 3_600_000;
        if let Some(m) = cursor.digits(2) {
            minute = check_range(value, "minute", m, 0, 59)?;
            unit_ms = 60_000;
            if let Some(s) = cursor.digits(2) {
                second = check_range(value, "second", s, 0, 60)?;
                unit_ms = 1_000;
            }
        }

        let mut fraction_ms = 0;
        if matches!(cursor.peek(), Some(b'.' | b',')) {
            cursor.pos += 1;
            let start = cursor.pos;
            while matches!(cursor.peek(), Some(b'0'..=b'9')) {
                cursor.pos += 1;
            }
            if cursor.pos == start {
                return Err(time_error(value, "empty fraction"));
            }
            fraction_ms = fraction_millis(&value[start..cursor.pos], unit_ms);
        }

        let offset_minutes = parse_time_zone(&mut cursor, value, false)?;
        if cursor.remaining() > 0 {
            return Err(time_error(value, "unexpected trailing characters"));
        }

        let local = build_instant(value, year as i32, month, day, hour, minute, second)?;
        let utc = local - Duration::minutes(offset_minutes) + Duration::milliseconds(fraction_ms as i64);
        Self::checked(value, utc)
    }

    /// Parse a UTC Time value `YYMMDDhhmm[ss](Z|(+|-)hhmm)`
    pub fn parse_utc_time(value: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(value);
        let mut fields = [0u32; 5];
        for (i, name) in ["year", "month", "day", "hour", "minute"].iter().enumerate() {
            fields[i] = cursor
                .digits(2)
                .ok_or_else(|| time_error(value, format!("expected a two digit {}", name)))?;
        }
        let [yy, month, day, hour, minute] = fields;
        let second = cursor.digits(2).unwrap_or(0);
        check_range(value, "month", month, 1, 12)?;
        check_range(value, "hour", hour, 0, 23)?;
        check_range(value, "minute", minute, 0, 59)?;
        check_range(value, "second", second, 0, 60)?;

        let offset_minutes = parse_time_zone(&mut cursor, value, true)?;
        if cursor.remaining() > 0 {
            return Err(time_error(value, "unexpected trailing characters"));
        }

        let year = if yy < 50 { 2000 + yy } else { 1900 + yy };
        let local = build_instant(value, year as i32, month, day, hour, minute, second)?;
        Self::checked(value, local - Duration::minutes(offset_minutes))
    }

    /// Parse the canonical form produced by [`GeneralizedTime::normalized`]
    pub fn from_normalized(value: &[u8]) -> Result<Self> {
        let malformed = || time_error(value, "not a normalized time value");
        if value.len() != NORMALIZED_TIME_LENGTH || value[14] != b'.' {
            return Err(malformed());
        }
        let mut cursor = Cursor::new(value);
        let mut fields = [0u32; 6];
        for (i, width) in [4, 2, 2, 2, 2, 2].into_iter().enumerate() {
            fields[i] = cursor.digits(width).ok_or_else(malformed)?;
        }
        cursor.pos += 1;
        let millis = cursor.digits(3).ok_or_else(malformed)?;
        let [year, month, day, hour, minute, second] = fields;
        if second > 59 {
            return Err(malformed());
        }
        let naive = build_instant(value, year as i32, month, day, hour, minute, second)?
            + Duration::milliseconds(i64::from(millis));
        Ok(Self::from_datetime(Utc.from_utc_datetime(&naive)))
    }

    fn checked(value: &[u8], utc: NaiveDateTime) -> Result<Self> {
        if !(0..=9999).contains(&utc.year()) {
            return Err(time_error(value, "year out of range after time zone adjustment"));
        }
        Ok(Self::from_datetime(Utc.from_utc_datetime(&utc)))
    }

    /// Canonical byte form `yyyyMMddHHmmss.fff`
    pub fn normalized(&self) -> ByteString {
        ByteString::from(self.instant.format(NORMALIZED_FORMAT).to_string())
    }

    /// Shift by a signed number of milliseconds, saturating at the supported range
    pub fn plus_millis(&self, millis: i64) -> Self {
        let shifted = self
            .instant
            .checked_add_signed(Duration::milliseconds(millis))
            .unwrap_or(self.instant);
        Self::from_datetime(shifted)
    }

    /// Calendar year
    pub fn year(&self) -> u32 {
        self.instant.year() as u32
    }

    /// Month, 1 to 12
    pub fn month(&self) -> u32 {
        self.instant.month()
    }

    /// Day of month, 1 to 31
    pub fn day(&self) -> u32 {
        self.instant.day()
    }

    /// Hour, 0 to 23
    pub fn hour(&self) -> u32 {
        self.instant.hour()
    }

    /// Minute, 0 to 59
    pub fn minute(&self) -> u32 {
        self.instant.minute()
    }

    /// Second, 0 to 59
    pub fn second(&self) -> u32 {
        self.instant.second()
    }
}

impl fmt::Display for GeneralizedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Z", self.instant.format(NORMALIZED_FORMAT))
    }
}

/// Normalize a Generalized Time value
pub fn normalize_generalized_time(value: &[u8]) -> Result<ByteString> {
    GeneralizedTime::parse(value).map(|t| t.normalized())
}

/// Normalize a UTC Time value
pub fn normalize_utc_time(value: &[u8]) -> Result<ByteString> {
    GeneralizedTime::parse_utc_time(value).map(|t| t.normalized())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(value: &str) -> String {
        normalize_generalized_time(value.as_bytes()).unwrap().to_string()
    }

    #[test]
    fn test_normalize_hour_precision() {
        assert_eq!(norm("2006090613Z"), "20060906130000.000");
        assert_eq!(norm("20060906130000.000Z"), "20060906130000.000");
    }

    #[test]
    fn test_fraction_rounding() {
        assert_eq!(norm("20060906135030.0118Z"), "20060906135030.012");
        assert_eq!(norm("20060906135030.012Z"), "20060906135030.012");
        assert_eq!(norm("20060906135030,5Z"), "20060906135030.500");
        // fraction of an hour and of a minute
        assert_eq!(norm("2006090613.5Z"), "20060906133000.000");
        assert_eq!(norm("200609061350.25Z"), "20060906135015.000");
    }

    #[test]
    fn test_time_zone_applied() {
        assert_eq!(norm("20060906130000+0200"), "20060906110000.000");
        assert_eq!(norm("20060906230000-05"), "20060907040000.000");
        assert_eq!(norm("20061231230000-0130"), "20070101003000.000");
    }

    #[test]
    fn test_leap_second_rolls_over() {
        assert_eq!(norm("20081231235960Z"), "20090101000000.000");
    }

    #[test]
    fn test_invalid_values() {
        for value in [
            "",
            "2006",
            "20061306130000Z",
            "20060231130000Z",
            "20060906250000Z",
            "20060906136000Z",
            "20060906130000",
            "20060906130000.Z",
            "20060906130000Zjunk",
            "20060906130000+2500",
            "2006O906130000Z",
        ] {
            assert!(
                normalize_generalized_time(value.as_bytes()).is_err(),
                "{} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_utc_time_century() {
        assert_eq!(
            normalize_utc_time(b"4901011200Z").unwrap().to_string(),
            "20490101120000.000"
        );
        assert_eq!(
            normalize_utc_time(b"500101120030Z").unwrap().to_string(),
            "19500101120030.000"
        );
        assert_eq!(
            normalize_utc_time(b"9912312300-0100").unwrap().to_string(),
            "20000101000000.000"
        );
        assert!(normalize_utc_time(b"9912312300+01").is_err());
    }

    #[test]
    fn test_normalized_order_is_chronological() {
        let earlier = normalize_generalized_time(b"19991231235959.999Z").unwrap();
        let later = normalize_generalized_time(b"20000101000000Z").unwrap();
        assert!(earlier < later);
        assert_eq!(earlier.len(), NORMALIZED_TIME_LENGTH);
    }

    #[test]
    fn test_from_normalized_round_trip() {
        let time = GeneralizedTime::parse(b"20120229101112.345Z").unwrap();
        let back = GeneralizedTime::from_normalized(&time.normalized()).unwrap();
        assert_eq!(time, back);
        assert_eq!((back.year(), back.month(), back.day()), (2012, 2, 29));
        assert_eq!(back.to_string(), "20120229101112.345Z");
        assert!(GeneralizedTime::from_normalized(b"2012").is_err());
    }
}
