//! UTC date utilities without timezone dependencies.
//!
//! Notes carry dates as loose strings (`2024-06-15`, `2024-06-15 10:30`,
//! `2024-06-15T10:30:00+08:00`) or not at all, in which case the file
//! modification time is used. `DateTimeUtc` covers both directions plus the
//! date parts permalink patterns need.

use anyhow::{Result, bail};
use std::time::{SystemTime, UNIX_EPOCH};

/// UTC datetime without timezone complexity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeUtc {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeUtc {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub const fn from_ymd(year: u16, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Parse the leading `YYYY-MM-DD` of a date string.
    ///
    /// Anything after the date must start with `T` or a space (time part),
    /// which is read when it has the `HH:MM[:SS]` shape and ignored otherwise.
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.trim().as_bytes();
        if bytes.len() < 10 {
            return None;
        }

        let year = parse_u16(&bytes[0..4])?;
        if bytes[4] != b'-' || bytes[7] != b'-' {
            return None;
        }
        let month = parse_u8(&bytes[5..7])?;
        let day = parse_u8(&bytes[8..10])?;

        let (hour, minute, second) = match bytes.get(10) {
            None => (0, 0, 0),
            Some(b'T' | b' ') => parse_time(&bytes[11..]).unwrap_or((0, 0, 0)),
            Some(_) => return None,
        };

        let dt = Self::new(year, month, day, hour, minute, second);
        dt.validate().ok()?;
        Some(dt)
    }

    /// Convert a filesystem timestamp.
    pub fn from_system_time(time: SystemTime) -> Self {
        let secs = time
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::from_unix(secs)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_unix(secs: u64) -> Self {
        let days = (secs / 86_400) as i64;
        let rem = secs % 86_400;

        // Civil-from-days (proleptic Gregorian)
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z.rem_euclid(146_097);
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = doy - (153 * mp + 2) / 5 + 1;
        let month = if mp < 10 { mp + 3 } else { mp - 9 };
        let year = yoe + era * 400 + i64::from(month <= 2);

        Self::new(
            year as u16,
            month as u8,
            day as u8,
            (rem / 3600) as u8,
            ((rem / 60) % 60) as u8,
            (rem % 60) as u8,
        )
    }

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn validate(&self) -> Result<()> {
        let Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        } = *self;

        if !(1..=12).contains(&month) {
            bail!("month is invalid: {month}");
        }

        let max_days = Self::days_in_month(year, month);
        if day == 0 || day > max_days {
            bail!("day is invalid: {day}");
        }
        if hour > 23 || minute > 59 || second > 59 {
            bail!("time is invalid: {hour:02}:{minute:02}:{second:02}");
        }

        Ok(())
    }

    #[inline]
    #[allow(clippy::manual_is_multiple_of)] // Manual impl for const fn
    const fn is_leap_year(year: u16) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    #[inline]
    const fn days_in_month(year: u16, month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if Self::is_leap_year(year) => 29,
            2 => 28,
            _ => 0,
        }
    }

    /// 1-based ordinal day within the year.
    pub fn day_of_year(self) -> u16 {
        let before: u16 = (1..self.month)
            .map(|m| u16::from(Self::days_in_month(self.year, m)))
            .sum();
        before + u16::from(self.day)
    }

    /// Format as `YYYY-MM-DD`.
    pub fn to_date_string(self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Parse `HH:MM` or `HH:MM:SS` at the start of `bytes`.
fn parse_time(bytes: &[u8]) -> Option<(u8, u8, u8)> {
    if bytes.len() < 5 || bytes[2] != b':' {
        return None;
    }
    let hour = parse_u8(&bytes[0..2])?;
    let minute = parse_u8(&bytes[3..5])?;
    let second = if bytes.len() >= 8 && bytes[5] == b':' {
        parse_u8(&bytes[6..8])?
    } else {
        0
    };
    Some((hour, minute, second))
}

/// Parse 2-digit ASCII number
#[inline]
fn parse_u8(bytes: &[u8]) -> Option<u8> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = bytes[0].wrapping_sub(b'0');
    let d2 = bytes[1].wrapping_sub(b'0');
    if d1 > 9 || d2 > 9 {
        return None;
    }
    Some(d1 * 10 + d2)
}

/// Parse 4-digit ASCII number
#[inline]
fn parse_u16(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 4 {
        return None;
    }
    let mut result = 0u16;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        result = result * 10 + u16::from(d);
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_parse_date_only() {
        let dt = DateTimeUtc::parse("2024-06-15").unwrap();
        assert_eq!(dt, DateTimeUtc::from_ymd(2024, 6, 15));
    }

    #[test]
    fn test_parse_with_time() {
        let dt = DateTimeUtc::parse("2024-06-15T14:30:45+08:00").unwrap();
        assert_eq!((dt.hour, dt.minute, dt.second), (14, 30, 45));

        let dt = DateTimeUtc::parse("2024-06-15 09:05").unwrap();
        assert_eq!((dt.hour, dt.minute, dt.second), (9, 5, 0));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(DateTimeUtc::parse("2024-13-01").is_none());
        assert!(DateTimeUtc::parse("2023-02-29").is_none());
        assert!(DateTimeUtc::parse("2024/06/15").is_none());
        assert!(DateTimeUtc::parse("yesterday").is_none());
        assert!(DateTimeUtc::parse("2024-06-15x").is_none());
    }

    #[test]
    fn test_leap_day() {
        assert!(DateTimeUtc::parse("2024-02-29").is_some());
        assert!(DateTimeUtc::parse("2000-02-29").is_some());
        assert!(DateTimeUtc::parse("1900-02-29").is_none());
    }

    #[test]
    fn test_from_unix() {
        assert_eq!(DateTimeUtc::from_unix(0), DateTimeUtc::from_ymd(1970, 1, 1));
        // 2024-06-15T14:30:45Z
        let dt = DateTimeUtc::from_unix(1_718_461_845);
        assert_eq!(dt, DateTimeUtc::new(2024, 6, 15, 14, 30, 45));
        // 2000-03-01 (just after a leap day)
        assert_eq!(
            DateTimeUtc::from_unix(951_868_800),
            DateTimeUtc::from_ymd(2000, 3, 1)
        );
    }

    #[test]
    fn test_from_system_time() {
        let time = UNIX_EPOCH + Duration::from_secs(86_400 * 31);
        assert_eq!(
            DateTimeUtc::from_system_time(time),
            DateTimeUtc::from_ymd(1970, 2, 1)
        );
    }

    #[test]
    fn test_day_of_year() {
        assert_eq!(DateTimeUtc::from_ymd(2024, 1, 1).day_of_year(), 1);
        assert_eq!(DateTimeUtc::from_ymd(2024, 3, 1).day_of_year(), 61);
        assert_eq!(DateTimeUtc::from_ymd(2023, 12, 31).day_of_year(), 365);
    }

    #[test]
    fn test_to_date_string() {
        assert_eq!(
            DateTimeUtc::from_ymd(2024, 6, 5).to_date_string(),
            "2024-06-05"
        );
    }
}
