//! 日時の変換ユーティリティ
//!
//! ## 概要
//!
//! IMF-fixdate (RFC 9110 Section 5.6.7) と Unix 時刻の相互変換を提供します。
//! 純粋な変換のみで、ストリーミングやバッファとは無関係。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_httpline::date::HttpDate;
//!
//! let date = HttpDate::parse("Sun, 10 Nov 2002 23:50:13 GMT").unwrap();
//! assert_eq!(date.unix_timestamp(), 1036972213);
//! assert_eq!(date.to_string(), "Sun, 10 Nov 2002 23:50:13 GMT");
//! assert_eq!(date.to_datetime_string(), "2002-11-10 23:50:13");
//! ```

use core::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

const WEEK: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const MDAY: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// 日時パースエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateError {
    /// 不正な形式
    InvalidFormat,
    /// 不正な日付 (存在しない日など)
    InvalidDate,
    /// 不正な時刻
    InvalidTime,
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateError::InvalidFormat => write!(f, "invalid date format"),
            DateError::InvalidDate => write!(f, "invalid date"),
            DateError::InvalidTime => write!(f, "invalid time"),
        }
    }
}

impl std::error::Error for DateError {}

/// UTC の日時
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HttpDate {
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl HttpDate {
    /// IMF-fixdate をパースする
    ///
    /// 例: `Sun, 06 Nov 1994 08:49:37 GMT`
    pub fn parse(input: &str) -> Result<Self, DateError> {
        let bytes = input.as_bytes();
        // "Www, DD Mon YYYY HH:MM:SS GMT" は固定長 29 バイト。
        // 非 ASCII を先に弾くことで、以降の固定位置スライスが
        // 文字境界に抵触しないことを保証する
        if bytes.len() != 29 || !input.is_ascii() {
            return Err(DateError::InvalidFormat);
        }
        let day_name = &input[0..3];
        if !WEEK.contains(&day_name) || &input[3..5] != ", " {
            return Err(DateError::InvalidFormat);
        }

        let day = two_digits(&bytes[5..7]).ok_or(DateError::InvalidFormat)?;
        if bytes[7] != b' ' {
            return Err(DateError::InvalidFormat);
        }
        let month_name = &input[8..11];
        let month = MONTHS
            .iter()
            .position(|m| *m == month_name)
            .ok_or(DateError::InvalidFormat)? as u8
            + 1;
        if bytes[11] != b' ' {
            return Err(DateError::InvalidFormat);
        }
        let year = four_digits(&bytes[12..16]).ok_or(DateError::InvalidFormat)?;
        if bytes[16] != b' ' || bytes[19] != b':' || bytes[22] != b':' {
            return Err(DateError::InvalidFormat);
        }
        let hour = two_digits(&bytes[17..19]).ok_or(DateError::InvalidFormat)?;
        let minute = two_digits(&bytes[20..22]).ok_or(DateError::InvalidFormat)?;
        let second = two_digits(&bytes[23..25]).ok_or(DateError::InvalidFormat)?;
        if &input[25..] != " GMT" {
            return Err(DateError::InvalidFormat);
        }

        Self::from_fields(year, month, day, hour, minute, second)
    }

    /// 各フィールドから作成する (検証付き)
    pub fn from_fields(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, DateError> {
        if !(1..=12).contains(&month) {
            return Err(DateError::InvalidDate);
        }
        let mut max_day = MDAY[month as usize - 1];
        if month == 2 && is_leap_year(year) {
            max_day = 29;
        }
        if day == 0 || day > max_day {
            return Err(DateError::InvalidDate);
        }
        // 閏秒 (60) は許容しない
        if hour > 23 || minute > 59 || second > 59 {
            return Err(DateError::InvalidTime);
        }
        Ok(HttpDate {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Unix 時刻 (秒) から作成する
    pub fn from_unix_timestamp(secs: i64) -> Self {
        let days = secs.div_euclid(86400);
        let rem = secs.rem_euclid(86400);
        let (year, month, day) = civil_from_days(days);
        HttpDate {
            year,
            month,
            day,
            hour: (rem / 3600) as u8,
            minute: (rem % 3600 / 60) as u8,
            second: (rem % 60) as u8,
        }
    }

    /// 現在時刻
    pub fn now() -> Self {
        let secs = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs() as i64,
            Err(e) => -(e.duration().as_secs() as i64),
        };
        Self::from_unix_timestamp(secs)
    }

    /// Unix 時刻 (秒)
    pub fn unix_timestamp(&self) -> i64 {
        let days = days_from_civil(self.year, self.month, self.day);
        days * 86400
            + i64::from(self.hour) * 3600
            + i64::from(self.minute) * 60
            + i64::from(self.second)
    }

    /// 曜日 (0 = 日曜)
    pub fn day_of_week(&self) -> u8 {
        let days = days_from_civil(self.year, self.month, self.day);
        (days + 4).rem_euclid(7) as u8
    }

    /// `YYYY-MM-DD hh:mm:ss` 形式 (UTC)
    pub fn to_datetime_string(&self) -> String {
        format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }
}

impl fmt::Display for HttpDate {
    /// IMF-fixdate 形式で出力する
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {:02} {} {:04} {:02}:{:02}:{:02} GMT",
            WEEK[self.day_of_week() as usize],
            self.day,
            MONTHS[self.month as usize - 1],
            self.year,
            self.hour,
            self.minute,
            self.second
        )
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn two_digits(bytes: &[u8]) -> Option<u8> {
    if bytes.len() == 2 && bytes.iter().all(u8::is_ascii_digit) {
        Some((bytes[0] - b'0') * 10 + (bytes[1] - b'0'))
    } else {
        None
    }
}

fn four_digits(bytes: &[u8]) -> Option<i32> {
    if bytes.len() == 4 && bytes.iter().all(u8::is_ascii_digit) {
        Some(bytes.iter().fold(0, |acc, b| acc * 10 + i32::from(b - b'0')))
    } else {
        None
    }
}

/// 1970-01-01 からの日数 (Howard Hinnant の civil 算法)
fn days_from_civil(year: i32, month: u8, day: u8) -> i64 {
    let y = i64::from(year) - if month <= 2 { 1 } else { 0 };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = if month > 2 {
        i64::from(month) - 3
    } else {
        i64::from(month) + 9
    };
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe - 719468
}

/// 日数から (年, 月, 日) へ
fn civil_from_days(days: i64) -> (i32, u8, u8) {
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = z - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u8;
    let year = if month <= 2 { y + 1 } else { y } as i32;
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_imf_fixdate() {
        let date = HttpDate::parse("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
        assert_eq!(date.year(), 1994);
        assert_eq!(date.month(), 11);
        assert_eq!(date.day(), 6);
        assert_eq!(date.hour(), 8);
        assert_eq!(date.minute(), 49);
        assert_eq!(date.second(), 37);
        assert_eq!(date.unix_timestamp(), 784111777);
    }

    #[test]
    fn format_round_trip() {
        let input = "Sun, 10 Nov 2002 23:50:13 GMT";
        let date = HttpDate::parse(input).unwrap();
        assert_eq!(date.to_string(), input);
    }

    #[test]
    fn epoch() {
        let date = HttpDate::from_unix_timestamp(0);
        assert_eq!(date.to_string(), "Thu, 01 Jan 1970 00:00:00 GMT");
        assert_eq!(date.unix_timestamp(), 0);
    }

    #[test]
    fn timestamp_round_trip() {
        for secs in [0, 1, 784111777, 1037058613, 2147483647, -1, -86400] {
            let date = HttpDate::from_unix_timestamp(secs);
            assert_eq!(date.unix_timestamp(), secs, "secs {}", secs);
        }
    }

    #[test]
    fn leap_day() {
        assert!(HttpDate::from_fields(2000, 2, 29, 0, 0, 0).is_ok());
        assert_eq!(
            HttpDate::from_fields(1900, 2, 29, 0, 0, 0),
            Err(DateError::InvalidDate)
        );
        assert_eq!(
            HttpDate::from_fields(2001, 2, 29, 0, 0, 0),
            Err(DateError::InvalidDate)
        );
    }

    #[test]
    fn invalid_formats() {
        assert!(HttpDate::parse("").is_err());
        assert!(HttpDate::parse("Sun, 06 Nov 1994 08:49:37 UTC").is_err());
        assert!(HttpDate::parse("Xxx, 06 Nov 1994 08:49:37 GMT").is_err());
        assert!(HttpDate::parse("Sun, 06 Xxx 1994 08:49:37 GMT").is_err());
        assert!(HttpDate::parse("Sun, 06 Nov 1994 08:49:37 GMT ").is_err());
        assert!(HttpDate::parse("Sun, 32 Nov 1994 08:49:37 GMT").is_err());
        assert!(HttpDate::parse("Sun, 06 Nov 1994 24:49:37 GMT").is_err());
    }

    #[test]
    fn non_ascii_input_is_rejected() {
        // 29 バイトだが固定位置が文字境界と一致しない入力
        let input = "ééééééééééééééx";
        assert_eq!(input.len(), 29);
        assert_eq!(HttpDate::parse(input), Err(DateError::InvalidFormat));
        assert_eq!(
            HttpDate::parse("Sun, 06 Nov 1994 08:49:37 Gé"),
            Err(DateError::InvalidFormat)
        );
    }

    #[test]
    fn datetime_string() {
        let date = HttpDate::parse("Tue, 10 Nov 2002 23:50:13 GMT").unwrap();
        assert_eq!(date.to_datetime_string(), "2002-11-10 23:50:13");
    }

    #[test]
    fn day_of_week_is_consistent() {
        // 1970-01-01 は木曜
        assert_eq!(HttpDate::from_unix_timestamp(0).day_of_week(), 4);
        // 2002-11-10 は日曜
        let date = HttpDate::from_fields(2002, 11, 10, 0, 0, 0).unwrap();
        assert_eq!(date.day_of_week(), 0);
    }
}
