//! Wall-clock time handling for station feeds.
//!
//! Feeds report times as bare "HH:mm" strings with no date, in the local time
//! of the railway. Everything here works in minutes since local midnight and
//! wraps modulo one day; callers decide which side of midnight an event is on.

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;

use super::event::{Delay, UNKNOWN_TIME};

/// Minutes in one civil day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Parse the leading `H:mm` or `HH:mm` of a schedule time into minutes since
/// midnight.
///
/// Trailing text after the minutes (e.g. seconds) is ignored. Returns `None`
/// if the prefix is missing or out of range.
///
/// # Examples
///
/// ```
/// use crossing_server::domain::parse_minutes_of_day;
///
/// assert_eq!(parse_minutes_of_day("10:05"), Some(605));
/// assert_eq!(parse_minutes_of_day("7:30"), Some(450));
/// assert_eq!(parse_minutes_of_day("23:59:10"), Some(1439));
///
/// assert_eq!(parse_minutes_of_day("ND"), None);
/// assert_eq!(parse_minutes_of_day("24:00"), None);
/// assert_eq!(parse_minutes_of_day("10:5"), None);
/// ```
pub fn parse_minutes_of_day(orario: &str) -> Option<u16> {
    let (hour, rest) = orario.trim().split_once(':')?;
    if hour.is_empty() || hour.len() > 2 {
        return None;
    }

    let hour = parse_digits(hour.as_bytes())?;
    let minute = parse_digits(rest.as_bytes().get(..2)?)?;

    if hour > 23 || minute > 59 {
        return None;
    }

    Some((hour * 60 + minute) as u16)
}

/// Interpret a reported delay as a non-negative number of minutes.
///
/// Numbers are clamped at zero. Text is lowercased; empty text or anything
/// mentioning "orario" (as in "In Orario") is on time. Otherwise the first
/// signed integer anywhere in the text is used, clamped at zero, and text
/// without any integer counts as no delay.
///
/// # Examples
///
/// ```
/// use crossing_server::domain::{Delay, parse_delay_minutes};
///
/// assert_eq!(parse_delay_minutes(&Delay::Minutes(10)), 10);
/// assert_eq!(parse_delay_minutes(&Delay::Text("10'".into())), 10);
/// assert_eq!(parse_delay_minutes(&Delay::Text("In Orario".into())), 0);
/// assert_eq!(parse_delay_minutes(&Delay::Text("-3".into())), 0);
/// ```
pub fn parse_delay_minutes(ritardo: &Delay) -> u32 {
    match ritardo {
        Delay::Minutes(m) => clamp_minutes(*m),
        Delay::Text(text) => {
            let normalized = text.trim().to_lowercase();
            if normalized.is_empty() || normalized.contains("orario") {
                return 0;
            }
            first_signed_integer(&normalized).map_or(0, clamp_minutes)
        }
    }
}

/// Scheduled minutes-of-day plus delay, folded back into a single day.
///
/// # Examples
///
/// ```
/// use crossing_server::domain::expected_minutes_of_day;
///
/// assert_eq!(expected_minutes_of_day(595, 10), 605);
/// // 23:55 plus 10 minutes is 00:05
/// assert_eq!(expected_minutes_of_day(1435, 10), 5);
/// ```
pub fn expected_minutes_of_day(scheduled: u16, delay: u32) -> u16 {
    let total = i64::from(scheduled) + i64::from(delay);
    ((total % MINUTES_PER_DAY + MINUTES_PER_DAY) % MINUTES_PER_DAY) as u16
}

/// Minutes since local midnight of `instant` in `tz`, seconds truncated.
///
/// The host timezone plays no part.
pub fn minutes_of_day_in(instant: DateTime<Utc>, tz: Tz) -> u16 {
    let local = instant.with_timezone(&tz);
    (local.hour() * 60 + local.minute()) as u16
}

/// Normalize a source timestamp into `HH:mm`, or [`UNKNOWN_TIME`].
///
/// Accepted encodings:
/// - `H:mm` / `HH:mm`
/// - `H:mm:ss` / `HH:mm:ss` (seconds dropped)
/// - 12 to 14 digit compact timestamps such as `202401151032`, whose
///   characters 9-12 are the hour and minute
///
/// # Examples
///
/// ```
/// use crossing_server::domain::extract_time;
///
/// assert_eq!(extract_time(Some("9:05")), "09:05");
/// assert_eq!(extract_time(Some("10:32:00")), "10:32");
/// assert_eq!(extract_time(Some("20240115103245")), "10:32");
/// assert_eq!(extract_time(Some("soon")), "ND");
/// assert_eq!(extract_time(None), "ND");
/// ```
pub fn extract_time(raw: Option<&str>) -> String {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return UNKNOWN_TIME.to_string();
    };

    if let Some(hhmm) = clock_prefix(value) {
        return hhmm;
    }

    let bytes = value.as_bytes();
    if (12..=14).contains(&bytes.len()) && bytes.iter().all(u8::is_ascii_digit) {
        return format!("{}:{}", &value[8..10], &value[10..12]);
    }

    UNKNOWN_TIME.to_string()
}

/// `H:mm`, `HH:mm`, `H:mm:ss` or `HH:mm:ss` to zero-padded `HH:mm`.
fn clock_prefix(value: &str) -> Option<String> {
    let mut parts = value.split(':');
    let hour = parts.next()?;
    let minute = parts.next()?;
    let second = parts.next();

    if parts.next().is_some() {
        return None;
    }

    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    if !(1..=2).contains(&hour.len()) || !is_digits(hour) {
        return None;
    }
    if minute.len() != 2 || !is_digits(minute) {
        return None;
    }
    if let Some(second) = second
        && (second.len() != 2 || !is_digits(second))
    {
        return None;
    }

    Some(format!("{hour:0>2}:{minute}"))
}

/// Parse one or two ASCII digits.
fn parse_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() || bytes.len() > 2 {
        return None;
    }
    bytes.iter().try_fold(0u32, |acc, &b| {
        let digit = (b as char).to_digit(10)?;
        Some(acc * 10 + digit)
    })
}

/// First `-?[0-9]+` token in `s`. Saturates instead of overflowing.
fn first_signed_integer(s: &str) -> Option<i64> {
    let bytes = s.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_digit)?;
    let negative = start > 0 && bytes[start - 1] == b'-';

    let magnitude = bytes[start..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0i64, |acc, &b| {
            acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
        });

    Some(if negative { -magnitude } else { magnitude })
}

fn clamp_minutes(m: i64) -> u32 {
    m.clamp(0, i64::from(u32::MAX)) as u32
}
