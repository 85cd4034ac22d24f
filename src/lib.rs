//! Fast conversion between epoch milliseconds and ISO-8601 timestamps.
//!
//! The supported range is 1970-01-01T00:00:00Z up to the 32-bit second
//! rollover in January 2038, where the leap-year rule is a plain 4-year
//! cycle. Conversions are O(1), table-driven and allocation-free.

mod calendar;
mod consts;
mod prelude;
mod text;
mod types;

pub use consts::*;
pub use types::{CalendarFields, FieldError};

use crate::calendar::{DAY_BITS, DAY_MASK, ORDINAL_BITS, ORDINAL_MASK};
use crate::prelude::*;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

/// A UTC timestamp as a validated count of milliseconds since
/// 1970-01-01T00:00:00Z, always within `0..MAX_TIMESTAMP`.
///
/// The millisecond count is the single source of truth; calendar fields are
/// derived views computed on demand. Because every constructor validates the
/// range, all extractors are infallible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Into)]
pub struct EpochMillis(i64);

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Timestamp text too short: {_0} characters")]
    TooShort(usize),
    #[display(fmt = "Unexpected character {_0:?} at offset {_1}")]
    UnexpectedChar(char, usize),
    #[display(fmt = "{_0}")]
    Field(FieldError),
}

impl std::error::Error for ParseError {}

impl From<FieldError> for ParseError {
    fn from(err: FieldError) -> Self {
        Self::Field(err)
    }
}

impl EpochMillis {
    /// The first representable instant, 1970-01-01T00:00:00Z
    pub const MIN: Self = Self(0);
    /// The last representable instant before the 2038 rollover
    pub const MAX: Self = Self(MAX_TIMESTAMP - 1);

    /// Creates a timestamp from a raw millisecond count.
    ///
    /// # Errors
    /// Returns `FieldError::TimestampOutOfRange` when the count falls
    /// outside `0..MAX_TIMESTAMP`.
    pub const fn new(millis: i64) -> Result<Self, FieldError> {
        if millis < 0 || millis >= MAX_TIMESTAMP {
            return Err(FieldError::TimestampOutOfRange(millis));
        }
        Ok(Self(millis))
    }

    /// Combines a validated field set into a timestamp.
    ///
    /// # Errors
    /// Returns `FieldError::DatePastRange` for dates at or past the last
    /// representable instant (anything in 2038 beyond January 19
    /// 03:14:07.999).
    pub fn from_fields(fields: CalendarFields) -> Result<Self, FieldError> {
        // the month boundary table ends at its 2038-01 sentinel
        if fields.year == MAX_YEAR && fields.month > 1 {
            return Err(FieldError::DatePastRange {
                year: fields.year,
                month: fields.month,
                day: fields.day,
            });
        }
        let timestamp = calendar::fields_to_timestamp(
            fields.year,
            fields.month,
            fields.day,
            fields.hour,
            fields.minute,
            fields.second,
            fields.millis,
        );
        if timestamp >= MAX_TIMESTAMP {
            return Err(FieldError::DatePastRange {
                year: fields.year,
                month: fields.month,
                day: fields.day,
            });
        }
        Ok(Self(timestamp))
    }

    /// Timestamp of midnight on the given date.
    ///
    /// # Errors
    /// Returns a `FieldError` for any field outside its range.
    pub fn from_date(year: u16, month: u8, day: u8) -> Result<Self, FieldError> {
        Self::from_fields(CalendarFields::new(year, month, day, 0, 0, 0, 0)?)
    }

    /// Timestamp of the given date and time of day.
    ///
    /// # Errors
    /// Returns a `FieldError` for any field outside its range.
    pub fn from_date_time(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        millis: u16,
    ) -> Result<Self, FieldError> {
        Self::from_fields(CalendarFields::new(
            year, month, day, hour, minute, second, millis,
        )?)
    }

    /// Returns the raw millisecond count
    #[inline]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns the year (1970-2038)
    #[inline]
    pub fn year(self) -> u16 {
        (calendar::year_and_ordinal(self.0) >> ORDINAL_BITS) as u16
    }

    /// Returns the month (1-12)
    #[inline]
    pub fn month(self) -> u8 {
        let month_and_day = calendar::month_and_day(calendar::year_and_ordinal(self.0));
        ((month_and_day >> DAY_BITS) + 1) as u8
    }

    /// Returns the day of month (1-31)
    #[inline]
    pub fn day_of_month(self) -> u8 {
        let month_and_day = calendar::month_and_day(calendar::year_and_ordinal(self.0));
        ((month_and_day & DAY_MASK) + 1) as u8
    }

    /// Returns the day of year, 1 to 365 (or 366 in a leap year)
    #[inline]
    pub fn day_of_year(self) -> u16 {
        ((calendar::year_and_ordinal(self.0) & ORDINAL_MASK) + 1) as u16
    }

    /// Returns whole days elapsed since the epoch
    #[inline]
    pub const fn day_of_epoch(self) -> i64 {
        self.0 / MILLIS_IN_DAY
    }

    /// Returns the ISO-8601 day of week, 1 (Monday) to 7 (Sunday).
    /// Day 0 of the epoch, 1970-01-01, was a Thursday.
    #[inline]
    pub const fn day_of_week(self) -> u8 {
        ((self.day_of_epoch() + 3) % 7 + 1) as u8
    }

    /// Returns the hour of day (0-23)
    #[inline]
    pub const fn hour(self) -> u8 {
        ((self.0 % MILLIS_IN_DAY) / MILLIS_IN_HOUR) as u8
    }

    /// Returns the minute (0-59)
    #[inline]
    pub const fn minute(self) -> u8 {
        ((self.0 % MILLIS_IN_HOUR) / MILLIS_IN_MINUTE) as u8
    }

    /// Returns the second (0-59)
    #[inline]
    pub const fn second(self) -> u8 {
        ((self.0 % MILLIS_IN_MINUTE) / MILLIS_IN_SECOND) as u8
    }

    /// Returns the millisecond (0-999)
    #[inline]
    pub const fn millisecond(self) -> u16 {
        (self.0 % MILLIS_IN_SECOND) as u16
    }

    /// Returns the nanosecond-of-second view of the millisecond field,
    /// 0 to 999_000_000
    #[inline]
    pub const fn nanosecond(self) -> u32 {
        self.millisecond() as u32 * 1_000_000
    }

    /// Returns the full calendar-field view of this timestamp
    pub fn fields(self) -> CalendarFields {
        let year_and_ordinal = calendar::year_and_ordinal(self.0);
        let month_and_day = calendar::month_and_day(year_and_ordinal);
        CalendarFields {
            year: (year_and_ordinal >> ORDINAL_BITS) as u16,
            month: ((month_and_day >> DAY_BITS) + 1) as u8,
            day: ((month_and_day & DAY_MASK) + 1) as u8,
            hour: self.hour(),
            minute: self.minute(),
            second: self.second(),
            millis: self.millisecond(),
        }
    }

    /// Floors to the start of the current second
    #[inline]
    pub const fn truncate_to_seconds(self) -> Self {
        Self(self.0 / MILLIS_IN_SECOND * MILLIS_IN_SECOND)
    }

    /// Floors to the start of the current minute
    #[inline]
    pub const fn truncate_to_minutes(self) -> Self {
        Self(self.0 / MILLIS_IN_MINUTE * MILLIS_IN_MINUTE)
    }

    /// Floors to the start of the current hour
    #[inline]
    pub const fn truncate_to_hours(self) -> Self {
        Self(self.0 / MILLIS_IN_HOUR * MILLIS_IN_HOUR)
    }

    /// Floors to the start of the current day
    #[inline]
    pub const fn truncate_to_days(self) -> Self {
        Self(self.0 / MILLIS_IN_DAY * MILLIS_IN_DAY)
    }

    /// Floors to the start of the current `minutes`-wide block. The caller
    /// contract requires `minutes` to evenly divide 60; violations are fatal
    /// in debug builds.
    #[inline]
    pub fn truncate_to_minutes_multiple(self, minutes: u8) -> Self {
        debug_assert!(
            minutes != 0 && 60 % minutes == 0,
            "minute block must evenly divide the hour"
        );
        let unit = MILLIS_IN_MINUTE * i64::from(minutes);
        Self(self.0 / unit * unit)
    }

    /// Floors to the start of the current `hours`-wide block. The caller
    /// contract requires `hours` to evenly divide 24; violations are fatal
    /// in debug builds.
    #[inline]
    pub fn truncate_to_hours_multiple(self, hours: u8) -> Self {
        debug_assert!(
            hours != 0 && 24 % hours == 0,
            "hour block must evenly divide the day"
        );
        let unit = MILLIS_IN_HOUR * i64::from(hours);
        Self(self.0 / unit * unit)
    }

    /// Floors to the first instant of the current month. The one truncation
    /// that needs the calendar tables.
    pub fn truncate_to_months(self) -> Self {
        let year_and_ordinal = calendar::year_and_ordinal(self.0);
        let month_and_day = calendar::month_and_day(year_and_ordinal);
        let year = (year_and_ordinal >> ORDINAL_BITS) as u16;
        let month = ((month_and_day >> DAY_BITS) + 1) as u8;
        Self(calendar::month_start(year, month))
    }

    /// Returns the date part as `YYYY-MM-DD`
    pub fn date_string(self) -> String {
        let mut buf = [0u8; text::DATE_LEN];
        text::format_date_into(&mut buf, self.0);
        ascii_to_string(&buf)
    }

    /// Returns the time-of-day part as `HH:MM:SS`, with a `.mmm` suffix when
    /// the millisecond field is nonzero
    pub fn time_string(self) -> String {
        let mut buf = [0u8; text::TIME_FULL_LEN];
        let len = text::format_time_into(&mut buf, self.0);
        ascii_to_string(&buf[..len])
    }
}

// Emission buffers hold ASCII digits and punctuation only.
fn ascii_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| char::from(byte)).collect()
}

impl fmt::Display for EpochMillis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; text::ISO_FULL_LEN];
        let len = text::format_into(&mut buf, self.0);
        // the emission buffer holds ASCII only
        let text = std::str::from_utf8(&buf[..len]).map_err(|_| fmt::Error)?;
        f.write_str(text)
    }
}

impl FromStr for EpochMillis {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        text::parse(s)
    }
}

impl TryFrom<i64> for EpochMillis {
    type Error = FieldError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl serde::Serialize for EpochMillis {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for EpochMillis {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::tz::TimeZone;
    use proptest::prelude::*;

    // vectors exercising the leap boundary, both half-days and the range ends
    const VECTORS: &[&str] = &[
        "1970-01-01T00:00:00Z",
        "2038-01-04T06:31:08.892Z",
        "2030-03-03T17:57:17.740Z",
        "2020-02-12T03:30:20.034Z",
        "2020-02-12T13:30:20.034Z",
        "2020-02-29T13:30:20Z",
        "2020-02-29T13:30:20.034Z",
    ];

    fn utc_fields(timestamp: EpochMillis) -> jiff::Zoned {
        jiff::Timestamp::from_millisecond(timestamp.get())
            .unwrap()
            .to_zoned(TimeZone::UTC)
    }

    fn assert_matches_jiff(timestamp: EpochMillis) {
        let zoned = utc_fields(timestamp);
        assert_eq!(i32::from(timestamp.year()), i32::from(zoned.year()));
        assert_eq!(i32::from(timestamp.month()), i32::from(zoned.month()));
        assert_eq!(i32::from(timestamp.day_of_month()), i32::from(zoned.day()));
        assert_eq!(
            i32::from(timestamp.day_of_year()),
            i32::from(zoned.day_of_year())
        );
        assert_eq!(
            i32::from(timestamp.day_of_week()),
            i32::from(zoned.weekday().to_monday_one_offset())
        );
        assert_eq!(i32::from(timestamp.hour()), i32::from(zoned.hour()));
        assert_eq!(i32::from(timestamp.minute()), i32::from(zoned.minute()));
        assert_eq!(i32::from(timestamp.second()), i32::from(zoned.second()));
        assert_eq!(
            i32::from(timestamp.millisecond()),
            i32::from(zoned.millisecond())
        );
        assert_eq!(timestamp.nanosecond(), zoned.subsec_nanosecond() as u32);
    }

    #[test]
    fn test_vectors_round_trip_exactly() {
        for vector in VECTORS {
            let timestamp: EpochMillis = vector.parse().unwrap();
            assert_eq!(timestamp.to_string(), *vector);
        }
    }

    #[test]
    fn test_epoch_formats_without_millis_suffix() {
        assert_eq!(EpochMillis::MIN.to_string(), "1970-01-01T00:00:00Z");
        assert_eq!(EpochMillis::MIN.to_string().len(), 20);
    }

    #[test]
    fn test_vectors_match_jiff() {
        for vector in VECTORS {
            let timestamp: EpochMillis = vector.parse().unwrap();
            assert_matches_jiff(timestamp);
        }
    }

    #[test]
    fn test_field_equivalence() {
        for vector in VECTORS {
            let timestamp: EpochMillis = vector.parse().unwrap();
            assert_eq!(EpochMillis::from_fields(timestamp.fields()).unwrap(), timestamp);
        }
    }

    #[test]
    fn test_compact_parse_matches_separated() {
        let compact: EpochMillis = "20200212033020034".parse().unwrap();
        let separated: EpochMillis = "2020-02-12T03:30:20.034Z".parse().unwrap();
        assert_eq!(compact, separated);
    }

    #[test]
    fn test_epoch_was_a_thursday() {
        assert_eq!(EpochMillis::MIN.day_of_week(), 4);
        // and 1970-01-05 the following Monday
        let monday = EpochMillis::from_date(1970, 1, 5).unwrap();
        assert_eq!(monday.day_of_week(), 1);
    }

    #[test]
    fn test_leap_day_fields() {
        let leap: EpochMillis = "2020-02-29T13:30:20.034Z".parse().unwrap();
        assert_eq!(leap.year(), 2020);
        assert_eq!(leap.month(), 2);
        assert_eq!(leap.day_of_month(), 29);
        assert_eq!(leap.day_of_year(), 60);

        // day-of-year 60 in a non-leap year is March 1
        let non_leap = EpochMillis::from_date(2021, 3, 1).unwrap();
        assert_eq!(non_leap.day_of_year(), 60);
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(matches!(
            EpochMillis::new(-1),
            Err(FieldError::TimestampOutOfRange(-1))
        ));
        assert!(EpochMillis::new(MAX_TIMESTAMP).is_err());
        assert!(EpochMillis::new(MAX_TIMESTAMP - 1).is_ok());
        assert!(EpochMillis::try_from(0i64).is_ok());
    }

    #[test]
    fn test_from_fields_rejects_past_range() {
        let fields = CalendarFields::new(2038, 1, 20, 0, 0, 0, 0).unwrap();
        assert!(matches!(
            EpochMillis::from_fields(fields),
            Err(FieldError::DatePastRange { .. })
        ));
        assert!(EpochMillis::from_date(2038, 1, 19).is_ok());
        assert!(EpochMillis::from_date_time(2038, 1, 19, 3, 14, 7, 999).is_err());
        assert!(EpochMillis::from_date_time(2038, 1, 19, 3, 14, 7, 998).is_ok());
    }

    #[test]
    fn test_max_is_last_valid_instant() {
        assert_eq!(EpochMillis::MAX.get(), MAX_TIMESTAMP - 1);
        assert_eq!(EpochMillis::MAX.year(), 2038);
        assert_eq!(EpochMillis::MAX.month(), 1);
        assert_eq!(EpochMillis::MAX.day_of_month(), 19);
    }

    #[test]
    fn test_truncations_on_vectors() {
        for vector in VECTORS {
            let timestamp: EpochMillis = vector.parse().unwrap();
            let millis = timestamp.get();
            assert_eq!(timestamp.truncate_to_seconds().get(), millis / 1000 * 1000);
            assert_eq!(
                timestamp.truncate_to_minutes().get(),
                millis / MILLIS_IN_MINUTE * MILLIS_IN_MINUTE
            );
            assert_eq!(
                timestamp.truncate_to_hours().get(),
                millis / MILLIS_IN_HOUR * MILLIS_IN_HOUR
            );
            assert_eq!(
                timestamp.truncate_to_days().get(),
                millis / MILLIS_IN_DAY * MILLIS_IN_DAY
            );
            assert_eq!(
                timestamp.truncate_to_hours_multiple(12).get(),
                millis / (12 * MILLIS_IN_HOUR) * (12 * MILLIS_IN_HOUR)
            );
            assert_eq!(
                timestamp.truncate_to_minutes_multiple(15).get(),
                millis / (15 * MILLIS_IN_MINUTE) * (15 * MILLIS_IN_MINUTE)
            );
            // first of the month, midnight
            let month_start = timestamp.truncate_to_months();
            assert_eq!(
                month_start,
                EpochMillis::from_date(timestamp.year(), timestamp.month(), 1).unwrap()
            );
        }
    }

    #[test]
    fn test_truncation_idempotence() {
        for vector in VECTORS {
            let timestamp: EpochMillis = vector.parse().unwrap();
            let days = timestamp.truncate_to_days();
            assert_eq!(days.truncate_to_days(), days);
            let hours = timestamp.truncate_to_hours_multiple(6);
            assert_eq!(hours.truncate_to_hours_multiple(6), hours);
            let minutes = timestamp.truncate_to_minutes_multiple(30);
            assert_eq!(minutes.truncate_to_minutes_multiple(30), minutes);
            let months = timestamp.truncate_to_months();
            assert_eq!(months.truncate_to_months(), months);
        }
    }

    #[test]
    #[should_panic(expected = "hour block")]
    fn test_uneven_hour_multiple_is_a_contract_violation() {
        let _ = EpochMillis::MIN.truncate_to_hours_multiple(7);
    }

    #[test]
    fn test_date_and_time_strings() {
        let timestamp: EpochMillis = "2020-02-29T13:30:20.034Z".parse().unwrap();
        assert_eq!(timestamp.date_string(), "2020-02-29");
        assert_eq!(timestamp.time_string(), "13:30:20.034");
        assert_eq!(EpochMillis::MIN.time_string(), "00:00:00");
    }

    #[test]
    fn test_into_i64() {
        let timestamp: EpochMillis = "2020-02-12T03:30:20.034Z".parse().unwrap();
        let raw: i64 = timestamp.into();
        assert_eq!(EpochMillis::new(raw).unwrap(), timestamp);
    }

    #[test]
    fn test_serde_string_format() {
        let timestamp: EpochMillis = "2020-02-29T13:30:20.034Z".parse().unwrap();
        let json = serde_json::to_string(&timestamp).unwrap();
        assert_eq!(json, r#""2020-02-29T13:30:20.034Z""#);
        let parsed: EpochMillis = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, timestamp);
    }

    #[test]
    fn test_serde_validation() {
        let result: Result<EpochMillis, _> = serde_json::from_str(r#""2021-02-29T00:00:00Z""#);
        assert!(result.is_err());

        let result: Result<EpochMillis, _> = serde_json::from_str(r#""2020-13-01T00:00:00Z""#);
        assert!(result.is_err());

        let result: Result<EpochMillis, _> = serde_json::from_str(r#""garbage""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_ordering_follows_the_line() {
        let earlier: EpochMillis = "2020-02-12T03:30:20.034Z".parse().unwrap();
        let later: EpochMillis = "2020-02-12T13:30:20.034Z".parse().unwrap();
        assert!(earlier < later);
        assert!(EpochMillis::MIN < earlier);
        assert!(later < EpochMillis::MAX);
    }

    proptest! {
        #[test]
        fn prop_round_trip(millis in 0..MAX_TIMESTAMP) {
            let timestamp = EpochMillis::new(millis).unwrap();
            let text = timestamp.to_string();
            prop_assert!(text.len() == 20 || text.len() == 24);
            prop_assert_eq!(text.parse::<EpochMillis>().unwrap(), timestamp);
        }

        #[test]
        fn prop_field_equivalence(millis in 0..MAX_TIMESTAMP) {
            let timestamp = EpochMillis::new(millis).unwrap();
            let fields = timestamp.fields();
            prop_assert_eq!(EpochMillis::from_fields(fields).unwrap(), timestamp);
        }

        #[test]
        fn prop_fields_match_jiff(millis in 0..MAX_TIMESTAMP) {
            assert_matches_jiff(EpochMillis::new(millis).unwrap());
        }

        #[test]
        fn prop_formatted_text_parses_in_jiff(millis in 0..MAX_TIMESTAMP) {
            let timestamp = EpochMillis::new(millis).unwrap();
            let parsed: jiff::Timestamp = timestamp.to_string().parse().unwrap();
            prop_assert_eq!(parsed.as_millisecond(), millis);
        }

        #[test]
        fn prop_truncate_months_is_first_of_month(millis in 0..MAX_TIMESTAMP) {
            let timestamp = EpochMillis::new(millis).unwrap();
            let truncated = timestamp.truncate_to_months();
            prop_assert_eq!(truncated.day_of_month(), 1);
            prop_assert_eq!(truncated.hour(), 0);
            prop_assert_eq!(truncated.year(), timestamp.year());
            prop_assert_eq!(truncated.month(), timestamp.month());
            prop_assert!(truncated <= timestamp);
        }
    }
}
