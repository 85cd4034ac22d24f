use crate::consts::{
    DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, MAX_MONTH, MAX_TIMESTAMP, MAX_YEAR, MIN_YEAR,
};

/// Error type for out-of-range calendar field values and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// Year outside the supported range.
    #[error("Invalid year: {0} (must be {MIN_YEAR}-{MAX_YEAR})")]
    InvalidYear(u16),

    /// Month outside 1-12.
    #[error("Invalid month: {0} (must be 1-{MAX_MONTH})")]
    InvalidMonth(u8),

    /// Day outside the actual length of the month.
    #[error("Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: u16, month: u8, day: u8 },

    /// Hour, minute, second or millisecond outside its range.
    #[error("Invalid time of day {hour:02}:{minute:02}:{second:02}.{millis:03}")]
    InvalidTimeOfDay {
        hour: u8,
        minute: u8,
        second: u8,
        millis: u16,
    },

    /// Raw millisecond count outside `0..MAX_TIMESTAMP`.
    #[error("Timestamp {0} is outside the supported range (0..{MAX_TIMESTAMP})")]
    TimestampOutOfRange(i64),

    /// A date that is valid per the field ranges but lies at or past the
    /// last representable instant before the 2038 rollover.
    #[error("Date {year:04}-{month:02}-{day:02} is past the end of the supported range")]
    DatePastRange { year: u16, month: u8, day: u8 },
}

/// A validated calendar-field view of a timestamp: year, month, day plus
/// time of day. Never stored independently; the millisecond timestamp is
/// the single source of truth and fields are derived from it on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarFields {
    pub(crate) year: u16,
    pub(crate) month: u8,
    pub(crate) day: u8,
    pub(crate) hour: u8,
    pub(crate) minute: u8,
    pub(crate) second: u8,
    pub(crate) millis: u16,
}

impl CalendarFields {
    /// Creates a validated field set.
    ///
    /// # Errors
    /// Returns a `FieldError` naming the first field found outside its
    /// range. Year 2038 is accepted here (January instants below the
    /// timestamp limit exist); the cutoff itself is enforced by
    /// [`EpochMillis::from_fields`](crate::EpochMillis::from_fields).
    pub fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        millis: u16,
    ) -> Result<Self, FieldError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(FieldError::InvalidYear(year));
        }
        if month == 0 || month > MAX_MONTH {
            return Err(FieldError::InvalidMonth(month));
        }
        if day == 0 || day > days_in_month(year, month) {
            return Err(FieldError::InvalidDay { year, month, day });
        }
        if hour > 23 || minute > 59 || second > 59 || millis > 999 {
            return Err(FieldError::InvalidTimeOfDay {
                hour,
                minute,
                second,
                millis,
            });
        }
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            millis,
        })
    }

    /// Returns the year (1970-2038)
    #[inline]
    pub const fn year(self) -> u16 {
        self.year
    }

    /// Returns the month (1-12)
    #[inline]
    pub const fn month(self) -> u8 {
        self.month
    }

    /// Returns the day of month (1-31)
    #[inline]
    pub const fn day(self) -> u8 {
        self.day
    }

    /// Returns the hour (0-23)
    #[inline]
    pub const fn hour(self) -> u8 {
        self.hour
    }

    /// Returns the minute (0-59)
    #[inline]
    pub const fn minute(self) -> u8 {
        self.minute
    }

    /// Returns the second (0-59)
    #[inline]
    pub const fn second(self) -> u8 {
        self.second
    }

    /// Returns the millisecond (0-999)
    #[inline]
    pub const fn millisecond(self) -> u16 {
        self.millis
    }
}

// Helper functions

/// Within 1970-2038 every 4th year is a leap year: the range crosses no
/// centurial exception (2000 is divisible by 400).
pub const fn is_leap_year(year: u16) -> bool {
    year % 4 == 0
}

pub const fn days_in_month(year: u16, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}
