/// First supported year (the Unix epoch year)
pub const MIN_YEAR: u16 = 1970;

/// First year past the supported range. The month boundary table still
/// carries a sentinel entry for 2038-01, and January 2038 instants below
/// `MAX_TIMESTAMP` are valid.
pub const MAX_YEAR: u16 = 2038;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// Month number for February
pub const FEBRUARY: u8 = 2;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Milliseconds in one second
pub const MILLIS_IN_SECOND: i64 = 1000;

/// Milliseconds in one minute
pub const MILLIS_IN_MINUTE: i64 = 60 * MILLIS_IN_SECOND;

/// Milliseconds in one hour
pub const MILLIS_IN_HOUR: i64 = 60 * MILLIS_IN_MINUTE;

/// Milliseconds in one day
pub const MILLIS_IN_DAY: i64 = 24 * MILLIS_IN_HOUR;

/// Exclusive upper bound of the timestamp domain: the maximum 32-bit second
/// count in milliseconds, plus 999 ms.
pub const MAX_TIMESTAMP: i64 = i32::MAX as i64 * MILLIS_IN_SECOND + 999;

/// Days in one 4-year leap cycle (365 * 3 + 366). Exact within the supported
/// range, which never crosses a centurial leap-year exception.
pub const DAYS_IN_CYCLE: i64 = 1461;

/// Days in a non-leap year
pub const DAYS_IN_YEAR: usize = 365;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: u8 = b'-';
/// Date/time separator (ISO 8601 format)
pub const TIME_SEPARATOR: u8 = b'T';
/// UTC designator suffix
pub const UTC_SUFFIX: u8 = b'Z';
