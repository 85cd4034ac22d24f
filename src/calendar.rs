//! Calendar codec core: O(1) conversion between an epoch-millisecond count
//! and calendar fields, backed by two compile-time lookup tables.
//!
//! The forward direction (fields to timestamp) is a single index into the
//! month boundary table. The reverse direction never searches: a closed-form
//! decomposition over the 1461-day leap cycle yields the year and day-of-year
//! ordinal, and a 365-entry table maps the ordinal to month and day.

use crate::consts::{
    DAYS_IN_CYCLE, DAYS_IN_MONTH, DAYS_IN_YEAR, MAX_TIMESTAMP, MAX_YEAR, MILLIS_IN_DAY,
    MILLIS_IN_HOUR, MILLIS_IN_MINUTE, MILLIS_IN_SECOND, MIN_YEAR,
};

/// Year-and-day-ordinal packing: `year << 9 | ordinal`, with the 0-based
/// day-of-year ordinal in the low 9 bits (`ordinal < 366`).
pub(crate) const ORDINAL_BITS: u32 = 9;
pub(crate) const ORDINAL_MASK: u32 = (1 << ORDINAL_BITS) - 1;

/// Month-and-day packing: `month0 << 5 | day0`, both 0-based.
pub(crate) const DAY_BITS: u32 = 5;
pub(crate) const DAY_MASK: u32 = (1 << DAY_BITS) - 1;

// Month boundary entry packing: `first_instant_millis << 16 | year << 5 |
// month0`. The year needs 11 bits and the largest offset fits in 41, so the
// packed entry stays within an i64.
const ENTRY_YEAR_SHIFT: u32 = 5;
const ENTRY_TIMESTAMP_SHIFT: u32 = ENTRY_YEAR_SHIFT + 11;

/// One entry per calendar month from 1970-01 to the 2038-01 sentinel.
pub(crate) const MONTH_TABLE_LEN: usize = (MAX_YEAR - MIN_YEAR) as usize * 12 + 1;

/// Per-month first-instant offsets with the (year, month) of each entry
/// packed alongside, built once at compile time.
static MONTHS: [i64; MONTH_TABLE_LEN] = build_month_table();

/// Non-leap day-of-year ordinal to packed month-and-day. Leap years are
/// served by the Feb 29 special case plus an index shift in
/// [`month_and_day`], so a second 366-entry table is never needed.
static ORDINAL_TO_MONTH_DAY: [u16; DAYS_IN_YEAR] = build_ordinal_table();

const fn build_month_table() -> [i64; MONTH_TABLE_LEN] {
    let mut table = [0i64; MONTH_TABLE_LEN];
    let mut next_month: i64 = 0;
    let mut i = 0;
    let mut year = MIN_YEAR;
    while year < MAX_YEAR {
        let is_leap_year = year % 4 == 0;
        let mut month = 0usize;
        while month < 12 {
            table[i] =
                (next_month << ENTRY_TIMESTAMP_SHIFT) | ((year as i64) << ENTRY_YEAR_SHIFT) | month as i64;
            let mut days = DAYS_IN_MONTH[month + 1] as i64;
            if is_leap_year && month == 1 {
                days += 1;
            }
            next_month += days * MILLIS_IN_DAY;
            month += 1;
            i += 1;
        }
        year += 1;
    }
    // Jan 2038 sentinel
    table[i] = (next_month << ENTRY_TIMESTAMP_SHIFT) | ((MAX_YEAR as i64) << ENTRY_YEAR_SHIFT);
    table
}

const fn build_ordinal_table() -> [u16; DAYS_IN_YEAR] {
    let mut table = [0u16; DAYS_IN_YEAR];
    let mut i = 0;
    let mut month = 0usize;
    while month < 12 {
        let mut day = 0u16;
        while day < DAYS_IN_MONTH[month + 1] as u16 {
            table[i] = ((month as u16) << DAY_BITS) | day;
            day += 1;
            i += 1;
        }
        month += 1;
    }
    table
}

/// Millisecond offset of the first instant of (year, month), by direct index
/// arithmetic into the month boundary table. Callers guarantee the pair lies
/// within the table's extent; `EpochMillis` constructors validate upstream.
#[inline]
pub(crate) fn month_start(year: u16, month: u8) -> i64 {
    debug_assert!((MIN_YEAR..=MAX_YEAR).contains(&year));
    debug_assert!((1..=12).contains(&month));
    debug_assert!(year < MAX_YEAR || month == 1, "table ends at 2038-01");
    let index = (year - MIN_YEAR) as usize * 12 + month as usize - 1;
    MONTHS[index] >> ENTRY_TIMESTAMP_SHIFT
}

/// Combines calendar fields into a millisecond timestamp.
#[inline]
pub(crate) fn fields_to_timestamp(
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    millis: u16,
) -> i64 {
    month_start(year, month)
        + i64::from(day - 1) * MILLIS_IN_DAY
        + i64::from(hour) * MILLIS_IN_HOUR
        + i64::from(minute) * MILLIS_IN_MINUTE
        + i64::from(second) * MILLIS_IN_SECOND
        + i64::from(millis)
}

/// Decomposes a timestamp into the packed year-and-day-ordinal value using
/// closed-form arithmetic over the 4-year leap cycle: no loops, no table
/// search. The third year of each cycle (1972, 1976, ...) is the leap year,
/// so the day thresholds within a cycle are 0, 365, 730 and 1096.
#[inline]
pub(crate) fn year_and_ordinal(timestamp: i64) -> u32 {
    debug_assert!((0..MAX_TIMESTAMP).contains(&timestamp));
    let day_of_epoch = timestamp / MILLIS_IN_DAY;
    let cycles = day_of_epoch / DAYS_IN_CYCLE;
    let day_in_cycle = day_of_epoch % DAYS_IN_CYCLE;
    let (year_in_cycle, first_day) = if day_in_cycle >= 1096 {
        (3, 1096)
    } else if day_in_cycle >= 730 {
        (2, 730)
    } else if day_in_cycle >= 365 {
        (1, 365)
    } else {
        (0, 0)
    };
    let year = i64::from(MIN_YEAR) + 4 * cycles + year_in_cycle;
    ((year as u32) << ORDINAL_BITS) | (day_in_cycle - first_day) as u32
}

/// Maps a packed year-and-day-ordinal to the packed month-and-day. In leap
/// years ordinal 59 is Feb 29 and every later ordinal shifts down by one, so
/// the single non-leap table serves both year kinds.
#[inline]
pub(crate) fn month_and_day(year_and_ordinal: u32) -> u32 {
    const MARCH_1_ORDINAL: u32 = 59;
    const FEB_29: u32 = (1 << DAY_BITS) | 28;

    let year = year_and_ordinal >> ORDINAL_BITS;
    let mut ordinal = year_and_ordinal & ORDINAL_MASK;
    if year % 4 == 0 {
        if ordinal == MARCH_1_ORDINAL {
            return FEB_29;
        }
        if ordinal > MARCH_1_ORDINAL {
            ordinal -= 1;
        }
    }
    u32::from(ORDINAL_TO_MONTH_DAY[ordinal as usize])
}

/// Unpacks a month boundary table entry into (offset, year, month).
#[cfg(test)]
pub(crate) fn month_entry(index: usize) -> (i64, u16, u8) {
    const ENTRY_MONTH_MASK: i64 = 0xf;
    const ENTRY_YEAR_MASK: i64 = 0x7ff;
    let entry = MONTHS[index];
    (
        entry >> ENTRY_TIMESTAMP_SHIFT,
        ((entry >> ENTRY_YEAR_SHIFT) & ENTRY_YEAR_MASK) as u16,
        (entry & ENTRY_MONTH_MASK) as u8 + 1,
    )
}
