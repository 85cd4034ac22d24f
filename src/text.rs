//! Text codec: fixed-width ASCII emission of the ISO-8601 form
//! (`YYYY-MM-DDTHH:MM:SS[.mmm]Z`) and the fixed-offset inverse parse.
//!
//! Emission writes zero-padded digit runs right-to-left into a stack buffer;
//! there is no dynamic formatting machinery and no allocation beyond the
//! caller's output string.

use crate::calendar::{self, DAY_BITS, DAY_MASK, ORDINAL_BITS};
use crate::consts::{
    DATE_SEPARATOR, MAX_TIMESTAMP, MILLIS_IN_DAY, MILLIS_IN_HOUR, MILLIS_IN_MINUTE,
    MILLIS_IN_SECOND, TIME_SEPARATOR, UTC_SUFFIX,
};
use crate::types::CalendarFields;
use crate::{EpochMillis, ParseError};

/// Formatted length without a millisecond suffix
pub(crate) const ISO_SHORT_LEN: usize = 20;
/// Formatted length with a millisecond suffix
pub(crate) const ISO_FULL_LEN: usize = 24;
/// Formatted length of the date-only form
pub(crate) const DATE_LEN: usize = 10;
/// Maximum formatted length of the time-only form
pub(crate) const TIME_FULL_LEN: usize = 12;

/// Zero-padded digit emission, right to left: repeated division by ten into
/// the `start..stop` byte range.
fn emit(buf: &mut [u8], mut value: u32, start: usize, stop: usize) {
    let mut i = stop;
    while i > start {
        i -= 1;
        buf[i] = b'0' + (value % 10) as u8;
        value /= 10;
    }
}

fn emit_date(buf: &mut [u8], timestamp: i64) {
    let year_and_ordinal = calendar::year_and_ordinal(timestamp);
    let month_and_day = calendar::month_and_day(year_and_ordinal);
    buf[4] = DATE_SEPARATOR;
    buf[7] = DATE_SEPARATOR;
    emit(buf, year_and_ordinal >> ORDINAL_BITS, 0, 4);
    emit(buf, (month_and_day >> DAY_BITS) + 1, 5, 7);
    emit(buf, (month_and_day & DAY_MASK) + 1, 8, 10);
}

/// Emits `HH:MM:SS` at `offset` and `.mmm` after it when millis are nonzero.
/// Returns the exclusive end of what was written.
fn emit_time(buf: &mut [u8], timestamp: i64, offset: usize) -> usize {
    let time = timestamp % MILLIS_IN_DAY;
    let millis = (time % MILLIS_IN_SECOND) as u32;
    let seconds = (time / MILLIS_IN_SECOND % 60) as u32;
    let minutes = (time / MILLIS_IN_MINUTE % 60) as u32;
    let hours = (time / MILLIS_IN_HOUR) as u32;
    buf[offset + 2] = b':';
    buf[offset + 5] = b':';
    emit(buf, hours, offset, offset + 2);
    emit(buf, minutes, offset + 3, offset + 5);
    emit(buf, seconds, offset + 6, offset + 8);
    if millis > 0 {
        buf[offset + 8] = b'.';
        emit(buf, millis, offset + 9, offset + 12);
        offset + 12
    } else {
        offset + 8
    }
}

/// Writes the full ISO-8601 form and returns its length: exactly
/// [`ISO_SHORT_LEN`] when the millisecond field is zero, else
/// [`ISO_FULL_LEN`].
pub(crate) fn format_into(buf: &mut [u8; ISO_FULL_LEN], timestamp: i64) -> usize {
    debug_assert!((0..MAX_TIMESTAMP).contains(&timestamp));
    emit_date(buf, timestamp);
    buf[10] = TIME_SEPARATOR;
    let end = emit_time(buf, timestamp, 11);
    buf[end] = UTC_SUFFIX;
    end + 1
}

/// Writes the date-only form `YYYY-MM-DD`.
pub(crate) fn format_date_into(buf: &mut [u8; DATE_LEN], timestamp: i64) {
    debug_assert!((0..MAX_TIMESTAMP).contains(&timestamp));
    emit_date(buf, timestamp);
}

/// Writes the time-only form `HH:MM:SS[.mmm]` and returns its length.
pub(crate) fn format_time_into(buf: &mut [u8; TIME_FULL_LEN], timestamp: i64) -> usize {
    debug_assert!((0..MAX_TIMESTAMP).contains(&timestamp));
    emit_time(buf, timestamp, 0)
}

/// Reads a fixed-width zero-padded decimal run.
fn read_number(bytes: &[u8], begin: usize, width: usize, end: usize) -> Result<u32, ParseError> {
    if begin + width > end {
        return Err(ParseError::TooShort(bytes.len()));
    }
    let mut value = 0u32;
    for (i, &byte) in bytes[begin..begin + width].iter().enumerate() {
        if !byte.is_ascii_digit() {
            return Err(ParseError::UnexpectedChar(byte as char, begin + i));
        }
        value = value * 10 + u32::from(byte - b'0');
    }
    Ok(value)
}

/// Like [`read_number`], but a field truncated clean off the end of the
/// input defaults to zero. This is what admits date-only and
/// date-plus-partial-time inputs.
fn read_optional(bytes: &[u8], begin: usize, width: usize, end: usize) -> Result<u32, ParseError> {
    if begin + width > end {
        Ok(0)
    } else {
        read_number(bytes, begin, width, end)
    }
}

/// Parses either the separated ISO-8601 form (`2020-02-12T03:30:20.034Z`),
/// the compact digit run (`20200212033020034`), or any prefix of either
/// truncated after a complete field.
///
/// Field reads sit at fixed offsets; a literal `-` at offset 4 decides
/// whether separator-width gaps are skipped. Separator bytes other than that
/// hyphen are stepped over without being inspected, as in the compact form
/// they simply do not exist. Digit runs are validated and every field is
/// range-checked, so malformed text yields a typed error.
pub(crate) fn parse(input: &str) -> Result<EpochMillis, ParseError> {
    let bytes = input.as_bytes();
    let mut end = bytes.len();
    // shortest accepted form is the compact date: YYYYMMDD
    if end < 8 {
        return Err(ParseError::TooShort(end));
    }
    let gap = usize::from(bytes[4] == DATE_SEPARATOR);
    if gap == 1 && bytes[end - 1] == UTC_SUFFIX {
        end -= 1;
    }
    let year = read_number(bytes, 0, 4, end)?;
    let mut begin = 4 + gap;
    let month = read_number(bytes, begin, 2, end)?;
    begin += 2 + gap;
    let day = read_number(bytes, begin, 2, end)?;
    begin += 2 + gap;
    let hour = read_optional(bytes, begin, 2, end)?;
    begin += 2 + gap;
    let minute = read_optional(bytes, begin, 2, end)?;
    begin += 2 + gap;
    let second = read_optional(bytes, begin, 2, end)?;
    begin += 2 + gap;
    let millis = read_optional(bytes, begin, 3, end)?;

    let fields = CalendarFields::new(
        year as u16,
        month as u8,
        day as u8,
        hour as u8,
        minute as u8,
        second as u8,
        millis as u16,
    )?;
    Ok(EpochMillis::from_fields(fields)?)
}
