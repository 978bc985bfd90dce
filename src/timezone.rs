//! Resolves "today" in the user's timezone.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// Get the current UTC offset of a canonical timezone name, e.g. "Pacific/Auckland".
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Get today's date in `canonical_timezone`.
///
/// # Errors
/// Returns an [Error::InvalidTimezone] if `canonical_timezone` is not a known
/// timezone name.
pub fn today_in(canonical_timezone: &str) -> Result<Date, Error> {
    let offset = get_local_offset(canonical_timezone)
        .ok_or_else(|| Error::InvalidTimezone(canonical_timezone.to_owned()))?;

    Ok(OffsetDateTime::now_utc().to_offset(offset).date())
}
