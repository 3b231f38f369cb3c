use crate::error::ReportError;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

/// Payment dates in the bank export, e.g. "21.01.2025".
pub const PAYMENT_DATE_FORMAT: &str = "%d.%m.%Y";

/// Dashboard anchor timestamps, e.g. "2021-12-20 14:30:00".
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_payment_date(raw: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(raw, PAYMENT_DATE_FORMAT)
        .map_err(|_| ReportError::MalformedDate(raw.to_string()))
}

pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, ReportError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map_err(|_| ReportError::MalformedTimestamp(raw.to_string()))
}

/// First day of the month `date` falls in.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Rolling three-month window [start, end] for the category report.
///
/// The start is the day before `end` with its month moved back by three,
/// pulled into the previous year when the move lands past `end`. The move
/// keeps the day of month, so some end dates have no representable start:
/// an end date anchored in March maps to month zero, and a 31st can land
/// in a 30-day month.
pub fn report_window(end: NaiveDate) -> Result<(NaiveDate, NaiveDate), ReportError> {
    let anchor = end - Duration::days(1);
    let month = (anchor.month() + 9) % 12;
    let mut start = anchor
        .with_month(month)
        .ok_or(ReportError::InvalidWindow(end))?;
    if start > end {
        start = start
            .with_year(end.year() - 1)
            .ok_or(ReportError::InvalidWindow(end))?;
    }
    Ok((start, end))
}
