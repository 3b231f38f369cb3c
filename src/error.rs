use chrono::NaiveDate;
use thiserror::Error;

/// Failure of a report computation. The command layer decides how these
/// render; most surface as an empty result with an error log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("malformed payment date: {0:?}")]
    MalformedDate(String),

    #[error("malformed timestamp: {0:?}")]
    MalformedTimestamp(String),

    #[error("no {currency} rate available on {date}")]
    RateUnavailable { currency: String, date: NaiveDate },

    #[error("report window cannot be computed back from {0}")]
    InvalidWindow(NaiveDate),

    #[error("user settings are unavailable")]
    SettingsUnavailable,
}
