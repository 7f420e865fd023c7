//! Public types for the sessions API
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::public::RequestError;
pub use crate::store::{MostRecentMessage, SessionSummary};
pub use crate::transcript::ViewModelEntry;

/// Spelling of the `date` filter that lists every session.
pub const ALL_DATES: &str = "all";

#[derive(Deserialize, Default)]
pub struct SessionsQuery {
    // YYYY-MM-DD or "all"
    pub date: Option<String>,
    pub q: Option<String>,
}

/// Parse the `date` filter. Missing, empty or `all` means no filter.
pub fn parse_date_filter(date: Option<&str>) -> Result<Option<NaiveDate>, RequestError> {
    match date.map(str::trim) {
        None | Some("") | Some(ALL_DATES) => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| RequestError::InvalidDate(raw.to_string())),
    }
}
