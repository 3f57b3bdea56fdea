//! REST endpoint construction.
//!
//! - `GET {base}/providers`
//! - `GET {base}/providers/{id}/day-availability?year=Y&month=M&day=D`

use barberslot_core::CalendarDate;
use url::Url;

use crate::error::FetchError;

/// Builds request URLs relative to an API base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Parses the API base URL. Any query or fragment is dropped.
    pub fn new(base: &str) -> Result<Self, FetchError> {
        let mut base = Url::parse(base)?;
        if base.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(format!("{base} cannot be a base URL")));
        }
        base.set_query(None);
        base.set_fragment(None);
        Ok(Self { base })
    }

    /// Returns the base URL.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `GET /providers`.
    pub fn providers(&self) -> Url {
        self.with_segments(&["providers"])
    }

    /// `GET /providers/{provider_id}/day-availability`.
    ///
    /// The provider id is percent-encoded as one path segment. The month is
    /// sent 1-indexed.
    pub fn day_availability(&self, provider_id: &str, date: CalendarDate) -> Url {
        let mut url = self.with_segments(&["providers", provider_id, "day-availability"]);
        url.query_pairs_mut()
            .append_pair("year", &date.year().to_string())
            .append_pair("month", &date.month().to_string())
            .append_pair("day", &date.day().to_string());
        url
    }

    fn with_segments(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // `new` rejected cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
