//! Completed fetch results and timing telemetry

use bytes::Bytes;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Timing breakdown of one fetch
///
/// All samples are cumulative from the start of the call, so
/// `name_lookup <= connect <= total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Timings {
    #[serde(serialize_with = "as_secs")]
    name_lookup: Duration,
    #[serde(serialize_with = "as_secs")]
    connect: Duration,
    #[serde(serialize_with = "as_secs")]
    total: Duration,
}

impl Timings {
    /// Builds a timing record, clamping samples so the ordering invariant holds
    pub fn new(name_lookup: Duration, connect: Duration, total: Duration) -> Self {
        let connect = connect.min(total);
        let name_lookup = name_lookup.min(connect);
        Self {
            name_lookup,
            connect,
            total,
        }
    }

    pub fn name_lookup(&self) -> Duration {
        self.name_lookup
    }

    pub fn connect(&self) -> Duration {
        self.connect
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn name_lookup_secs(&self) -> f64 {
        self.name_lookup.as_secs_f64()
    }

    pub fn connect_secs(&self) -> f64 {
        self.connect.as_secs_f64()
    }

    pub fn total_secs(&self) -> f64 {
        self.total.as_secs_f64()
    }

    /// Returns the samples keyed `name_lookup`, `connect` and `total`, in seconds
    pub fn as_map(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([
            ("name_lookup", self.name_lookup_secs()),
            ("connect", self.connect_secs()),
            ("total", self.total_secs()),
        ])
    }
}

fn as_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Result of a successful fetch
///
/// Produced exactly once per successful transport call and owned by the
/// caller afterwards.
#[derive(Debug, Clone)]
pub struct Response {
    code: u16,
    url: String,
    effective_url: String,
    body: Bytes,
    bytes_downloaded: u64,
    bytes_uploaded: u64,
    times: Timings,
}

impl Response {
    pub(crate) fn new(
        code: u16,
        url: String,
        effective_url: String,
        body: Bytes,
        bytes_uploaded: u64,
        times: Timings,
    ) -> Self {
        Self {
            code,
            url,
            effective_url,
            bytes_downloaded: body.len() as u64,
            body,
            bytes_uploaded,
            times,
        }
    }

    /// HTTP status code of the final response
    pub fn code(&self) -> u16 {
        self.code
    }

    /// URL the request was made for
    pub fn url(&self) -> &str {
        &self.url
    }

    /// URL after following redirects
    pub fn effective_url(&self) -> &str {
        &self.effective_url
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consumes the response, returning the raw body
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Body decoded as UTF-8, with invalid sequences replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn bytes_downloaded(&self) -> u64 {
        self.bytes_downloaded
    }

    pub fn bytes_uploaded(&self) -> u64 {
        self.bytes_uploaded
    }

    pub fn times(&self) -> &Timings {
        &self.times
    }

    /// Returns true for 2xx status codes
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}
