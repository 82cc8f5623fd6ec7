//! Outbound fetch description

use crate::{NetworkError, NetworkResult};
use bytes::Bytes;
use std::time::Duration;
use url::Url;

/// Default total timeout applied by [`Request::new`]
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout applied by [`Request::new`]
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of redirect hops followed before giving up
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// A single outbound fetch
///
/// Built once by a crawler before each fetch and never mutated afterwards:
/// the `with_*` methods consume the request and return a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    url: String,
    timeout: Duration,
    connect_timeout: Duration,
    body: Option<Bytes>,
    max_redirects: usize,
}

impl Request {
    /// Creates a GET request with the default timeouts
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            body: None,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }

    /// Alias of [`Request::new`] that reads better at call sites
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(url)
    }

    /// Creates a GET request from timeouts given in (fractional) seconds
    ///
    /// # Arguments
    ///
    /// * `url` - The target URL
    /// * `timeout` - Total timeout in seconds, must be > 0
    /// * `connect_timeout` - Connect timeout in seconds, must be > 0
    ///
    /// # Returns
    ///
    /// * `Ok(Request)` - The request
    /// * `Err(NetworkError)` - A timeout was zero, negative or not finite
    pub fn from_secs(
        url: impl Into<String>,
        timeout: f64,
        connect_timeout: f64,
    ) -> NetworkResult<Self> {
        let url = url.into();
        let timeout = secs_to_duration(&url, "timeout", timeout)?;
        let connect_timeout = secs_to_duration(&url, "connect_timeout", connect_timeout)?;
        Ok(Self::new(url)
            .with_timeout(timeout)
            .with_connect_timeout(connect_timeout))
    }

    /// Sets the total timeout, covering connect, transfer and body download
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connect timeout
    ///
    /// It is not checked against the total timeout; whichever expires first
    /// ends the fetch.
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Attaches a request body, turning the fetch into a POST
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets how many redirects are followed; 0 disables following
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    /// Checks the request before any I/O is attempted
    ///
    /// Timeouts must be non-zero and the URL must be an absolute http(s) URL.
    pub fn validate(&self) -> NetworkResult<Url> {
        if self.timeout.is_zero() {
            return Err(NetworkError::invalid_request(
                &self.url,
                "timeout must be greater than zero",
            ));
        }
        if self.connect_timeout.is_zero() {
            return Err(NetworkError::invalid_request(
                &self.url,
                "connect_timeout must be greater than zero",
            ));
        }

        let parsed = Url::parse(&self.url).map_err(|e| {
            NetworkError::invalid_request(&self.url, format!("invalid URL: {}", e))
        })?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(NetworkError::invalid_request(
                &self.url,
                format!("unsupported scheme '{}'", other),
            )),
        }
    }
}

fn secs_to_duration(url: &str, field: &str, secs: f64) -> NetworkResult<Duration> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(NetworkError::invalid_request(
            url,
            format!("{} must be a positive number of seconds, got {}", field, secs),
        ));
    }
    Ok(Duration::from_secs_f64(secs))
}
