//! Network transport for crawlers
//!
//! This module performs single HTTP fetches on behalf of crawlers:
//! - One physical attempt per call, no retries
//! - Connect and total timeouts enforced by the HTTP client itself
//! - A fresh connection for every fetch (no pooling, `Connection: close`)
//! - Timing telemetry for name lookup, connect and total time
//! - Translation of client failures into [`NetworkError`]

mod request;
mod response;
mod timing;

pub use request::{Request, DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT};
pub use response::{Response, Timings};

use crate::{NetworkError, NetworkResult, NETWORK_LOG_TARGET};
use reqwest::header::{HeaderValue, CONNECTION};
use reqwest::{redirect::Policy, Client};
use std::sync::Arc;
use timing::{ConnectTimingLayer, TimedResolver, TimingProbe};

/// Performs fetches for crawlers
///
/// A `Transport` holds only immutable settings. Every call builds its own
/// client, connection and body buffer, so one value can be cloned into many
/// tasks and used concurrently.
#[derive(Debug, Clone)]
pub struct Transport {
    user_agent: String,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            user_agent: format!("crawlkit/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Transport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the User-Agent sent with every request
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Builds the client used for exactly one request
    ///
    /// # Arguments
    ///
    /// * `req` - The request whose timeouts and redirect limit apply
    /// * `probe` - Timing probe shared with the resolver and connector layer
    ///
    /// # Returns
    ///
    /// * `Ok(Client)` - Client that never keeps idle connections and never
    ///   negotiates content encoding, so bodies arrive as sent on the wire
    /// * `Err(reqwest::Error)` - The client could not be built (e.g. TLS backend failure)
    fn build_client(&self, req: &Request, probe: &Arc<TimingProbe>) -> Result<Client, reqwest::Error> {
        let redirect = match req.max_redirects() {
            0 => Policy::none(),
            n => Policy::limited(n),
        };

        Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(req.timeout())
            .connect_timeout(req.connect_timeout())
            .redirect(redirect)
            .pool_max_idle_per_host(0)
            .dns_resolver(Arc::new(TimedResolver::new(Arc::clone(probe))))
            .connector_layer(ConnectTimingLayer::new(Arc::clone(probe)))
            .build()
    }

    /// Performs one fetch
    ///
    /// # Request Flow
    ///
    /// 1. Validate the request (URL scheme, non-zero timeouts)
    /// 2. Build a client scoped to this call
    /// 3. Send the request with `Connection: close` and read the full body
    /// 4. Collect status, effective URL, byte counts and timings
    ///
    /// The client, and with it the connection, is released when the call
    /// returns, on success and on every failure path.
    ///
    /// # Arguments
    ///
    /// * `req` - The request to perform
    ///
    /// # Returns
    ///
    /// * `Ok(Response)` - The fetch completed, whatever the HTTP status
    /// * `Err(NetworkError)` - DNS failure, refused connection, timeout, TLS or protocol failure
    pub async fn process_request(&self, req: &Request) -> NetworkResult<Response> {
        let url = req.validate()?;
        let probe = Arc::new(TimingProbe::start());
        let client = self
            .build_client(req, &probe)
            .map_err(|e| NetworkError::from_reqwest(req.url(), e))?;

        tracing::debug!(
            target: NETWORK_LOG_TARGET,
            url = req.url(),
            timeout = req.timeout().as_secs_f64(),
            connect_timeout = req.connect_timeout().as_secs_f64(),
            "Sending request"
        );

        let builder = match req.body() {
            Some(body) => client.post(url).body(body.clone()),
            None => client.get(url),
        };
        let outcome = async {
            let response = builder
                .header(CONNECTION, HeaderValue::from_static("close"))
                .send()
                .await?;
            let code = response.status().as_u16();
            let effective_url = response.url().to_string();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((code, effective_url, body))
        }
        .await;

        let total = probe.elapsed();

        match outcome {
            Ok((code, effective_url, body)) => {
                let times = Timings::new(probe.name_lookup(), probe.connect_or(total), total);
                let bytes_uploaded = req.body().map_or(0, |b| b.len() as u64);
                let response = Response::new(
                    code,
                    req.url().to_string(),
                    effective_url,
                    body,
                    bytes_uploaded,
                    times,
                );

                tracing::debug!(
                    target: NETWORK_LOG_TARGET,
                    url = req.url(),
                    code,
                    effective_url = response.effective_url(),
                    bytes = response.bytes_downloaded(),
                    name_lookup = times.name_lookup_secs(),
                    connect = times.connect_secs(),
                    total = times.total_secs(),
                    "Request completed"
                );
                Ok(response)
            }
            Err(e) => {
                let err = NetworkError::from_reqwest(req.url(), e);
                tracing::debug!(
                    target: NETWORK_LOG_TARGET,
                    url = req.url(),
                    kind = %err.kind,
                    elapsed = total.as_secs_f64(),
                    "Request failed: {}",
                    err.message
                );
                Err(err)
            }
        }
    }
}
