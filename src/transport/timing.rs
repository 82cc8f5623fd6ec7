//! Per-call timing capture
//!
//! reqwest does not report where the time of a fetch went, so the client built
//! for each call gets two probes sharing one [`TimingProbe`]: a DNS resolver
//! that marks when name resolution finished, and a connector layer that marks
//! when the connection (TCP and, for https, TLS) was established. Marks are
//! offsets from the start of the call.

use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tower::{Layer, Service};

/// Shared clock for one transport call
#[derive(Debug)]
pub(crate) struct TimingProbe {
    started: Instant,
    name_lookup: OnceLock<Duration>,
    connect: OnceLock<Duration>,
}

impl TimingProbe {
    pub(crate) fn start() -> Self {
        Self {
            started: Instant::now(),
            name_lookup: OnceLock::new(),
            connect: OnceLock::new(),
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    // Only the first hop is recorded; redirects may open further connections.
    fn mark_name_lookup(&self) {
        let _ = self.name_lookup.set(self.elapsed());
    }

    fn mark_connect(&self) {
        let _ = self.connect.set(self.elapsed());
    }

    /// Name lookup offset, zero when the host was an IP literal
    pub(crate) fn name_lookup(&self) -> Duration {
        self.name_lookup.get().copied().unwrap_or_default()
    }

    /// Connect offset, `fallback` when no connection was observed
    pub(crate) fn connect_or(&self, fallback: Duration) -> Duration {
        self.connect.get().copied().unwrap_or(fallback)
    }
}

/// System resolver that records when resolution completed
#[derive(Debug, Clone)]
pub(crate) struct TimedResolver {
    probe: Arc<TimingProbe>,
}

impl TimedResolver {
    pub(crate) fn new(probe: Arc<TimingProbe>) -> Self {
        Self { probe }
    }
}

impl Resolve for TimedResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let probe = Arc::clone(&self.probe);
        let host = name.as_str().to_string();
        Box::pin(async move {
            // Port is replaced by the connector with the one from the URL
            let addrs: Vec<_> = tokio::net::lookup_host((host.as_str(), 0)).await?.collect();
            probe.mark_name_lookup();
            let addrs: Addrs = Box::new(addrs.into_iter());
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(addrs)
        })
    }
}

/// Connector layer that records when a connection is ready
#[derive(Debug, Clone)]
pub(crate) struct ConnectTimingLayer {
    probe: Arc<TimingProbe>,
}

impl ConnectTimingLayer {
    pub(crate) fn new(probe: Arc<TimingProbe>) -> Self {
        Self { probe }
    }
}

impl<S> Layer<S> for ConnectTimingLayer {
    type Service = ConnectTiming<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ConnectTiming {
            inner,
            probe: Arc::clone(&self.probe),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ConnectTiming<S> {
    inner: S,
    probe: Arc<TimingProbe>,
}

impl<S, R> Service<R> for ConnectTiming<S>
where
    S: Service<R> + 'static,
    S::Future: Send + 'static,
    R: 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<S::Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: R) -> Self::Future {
        let probe = Arc::clone(&self.probe);
        let connecting = self.inner.call(req);
        Box::pin(async move {
            let conn = connecting.await;
            if conn.is_ok() {
                probe.mark_connect();
            }
            conn
        })
    }
}
