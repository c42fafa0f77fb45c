//! The network seam.
//!
//! # Design
//! `Transport` is the only place the client suspends. Implementations
//! return a lazy future: constructing it performs no I/O, and the exchange
//! starts on first poll. Dropping the future (or aborting the task that
//! polls it) is the cancellation mechanism; the dispatcher adds no timeout
//! or retry of its own.
//!
//! `UreqTransport` is the default. ureq is blocking, so each exchange runs
//! on tokio's blocking pool. `StaticTransport` replays a fixed outcome and
//! records what it was asked to send, for deterministic tests.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use bytes::Bytes;

use crate::http::{HttpMethod, HttpRequest, HttpResponse, TransportError};

/// Performs one HTTP exchange per call.
pub trait Transport: Send + Sync {
    /// Execute `request`. Resolves exactly once, with either a response
    /// (any status) or a transport error.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// Blocking ureq agent driven from `tokio::task::spawn_blocking`.
///
/// 4xx/5xx statuses are returned as responses, not errors, so status
/// interpretation stays with the dispatcher.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::from_agent(
            ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent(),
        )
    }

    /// Agent with an overall per-request deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::from_agent(
            ureq::Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(Some(timeout))
                .build()
                .new_agent(),
        )
    }

    /// Wrap a caller-configured agent. It should be built with
    /// `http_status_as_error(false)`; otherwise non-2xx statuses surface as
    /// transport errors without a status code.
    pub fn from_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        let agent = self.agent.clone();
        async move {
            tokio::task::spawn_blocking(move || execute(&agent, request))
                .await
                .unwrap_or_else(|e| Err(TransportError::new(format!("transport task failed: {e}"))))
        }
    }
}

fn execute(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    let mut builder = match request.method {
        HttpMethod::Get => agent.get(request.url.as_str()),
    };
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let mut response = builder
        .call()
        .map_err(|e| TransportError::new(e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect::<Vec<_>>();

    match response.body_mut().read_to_vec() {
        Ok(body) => Ok(HttpResponse {
            status,
            headers,
            body: Some(Bytes::from(body)),
        }),
        Err(e) => Err(TransportError::with_response(
            e.to_string(),
            HttpResponse {
                status,
                headers,
                body: None,
            },
        )),
    }
}

/// Replays the same outcome for every request and records the requests.
#[derive(Debug)]
pub struct StaticTransport {
    outcome: Result<HttpResponse, TransportError>,
    calls: AtomicUsize,
    requests: Mutex<Vec<HttpRequest>>,
}

impl StaticTransport {
    pub fn new(outcome: Result<HttpResponse, TransportError>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answer `status` with `body` as a JSON payload.
    pub fn json(status: u16, body: impl Into<Bytes>) -> Self {
        Self::new(Ok(HttpResponse::json(status, body)))
    }

    /// Number of exchanges started so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl Transport for StaticTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        let outcome = self.outcome.clone();
        async move { outcome }
    }
}
