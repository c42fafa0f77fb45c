//! Request dispatch for the setlist.fm API.
//!
//! # Design
//! `SetlistClient` holds an immutable `ClientConfig` and a `Transport`, both
//! behind `Arc`, so clones are cheap and concurrent dispatches share nothing
//! mutable. A dispatch is a one-shot pipeline:
//!
//! ```text
//! Endpoint --build_request--> HttpRequest --Transport::send--> outcome --parse_response--> Result<R, ApiError>
//! ```
//!
//! A build failure resolves immediately without touching the transport.
//! There is no retry, cache or timeout at this layer.
//!
//! `dispatch` is the awaitable form. `dispatch_with` is the completion
//! callback form: it wraps `dispatch` in a `PendingRequest`, which does
//! nothing until `start` spawns it. Both resolve identically.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::endpoints::ApiRequest;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, TransportError};
use crate::request;
use crate::transport::{Transport, UreqTransport};

/// Client for the setlist.fm REST API.
pub struct SetlistClient<T = UreqTransport> {
    config: Arc<ClientConfig>,
    transport: Arc<T>,
}

impl<T> Clone for SetlistClient<T> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T> fmt::Debug for SetlistClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetlistClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SetlistClient<UreqTransport> {
    /// Client using the default ureq transport.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> SetlistClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the request for `endpoint` without sending it.
    pub fn build_request(&self, endpoint: &Endpoint) -> Result<HttpRequest, ApiError> {
        request::build_request(endpoint, &self.config)
    }

    /// Send `endpoint` and decode the body as `R`.
    pub fn dispatch<R>(&self, endpoint: Endpoint) -> impl Future<Output = Result<R, ApiError>> + Send + '_
    where
        R: DeserializeOwned + Send,
    {
        async move {
            let request = self.build_request(&endpoint)?;
            let outcome = self.transport.send(request).await;
            parse_response(outcome)
        }
    }

    /// Callback form of `dispatch`. `completion` runs exactly once with the
    /// outcome, after `PendingRequest::start` and unless the task is aborted.
    pub fn dispatch_with<R, F>(&self, endpoint: Endpoint, completion: F) -> PendingRequest
    where
        T: 'static,
        R: DeserializeOwned + Send + 'static,
        F: FnOnce(Result<R, ApiError>) + Send + 'static,
    {
        let client = self.clone();
        PendingRequest::new(async move {
            let outcome = client.dispatch::<R>(endpoint).await;
            completion(outcome);
        })
    }

    /// Send a typed request built by one of the `endpoints` functions.
    pub fn execute<R>(&self, request: ApiRequest<R>) -> impl Future<Output = Result<R, ApiError>> + Send + '_
    where
        R: DeserializeOwned + Send,
    {
        self.dispatch(request.into_endpoint())
    }

    /// Callback form of `execute`.
    pub fn execute_with<R, F>(&self, request: ApiRequest<R>, completion: F) -> PendingRequest
    where
        T: 'static,
        R: DeserializeOwned + Send + 'static,
        F: FnOnce(Result<R, ApiError>) + Send + 'static,
    {
        self.dispatch_with(request.into_endpoint(), completion)
    }
}

/// Classify a transport outcome and decode a successful body as `R`.
///
/// Success needs all of: no transport error, a 2xx status and a body.
/// Otherwise the error carries the status when a response exists (`-1` via
/// `ApiError::code` when not) and the transport's message when there is
/// one. A 2xx body that fails to decode keeps the response status.
pub fn parse_response<R: DeserializeOwned>(
    outcome: Result<HttpResponse, TransportError>,
) -> Result<R, ApiError> {
    let response = match outcome {
        Ok(response) => response,
        Err(err) => {
            let status = err.response.as_ref().map(|response| response.status);
            debug!(?status, error = %err.message, "transport failed");
            return Err(ApiError::Http {
                status,
                message: Some(err.message),
            });
        }
    };

    let status = response.status;
    if !response.is_success() {
        debug!(status, "unsuccessful status");
        return Err(ApiError::Http {
            status: Some(status),
            message: None,
        });
    }
    let Some(body) = response.body else {
        debug!(status, "response without body");
        return Err(ApiError::Http {
            status: Some(status),
            message: None,
        });
    };

    serde_json::from_slice(&body).map_err(|e| {
        warn!(status, error = %e, "response body did not match the expected shape");
        ApiError::Decode {
            status,
            message: e.to_string(),
        }
    })
}

/// A dispatch that has been prepared but not started.
///
/// Dropping it without starting performs no I/O. The `JoinHandle` returned
/// by `start` can be aborted to cancel the exchange; the completion is then
/// never invoked.
#[must_use = "a PendingRequest does nothing until started"]
pub struct PendingRequest {
    task: Pin<Box<dyn Future<Output = ()> + Send + 'static>>,
}

impl PendingRequest {
    fn new(task: impl Future<Output = ()> + Send + 'static) -> Self {
        Self { task: Box::pin(task) }
    }

    /// Spawn onto the current tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime, like `tokio::spawn`.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(self.task)
    }

    /// Spawn onto the runtime behind `handle`.
    pub fn start_on(self, handle: &Handle) -> JoinHandle<()> {
        handle.spawn(self.task)
    }
}

impl fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest").finish_non_exhaustive()
    }
}
