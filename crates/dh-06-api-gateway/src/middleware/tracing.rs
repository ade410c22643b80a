//! Request tracing middleware.
//!
//! Opens one `http_request` span per request, tags it with a request id and
//! the final status, and feeds the HTTP counters and latency histogram.

use axum::http::{HeaderValue, Request};
use axum::{body::Body, response::Response};
use hub_telemetry::{HTTP_REQUESTS, HTTP_REQUEST_DURATION};
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use tracing::{info, info_span, Instrument, Span};
use uuid::Uuid;

/// Header carrying the request id in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tracing layer that creates spans for each request
#[derive(Clone, Default)]
pub struct TracingLayer;

impl TracingLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for TracingLayer {
    type Service = TracingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TracingService { inner }
    }
}

/// Tracing service
#[derive(Clone)]
pub struct TracingService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for TracingService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();

        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let request_id = request_id(&req);

        let span = info_span!(
            "http_request",
            http.method = %method,
            http.path = %path,
            request_id = %request_id,
            http.status = tracing::field::Empty,
        );

        Box::pin(
            async move {
                let started = Instant::now();
                let result = inner.call(req).await;
                let elapsed = started.elapsed();

                HTTP_REQUEST_DURATION
                    .with_label_values(&[method.as_str()])
                    .observe(elapsed.as_secs_f64());

                match result {
                    Ok(mut response) => {
                        let status = response.status();
                        Span::current().record("http.status", status.as_u16());
                        HTTP_REQUESTS
                            .with_label_values(&[method.as_str(), status.as_str()])
                            .inc();
                        info!(
                            status = status.as_u16(),
                            elapsed_ms = elapsed.as_millis() as u64,
                            "request completed"
                        );
                        if let Ok(value) = HeaderValue::from_str(&request_id) {
                            response.headers_mut().insert(REQUEST_ID_HEADER, value);
                        }
                        Ok(response)
                    }
                    Err(err) => Err(err),
                }
            }
            .instrument(span),
        )
    }
}

/// Caller-supplied id when it is a sane header value, otherwise a fresh UUID.
fn request_id<B>(req: &Request<B>) -> String {
    req.headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
