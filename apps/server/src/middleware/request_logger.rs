//! Request logging with a per-request correlation id.
//!
//! Every request gets a [`RequestId`]. It is stored in the request extensions,
//! returned in the `x-request-id` response header and recorded on a tracing
//! span that wraps the handler, so pipeline logs carry the same id as the
//! request log lines. Upload bodies are never read here.

use std::convert::Infallible;
use std::future::{Ready, ready};
use std::time::Instant;

use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{CONTENT_LENGTH, HeaderName, HeaderValue};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

/// Response header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id shared by the request log and the analysis it triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Handlers take the id set by [`RequestLogger`]. Without the middleware a
/// fresh id is generated so the handler still has one.
impl FromRequest for RequestId {
    type Error = Infallible;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let id = req
            .extensions()
            .get::<RequestId>()
            .copied()
            .unwrap_or_else(|| RequestId(Uuid::new_v4()));
        ready(Ok(id))
    }
}

/// Request logger middleware factory.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware { service }))
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let request_id = RequestId(Uuid::new_v4());
        req.extensions_mut().insert(request_id);

        let span = info_span!(
            target: "api",
            "request",
            request_id = %request_id,
            method = %req.method(),
            path = %req.path(),
        );

        let upload_bytes = req
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let remote_addr = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();

        span.in_scope(|| {
            info!(
                target: "api",
                query = %req.query_string(),
                remote_addr = %remote_addr,
                upload_bytes = ?upload_bytes,
                "Request started"
            );
        });

        let fut = self.service.call(req);

        Box::pin(
            async move {
                let mut res = fut.await?;
                let status = res.status();
                let duration_ms = start.elapsed().as_millis() as u64;

                if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                    res.headers_mut()
                        .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                }

                if status.is_client_error() || status.is_server_error() {
                    warn!(target: "api", status = status.as_u16(), duration_ms, "Request failed");
                } else {
                    info!(target: "api", status = status.as_u16(), duration_ms, "Request completed");
                }

                Ok(res)
            }
            .instrument(span),
        )
    }
}
