//! Request logging middleware.
//!
//! Logs every HTTP request with method, path, status code, and latency.
//! Headers and bodies are never logged: they carry passwords and tokens.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Notes a request whose future was dropped before a response existed.
struct AbandonGuard {
    method: String,
    path: String,
    start: Instant,
    completed: bool,
}

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        if !self.completed {
            // Caller went away; not a fault.
            debug!(
                method = %self.method,
                path = %self.path,
                elapsed_ms = self.start.elapsed().as_millis() as u64,
                "Request cancelled by caller"
            );
        }
    }
}

/// Middleware that logs HTTP requests with timing information.
///
/// Logs at INFO level for completed requests, WARN level for 5xx.
pub async fn request_logging(request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path().to_string();

    // Skip logging for health checks to reduce noise
    if path == "/health" {
        return next.run(request).await;
    }

    let method = request.method().to_string();
    let start = Instant::now();
    let mut guard = AbandonGuard {
        method: method.clone(),
        path: path.clone(),
        start,
        completed: false,
    };

    let response = next.run(request).await;
    guard.completed = true;

    let latency = start.elapsed();
    let status = response.status().as_u16();

    if status == 499 {
        debug!(
            method = %method,
            path = %path,
            latency_ms = latency.as_millis() as u64,
            "Request cancelled upstream"
        );
    } else if status >= 500 {
        warn!(
            method = %method,
            path = %path,
            status = status,
            latency_ms = latency.as_millis() as u64,
            "Request failed (5xx)"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status = status,
            latency_ms = latency.as_millis() as u64,
            "Request completed"
        );
    }

    response
}
