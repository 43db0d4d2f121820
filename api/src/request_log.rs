use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Reads the request id a caller (or this middleware) attached, or `-`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
}

/// Health checks arrive constantly; keep them out of the info log.
fn log_level_for(path: &str) -> log::Level {
    if path == "/health" {
        log::Level::Debug
    } else {
        log::Level::Info
    }
}

/// Tags every request with an id, logs its outcome and echoes the id back.
pub async fn request_log_middleware(mut request: Request, next: Next) -> Response {
    let incoming = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string);
    let id = incoming.unwrap_or_else(|| Uuid::new_v4().to_string());

    // A client-supplied id is a valid header value already, a uuid always is.
    let id_value = HeaderValue::from_str(&id).ok();
    if let Some(value) = &id_value {
        request.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
    }

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let mut response = next.run(request).await;

    log::log!(
        log_level_for(&path),
        "[{}] {} {} -> {} in {}ms",
        id,
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );

    if let Some(value) = id_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
