use axum::{
    body::Body,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use std::time::Instant;

use crate::config::APP_CONFIG;

const REDACTED: &str = "[REDACTED]";

const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "password_confirm",
    "token",
    "access_token",
    "authorization",
    "secret",
    "credentials",
];

fn sensitive_headers() -> [header::HeaderName; 3] {
    [header::AUTHORIZATION, header::COOKIE, header::SET_COOKIE]
}

fn should_ignore_path(path: &str) -> bool {
    matches!(path, "/health" | "/api/v1/health") || path.starts_with("/swagger-ui")
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

fn filter_sensitive_data(mut value: Value) -> Value {
    if let Value::Object(ref mut map) = value {
        for field in SENSITIVE_FIELDS {
            if let Some(entry) = map.get_mut(*field) {
                *entry = Value::String(REDACTED.to_string());
            }
        }
    }
    value
}

fn filter_sensitive_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered = headers.clone();
    for name in sensitive_headers() {
        if filtered.contains_key(&name) {
            filtered.insert(name, HeaderValue::from_static(REDACTED));
        }
    }
    filtered
}

fn json_or_empty(bytes: &[u8]) -> Value {
    serde_json::from_slice::<Value>(bytes)
        .map(filter_sensitive_data)
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

/// Logs one line per request. JSON bodies are buffered and redacted;
/// multipart uploads and file downloads stream through untouched.
pub async fn http_logger(
    req: Request,
    next: Next,
) -> std::result::Result<impl IntoResponse, (StatusCode, String)> {
    let start_time = Instant::now();

    let method = req.method().clone();
    let uri = req.uri().clone();
    let path = uri.path().to_string();

    if should_ignore_path(&path) || method == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let req_headers = req.headers().clone();
    let x_request_id = req_headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let (req, req_body) = if is_multipart(&req_headers) {
        (req, Value::String("<multipart>".to_string()))
    } else {
        let (parts, body) = req.into_parts();
        let bytes = buffer_body("request", body).await?;
        let logged = json_or_empty(&bytes);
        (Request::from_parts(parts, Body::from(bytes)), logged)
    };

    let mut response = next.run(req).await;
    let latency = start_time.elapsed();
    let status = response.status();

    let is_json_response = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    let res_body = if is_json_response
        && matches!(method, Method::POST | Method::PUT | Method::DELETE)
    {
        let (parts, body) = response.into_parts();
        let bytes = buffer_body("response", body).await?;
        let logged = json_or_empty(&bytes);
        response = Response::from_parts(parts, Body::from(bytes));
        logged
    } else {
        Value::Object(serde_json::Map::new())
    };

    tracing::info!(
        method = %method,
        path = %path,
        query = uri.query().unwrap_or(""),
        x_request_id = %x_request_id,
        req_headers = ?filter_sensitive_headers(&req_headers),
        req_body = %req_body,
        status = status.as_u16(),
        latency_ms = latency.as_millis(),
        res_headers = ?filter_sensitive_headers(response.headers()),
        res_body = %res_body,
        app_env = %APP_CONFIG.app_env,
        "HTTP request completed"
    );

    Ok(response)
}

pub async fn buffer_body<B>(
    direction: &str,
    body: B,
) -> std::result::Result<Bytes, (StatusCode, String)>
where
    B: BodyExt,
    B::Error: std::fmt::Display,
{
    match body.collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) => Err((
            StatusCode::BAD_REQUEST,
            format!("failed to read {direction} body: {err}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_credentials_in_json_bodies() {
        let body = json!({
            "username": "alice",
            "password": "secret123",
            "password_confirm": "secret123"
        });
        let filtered = filter_sensitive_data(body);
        assert_eq!(filtered["username"], "alice");
        assert_eq!(filtered["password"], REDACTED);
        assert_eq!(filtered["password_confirm"], REDACTED);
    }

    #[test]
    fn redacts_auth_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let filtered = filter_sensitive_headers(&headers);
        assert_eq!(filtered[header::AUTHORIZATION], REDACTED);
        assert_eq!(filtered[header::ACCEPT], "application/json");
    }

    #[test]
    fn detects_multipart_uploads() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=x"),
        );
        assert!(is_multipart(&headers));
        assert!(!is_multipart(&HeaderMap::new()));
    }
}
