/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Request middleware: response headers, bearer auth, content negotiation
//! and access logging

use super::error::ApiError;
use crate::version;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use log::{debug, log, Level};
use std::net::SocketAddr;
use std::sync::Arc;

const COMMIT_HEADER: HeaderName = HeaderName::from_static("x-rpinfo-commit");
const VERSION_HEADER: HeaderName = HeaderName::from_static("x-rpinfo-version");

/// Bearer token settings shared by the auth middleware
#[derive(Debug, Clone, Default)]
pub struct BearerAuth {
    token: Option<Arc<str>>,
}

impl BearerAuth {
    /// Accept every request
    pub fn disabled() -> Self {
        Self { token: None }
    }

    /// Require `Authorization: Bearer <token>`
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Some(Arc::from(token)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }

    fn check(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let Some(expected) = self.token.as_deref() else {
            return Ok(());
        };

        let value = headers
            .get(header::AUTHORIZATION)
            .filter(|v| !v.is_empty())
            .ok_or(ApiError::Unauthorized)?;

        let presented = value
            .to_str()
            .ok()
            .and_then(|v| v.split_once(' '))
            .filter(|(scheme, _)| *scheme == "Bearer")
            .map(|(_, token)| token);

        if presented == Some(expected) {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

/// Tag responses with version information and the JSON content type
pub async fn response_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    if let Ok(commit) = HeaderValue::from_str(version::commit()) {
        headers.insert(COMMIT_HEADER, commit);
    }
    if let Ok(release) = HeaderValue::from_str(version::release()) {
        headers.insert(VERSION_HEADER, release);
    }
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    response
}

/// Reject requests without a valid bearer token when auth is enabled
pub async fn authorize(State(auth): State<BearerAuth>, request: Request, next: Next) -> Response {
    match auth.check(request.headers()) {
        Ok(()) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}

/// Only serve clients accepting JSON
pub async fn require_json_accept(request: Request, next: Next) -> Response {
    let accept = request
        .headers()
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if accept != "application/json" && accept != "*/*" {
        debug!("Rejecting Accept header: {accept:?}");
        return ApiError::NotAcceptable.into_response();
    }

    next.run(request).await
}

/// Give bodiless 405 responses the usual JSON detail
pub async fn method_not_allowed_detail(response: Response) -> Response {
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        ApiError::MethodNotAllowed.into_response()
    } else {
        response
    }
}

/// Log every request once its response status is known
pub async fn access_log(request: Request, next: Next) -> Response {
    let remote_addr = remote_addr(&request);
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let method = request.method().clone();
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;
    let status = response.status();

    let level = if status.is_server_error() {
        Level::Error
    } else if status.is_client_error() {
        Level::Warn
    } else {
        Level::Info
    };

    log!(
        level,
        "{method} {path} status={} remote_addr={remote_addr} user_agent={user_agent:?}",
        status.as_u16()
    );

    response
}

/// Client address, preferring proxy headers over the socket peer
fn remote_addr(request: &Request) -> String {
    for name in ["x-forwarded-for", "x-real-ip"] {
        let forwarded = request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(*value));
        }
        map
    }

    #[test]
    fn test_auth_disabled_accepts_anything() {
        let auth = BearerAuth::disabled();
        assert!(!auth.is_enabled());
        assert!(auth.check(&HeaderMap::new()).is_ok());
    }

    #[test]
    fn test_auth_checks_bearer_token() {
        let auth = BearerAuth::with_token("s3cret");

        assert_eq!(auth.check(&HeaderMap::new()), Err(ApiError::Unauthorized));
        assert_eq!(
            auth.check(&headers(&[("authorization", "")])),
            Err(ApiError::Unauthorized)
        );
        assert_eq!(
            auth.check(&headers(&[("authorization", "Bearer wrong")])),
            Err(ApiError::Forbidden)
        );
        assert_eq!(
            auth.check(&headers(&[("authorization", "Basic s3cret")])),
            Err(ApiError::Forbidden)
        );
        assert_eq!(
            auth.check(&headers(&[("authorization", "Bearers3cret")])),
            Err(ApiError::Forbidden)
        );
        assert!(auth
            .check(&headers(&[("authorization", "Bearer s3cret")]))
            .is_ok());
    }

    #[test]
    fn test_remote_addr_prefers_forwarded_headers() {
        let request = axum::http::Request::builder()
            .header("x-real-ip", "10.0.0.2")
            .header("x-forwarded-for", "192.168.1.7")
            .body(Body::empty())
            .unwrap();
        assert_eq!(remote_addr(&request), "192.168.1.7");

        let request = axum::http::Request::builder()
            .header("x-real-ip", "10.0.0.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(remote_addr(&request), "10.0.0.2");

        let mut request = axum::http::Request::builder().body(Body::empty()).unwrap();
        assert_eq!(remote_addr(&request), "-");

        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4242))));
        assert_eq!(remote_addr(&request), "127.0.0.1:4242");
    }
}
