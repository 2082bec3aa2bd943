//! HTTP handlers for the Garden Advisor backend

pub mod analysis;
pub mod health;
pub mod history;
pub mod knowledge;
pub mod translate;
pub mod voice;

pub use health::health_check;

use std::net::SocketAddr;

use axum::http::HeaderMap;
use uuid::Uuid;

/// Session identity from the `x-session-id` header.
///
/// An absent or empty header mints a fresh UUID; such a session starts with
/// empty history.
pub fn session_id(headers: &HeaderMap) -> String {
    headers
        .get("x-session-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Client address for geolocation: first `x-forwarded-for` hop when behind a
/// proxy, otherwise the socket peer
pub fn client_ip(headers: &HeaderMap, addr: &SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| addr.ip().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn session_header_is_used_verbatim() {
        let mut headers = HeaderMap::new();
        headers.insert("x-session-id", HeaderValue::from_static("garden-42"));
        assert_eq!(session_id(&headers), "garden-42");
    }

    #[test]
    fn missing_session_header_mints_a_uuid() {
        let id = session_id(&HeaderMap::new());
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn forwarded_header_beats_socket_address() {
        let addr: SocketAddr = "10.0.0.7:9999".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers, &addr), "203.0.113.9");
        assert_eq!(client_ip(&HeaderMap::new(), &addr), "10.0.0.7");
    }
}
