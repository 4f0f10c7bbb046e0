//! Request identity extraction
//!
//! Pulls the auth cookie and the client network address out of request
//! headers. Absence of either is not an error.

use axum::http::{header, HeaderMap};

/// Sentinel for requests with no resolvable client address
pub const UNKNOWN_ADDR: &str = "unknown";

/// Read the token value from the named cookie
pub fn token_from_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            let name = parts.next()?;
            let value = parts.next()?;
            if name == cookie_name {
                Some(value.to_string())
            } else {
                None
            }
        })
}

/// Resolve the client address from proxy headers
///
/// The first `X-Forwarded-For` entry is trusted as the original client.
/// That holds only behind a reverse proxy that prepends correctly; an
/// unproxied deployment lets callers spoof this header.
pub fn client_addr(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN_ADDR.to_string())
}
