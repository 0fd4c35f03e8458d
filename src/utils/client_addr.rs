//! Requester address extraction.

use axum::http::HeaderMap;
use std::net::SocketAddr;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Resolves the address recorded as a mapping's author.
///
/// Uses the peer socket IP. When `behind_proxy` is set and the request
/// carries `X-Forwarded-For`, the first (client-most) entry wins instead.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.2".parse().unwrap());
///
/// let peer: SocketAddr = "127.0.0.1:5555".parse().unwrap();
/// assert_eq!(client_addr(&headers, peer, true), "203.0.113.7");
/// assert_eq!(client_addr(&headers, peer, false), "127.0.0.1");
/// ```
pub fn client_addr(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy
        && let Some(forwarded) = forwarded_for(headers)
    {
        return forwarded;
    }

    peer.ip().to_string()
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get(X_FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}
