//! Client source-address resolution.
//!
//! Behind a reverse proxy the peer address belongs to the proxy, so the
//! forwarded headers are trusted instead: first entry of
//! `X-Forwarded-For`, then `X-Real-Ip`, then the connection's peer
//! address. Deployments that expose the console directly should not
//! let clients reach it with spoofed forwarded headers.

use std::net::SocketAddr;

use axum::http::HeaderMap;

/// Resolve the client source address used for login throttling and the
/// audit trail.
pub fn client_addr(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        // X-Forwarded-For may carry a chain; the first entry is the client.
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real = real.trim();
        if !real.is_empty() {
            return real.to_string();
        }
    }

    match peer {
        Some(peer) => peer.ip().to_string(),
        None => "unknown".to_string(),
    }
}
