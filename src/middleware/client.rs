use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};

/// 用于区分会话的客户端标识（尽力而为，可被伪造）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientKey(pub String);

fn client_key_from(headers: &HeaderMap, remote_ip: Option<String>) -> String {
    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .filter(|ip| !ip.trim().is_empty())
        .map(str::to_string)
        .or_else(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
                .map(str::to_string)
        })
        // 降级使用连接IP
        .or(remote_ip)
        .unwrap_or_else(|| "unknown".to_string())
        .trim()
        .to_string()
}

pub async fn client_key(mut req: Request<Body>, next: Next) -> Response {
    let remote_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string());
    let key = client_key_from(req.headers(), remote_ip);
    tracing::trace!("client key: {}", key);

    req.extensions_mut().insert(ClientKey(key));
    next.run(req).await
}
