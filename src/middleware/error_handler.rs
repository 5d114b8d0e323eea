use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::{error, warn};

/// 记录所有 4xx/5xx 响应
pub async fn log_errors(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let response = next.run(req).await;

    let status = response.status();
    if status.is_server_error() {
        error!("Server error occurred - {} {} -> {}", method, path, status);
    } else if status.is_client_error() {
        warn!("Client error - {} {} -> {}", method, path, status);
    }

    response
}
