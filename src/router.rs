use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use crate::{
    AppState,
    middleware::{client_key, log_errors},
    routes,
};

// 计算器页面与接口
pub fn calculator_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(routes::calculator::index))
        .route("/calculate", post(routes::calculator::submit_form))
        .route("/api/validate", post(routes::calculator::validate_input))
        .route("/api/calculate", post(routes::calculator::calculate))
        .route("/api/view", get(routes::calculator::view))
}

// 创建主路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(calculator_routes())
        .route("/health", get(routes::calculator::health))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(log_errors))
                .layer(axum::middleware::from_fn(client_key)),
        )
        .with_state(state)
}
