use axum::{
    extract::{Extension, Form, Json, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};

use super::model::{CalculateForm, CalculationResponse, InputRequest};
use super::page;
use crate::{
    AppState,
    filter::UiInstruction,
    middleware::ClientKey,
    session::ViewState,
    utils::{error_code_for, error_codes, error_to_api_response, now_millis, success_to_api_response},
};

#[axum::debug_handler]
pub async fn index(
    State(state): State<AppState>,
    Extension(ClientKey(key)): Extension<ClientKey>,
) -> Html<String> {
    // 只读页面不创建会话
    let view = state
        .sessions
        .peek(&key, |session| session.view_html())
        .await
        .unwrap_or_else(|| ViewState::default().to_html());
    Html(page::render_page("", &view))
}

#[axum::debug_handler]
pub async fn submit_form(
    State(state): State<AppState>,
    Extension(ClientKey(key)): Extension<ClientKey>,
    Form(req): Form<CalculateForm>,
) -> Html<String> {
    let now = now_millis();
    let view = state
        .sessions
        .with_session(&key, now, |session| {
            session.submit(&req.order, now);
            session.view_html()
        })
        .await;
    Html(page::render_page(&req.order, &view))
}

#[axum::debug_handler]
pub async fn validate_input(
    State(state): State<AppState>,
    Extension(ClientKey(key)): Extension<ClientKey>,
    Json(req): Json<InputRequest>,
) -> impl IntoResponse {
    let now = now_millis();
    let instruction = state
        .sessions
        .with_session(&key, now, |session| session.input_changed(&req.text))
        .await;
    (StatusCode::OK, success_to_api_response(instruction))
}

#[axum::debug_handler]
pub async fn calculate(
    State(state): State<AppState>,
    Extension(ClientKey(key)): Extension<ClientKey>,
    Json(req): Json<InputRequest>,
) -> impl IntoResponse {
    let now = now_millis();
    let (instruction, snapshot) = state
        .sessions
        .with_session(&key, now, |session| {
            let instruction = session.submit(&req.text, now);
            (instruction, session.snapshot())
        })
        .await;

    match instruction {
        UiInstruction::Render { elements } => (
            StatusCode::OK,
            success_to_api_response(CalculationResponse {
                order: elements.len() as u32,
                elements,
                units: snapshot.units,
                html: snapshot.html,
            }),
        ),
        UiInstruction::ShowError { message, reason } => {
            tracing::debug!("Calculation for {} not performed: {:?}", key, reason);
            (
                StatusCode::OK,
                error_to_api_response(error_code_for(reason), message),
            )
        }
        other => {
            tracing::error!("Unexpected submit instruction: {:?}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response(error_codes::INTERNAL_ERROR, "Internal server error".to_string()),
            )
        }
    }
}

#[axum::debug_handler]
pub async fn view(
    State(state): State<AppState>,
    Extension(ClientKey(key)): Extension<ClientKey>,
) -> impl IntoResponse {
    let snapshot = state
        .sessions
        .peek(&key, |session| session.snapshot())
        .await
        .unwrap_or_else(|| ViewState::default().snapshot());
    (StatusCode::OK, success_to_api_response(snapshot))
}

pub async fn health() -> &'static str {
    "ok"
}
