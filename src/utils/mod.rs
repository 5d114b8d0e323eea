use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::filter::ErrorReason;

/// 通用的API响应结构
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// 错误码，0表示成功，非0表示失败
    pub code: i32,
    /// 错误消息，成功时为"success"
    pub msg: String,
    /// 响应数据，错误时为None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resp_data: Option<T>,
}

pub fn success_to_api_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code: error_codes::SUCCESS,
        msg: "success".into(),
        resp_data: Some(data),
    })
}

pub fn error_to_api_response<T>(code: i32, msg: String) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code,
        msg,
        resp_data: None,
    })
}

pub mod error_codes {
    pub const SUCCESS: i32 = 0;
    pub const VALIDATION_ERROR: i32 = 1000;
    pub const RATE_LIMIT: i32 = 1005;
    pub const INTERNAL_ERROR: i32 = 5000;
}

pub fn error_code_for(reason: ErrorReason) -> i32 {
    match reason {
        ErrorReason::RateLimitExceeded => error_codes::RATE_LIMIT,
        ErrorReason::NotANumber | ErrorReason::OutOfRange | ErrorReason::NotInteger => {
            error_codes::VALIDATION_ERROR
        }
    }
}

/// 当前时间，毫秒级 Unix 时间戳
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
