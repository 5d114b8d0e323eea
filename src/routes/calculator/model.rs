use serde::{Deserialize, Serialize};

use crate::filter::{DisplayUnit, FilterElement};

#[derive(Debug, Deserialize)]
pub struct InputRequest {
    #[serde(default)]
    pub text: String,
}

/// 无脚本表单提交
#[derive(Debug, Deserialize)]
pub struct CalculateForm {
    #[serde(default)]
    pub order: String,
}

#[derive(Debug, Serialize)]
pub struct CalculationResponse {
    pub order: u32,
    pub elements: Vec<FilterElement>,
    pub units: Vec<DisplayUnit>,
    pub html: String,
}
