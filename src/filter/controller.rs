use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use super::audit::{AuditRecord, AuditSink};
use super::calculator::{FilterElement, compute_elements};
use super::rate_limiter::RateLimiter;
use super::validator::{ValidationError, validate};

pub const DEFAULT_SUCCESS_MESSAGE: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReason {
    NotANumber,
    OutOfRange,
    NotInteger,
    RateLimitExceeded,
}

impl From<ValidationError> for ErrorReason {
    fn from(error: ValidationError) -> Self {
        match error {
            ValidationError::NotANumber => ErrorReason::NotANumber,
            ValidationError::OutOfRange => ErrorReason::OutOfRange,
            ValidationError::NotInteger => ErrorReason::NotInteger,
        }
    }
}

/// 交给界面适配层执行的指令
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UiInstruction {
    ShowError { message: String, reason: ErrorReason },
    ShowSuccess { message: String, hide_after_ms: u64 },
    Render { elements: Vec<FilterElement> },
    Clear,
}

pub struct Controller {
    limiter: RateLimiter,
    audit: Arc<dyn AuditSink>,
    success_message: Duration,
}

impl Controller {
    pub fn new(limiter: RateLimiter, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            limiter,
            audit,
            success_message: DEFAULT_SUCCESS_MESSAGE,
        }
    }

    pub fn with_success_message(mut self, duration: Duration) -> Self {
        self.success_message = duration;
        self
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// 输入变化：空输入隐藏提示，非法输入持续显示错误，合法输入短暂显示成功
    pub fn on_input_change(&self, text: &str) -> UiInstruction {
        if text.trim().is_empty() {
            return UiInstruction::Clear;
        }

        let result = validate(text);
        match result.error {
            Some(error) => UiInstruction::ShowError {
                message: result.message,
                reason: error.into(),
            },
            None => UiInstruction::ShowSuccess {
                message: result.message,
                hide_after_ms: self.success_message.as_millis() as u64,
            },
        }
    }

    /// 提交：先限流（非法提交同样占用名额），再校验、计算并写审计记录
    pub fn on_submit(&mut self, text: &str, now_ms: i64) -> UiInstruction {
        let decision = self.limiter.check_and_record(now_ms);
        if !decision.allowed {
            tracing::warn!(
                "Calculation rejected by rate limiter, retry after {:?}ms",
                decision.retry_after_ms
            );
            return UiInstruction::ShowError {
                message: decision.message.unwrap_or_default(),
                reason: ErrorReason::RateLimitExceeded,
            };
        }

        let result = validate(text);
        let order = match (result.error, result.value) {
            (None, Some(order)) => order,
            (error, _) => {
                tracing::debug!("Rejected filter order input {:?}: {:?}", text, error);
                return UiInstruction::ShowError {
                    message: result.message,
                    reason: error.unwrap_or(ValidationError::NotANumber).into(),
                };
            }
        };

        let elements = compute_elements(order);
        self.audit.record(&AuditRecord::calculation(
            now_ms,
            order,
            elements.len(),
            self.limiter.request_count(),
        ));

        UiInstruction::Render { elements }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::audit::MemoryAuditSink;
    use crate::filter::calculator::ElementKind;

    fn controller() -> (Controller, Arc<MemoryAuditSink>) {
        let sink = Arc::new(MemoryAuditSink::new());
        let controller = Controller::new(RateLimiter::new(60_000, 10), sink.clone());
        (controller, sink)
    }

    #[test]
    fn input_change_states() {
        let (controller, _) = controller();
        assert_eq!(controller.on_input_change(""), UiInstruction::Clear);
        assert_eq!(controller.on_input_change("  "), UiInstruction::Clear);
        assert_eq!(
            controller.on_input_change("21"),
            UiInstruction::ShowError {
                message: "Filter order must be between 1 and 20".to_string(),
                reason: ErrorReason::OutOfRange,
            }
        );
        assert_eq!(
            controller.on_input_change("5"),
            UiInstruction::ShowSuccess {
                message: "Valid filter order".to_string(),
                hide_after_ms: 2000,
            }
        );
    }

    #[test]
    fn input_change_does_not_charge_limiter() {
        let (controller, _) = controller();
        for _ in 0..20 {
            controller.on_input_change("4");
        }
        assert_eq!(controller.limiter().request_count(), 0);
    }

    #[test]
    fn submit_renders_and_audits() {
        let (mut controller, sink) = controller();
        let elements = match controller.on_submit("4", 1_000) {
            UiInstruction::Render { elements } => elements,
            other => panic!("expected render, got {:?}", other),
        };
        assert_eq!(elements.len(), 4);
        assert_eq!(elements[0].kind, ElementKind::Inductor);
        assert_eq!(elements[0].value, "0.7654");

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action, "CALCULATION_PERFORMED");
        assert_eq!(records[0].input, 4);
        assert_eq!(records[0].element_count, 4);
        assert_eq!(records[0].request_count, 1);
        assert_eq!(records[0].timestamp, "1970-01-01T00:00:01.000Z");
    }

    #[test]
    fn invalid_submit_still_consumes_a_slot() {
        let (mut controller, sink) = controller();
        let instruction = controller.on_submit("3.5", 0);
        assert!(matches!(
            instruction,
            UiInstruction::ShowError {
                reason: ErrorReason::NotInteger,
                ..
            }
        ));
        assert_eq!(controller.limiter().request_count(), 1);
        assert!(sink.records().is_empty());
    }

    #[test]
    fn rate_limit_is_checked_before_validation() {
        let (mut controller, sink) = controller();
        for _ in 0..10 {
            controller.on_submit("abc", 0);
        }
        let instruction = controller.on_submit("4", 0);
        assert!(matches!(
            instruction,
            UiInstruction::ShowError {
                reason: ErrorReason::RateLimitExceeded,
                ..
            }
        ));
        assert!(sink.records().is_empty());

        assert!(matches!(
            controller.on_submit("4", 60_001),
            UiInstruction::Render { .. }
        ));
    }

    #[test]
    fn resubmitting_same_order_is_deterministic() {
        let (mut controller, sink) = controller();
        let first = controller.on_submit("9", 0);
        let second = controller.on_submit("9", 10);
        assert_eq!(first, second);
        let counts: Vec<usize> = sink.records().iter().map(|r| r.request_count).collect();
        assert_eq!(counts, vec![1, 2]);
    }

    #[test]
    fn instruction_serialization_is_tagged() {
        let json = serde_json::to_value(UiInstruction::ShowError {
            message: "Please enter a valid number".to_string(),
            reason: ErrorReason::NotANumber,
        })
        .unwrap();
        assert_eq!(json["kind"], "show_error");
        assert_eq!(json["reason"], "not_a_number");
        assert_eq!(
            serde_json::to_value(UiInstruction::Clear).unwrap(),
            serde_json::json!({ "kind": "clear" })
        );
    }
}
