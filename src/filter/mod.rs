//! Butterworth 梯形滤波器计算核心：校验、限流、元件值计算与安全渲染，不涉及任何 I/O。

pub mod audit;
pub mod calculator;
pub mod controller;
pub mod rate_limiter;
pub mod render;
pub mod validator;

pub use audit::{AuditRecord, AuditSink, MemoryAuditSink, TracingAuditSink};
pub use calculator::{ElementKind, FilterElement, compute_elements};
pub use controller::{Controller, ErrorReason, UiInstruction};
pub use rate_limiter::{RateLimitDecision, RateLimiter};
pub use render::{DisplayUnit, OutputRegion, escape_html};
pub use validator::{MAX_ORDER, MIN_ORDER, ValidationError, ValidationResult, validate};
