use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

pub const CALCULATION_PERFORMED: &str = "CALCULATION_PERFORMED";

/// 每次成功计算产生一条审计记录
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub timestamp: String,
    pub action: &'static str,
    pub input: u32,
    pub element_count: usize,
    pub request_count: usize,
}

impl AuditRecord {
    pub fn calculation(now_ms: i64, input: u32, element_count: usize, request_count: usize) -> Self {
        let timestamp = DateTime::<Utc>::from_timestamp_millis(now_ms)
            .unwrap_or_default()
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        Self {
            timestamp,
            action: CALCULATION_PERFORMED,
            input,
            element_count,
            request_count,
        }
    }
}

pub trait AuditSink: Send + Sync {
    fn record(&self, record: &AuditRecord);
}

/// 写入 tracing 日志，target 为 "audit"
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: &AuditRecord) {
        match serde_json::to_string(record) {
            Ok(json) => tracing::info!(target: "audit", "{}", json),
            Err(e) => tracing::error!(target: "audit", "Failed to serialize audit record: {}", e),
        }
    }
}

/// 内存中的审计记录，便于适配层或测试读取
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, record: &AuditRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
    }
}
