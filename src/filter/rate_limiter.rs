use std::collections::VecDeque;

use serde::Serialize;

pub const DEFAULT_WINDOW_MS: i64 = 60_000;
pub const DEFAULT_MAX_REQUESTS: usize = 10;

/// 限流检查结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateLimitDecision {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_ms: Option<i64>,
}

/// 滑动窗口限流器，仅用于界面提示，不是访问控制
#[derive(Debug, Clone)]
pub struct RateLimiter {
    // 按时间先后排列的请求时间戳（毫秒）
    timestamps: VecDeque<i64>,
    window_ms: i64,
    max_requests: usize,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_MS, DEFAULT_MAX_REQUESTS)
    }
}

impl RateLimiter {
    pub fn new(window_ms: i64, max_requests: usize) -> Self {
        Self {
            timestamps: VecDeque::with_capacity(max_requests),
            window_ms,
            max_requests,
        }
    }

    /// 当前窗口内已记录的请求数（以最近一次清理为准）
    pub fn request_count(&self) -> usize {
        self.timestamps.len()
    }

    pub fn check_and_record(&mut self, now: i64) -> RateLimitDecision {
        self.prune(now);

        if self.timestamps.len() >= self.max_requests {
            let retry_after_ms = self
                .timestamps
                .front()
                .map(|oldest| (oldest + self.window_ms - now).max(0))
                .unwrap_or(self.window_ms);
            let wait_secs = (retry_after_ms + 999) / 1000;
            return RateLimitDecision {
                allowed: false,
                message: Some(format!(
                    "Too many requests. Please wait {} seconds before trying again.",
                    wait_secs
                )),
                retry_after_ms: Some(retry_after_ms),
            };
        }

        self.timestamps.push_back(now);
        RateLimitDecision {
            allowed: true,
            message: None,
            retry_after_ms: None,
        }
    }

    // 从最旧的开始丢弃窗口之外的时间戳
    fn prune(&mut self, now: i64) {
        let cutoff = now - self.window_ms;
        while self.timestamps.front().is_some_and(|&t| t < cutoff) {
            self.timestamps.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_up_to_max_within_window() {
        let mut limiter = RateLimiter::new(60_000, 10);
        for _ in 0..10 {
            assert!(limiter.check_and_record(0).allowed);
        }
        let denied = limiter.check_and_record(0);
        assert!(!denied.allowed);
        assert_eq!(denied.retry_after_ms, Some(60_000));
        assert_eq!(
            denied.message.as_deref(),
            Some("Too many requests. Please wait 60 seconds before trying again.")
        );
        assert_eq!(limiter.request_count(), 10);
    }

    #[test]
    fn window_expiry_readmits() {
        let mut limiter = RateLimiter::new(60_000, 10);
        for _ in 0..10 {
            limiter.check_and_record(0);
        }
        assert!(!limiter.check_and_record(60_000).allowed);
        assert!(limiter.check_and_record(60_001).allowed);
        assert_eq!(limiter.request_count(), 1);
    }

    #[test]
    fn sliding_window_drops_only_expired_entries() {
        let mut limiter = RateLimiter::new(1_000, 3);
        assert!(limiter.check_and_record(0).allowed);
        assert!(limiter.check_and_record(500).allowed);
        assert!(limiter.check_and_record(900).allowed);

        let denied = limiter.check_and_record(999);
        assert!(!denied.allowed);
        assert_eq!(denied.retry_after_ms, Some(1));
        assert_eq!(
            denied.message.as_deref(),
            Some("Too many requests. Please wait 1 seconds before trying again.")
        );

        // t=0 已过期，其余两个仍在窗口内
        assert!(limiter.check_and_record(1_001).allowed);
        assert_eq!(limiter.request_count(), 3);
        assert!(!limiter.check_and_record(1_200).allowed);
    }

    #[test]
    fn denied_calls_are_not_recorded() {
        let mut limiter = RateLimiter::new(60_000, 1);
        assert!(limiter.check_and_record(0).allowed);
        for t in 1..50 {
            assert!(!limiter.check_and_record(t).allowed);
        }
        assert_eq!(limiter.request_count(), 1);
        assert!(limiter.check_and_record(60_001).allowed);
    }
}
