use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub rate_limit_window_ms: i64,
    pub rate_limit_requests: usize,
    pub success_message_ms: u64,
    pub reveal_stagger_ms: u64,
    pub session_idle_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_host: "::".to_string(),
            server_port: 3000,
            rate_limit_window_ms: 60_000,
            rate_limit_requests: 10,
            success_message_ms: 2000,
            reveal_stagger_ms: 50,
            session_idle_secs: 600,
        }
    }
}

// 变量缺失或无法解析时使用默认值，只有非 UTF-8 内容才报错
fn var_or<T: FromStr>(key: &str, default: T) -> Result<T, env::VarError> {
    match env::var(key) {
        Ok(value) => Ok(value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value for {}, using default", key);
            default
        })),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(e),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        let defaults = Config::default();
        Ok(Config {
            server_host: var_or("SERVER_HOST", defaults.server_host)?,
            server_port: var_or("SERVER_PORT", defaults.server_port)?,
            rate_limit_window_ms: var_or("RATE_LIMIT_WINDOW_MS", defaults.rate_limit_window_ms)?,
            rate_limit_requests: var_or("RATE_LIMIT_REQUESTS", defaults.rate_limit_requests)?,
            success_message_ms: var_or("SUCCESS_MESSAGE_MS", defaults.success_message_ms)?,
            reveal_stagger_ms: var_or("REVEAL_STAGGER_MS", defaults.reveal_stagger_ms)?,
            session_idle_secs: var_or("SESSION_IDLE_SECS", defaults.session_idle_secs)?,
        })
    }

    pub fn success_message(&self) -> Duration {
        Duration::from_millis(self.success_message_ms)
    }

    pub fn reveal_stagger(&self) -> Duration {
        Duration::from_millis(self.reveal_stagger_ms)
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_calculator_form() {
        let config = Config::default();
        assert_eq!(config.rate_limit_window_ms, 60_000);
        assert_eq!(config.rate_limit_requests, 10);
        assert_eq!(config.success_message(), Duration::from_millis(2000));
        assert_eq!(config.reveal_stagger(), Duration::from_millis(50));
    }

    #[test]
    fn unparsable_values_fall_back() {
        // SAFETY: 该变量只在本测试中使用
        unsafe { env::set_var("LADDER_TEST_PORT", "not-a-port") };
        assert_eq!(var_or("LADDER_TEST_PORT", 3000u16), Ok(3000));
        unsafe { env::set_var("LADDER_TEST_PORT", " 8080 ") };
        assert_eq!(var_or("LADDER_TEST_PORT", 3000u16), Ok(8080));
        assert_eq!(var_or("LADDER_TEST_MISSING", 7u64), Ok(7));
    }
}
