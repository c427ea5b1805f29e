//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to deprecated variable names with warning logs.
//!
//! URLリスト（must-pass / may-fail）は呼び出し元が解析済みの値として渡す。
//! ここではプローブのタイムアウト等のみを扱う。

use std::time::Duration;

/// リクエストタイムアウトのデフォルト（秒）
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 5;

/// 接続タイムアウトのデフォルト（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 2;

/// Get an environment variable with fallback to a deprecated name
///
/// If the new variable name is set, returns its value.
/// If only the old (deprecated) variable name is set, returns its value
/// and logs a deprecation warning.
///
/// # Example
/// ```
/// use healthcheck::config::get_env_with_fallback;
///
/// let timeout = get_env_with_fallback("HEALTHCHECK_HTTP_TIMEOUT_SECS", "HTTP_CHECK_TIMEOUT_SECS");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Returns `default` if neither variable is set or parsing fails.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// デフォルトのUser-Agent
pub fn default_user_agent() -> String {
    format!("healthcheck/{}", env!("CARGO_PKG_VERSION"))
}

/// プローブ設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// 1リクエストあたりのタイムアウト（トランスポートが適用）
    pub request_timeout: Duration,
    /// 接続確立のタイムアウト
    pub connect_timeout: Duration,
    /// 集約全体の締め切り（`None`なら全プローブの完了を待つ）
    pub deadline: Option<Duration>,
    /// User-Agentヘッダー
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            deadline: None,
            user_agent: default_user_agent(),
        }
    }
}

impl ProbeConfig {
    /// Load probe configuration from environment variables.
    pub fn from_env() -> Self {
        let request_timeout_secs = get_env_with_fallback_parse(
            "HEALTHCHECK_HTTP_TIMEOUT_SECS",
            "HTTP_CHECK_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
        );
        let connect_timeout_secs = get_env_with_fallback_parse(
            "HEALTHCHECK_CONNECT_TIMEOUT_SECS",
            "HTTP_CHECK_CONNECT_TIMEOUT_SECS",
            DEFAULT_CONNECT_TIMEOUT_SECS,
        );
        let deadline = get_env_with_fallback("HEALTHCHECK_DEADLINE_MS", "HTTP_CHECK_DEADLINE_MS")
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_millis);
        let user_agent = std::env::var("HEALTHCHECK_USER_AGENT")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(default_user_agent);

        Self {
            request_timeout: Duration::from_secs(request_timeout_secs),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            deadline,
            user_agent,
        }
    }
}
