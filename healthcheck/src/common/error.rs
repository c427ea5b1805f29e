//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! プローブ経路（[`crate::health::aggregate`]）はこのエラーを呼び出し元へ
//! 返さない。トランスポートエラーは `Fail` 計測値の `output` に変換される。

use thiserror::Error;

/// Health check error type
#[derive(Debug, Error)]
pub enum CheckError {
    /// Transport error (connection refused, DNS failure, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Timeout error
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Logging initialization error
    #[error("Logging error: {0}")]
    Logging(String),
}

impl From<reqwest::Error> for CheckError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Result type alias
pub type CheckResult<T> = Result<T, CheckError>;
