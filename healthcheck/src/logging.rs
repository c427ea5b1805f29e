//! ロギング初期化
//!
//! `HEALTHCHECK_LOG`（未設定なら`RUST_LOG`）からフィルタを読み取り、
//! tracing-subscriberのfmtレイヤーを登録する。

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::common::error::{CheckError, CheckResult};

/// デフォルトのログフィルタ
const DEFAULT_FILTER: &str = "healthcheck=info";

/// 環境変数からログフィルタを構築
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("HEALTHCHECK_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// グローバルなtracing subscriberを初期化
///
/// 既に初期化済みの場合は`CheckError::Logging`を返す。
pub fn init() -> CheckResult<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter())
        .try_init()
        .map_err(|e| CheckError::Logging(e.to_string()))
}
