//! ヘルスチェック
//!
//! 設定されたURLをプローブし、重要度層ごとの結果を単一のステータスへ集約する。
//!
//! - must-pass層のURLが1つでも失敗 → `fail`
//! - may-fail層のURLのみ失敗 → `warn`
//! - それ以外 → `pass`

/// 集約（並行プローブ・ロールアップ）
pub mod aggregator;

/// プローブ実行
pub mod probe;

/// HTTPトランスポート
pub mod transport;

#[cfg(test)]
pub(crate) mod test_utils;

pub use aggregator::{aggregate, rollup, HttpCheck};
pub use probe::{execute, probe, ProbeOutcome};
pub use transport::{HttpTransport, ReqwestTransport, TransportResponse};
