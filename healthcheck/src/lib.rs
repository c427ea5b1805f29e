//! HTTP health check
//!
//! 複数のHTTPエンドポイントをプローブし、重要度（must-pass / may-fail）に
//! 応じて単一のヘルス判定（pass / warn / fail）へ集約する。

#![warn(missing_docs)]

/// 共通型定義（エラー型）
pub mod common;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// ヘルスチェック（プローブ実行・集約）
pub mod health;

/// ロギング初期化ユーティリティ
pub mod logging;

/// 型定義
pub mod types;

pub use common::error::{CheckError, CheckResult};
pub use health::{aggregate, probe, HttpCheck, HttpTransport, ReqwestTransport};
pub use types::health::{AggregationResult, Measurement, MeasurementKind, Status, Tier};
