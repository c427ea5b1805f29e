//! 型定義
//!
//! ヘルスチェック結果のデータモデル

/// ヘルス計測値・集約結果の型
pub mod health;
