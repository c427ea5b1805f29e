//! HTTPトランスポート
//!
//! プローブが使用するHTTPクライアント能力の抽象化。
//! 全プローブから読み取り専用で共有される。TLS・プロキシ・リダイレクト・
//! タイムアウトはトランスポート側の責務。

use async_trait::async_trait;
use reqwest::Client;

use crate::common::error::{CheckError, CheckResult};
use crate::config::ProbeConfig;

/// トランスポートが返すレスポンス
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTPステータスコード
    pub status_code: u16,
}

/// GETリクエストを発行するトランスポートtrait
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// `url`へGETを1回発行する
    ///
    /// レスポンスを受信できなかった場合（接続拒否・タイムアウト・DNS失敗等）は
    /// エラーを返す。非2xxはエラーではない。
    async fn get(&self, url: &str) -> CheckResult<TransportResponse>;
}

/// reqwestベースのトランスポート
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// 既存のクライアントから作成
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// 設定からクライアントを構築
    pub fn from_config(config: &ProbeConfig) -> CheckResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| CheckError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// 内部のクライアント
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> CheckResult<TransportResponse> {
        // ボディは読まない（ステータスのみ判定に使う）
        let response = self.client.get(url).send().await?;
        Ok(TransportResponse {
            status_code: response.status().as_u16(),
        })
    }
}
