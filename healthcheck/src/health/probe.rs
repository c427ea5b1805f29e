//! プローブ実行
//!
//! 1つのURLへGETを1回発行し、結果を1〜2個の計測値に変換する。
//! リトライは行わない。ステートレスなので異なるURLに対して並行実行できる。

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use super::transport::HttpTransport;
use crate::types::health::Measurement;

/// 1回のプローブの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// レスポンスを受信した（ステータスコードは問わない）
    Responded {
        /// HTTPステータスコード
        status_code: u16,
        /// 経過時間
        duration: Duration,
    },
    /// レスポンス受信前に失敗した
    TransportFailed {
        /// エラーメッセージ
        error: String,
    },
}

impl ProbeOutcome {
    /// 2xxレスポンスを受信したか
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Responded { status_code, .. } if (200..300).contains(status_code))
    }

    /// 計測値に変換
    ///
    /// `Responded`は`status`と`duration`の2件、`TransportFailed`は`status`の1件。
    pub fn into_measurements(self, url: &str) -> Vec<Measurement> {
        match self {
            ProbeOutcome::Responded {
                status_code,
                duration,
            } => vec![
                Measurement::from_status_code(url, status_code),
                Measurement::from_duration(url, duration),
            ],
            ProbeOutcome::TransportFailed { error } => vec![Measurement::no_response(url, error)],
        }
    }
}

/// `url`をプローブして結果を返す
pub async fn execute<T>(transport: &T, url: &str) -> ProbeOutcome
where
    T: HttpTransport + ?Sized,
{
    let start = Instant::now();

    match transport.get(url).await {
        Ok(response) => {
            let duration = start.elapsed();
            let latency_ms = duration.as_millis() as u64;

            if (200..300).contains(&response.status_code) {
                debug!(
                    url = %url,
                    status_code = response.status_code,
                    latency_ms = latency_ms,
                    "Probe succeeded"
                );
            } else {
                warn!(
                    url = %url,
                    status_code = response.status_code,
                    latency_ms = latency_ms,
                    "Probe returned non-success status"
                );
            }

            ProbeOutcome::Responded {
                status_code: response.status_code,
                duration,
            }
        }
        Err(e) => {
            warn!(url = %url, error = %e, "Probe failed before receiving a response");
            ProbeOutcome::TransportFailed {
                error: e.to_string(),
            }
        }
    }
}

/// `url`をプローブして計測値を返す
pub async fn probe<T>(transport: &T, url: &str) -> Vec<Measurement>
where
    T: HttpTransport + ?Sized,
{
    execute(transport, url).await.into_measurements(url)
}
