//! ヘルスチェック集約
//!
//! must-pass層・may-fail層の全URLを並列にプローブし、
//! 入力順（must-pass → may-fail、各層は入力順）で計測値を連結して
//! 全体ステータスを導出する。
//!
//! 集約呼び出し自体はエラーを返さない。トランスポートエラー・締め切り超過・
//! プローブタスクの異常終了はすべて`Fail`の`status`計測値として表現される。

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::probe::{self, ProbeOutcome};
use super::transport::{HttpTransport, ReqwestTransport};
use crate::common::error::CheckResult;
use crate::config::ProbeConfig;
use crate::types::health::{AggregationResult, Measurement, MeasurementKind, Status, Tier};

/// 締め切り超過で打ち切ったプローブの出力
pub const DEADLINE_EXCEEDED: &str = "deadline exceeded";

/// HTTPヘルスチェック
///
/// トランスポートは全プローブで読み取り専用に共有される。
#[derive(Clone)]
pub struct HttpCheck {
    /// HTTPトランスポート
    transport: Arc<dyn HttpTransport>,
    /// 失敗が全体の失敗となるURL
    must_pass_urls: Vec<String>,
    /// 失敗が警告に留まるURL
    may_fail_urls: Vec<String>,
    /// 集約全体の締め切り
    deadline: Option<Duration>,
}

impl HttpCheck {
    /// 新しいチェックを作成（URLなし・締め切りなし）
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            must_pass_urls: Vec::new(),
            may_fail_urls: Vec::new(),
            deadline: None,
        }
    }

    /// 設定から`ReqwestTransport`を構築してチェックを作成
    pub fn from_config(config: &ProbeConfig) -> CheckResult<Self> {
        let transport = ReqwestTransport::from_config(config)?;
        let check = Self::new(Arc::new(transport));

        Ok(match config.deadline {
            Some(deadline) => check.with_deadline(deadline),
            None => check,
        })
    }

    /// must-pass層のURLを設定
    pub fn with_must_pass_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.must_pass_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    /// may-fail層のURLを設定
    pub fn with_may_fail_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.may_fail_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    /// 集約全体の締め切りを設定
    ///
    /// 締め切り時点で未完了のプローブは中断され、トランスポート失敗として扱われる。
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// must-pass層のURL
    pub fn must_pass_urls(&self) -> &[String] {
        &self.must_pass_urls
    }

    /// may-fail層のURL
    pub fn may_fail_urls(&self) -> &[String] {
        &self.may_fail_urls
    }

    /// 集約全体の締め切り
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// 全URLをプローブして集約結果を返す
    ///
    /// このfutureをdropすると未完了のプローブはすべて中断される。
    pub async fn check(&self) -> AggregationResult {
        let targets: Vec<(Tier, &str)> = self
            .must_pass_urls
            .iter()
            .map(|url| (Tier::MustPass, url.as_str()))
            .chain(
                self.may_fail_urls
                    .iter()
                    .map(|url| (Tier::MayFail, url.as_str())),
            )
            .collect();

        if targets.is_empty() {
            debug!("No URLs to check");
            return AggregationResult::new(Vec::new(), Status::Pass);
        }

        let deadline = self.deadline.map(|d| Instant::now() + d);

        debug!(
            must_pass = self.must_pass_urls.len(),
            may_fail = self.may_fail_urls.len(),
            "Starting parallel probes"
        );

        let mut tasks = ProbeTasks(Vec::with_capacity(targets.len()));
        for (_, url) in &targets {
            let transport = Arc::clone(&self.transport);
            let url = url.to_string();
            tasks.0.push(tokio::spawn(async move {
                probe::execute(transport.as_ref(), &url).await
            }));
        }

        // 完了順ではなく入力順に結果を組み立てる
        let mut tiered: Vec<(Tier, Vec<Measurement>)> = Vec::with_capacity(targets.len());
        for ((tier, url), handle) in targets.iter().zip(tasks.0.iter_mut()) {
            let outcome = join_probe(handle, deadline, url).await;
            tiered.push((*tier, outcome.into_measurements(url)));
        }

        let status = rollup(
            tiered
                .iter()
                .flat_map(|(tier, measurements)| measurements.iter().map(move |m| (*tier, m))),
        );

        let failures = |target: Tier| {
            tiered
                .iter()
                .filter(|(tier, _)| *tier == target)
                .flat_map(|(_, measurements)| measurements)
                .filter(|m| m.kind() == MeasurementKind::Status && m.status() == Status::Fail)
                .count()
        };
        info!(
            status = %status,
            must_pass = self.must_pass_urls.len(),
            must_pass_failures = failures(Tier::MustPass),
            may_fail = self.may_fail_urls.len(),
            may_fail_failures = failures(Tier::MayFail),
            "Health check completed"
        );

        let measurements = tiered
            .into_iter()
            .flat_map(|(_, measurements)| measurements)
            .collect();
        AggregationResult::new(measurements, status)
    }
}

/// drop時に未完了のプローブタスクを中断する
struct ProbeTasks(Vec<JoinHandle<ProbeOutcome>>);

impl Drop for ProbeTasks {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// プローブタスクの完了を待つ（締め切りがあれば超過時に中断）
async fn join_probe(
    handle: &mut JoinHandle<ProbeOutcome>,
    deadline: Option<Instant>,
    url: &str,
) -> ProbeOutcome {
    let joined = match deadline {
        Some(deadline) => match tokio::time::timeout_at(deadline, &mut *handle).await {
            Ok(joined) => joined,
            Err(_) => {
                handle.abort();
                warn!(url = %url, "Probe abandoned at aggregate deadline");
                return ProbeOutcome::TransportFailed {
                    error: DEADLINE_EXCEEDED.to_string(),
                };
            }
        },
        None => (&mut *handle).await,
    };

    match joined {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(url = %url, error = %e, "Probe task join error");
            ProbeOutcome::TransportFailed {
                error: format!("probe task failed: {}", e),
            }
        }
    }
}

/// 層付きの計測値から全体ステータスを導出する
///
/// `status`種別の`Fail`のみを対象とし、must-pass層なら`Fail`、
/// may-fail層なら`Warn`へ昇格する。評価順序には依存しない。
pub fn rollup<'a, I>(measurements: I) -> Status
where
    I: IntoIterator<Item = (Tier, &'a Measurement)>,
{
    measurements
        .into_iter()
        .filter(|(_, m)| m.kind() == MeasurementKind::Status && m.status() == Status::Fail)
        .map(|(tier, _)| tier.failure_status())
        .max()
        .unwrap_or(Status::Pass)
}

/// must-pass層・may-fail層のURLを集約する
pub async fn aggregate<M, P, S, T>(
    transport: Arc<dyn HttpTransport>,
    must_pass: M,
    may_fail: P,
) -> AggregationResult
where
    M: IntoIterator<Item = S>,
    P: IntoIterator<Item = T>,
    S: Into<String>,
    T: Into<String>,
{
    HttpCheck::new(transport)
        .with_must_pass_urls(must_pass)
        .with_may_fail_urls(may_fail)
        .check()
        .await
}
