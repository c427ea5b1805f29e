//! テスト用フェイクトランスポート

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::transport::{HttpTransport, TransportResponse};
use crate::common::error::{CheckError, CheckResult};

pub(crate) const SUCCESS_URL: &str = "http://success.test/health";
pub(crate) const NOT_FOUND_URL: &str = "http://not-found.test/health";
pub(crate) const INTERNAL_ERROR_URL: &str = "http://internal-error.test/health";
pub(crate) const UNREACHABLE_URL: &str = "http://unreachable.test/health";

/// URLごとに固定の応答（と遅延）を返すトランスポート
#[derive(Default)]
pub(crate) struct FakeTransport {
    routes: HashMap<String, (Option<u16>, Duration)>,
    calls: AtomicUsize,
    completed: AtomicUsize,
}

impl FakeTransport {
    /// SUCCESS / NOT_FOUND / INTERNAL_ERROR / UNREACHABLE を登録済みのトランスポート
    pub(crate) fn standard() -> Self {
        Self::default()
            .respond(SUCCESS_URL, 200, Duration::from_millis(10))
            .respond(NOT_FOUND_URL, 404, Duration::from_millis(20))
            .respond(INTERNAL_ERROR_URL, 500, Duration::from_millis(30))
            .refuse(UNREACHABLE_URL, Duration::from_millis(5))
    }

    pub(crate) fn respond(mut self, url: &str, status_code: u16, delay: Duration) -> Self {
        self.routes
            .insert(url.to_string(), (Some(status_code), delay));
        self
    }

    pub(crate) fn refuse(mut self, url: &str, delay: Duration) -> Self {
        self.routes.insert(url.to_string(), (None, delay));
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 遅延を経て応答まで到達した呼び出し数
    pub(crate) fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn get(&self, url: &str) -> CheckResult<TransportResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (status_code, delay) = self
            .routes
            .get(url)
            .copied()
            .unwrap_or((None, Duration::ZERO));

        tokio::time::sleep(delay).await;
        self.completed.fetch_add(1, Ordering::SeqCst);

        match status_code {
            Some(status_code) => Ok(TransportResponse { status_code }),
            None => Err(CheckError::Transport(format!(
                "error sending request for url ({}): connection refused",
                url
            ))),
        }
    }
}
