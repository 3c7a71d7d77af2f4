//! Monitor port - observability backend の抽象化
//!
//! # 設計
//! - backend の「現在の scope」（プロセス共有の暗黙状態）は使わない
//! - `Monitor::open_scope` が invocation ごとに新しい scope を値として返す
//! - scope は呼び出し側のスタック上で `&mut` として受け渡し、終了時に `clear` する
//!
//! # 実装
//! - `impls::sentry::SentryMonitor`: 本番用（invocation ごとに子 Hub）
//! - `impls::tracing::TracingMonitor`: DSN 未設定時のログ出力
//! - `impls::memory::RecordingMonitor`: テスト用

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::activity::ActivityResult;
use crate::domain::{ActivityError, ContextMap};

/// How a monitoring transaction ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Ok,
    InternalError,
    /// The transaction was dropped before the activity finished.
    Cancelled,
}

/// Observability backend.
pub trait Monitor: Send + Sync {
    /// Acquire a fresh scope for one invocation.
    fn open_scope(&self) -> Box<dyn MonitorScope>;
}

/// Tags and contexts attached to whatever is reported while the scope lives.
pub trait MonitorScope: Send {
    /// Set a tag, overwriting any previous value for `key`.
    fn set_tag(&mut self, key: &str, value: &str);

    fn set_context(&mut self, key: &str, value: ContextMap);

    fn start_transaction(&mut self, name: &str) -> Box<dyn MonitorTransaction>;

    /// Report `error` together with the scope's current tags and contexts.
    fn capture_error(&mut self, error: &ActivityError);

    fn clear(&mut self);

    /// Run `fut` with this scope active, so that anything the activity
    /// reports on its own is attributed to the invocation.
    fn bind<'a>(&self, fut: BoxFuture<'a, ActivityResult>) -> BoxFuture<'a, ActivityResult> {
        fut
    }
}

/// One measured span of work.
pub trait MonitorTransaction: Send {
    fn finish(self: Box<Self>, status: TransactionStatus);
}
