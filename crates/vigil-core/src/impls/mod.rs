//! Impls - ports の実装
//!
//! - **context**: `ActivityContext` の固定 / 更新可能な実装
//! - **memory**: すべての scope 操作を記録する `RecordingMonitor`（テスト・dry run 用）
//! - **tracing_monitor**: scope 操作を tracing イベントとして出力する `TracingMonitor`
//! - **sentry_monitor**: Sentry へ送る `SentryMonitor` と client 初期化

pub mod context;
pub mod memory;
pub mod sentry_monitor;
pub mod tracing_monitor;

pub use self::context::{FixedActivityContext, SharedActivityContext};
pub use self::memory::{RecordingMonitor, ScopeEvent, ScopeRecord};
pub use self::sentry_monitor::SentryMonitor;
pub use self::tracing_monitor::TracingMonitor;
