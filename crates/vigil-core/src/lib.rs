//! vigil-core
//!
//! Activity interceptor that reports failures, with invocation metadata, to
//! an error-tracking backend (Sentry).
//!
//! # モジュール構成
//! - **domain**: per-call データ（FunctionRef, ActivityArg, ActivityInfo, ActivityError, tag キー）
//! - **ports**: engine と backend の抽象化（ActivityInbound, Interceptor, Monitor など）
//! - **app**: MonitoringInterceptor と InterceptorChain
//! - **typed**: 型付き Activity API と chain 終端の ActivityRegistry
//! - **impls**: 実装（SentryMonitor, TracingMonitor, RecordingMonitor, ActivityContext）
//! - **config**: MonitorConfig（TOML + 環境変数）

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod typed;

pub use crate::app::{CaptureOptions, InterceptorChain, MonitoringInterceptor};
pub use crate::config::{ConfigError, MonitorConfig};
pub use crate::domain::{ActivityArg, ActivityError, ActivityInfo, FunctionRef};
pub use crate::ports::{
    ActivityContext, ActivityInbound, ActivityResult, ExecuteActivityInput, Interceptor, Monitor,
};
