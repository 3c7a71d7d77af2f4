//! App - interceptor 本体と chain の組み立て
//!
//! # 主要コンポーネント
//! - **MonitoringInterceptor**: worker に登録する factory
//! - **MonitoringActivityInbound**: invocation ごとに scope / transaction を張るラッパー
//! - **InterceptorChain**: interceptor を登録順に組み立てる（engine 側の登録点）

pub mod chain;
pub mod interceptor;

pub use self::chain::InterceptorChain;
pub use self::interceptor::{CaptureOptions, MonitoringActivityInbound, MonitoringInterceptor};
