//! Ports - 外部システムとの境界
//!
//! interceptor は 2 つの外部システムの間に立つ:
//! - orchestration engine（activity の実行、interceptor chain、実行メタデータ）
//! - observability backend（scope, transaction, exception capture）
//!
//! どちらも trait として定義し、実装の詳細は `impls` に置く。

pub mod activity;
pub mod interceptor;
pub mod monitor;

pub use self::activity::{
    ActivityContext, ActivityInbound, ActivityOutput, ActivityResult, ExecuteActivityInput,
};
pub use self::interceptor::Interceptor;
pub use self::monitor::{Monitor, MonitorScope, MonitorTransaction, TransactionStatus};
