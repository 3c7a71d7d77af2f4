//! MonitoringInterceptor - activity 実行を監視して失敗を報告する
//!
//! # 1 invocation の流れ
//! 1. scope を開き、`<module>.<qualname>` の transaction を開始
//! 2. 実行メタデータから tag を設定（delegate より前）
//! 3. next に委譲して await
//! 4. 成功: 結果をそのまま返す
//! 5. 失敗: input / info の context を付けて capture し、同じエラーを返す
//! 6. どの経路でも transaction を閉じ、そのあと scope を clear する
//!
//! # 学習ポイント
//! - Drop guard による確実な後始末（future が途中で drop されても clear される）
//! - ローカル変数の drop 順序（宣言の逆順）で transaction → scope の順に閉じる

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::MonitorConfig;
use crate::domain::keys::{
    ACTIVITY_ID_TAG, ACTIVITY_INFO_CONTEXT, ACTIVITY_INPUT_CONTEXT, ACTIVITY_TASK_QUEUE_TAG,
    ACTIVITY_TYPE_TAG, EXECUTION_TYPE_ACTIVITY, EXECUTION_TYPE_TAG, WORKFLOW_ID_TAG,
    WORKFLOW_NAMESPACE_TAG, WORKFLOW_RUN_ID_TAG, WORKFLOW_TYPE_TAG,
};
use crate::domain::{ActivityArg, ActivityInfo, WorkflowIdentity};
use crate::ports::{
    ActivityInbound, ActivityResult, ExecuteActivityInput, Interceptor, Monitor, MonitorScope,
    MonitorTransaction, TransactionStatus,
};

/// Which failure contexts get attached to the scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOptions {
    pub capture_input: bool,
    pub capture_info: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            capture_input: true,
            capture_info: true,
        }
    }
}

/// Worker interceptor that reports activity failures to a `Monitor`.
///
/// # 使用例
/// ```ignore
/// let _guard = vigil_core::impls::sentry_monitor::init(&config)?;
/// let chain = InterceptorChain::new()
///     .with(MonitoringInterceptor::new(Arc::new(SentryMonitor)));
/// let inbound = chain.build(Arc::new(registry));
/// ```
#[derive(Clone)]
pub struct MonitoringInterceptor {
    monitor: Arc<dyn Monitor>,
    options: CaptureOptions,
}

impl MonitoringInterceptor {
    pub fn new(monitor: Arc<dyn Monitor>) -> Self {
        Self {
            monitor,
            options: CaptureOptions::default(),
        }
    }

    pub fn from_config(monitor: Arc<dyn Monitor>, config: &MonitorConfig) -> Self {
        Self::new(monitor).with_options(config.capture_options())
    }

    pub fn with_options(mut self, options: CaptureOptions) -> Self {
        self.options = options;
        self
    }
}

impl Interceptor for MonitoringInterceptor {
    fn intercept_activity(&self, next: Arc<dyn ActivityInbound>) -> Arc<dyn ActivityInbound> {
        Arc::new(MonitoringActivityInbound {
            next,
            monitor: Arc::clone(&self.monitor),
            options: self.options,
        })
    }
}

/// Chain link installed by `MonitoringInterceptor`.
pub struct MonitoringActivityInbound {
    next: Arc<dyn ActivityInbound>,
    monitor: Arc<dyn Monitor>,
    options: CaptureOptions,
}

#[async_trait]
impl ActivityInbound for MonitoringActivityInbound {
    async fn execute_activity(&self, input: &ExecuteActivityInput) -> ActivityResult {
        let transaction_name = input.function.transaction_name();

        // drop は宣言の逆順: transaction が閉じてから scope が clear される
        let mut scope = ScopeGuard::new(self.monitor.open_scope());
        let mut transaction = TransactionGuard::new(scope.start_transaction(&transaction_name));

        let info = input.info();
        set_activity_tags(&mut *scope, &info);
        debug!(
            transaction = %transaction_name,
            activity_id = %info.activity_id,
            attempt = info.attempt,
            "executing activity"
        );

        match scope.bind(self.next.execute_activity(input)).await {
            Ok(output) => {
                transaction.finish(TransactionStatus::Ok);
                Ok(output)
            }
            Err(error) => {
                self.attach_failure_context(&mut *scope, input);
                warn!(
                    transaction = %transaction_name,
                    activity_id = %info.activity_id,
                    attempt = info.attempt,
                    error = %error,
                    "activity failed, reporting"
                );
                scope.capture_error(&error);
                transaction.finish(TransactionStatus::InternalError);
                Err(error)
            }
        }
    }
}

impl MonitoringActivityInbound {
    fn attach_failure_context(&self, scope: &mut dyn MonitorScope, input: &ExecuteActivityInput) {
        if self.options.capture_input {
            // 引数がちょうど 1 つの record のときだけ。それ以外は黙って skip
            if let [ActivityArg::Record(fields)] = input.args.as_slice() {
                scope.set_context(ACTIVITY_INPUT_CONTEXT, fields.clone());
            }
        }

        if self.options.capture_info {
            // 失敗時点の info を取り直す（retry で attempt が変わっている可能性）
            match input.info().to_context() {
                Ok(fields) => scope.set_context(ACTIVITY_INFO_CONTEXT, fields),
                Err(e) => warn!(error = %e, "skipping activity info context"),
            }
        }
    }
}

/// Tags shared by workflow and activity executions.
fn set_common_workflow_tags(scope: &mut dyn MonitorScope, info: &impl WorkflowIdentity) {
    scope.set_tag(WORKFLOW_TYPE_TAG, info.workflow_type());
    scope.set_tag(WORKFLOW_ID_TAG, info.workflow_id());
}

fn set_activity_tags(scope: &mut dyn MonitorScope, info: &ActivityInfo) {
    scope.set_tag(EXECUTION_TYPE_TAG, EXECUTION_TYPE_ACTIVITY);
    set_common_workflow_tags(scope, info);
    scope.set_tag(ACTIVITY_ID_TAG, &info.activity_id);
    scope.set_tag(ACTIVITY_TYPE_TAG, &info.activity_type);
    scope.set_tag(ACTIVITY_TASK_QUEUE_TAG, &info.task_queue);
    scope.set_tag(WORKFLOW_NAMESPACE_TAG, &info.workflow_namespace);
    scope.set_tag(WORKFLOW_RUN_ID_TAG, &info.workflow_run_id);
}

/// Clears the scope when the invocation ends, however it ends.
struct ScopeGuard {
    scope: Box<dyn MonitorScope>,
}

impl ScopeGuard {
    fn new(scope: Box<dyn MonitorScope>) -> Self {
        Self { scope }
    }
}

impl Deref for ScopeGuard {
    type Target = dyn MonitorScope;

    fn deref(&self) -> &Self::Target {
        self.scope.as_ref()
    }
}

impl DerefMut for ScopeGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.scope.as_mut()
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.scope.clear();
        debug!("monitoring scope cleared");
    }
}

/// Finishes the transaction exactly once; `Cancelled` if nobody did.
struct TransactionGuard {
    transaction: Option<Box<dyn MonitorTransaction>>,
}

impl TransactionGuard {
    fn new(transaction: Box<dyn MonitorTransaction>) -> Self {
        Self {
            transaction: Some(transaction),
        }
    }

    fn finish(&mut self, status: TransactionStatus) {
        if let Some(transaction) = self.transaction.take() {
            transaction.finish(status);
        }
    }
}

impl Drop for TransactionGuard {
    fn drop(&mut self) {
        self.finish(TransactionStatus::Cancelled);
    }
}
