//! Sample activities for the demo worker.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vigil_core::ActivityError;
use vigil_core::typed::Activity;

pub const MODULE: &str = "vigil_cli.activities";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreetInput {
    pub name: String,
}

pub struct Greet;

#[async_trait]
impl Activity for Greet {
    const MODULE: &'static str = MODULE;
    const QUALNAME: &'static str = "greet";
    type Input = GreetInput;
    type Output = String;

    async fn run(&self, input: GreetInput) -> Result<String, ActivityError> {
        if input.name.trim().is_empty() {
            return Err(ActivityError::msg("name must not be empty"));
        }
        Ok(format!("Hello, {}!", input.name))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivideInput {
    pub dividend: i64,
    pub divisor: i64,
}

#[derive(Debug, thiserror::Error)]
#[error("cannot divide {dividend} by zero")]
pub struct DivisionByZero {
    pub dividend: i64,
}

#[derive(Debug, thiserror::Error)]
#[error("{dividend} / {divisor} overflows i64")]
pub struct DivisionOverflow {
    pub dividend: i64,
    pub divisor: i64,
}

pub struct Divide;

#[async_trait]
impl Activity for Divide {
    const MODULE: &'static str = MODULE;
    const QUALNAME: &'static str = "divide";
    type Input = DivideInput;
    type Output = i64;

    async fn run(&self, input: DivideInput) -> Result<i64, ActivityError> {
        if input.divisor == 0 {
            return Err(ActivityError::new(DivisionByZero {
                dividend: input.dividend,
            }));
        }
        input.dividend.checked_div(input.divisor).ok_or_else(|| {
            ActivityError::new(DivisionOverflow {
                dividend: input.dividend,
                divisor: input.divisor,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use vigil_core::domain::keys::ACTIVITY_INPUT_CONTEXT;
    use vigil_core::impls::{FixedActivityContext, RecordingMonitor};
    use vigil_core::typed::ActivityRegistry;
    use vigil_core::{
        ActivityArg, ActivityInbound, ActivityInfo, ExecuteActivityInput, InterceptorChain,
        MonitoringInterceptor,
    };

    fn info() -> ActivityInfo {
        let now = chrono::Utc::now();
        ActivityInfo {
            activity_id: "1".into(),
            activity_type: "divide".into(),
            attempt: 1,
            is_local: false,
            task_queue: "q".into(),
            workflow_id: "wf".into(),
            workflow_namespace: "default".into(),
            workflow_run_id: "run".into(),
            workflow_type: "DemoWorkflow".into(),
            scheduled_time: now,
            started_time: now,
            heartbeat_timeout_ms: None,
            start_to_close_timeout_ms: None,
        }
    }

    #[tokio::test]
    async fn greet_formats_name() {
        let out = Greet.run(GreetInput { name: "world".into() }).await.unwrap();
        assert_eq!(out, "Hello, world!");
        assert!(Greet.run(GreetInput { name: " ".into() }).await.is_err());
    }

    #[tokio::test]
    async fn divide_overflow_is_an_error() {
        let err = Divide
            .run(DivideInput { dividend: i64::MIN, divisor: -1 })
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<DivisionOverflow>().is_some());
        assert_eq!(Divide.run(DivideInput { dividend: 7, divisor: -2 }).await.unwrap(), -3);
    }

    #[tokio::test]
    async fn division_by_zero_is_reported_with_its_input() {
        let monitor = RecordingMonitor::new();
        let mut registry = ActivityRegistry::new();
        registry.register(Divide).unwrap();
        let inbound = InterceptorChain::new()
            .with(MonitoringInterceptor::new(Arc::new(monitor.clone())))
            .build(Arc::new(registry));

        let arg = ActivityArg::record(&DivideInput { dividend: 7, divisor: 0 }).unwrap();
        let input = ExecuteActivityInput::new(
            Divide::function_ref(),
            Arc::new(FixedActivityContext::new(info())),
        )
        .with_arg(arg);

        let err = inbound.execute_activity(&input).await.unwrap_err();
        assert_eq!(err.downcast_ref::<DivisionByZero>().map(|e| e.dividend), Some(7));

        let record = monitor.scope(0).unwrap();
        assert_eq!(record.captured_errors().len(), 1);
        assert!(record.captured_errors()[0].ptr_eq(&err));
        assert_eq!(
            record.started_transactions(),
            vec!["vigil_cli.activities.divide"]
        );
        assert!(record.events.iter().any(|e| matches!(
            e,
            vigil_core::impls::ScopeEvent::ContextSet { key, value }
                if key == ACTIVITY_INPUT_CONTEXT && value["divisor"] == 0
        )));
    }
}
