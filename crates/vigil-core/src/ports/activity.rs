//! Activity execution port - engine 側の実行契約

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{ActivityArg, ActivityError, ActivityInfo, FunctionRef};

/// Value an activity produces.
pub type ActivityOutput = serde_json::Value;

pub type ActivityResult = Result<ActivityOutput, ActivityError>;

/// Source of the current invocation's metadata.
///
/// Each call returns a fresh snapshot; the engine may have updated it since
/// the previous call.
pub trait ActivityContext: Send + Sync {
    fn info(&self) -> ActivityInfo;
}

/// Request for one activity invocation.
#[derive(Clone)]
pub struct ExecuteActivityInput {
    pub function: FunctionRef,
    pub args: Vec<ActivityArg>,
    pub context: Arc<dyn ActivityContext>,
}

impl ExecuteActivityInput {
    pub fn new(function: FunctionRef, context: Arc<dyn ActivityContext>) -> Self {
        Self {
            function,
            args: Vec::new(),
            context,
        }
    }

    pub fn with_arg(mut self, arg: ActivityArg) -> Self {
        self.args.push(arg);
        self
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = ActivityArg>) -> Self {
        self.args.extend(args);
        self
    }

    /// Current info, fetched from the context at call time.
    pub fn info(&self) -> ActivityInfo {
        self.context.info()
    }
}

impl fmt::Debug for ExecuteActivityInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecuteActivityInput")
            .field("function", &self.function)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// One link of the activity interceptor chain.
///
/// The engine calls the outermost link; each link delegates to the next, and
/// the innermost one runs the activity itself.
#[async_trait]
pub trait ActivityInbound: Send + Sync {
    async fn execute_activity(&self, input: &ExecuteActivityInput) -> ActivityResult;
}
