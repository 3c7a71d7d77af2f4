//! Tag / context keys written to the monitoring scope.

/// Field map used for scope contexts.
pub type ContextMap = serde_json::Map<String, serde_json::Value>;

pub const EXECUTION_TYPE_TAG: &str = "temporal.execution_type";
pub const EXECUTION_TYPE_ACTIVITY: &str = "activity";

pub const WORKFLOW_TYPE_TAG: &str = "temporal.workflow.type";
pub const WORKFLOW_ID_TAG: &str = "temporal.workflow.id";
pub const WORKFLOW_NAMESPACE_TAG: &str = "temporal.workflow.namespace";
pub const WORKFLOW_RUN_ID_TAG: &str = "temporal.workflow.run_id";

pub const ACTIVITY_ID_TAG: &str = "temporal.activity.id";
pub const ACTIVITY_TYPE_TAG: &str = "temporal.activity.type";
pub const ACTIVITY_TASK_QUEUE_TAG: &str = "temporal.activity.task_queue";

pub const ACTIVITY_INPUT_CONTEXT: &str = "temporal.activity.input";
pub const ACTIVITY_INFO_CONTEXT: &str = "temporal.activity.info";

/// Every tag an activity invocation carries.
pub const ACTIVITY_TAGS: [&str; 8] = [
    EXECUTION_TYPE_TAG,
    WORKFLOW_TYPE_TAG,
    WORKFLOW_ID_TAG,
    ACTIVITY_ID_TAG,
    ACTIVITY_TYPE_TAG,
    ACTIVITY_TASK_QUEUE_TAG,
    WORKFLOW_NAMESPACE_TAG,
    WORKFLOW_RUN_ID_TAG,
];
