//! ActivityInfo - engine が提供する実行メタデータ
//!
//! 1 回の activity 実行の間だけ有効な read-only スナップショット。
//! engine は retry のたびに attempt などを更新するので、必要になった時点で
//! `ActivityContext::info()` から取り直す。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::keys::ContextMap;

/// Identity fields shared by workflow and activity info.
pub trait WorkflowIdentity {
    fn workflow_type(&self) -> &str;
    fn workflow_id(&self) -> &str;
}

/// Metadata describing the current activity invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityInfo {
    pub activity_id: String,
    pub activity_type: String,
    pub attempt: u32,
    pub is_local: bool,
    pub task_queue: String,
    pub workflow_id: String,
    pub workflow_namespace: String,
    pub workflow_run_id: String,
    pub workflow_type: String,
    pub scheduled_time: DateTime<Utc>,
    pub started_time: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heartbeat_timeout_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_to_close_timeout_ms: Option<u64>,
}

impl ActivityInfo {
    /// Full field map, used for the `temporal.activity.info` context.
    pub fn to_context(&self) -> Result<ContextMap, serde_json::Error> {
        Ok(match serde_json::to_value(self)? {
            Value::Object(fields) => fields,
            _ => ContextMap::new(),
        })
    }
}

impl WorkflowIdentity for ActivityInfo {
    fn workflow_type(&self) -> &str {
        &self.workflow_type
    }

    fn workflow_id(&self) -> &str {
        &self.workflow_id
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    /// Info for tests; `suffix` makes every identifying field distinct.
    pub fn activity_info(suffix: &str) -> ActivityInfo {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        ActivityInfo {
            activity_id: format!("activity-{suffix}"),
            activity_type: format!("ActivityType{suffix}"),
            attempt: 1,
            is_local: false,
            task_queue: format!("queue-{suffix}"),
            workflow_id: format!("workflow-{suffix}"),
            workflow_namespace: format!("ns-{suffix}"),
            workflow_run_id: format!("run-{suffix}"),
            workflow_type: format!("WorkflowType{suffix}"),
            scheduled_time: at,
            started_time: at,
            heartbeat_timeout_ms: None,
            start_to_close_timeout_ms: Some(30_000),
        }
    }
}
