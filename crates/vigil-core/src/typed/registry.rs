//! ActivityRegistry - Activity の登録と dispatch
//!
//! # 学習ポイント
//! - HashMap での型消去された trait object の管理
//! - Generic methods での登録と型安全性
//! - 登録表そのものを chain の終端 (`ActivityInbound`) として使う

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::activity::{Activity, DynActivity, TypedActivity};
use crate::domain::{ActivityError, FunctionRef};
use crate::ports::{ActivityInbound, ActivityResult, ExecuteActivityInput};

/// ActivityRegistry は型付き Activity を登録・管理
///
/// # 使用例
/// ```ignore
/// let mut registry = ActivityRegistry::new();
/// registry.register(Charge)?;
///
/// let inbound = chain.build(Arc::new(registry));
/// ```
#[derive(Default)]
pub struct ActivityRegistry {
    activities: HashMap<FunctionRef, Arc<dyn DynActivity>>,
}

/// RegistryError は ActivityRegistry の登録エラー
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Activity '{0}' is already registered")]
    AlreadyRegistered(String),
}

/// Failures raised by the registry itself rather than by an activity.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("activity '{0}' is not registered")]
    NotRegistered(String),

    #[error("failed to decode arguments for '{function}': {source}")]
    Decode {
        function: String,
        source: serde_json::Error,
    },

    #[error("failed to encode result of '{function}': {source}")]
    Encode {
        function: String,
        source: serde_json::Error,
    },
}

impl ActivityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<A: Activity>(&mut self, activity: A) -> Result<(), RegistryError> {
        let function = A::function_ref();
        if self.activities.contains_key(&function) {
            return Err(RegistryError::AlreadyRegistered(function.to_string()));
        }
        self.activities
            .insert(function, Arc::new(TypedActivity::new(activity)));
        Ok(())
    }

    pub fn get(&self, function: &FunctionRef) -> Option<Arc<dyn DynActivity>> {
        self.activities.get(function).cloned()
    }

    /// Registered functions, sorted.
    pub fn registered(&self) -> Vec<FunctionRef> {
        let mut functions: Vec<FunctionRef> = self.activities.keys().cloned().collect();
        functions.sort();
        functions
    }
}

#[async_trait]
impl ActivityInbound for ActivityRegistry {
    async fn execute_activity(&self, input: &ExecuteActivityInput) -> ActivityResult {
        let activity = self.get(&input.function).ok_or_else(|| {
            ActivityError::new(DispatchError::NotRegistered(input.function.to_string()))
        })?;
        activity.run_dyn(&input.args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ActivityArg;
    use crate::domain::info::fixtures::activity_info;
    use crate::impls::FixedActivityContext;
    use crate::typed::activity::samples::{Add, AddInput, Ping};
    use serde_json::json;

    fn input(function: FunctionRef, args: Vec<ActivityArg>) -> ExecuteActivityInput {
        ExecuteActivityInput::new(function, Arc::new(FixedActivityContext::new(activity_info("a"))))
            .with_args(args)
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ActivityRegistry::new();
        registry.register(Add).unwrap();
        assert!(registry.get(&Add::function_ref()).is_some());
        assert!(registry.get(&Ping::function_ref()).is_none());
    }

    #[test]
    fn test_double_registration() {
        let mut registry = ActivityRegistry::new();
        registry.register(Add).unwrap();
        let result = registry.register(Add);
        assert!(matches!(result, Err(RegistryError::AlreadyRegistered(name)) if name == "tests.math.Calculator.add"));
    }

    #[test]
    fn test_registered_is_sorted() {
        let mut registry = ActivityRegistry::new();
        registry.register(Ping).unwrap();
        registry.register(Add).unwrap();
        assert_eq!(
            registry.registered(),
            vec![Ping::function_ref(), Add::function_ref()]
        );
    }

    #[tokio::test]
    async fn test_dispatch_by_function() {
        let mut registry = ActivityRegistry::new();
        registry.register(Add).unwrap();
        registry.register(Ping).unwrap();

        let arg = ActivityArg::record(&AddInput { a: 40, b: 2 }).unwrap();
        let out = registry
            .execute_activity(&input(Add::function_ref(), vec![arg]))
            .await
            .unwrap();
        assert_eq!(out, json!(42));

        let out = registry
            .execute_activity(&input(Ping::function_ref(), vec![]))
            .await
            .unwrap();
        assert_eq!(out, json!("pong"));
    }

    #[tokio::test]
    async fn test_unregistered_function() {
        let registry = ActivityRegistry::new();
        let err = registry
            .execute_activity(&input(FunctionRef::new("nowhere", "fn"), vec![]))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DispatchError>(),
            Some(DispatchError::NotRegistered(name)) if name == "nowhere.fn"
        ));
    }
}
