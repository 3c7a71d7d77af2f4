//! Activity trait - 型付き activity の定義
//!
//! # 学習ポイント
//! - Associated Constants (`const MODULE`, `const QUALNAME`)
//! - Associated Types で入出力の型を固定
//! - Type erasure パターン (TypedActivity<A> → DynActivity)

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::registry::DispatchError;
use crate::domain::{ActivityArg, ActivityError, FunctionRef, args_to_json};
use crate::ports::ActivityResult;

/// Activity は関数の識別子と入出力の型を対応付ける
///
/// # 使用例
/// ```ignore
/// struct Charge;
///
/// #[async_trait]
/// impl Activity for Charge {
///     const MODULE: &'static str = "billing.activities";
///     const QUALNAME: &'static str = "charge";
///     type Input = ChargeRequest;
///     type Output = Receipt;
///
///     async fn run(&self, input: ChargeRequest) -> Result<Receipt, ActivityError> {
///         ...
///     }
/// }
/// ```
#[async_trait]
pub trait Activity: Send + Sync + 'static {
    const MODULE: &'static str;
    const QUALNAME: &'static str;

    /// Decoded from the positional arguments (see `args_to_json`).
    type Input: DeserializeOwned + Send;
    type Output: Serialize + Send;

    async fn run(&self, input: Self::Input) -> Result<Self::Output, ActivityError>;

    fn function_ref() -> FunctionRef {
        FunctionRef::new(Self::MODULE, Self::QUALNAME)
    }
}

/// Object-safe form of `Activity`, stored in the registry.
#[async_trait]
pub trait DynActivity: Send + Sync {
    async fn run_dyn(&self, args: &[ActivityArg]) -> ActivityResult;
    fn function(&self) -> FunctionRef;
}

pub struct TypedActivity<A: Activity> {
    activity: A,
}

impl<A: Activity> TypedActivity<A> {
    pub fn new(activity: A) -> Self {
        Self { activity }
    }
}

#[async_trait]
impl<A: Activity> DynActivity for TypedActivity<A> {
    async fn run_dyn(&self, args: &[ActivityArg]) -> ActivityResult {
        let input: A::Input = serde_json::from_value(args_to_json(args)).map_err(|source| {
            ActivityError::new(DispatchError::Decode {
                function: A::function_ref().to_string(),
                source,
            })
        })?;

        let output = self.activity.run(input).await?;

        serde_json::to_value(output).map_err(|source| {
            ActivityError::new(DispatchError::Encode {
                function: A::function_ref().to_string(),
                source,
            })
        })
    }

    fn function(&self) -> FunctionRef {
        A::function_ref()
    }
}


#[cfg(test)]
mod tests {
    use super::samples::{Add, AddInput, Ping};
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn typed_activity_decodes_record_argument() {
        let typed = TypedActivity::new(Add);
        let arg = ActivityArg::record(&AddInput { a: 2, b: 3 }).unwrap();
        assert_eq!(typed.run_dyn(&[arg]).await.unwrap(), json!(5));
        assert_eq!(typed.function().transaction_name(), "tests.math.Calculator.add");
    }

    #[tokio::test]
    async fn zero_arguments_decode_as_unit() {
        let typed = TypedActivity::new(Ping);
        assert_eq!(typed.run_dyn(&[]).await.unwrap(), json!("pong"));
    }

    #[tokio::test]
    async fn decode_failure_is_a_dispatch_error() {
        let typed = TypedActivity::new(Add);
        let err = typed.run_dyn(&[ActivityArg::value("nope")]).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DispatchError>(),
            Some(DispatchError::Decode { function, .. }) if function == "tests.math.Calculator.add"
        ));
    }

    #[tokio::test]
    async fn activity_errors_pass_through_untouched() {
        let typed = TypedActivity::new(Add);
        let arg = ActivityArg::record(&AddInput { a: i64::MAX, b: 1 }).unwrap();
        let err = typed.run_dyn(&[arg]).await.unwrap_err();
        assert_eq!(err.to_string(), "overflow");
    }
}
