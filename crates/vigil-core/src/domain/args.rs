//! ActivityArg - activity の位置引数
//!
//! # 学習ポイント
//! - 実行時の型判定（「この値は構造化レコードか？」）の代わりに tagged enum を使う
//! - 呼び出し側が `ActivityArg::record` で「名前付きフィールドを持つ」ことを宣言する

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::keys::ContextMap;

/// One positional argument of an activity invocation.
///
/// Only `Record` is eligible for the `temporal.activity.input` context; raw
/// JSON values and byte blobs are never introspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum ActivityArg {
    /// A composite value with named fields.
    Record(ContextMap),

    /// Any other JSON value (primitives, arrays, untyped maps).
    Value(Value),

    /// Opaque payload.
    Bytes(Vec<u8>),
}

impl ActivityArg {
    /// Serialize `value` as a record argument.
    ///
    /// A type that does not serialize to a JSON object (newtypes over
    /// primitives, sequences) falls back to `ActivityArg::Value`.
    pub fn record<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(match serde_json::to_value(value)? {
            Value::Object(fields) => Self::Record(fields),
            other => Self::Value(other),
        })
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Field map if this argument is a record.
    pub fn as_record(&self) -> Option<&ContextMap> {
        match self {
            Self::Record(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Record(fields) => Value::Object(fields.clone()),
            Self::Value(value) => value.clone(),
            Self::Bytes(bytes) => Value::from(bytes.clone()),
        }
    }
}

/// Collapse positional arguments into a single JSON payload.
///
/// - no argument: `null`
/// - one argument: that argument
/// - several: a JSON array in positional order
pub fn args_to_json(args: &[ActivityArg]) -> Value {
    match args {
        [] => Value::Null,
        [single] => single.to_json(),
        many => Value::Array(many.iter().map(ActivityArg::to_json).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: String,
    }

    #[derive(Serialize)]
    struct Meters(f64);

    #[test]
    fn struct_becomes_record() {
        let arg = ActivityArg::record(&Point { x: 1, y: "a".into() }).unwrap();
        let fields = arg.as_record().expect("record");
        assert_eq!(Value::Object(fields.clone()), json!({"x": 1, "y": "a"}));
    }

    #[test]
    fn newtype_over_primitive_is_not_a_record() {
        let arg = ActivityArg::record(&Meters(2.5)).unwrap();
        assert!(arg.as_record().is_none());
        assert_eq!(arg, ActivityArg::value(2.5));
    }

    #[test]
    fn json_object_passed_as_value_stays_opaque() {
        let arg = ActivityArg::value(json!({"x": 1}));
        assert!(arg.as_record().is_none());
    }

    #[test]
    fn args_collapse_by_arity() {
        assert_eq!(args_to_json(&[]), Value::Null);
        assert_eq!(args_to_json(&[ActivityArg::value(3)]), json!(3));
        assert_eq!(
            args_to_json(&[ActivityArg::value("a"), ActivityArg::bytes(vec![1u8, 2])]),
            json!(["a", [1, 2]])
        );
    }

    #[test]
    fn arg_is_tagged_enum() {
        let v = serde_json::to_value(ActivityArg::value(true)).unwrap();
        assert_eq!(v["kind"], "Value");
        assert_eq!(v["value"], true);
    }
}
